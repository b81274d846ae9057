use serde::Deserialize;

/// Temporary security credentials returned by `AssumeRole`.
///
/// The `Debug` implementation redacts `access_key_secret` and `security_token`
/// to prevent accidental credential leakage in logs.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
    pub security_token: String,
    pub expiration: String,
}

impl Credentials {
    /// Returns the temporary access key ID.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Returns the temporary access key secret.
    pub fn access_key_secret(&self) -> &str {
        &self.access_key_secret
    }

    /// Returns the security token, passed as the session/STS token to
    /// downstream clients such as an OSS SDK.
    pub fn security_token(&self) -> &str {
        &self.security_token
    }

    /// Returns the expiration timestamp string.
    pub fn expiration(&self) -> &str {
        &self.expiration
    }

    /// Checks if the credentials have expired.
    ///
    /// An expiration that cannot be parsed as RFC 3339 counts as expired.
    pub fn is_expired(&self) -> bool {
        match chrono::DateTime::parse_from_rfc3339(&self.expiration) {
            Ok(exp_time) => chrono::Utc::now() >= exp_time.with_timezone(&chrono::Utc),
            Err(_) => true,
        }
    }

    /// Returns the remaining lifetime, or `None` if expired or unparseable.
    pub fn time_to_expiry(&self) -> Option<std::time::Duration> {
        let exp_time = chrono::DateTime::parse_from_rfc3339(&self.expiration).ok()?;
        (exp_time.with_timezone(&chrono::Utc) - chrono::Utc::now())
            .to_std()
            .ok()
            .filter(|d| !d.is_zero())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"****")
            .field("security_token", &"****")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Success body of `AssumeRole`. Only the credentials are used.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct AssumeRoleResponse {
    pub credentials: Credentials,
}

/// Error body returned with a non-2xx status.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct ApiErrorResponse {
    pub request_id: String,
    pub code: String,
    pub message: String,
}
