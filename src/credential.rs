//! Long-lived access keys used to sign STS requests, and where to find them.

use std::env;
use std::fs;
use std::path::PathBuf;

use crate::error::{Result, StsError};

/// Environment variable holding the access key ID.
pub const ENV_ACCESS_KEY_ID: &str = "ALIBABA_CLOUD_ACCESS_KEY_ID";
/// Environment variable holding the access key secret.
pub const ENV_ACCESS_KEY_SECRET: &str = "ALIBABA_CLOUD_ACCESS_KEY_SECRET";

/// An AccessKey pair.
///
/// The secret is only ever used as HMAC key material. The `Debug`
/// implementation redacts it.
#[derive(Clone)]
pub struct Credential {
    pub access_key_id: String,
    pub access_key_secret: String,
}

impl Credential {
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
        }
    }

    /// Fails if either half of the key pair is empty.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.access_key_id.is_empty() {
            return Err(StsError::Configuration(
                "missing required access_key_id".into(),
            ));
        }
        if self.access_key_secret.is_empty() {
            return Err(StsError::Configuration(
                "missing required access_key_secret".into(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"****")
            .finish()
    }
}

/// Resolves a [`Credential`] from a specific source.
pub trait CredentialProvider {
    /// Attempt to resolve a credential from this provider.
    fn resolve(&self) -> Result<Credential>;
}

/// Provides a fixed credential.
pub struct StaticProvider {
    credential: Credential,
}

impl StaticProvider {
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            credential: Credential::new(access_key_id, access_key_secret),
        }
    }
}

impl CredentialProvider for StaticProvider {
    fn resolve(&self) -> Result<Credential> {
        self.credential.validate()?;
        Ok(self.credential.clone())
    }
}

/// Provides a credential from environment variables.
///
/// Reads [`ENV_ACCESS_KEY_ID`] and [`ENV_ACCESS_KEY_SECRET`] unless other
/// variable names are given.
pub struct EnvProvider {
    id_var: String,
    secret_var: String,
}

impl Default for EnvProvider {
    fn default() -> Self {
        Self::with_vars(ENV_ACCESS_KEY_ID, ENV_ACCESS_KEY_SECRET)
    }
}

impl EnvProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the key pair from custom variable names.
    pub fn with_vars(id_var: impl Into<String>, secret_var: impl Into<String>) -> Self {
        Self {
            id_var: id_var.into(),
            secret_var: secret_var.into(),
        }
    }

    fn read(name: &str) -> Result<String> {
        match env::var(name) {
            Ok(value) if !value.is_empty() => Ok(value),
            Ok(_) => Err(StsError::Configuration(format!("{} is empty", name))),
            Err(_) => Err(StsError::Configuration(format!("{} not set", name))),
        }
    }
}

impl CredentialProvider for EnvProvider {
    fn resolve(&self) -> Result<Credential> {
        Ok(Credential::new(
            Self::read(&self.id_var)?,
            Self::read(&self.secret_var)?,
        ))
    }
}

/// Provides a credential from an INI credentials file.
///
/// Defaults to the `default` profile of `~/.alibabacloud/credentials`.
pub struct ProfileProvider {
    profile_name: String,
    file_path: Option<PathBuf>,
}

impl Default for ProfileProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileProvider {
    pub fn new() -> Self {
        Self {
            profile_name: "default".to_string(),
            file_path: None,
        }
    }

    /// Selects a profile other than `default`.
    pub fn with_profile(mut self, name: impl Into<String>) -> Self {
        self.profile_name = name.into();
        self
    }

    /// Reads a specific file instead of the default location.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    fn default_path() -> Result<PathBuf> {
        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| StsError::Configuration("cannot determine home directory".into()))?;
        Ok(PathBuf::from(home)
            .join(".alibabacloud")
            .join("credentials"))
    }

    /// Extracts `access_key_id` / `access_key_secret` from the `[profile]` section.
    fn parse_profile(content: &str, profile: &str) -> Result<Credential> {
        let mut section = None;
        let mut access_key_id = None;
        let mut access_key_secret = None;

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = Some(name.trim());
                continue;
            }
            if section != Some(profile) {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().to_string();
            match key.trim() {
                "access_key_id" => access_key_id = Some(value),
                "access_key_secret" => access_key_secret = Some(value),
                _ => {}
            }
        }

        match (access_key_id, access_key_secret) {
            (Some(id), Some(secret)) => {
                let credential = Credential::new(id, secret);
                credential.validate()?;
                Ok(credential)
            }
            _ => Err(StsError::Configuration(format!(
                "profile '{}' missing access_key_id or access_key_secret",
                profile
            ))),
        }
    }
}

impl CredentialProvider for ProfileProvider {
    fn resolve(&self) -> Result<Credential> {
        let path = match &self.file_path {
            Some(p) => p.clone(),
            None => Self::default_path()?,
        };
        let content = fs::read_to_string(&path).map_err(|e| {
            StsError::Configuration(format!(
                "cannot read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse_profile(&content, &self.profile_name)
    }
}

/// Tries multiple credential providers in order and returns the first success.
pub struct ChainProvider {
    providers: Vec<Box<dyn CredentialProvider + Send + Sync>>,
}

impl ChainProvider {
    pub fn new(providers: Vec<Box<dyn CredentialProvider + Send + Sync>>) -> Self {
        Self { providers }
    }

    /// Environment variables first, then the profile file.
    pub fn default_chain() -> Self {
        Self::new(vec![
            Box::new(EnvProvider::new()),
            Box::new(ProfileProvider::new()),
        ])
    }
}

impl CredentialProvider for ChainProvider {
    fn resolve(&self) -> Result<Credential> {
        let mut errors = Vec::new();
        for provider in &self.providers {
            match provider.resolve() {
                Ok(credential) => return Ok(credential),
                Err(e) => {
                    tracing::debug!(error = %e, "credential provider failed, trying next");
                    errors.push(e.to_string());
                }
            }
        }
        if errors.is_empty() {
            return Err(StsError::Configuration(
                "no credential providers configured".into(),
            ));
        }
        Err(StsError::Configuration(format!(
            "no credential found: {}",
            errors.join("; ")
        )))
    }
}
