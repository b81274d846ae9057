//! Builds the signed `AssumeRole` parameter set and its form-encoded body.

use std::collections::BTreeMap;

use crate::client::AssumeRoleRequest;
use crate::config::{API_VERSION, FORMAT, SIGNATURE_METHOD, SIGNATURE_VERSION};
use crate::credential::Credential;
use crate::error::Result;
use crate::sign::{SIGNATURE_PARAM, percent_encode, sign};

pub(crate) const ACTION_ASSUME_ROLE: &str = "AssumeRole";
pub(crate) const DEFAULT_DURATION_SECONDS: u64 = 3600;
pub(crate) const DEFAULT_SESSION_NAME: &str = "app";

/// A fully signed request, ready to send.
#[derive(Debug)]
pub(crate) struct SignedRequest {
    /// Every outgoing parameter, `Signature` included.
    pub params: BTreeMap<String, String>,
    /// `application/x-www-form-urlencoded` body.
    pub body: String,
}

/// Unique per request: wall-clock microseconds plus a random UUID v4.
fn generate_nonce() -> String {
    format!(
        "{}-{}",
        chrono::Utc::now().timestamp_micros(),
        uuid::Uuid::new_v4()
    )
}

/// Current UTC time in ISO 8601.
fn current_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Builds the unsigned parameter map.
///
/// The policy, if any, is resolved here so that an invalid policy fails
/// before anything is signed or sent.
pub(crate) fn build_params(
    request: &AssumeRoleRequest,
    credential: &Credential,
    nonce: String,
    timestamp: String,
) -> Result<BTreeMap<String, String>> {
    let duration = match request.duration_seconds {
        None | Some(0) => DEFAULT_DURATION_SECONDS,
        Some(secs) => secs,
    };
    let session_name = if request.role_session_name.is_empty() {
        DEFAULT_SESSION_NAME
    } else {
        request.role_session_name.as_str()
    };

    let mut params = BTreeMap::new();
    params.insert("Action".to_string(), ACTION_ASSUME_ROLE.to_string());
    params.insert("RoleArn".to_string(), request.role_arn.clone());
    params.insert("RoleSessionName".to_string(), session_name.to_string());
    params.insert("DurationSeconds".to_string(), duration.to_string());
    params.insert("Format".to_string(), FORMAT.to_string());
    params.insert("Version".to_string(), API_VERSION.to_string());
    params.insert(
        "AccessKeyId".to_string(),
        credential.access_key_id.clone(),
    );
    params.insert("SignatureMethod".to_string(), SIGNATURE_METHOD.to_string());
    params.insert(
        "SignatureVersion".to_string(),
        SIGNATURE_VERSION.to_string(),
    );
    params.insert("SignatureNonce".to_string(), nonce);
    params.insert("Timestamp".to_string(), timestamp);

    if let Some(policy) = request.policy.as_ref().filter(|p| !p.is_blank()) {
        params.insert("Policy".to_string(), policy.to_canonical_json()?);
    }

    Ok(params)
}

/// Signs `params` with the access key secret and renders the POST body.
pub(crate) fn sign_params(
    mut params: BTreeMap<String, String>,
    access_key_secret: &str,
) -> Result<SignedRequest> {
    let signature = sign("POST", &params, access_key_secret)?;
    params.insert(SIGNATURE_PARAM.to_string(), signature);

    let body = params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    Ok(SignedRequest { params, body })
}

/// Builds and signs an `AssumeRole` request with a fresh nonce and timestamp.
pub(crate) fn build_signed_request(
    request: &AssumeRoleRequest,
    credential: &Credential,
) -> Result<SignedRequest> {
    let params = build_params(request, credential, generate_nonce(), current_timestamp())?;
    sign_params(params, &credential.access_key_secret)
}
