use std::collections::BTreeMap;

use thiserror::Error;

/// Maximum characters to include in error message body for debugging.
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors that can occur when requesting temporary credentials.
#[derive(Debug, Error)]
pub enum StsError {
    /// Missing or invalid client configuration, detected before any request is sent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The supplied policy string is not valid JSON.
    #[error("policy is not valid JSON: {0}")]
    PolicyValidation(String),

    /// Connection, DNS, timeout or body read failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service rejected the request with a non-2xx status.
    ///
    /// `params` is the outgoing parameter set, which never contains the
    /// access key secret. It is kept to help debug signature mismatches.
    #[error("API error (RequestId: {request_id}): [{code}] {message}")]
    Api {
        code: String,
        message: String,
        request_id: String,
        params: BTreeMap<String, String>,
    },

    /// The service answered but the body is not the expected JSON shape.
    #[error("unexpected response: {0}")]
    ResponseParse(String),

    /// Signature computation error.
    #[error("signature error: {0}")]
    Signature(String),
}

impl StsError {
    /// Returns `true` if the request was aborted because it exceeded its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, StsError::Transport(e) if e.is_timeout())
    }

    /// Returns the request ID if this is an API error.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            StsError::Api { request_id, .. } => Some(request_id),
            _ => None,
        }
    }

    /// Returns the error code if this is an API error.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            StsError::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns the outgoing request parameters if this is an API error.
    pub fn request_params(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            StsError::Api { params, .. } => Some(params),
            _ => None,
        }
    }
}

/// A specialized Result type for STS operations.
pub type Result<T> = std::result::Result<T, StsError>;

/// Truncates a string to at most `max_chars` characters on a valid UTF-8 boundary.
pub(crate) fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
