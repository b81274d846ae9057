//! Response handling shared by the async and blocking clients.

use std::collections::BTreeMap;

use crate::error::{MAX_ERROR_BODY_CHARS, Result, StsError, truncate_str};
use crate::response::{ApiErrorResponse, AssumeRoleResponse, Credentials};

/// Maps an HTTP status and body to credentials or an error.
///
/// The body is decoded as JSON whatever the status. `params` is the
/// outgoing parameter set, attached to API errors for diagnostics.
pub(crate) fn handle_response(
    status: reqwest::StatusCode,
    text: &str,
    params: BTreeMap<String, String>,
) -> Result<Credentials> {
    let body: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        StsError::ResponseParse(format!(
            "HTTP {} with non-JSON body ({}): {}",
            status,
            e,
            truncate_str(text, MAX_ERROR_BODY_CHARS)
        ))
    })?;

    if !status.is_success() {
        let api_err: ApiErrorResponse = serde_json::from_value(body).unwrap_or_default();
        tracing::warn!(
            status = status.as_u16(),
            code = %api_err.code,
            request_id = %api_err.request_id,
            "AssumeRole rejected"
        );
        return Err(StsError::Api {
            code: api_err.code,
            message: api_err.message,
            request_id: api_err.request_id,
            params,
        });
    }

    let response: AssumeRoleResponse = serde_json::from_value(body).map_err(|e| {
        StsError::ResponseParse(format!(
            "HTTP {} without valid Credentials ({}): {}",
            status,
            e,
            truncate_str(text, MAX_ERROR_BODY_CHARS)
        ))
    })?;
    Ok(response.credentials)
}
