use std::time::Duration;

use reqwest::Url;

use crate::error::{Result, StsError};

/// Public STS endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://sts.aliyuncs.com";

/// Response format requested from the service.
pub(crate) const FORMAT: &str = "JSON";
/// STS API version.
pub(crate) const API_VERSION: &str = "2015-04-01";
pub(crate) const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub(crate) const SIGNATURE_VERSION: &str = "1.0";

/// Configuration for the STS client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// STS API endpoint URL.
    pub endpoint: String,

    /// Default request timeout, overridable per call.
    pub timeout: Duration,

    /// TCP connect timeout.
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Sets a custom endpoint, e.g. a VPC endpoint or a mock server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the default request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the TCP connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Parses the endpoint. Only `http` and `https` URLs with a host are accepted.
    pub(crate) fn parse_endpoint(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            StsError::Configuration(format!("invalid endpoint '{}': {}", self.endpoint, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(StsError::Configuration(format!(
                "endpoint '{}' must be an http(s) URL with a host",
                self.endpoint
            )));
        }
        Ok(url)
    }
}
