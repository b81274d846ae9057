//! Synchronous (blocking) client for the STS AssumeRole API.
//!
//! This module is only available when the `blocking` feature is enabled.
//! It mirrors the async [`crate::client::Client`] API using `reqwest::blocking`
//! and must not be used from inside an async runtime.
//!
//! # Example
//!
//! ```no_run
//! use oss_sts::blocking::Client;
//! use oss_sts::{AssumeRoleRequest, Credential};
//!
//! fn main() -> oss_sts::Result<()> {
//!     let client = Client::new(Credential::new("id", "secret"))?;
//!
//!     let request = AssumeRoleRequest::new("acs:ram::123456:role/example")
//!         .with_session_name("session");
//!
//!     let creds = client.assume_role(request)?;
//!     println!("AK: {}", creds.access_key_id);
//!     Ok(())
//! }
//! ```

use reqwest::Url;

use crate::client::{AssumeRoleOptions, AssumeRoleRequest};
use crate::config::ClientConfig;
use crate::credential::{ChainProvider, Credential, CredentialProvider};
use crate::error::{Result, StsError};
use crate::exec::handle_response;
use crate::request::build_signed_request;
use crate::response::Credentials;

/// Synchronous client for the STS AssumeRole API.
#[derive(Debug)]
pub struct Client {
    http: reqwest::blocking::Client,
    config: ClientConfig,
    endpoint: Url,
    credential: Credential,
}

impl Client {
    /// Creates a new blocking client with an explicit credential.
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_config(credential, ClientConfig::default())
    }

    /// Creates a new blocking client with custom configuration.
    pub fn with_config(credential: Credential, config: ClientConfig) -> Result<Self> {
        credential.validate()?;
        let endpoint = config.parse_endpoint()?;

        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| StsError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            endpoint,
            credential,
        })
    }

    /// Creates a new blocking client using the default credential chain.
    pub fn from_env() -> Result<Self> {
        let credential = ChainProvider::default_chain().resolve()?;
        Self::new(credential)
    }

    /// Assumes a RAM role and obtains temporary security credentials.
    pub fn assume_role(&self, request: AssumeRoleRequest) -> Result<Credentials> {
        self.assume_role_with_options(request, AssumeRoleOptions::default())
    }

    /// Like [`Client::assume_role`], with per-call options.
    pub fn assume_role_with_options(
        &self,
        request: AssumeRoleRequest,
        options: AssumeRoleOptions,
    ) -> Result<Credentials> {
        let _span = tracing::debug_span!("assume_role", role_arn = %request.role_arn).entered();

        let signed = build_signed_request(&request, &self.credential)?;
        let timeout = options.effective_timeout(self.config.timeout);
        tracing::debug!(endpoint = %self.endpoint, "sending STS request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .timeout(timeout)
            .body(signed.body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        tracing::debug!(status = status.as_u16(), "received STS response");

        handle_response(status, &text, signed.params)
    }
}
