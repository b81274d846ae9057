use std::time::Duration;

use reqwest::Url;
use tracing::Instrument;

use crate::config::ClientConfig;
use crate::credential::{ChainProvider, Credential, CredentialProvider};
use crate::error::{Result, StsError};
use crate::exec::handle_response;
use crate::policy::PolicyInput;
use crate::request::{ACTION_ASSUME_ROLE, build_signed_request};
use crate::response::Credentials;

/// Request parameters for the AssumeRole API.
#[derive(Debug, Clone, PartialEq)]
pub struct AssumeRoleRequest {
    /// ARN of the RAM role to assume.
    pub role_arn: String,
    /// Session name recorded in audit logs. Empty means `"app"`.
    pub role_session_name: String,
    /// Additional policy to further restrict permissions.
    pub policy: Option<PolicyInput>,
    /// Credential lifetime in seconds. `None` or `0` means 3600.
    pub duration_seconds: Option<u64>,
}

impl AssumeRoleRequest {
    pub fn new(role_arn: impl Into<String>) -> Self {
        Self {
            role_arn: role_arn.into(),
            role_session_name: String::new(),
            policy: None,
            duration_seconds: None,
        }
    }

    pub fn builder() -> AssumeRoleRequestBuilder {
        AssumeRoleRequestBuilder::default()
    }

    pub fn with_session_name(mut self, name: impl Into<String>) -> Self {
        self.role_session_name = name.into();
        self
    }

    /// Accepts a [`crate::Policy`] or a raw JSON string.
    pub fn with_policy(mut self, policy: impl Into<PolicyInput>) -> Self {
        self.policy = Some(policy.into());
        self
    }

    pub fn with_duration_seconds(mut self, seconds: u64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }
}

/// Builder for [`AssumeRoleRequest`].
#[derive(Debug, Default)]
pub struct AssumeRoleRequestBuilder {
    role_arn: String,
    role_session_name: String,
    policy: Option<PolicyInput>,
    duration_seconds: Option<u64>,
}

impl AssumeRoleRequestBuilder {
    pub fn role_arn(mut self, arn: impl Into<String>) -> Self {
        self.role_arn = arn.into();
        self
    }

    pub fn role_session_name(mut self, name: impl Into<String>) -> Self {
        self.role_session_name = name.into();
        self
    }

    pub fn policy(mut self, policy: impl Into<PolicyInput>) -> Self {
        self.policy = Some(policy.into());
        self
    }

    pub fn duration_seconds(mut self, seconds: u64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    pub fn build(self) -> AssumeRoleRequest {
        AssumeRoleRequest {
            role_arn: self.role_arn,
            role_session_name: self.role_session_name,
            policy: self.policy,
            duration_seconds: self.duration_seconds,
        }
    }
}

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct AssumeRoleOptions {
    /// Overrides [`ClientConfig::timeout`] for this call.
    pub timeout: Option<Duration>,
}

impl AssumeRoleOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The override if set and non-zero, otherwise `default`.
    pub(crate) fn effective_timeout(&self, default: Duration) -> Duration {
        self.timeout.filter(|t| !t.is_zero()).unwrap_or(default)
    }
}

/// Async client for the STS AssumeRole API.
///
/// The client holds no per-call state; share it behind an `Arc` to issue
/// concurrent calls.
#[derive(Debug)]
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
    endpoint: Url,
    credential: Credential,
}

impl Client {
    /// Creates a new client with an explicit credential.
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_config(credential, ClientConfig::default())
    }

    /// Creates a new client with an explicit credential and custom configuration.
    ///
    /// Fails if either half of the credential is empty or the endpoint is
    /// not an http(s) URL.
    pub fn with_config(credential: Credential, config: ClientConfig) -> Result<Self> {
        credential.validate()?;
        let endpoint = config.parse_endpoint()?;

        let http = reqwest::Client::builder()
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

    /// Creates a new client using the default credential chain (env vars → profile file).
    pub fn from_env() -> Result<Self> {
        let credential = ChainProvider::default_chain().resolve()?;
        Self::new(credential)
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Assumes a RAM role and obtains temporary security credentials.
    pub async fn assume_role(&self, request: AssumeRoleRequest) -> Result<Credentials> {
        self.assume_role_with_options(request, AssumeRoleOptions::default())
            .await
    }

    /// Like [`Client::assume_role`], with per-call options.
    pub async fn assume_role_with_options(
        &self,
        request: AssumeRoleRequest,
        options: AssumeRoleOptions,
    ) -> Result<Credentials> {
        let span = tracing::debug_span!(
            "assume_role",
            role_arn = %request.role_arn,
            endpoint = %self.endpoint,
        );
        self.execute(&request, options).instrument(span).await
    }

    async fn execute(
        &self,
        request: &AssumeRoleRequest,
        options: AssumeRoleOptions,
    ) -> Result<Credentials> {
        let signed = build_signed_request(request, &self.credential)?;
        let timeout = options.effective_timeout(self.config.timeout);

        tracing::debug!(
            action = ACTION_ASSUME_ROLE,
            session_name = %signed.params["RoleSessionName"],
            has_policy = request.policy.as_ref().is_some_and(|p| !p.is_blank()),
            timeout_ms = timeout.as_millis() as u64,
            "sending STS request"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .timeout(timeout)
            .body(signed.body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(status = status.as_u16(), "received STS response");

        handle_response(status, &text, signed.params)
    }
}
