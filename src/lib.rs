//! Temporary credentials from the Alibaba Cloud Security Token Service.
//!
//! This crate signs and sends a single `AssumeRole` request and returns the
//! temporary credentials (access key ID, access key secret, security token
//! and expiration) that object-storage clients such as OSS accept as STS
//! credentials. It does no caching, renewal or retrying.
//!
//! # Quick Start (async)
//!
//! ```no_run
//! use oss_sts::{AssumeRoleRequest, Client, Credential, Policy, Statement};
//!
//! # async fn example() -> oss_sts::Result<()> {
//! let client = Client::new(Credential::new(
//!     "your-access-key-id",
//!     "your-access-key-secret",
//! ))?;
//!
//! let policy = Policy::new("1").with_statement(Statement::allow(
//!     ["oss:GetObject", "oss:PutObject"],
//!     ["acs:oss:*:*:my-bucket/*"],
//! ));
//!
//! let creds = client
//!     .assume_role(
//!         AssumeRoleRequest::new("acs:ram::123456:role/example")
//!             .with_policy(policy)
//!             .with_duration_seconds(900)
//!             .with_session_name("uploader"),
//!     )
//!     .await?;
//!
//! println!("Temporary AK: {}", creds.access_key_id);
//! # Ok(())
//! # }
//! ```
//!
//! The request signing itself is available in [`sign`] for callers that
//! need to verify or reproduce a signature.

pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod policy;
pub mod response;
pub mod sign;

#[cfg(feature = "blocking")]
pub mod blocking;

mod exec;
mod request;

pub use client::{AssumeRoleOptions, AssumeRoleRequest, AssumeRoleRequestBuilder, Client};
pub use config::ClientConfig;
pub use credential::{
    ChainProvider, Credential, CredentialProvider, EnvProvider, ProfileProvider, StaticProvider,
};
pub use error::{Result, StsError};
pub use policy::{Policy, PolicyInput, Statement};
pub use response::Credentials;

/// The credential bundle returned by `AssumeRole`.
pub type AssumeRoleResult = Credentials;

// Compile-time assertions: key types must be Send + Sync for use across threads.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<Client>;
    let _ = assert_send_sync::<StsError>;
    let _ = assert_send_sync::<Credential>;
    let _ = assert_send_sync::<Credentials>;
};
