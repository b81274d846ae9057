//! Session policies that narrow the permissions of issued credentials.
//!
//! A policy can be passed either as a typed [`Policy`] or as a raw JSON
//! string. Both end up as one compact JSON string in the `Policy` request
//! parameter. The crate checks that raw strings are JSON; it does not
//! interpret the policy itself.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StsError};

/// A permission policy document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Policy {
    pub version: String,
    pub statement: Vec<Statement>,
}

impl Policy {
    /// Creates an empty policy with the given language version (usually `"1"`).
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            statement: Vec::new(),
        }
    }

    /// Appends a statement.
    pub fn with_statement(mut self, statement: Statement) -> Self {
        self.statement.push(statement);
        self
    }
}

/// One policy statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub effect: String,
    pub action: Vec<String>,
    pub resource: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Statement {
    /// An `Allow` statement.
    pub fn allow<A, R>(actions: A, resources: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self::with_effect("Allow", actions, resources)
    }

    /// A `Deny` statement.
    pub fn deny<A, R>(actions: A, resources: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self::with_effect("Deny", actions, resources)
    }

    fn with_effect<A, R>(effect: &str, actions: A, resources: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            effect: effect.to_string(),
            action: actions.into_iter().map(Into::into).collect(),
            resource: resources.into_iter().map(Into::into).collect(),
            condition: None,
        }
    }

    /// Attaches a condition block, e.g. `{"IpAddress": {"acs:SourceIp": "10.0.0.0/8"}}`.
    pub fn with_condition(mut self, condition: serde_json::Map<String, serde_json::Value>) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// A policy as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyInput {
    /// A JSON document in text form. Re-serialized compactly before use.
    Raw(String),
    /// A typed policy.
    Structured(Policy),
}

impl PolicyInput {
    /// `true` for a raw string with no content. A blank policy is treated
    /// as absent: the role's own permissions apply.
    pub fn is_blank(&self) -> bool {
        matches!(self, PolicyInput::Raw(raw) if raw.trim().is_empty())
    }

    /// Resolves the input to the compact JSON string sent as `Policy`.
    ///
    /// Raw strings keep their key order; only insignificant whitespace is
    /// normalized, so a pretty-printed and a compact copy of the same
    /// document produce the same parameter value.
    pub fn to_canonical_json(&self) -> Result<String> {
        match self {
            PolicyInput::Raw(raw) => {
                let value: serde_json::Value = serde_json::from_str(raw)
                    .map_err(|e| StsError::PolicyValidation(e.to_string()))?;
                serde_json::to_string(&value)
                    .map_err(|e| StsError::PolicyValidation(e.to_string()))
            }
            PolicyInput::Structured(policy) => serde_json::to_string(policy)
                .map_err(|e| StsError::PolicyValidation(e.to_string())),
        }
    }
}

impl From<Policy> for PolicyInput {
    fn from(policy: Policy) -> Self {
        PolicyInput::Structured(policy)
    }
}

impl From<String> for PolicyInput {
    fn from(raw: String) -> Self {
        PolicyInput::Raw(raw)
    }
}

impl From<&str> for PolicyInput {
    fn from(raw: &str) -> Self {
        PolicyInput::Raw(raw.to_string())
    }
}
