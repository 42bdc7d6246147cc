//! Per-iteration state carried between dependent steps

use serde_json::Value;
use std::fmt;

use super::step::{StepFailure, StepResult};

/// Non-empty authentication token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// `None` for empty or whitespace-only tokens
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// Read a token from a JSON string value
    pub fn from_json(value: &Value) -> Option<Self> {
        value.as_str().and_then(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value of the `authorization` header, e.g. `Token abc`
    pub fn header_value(&self) -> String {
        format!("Token {}", self.0)
    }
}

/// Identifier of a resource created or listed by an earlier step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

impl ResourceId {
    /// Numbers and non-empty strings are accepted; anything else is `None`
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(ResourceId::Number),
            Value::String(s) if !s.trim().is_empty() => Some(ResourceId::Text(s.clone())),
            _ => None,
        }
    }

    /// JSON form for request bodies, matching how the server sent it
    pub fn to_json(&self) -> Value {
        match self {
            ResourceId::Number(n) => Value::from(*n),
            ResourceId::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{}", n),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

/// Values produced by one request and needed by the next.
///
/// Created fresh for every iteration and dropped at its end.
#[derive(Debug, Default)]
pub struct IterationContext {
    token: Option<AuthToken>,
    resource_id: Option<ResourceId>,
}

impl IterationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&mut self, token: AuthToken) {
        self.token = Some(token);
    }

    pub fn set_resource_id(&mut self, id: ResourceId) {
        self.resource_id = Some(id);
    }

    /// Token for a dependent request in `step`
    pub fn token(&self, step: &'static str) -> StepResult<&AuthToken> {
        self.token.as_ref().ok_or(StepFailure::MissingField {
            step,
            field: "token",
        })
    }

    /// Resource id for a dependent request in `step`
    pub fn resource_id(&self, step: &'static str) -> StepResult<&ResourceId> {
        self.resource_id.as_ref().ok_or(StepFailure::MissingField {
            step,
            field: "id",
        })
    }
}
