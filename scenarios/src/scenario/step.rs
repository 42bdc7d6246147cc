//! Step results and response validators

use serde_json::Value;
use thiserror::Error;

use super::context::ResourceId;
use crate::checks::CheckRegistry;
use crate::http::{HttpResponse, TransportError};

/// Why a step ended its iteration
#[derive(Debug, Error)]
pub enum StepFailure {
    #[error("{step}: {source}")]
    Transport {
        step: &'static str,
        #[source]
        source: TransportError,
    },

    #[error("{step}: expected status {expected:?}, got {actual}")]
    UnexpectedStatus {
        step: &'static str,
        expected: Vec<u16>,
        actual: u16,
    },

    #[error("{step}: malformed JSON body: {source}")]
    MalformedBody {
        step: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{step}: field {field:?} is missing, null or empty")]
    MissingField {
        step: &'static str,
        field: &'static str,
    },

    #[error("{step}: failed checks: {}", .failed.join(", "))]
    ChecksFailed {
        step: &'static str,
        failed: Vec<String>,
    },
}

impl StepFailure {
    /// Step that failed
    pub fn step(&self) -> &'static str {
        match self {
            StepFailure::Transport { step, .. }
            | StepFailure::UnexpectedStatus { step, .. }
            | StepFailure::MalformedBody { step, .. }
            | StepFailure::MissingField { step, .. }
            | StepFailure::ChecksFailed { step, .. } => *step,
        }
    }

    /// Coarse failure class: `transport`, `status`, `shape` or `checks`
    pub fn kind(&self) -> &'static str {
        match self {
            StepFailure::Transport { .. } => "transport",
            StepFailure::UnexpectedStatus { .. } => "status",
            StepFailure::MalformedBody { .. } | StepFailure::MissingField { .. } => "shape",
            StepFailure::ChecksFailed { .. } => "checks",
        }
    }
}

pub type StepResult<T> = Result<T, StepFailure>;

/// Fail unless the status is one of `expected`
pub fn expect_status(step: &'static str, resp: &HttpResponse, expected: &[u16]) -> StepResult<()> {
    if expected.contains(&resp.status) {
        Ok(())
    } else {
        Err(StepFailure::UnexpectedStatus {
            step,
            expected: expected.to_vec(),
            actual: resp.status,
        })
    }
}

/// Parse the body as JSON; a parse error is a shape failure, never fatal
pub fn parse_json(step: &'static str, resp: &HttpResponse) -> StepResult<Value> {
    resp.json()
        .map_err(|source| StepFailure::MalformedBody { step, source })
}

/// Field that is present and not null
pub fn require_field<'a>(
    step: &'static str,
    value: &'a Value,
    field: &'static str,
) -> StepResult<&'a Value> {
    match value.get(field) {
        Some(v) if !v.is_null() => Ok(v),
        _ => Err(StepFailure::MissingField { step, field }),
    }
}

/// Identifier field that is a number or a non-empty string
pub fn require_id(step: &'static str, value: &Value, field: &'static str) -> StepResult<ResourceId> {
    require_field(step, value, field)
        .ok()
        .and_then(ResourceId::from_json)
        .ok_or(StepFailure::MissingField { step, field })
}

/// Top-level value that is a non-empty array
pub fn require_array<'a>(step: &'static str, value: &'a Value) -> StepResult<&'a [Value]> {
    match value.as_array() {
        Some(items) if !items.is_empty() => Ok(items),
        _ => Err(StepFailure::MissingField { step, field: "[]" }),
    }
}

/// Named checks evaluated together, like the runtime's `check()`.
///
/// Every check is recorded even after one fails; the group passes only if
/// all of them pass.
pub struct CheckGroup<'a> {
    registry: &'a CheckRegistry,
    step: &'static str,
    tag: Option<&'static str>,
    failed: Vec<String>,
}

impl<'a> CheckGroup<'a> {
    pub fn new(registry: &'a CheckRegistry, step: &'static str) -> Self {
        Self {
            registry,
            step,
            tag: None,
            failed: Vec::new(),
        }
    }

    /// Tag every check recorded after this call
    pub fn tagged(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn check(mut self, name: &str, passed: bool) -> Self {
        if !self.registry.record_tagged(name, self.tag, passed) {
            self.failed.push(name.to_string());
        }
        self
    }

    pub fn finish(self) -> StepResult<()> {
        if self.failed.is_empty() {
            Ok(())
        } else {
            Err(StepFailure::ChecksFailed {
                step: self.step,
                failed: self.failed,
            })
        }
    }
}
