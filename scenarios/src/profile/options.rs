//! Runtime options document

use serde::{Deserialize, Serialize};

use super::{LoadProfile, ThresholdSet};

/// Load stages plus thresholds, in the shape the runtime reads:
///
/// ```json
/// {
///   "stages": [{ "duration": "1m", "target": 20 }],
///   "thresholds": { "http_req_duration": ["p(95)<400"] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Options {
    pub stages: LoadProfile,
    #[serde(default, skip_serializing_if = "ThresholdSet::is_empty")]
    pub thresholds: ThresholdSet,
}

impl Options {
    pub fn new(stages: LoadProfile, thresholds: ThresholdSet) -> Self {
        Self { stages, thresholds }
    }

    /// Serialize to the runtime's JSON options document
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse an options document, validating stages and thresholds
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
