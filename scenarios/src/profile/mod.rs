//! Declarative load configuration consumed by the load-generation runtime
//!
//! This module provides:
//! - `Stage` and `LoadProfile` for the ramp-up/steady/ramp-down shape
//! - `Threshold` and `ThresholdSet` for end-of-run pass/fail expressions
//! - `Options` bundling both into the runtime's JSON options document
//!
//! Nothing here schedules virtual users or evaluates thresholds; the runtime
//! reads these values once before execution begins.

mod duration;
mod options;
mod stage;
mod threshold;

pub use duration::{format_duration, parse_duration};
pub use options::Options;
pub use stage::{LoadProfile, ProfileError, Stage};
pub use threshold::{Aggregation, Comparison, Threshold, ThresholdError, ThresholdSet};

/// Built-in metric names the runtime records for every request
pub mod builtin {
    /// Request duration histogram, in milliseconds
    pub const HTTP_REQ_DURATION: &str = "http_req_duration";
    /// Rate of failed requests
    pub const HTTP_REQ_FAILED: &str = "http_req_failed";
    /// Total requests issued
    pub const HTTP_REQS: &str = "http_reqs";
}
