//! Load Scenarios Library
//!
//! Scripted HTTP load-test scenarios for an external load-generation runtime.
//! Each scenario declares its load profile and thresholds, and exposes one
//! iteration entry point that the runtime calls per virtual user.

pub mod checks;
pub mod config;
pub mod executor;
pub mod http;
pub mod profile;
pub mod scenario;
pub mod telemetry;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use checks::{CheckRegistry, ErrorCounter};
pub use config::Config;
pub use executor::{Executor, RunSummary};
pub use http::{HttpClient, HttpRequest, HttpResponse, Method, ReqwestClient};
pub use profile::{LoadProfile, Options, Stage, Threshold, ThresholdSet};
pub use scenario::{Scenario, StepFailure, StepResult, VuContext};
