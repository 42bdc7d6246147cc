//! Scenario executor
//!
//! Wraps a [`Scenario`] with the run-wide error counter and check registry.
//! The load-generation runtime calls [`Executor::run_iteration`] once per
//! virtual-user iteration; ramping, pacing and percentile aggregation stay
//! on the runtime's side.
//!
//! [`Executor::run_fixed`] is a fixed-iteration driver for smoke runs and
//! tests: a set number of virtual users, each running a set number of
//! iterations back to back.

use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::checks::{self, CheckRegistry, CheckSummary, ErrorCounter};
use crate::config::Config;
use crate::http::{HttpClient, ReqwestClient};
use crate::scenario::{Scenario, VuContext};

/// Runs iterations of one scenario
#[derive(Clone)]
pub struct Executor {
    scenario: Arc<dyn Scenario>,
    client: Arc<dyn HttpClient>,
    checks: CheckRegistry,
    errors: ErrorCounter,
    think_time: Duration,
}

impl Executor {
    /// Create an executor with fresh counters and no think time
    pub fn new(scenario: Arc<dyn Scenario>, client: Arc<dyn HttpClient>) -> Self {
        Self {
            scenario,
            client,
            checks: CheckRegistry::new(),
            errors: ErrorCounter::default(),
            think_time: Duration::ZERO,
        }
    }

    /// Create an executor backed by a real HTTP client built from `config`
    pub fn from_config(scenario: Arc<dyn Scenario>, config: &Config) -> Result<Self, reqwest::Error> {
        let client = ReqwestClient::new(&config.http)?;
        Ok(Self::new(scenario, Arc::new(client)).with_think_time(config.think_time))
    }

    pub fn with_think_time(mut self, think_time: Duration) -> Self {
        self.think_time = think_time;
        self
    }

    /// Share an error counter owned by the runtime
    pub fn with_error_counter(mut self, errors: ErrorCounter) -> Self {
        self.errors = errors;
        self
    }

    /// Share a check registry owned by the runtime
    pub fn with_check_registry(mut self, checks: CheckRegistry) -> Self {
        self.checks = checks;
        self
    }

    pub fn scenario(&self) -> &dyn Scenario {
        self.scenario.as_ref()
    }

    pub fn errors(&self) -> &ErrorCounter {
        &self.errors
    }

    pub fn checks(&self) -> &CheckRegistry {
        &self.checks
    }

    /// Run one iteration for virtual user `vu`.
    ///
    /// A failed iteration adds exactly one to the error counter. Returns
    /// whether the iteration completed.
    pub async fn run_iteration(&self, vu: u64, iteration: u64) -> bool {
        let ctx = VuContext::new(
            self.client.clone(),
            self.checks.clone(),
            self.think_time,
            vu,
            iteration,
        );
        let span = info_span!("iteration", scenario = self.scenario.name(), vu, iteration);

        match self.scenario.iterate(&ctx).instrument(span).await {
            Ok(()) => true,
            Err(failure) => {
                debug!(
                    scenario = self.scenario.name(),
                    vu,
                    iteration,
                    step = failure.step(),
                    kind = failure.kind(),
                    error = %failure,
                    "Iteration failed"
                );
                self.errors.add(1);
                false
            }
        }
    }

    /// Run `vus` virtual users concurrently, each for `iterations_per_vu`
    /// back-to-back iterations
    pub async fn run_fixed(&self, vus: u64, iterations_per_vu: u64) -> RunSummary {
        let start = Instant::now();
        let errors_before = self.errors.value();
        let checks_before = self.checks.summary();
        info!(
            scenario = self.scenario.name(),
            vus, iterations_per_vu, "Starting fixed-iteration run"
        );

        let mut handles = Vec::with_capacity(vus as usize);
        for vu in 1..=vus {
            let executor = self.clone();
            handles.push(tokio::spawn(async move {
                let mut failed = 0u64;
                for iteration in 0..iterations_per_vu {
                    if !executor.run_iteration(vu, iteration).await {
                        failed += 1;
                    }
                }
                failed
            }));
        }

        let mut failed_iterations = 0u64;
        for handle in handles {
            match handle.await {
                Ok(failed) => failed_iterations += failed,
                Err(e) => warn!("Virtual user task aborted: {}", e),
            }
        }

        let run_checks = self.checks.summary_since(&checks_before);
        let summary = RunSummary {
            scenario: self.scenario.name().to_string(),
            vus,
            iterations: vus * iterations_per_vu,
            failed_iterations,
            errors: self.errors.value() - errors_before,
            check_pass_rate: checks::pass_rate(&run_checks),
            checks: run_checks,
            duration: start.elapsed(),
        };
        info!(
            scenario = %summary.scenario,
            iterations = summary.iterations,
            errors = summary.errors,
            "Run complete"
        );
        summary
    }
}

/// Outcome of a fixed-iteration run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub scenario: String,
    pub vus: u64,
    pub iterations: u64,
    pub failed_iterations: u64,
    /// Error-counter increments during this run
    pub errors: u64,
    /// Pass rate of the checks recorded during this run
    pub check_pass_rate: f64,
    /// Check outcomes recorded during this run
    pub checks: Vec<CheckSummary>,
    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,
}

fn serialize_secs<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}

impl RunSummary {
    /// Human-readable report
    pub fn report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== {} ===\n\n", self.scenario));
        report.push_str(&format!("Duration: {:.2}s\n", self.duration.as_secs_f64()));
        report.push_str(&format!("Virtual users: {}\n", self.vus));
        report.push_str(&format!(
            "Iterations: {} ({} failed)\n",
            self.iterations, self.failed_iterations
        ));
        report.push_str(&format!("errors: {}\n\n", self.errors));

        report.push_str(&format!(
            "Checks: {:.2}% passed\n",
            self.check_pass_rate * 100.0
        ));
        for check in &self.checks {
            let mark = if check.fails == 0 { "✓" } else { "✗" };
            report.push_str(&format!(
                "  {} {} ({} passed, {} failed)\n",
                mark, check.name, check.passes, check.fails
            ));
        }
        report
    }

    /// Compact JSON for CI parsing
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
