//! Scenarios and the building blocks their iterations are made of
//!
//! An iteration is a linear pipeline of steps. Each step builds a request,
//! sends it, validates the response and extracts what the next step needs.
//! The first failing step ends the iteration with a [`StepFailure`]; the
//! executor turns that into exactly one error-counter increment.

mod catfact;
mod context;
mod posts;
mod quickpizza;
mod step;

pub use catfact::CatFact;
pub use context::{AuthToken, IterationContext, ResourceId};
pub use posts::PostsCrud;
pub use quickpizza::QuickPizza;
pub use step::{
    CheckGroup, StepFailure, StepResult, expect_status, parse_json, require_array,
    require_field, require_id,
};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::checks::CheckRegistry;
use crate::http::{HttpClient, HttpRequest, HttpResponse};
use crate::profile::{Options, ProfileError};

/// A scripted load-test scenario
#[async_trait]
pub trait Scenario: Send + Sync {
    /// Name used in logs and summaries
    fn name(&self) -> &'static str;

    /// Load stages and thresholds handed to the runtime
    fn options(&self) -> Result<Options, ProfileError>;

    /// Run one iteration for one virtual user
    async fn iterate(&self, vu: &VuContext) -> StepResult<()>;
}

/// Handles available to one virtual-user iteration
#[derive(Clone)]
pub struct VuContext {
    client: Arc<dyn HttpClient>,
    checks: CheckRegistry,
    think_time: Duration,
    /// Virtual-user id assigned by the runtime
    pub vu: u64,
    /// Iteration number within this virtual user
    pub iteration: u64,
}

impl VuContext {
    pub fn new(
        client: Arc<dyn HttpClient>,
        checks: CheckRegistry,
        think_time: Duration,
        vu: u64,
        iteration: u64,
    ) -> Self {
        Self {
            client,
            checks,
            think_time,
            vu,
            iteration,
        }
    }

    /// Send a request for `step`, mapping transport errors to a step failure
    pub async fn send(&self, step: &'static str, request: HttpRequest) -> StepResult<HttpResponse> {
        self.client
            .send(request)
            .await
            .map_err(|source| StepFailure::Transport { step, source })
    }

    /// Start a group of named checks for `step`
    pub fn checks(&self, step: &'static str) -> CheckGroup<'_> {
        CheckGroup::new(&self.checks, step)
    }

    /// Pause for the configured think time
    pub async fn think(&self) {
        if !self.think_time.is_zero() {
            tokio::time::sleep(self.think_time).await;
        }
    }
}
