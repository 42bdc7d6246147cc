//! Single GET against a cat fact endpoint

use async_trait::async_trait;
use std::time::Duration;

use super::step::StepResult;
use super::{Scenario, VuContext};
use crate::config::CatFactConfig;
use crate::http::HttpRequest;
use crate::profile::{LoadProfile, Options, ProfileError, Stage, Threshold, ThresholdSet, builtin};

const FETCH: &str = "fetch fact";

/// Fetch one fact per iteration, then think
#[derive(Debug, Clone)]
pub struct CatFact {
    config: CatFactConfig,
}

impl CatFact {
    pub fn new(config: CatFactConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Scenario for CatFact {
    fn name(&self) -> &'static str {
        "catfact"
    }

    fn options(&self) -> Result<Options, ProfileError> {
        let stages = LoadProfile::new(vec![
            Stage::new(Duration::from_secs(60), 20),
            Stage::new(Duration::from_secs(120), 50),
            Stage::new(Duration::from_secs(180), 100),
            Stage::new(Duration::from_secs(120), 60),
            Stage::new(Duration::from_secs(60), 0),
        ])?;
        let mut thresholds = ThresholdSet::new();
        thresholds.insert(
            builtin::HTTP_REQ_DURATION,
            Threshold::percentile_below(95.0, 500.0),
        );
        thresholds.insert(builtin::HTTP_REQ_FAILED, Threshold::rate_below(0.01));
        Ok(Options::new(stages, thresholds))
    }

    async fn iterate(&self, vu: &VuContext) -> StepResult<()> {
        let resp = vu.send(FETCH, HttpRequest::get(&self.config.url)).await?;
        let body = resp.json().ok();
        vu.checks(FETCH)
            .check("status is 200", resp.status == 200)
            .check(
                "response body has fact",
                body.as_ref().is_some_and(|b| b.get("fact").is_some()),
            )
            .finish()?;

        vu.think().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::CheckRegistry;
    use crate::http::{HttpResponse, Method};
    use crate::test_utils::StubClient;
    use std::sync::Arc;

    fn scenario() -> CatFact {
        CatFact::new(CatFactConfig {
            url: "http://cats.test/fact".to_string(),
        })
    }

    #[tokio::test]
    async fn test_fact_present() {
        let stub = Arc::new(StubClient::new().route(
            Method::Get,
            "/fact",
            HttpResponse::new(200, r#"{"fact":"Cats sleep a lot.","length":17}"#),
        ));
        let checks = CheckRegistry::new();
        let vu = VuContext::new(stub.clone(), checks.clone(), Duration::ZERO, 1, 0);

        scenario().iterate(&vu).await.unwrap();
        assert_eq!(stub.requests().len(), 1);
        assert_eq!(checks.pass_rate(), 1.0);
    }

    #[tokio::test]
    async fn test_missing_fact_fails_check() {
        let stub = Arc::new(StubClient::new().route(
            Method::Get,
            "/fact",
            HttpResponse::new(200, r#"{"length":0}"#),
        ));
        let checks = CheckRegistry::new();
        let vu = VuContext::new(stub, checks.clone(), Duration::ZERO, 1, 0);

        let err = scenario().iterate(&vu).await.unwrap_err();
        assert_eq!(err.kind(), "checks");
        assert_eq!(checks.pass_rate(), 0.5);
    }

    #[test]
    fn test_options() {
        let options = scenario().options().unwrap();
        assert_eq!(options.stages.stages().len(), 5);
        assert_eq!(options.stages.peak_target(), 100);
        assert_eq!(
            options.thresholds.get("http_req_duration").unwrap()[0].to_string(),
            "p(95)<500"
        );
    }
}
