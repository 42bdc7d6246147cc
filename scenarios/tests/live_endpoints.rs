//! Smoke runs against the public demo APIs
//!
//! Run with: cargo test --test live_endpoints -- --ignored --nocapture
//! Targets can be overridden with the usual environment variables.

use load_scenarios::scenario::{CatFact, PostsCrud, QuickPizza};
use load_scenarios::{Config, Executor, Scenario};
use std::sync::Arc;
use std::time::Duration;

fn live_config() -> Config {
    let mut config = Config::from_env();
    config.think_time = Duration::ZERO;
    config
}

async fn smoke(scenario: Arc<dyn Scenario>, config: &Config) {
    let executor = Executor::from_config(scenario, config).expect("client should build");
    let summary = executor.run_fixed(2, 2).await;
    println!("{}", summary.report());
    assert_eq!(summary.errors, 0, "{}", summary.to_json());
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_live_quickpizza() {
    let config = live_config();
    smoke(Arc::new(QuickPizza::new(config.quickpizza.clone())), &config).await;
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_live_posts() {
    let config = live_config();
    smoke(Arc::new(PostsCrud::new(config.posts.clone())), &config).await;
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_live_catfact() {
    let config = live_config();
    smoke(Arc::new(CatFact::new(config.catfact.clone())), &config).await;
}
