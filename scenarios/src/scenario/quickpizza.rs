//! QuickPizza order flow: log in, order a pizza, rate it
//!
//! Each step depends on the previous one: the login token authorizes the
//! order, and the ordered pizza's id is what gets rated.

use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::context::{AuthToken, IterationContext};
use super::step::{StepFailure, StepResult, expect_status, parse_json, require_field, require_id};
use super::{Scenario, VuContext};
use crate::config::QuickPizzaConfig;
use crate::http::HttpRequest;
use crate::profile::{LoadProfile, Options, ProfileError, Stage, Threshold, ThresholdSet, builtin};

const LOGIN: &str = "login";
const ORDER: &str = "order pizza";
const RATE: &str = "rate pizza";

const CHECK_ORDER_STATUS: &str = "Order Pizza Status Code is 200";
const CHECK_PIZZA_NAME: &str = "Pizza Name is not null";
const CHECK_RATE_STATUS: &str = "Rate Pizza Status Code is 201 or 200";

const TAG_ORDER: &str = "Order Pizza";
const TAG_RATE: &str = "Rate Pizza";

/// Log in, order a pizza with the token, then rate that pizza
#[derive(Debug, Clone)]
pub struct QuickPizza {
    config: QuickPizzaConfig,
}

impl QuickPizza {
    pub fn new(config: QuickPizzaConfig) -> Self {
        Self { config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn login(&self, vu: &VuContext, ctx: &mut IterationContext) -> StepResult<()> {
        let request = HttpRequest::post(self.url("/api/users/token/login")).json(json!({
            "username": self.config.username,
            "password": self.config.password,
        }));

        let resp = vu.send(LOGIN, request).await?;
        expect_status(LOGIN, &resp, &[200])?;
        let body = parse_json(LOGIN, &resp)?;
        let token = require_field(LOGIN, &body, "token")
            .ok()
            .and_then(AuthToken::from_json)
            .ok_or(StepFailure::MissingField {
                step: LOGIN,
                field: "token",
            })?;

        ctx.set_token(token);
        Ok(())
    }

    async fn order(&self, vu: &VuContext, ctx: &mut IterationContext) -> StepResult<()> {
        let token = ctx.token(ORDER)?;
        let request = HttpRequest::post(self.url("/api/pizza"))
            .json(json!({
                "maxCaloriesPerSlice": 1000,
                "mustBeVegetarian": false,
                "excludedIngredients": [],
                "excludedTools": [],
                "maxNumberOfToppings": 5,
                "minNumberOfToppings": 2,
                "customName": "",
            }))
            .header("authorization", token.header_value());

        let resp = vu.send(ORDER, request).await?;
        let body = parse_json(ORDER, &resp)?;
        let pizza = require_field(ORDER, &body, "pizza")?;

        vu.checks(ORDER)
            .tagged(TAG_ORDER)
            .check(CHECK_ORDER_STATUS, resp.status == 200)
            .check(
                CHECK_PIZZA_NAME,
                pizza.get("name").is_none_or(|name| !name.is_null()),
            )
            .finish()?;

        let pizza_id = require_id(ORDER, pizza, "id")?;
        debug!(pizza_id = %pizza_id, "Pizza ordered");
        ctx.set_resource_id(pizza_id);
        Ok(())
    }

    async fn rate(&self, vu: &VuContext, ctx: &IterationContext) -> StepResult<()> {
        let token = ctx.token(RATE)?;
        let pizza_id = ctx.resource_id(RATE)?;
        let stars: u32 = rand::rng().random_range(1..=6);

        let request = HttpRequest::post(self.url("/api/ratings"))
            .json(json!({
                "pizza_id": pizza_id.to_json(),
                "stars": stars,
            }))
            .header("authorization", token.header_value());

        let resp = vu.send(RATE, request).await?;
        vu.checks(RATE)
            .tagged(TAG_RATE)
            .check(CHECK_RATE_STATUS, resp.status == 201 || resp.status == 200)
            .finish()
    }
}

#[async_trait]
impl Scenario for QuickPizza {
    fn name(&self) -> &'static str {
        "quickpizza"
    }

    fn options(&self) -> Result<Options, ProfileError> {
        let stages = LoadProfile::new(vec![
            Stage::new(Duration::from_secs(60), 100),
            Stage::new(Duration::from_secs(120), 200),
            Stage::new(Duration::from_secs(60), 0),
        ])?;
        let mut thresholds = ThresholdSet::new();
        thresholds.insert(
            builtin::HTTP_REQ_DURATION,
            Threshold::percentile_below(95.0, 400.0),
        );
        thresholds.insert(builtin::HTTP_REQ_FAILED, Threshold::rate_below(0.01));
        Ok(Options::new(stages, thresholds))
    }

    async fn iterate(&self, vu: &VuContext) -> StepResult<()> {
        let mut ctx = IterationContext::new();
        self.login(vu, &mut ctx).await?;
        self.order(vu, &mut ctx).await?;
        self.rate(vu, &ctx).await
    }
}
