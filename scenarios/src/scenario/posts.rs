//! Posts CRUD against a JSONPlaceholder-style API
//!
//! Two groups per iteration:
//! 1. create a post, read it back by the returned id, delete it
//! 2. list posts, then fetch the comments of the first one

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{Instrument, debug, info_span};

use super::context::IterationContext;
use super::step::{StepResult, parse_json, require_array, require_id};
use super::{Scenario, VuContext};
use crate::config::PostsConfig;
use crate::http::HttpRequest;
use crate::profile::{LoadProfile, Options, ProfileError, Stage, Threshold, ThresholdSet, builtin};

const CRUD_GROUP: &str = "User Scenario: Create, Read, and Delete Posts";
const BROWSE_GROUP: &str = "User Scenario: Retrieve Posts and Comments";

const CREATE: &str = "create post";
const READ: &str = "read post";
const DELETE: &str = "delete post";
const LIST: &str = "list posts";
const COMMENTS: &str = "list comments";

/// Create/read/delete a post, then browse posts and comments
#[derive(Debug, Clone)]
pub struct PostsCrud {
    config: PostsConfig,
}

impl PostsCrud {
    pub fn new(config: PostsConfig) -> Self {
        Self { config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn create_read_delete(&self, vu: &VuContext) -> StepResult<()> {
        let mut ctx = IterationContext::new();

        // 1. Create
        let title = format!("Post Title {}", rand::random::<f64>());
        let request = HttpRequest::post(self.url("/posts")).json(json!({
            "title": title,
            "body": "This is a test post body.",
            "userId": 1,
        }));
        let resp = vu.send(CREATE, request).await?;
        let body = resp.json().ok();
        vu.checks(CREATE)
            .check("POST /posts status is 201", resp.status == 201)
            .check(
                "POST /posts response has ID",
                body.as_ref().is_some_and(|b| b.get("id").is_some()),
            )
            .finish()?;
        let body = parse_json(CREATE, &resp)?;
        ctx.set_resource_id(require_id(CREATE, &body, "id")?);

        // 2. Read back by id
        let post_id = ctx.resource_id(READ)?;
        debug!(post_id = %post_id, "Post created");
        let resp = vu
            .send(READ, HttpRequest::get(self.url(&format!("/posts/{}", post_id))))
            .await?;
        let body = resp.json().ok();
        vu.checks(READ)
            .check("GET /posts/{id} status is 200", resp.status == 200)
            .check(
                "GET /posts/{id} contains title",
                body.as_ref().is_some_and(|b| b.get("title").is_some()),
            )
            .finish()?;

        // 3. Delete
        let post_id = ctx.resource_id(DELETE)?;
        let resp = vu
            .send(DELETE, HttpRequest::delete(self.url(&format!("/posts/{}", post_id))))
            .await?;
        vu.checks(DELETE)
            .check("DELETE /posts/{id} status is 200", resp.status == 200)
            .finish()?;

        vu.think().await;
        Ok(())
    }

    async fn browse(&self, vu: &VuContext) -> StepResult<()> {
        // 1. List posts
        let resp = vu.send(LIST, HttpRequest::get(self.url("/posts"))).await?;
        let body = resp.json().ok();
        vu.checks(LIST)
            .check("GET /posts status is 200", resp.status == 200)
            .check(
                "GET /posts response contains posts",
                body.as_ref()
                    .and_then(|b| b.as_array())
                    .is_some_and(|posts| !posts.is_empty()),
            )
            .finish()?;
        let body = parse_json(LIST, &resp)?;
        let first = &require_array(LIST, &body)?[0];
        let post_id = require_id(LIST, first, "id")?;

        // 2. Comments of the first post
        let resp = vu
            .send(
                COMMENTS,
                HttpRequest::get(self.url(&format!("/posts/{}/comments", post_id))),
            )
            .await?;
        let body = resp.json().ok();
        vu.checks(COMMENTS)
            .check("GET /posts/{id}/comments status is 200", resp.status == 200)
            .check(
                "GET /posts/{id}/comments contains comments",
                body.as_ref()
                    .and_then(|b| b.as_array())
                    .is_some_and(|comments| !comments.is_empty()),
            )
            .finish()?;

        vu.think().await;
        Ok(())
    }
}

#[async_trait]
impl Scenario for PostsCrud {
    fn name(&self) -> &'static str {
        "posts"
    }

    fn options(&self) -> Result<Options, ProfileError> {
        let stages = LoadProfile::new(vec![
            Stage::new(Duration::from_secs(60), 20),
            Stage::new(Duration::from_secs(120), 50),
            Stage::new(Duration::from_secs(180), 0),
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
        self.create_read_delete(vu)
            .instrument(info_span!("group", title = CRUD_GROUP))
            .await?;
        self.browse(vu)
            .instrument(info_span!("group", title = BROWSE_GROUP))
            .await
    }
}
