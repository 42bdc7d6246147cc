//! Common Test Utilities for Integration Tests
//!
//! An in-process axum backend that mimics the QuickPizza, posts and cat
//! fact APIs on a loopback port, recording every request it serves.

#![allow(dead_code)]

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use load_scenarios::config::{CatFactConfig, HttpConfig, PostsConfig, QuickPizzaConfig};
use load_scenarios::Config;
use metrics::Key;
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use serde_json::{Value, json};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// A request as seen by the backend
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

/// Canned answers for the steps a test wants to steer
#[derive(Debug, Clone)]
pub struct Behavior {
    pub login: (u16, Value),
    pub order: (u16, Value),
    pub created: (u16, Value),
    pub posts: Value,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            login: (200, json!({"token": "abc"})),
            order: (200, json!({"pizza": {"id": 7, "name": "Margherita"}})),
            created: (201, json!({"id": 101})),
            posts: json!([{"id": 1, "title": "first"}, {"id": 2, "title": "second"}]),
        }
    }
}

#[derive(Clone)]
struct BackendState {
    behavior: Arc<Behavior>,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Handle to a running test backend
pub struct TestBackend {
    pub addr: SocketAddr,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestBackend {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Configuration pointing every scenario at this backend, with no think time
    pub fn config(&self) -> Config {
        Config {
            quickpizza: QuickPizzaConfig {
                base_url: self.base_url(),
                ..QuickPizzaConfig::default()
            },
            posts: PostsConfig {
                base_url: self.base_url(),
            },
            catfact: CatFactConfig {
                url: format!("{}/fact", self.base_url()),
            },
            http: HttpConfig {
                request_timeout: Duration::from_secs(5),
                pool_max_idle_per_host: 16,
            },
            think_time: Duration::ZERO,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().unwrap().clone()
    }

    /// Paths served for `method`, in arrival order
    pub fn paths(&self, method: &str) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .map(|r| r.path)
            .collect()
    }
}

fn reply((status, body): &(u16, Value)) -> Response {
    let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body.clone())).into_response()
}

async fn record(State(state): State<BackendState>, req: Request, next: Next) -> Response {
    let authorization = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.recorded.lock().unwrap().push(RecordedRequest {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        authorization,
    });
    next.run(req).await
}

async fn login(State(state): State<BackendState>) -> Response {
    reply(&state.behavior.login)
}

async fn order(State(state): State<BackendState>) -> Response {
    reply(&state.behavior.order)
}

async fn rate(Json(body): Json<Value>) -> Response {
    if body.get("pizza_id").is_some_and(|id| !id.is_null()) {
        (StatusCode::CREATED, Json(json!({"id": 1}))).into_response()
    } else {
        StatusCode::BAD_REQUEST.into_response()
    }
}

async fn create_post(State(state): State<BackendState>) -> Response {
    reply(&state.behavior.created)
}

async fn list_posts(State(state): State<BackendState>) -> Json<Value> {
    Json(state.behavior.posts.clone())
}

async fn read_post(Path(id): Path<String>) -> Json<Value> {
    Json(json!({"id": id, "title": "stored title", "body": "stored body"}))
}

async fn delete_post() -> Json<Value> {
    Json(json!({}))
}

async fn comments(Path(id): Path<String>) -> Json<Value> {
    Json(json!([{"id": 1, "postId": id, "body": "nice"}]))
}

async fn fact() -> Json<Value> {
    Json(json!({"fact": "Cats have five toes on their front paws.", "length": 40}))
}

fn create_test_app(state: BackendState) -> Router {
    Router::new()
        .route("/api/users/token/login", post(login))
        .route("/api/pizza", post(order))
        .route("/api/ratings", post(rate))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/:id", get(read_post).delete(delete_post))
        .route("/posts/:id/comments", get(comments))
        .route("/fact", get(fact))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

/// Start a backend on an ephemeral loopback port
pub async fn spawn_backend(behavior: Behavior) -> anyhow::Result<TestBackend> {
    let state = BackendState {
        behavior: Arc::new(behavior),
        recorded: Arc::new(Mutex::new(Vec::new())),
    };
    let recorded = state.recorded.clone();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = create_test_app(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestBackend { addr, recorded })
}

/// An address with nothing listening on it
pub async fn closed_addr() -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}

// ============================================================================
// Metrics capture
// ============================================================================

/// Records everything emitted through the `metrics` facade while a test runs
pub struct MetricsCapture {
    recorder: DebuggingRecorder,
    snapshotter: Snapshotter,
}

impl MetricsCapture {
    pub fn new() -> Self {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        Self {
            recorder,
            snapshotter,
        }
    }

    /// Drive `fut` to completion on a current-thread runtime with the
    /// recorder installed for this thread
    pub fn run<F: Future>(&self, fut: F) -> F::Output {
        metrics::with_local_recorder(&self.recorder, || {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime")
                .block_on(fut)
        })
    }

    /// Take the recorded values. Histogram samples are drained.
    pub fn snapshot(&self) -> CapturedMetrics {
        CapturedMetrics {
            entries: self
                .snapshotter
                .snapshot()
                .into_vec()
                .into_iter()
                .map(|(key, _, _, value)| (key.key().clone(), value))
                .collect(),
        }
    }
}

pub struct CapturedMetrics {
    entries: Vec<(Key, DebugValue)>,
}

impl CapturedMetrics {
    fn matching<'a>(
        &'a self,
        name: &'a str,
        labels: &'a [(&'a str, &'a str)],
    ) -> impl Iterator<Item = &'a DebugValue> + 'a {
        self.entries
            .iter()
            .filter(move |(key, _)| {
                key.name() == name
                    && labels.iter().all(|(k, v)| {
                        key.labels().any(|label| label.key() == *k && label.value() == *v)
                    })
            })
            .map(|(_, value)| value)
    }

    /// Sum of every counter named `name` carrying all of `labels`
    pub fn counter(&self, name: &str, labels: &[(&str, &str)]) -> u64 {
        self.matching(name, labels)
            .map(|value| match value {
                DebugValue::Counter(n) => *n,
                _ => 0,
            })
            .sum()
    }

    /// Number of histogram samples named `name` carrying all of `labels`
    pub fn samples(&self, name: &str, labels: &[(&str, &str)]) -> usize {
        self.matching(name, labels)
            .map(|value| match value {
                DebugValue::Histogram(samples) => samples.len(),
                _ => 0,
            })
            .sum()
    }
}
