//! Scenario configuration
//!
//! Configuration is loaded from environment variables. Every value has a
//! default pointing at the public demo APIs the scenarios were written for.

use std::env;
use std::time::Duration;

/// Main scenario configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// QuickPizza order flow configuration
    pub quickpizza: QuickPizzaConfig,

    /// Posts CRUD configuration
    pub posts: PostsConfig,

    /// Cat fact configuration
    pub catfact: CatFactConfig,

    /// HTTP client configuration
    pub http: HttpConfig,

    /// Pause between logical groups of steps
    pub think_time: Duration,
}

/// QuickPizza API configuration
#[derive(Debug, Clone)]
pub struct QuickPizzaConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Login username
    pub username: String,
    /// Login password
    pub password: String,
}

/// JSONPlaceholder-style posts API configuration
#[derive(Debug, Clone)]
pub struct PostsConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
}

/// Cat fact endpoint configuration
#[derive(Debug, Clone)]
pub struct CatFactConfig {
    /// Full URL of the fact endpoint
    pub url: String,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Idle connections kept per host
    pub pool_max_idle_per_host: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quickpizza: QuickPizzaConfig::default(),
            posts: PostsConfig::default(),
            catfact: CatFactConfig::default(),
            http: HttpConfig::default(),
            think_time: Duration::from_secs(1),
        }
    }
}

impl Default for QuickPizzaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://quickpizza.grafana.com".to_string(),
            username: "default".to_string(),
            password: "12345678".to_string(),
        }
    }
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://jsonplaceholder.typicode.com".to_string(),
        }
    }
}

impl Default for CatFactConfig {
    fn default() -> Self {
        Self {
            url: "https://catfact.ninja/fact".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 200,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, falling back to
    /// defaults for missing or unparsable values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // QuickPizza config
        if let Some(url) = lookup("QUICKPIZZA_BASE_URL")
            && !url.is_empty()
        {
            config.quickpizza.base_url = trim_base_url(url);
        }
        if let Some(user) = lookup("QUICKPIZZA_USERNAME") {
            config.quickpizza.username = user;
        }
        if let Some(pass) = lookup("QUICKPIZZA_PASSWORD") {
            config.quickpizza.password = pass;
        }

        // Posts config
        if let Some(url) = lookup("POSTS_BASE_URL")
            && !url.is_empty()
        {
            config.posts.base_url = trim_base_url(url);
        }

        // Cat fact config
        if let Some(url) = lookup("CATFACT_URL")
            && !url.is_empty()
        {
            config.catfact.url = url;
        }

        // HTTP config
        if let Some(val) = lookup("REQUEST_TIMEOUT_SECS")
            && let Ok(secs) = val.parse::<u64>()
        {
            config.http.request_timeout = Duration::from_secs(secs);
        }
        if let Some(val) = lookup("POOL_MAX_IDLE_PER_HOST")
            && let Ok(n) = val.parse()
        {
            config.http.pool_max_idle_per_host = n;
        }

        if let Some(val) = lookup("THINK_TIME_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.think_time = Duration::from_millis(ms);
        }

        config
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
