//! Custom error counter

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default metric name of the custom error counter
pub const ERRORS: &str = "errors";

/// Monotonic run-wide counter.
///
/// Clones share the same total. Increments never lose updates under
/// concurrent use.
#[derive(Debug, Clone)]
pub struct ErrorCounter {
    name: &'static str,
    total: Arc<AtomicU64>,
}

impl ErrorCounter {
    /// Create a counter reported under `name`
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            total: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Increment by `n`
    pub fn add(&self, n: u64) {
        self.total.fetch_add(n, Ordering::Relaxed);
        metrics::counter!(self.name).increment(n);
    }

    /// Current total
    pub fn value(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}

impl Default for ErrorCounter {
    fn default() -> Self {
        Self::new(ERRORS)
    }
}
