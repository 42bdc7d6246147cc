//! Named check tallies

use dashmap::DashMap;
use metrics::Label;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
struct CheckTally {
    tag: Option<String>,
    passes: AtomicU64,
    fails: AtomicU64,
}

/// Aggregated outcome of one named check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub passes: u64,
    pub fails: u64,
}

/// Concurrent registry of check outcomes, keyed by check name
#[derive(Debug, Clone, Default)]
pub struct CheckRegistry {
    tallies: Arc<DashMap<String, CheckTally>>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one outcome and return it
    pub fn record(&self, name: &str, passed: bool) -> bool {
        self.record_tagged(name, None, passed)
    }

    /// Record one outcome of a check carrying a `tag`, and return it.
    ///
    /// A check keeps the tag it was first recorded with.
    pub fn record_tagged(&self, name: &str, tag: Option<&str>, passed: bool) -> bool {
        // Avoid allocating the key once the check is known
        let known = self
            .tallies
            .get(name)
            .map(|tally| Self::bump(&tally, passed))
            .is_some();
        if !known {
            let tally = self
                .tallies
                .entry(name.to_string())
                .or_insert_with(|| CheckTally {
                    tag: tag.map(str::to_string),
                    ..CheckTally::default()
                });
            Self::bump(&tally, passed);
        }

        let result = if passed { "pass" } else { "fail" };
        let mut labels = vec![Label::new("check", name.to_string()), Label::new("result", result)];
        if let Some(tag) = tag {
            labels.push(Label::new("tag", tag.to_string()));
        }
        metrics::counter!("checks", labels).increment(1);
        passed
    }

    fn bump(tally: &CheckTally, passed: bool) {
        if passed {
            tally.passes.fetch_add(1, Ordering::Relaxed);
        } else {
            tally.fails.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Snapshot of all tallies, sorted by check name
    pub fn summary(&self) -> Vec<CheckSummary> {
        let mut out: Vec<CheckSummary> = self
            .tallies
            .iter()
            .map(|entry| CheckSummary {
                name: entry.key().clone(),
                tag: entry.tag.clone(),
                passes: entry.passes.load(Ordering::Relaxed),
                fails: entry.fails.load(Ordering::Relaxed),
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Tallies recorded since `baseline` was taken with [`summary`](Self::summary).
    ///
    /// Checks with no outcome in between are left out.
    pub fn summary_since(&self, baseline: &[CheckSummary]) -> Vec<CheckSummary> {
        self.summary()
            .into_iter()
            .filter_map(|mut current| {
                if let Some(before) = baseline.iter().find(|b| b.name == current.name) {
                    current.passes -= before.passes;
                    current.fails -= before.fails;
                }
                (current.passes + current.fails > 0).then_some(current)
            })
            .collect()
    }

    /// Fraction of passed checks across all names (1.0 when nothing was recorded)
    pub fn pass_rate(&self) -> f64 {
        pass_rate(&self.summary())
    }
}

/// Fraction of passed checks in `summary` (1.0 when it is empty)
pub fn pass_rate(summary: &[CheckSummary]) -> f64 {
    let (passes, total) = summary.iter().fold((0u64, 0u64), |(p, t), s| {
        (p + s.passes, t + s.passes + s.fails)
    });
    if total == 0 {
        1.0
    } else {
        passes as f64 / total as f64
    }
}
