//! Threshold expressions such as `p(95)<400` or `rate<0.01`
//!
//! Thresholds are parsed and rendered here so scenarios can declare them with
//! type checking. The runtime evaluates them against aggregated metrics at the
//! end of a run.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while parsing a threshold expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThresholdError {
    #[error("Threshold {0:?} has no comparison operator")]
    MissingOperator(String),

    #[error("Unknown aggregation: {0:?}")]
    UnknownAggregation(String),

    #[error("Invalid percentile: {0:?}")]
    InvalidPercentile(String),

    #[error("Invalid threshold bound: {0:?}")]
    InvalidBound(String),
}

/// How samples of a metric are aggregated before comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregation {
    Avg,
    Min,
    Max,
    Med,
    Count,
    Rate,
    /// Percentile in `0..=100`
    Percentile(f64),
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Avg => f.write_str("avg"),
            Aggregation::Min => f.write_str("min"),
            Aggregation::Max => f.write_str("max"),
            Aggregation::Med => f.write_str("med"),
            Aggregation::Count => f.write_str("count"),
            Aggregation::Rate => f.write_str("rate"),
            Aggregation::Percentile(p) => write!(f, "p({})", p),
        }
    }
}

impl FromStr for Aggregation {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avg" => Ok(Aggregation::Avg),
            "min" => Ok(Aggregation::Min),
            "max" => Ok(Aggregation::Max),
            "med" => Ok(Aggregation::Med),
            "count" => Ok(Aggregation::Count),
            "rate" => Ok(Aggregation::Rate),
            _ => {
                let inner = s
                    .strip_prefix("p(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .ok_or_else(|| ThresholdError::UnknownAggregation(s.to_string()))?;
                let p: f64 = inner
                    .trim()
                    .parse()
                    .map_err(|_| ThresholdError::InvalidPercentile(s.to_string()))?;
                if !(0.0..=100.0).contains(&p) {
                    return Err(ThresholdError::InvalidPercentile(s.to_string()));
                }
                Ok(Aggregation::Percentile(p))
            }
        }
    }
}

/// Comparison between the aggregated value and the bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Comparison {
    /// Two-character operators first so `<=` is not read as `<`
    const OPERATORS: [(&'static str, Comparison); 6] = [
        ("<=", Comparison::Le),
        (">=", Comparison::Ge),
        ("==", Comparison::Eq),
        ("!=", Comparison::Ne),
        ("<", Comparison::Lt),
        (">", Comparison::Gt),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
        }
    }
}

/// A single threshold expression, e.g. `p(95)<400`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub aggregation: Aggregation,
    pub comparison: Comparison,
    pub bound: f64,
}

impl Threshold {
    pub fn new(aggregation: Aggregation, comparison: Comparison, bound: f64) -> Self {
        Self {
            aggregation,
            comparison,
            bound,
        }
    }

    /// `p(N) < bound`
    pub fn percentile_below(percentile: f64, bound: f64) -> Self {
        Self::new(Aggregation::Percentile(percentile), Comparison::Lt, bound)
    }

    /// `rate < bound`
    pub fn rate_below(bound: f64) -> Self {
        Self::new(Aggregation::Rate, Comparison::Lt, bound)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.aggregation,
            self.comparison.as_str(),
            self.bound
        )
    }
}

impl FromStr for Threshold {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expr = s.trim();
        let (pos, op, comparison) = Comparison::OPERATORS
            .iter()
            .filter_map(|(op, cmp)| expr.find(op).map(|pos| (pos, *op, *cmp)))
            .min_by_key(|(pos, op, _)| (*pos, std::cmp::Reverse(op.len())))
            .ok_or_else(|| ThresholdError::MissingOperator(s.to_string()))?;

        let aggregation: Aggregation = expr[..pos].trim().parse()?;
        let bound_text = expr[pos + op.len()..].trim();
        let bound: f64 = bound_text
            .parse()
            .map_err(|_| ThresholdError::InvalidBound(bound_text.to_string()))?;
        if !bound.is_finite() {
            return Err(ThresholdError::InvalidBound(bound_text.to_string()));
        }

        Ok(Self {
            aggregation,
            comparison,
            bound,
        })
    }
}

impl Serialize for Threshold {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Threshold {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Threshold expressions keyed by metric name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdSet {
    entries: BTreeMap<String, Vec<Threshold>>,
}

impl ThresholdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parsed expression for `metric`
    pub fn with(mut self, metric: &str, expr: &str) -> Result<Self, ThresholdError> {
        let threshold = expr.parse()?;
        self.insert(metric, threshold);
        Ok(self)
    }

    pub fn insert(&mut self, metric: &str, threshold: Threshold) {
        self.entries
            .entry(metric.to_string())
            .or_default()
            .push(threshold);
    }

    pub fn get(&self, metric: &str) -> Option<&[Threshold]> {
        self.entries.get(metric).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
