//! Load stages and the load profile they form

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while declaring a load profile
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("Load profile must contain at least one stage")]
    Empty,

    #[error("Stage {index} has a zero duration")]
    ZeroDuration { index: usize },

    #[error("Invalid duration: {0:?}")]
    InvalidDuration(String),
}

/// A time window with a target virtual-user concurrency level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// How long the runtime takes to move to `target`
    #[serde(with = "super::duration::text")]
    pub duration: Duration,
    /// Virtual users at the end of the stage
    pub target: u32,
}

impl Stage {
    pub fn new(duration: Duration, target: u32) -> Self {
        Self { duration, target }
    }

    /// Build a stage from duration text such as `"1m"`
    pub fn parse(duration: &str, target: u32) -> Result<Self, ProfileError> {
        Ok(Self {
            duration: super::parse_duration(duration)?,
            target,
        })
    }
}

/// Ordered stage sequence describing load over time.
///
/// Immutable once built: stages are only reachable through shared slices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Stage>", into = "Vec<Stage>")]
pub struct LoadProfile {
    stages: Vec<Stage>,
}

impl LoadProfile {
    /// Validate and build a profile
    pub fn new(stages: Vec<Stage>) -> Result<Self, ProfileError> {
        if stages.is_empty() {
            return Err(ProfileError::Empty);
        }
        if let Some(index) = stages.iter().position(|s| s.duration.is_zero()) {
            return Err(ProfileError::ZeroDuration { index });
        }
        Ok(Self { stages })
    }

    /// Build a profile from `(duration text, target)` pairs
    pub fn from_pairs(pairs: &[(&str, u32)]) -> Result<Self, ProfileError> {
        let stages = pairs
            .iter()
            .map(|(duration, target)| Stage::parse(duration, *target))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(stages)
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Sum of all stage durations
    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }

    /// Highest virtual-user target across all stages
    pub fn peak_target(&self) -> u32 {
        self.stages.iter().map(|s| s.target).max().unwrap_or(0)
    }
}

impl TryFrom<Vec<Stage>> for LoadProfile {
    type Error = ProfileError;

    fn try_from(stages: Vec<Stage>) -> Result<Self, Self::Error> {
        Self::new(stages)
    }
}

impl From<LoadProfile> for Vec<Stage> {
    fn from(profile: LoadProfile) -> Self {
        profile.stages
    }
}
