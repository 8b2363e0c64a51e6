// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Pattern descriptors and seeker configuration.
//!
//! A [`PatternDescriptor`] is everything a seeker needs: the ordered stages,
//! the initial auxiliary data copied into every new attempt, and a
//! [`SeekerConfig`] (lookback capacity and spawn policy). The config half is
//! plain data and can be deserialized from any `serde` format; the stages
//! hold closures and are always built in code.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pattern::stage::Stage;

/// When the seeker starts a new attempt at stage 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Spawn only when no attempt is in flight: at most one at a time.
    Single,
    /// Spawn whenever no attempt sits at stage 0, so overlapping
    /// occurrences are tracked by independent attempts.
    #[default]
    Parallel,
}

/// Plain-data part of a pattern descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekerConfig {
    /// Lookback capacity. Negative values are rejected at construction.
    pub lookback: i64,
    /// Spawn policy.
    pub spawn: SpawnPolicy,
}

impl SeekerConfig {
    /// Validates the lookback capacity.
    pub fn lookback_capacity(&self) -> Result<usize, ConfigError> {
        usize::try_from(self.lookback).map_err(|_| ConfigError::NegativeLookback(self.lookback))
    }
}

/// Ordered stages plus the initial data and configuration of a pattern.
///
/// # Examples
///
/// ```
/// use seeker::pattern::descriptor::{PatternDescriptor, SpawnPolicy};
/// use seeker::pattern::stage::Stage;
///
/// let pattern = PatternDescriptor::new(())
///     .stage(Stage::when(|v: &i32, _, _| *v == 10))
///     .stage(Stage::when(|v: &i32, _, prev: Option<&i32>| prev.is_some_and(|p| p + 1 == *v)))
///     .lookback(10)
///     .spawn(SpawnPolicy::Single);
/// assert_eq!(pattern.stage_count(), 2);
/// ```
#[derive(Debug)]
pub struct PatternDescriptor<T, G> {
    pub(crate) stages: Vec<Stage<T, G>>,
    pub(crate) initial_data: G,
    pub(crate) config: SeekerConfig,
}

impl<T, G> PatternDescriptor<T, G> {
    /// Starts a descriptor with no stages, lookback 0 and the default spawn policy.
    #[must_use]
    pub fn new(initial_data: G) -> Self {
        Self {
            stages: Vec::new(),
            initial_data,
            config: SeekerConfig::default(),
        }
    }

    /// Appends a stage.
    #[must_use]
    pub fn stage(mut self, stage: Stage<T, G>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Appends several stages in order.
    #[must_use]
    pub fn stages(mut self, stages: impl IntoIterator<Item = Stage<T, G>>) -> Self {
        self.stages.extend(stages);
        self
    }

    /// Sets the lookback capacity.
    #[must_use]
    pub const fn lookback(mut self, capacity: i64) -> Self {
        self.config.lookback = capacity;
        self
    }

    /// Sets the spawn policy.
    #[must_use]
    pub const fn spawn(mut self, policy: SpawnPolicy) -> Self {
        self.config.spawn = policy;
        self
    }

    /// Replaces lookback capacity and spawn policy at once.
    #[must_use]
    pub const fn config(mut self, config: SeekerConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Current configuration.
    #[must_use]
    pub const fn settings(&self) -> &SeekerConfig {
        &self.config
    }
}

impl<T, G: Default> Default for PatternDescriptor<T, G> {
    fn default() -> Self {
        Self::new(G::default())
    }
}
