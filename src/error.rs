// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Error types.
//!
//! - [`ConfigError`]: rejected pattern descriptor, no seeker is built.
//! - [`SubscriptionError`]: rejected subscription, the seeker is unaffected.
//! - [`StepError`]: an evaluator failed, the step is rolled back.

use thiserror::Error;

use crate::common::id::StateId;
use crate::common::item::SequenceIndex;

/// Error returned when a pattern descriptor cannot be turned into a seeker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The requested lookback capacity is negative.
    #[error("invalid lookback capacity: {0}. Must be >= 0")]
    NegativeLookback(i64),

    /// The pattern has no stages.
    #[error("pattern has no stages and can never match")]
    EmptyPattern,
}

/// Error returned when subscribing to an event the pattern cannot emit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event names a stage at or beyond the pattern's stage count.
    #[error("invalid stage number {stage}: pattern has {stage_count} stages")]
    StageOutOfRange {
        /// Requested stage.
        stage: usize,
        /// Stages in the pattern.
        stage_count: usize,
    },

    /// The event name is none of `<n>:complete`, `<n>:break`,
    /// `<n>:stagnate` or `complete`.
    #[error("unknown event name '{0}'")]
    UnknownEvent(String),
}

/// Error returned by [`PatternSeeker::process`](crate::seeker::PatternSeeker::process)
/// when a stage evaluator fails.
///
/// The failing step is not committed: the seeker is left exactly as it was
/// before the call.
#[derive(Error, Debug)]
pub enum StepError {
    /// An evaluator returned an error.
    #[error("evaluator of stage {stage} failed for state {state} at index {index}")]
    Evaluator {
        /// Stage whose evaluator failed.
        stage: usize,
        /// Attempt being evaluated.
        state: StateId,
        /// Index of the element that was being processed.
        index: SequenceIndex,
        /// The evaluator's error.
        #[source]
        source: anyhow::Error,
    },
}

/// Any error raised by this crate.
#[derive(Error, Debug)]
pub enum SeekerError {
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// See [`SubscriptionError`].
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    /// See [`StepError`].
    #[error(transparent)]
    Step(#[from] StepError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_config_messages() {
        assert_eq!(
            ConfigError::NegativeLookback(-1).to_string(),
            "invalid lookback capacity: -1. Must be >= 0"
        );
        assert_eq!(
            ConfigError::EmptyPattern.to_string(),
            "pattern has no stages and can never match"
        );
    }

    #[test]
    fn test_subscription_message() {
        let err = SubscriptionError::StageOutOfRange {
            stage: 3,
            stage_count: 3,
        };
        assert_eq!(
            err.to_string(),
            "invalid stage number 3: pattern has 3 stages"
        );
    }

    #[test]
    fn test_step_error_keeps_source() {
        let err = StepError::Evaluator {
            stage: 1,
            state: StateId::from_uuid(uuid::Uuid::from_u128(0)),
            index: 9,
            source: anyhow::anyhow!("indicator not warmed up"),
        };
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("indicator not warmed up"));
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: SeekerError = ConfigError::EmptyPattern.into();
        assert!(matches!(
            err,
            SeekerError::Config(ConfigError::EmptyPattern)
        ));
    }

    #[test]
    fn test_unknown_event_message() {
        let err = SubscriptionError::UnknownEvent("1:finish".to_string());
        assert_eq!(err.to_string(), "unknown event name '1:finish'");
    }
}
