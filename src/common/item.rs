// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Element types shared by the lookback buffer, execution states and reports.
//!
//! Every element fed to a [`PatternSeeker`](crate::seeker::PatternSeeker) is
//! wrapped exactly once into an [`Item`], pairing it with its position in the
//! input. Items are never mutated afterwards; the lookback buffer, the
//! evaluators and the backtraces all see the same index/value pair.

use serde::{Deserialize, Serialize};

/// Zero-based position of an element in the input sequence.
///
/// The counter is owned by the seeker, starts at 0 and is never reset, so
/// it is `u64` to stay monotonic on long-running streams.
pub type SequenceIndex = u64;

/// An input element tagged with its sequence index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item<T> {
    /// Position of the element in the input (0 for the first `process` call).
    pub index: SequenceIndex,
    /// The caller's element.
    pub value: T,
}

impl<T> Item<T> {
    /// Creates a new item.
    #[must_use]
    pub const fn new(index: SequenceIndex, value: T) -> Self {
        Self { index, value }
    }
}

/// One entry of a backtrace: the element that satisfied a stage.
///
/// Recorded from the seeker's current item at the moment of transition,
/// never from anything an evaluator supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StageCompletion<T> {
    /// Stage that was passed (0-indexed).
    pub stage: usize,
    /// Sequence index of the element that passed it.
    pub index: SequenceIndex,
    /// The element that passed it.
    pub value: T,
}

impl<T: Clone> StageCompletion<T> {
    /// Records `item` as the element that completed `stage`.
    #[must_use]
    pub fn from_item(stage: usize, item: &Item<T>) -> Self {
        Self {
            stage,
            index: item.index,
            value: item.value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_creation() {
        let item = Item::new(7, 10.5_f64);
        assert_eq!(item.index, 7);
        assert!((item.value - 10.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_completion_copies_item() {
        let item = Item::new(3, String::from("breakout"));
        let completion = StageCompletion::from_item(2, &item);
        assert_eq!(completion.stage, 2);
        assert_eq!(completion.index, 3);
        assert_eq!(completion.value, "breakout");
        // The item is untouched and still usable.
        assert_eq!(item.value, "breakout");
    }

    #[test]
    fn test_completion_serializes_flat() {
        let completion = StageCompletion {
            stage: 1,
            index: 3,
            value: 11,
        };
        let json = serde_json::to_string(&completion).unwrap();
        assert_eq!(json, r#"{"stage":1,"index":3,"value":11}"#);
    }
}
