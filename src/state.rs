// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Execution states: one in-flight attempt at matching a pattern.
//!
//! A state starts at stage 0 with the pattern's initial data, moves forward
//! one stage per progress, and is discarded for good when it breaks or
//! passes the last stage. Its backtrace records the element that passed
//! each stage, so while the state is active `backtrace.len() == stage`.

use crate::common::id::StateId;
use crate::common::item::{Item, StageCompletion};
use crate::pattern::stage::{Intent, Patience};

/// One attempt at matching the full stage sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ExecutionState<T, G> {
    /// Stable identifier, unique per spawned attempt.
    pub id: StateId,
    /// Caller-defined accumulator.
    pub data: G,
    /// Intent committed by the last evaluated step.
    pub intent: Intent,
    /// Current stage (0-indexed). Never decreases.
    pub stage: usize,
    /// Remaining patience at the current stage.
    pub break_counter: Patience,
    /// One completion record per stage already passed.
    pub backtrace: Vec<StageCompletion<T>>,
}

impl<T, G> ExecutionState<T, G> {
    /// Creates a fresh attempt at stage 0.
    #[must_use]
    pub const fn new(id: StateId, data: G, patience: Patience) -> Self {
        Self {
            id,
            data,
            intent: Intent::Idle,
            stage: 0,
            break_counter: patience,
            backtrace: Vec::new(),
        }
    }

    /// Returns true if the state must be dropped in this step's break filter:
    /// it asked to break, or it did not progress with its last unit of
    /// patience.
    #[must_use]
    pub const fn should_break(&self) -> bool {
        match self.intent {
            Intent::Break => true,
            Intent::Progress => false,
            Intent::Idle => self.break_counter.is_last(),
        }
    }

    /// Consumes one unit of patience. Unlimited patience is left untouched.
    pub(crate) fn stagnate(&mut self) {
        if let Some(next) = self.break_counter.decremented() {
            self.break_counter = next;
        }
    }
}

impl<T: Clone, G> ExecutionState<T, G> {
    /// Records `item` as passing the current stage.
    pub(crate) fn record_completion(&mut self, item: &Item<T>) {
        self.backtrace
            .push(StageCompletion::from_item(self.stage, item));
    }

    /// Records `item` for the current stage and moves to the next one with
    /// a fresh patience budget.
    pub(crate) fn advance(&mut self, item: &Item<T>, next_patience: Patience) {
        self.record_completion(item);
        self.stage += 1;
        self.break_counter = next_patience;
    }
}
