// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! # `seeker`: Streaming Multi-Stage Pattern Matching
//!
//! Detects occurrences of a multi-stage pattern in a sequence consumed one
//! element at a time, without buffering the sequence. A pattern is an
//! ordered list of stages, each defined by a caller-supplied evaluator and
//! an optional patience budget; typical use is spotting structures such as
//! "trend, then pullback, then breakout" in a time series.
//!
//! ## Components
//!
//! | Component | Module | Role |
//! |-----------|--------|------|
//! | [`Item`](common::item::Item) | [`common::item`] | element tagged with its sequence index |
//! | `LookbackBuffer` | `common::lookback` | bounded window shared by all attempts |
//! | [`Stage`](pattern::stage::Stage) | [`pattern::stage`] | evaluator + patience; the evaluator contract |
//! | [`PatternDescriptor`](pattern::descriptor::PatternDescriptor) | [`pattern::descriptor`] | stages, initial data, lookback, spawn policy |
//! | [`ExecutionState`](state::ExecutionState) | [`state`] | one in-flight attempt |
//! | [`PatternSeeker`](seeker::PatternSeeker) | [`seeker`] | the per-element step function |
//! | [`SeekerEvent`](events::SeekerEvent) | [`events`] | break / complete / stagnate signals and reports |
//!
//! ## Example
//!
//! ```
//! use seeker::events::SeekerEvent;
//! use seeker::pattern::descriptor::PatternDescriptor;
//! use seeker::pattern::stage::Stage;
//! use seeker::seeker::PatternSeeker;
//!
//! let pattern = PatternDescriptor::new(0_i32)
//!     .stage(Stage::when(|v: &i32, _, _| *v > 100))
//!     .stage(Stage::when(|v: &i32, _, _| *v < 50))
//!     .lookback(2);
//! let mut seeker = PatternSeeker::new(pattern).unwrap();
//! seeker
//!     .on(SeekerEvent::PatternComplete, |report| {
//!         println!("spike then drop, ending at index {}", report.backtrace[1].index);
//!     })
//!     .unwrap();
//! seeker.process_all([10, 120, 80, 40]).unwrap();
//! ```
//!
//! For a finite sequence, [`PatternSeeker::find_all`](seeker::PatternSeeker::find_all)
//! runs the pattern once and returns every full-match report.
//!
//! The crate performs no I/O and never installs a `tracing` subscriber; it
//! only emits `debug`/`trace`/`warn` events for applications that do.

pub mod common;
pub mod error;
pub mod events;
pub mod pattern;
pub mod seeker;
pub mod state;

pub use crate::common::id::{IdGenerator, RandomIds, SequentialIds, StateId};
pub use crate::common::item::{Item, SequenceIndex, StageCompletion};
pub use crate::error::{ConfigError, SeekerError, StepError, SubscriptionError};
pub use crate::events::{SeekerEvent, StageReport};
pub use crate::pattern::descriptor::{PatternDescriptor, SeekerConfig, SpawnPolicy};
pub use crate::pattern::stage::{
    basic_evaluator, Intent, Patience, Stage, StageActions, StageEvaluator,
};
pub use crate::seeker::PatternSeeker;
pub use crate::state::ExecutionState;
