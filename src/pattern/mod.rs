// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Pattern description: stages, evaluators and seeker configuration.
//!
//! Patterns are built in code as an ordered list of [`stage::Stage`]s; there
//! is no pattern language. Each stage is evaluated against one element at a
//! time:
//!
//! ```text
//! stage 0 ──progress──► stage 1 ──progress──► ... ──progress──► complete
//!    │                     │
//!    └─break / patience────┴──► attempt dropped
//! ```

pub mod descriptor;
pub mod stage;
