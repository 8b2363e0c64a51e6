// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Common types shared by the seeker, its execution states and its reports.

pub mod id;
pub mod item;
pub(crate) mod lookback;
