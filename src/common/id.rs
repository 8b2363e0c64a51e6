// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Identifiers for execution states.
//!
//! Each attempt spawned by the seeker receives a [`StateId`] that stays
//! stable for the attempt's lifetime and is carried in every report, so
//! subscribers can tell concurrently active attempts apart.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of one execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(Uuid);

impl StateId {
    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for StateId {
    /// Short form: the first 8 hex digits, enough to tell attempts apart in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let simple = self.0.simple().to_string();
        f.write_str(&simple[..8])
    }
}

/// Source of state identifiers.
///
/// Implementations must never hand out the same identifier twice for the
/// lifetime of the seeker that owns them. No ordering is required.
pub trait IdGenerator {
    /// Produces a fresh identifier.
    fn next_id(&mut self) -> StateId;
}

/// Random (UUID v4) identifiers. The default generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> StateId {
        StateId(Uuid::new_v4())
    }
}

/// Deterministic identifiers built from a counter.
///
/// Useful for reproducible logs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialIds {
    next: u128,
}

impl SequentialIds {
    /// Starts counting at `start`.
    #[must_use]
    pub const fn starting_at(start: u128) -> Self {
        Self { next: start }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> StateId {
        let id = StateId(Uuid::from_u128(self.next));
        self.next = self.next.wrapping_add(1);
        id
    }
}
