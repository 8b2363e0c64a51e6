// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Pattern stages and the evaluator contract.
//!
//! A stage pairs a [`StageEvaluator`] with a [`Patience`] budget. On every
//! step the seeker calls the evaluator of each active state's current stage
//! with the current [`Item`] and a [`StageActions`] handle bound to that
//! state. The handle is the evaluator's only channel back to the seeker:
//!
//! | Action | Effect |
//! |--------|--------|
//! | [`progress`](StageActions::progress) | request advancing to the next stage |
//! | [`abandon`](StageActions::abandon) | request dropping the attempt (wins over `progress`) |
//! | [`get`](StageActions::get) | read the attempt's auxiliary data |
//! | [`set`](StageActions::set) | replace the auxiliary data with `mutator(previous)` |
//! | [`lookback`](StageActions::lookback) | read the shared lookback window |
//!
//! Repeated calls overwrite each other: the last intent and the last `set`
//! of a call win.

use std::marker::PhantomData;
use std::num::NonZeroU32;

use crate::common::item::{Item, SequenceIndex};

/// What an evaluator asked for during the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    /// No request; the state stagnates.
    #[default]
    Idle,
    /// Advance to the next stage (or complete, on the last one).
    Progress,
    /// Abandon the attempt.
    Break,
}

/// How many consecutive non-progressing elements a stage tolerates.
///
/// With `Limited(n)` the attempt is broken on the `n`-th consecutive element
/// that neither progresses nor breaks it. `Unlimited` never decays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Patience {
    /// Remaining budget, counted in elements.
    Limited(NonZeroU32),
    /// No budget; the stage waits forever.
    #[default]
    Unlimited,
}

impl Patience {
    /// Returns true if one more non-progressing element exhausts the budget.
    #[must_use]
    #[inline]
    pub const fn is_last(self) -> bool {
        matches!(self, Self::Limited(n) if n.get() == 1)
    }

    /// Budget left after one non-progressing element.
    ///
    /// Returns `None` once the budget is exhausted.
    #[must_use]
    pub fn decremented(self) -> Option<Self> {
        match self {
            Self::Limited(n) => NonZeroU32::new(n.get() - 1).map(Self::Limited),
            Self::Unlimited => Some(Self::Unlimited),
        }
    }
}

impl From<NonZeroU32> for Patience {
    fn from(n: NonZeroU32) -> Self {
        Self::Limited(n)
    }
}

impl From<Option<NonZeroU32>> for Patience {
    fn from(n: Option<NonZeroU32>) -> Self {
        n.map_or(Self::Unlimited, Self::Limited)
    }
}

/// Capability handed to an evaluator, bound to one execution state.
///
/// Data written through [`set`](Self::set) is staged: the state only sees it
/// once the whole step has been evaluated without error.
pub struct StageActions<'a, T, G> {
    intent: Intent,
    data: &'a G,
    staged: Option<G>,
    lookback: &'a [Item<T>],
}

impl<'a, T, G> StageActions<'a, T, G> {
    pub(crate) const fn new(data: &'a G, lookback: &'a [Item<T>]) -> Self {
        Self {
            intent: Intent::Idle,
            data,
            staged: None,
            lookback,
        }
    }

    /// Requests advancing to the next stage.
    pub const fn progress(&mut self) {
        self.intent = Intent::Progress;
    }

    /// Requests abandoning the attempt. Takes precedence over progress.
    pub const fn abandon(&mut self) {
        self.intent = Intent::Break;
    }

    /// The state's auxiliary data, including any value staged by `set`.
    #[must_use]
    pub fn get(&self) -> &G {
        self.staged.as_ref().unwrap_or(self.data)
    }

    /// Replaces the auxiliary data with `mutator(previous)`.
    ///
    /// `previous` is the value the state held when the step started; chaining
    /// several mutations within one call is up to the evaluator.
    pub fn set<F>(&mut self, mutator: F)
    where
        F: FnOnce(&G) -> G,
    {
        self.staged = Some(mutator(self.data));
    }

    /// The shared lookback window, oldest first. Its last entry is the
    /// current item (unless the lookback capacity is 0).
    #[must_use]
    pub const fn lookback(&self) -> &'a [Item<T>] {
        self.lookback
    }

    /// The intent requested so far in this call.
    #[must_use]
    pub const fn intent(&self) -> Intent {
        self.intent
    }

    pub(crate) fn into_outcome(self) -> (Intent, Option<G>) {
        (self.intent, self.staged)
    }
}

/// Per-stage predicate and side-effect function.
///
/// Returning an error aborts the whole step; see
/// [`StepError`](crate::error::StepError).
pub trait StageEvaluator<T, G> {
    /// Evaluates `item` for the state behind `actions`.
    fn evaluate(
        &mut self,
        item: &Item<T>,
        actions: &mut StageActions<'_, T, G>,
    ) -> anyhow::Result<()>;
}

impl<T, G, F> StageEvaluator<T, G> for F
where
    F: FnMut(&Item<T>, &mut StageActions<'_, T, G>) -> anyhow::Result<()>,
{
    fn evaluate(
        &mut self,
        item: &Item<T>,
        actions: &mut StageActions<'_, T, G>,
    ) -> anyhow::Result<()> {
        self(item, actions)
    }
}

/// Evaluator built from a pure predicate; see [`basic_evaluator`].
pub struct Predicate<T, P> {
    predicate: P,
    _element: PhantomData<fn(&T)>,
}

impl<T, G, P> StageEvaluator<T, G> for Predicate<T, P>
where
    P: FnMut(&T, SequenceIndex, Option<&T>) -> bool,
{
    fn evaluate(
        &mut self,
        item: &Item<T>,
        actions: &mut StageActions<'_, T, G>,
    ) -> anyhow::Result<()> {
        let window = actions.lookback();
        let previous = window.len().checked_sub(2).map(|i| &window[i].value);
        if (self.predicate)(&item.value, item.index, previous) {
            actions.progress();
        }
        Ok(())
    }
}

/// Turns a predicate `(value, index, previous)` into an evaluator that
/// progresses iff the predicate holds.
///
/// `previous` is the second-to-last lookback entry, i.e. the element
/// processed just before the current one. It is `None` on the first element
/// and whenever the lookback capacity is below 2.
pub fn basic_evaluator<T, P>(predicate: P) -> Predicate<T, P>
where
    P: FnMut(&T, SequenceIndex, Option<&T>) -> bool,
{
    Predicate {
        predicate,
        _element: PhantomData,
    }
}

/// One stage of a pattern.
pub struct Stage<T, G> {
    evaluator: Box<dyn StageEvaluator<T, G>>,
    patience: Patience,
}

impl<T, G> Stage<T, G> {
    /// Creates a stage from a fallible closure, with unlimited patience.
    pub fn new<F>(evaluator: F) -> Self
    where
        F: FnMut(&Item<T>, &mut StageActions<'_, T, G>) -> anyhow::Result<()> + 'static,
    {
        Self {
            evaluator: Box::new(evaluator),
            patience: Patience::Unlimited,
        }
    }

    /// Creates a stage from a closure that cannot fail.
    pub fn from_fn<F>(mut evaluator: F) -> Self
    where
        F: FnMut(&Item<T>, &mut StageActions<'_, T, G>) + 'static,
    {
        Self::new(move |item, actions| {
            evaluator(item, actions);
            Ok(())
        })
    }

    /// Creates a stage from any [`StageEvaluator`].
    pub fn from_evaluator<E>(evaluator: E) -> Self
    where
        E: StageEvaluator<T, G> + 'static,
    {
        Self {
            evaluator: Box::new(evaluator),
            patience: Patience::Unlimited,
        }
    }

    /// Creates a stage that progresses whenever `predicate` holds.
    pub fn when<P>(predicate: P) -> Self
    where
        P: FnMut(&T, SequenceIndex, Option<&T>) -> bool + 'static,
        T: 'static,
    {
        Self::from_evaluator(basic_evaluator(predicate))
    }

    /// Sets the break patience of this stage.
    #[must_use]
    pub fn patience(mut self, patience: impl Into<Patience>) -> Self {
        self.patience = patience.into();
        self
    }

    /// The configured break patience.
    #[must_use]
    pub const fn configured_patience(&self) -> Patience {
        self.patience
    }

    pub(crate) fn evaluate(
        &mut self,
        item: &Item<T>,
        actions: &mut StageActions<'_, T, G>,
    ) -> anyhow::Result<()> {
        self.evaluator.evaluate(item, actions)
    }
}

impl<T, G> std::fmt::Debug for Stage<T, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("patience", &self.patience)
            .finish_non_exhaustive()
    }
}
