// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! The matching engine.
//!
//! [`PatternSeeker`] consumes one element per [`process`](PatternSeeker::process)
//! call and drives every in-flight attempt through the pattern's stages.
//!
//! # Step algorithm
//!
//! 1. Wrap the element into an [`Item`] with the next sequence index.
//! 2. Push the item into the lookback buffer.
//! 3. Spawn a new attempt at stage 0 according to the [`SpawnPolicy`].
//! 4. Run the current stage's evaluator of every attempt, in spawn order.
//!    Each evaluator starts from a clean intent.
//! 5. Classify, in order:
//!    - **break**: attempts that asked to break, or that did not progress
//!      with their last unit of patience, are dropped (`<n>:break`);
//!    - **complete**: attempts that progressed on the last stage record the
//!      item and are dropped (`<n>:complete`, then `complete`);
//!    - **transition**: the others either advance one stage
//!      (`<n>:complete`) or consume one unit of patience (`<n>:stagnate`).
//! 6. Keep the survivors for the next element.
//!
//! If any evaluator fails in step 4 the step is abandoned: the spawned
//! attempt and the lookback push are undone, the sequence index is not
//! consumed and no intent, data or classification is committed.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::common::id::{IdGenerator, RandomIds};
use crate::common::item::{Item, SequenceIndex};
use crate::common::lookback::LookbackBuffer;
use crate::error::{ConfigError, SeekerError, StepError, SubscriptionError};
use crate::events::{SeekerEvent, StageReport, Subscribers};
use crate::pattern::descriptor::{PatternDescriptor, SpawnPolicy};
use crate::pattern::stage::{Intent, Stage, StageActions};
use crate::state::ExecutionState;

/// Streaming multi-stage pattern matcher.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::num::NonZeroU32;
/// use std::rc::Rc;
///
/// use seeker::events::SeekerEvent;
/// use seeker::pattern::descriptor::PatternDescriptor;
/// use seeker::pattern::stage::Stage;
/// use seeker::seeker::PatternSeeker;
///
/// fn is_incr(v: &i32, _: u64, prev: Option<&i32>) -> bool {
///     prev.is_some_and(|p| p + 1 == *v)
/// }
///
/// let patience = NonZeroU32::new(3).unwrap();
/// let pattern = PatternDescriptor::new(())
///     .stage(Stage::when(|v: &i32, _, _| *v == 10))
///     .stage(Stage::when(is_incr).patience(patience))
///     .stage(Stage::when(is_incr).patience(patience))
///     .lookback(10);
///
/// let mut seeker = PatternSeeker::new(pattern).unwrap();
/// let matches = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&matches);
/// seeker
///     .on(SeekerEvent::PatternComplete, move |report| sink.borrow_mut().push(report))
///     .unwrap();
///
/// seeker.process_all([5, 6, 10, 11, 12, 3, 4, 5]).unwrap();
///
/// let matches = matches.borrow();
/// assert_eq!(matches.len(), 1);
/// let indices: Vec<u64> = matches[0].backtrace.iter().map(|c| c.index).collect();
/// assert_eq!(indices, vec![2, 3, 4]);
/// ```
pub struct PatternSeeker<T, G, I = RandomIds> {
    stages: Vec<Stage<T, G>>,
    initial_data: G,
    spawn: SpawnPolicy,
    lookback: LookbackBuffer<T>,
    states: Vec<ExecutionState<T, G>>,
    subscribers: Subscribers<T, G>,
    ids: I,
    next_index: SequenceIndex,
    /// Evaluation outcomes of the current step, committed only once every
    /// evaluator has succeeded. Reused across steps.
    pending: Vec<(Intent, Option<G>)>,
}

impl<T: Clone, G: Clone> PatternSeeker<T, G, RandomIds> {
    /// Builds a seeker with random (UUID v4) state identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the lookback capacity is negative or the
    /// pattern has no stages.
    pub fn new(pattern: PatternDescriptor<T, G>) -> Result<Self, ConfigError> {
        Self::with_id_generator(pattern, RandomIds)
    }
}

impl<T: Clone + 'static, G: Clone + 'static> PatternSeeker<T, G, RandomIds> {
    /// Runs `pattern` over a finite sequence and returns the report of every
    /// full match, in completion order.
    ///
    /// # Errors
    ///
    /// Returns [`SeekerError::Config`] for an invalid pattern and
    /// [`SeekerError::Step`] if an evaluator fails. Matches found before the
    /// failing element are discarded.
    pub fn find_all<E>(
        pattern: PatternDescriptor<T, G>,
        elements: E,
    ) -> Result<Vec<StageReport<T, G>>, SeekerError>
    where
        E: IntoIterator<Item = T>,
    {
        let mut seeker = Self::new(pattern)?;
        let matches = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&matches);
        seeker.on(SeekerEvent::PatternComplete, move |report| {
            sink.borrow_mut().push(report);
        })?;
        seeker.process_all(elements)?;
        Ok(matches.take())
    }
}

impl<T: Clone, G: Clone, I: IdGenerator> PatternSeeker<T, G, I> {
    /// Builds a seeker drawing state identifiers from `ids`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the lookback capacity is negative or the
    /// pattern has no stages.
    pub fn with_id_generator(
        pattern: PatternDescriptor<T, G>,
        ids: I,
    ) -> Result<Self, ConfigError> {
        let capacity = pattern.config.lookback_capacity()?;
        if pattern.stages.is_empty() {
            return Err(ConfigError::EmptyPattern);
        }
        debug!(
            stages = pattern.stages.len(),
            lookback = capacity,
            spawn = ?pattern.config.spawn,
            "pattern seeker created"
        );
        Ok(Self {
            stages: pattern.stages,
            initial_data: pattern.initial_data,
            spawn: pattern.config.spawn,
            lookback: LookbackBuffer::new(capacity),
            states: Vec::new(),
            subscribers: Subscribers::new(),
            ids,
            next_index: 0,
            pending: Vec::new(),
        })
    }

    /// Subscribes `handler` to `event`.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError::StageOutOfRange`] if `event` is scoped to
    /// a stage the pattern does not have.
    pub fn on<F>(&mut self, event: SeekerEvent, handler: F) -> Result<&mut Self, SubscriptionError>
    where
        F: FnMut(StageReport<T, G>) + 'static,
    {
        let event = event.validate(self.stages.len())?;
        self.subscribers.subscribe(event, Box::new(handler));
        Ok(self)
    }

    /// Subscribes `handler` to an event given by name, e.g. `"1:complete"`.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError`] if the name is malformed or refers to
    /// a stage the pattern does not have.
    pub fn on_named<F>(&mut self, name: &str, handler: F) -> Result<&mut Self, SubscriptionError>
    where
        F: FnMut(StageReport<T, G>) + 'static,
    {
        self.on(name.parse()?, handler)
    }

    /// Subscribes `handler` to every event.
    pub fn on_any<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(SeekerEvent, StageReport<T, G>) + 'static,
    {
        self.subscribers.subscribe_any(Box::new(handler));
        self
    }

    /// Feeds one element through the pattern.
    ///
    /// All effects surface through the subscribed handlers.
    ///
    /// # Errors
    ///
    /// Returns [`StepError`] if an evaluator fails. The seeker is then left
    /// exactly as it was before the call.
    pub fn process(&mut self, element: T) -> Result<(), StepError> {
        let item = Item::new(self.next_index, element);
        let evicted = self.lookback.push(item.clone());
        let spawned = self.spawn_if_needed();

        if let Err(err) = self.evaluate(&item) {
            if spawned {
                self.states.pop();
            }
            self.lookback.rollback(evicted);
            self.pending.clear();
            warn!(index = item.index, error = %err, "step rolled back");
            return Err(err);
        }

        for (state, (intent, staged)) in self.states.iter_mut().zip(self.pending.drain(..)) {
            state.intent = intent;
            if let Some(data) = staged {
                state.data = data;
            }
        }

        self.classify(&item);
        self.next_index += 1;
        Ok(())
    }

    /// Feeds every element of `elements`, stopping at the first failing step.
    ///
    /// # Errors
    ///
    /// Returns the first [`StepError`]; elements after it are not consumed.
    pub fn process_all<E>(&mut self, elements: E) -> Result<(), StepError>
    where
        E: IntoIterator<Item = T>,
    {
        elements
            .into_iter()
            .try_for_each(|element| self.process(element))
    }

    fn spawn_if_needed(&mut self) -> bool {
        let needed = match self.spawn {
            SpawnPolicy::Single => self.states.is_empty(),
            SpawnPolicy::Parallel => !self.states.iter().any(|state| state.stage == 0),
        };
        if needed {
            let state = ExecutionState::new(
                self.ids.next_id(),
                self.initial_data.clone(),
                self.stages[0].configured_patience(),
            );
            debug!(state = %state.id, index = self.next_index, "attempt spawned");
            self.states.push(state);
        }
        needed
    }

    /// Runs every state's current evaluator, filling `self.pending`.
    fn evaluate(&mut self, item: &Item<T>) -> Result<(), StepError> {
        self.pending.clear();
        let window = self.lookback.as_slice();
        for state in &self.states {
            let mut actions = StageActions::new(&state.data, window);
            self.stages[state.stage]
                .evaluate(item, &mut actions)
                .map_err(|source| StepError::Evaluator {
                    stage: state.stage,
                    state: state.id,
                    index: item.index,
                    source,
                })?;
            self.pending.push(actions.into_outcome());
        }
        Ok(())
    }

    fn classify(&mut self, item: &Item<T>) {
        let last_stage = self.stages.len() - 1;
        let mut states = std::mem::take(&mut self.states);

        states.retain(|state| {
            if !state.should_break() {
                return true;
            }
            debug!(
                state = %state.id,
                stage = state.stage,
                index = item.index,
                "attempt broken"
            );
            self.subscribers
                .emit(SeekerEvent::Break(state.stage), state);
            false
        });

        states.retain_mut(|state| {
            if state.intent != Intent::Progress || state.stage != last_stage {
                return true;
            }
            state.record_completion(item);
            debug!(state = %state.id, index = item.index, "pattern complete");
            self.subscribers
                .emit(SeekerEvent::Complete(state.stage), state);
            self.subscribers.emit(SeekerEvent::PatternComplete, state);
            false
        });

        for state in &mut states {
            if state.intent == Intent::Progress {
                let passed = state.stage;
                state.advance(item, self.stages[passed + 1].configured_patience());
                trace!(
                    state = %state.id,
                    stage = state.stage,
                    index = item.index,
                    "attempt progressed"
                );
                self.subscribers.emit(SeekerEvent::Complete(passed), state);
            } else {
                state.stagnate();
                self.subscribers
                    .emit(SeekerEvent::Stagnate(state.stage), state);
            }
        }

        self.states = states;
    }
}

impl<T, G, I> PatternSeeker<T, G, I> {
    /// Active attempts, in spawn order.
    #[must_use]
    pub fn states(&self) -> &[ExecutionState<T, G>] {
        &self.states
    }

    /// Number of stages in the pattern.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Number of elements processed so far.
    #[must_use]
    pub const fn processed(&self) -> SequenceIndex {
        self.next_index
    }

    /// Spawn policy in use.
    #[must_use]
    pub const fn spawn_policy(&self) -> SpawnPolicy {
        self.spawn
    }

    /// Lookback capacity in use.
    #[must_use]
    pub const fn lookback_capacity(&self) -> usize {
        self.lookback.capacity()
    }
}

impl<T: Clone, G, I> PatternSeeker<T, G, I> {
    /// Owned copy of the lookback window, oldest first.
    #[must_use]
    pub fn lookback(&self) -> Vec<Item<T>> {
        self.lookback.snapshot()
    }
}

impl<T, G, I> std::fmt::Debug for PatternSeeker<T, G, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternSeeker")
            .field("stages", &self.stages.len())
            .field("spawn", &self.spawn)
            .field("lookback_capacity", &self.lookback.capacity())
            .field("lookback_len", &self.lookback.len())
            .field("active_states", &self.states.len())
            .field("processed", &self.next_index)
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}
