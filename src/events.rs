// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Events emitted by the seeker and the subscriber registry.
//!
//! # Events
//!
//! | Event | Name | Emitted when |
//! |-------|------|--------------|
//! | [`SeekerEvent::Break`] | `"<n>:break"` | an attempt at stage `n` is abandoned |
//! | [`SeekerEvent::Complete`] | `"<n>:complete"` | an attempt passes stage `n` |
//! | [`SeekerEvent::Stagnate`] | `"<n>:stagnate"` | an attempt at stage `n` neither progresses nor breaks |
//! | [`SeekerEvent::PatternComplete`] | `"complete"` | an attempt passes the last stage (right after its `:complete`) |
//!
//! Every handler receives its own [`StageReport`]: the id, auxiliary data
//! and backtrace of the attempt, copied out of the seeker. Whatever a
//! handler does with it never reaches the seeker or another handler.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::common::id::StateId;
use crate::common::item::StageCompletion;
use crate::error::SubscriptionError;
use crate::state::ExecutionState;

/// A signal emitted by the seeker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeekerEvent {
    /// An attempt at the given stage was abandoned.
    Break(usize),
    /// An attempt passed the given stage.
    Complete(usize),
    /// An attempt at the given stage consumed one unit of patience.
    Stagnate(usize),
    /// An attempt passed every stage.
    PatternComplete,
}

impl SeekerEvent {
    /// The stage this event is scoped to, if any.
    #[must_use]
    pub const fn stage(self) -> Option<usize> {
        match self {
            Self::Break(stage) | Self::Complete(stage) | Self::Stagnate(stage) => Some(stage),
            Self::PatternComplete => None,
        }
    }

    /// Checks that this event can be emitted by a pattern of `stage_count` stages.
    pub const fn validate(self, stage_count: usize) -> Result<Self, SubscriptionError> {
        match self.stage() {
            Some(stage) if stage >= stage_count => {
                Err(SubscriptionError::StageOutOfRange { stage, stage_count })
            }
            _ => Ok(self),
        }
    }
}

impl fmt::Display for SeekerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Break(stage) => write!(f, "{stage}:break"),
            Self::Complete(stage) => write!(f, "{stage}:complete"),
            Self::Stagnate(stage) => write!(f, "{stage}:stagnate"),
            Self::PatternComplete => f.write_str("complete"),
        }
    }
}

impl FromStr for SeekerEvent {
    type Err = SubscriptionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let unknown = || SubscriptionError::UnknownEvent(name.to_string());
        let name = name.trim();
        if name == "complete" {
            return Ok(Self::PatternComplete);
        }
        let (stage, kind) = name.split_once(':').ok_or_else(unknown)?;
        let stage: usize = stage.parse().map_err(|_| unknown())?;
        match kind {
            "break" => Ok(Self::Break(stage)),
            "complete" => Ok(Self::Complete(stage)),
            "stagnate" => Ok(Self::Stagnate(stage)),
            _ => Err(unknown()),
        }
    }
}

/// Payload delivered with every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport<T, G> {
    /// Identifier of the attempt.
    pub id: StateId,
    /// Auxiliary data of the attempt.
    pub data: G,
    /// Stages the attempt has passed, in order.
    pub backtrace: Vec<StageCompletion<T>>,
}

impl<T: Clone, G: Clone> StageReport<T, G> {
    /// Copies the reportable part of `state`.
    #[must_use]
    pub fn from_state(state: &ExecutionState<T, G>) -> Self {
        Self {
            id: state.id,
            data: state.data.clone(),
            backtrace: state.backtrace.clone(),
        }
    }
}

type Handler<T, G> = Box<dyn FnMut(StageReport<T, G>)>;
type AnyHandler<T, G> = Box<dyn FnMut(SeekerEvent, StageReport<T, G>)>;

/// Event name to ordered handler list, owned by one seeker.
///
/// Handlers of a given event run in registration order; catch-all handlers
/// run after them, also in registration order.
pub(crate) struct Subscribers<T, G> {
    by_event: HashMap<SeekerEvent, Vec<Handler<T, G>>>,
    any: Vec<AnyHandler<T, G>>,
}

impl<T, G> Subscribers<T, G> {
    pub(crate) fn new() -> Self {
        Self {
            by_event: HashMap::new(),
            any: Vec::new(),
        }
    }

    pub(crate) fn subscribe(&mut self, event: SeekerEvent, handler: Handler<T, G>) {
        self.by_event.entry(event).or_default().push(handler);
    }

    pub(crate) fn subscribe_any(&mut self, handler: AnyHandler<T, G>) {
        self.any.push(handler);
    }

    /// Returns true if emitting `event` would reach at least one handler.
    pub(crate) fn is_listening(&self, event: SeekerEvent) -> bool {
        !self.any.is_empty() || self.by_event.get(&event).is_some_and(|h| !h.is_empty())
    }
}

impl<T: Clone, G: Clone> Subscribers<T, G> {
    /// Delivers a copy of `state`'s report to every handler of `event`.
    ///
    /// Skips building the report when nobody listens.
    pub(crate) fn emit(&mut self, event: SeekerEvent, state: &ExecutionState<T, G>) {
        if !self.is_listening(event) {
            return;
        }
        let report = StageReport::from_state(state);
        if let Some(handlers) = self.by_event.get_mut(&event) {
            for handler in handlers {
                handler(report.clone());
            }
        }
        for handler in &mut self.any {
            handler(event, report.clone());
        }
    }
}

impl<T, G> fmt::Debug for Subscribers<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut events: Vec<String> = self
            .by_event
            .iter()
            .map(|(event, handlers)| format!("{event}x{}", handlers.len()))
            .collect();
        events.sort();
        f.debug_struct("Subscribers")
            .field("by_event", &events)
            .field("any", &self.any.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::stage::Patience;
    use std::cell::RefCell;
    use std::rc::Rc;
    use uuid::Uuid;

    fn state() -> ExecutionState<i32, Vec<i32>> {
        let mut s = ExecutionState::new(
            StateId::from_uuid(Uuid::from_u128(7)),
            vec![1, 2],
            Patience::Unlimited,
        );
        s.backtrace.push(StageCompletion {
            stage: 0,
            index: 2,
            value: 10,
        });
        s
    }

    #[test]
    fn test_event_names_round_trip() {
        for name in ["0:complete", "3:break", "1:stagnate", "complete"] {
            let event: SeekerEvent = name.parse().unwrap();
            assert_eq!(event.to_string(), name);
        }
        assert_eq!("2:complete".parse(), Ok(SeekerEvent::Complete(2)));
    }

    #[test]
    fn test_unknown_event_names() {
        for name in ["", "done", "1:finish", "x:break", "-1:break", ":complete"] {
            assert!(
                matches!(
                    name.parse::<SeekerEvent>(),
                    Err(SubscriptionError::UnknownEvent(_))
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_stage_range() {
        assert_eq!(
            SeekerEvent::Complete(2).validate(3),
            Ok(SeekerEvent::Complete(2))
        );
        assert_eq!(
            SeekerEvent::Break(3).validate(3),
            Err(SubscriptionError::StageOutOfRange {
                stage: 3,
                stage_count: 3
            })
        );
        assert_eq!(
            SeekerEvent::PatternComplete.validate(1),
            Ok(SeekerEvent::PatternComplete)
        );
    }

    #[test]
    fn test_report_is_a_copy() {
        let s = state();
        let mut report = StageReport::from_state(&s);
        report.data.push(99);
        report.backtrace.clear();
        assert_eq!(s.data, vec![1, 2]);
        assert_eq!(s.backtrace.len(), 1);
    }

    #[test]
    fn test_emit_order_and_isolation() {
        let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let mut subs: Subscribers<i32, Vec<i32>> = Subscribers::new();

        let first = Rc::clone(&log);
        subs.subscribe(
            SeekerEvent::Complete(0),
            Box::new(move |mut report| {
                report.data.push(42);
                first.borrow_mut().push(format!("first {:?}", report.data));
            }),
        );
        let second = Rc::clone(&log);
        subs.subscribe(
            SeekerEvent::Complete(0),
            Box::new(move |report| {
                second
                    .borrow_mut()
                    .push(format!("second {:?}", report.data));
            }),
        );
        let any = Rc::clone(&log);
        subs.subscribe_any(Box::new(move |event, _| {
            any.borrow_mut().push(format!("any {event}"));
        }));

        subs.emit(SeekerEvent::Complete(0), &state());
        subs.emit(SeekerEvent::Break(0), &state());

        assert_eq!(
            *log.borrow(),
            vec![
                "first [1, 2, 42]",
                "second [1, 2]",
                "any 0:complete",
                "any 0:break",
            ]
        );
    }

    #[test]
    fn test_is_listening() {
        let mut subs: Subscribers<i32, ()> = Subscribers::new();
        assert!(!subs.is_listening(SeekerEvent::PatternComplete));
        subs.subscribe(SeekerEvent::PatternComplete, Box::new(|_| {}));
        assert!(subs.is_listening(SeekerEvent::PatternComplete));
        assert!(!subs.is_listening(SeekerEvent::Complete(0)));
    }
}
