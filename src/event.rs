//! Narration of what each philosopher does.
//!
//! Tables never print. They hand every transition to an [`EventSink`], which
//! decides whether it becomes a log line, an entry in a recorded log, or
//! nothing at all.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::info;

use crate::philosopher::philosopher_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Picked up a chopstick; `chopstick` is its arena index.
    PickUp { side: Side, chopstick: usize },
    PutDown { side: Side, chopstick: usize },
    /// Started the `meal`-th meal (1-based).
    Eat { meal: usize },
    /// Saw an eating neighbor, became hungry and went to sleep.
    Wait,
    /// Stopped waiting, either woken by a neighbor or after rechecking.
    Resume { woken: bool },
    Wake { neighbor: usize },
    Done { meals: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub seat: usize,
    pub kind: EventKind,
}

impl Event {
    pub fn new(seat: usize, kind: EventKind) -> Self {
        Event { seat, kind }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = philosopher_name(self.seat);
        match self.kind {
            EventKind::PickUp { side, chopstick } => write!(
                f,
                "{name} picks up {side} chopstick (Chopstick {}).",
                chopstick + 1
            ),
            EventKind::PutDown { side, chopstick } => write!(
                f,
                "{name} puts down {side} chopstick (Chopstick {}).",
                chopstick + 1
            ),
            EventKind::Eat { meal } => write!(f, "{name} eats (meal {meal})."),
            EventKind::Wait => write!(f, "{name} is hungry and waits."),
            EventKind::Resume { woken: true } => write!(f, "{name} is woken up."),
            EventKind::Resume { woken: false } => {
                write!(f, "{name} stops waiting after a recheck.")
            }
            EventKind::Wake { neighbor } => {
                write!(f, "{name} wakes {}.", philosopher_name(neighbor))
            }
            EventKind::Done { meals } => write!(f, "{name} is done after {meals} meals."),
        }
    }
}

pub trait EventSink: Send + Sync {
    fn record(&self, event: Event);
}

/// Sends each event to `tracing` as one narration line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: Event) {
        info!(seat = event.seat, "{}", event);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: Event) {}
}

/// Keeps every event in the order `record` was called.
///
/// Recording serializes on one mutex, so the log is a single interleaving
/// consistent with each philosopher's own order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events of one philosopher, in order.
    pub fn events_of(&self, seat: usize) -> Vec<EventKind> {
        self.events()
            .into_iter()
            .filter(|e| e.seat == seat)
            .map(|e| e.kind)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_narration() {
        let pick = Event::new(
            0,
            EventKind::PickUp {
                side: Side::Left,
                chopstick: 0,
            },
        );
        assert_eq!(
            pick.to_string(),
            "Philosopher 0 picks up left chopstick (Chopstick 1)."
        );

        let wake = Event::new(2, EventKind::Wake { neighbor: 3 });
        assert_eq!(wake.to_string(), "Philosopher 2 wakes Philosopher 3.");
    }

    #[test]
    fn test_recording_keeps_order() {
        let sink = RecordingSink::new();
        assert!(sink.is_empty());

        sink.record(Event::new(1, EventKind::Eat { meal: 1 }));
        sink.record(Event::new(0, EventKind::Wait));
        sink.record(Event::new(1, EventKind::Done { meals: 1 }));

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.events()[1], Event::new(0, EventKind::Wait));
        assert_eq!(
            sink.events_of(1),
            vec![EventKind::Eat { meal: 1 }, EventKind::Done { meals: 1 }]
        );
    }
}
