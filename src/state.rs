use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum State {
    Thinking = 0,
    Hungry = 1,
    Eating = 2,
}

impl State {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => State::Hungry,
            2 => State::Eating,
            _ => State::Thinking,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            State::Thinking => "thinking",
            State::Hungry => "hungry",
            State::Eating => "eating",
        };
        f.write_str(s)
    }
}

/// State cell that neighbors read without taking a lock.
///
/// Only the owning philosopher writes it. Reads and writes are single atomic
/// operations, so there is no data race, but a neighbor's check-then-act
/// sequence can still interleave with the owner's transitions. The
/// wait/notify table relies on that relaxed view on purpose.
#[derive(Debug)]
pub struct AtomicState(AtomicU8);

impl AtomicState {
    pub fn new(state: State) -> Self {
        AtomicState(AtomicU8::new(state as u8))
    }

    pub fn load(&self) -> State {
        State::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, state: State) {
        self.0.store(state as u8, Ordering::Release);
    }
}
