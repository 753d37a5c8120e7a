use std::sync::atomic::{AtomicUsize, Ordering};

use crate::state::{AtomicState, State};

pub fn philosopher_name(seat: usize) -> String {
    format!("Philosopher {seat}")
}

/// One seat at the table. Neighbors are found through the table's ring,
/// never stored here.
#[derive(Debug)]
pub struct Philosopher {
    seat: usize,
    name: String,
    state: AtomicState,
    meals: AtomicUsize,
}

impl Philosopher {
    pub fn new(seat: usize) -> Self {
        Philosopher {
            seat,
            name: philosopher_name(seat),
            state: AtomicState::new(State::Thinking),
            meals: AtomicUsize::new(0),
        }
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> State {
        self.state.load()
    }

    pub fn meals_eaten(&self) -> usize {
        self.meals.load(Ordering::Acquire)
    }

    pub(crate) fn set_state(&self, state: State) {
        self.state.store(state);
    }

    /// Marks the philosopher as eating and returns the number of the meal
    /// just started.
    pub(crate) fn start_meal(&self) -> usize {
        self.state.store(State::Eating);
        self.meals.fetch_add(1, Ordering::AcqRel) + 1
    }
}
