use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::Strategy;
use crate::event::{Event, EventKind, EventSink};
use crate::philosopher::Philosopher;
use crate::ring::Ring;
use crate::signal::{Signal, Wake};
use crate::state::State;

use super::Table;

/// Cooperative strategy: there are no chopsticks at all. A philosopher looks
/// at its neighbors, sleeps on its own [`Signal`] while one of them eats, and
/// after eating wakes a hungry neighbor who would otherwise be free to eat.
///
/// Mutual exclusion rests entirely on that inspection. States are read
/// without a lock, and a releasing philosopher's check and its return to
/// thinking are not one step, so two neighbors can still end up eating
/// together, or a wake-up can go to nobody. A waiting philosopher with a
/// `recheck` interval looks at its neighbors again on its own; without one it
/// trusts the wake-up completely.
pub struct WaitNotifyTable {
    ring: Ring,
    philosophers: Vec<Philosopher>,
    signals: Vec<Signal>,
    meals: usize,
    recheck: Option<Duration>,
    sink: Arc<dyn EventSink>,
}

impl WaitNotifyTable {
    pub fn new(
        ring: Ring,
        meals: usize,
        recheck: Option<Duration>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        WaitNotifyTable {
            philosophers: ring.seats().map(Philosopher::new).collect(),
            signals: ring.seats().map(|_| Signal::new()).collect(),
            ring,
            meals,
            recheck,
            sink,
        }
    }

    fn record(&self, seat: usize, kind: EventKind) {
        self.sink.record(Event::new(seat, kind));
    }

    fn state_of(&self, seat: usize) -> State {
        self.philosophers[seat].state()
    }

    fn neighbor_eating(&self, seat: usize) -> bool {
        self.state_of(self.ring.left(seat)) == State::Eating
            || self.state_of(self.ring.right(seat)) == State::Eating
    }

    pub fn think(&self, seat: usize) {
        self.philosophers[seat].set_state(State::Thinking);
    }

    /// Returns once `seat` may eat. Only becomes hungry when a neighbor is
    /// eating at the time of the check.
    pub fn acquire(&self, seat: usize) {
        let signal = &self.signals[seat];
        // a wake-up left over from an earlier meal is not meant for this one
        signal.reset();

        if !self.neighbor_eating(seat) {
            return;
        }

        // hungry must be visible before sleeping, or nobody will wake us
        self.philosophers[seat].set_state(State::Hungry);
        self.record(seat, EventKind::Wait);

        loop {
            match signal.wait(self.recheck) {
                Wake::Notified => {
                    self.record(seat, EventKind::Resume { woken: true });
                    return;
                }
                Wake::TimedOut => {
                    debug!(seat, "rechecking neighbors");
                    if !self.neighbor_eating(seat) {
                        self.record(seat, EventKind::Resume { woken: false });
                        return;
                    }
                }
            }
        }
    }

    pub fn eat(&self, seat: usize) -> usize {
        let meal = self.philosophers[seat].start_meal();
        self.record(seat, EventKind::Eat { meal });
        meal
    }

    /// Wakes each hungry neighbor whose other neighbor is not eating, then
    /// goes back to thinking.
    pub fn release(&self, seat: usize) {
        let left = self.ring.left(seat);
        let right = self.ring.right(seat);

        if self.should_wake(seat, left, self.ring.left(left)) {
            self.wake(seat, left);
        }
        // with two seats left and right are the same philosopher
        if right != left && self.should_wake(seat, right, self.ring.right(right)) {
            self.wake(seat, right);
        }

        self.think(seat);
    }

    fn should_wake(&self, seat: usize, neighbor: usize, beyond: usize) -> bool {
        // `seat` itself is still marked eating but is about to stop
        self.state_of(neighbor) == State::Hungry
            && (beyond == seat || self.state_of(beyond) != State::Eating)
    }

    fn wake(&self, seat: usize, neighbor: usize) {
        self.record(seat, EventKind::Wake { neighbor });
        self.signals[neighbor].notify();
    }
}

impl Table for WaitNotifyTable {
    fn strategy(&self) -> Strategy {
        Strategy::WaitNotify
    }

    fn ring(&self) -> &Ring {
        &self.ring
    }

    fn philosophers(&self) -> &[Philosopher] {
        &self.philosophers
    }

    fn meals_target(&self) -> usize {
        self.meals
    }

    fn dine(&self, seat: usize) {
        let me = &self.philosophers[seat];
        while me.meals_eaten() < self.meals {
            self.think(seat);
            self.acquire(seat);
            self.eat(seat);
            self.release(seat);
        }
        self.record(
            seat,
            EventKind::Done {
                meals: me.meals_eaten(),
            },
        );
    }
}
