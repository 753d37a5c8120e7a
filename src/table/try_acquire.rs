use std::sync::Arc;

use crate::chopstick::{ChopstickGuard, Chopsticks};
use crate::config::{Backoff, Strategy};
use crate::event::{Event, EventKind, EventSink, Side};
use crate::philosopher::Philosopher;
use crate::ring::Ring;
use crate::state::State;

use super::Table;

/// Both chopsticks of one philosopher, left first.
pub type Held<'a> = (ChopstickGuard<'a>, ChopstickGuard<'a>);

/// Opportunistic strategy: grab the left chopstick, then the right, without
/// ever blocking. If the right one is taken the left one goes straight back
/// down and the philosopher tries again later.
///
/// Nobody ever holds one chopstick while waiting for another, so the table
/// cannot deadlock. It can livelock: philosophers may keep colliding forever
/// under an unlucky schedule. The backoff only makes that less likely.
///
/// A philosopher's state stays `Eating` after it puts its chopsticks down,
/// until its next `think`, and after its last meal for good. Reading
/// `philosophers()` can therefore show neighbors both eating; the chopstick
/// holders are what tell who actually holds what.
pub struct TryAcquireTable {
    ring: Ring,
    philosophers: Vec<Philosopher>,
    chopsticks: Chopsticks,
    meals: usize,
    backoff: Backoff,
    sink: Arc<dyn EventSink>,
}

impl TryAcquireTable {
    pub fn new(ring: Ring, meals: usize, backoff: Backoff, sink: Arc<dyn EventSink>) -> Self {
        TryAcquireTable {
            philosophers: ring.seats().map(Philosopher::new).collect(),
            chopsticks: Chopsticks::for_ring(&ring),
            ring,
            meals,
            backoff,
            sink,
        }
    }

    pub fn chopsticks(&self) -> &Chopsticks {
        &self.chopsticks
    }

    fn record(&self, seat: usize, kind: EventKind) {
        self.sink.record(Event::new(seat, kind));
    }

    pub fn think(&self, seat: usize) {
        self.philosophers[seat].set_state(State::Thinking);
    }

    /// Returns both chopsticks, or `None` with nothing held.
    pub fn try_acquire_both(&self, seat: usize) -> Option<Held<'_>> {
        let left = self.chopsticks.left_of(seat).try_acquire(seat)?;
        self.record(
            seat,
            EventKind::PickUp {
                side: Side::Left,
                chopstick: left.chopstick().index(),
            },
        );

        match self.chopsticks.right_of(seat).try_acquire(seat) {
            Some(right) => {
                self.record(
                    seat,
                    EventKind::PickUp {
                        side: Side::Right,
                        chopstick: right.chopstick().index(),
                    },
                );
                Some((left, right))
            }
            None => {
                // never carry a single chopstick into the next attempt
                self.put_down(seat, Side::Left, left);
                None
            }
        }
    }

    /// Borrowing `held` is what guarantees both chopsticks are in hand.
    pub fn eat(&self, seat: usize, _held: &Held<'_>) -> usize {
        let meal = self.philosophers[seat].start_meal();
        self.record(seat, EventKind::Eat { meal });
        meal
    }

    pub fn release_both(&self, seat: usize, held: Held<'_>) {
        let (left, right) = held;
        self.put_down(seat, Side::Right, right);
        self.put_down(seat, Side::Left, left);
    }

    fn put_down(&self, seat: usize, side: Side, guard: ChopstickGuard<'_>) {
        // record first: once released, a neighbor may already log its pick-up
        self.record(
            seat,
            EventKind::PutDown {
                side,
                chopstick: guard.chopstick().index(),
            },
        );
        guard.release();
    }
}

impl Table for TryAcquireTable {
    fn strategy(&self) -> Strategy {
        Strategy::TryAcquire
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
            match self.try_acquire_both(seat) {
                Some(held) => {
                    self.eat(seat, &held);
                    self.release_both(seat, held);
                }
                None => self.backoff.pause(),
            }
        }
        self.record(
            seat,
            EventKind::Done {
                meals: me.meals_eaten(),
            },
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::event::RecordingSink;

    fn table(seats: usize, meals: usize) -> (TryAcquireTable, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let table = TryAcquireTable::new(
            Ring::new(seats).unwrap(),
            meals,
            Backoff::Yield,
            sink.clone(),
        );
        (table, sink)
    }

    #[test]
    fn test_acquire_both_when_free() {
        let (table, sink) = table(3, 1);
        let held = table.try_acquire_both(1).unwrap();
        assert_eq!(table.chopsticks().left_of(1).holder(), Some(1));
        assert_eq!(table.chopsticks().right_of(1).holder(), Some(1));

        assert_eq!(table.eat(1, &held), 1);
        assert_eq!(table.philosopher(1).state(), State::Eating);

        table.release_both(1, held);
        assert!(table.chopsticks().iter().all(|c| !c.is_held()));

        assert_eq!(
            sink.events_of(1),
            vec![
                EventKind::PickUp { side: Side::Left, chopstick: 1 },
                EventKind::PickUp { side: Side::Right, chopstick: 2 },
                EventKind::Eat { meal: 1 },
                EventKind::PutDown { side: Side::Right, chopstick: 2 },
                EventKind::PutDown { side: Side::Left, chopstick: 1 },
            ]
        );
    }

    #[test]
    fn test_left_taken_holds_nothing() {
        let (table, sink) = table(3, 1);
        // seat 2 already holds the chopstick between seats 2 and 0
        let _neighbor = table.chopsticks().left_of(0).try_acquire(2).unwrap();

        assert!(table.try_acquire_both(0).is_none());
        assert!(!table.chopsticks().right_of(0).is_held());
        assert!(sink.events_of(0).is_empty());
    }

    #[test]
    fn test_right_taken_puts_left_back() {
        let (table, sink) = table(3, 1);
        let _neighbor = table.chopsticks().right_of(0).try_acquire(1).unwrap();

        assert!(table.try_acquire_both(0).is_none());
        assert!(!table.chopsticks().left_of(0).is_held());
        assert_eq!(table.chopsticks().right_of(0).holder(), Some(1));
        assert_eq!(
            sink.events_of(0),
            vec![
                EventKind::PickUp { side: Side::Left, chopstick: 0 },
                EventKind::PutDown { side: Side::Left, chopstick: 0 },
            ]
        );
    }

    #[test]
    fn test_dine_alone_reaches_target() {
        let (table, sink) = table(4, 3);
        table.dine(2);

        assert_eq!(table.meals_eaten(), vec![0, 0, 3, 0]);
        let eats = sink
            .events_of(2)
            .into_iter()
            .filter(|k| matches!(k, EventKind::Eat { .. }))
            .count();
        assert_eq!(eats, 3);
        assert_eq!(sink.events_of(2).last(), Some(&EventKind::Done { meals: 3 }));
    }

    #[test]
    fn test_state_stays_eating_after_last_meal() {
        let (table, _) = table(2, 1);
        table.dine(0);
        table.dine(1);

        // both chopsticks are free, yet both philosophers still read as eating
        assert!(table.chopsticks().iter().all(|c| !c.is_held()));
        assert_eq!(table.philosopher(0).state(), State::Eating);
        assert_eq!(table.philosopher(1).state(), State::Eating);
    }

    #[test]
    fn test_no_meals_no_events() {
        let (table, sink) = table(2, 0);
        table.dine(0);
        assert_eq!(sink.events(), vec![Event::new(0, EventKind::Done { meals: 0 })]);
    }
}
