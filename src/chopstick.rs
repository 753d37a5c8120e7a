use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ring::Ring;

// sentinel for an unheld chopstick
const FREE: usize = usize::MAX;

/// A chopstick shared by two adjacent philosophers.
///
/// Holding is exclusive and non-blocking: a failed `try_acquire` never
/// queues, contention is resolved by the caller retrying.
#[derive(Debug)]
pub struct Chopstick {
    index: usize,
    name: String,
    holder: AtomicUsize, // holding seat, or FREE
}

/// Proof of holding a chopstick. Releasing consumes it, so only the holder
/// can put a chopstick down.
#[derive(Debug)]
pub struct ChopstickGuard<'a> {
    chopstick: &'a Chopstick,
}

impl Chopstick {
    fn new(index: usize) -> Self {
        Chopstick {
            index,
            name: format!("Chopstick {}", index + 1),
            holder: AtomicUsize::new(FREE),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn try_acquire(&self, seat: usize) -> Option<ChopstickGuard<'_>> {
        debug_assert_ne!(seat, FREE);
        self.holder
            .compare_exchange(FREE, seat, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| ChopstickGuard { chopstick: self })
    }

    pub fn holder(&self) -> Option<usize> {
        match self.holder.load(Ordering::Relaxed) {
            FREE => None,
            seat => Some(seat),
        }
    }

    pub fn is_held(&self) -> bool {
        self.holder().is_some()
    }
}

impl fmt::Display for Chopstick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<'a> ChopstickGuard<'a> {
    pub fn chopstick(&self) -> &'a Chopstick {
        self.chopstick
    }

    pub fn release(self) {
        drop(self);
    }
}

impl<'a> Drop for ChopstickGuard<'a> {
    fn drop(&mut self) {
        self.chopstick.holder.store(FREE, Ordering::Release);
    }
}

/// One chopstick per adjacency of the ring.
///
/// Slot `i` lies between seat `left(i)` and seat `i`: it is the left
/// chopstick of seat `i` and the right chopstick of the seat before it.
#[derive(Debug)]
pub struct Chopsticks {
    ring: Ring,
    sticks: Vec<Chopstick>,
}

impl Chopsticks {
    pub fn for_ring(ring: &Ring) -> Self {
        Chopsticks {
            ring: *ring,
            sticks: ring.seats().map(Chopstick::new).collect(),
        }
    }

    pub fn left_of(&self, seat: usize) -> &Chopstick {
        &self.sticks[seat]
    }

    pub fn right_of(&self, seat: usize) -> &Chopstick {
        &self.sticks[self.ring.right(seat)]
    }

    pub fn len(&self) -> usize {
        self.sticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sticks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chopstick> {
        self.sticks.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_exclusive() {
        let stick = Chopstick::new(0);
        let guard = stick.try_acquire(3).unwrap();
        assert_eq!(stick.holder(), Some(3));
        assert!(stick.try_acquire(4).is_none());
        assert_eq!(stick.holder(), Some(3));

        guard.release();
        assert!(!stick.is_held());
        assert!(stick.try_acquire(4).is_some());
        // the guard above was a temporary and is already gone
        assert!(!stick.is_held());
    }

    #[test]
    fn test_one_per_adjacency() {
        let ring = Ring::new(5).unwrap();
        let sticks = Chopsticks::for_ring(&ring);
        assert_eq!(sticks.len(), ring.len());

        for seat in ring.seats() {
            let shared = sticks.right_of(seat);
            assert!(std::ptr::eq(shared, sticks.left_of(ring.right(seat))));
            assert!(!std::ptr::eq(sticks.left_of(seat), sticks.right_of(seat)));
        }
    }

    #[test]
    fn test_names_follow_seating() {
        let ring = Ring::new(3).unwrap();
        let sticks = Chopsticks::for_ring(&ring);
        let names: Vec<_> = sticks.iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, ["Chopstick 1", "Chopstick 2", "Chopstick 3"]);
        assert_eq!(sticks.right_of(2).name(), "Chopstick 1");
    }

    #[test]
    fn test_contended_acquire() {
        use std::sync::atomic::AtomicUsize;
        use std::thread;

        const NUM_THREADS: usize = 4;
        const NUM_LOOP: usize = 10000;

        let stick = Chopstick::new(0);
        let inside = AtomicUsize::new(0);

        thread::scope(|s| {
            for seat in 0..NUM_THREADS {
                let stick = &stick;
                let inside = &inside;
                s.spawn(move || {
                    for _ in 0..NUM_LOOP {
                        if let Some(guard) = stick.try_acquire(seat) {
                            assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                            assert_eq!(stick.holder(), Some(seat));
                            inside.fetch_sub(1, Ordering::SeqCst);
                            guard.release();
                        }
                    }
                });
            }
        });

        assert!(!stick.is_held());
    }
}
