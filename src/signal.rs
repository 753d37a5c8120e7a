use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Notified,
    TimedOut,
}

/// Single-waiter wake-up permit.
///
/// `notify` leaves a permit behind when nobody is waiting yet, so a wake-up
/// sent between a philosopher's neighbor check and its `wait` is not lost.
#[derive(Debug, Default)]
pub struct Signal {
    permit: Mutex<bool>,
    cond: Condvar,
}

impl Signal {
    pub fn new() -> Self {
        Signal::default()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        // a panicking worker must not take its neighbors down with it
        self.permit.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn notify(&self) {
        let mut permit = self.lock();
        *permit = true;
        self.cond.notify_one();
    }

    pub fn reset(&self) {
        *self.lock() = false;
    }

    /// Blocks until notified, consuming the permit. With a timeout, gives up
    /// after it elapses and leaves the permit untouched.
    pub fn wait(&self, timeout: Option<Duration>) -> Wake {
        let permit = self.lock();
        match timeout {
            None => {
                let mut permit = self
                    .cond
                    .wait_while(permit, |p| !*p)
                    .unwrap_or_else(PoisonError::into_inner);
                *permit = false;
                Wake::Notified
            }
            Some(timeout) => {
                let (mut permit, _) = self
                    .cond
                    .wait_timeout_while(permit, timeout, |p| !*p)
                    .unwrap_or_else(PoisonError::into_inner);
                if *permit {
                    *permit = false;
                    Wake::Notified
                } else {
                    Wake::TimedOut
                }
            }
        }
    }
}
