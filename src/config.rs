use std::fmt;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::error::{Error, Result};

pub const DEFAULT_PHILOSOPHERS: usize = 5;
pub const DEFAULT_MEALS: usize = 5;
pub const DEFAULT_RECHECK: Duration = Duration::from_millis(10);
pub const DEFAULT_JITTER: Duration = Duration::from_micros(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Non-blocking pick-up of left then right, dropping the left on failure.
    TryAcquire,
    /// Neighbor-state inspection, sleeping until a neighbor wakes us.
    WaitNotify,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::TryAcquire => "try-acquire",
            Strategy::WaitNotify => "wait-notify",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "try-acquire" | "try_acquire" | "opportunistic" | "a" => Ok(Strategy::TryAcquire),
            "wait-notify" | "wait_notify" | "cooperative" | "b" => Ok(Strategy::WaitNotify),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}

/// What a try-acquire philosopher does after failing to get both chopsticks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Retry right away, with only a spin-loop hint.
    Spin,
    /// Yield the rest of the time slice and retry.
    #[default]
    Yield,
    /// Sleep for a random duration up to `max`.
    Jitter { max: Duration },
}

impl Backoff {
    pub fn pause(&self) {
        match *self {
            Backoff::Spin => std::hint::spin_loop(),
            Backoff::Yield => thread::yield_now(),
            Backoff::Jitter { max } => {
                let max_us = max.as_micros() as u64;
                let us = rand::thread_rng().gen_range(0..=max_us);
                thread::sleep(Duration::from_micros(us));
            }
        }
    }

    /// Parses `spin`, `yield` or `jitter`; `jitter` sleeps up to `max_jitter`.
    pub fn parse(s: &str, max_jitter: Duration) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "spin" => Ok(Backoff::Spin),
            "yield" => Ok(Backoff::Yield),
            "jitter" => Ok(Backoff::Jitter { max: max_jitter }),
            _ => Err(Error::UnknownBackoff(s.to_string())),
        }
    }
}

impl FromStr for Backoff {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Backoff::parse(s, DEFAULT_JITTER)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DinnerConfig {
    pub philosophers: usize,
    /// Meals each philosopher eats before leaving the table.
    pub meals: usize,
    pub strategy: Strategy,
    /// Used by the try-acquire table only.
    pub backoff: Backoff,
    /// How often a waiting philosopher rechecks its neighbors on its own
    /// (wait-notify only). `None` waits for an explicit wake-up forever.
    pub recheck: Option<Duration>,
}

impl Default for DinnerConfig {
    fn default() -> Self {
        Self {
            philosophers: DEFAULT_PHILOSOPHERS,
            meals: DEFAULT_MEALS,
            strategy: Strategy::TryAcquire,
            backoff: Backoff::default(),
            recheck: Some(DEFAULT_RECHECK),
        }
    }
}

impl DinnerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.philosophers < 2 {
            return Err(Error::TooFewPhilosophers {
                count: self.philosophers,
            });
        }
        Ok(())
    }
}
