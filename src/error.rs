use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("a table needs at least 2 philosophers, got {count}")]
    TooFewPhilosophers { count: usize },

    #[error("unknown strategy: {0} (valid: try-acquire, wait-notify)")]
    UnknownStrategy(String),

    #[error("unknown backoff: {0} (valid: spin, yield, jitter)")]
    UnknownBackoff(String),

    #[error("failed to spawn worker for philosopher {seat}")]
    Spawn {
        seat: usize,
        #[source]
        source: io::Error,
    },

    #[error("worker for philosopher {seat} panicked")]
    WorkerPanicked { seat: usize },
}
