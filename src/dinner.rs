use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{DinnerConfig, Strategy};
use crate::error::{Error, Result};
use crate::event::{EventSink, TracingSink};
use crate::table::{set_table, Table};

/// Seats everyone, runs one thread per philosopher and waits for all of
/// them to leave.
pub struct Dinner {
    config: DinnerConfig,
    sink: Arc<dyn EventSink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DinnerReport {
    pub strategy: Strategy,
    /// Meals eaten, indexed by seat.
    pub meals: Vec<usize>,
    pub elapsed: Duration,
}

impl DinnerReport {
    pub fn is_complete(&self, target: usize) -> bool {
        self.meals.iter().all(|&m| m == target)
    }

    pub fn total_meals(&self) -> usize {
        self.meals.iter().sum()
    }
}

impl Dinner {
    pub fn new(config: DinnerConfig) -> Self {
        Dinner {
            config,
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn run(&self) -> Result<DinnerReport> {
        let table = set_table(&self.config, self.sink.clone())?;
        let start = Instant::now();

        info!("Dinner is starting!");

        let mut handles: Vec<(usize, JoinHandle<()>)> = Vec::new();
        let mut spawn_error = None;
        for seat in table.ring().seats() {
            match spawn_philosopher(&table, seat) {
                Ok(handle) => handles.push((seat, handle)),
                Err(e) => {
                    spawn_error = Some(e);
                    break;
                }
            }
        }

        // the ones already seated still finish on their own
        let mut join_error = None;
        for (seat, handle) in handles {
            if handle.join().is_err() {
                warn!(seat, "philosopher thread panicked");
                join_error.get_or_insert(Error::WorkerPanicked { seat });
            } else {
                debug!(seat, "philosopher left the table");
            }
        }

        if let Some(e) = spawn_error.or(join_error) {
            return Err(e);
        }

        info!("Dinner is over!");

        Ok(DinnerReport {
            strategy: table.strategy(),
            meals: table.meals_eaten(),
            elapsed: start.elapsed(),
        })
    }
}

fn spawn_philosopher(table: &Arc<dyn Table>, seat: usize) -> Result<JoinHandle<()>> {
    let table = table.clone();
    thread::Builder::new()
        .name(format!("philosopher-{seat}"))
        .spawn(move || table.dine(seat))
        .map_err(|source| Error::Spawn { seat, source })
}
