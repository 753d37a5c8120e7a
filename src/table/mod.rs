//! The two ways of sharing chopsticks around a ring.

use std::sync::Arc;

use tracing::debug;

use crate::config::{DinnerConfig, Strategy};
use crate::error::Result;
use crate::event::EventSink;
use crate::philosopher::Philosopher;
use crate::ring::Ring;

mod try_acquire;
mod wait_notify;

pub use try_acquire::{Held, TryAcquireTable};
pub use wait_notify::WaitNotifyTable;

/// A set table: the philosophers, whatever they share, and the lifecycle
/// each of them runs on its own thread.
pub trait Table: Send + Sync {
    fn strategy(&self) -> Strategy;

    fn ring(&self) -> &Ring;

    fn philosophers(&self) -> &[Philosopher];

    fn meals_target(&self) -> usize;

    /// Runs the philosopher at `seat` until it has eaten `meals_target`
    /// meals.
    fn dine(&self, seat: usize);

    fn philosopher(&self, seat: usize) -> &Philosopher {
        &self.philosophers()[seat]
    }

    fn meals_eaten(&self) -> Vec<usize> {
        self.philosophers().iter().map(Philosopher::meals_eaten).collect()
    }
}

pub fn set_table(config: &DinnerConfig, sink: Arc<dyn EventSink>) -> Result<Arc<dyn Table>> {
    config.validate()?;
    let ring = Ring::new(config.philosophers)?;

    debug!(
        strategy = %config.strategy,
        philosophers = ring.len(),
        meals = config.meals,
        "setting the table"
    );

    let table: Arc<dyn Table> = match config.strategy {
        Strategy::TryAcquire => Arc::new(TryAcquireTable::new(
            ring,
            config.meals,
            config.backoff,
            sink,
        )),
        Strategy::WaitNotify => Arc::new(WaitNotifyTable::new(
            ring,
            config.meals,
            config.recheck,
            sink,
        )),
    };
    Ok(table)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::event::NullSink;

    #[test]
    fn test_set_table_by_strategy() {
        for strategy in [Strategy::TryAcquire, Strategy::WaitNotify] {
            let config = DinnerConfig {
                philosophers: 4,
                meals: 2,
                strategy,
                ..Default::default()
            };
            let table = set_table(&config, Arc::new(NullSink)).unwrap();
            assert_eq!(table.strategy(), strategy);
            assert_eq!(table.ring().len(), 4);
            assert_eq!(table.meals_target(), 2);
            assert_eq!(table.meals_eaten(), vec![0; 4]);
            assert_eq!(table.philosopher(3).name(), "Philosopher 3");
        }
    }

    #[test]
    fn test_set_table_rejects_single_seat() {
        let config = DinnerConfig {
            philosophers: 1,
            ..Default::default()
        };
        assert!(set_table(&config, Arc::new(NullSink)).is_err());
    }
}
