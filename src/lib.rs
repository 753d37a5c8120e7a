//! Dining philosophers around a ring, with two ways of sharing chopsticks.
//!
//! - [`TryAcquireTable`]: non-blocking pick-up of both chopsticks, putting
//!   the first one back when the second is taken.
//! - [`WaitNotifyTable`]: no chopsticks, philosophers watch their neighbors
//!   and wake each other up.
//!
//! [`Dinner`] runs either one with a thread per philosopher.

pub mod chopstick;
pub mod config;
pub mod dinner;
pub mod error;
pub mod event;
pub mod philosopher;
pub mod ring;
pub mod signal;
pub mod state;
pub mod table;

pub use config::{Backoff, DinnerConfig, Strategy};
pub use dinner::{Dinner, DinnerReport};
pub use error::{Error, Result};
pub use event::{Event, EventKind, EventSink, NullSink, RecordingSink, Side, TracingSink};
pub use ring::Ring;
pub use state::State;
pub use table::{set_table, Table, TryAcquireTable, WaitNotifyTable};
