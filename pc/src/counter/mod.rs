//! Tick-driven polling counter
//!
//! A counter starts at 1 and, on every timer tick, hands the current count to
//! a predicate callback. When the callback reports completion the timer is
//! released and the counter stops; otherwise the count advances and the
//! counter waits for the next tick. Callback failures abort the sequence.
//!
//! The counter runs either inline ([`PollingCounter::run`]) or as its own
//! tokio task ([`PollingCounter::spawn`]) observed through a [`CounterHandle`].

mod core;
mod error;
mod handle;
mod state;

pub use core::{PollingCounter, run_with_timer};
pub use error::CounterError;
pub use handle::{CounterHandle, spawn_with_timer};
pub use state::{CounterOutcome, CounterState, CounterStatus};
