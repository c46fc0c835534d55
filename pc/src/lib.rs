//! PollCounter - tick-driven polling counter
//!
//! Hands an incrementing count to a predicate callback once per timer tick
//! and stops when the predicate says so.
//!
//! # Core Concepts
//!
//! - **Tick-driven**: the count advances inside the tick, never in a loop racing it
//! - **Single release**: the timer is released exactly once, on every exit path
//! - **Fail fast**: a failing callback aborts the sequence with no retry
//!
//! # Modules
//!
//! - [`counter`] - PollingCounter, its state machine and spawned handle
//! - [`timer`] - Timer trait, tokio interval timer and release guard
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use pollcounter::PollingCounter;
//!
//! let outcome = PollingCounter::default()
//!     .run(|count| {
//!         println!("{count}");
//!         count == 5
//!     })
//!     .await?;
//! ```

pub mod cli;
pub mod config;
pub mod counter;
pub mod timer;

pub use config::{Config, CounterConfig};
pub use counter::{
    CounterError, CounterHandle, CounterOutcome, CounterState, CounterStatus, PollingCounter, run_with_timer,
    spawn_with_timer,
};
pub use timer::{IntervalTimer, Timer, TimerGuard};
