//! Repeating timers for the polling counter
//!
//! A [`Timer`] is owned by exactly one counter. Releasing it consumes the
//! value, so a timer cannot be released twice. [`TimerGuard`] ties that single
//! release to every exit path of the owner, including unwinding and dropped
//! futures.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::debug;

use crate::counter::CounterError;

/// A repeating timer
#[async_trait]
pub trait Timer: Send {
    /// Wait for the next firing
    async fn tick(&mut self);

    /// Release the timer. No further ticks are delivered after this.
    fn cancel(self);
}

/// Tokio-backed repeating timer
///
/// The first firing happens one full period after creation. If the owner
/// falls behind, missed firings are delayed instead of delivered in a burst.
#[derive(Debug)]
pub struct IntervalTimer {
    interval: Interval,
    period: Duration,
}

impl IntervalTimer {
    /// Create a timer firing every `period`
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(period: Duration) -> Result<Self, CounterError> {
        debug!(?period, "IntervalTimer::new: called");
        if period.is_zero() {
            return Err(CounterError::InvalidPeriod { period_ms: 0 });
        }

        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Ok(Self { interval, period })
    }

    /// Get the tick period
    pub fn period(&self) -> Duration {
        self.period
    }
}

#[async_trait]
impl Timer for IntervalTimer {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }

    fn cancel(self) {
        debug!(period_ms = self.period.as_millis() as u64, "IntervalTimer::cancel: released");
    }
}

/// Owns a live timer and releases it exactly once
///
/// Release happens on the first call to [`TimerGuard::release`] or, failing
/// that, when the guard is dropped.
pub struct TimerGuard<T: Timer> {
    timer: Option<T>,
}

impl<T: Timer> TimerGuard<T> {
    pub fn new(timer: T) -> Self {
        Self { timer: Some(timer) }
    }

    /// Wait for the next tick
    ///
    /// Returns false without waiting once the timer has been released.
    pub async fn tick(&mut self) -> bool {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.tick().await;
                true
            }
            None => false,
        }
    }

    /// Release the timer if it is still live. Returns whether this call released it.
    pub fn release(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                timer.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_live(&self) -> bool {
        self.timer.is_some()
    }
}

impl<T: Timer> Drop for TimerGuard<T> {
    fn drop(&mut self) {
        if self.release() {
            debug!("TimerGuard::drop: released live timer");
        }
    }
}
