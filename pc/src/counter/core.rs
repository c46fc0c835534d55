//! PollingCounter - inline tick loop

use std::convert::Infallible;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::error::CounterError;
use super::handle::{CounterHandle, spawn_with_timer};
use super::state::{CounterOutcome, CounterState, CounterStatus};
use crate::config::CounterConfig;
use crate::timer::{IntervalTimer, Timer, TimerGuard};

/// Counter that feeds an incrementing count to a callback once per tick
#[derive(Debug, Clone, Default)]
pub struct PollingCounter {
    config: CounterConfig,
}

impl PollingCounter {
    pub fn new(config: CounterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// Run until `callback` returns true
    pub async fn run<F>(&self, mut callback: F) -> Result<CounterOutcome, CounterError>
    where
        F: FnMut(u64) -> bool + Send,
    {
        self.try_run(move |count| Ok::<_, Infallible>(callback(count))).await
    }

    /// Run until `callback` returns `Ok(true)` or fails
    ///
    /// A failing callback stops the counter immediately. Its error is returned
    /// as [`CounterError::CallbackFailure`] and the timer is released first.
    pub async fn try_run<F, E>(&self, callback: F) -> Result<CounterOutcome, CounterError>
    where
        F: FnMut(u64) -> Result<bool, E> + Send,
        E: std::error::Error + Send + Sync + 'static,
    {
        debug!(period_ms = self.config.period_ms, "PollingCounter::try_run: called");
        self.config.validate()?;
        let timer = IntervalTimer::new(self.config.period())?;
        run_with_timer(timer, callback).await
    }

    /// Run the counter as its own task
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, E>(&self, callback: F) -> Result<CounterHandle, CounterError>
    where
        F: FnMut(u64) -> Result<bool, E> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        debug!(period_ms = self.config.period_ms, "PollingCounter::spawn: called");
        self.config.validate()?;
        let timer = IntervalTimer::new(self.config.period())?;
        Ok(spawn_with_timer(timer, callback))
    }
}

/// Run the tick loop over any timer
pub async fn run_with_timer<T, F, E>(timer: T, callback: F) -> Result<CounterOutcome, CounterError>
where
    T: Timer,
    F: FnMut(u64) -> Result<bool, E> + Send,
    E: std::error::Error + Send + Sync + 'static,
{
    let (status_tx, _) = watch::channel(CounterStatus::initial());
    drive(timer, callback, 1, &status_tx).await
}

/// Core state machine shared by the inline and spawned counters
///
/// Publishes every count it hands out on `status`, and a final `Stopped`
/// status on any return path.
pub(crate) async fn drive<T, F, E>(
    timer: T,
    mut callback: F,
    start: u64,
    status: &watch::Sender<CounterStatus>,
) -> Result<CounterOutcome, CounterError>
where
    T: Timer,
    F: FnMut(u64) -> Result<bool, E> + Send,
    E: std::error::Error + Send + Sync + 'static,
{
    let started = Instant::now();
    let mut guard = TimerGuard::new(timer);
    let mut count = start;

    // Every release below returns, so the guard is live on each pass
    loop {
        guard.tick().await;
        debug!(count, "drive: tick");
        status.send_replace(CounterStatus {
            state: CounterState::Running,
            count,
        });

        let result = callback(count);
        match result {
            Ok(true) => {
                guard.release();
                stop(status, count);
                let elapsed_ms = started.elapsed().as_millis() as u64;
                info!(count, elapsed_ms, "Counter stopped");
                return Ok(CounterOutcome {
                    final_count: count,
                    elapsed_ms,
                });
            }
            Ok(false) => match count.checked_add(1) {
                Some(next) => count = next,
                None => {
                    guard.release();
                    stop(status, count);
                    warn!(count, "Counter overflowed");
                    return Err(CounterError::Overflow { count });
                }
            },
            Err(e) => {
                guard.release();
                stop(status, count);
                warn!(count, error = %e, "Callback failed, counter aborted");
                return Err(CounterError::CallbackFailure {
                    count,
                    source: Box::new(e),
                });
            }
        }
    }
}

fn stop(status: &watch::Sender<CounterStatus>, count: u64) {
    status.send_replace(CounterStatus {
        state: CounterState::Stopped,
        count,
    });
}
