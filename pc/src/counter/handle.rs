//! CounterHandle - observe and control a spawned counter

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::core::drive;
use super::error::CounterError;
use super::state::{CounterOutcome, CounterState, CounterStatus};
use crate::timer::Timer;

/// Handle to a counter running as its own tokio task
///
/// Dropping the handle cancels the counter and releases its timer.
pub struct CounterHandle {
    /// Latest status published by the task
    status: watch::Receiver<CounterStatus>,

    /// Fires (or closes) to stop the task
    cancel_tx: oneshot::Sender<()>,

    task: JoinHandle<Result<CounterOutcome, CounterError>>,
}

/// Spawn the tick loop over any timer
///
/// Must be called from within a tokio runtime.
pub fn spawn_with_timer<T, F, E>(timer: T, callback: F) -> CounterHandle
where
    T: Timer + 'static,
    F: FnMut(u64) -> Result<bool, E> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let (status_tx, status_rx) = watch::channel(CounterStatus::initial());
    let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        tokio::select! {
            result = drive(timer, callback, 1, &status_tx) => result,
            _ = cancel_rx => {
                // Dropping drive's future releases the timer through its guard
                let count = status_tx.borrow().count;
                status_tx.send_replace(CounterStatus {
                    state: CounterState::Stopped,
                    count,
                });
                info!(count, "Counter cancelled");
                Err(CounterError::Cancelled { count })
            }
        }
    });

    CounterHandle {
        status: status_rx,
        cancel_tx,
        task,
    }
}

impl CounterHandle {
    /// Get the latest status
    pub fn status(&self) -> CounterStatus {
        *self.status.borrow()
    }

    pub fn state(&self) -> CounterState {
        self.status().state
    }

    /// Last count handed to the callback (0 before the first tick)
    pub fn count(&self) -> u64 {
        self.status().count
    }

    /// Wait until the counter reaches `Stopped`
    pub async fn wait_stopped(&mut self) -> CounterStatus {
        debug!("CounterHandle::wait_stopped: called");
        let stopped = self.status.wait_for(|s| s.state.is_stopped()).await.map(|s| *s);
        match stopped {
            Ok(status) => status,
            Err(_) => {
                // Task ended without publishing a final status (callback panicked)
                let count = self.status.borrow().count;
                CounterStatus {
                    state: CounterState::Stopped,
                    count,
                }
            }
        }
    }

    /// Stop the counter and return its final result
    ///
    /// If the counter had already stopped on its own, its own result is returned.
    pub async fn cancel(self) -> Result<CounterOutcome, CounterError> {
        debug!(count = self.count(), "CounterHandle::cancel: called");
        let Self { status, cancel_tx, task } = self;
        let _ = cancel_tx.send(());
        join_task(task, &status).await
    }

    /// Wait for the counter to finish and return its result
    pub async fn join(self) -> Result<CounterOutcome, CounterError> {
        debug!("CounterHandle::join: called");
        let Self { status, cancel_tx, task } = self;
        let result = join_task(task, &status).await;
        drop(cancel_tx);
        result
    }
}

async fn join_task(
    task: JoinHandle<Result<CounterOutcome, CounterError>>,
    status: &watch::Receiver<CounterStatus>,
) -> Result<CounterOutcome, CounterError> {
    match task.await {
        Ok(result) => result,
        Err(e) if e.is_panic() => {
            let payload = e.into_panic();
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(CounterError::TaskPanicked(message))
        }
        Err(_) => Err(CounterError::Cancelled {
            count: status.borrow().count,
        }),
    }
}
