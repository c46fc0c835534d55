//! Shared test helpers

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pollcounter::Timer;

/// Timer that ticks every `period` on the tokio clock and counts releases
pub struct RecordingTimer {
    period: Duration,
    ticks: Arc<AtomicUsize>,
    cancels: Arc<AtomicUsize>,
}

/// Observations shared with a [`RecordingTimer`]
#[derive(Clone, Default)]
pub struct TimerLog {
    ticks: Arc<AtomicUsize>,
    cancels: Arc<AtomicUsize>,
}

impl TimerLog {
    pub fn ticks(&self) -> usize {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

pub fn recording_timer(period: Duration) -> (RecordingTimer, TimerLog) {
    let log = TimerLog::default();
    let timer = RecordingTimer {
        period,
        ticks: log.ticks.clone(),
        cancels: log.cancels.clone(),
    };
    (timer, log)
}

#[async_trait]
impl Timer for RecordingTimer {
    async fn tick(&mut self) {
        tokio::time::sleep(self.period).await;
        self.ticks.fetch_add(1, Ordering::SeqCst);
    }

    fn cancel(self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}
