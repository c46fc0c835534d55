//! Integration tests for the polling counter
//!
//! Timing runs on tokio's paused clock so one-second periods cost nothing.

mod common;

use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pollcounter::{CounterConfig, CounterError, CounterState, PollingCounter, run_with_timer, spawn_with_timer};
use proptest::prelude::*;
use thiserror::Error;

use common::recording_timer;

#[derive(Debug, Error)]
#[error("callback raised at {0}")]
struct Raised(u64);

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .expect("Failed to build runtime")
}

// =============================================================================
// Scenario Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_logs_one_through_five_at_one_second_intervals() {
    let start = tokio::time::Instant::now();
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_cb = log.clone();

    let outcome = PollingCounter::default()
        .run(move |count| {
            log_cb.lock().unwrap().push((count, start.elapsed()));
            count == 5
        })
        .await
        .expect("Counter should stop at 5");

    let expected: Vec<_> = (1..=5u64).map(|n| (n, Duration::from_secs(n))).collect();
    assert_eq!(*log.lock().unwrap(), expected);
    assert_eq!(outcome.final_count, 5);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(log.lock().unwrap().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_error_on_third_invocation() {
    let (timer, timer_log) = recording_timer(Duration::from_secs(1));
    let logged = Arc::new(Mutex::new(Vec::new()));
    let logged_cb = logged.clone();

    let err = run_with_timer(timer, move |count| {
        if count == 3 {
            return Err(Raised(count));
        }
        logged_cb.lock().unwrap().push(count);
        Ok(false)
    })
    .await
    .unwrap_err();

    assert!(matches!(err, CounterError::CallbackFailure { count: 3, .. }));
    assert_eq!(err.to_string(), "Callback failed at count 3: callback raised at 3");
    assert_eq!(*logged.lock().unwrap(), vec![1, 2]);
    assert_eq!(timer_log.cancels(), 1);

    let ticks = timer_log.ticks();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(timer_log.ticks(), ticks);
}

#[tokio::test(start_paused = true)]
async fn test_custom_period() {
    let counter = PollingCounter::new(CounterConfig { period_ms: 250 });
    let outcome = counter.run(|count| count == 4).await.unwrap();

    assert_eq!(outcome.final_count, 4);
    assert_eq!(outcome.elapsed_ms, 1000);
}

#[tokio::test(start_paused = true)]
async fn test_spawned_counter_reports_progress() {
    let counter = PollingCounter::new(CounterConfig { period_ms: 100 });
    let mut handle = counter.spawn(|count| Ok::<_, Infallible>(count == 10)).unwrap();

    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(handle.state(), CounterState::Running);
    assert_eq!(handle.count(), 3);

    let status = handle.wait_stopped().await;
    assert_eq!(status.count, 10);
    assert!(handle.state().is_stopped());
    assert_eq!(handle.join().await.unwrap().final_count, 10);
}

#[tokio::test(start_paused = true)]
async fn test_spawned_callback_failure_surfaces_through_join() {
    let (timer, timer_log) = recording_timer(Duration::from_millis(10));
    let handle = spawn_with_timer(timer, |count| if count == 2 { Err(Raised(count)) } else { Ok(false) });

    let err = handle.join().await.unwrap_err();
    assert!(err.is_callback_failure());
    assert_eq!(err.count(), Some(2));
    assert_eq!(timer_log.cancels(), 1);
}

#[tokio::test]
async fn test_spawn_rejects_zero_period() {
    let counter = PollingCounter::new(CounterConfig { period_ms: 0 });
    let result = counter.spawn(|_| Ok::<_, Infallible>(true));
    assert!(matches!(result, Err(CounterError::InvalidPeriod { period_ms: 0 })));
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_stops_on_kth_invocation(k in 1u64..64) {
        let rt = paused_runtime();
        let (calls, outcome, cancels) = rt.block_on(async {
            let (timer, timer_log) = recording_timer(Duration::from_millis(1000));
            let mut calls = Vec::new();
            let outcome = run_with_timer(timer, |count| {
                calls.push(count);
                Ok::<_, Infallible>(count == k)
            })
            .await;
            (calls, outcome, timer_log.cancels())
        });

        let expected: Vec<u64> = (1..=k).collect();
        prop_assert_eq!(calls, expected);
        prop_assert_eq!(outcome.unwrap().final_count, k);
        prop_assert_eq!(cancels, 1);
    }

    #[test]
    fn prop_failure_on_kth_invocation_aborts(k in 1u64..64) {
        let rt = paused_runtime();
        let (calls, err, cancels) = rt.block_on(async {
            let (timer, timer_log) = recording_timer(Duration::from_millis(10));
            let mut calls = Vec::new();
            let result = run_with_timer(timer, |count| {
                calls.push(count);
                if count == k { Err(Raised(count)) } else { Ok(false) }
            })
            .await;
            (calls, result.unwrap_err(), timer_log.cancels())
        });

        prop_assert_eq!(calls.len() as u64, k);
        prop_assert_eq!(err.count(), Some(k));
        prop_assert_eq!(cancels, 1);
    }
}
