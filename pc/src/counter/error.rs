//! Counter error types

use thiserror::Error;

/// Errors that can occur while running a counter
#[derive(Debug, Error)]
pub enum CounterError {
    #[error("Callback failed at count {count}: {source}")]
    CallbackFailure {
        count: u64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid tick period {period_ms}ms, must be greater than zero")]
    InvalidPeriod { period_ms: u64 },

    #[error("Count overflowed after {count}")]
    Overflow { count: u64 },

    #[error("Counter cancelled at count {count}")]
    Cancelled { count: u64 },

    #[error("Counter task panicked: {0}")]
    TaskPanicked(String),
}

impl CounterError {
    /// Check if the callback itself raised this error
    pub fn is_callback_failure(&self) -> bool {
        matches!(self, CounterError::CallbackFailure { .. })
    }

    /// Get the count the counter had reached when it failed, if known
    pub fn count(&self) -> Option<u64> {
        match self {
            CounterError::CallbackFailure { count, .. }
            | CounterError::Overflow { count }
            | CounterError::Cancelled { count } => Some(*count),
            CounterError::InvalidPeriod { .. } | CounterError::TaskPanicked(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug, Error)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn test_is_callback_failure() {
        let err = CounterError::CallbackFailure {
            count: 3,
            source: Box::new(Boom),
        };
        assert!(err.is_callback_failure());
        assert!(!CounterError::Cancelled { count: 3 }.is_callback_failure());
    }

    #[test]
    fn test_count() {
        assert_eq!(CounterError::Cancelled { count: 7 }.count(), Some(7));
        assert_eq!(CounterError::Overflow { count: u64::MAX }.count(), Some(u64::MAX));
        assert_eq!(CounterError::InvalidPeriod { period_ms: 0 }.count(), None);
        assert_eq!(CounterError::TaskPanicked("oops".to_string()).count(), None);
    }

    #[test]
    fn test_callback_failure_keeps_source() {
        let err = CounterError::CallbackFailure {
            count: 3,
            source: Box::new(Boom),
        };
        assert_eq!(err.to_string(), "Callback failed at count 3: boom");
        assert_eq!(err.source().map(|s| s.to_string()), Some("boom".to_string()));
    }
}
