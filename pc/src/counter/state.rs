//! Counter state and results

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterState {
    /// Timer live, waiting for the next tick
    Running,
    /// Timer released, no further callback invocations
    Stopped,
}

impl CounterState {
    pub fn is_stopped(&self) -> bool {
        matches!(self, CounterState::Stopped)
    }
}

impl fmt::Display for CounterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterState::Running => write!(f, "running"),
            CounterState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Point-in-time view of a counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterStatus {
    pub state: CounterState,
    /// Last count handed to the callback (0 before the first tick)
    pub count: u64,
}

impl CounterStatus {
    pub(crate) fn initial() -> Self {
        Self {
            state: CounterState::Running,
            count: 0,
        }
    }
}

/// Result of a counter that stopped because its callback reported completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterOutcome {
    /// Count for which the callback returned true
    pub final_count: u64,
    /// Time from start to the final tick, in milliseconds
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display_and_serde() {
        assert_eq!(CounterState::Running.to_string(), "running");
        assert_eq!(CounterState::Stopped.to_string(), "stopped");
        assert_eq!(serde_json::to_string(&CounterState::Stopped).unwrap(), "\"stopped\"");
    }

    #[test]
    fn test_initial_status() {
        let status = CounterStatus::initial();
        assert_eq!(status.state, CounterState::Running);
        assert_eq!(status.count, 0);
        assert!(!status.state.is_stopped());
    }
}
