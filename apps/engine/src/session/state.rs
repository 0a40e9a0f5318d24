//! Session lifecycle types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::risk::RunCategory;

/// Mode of a trading session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunMode {
    /// Log-only run with a shadow executor.
    Shadow,
    /// Run against the exchange sandbox.
    Testnet,
}

impl RunMode {
    /// The ledger category this mode's PnL is recorded under.
    #[must_use]
    pub const fn category(&self) -> RunCategory {
        match self {
            Self::Shadow => RunCategory::Shadow,
            Self::Testnet => RunCategory::Testnet,
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shadow => write!(f, "SHADOW"),
            Self::Testnet => write!(f, "TESTNET"),
        }
    }
}

/// Lifecycle state of a session.
///
/// `Pending → Running → {Stopped, Failed}`; terminal states are final and a
/// run id is never reused after termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    /// Registered but not yet running.
    Pending,
    /// Loop is live.
    Running,
    /// Loop exited normally (cooperative stop or feed exhaustion).
    Stopped,
    /// Loop exited on an error.
    Failed,
}

impl RunState {
    /// Returns true for final states.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Failed)
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Running => write!(f, "RUNNING"),
            Self::Stopped => write!(f, "STOPPED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Read-only snapshot of one session's state and metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatus {
    /// Unique run id.
    pub run_id: String,
    /// Session mode.
    pub mode: RunMode,
    /// Strategy key driving the session.
    pub strategy: String,
    /// Traded symbol.
    pub symbol: String,
    /// Candle timeframe.
    pub timeframe: String,
    /// Current lifecycle state.
    pub state: RunState,
    /// When the loop started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the loop exited.
    pub ended_at: Option<DateTime<Utc>>,
    /// Last error, for failed sessions.
    pub last_error: Option<String>,
    /// Free-form operator notes.
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!RunState::Pending.is_terminal());
        assert!(!RunState::Running.is_terminal());
        assert!(RunState::Stopped.is_terminal());
        assert!(RunState::Failed.is_terminal());
    }

    #[test]
    fn test_mode_maps_to_ledger_category() {
        assert_eq!(RunMode::Shadow.category(), RunCategory::Shadow);
        assert_eq!(RunMode::Testnet.category(), RunCategory::Testnet);
    }
}
