//! Alert sink port for risk violations.

use thiserror::Error;
use tracing::{error, warn};

#[cfg(test)]
use mockall::automock;

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    /// Advisory; the violation was observed but not enforced.
    Warning,
    /// The violation blocked an action.
    Critical,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A risk alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Severity of the alert.
    pub severity: AlertSeverity,
    /// Short title.
    pub title: String,
    /// Reason lines carried from the originating check.
    pub reasons: Vec<String>,
}

/// Alert delivery failure.
#[derive(Debug, Clone, Error)]
pub enum AlertError {
    /// The sink could not deliver the alert.
    #[error("alert delivery failed: {0}")]
    Delivery(String),
}

/// Transport-agnostic alert emission port.
///
/// Concrete transports (webhook, email, chat) live outside the core.
#[cfg_attr(test, automock)]
pub trait AlertSink: Send + Sync {
    /// Emit one alert.
    fn emit(&self, alert: &Alert) -> Result<(), AlertError>;
}

/// Alert sink that writes through the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn emit(&self, alert: &Alert) -> Result<(), AlertError> {
        match alert.severity {
            AlertSeverity::Critical => {
                error!(title = %alert.title, reasons = ?alert.reasons, "risk alert");
            }
            AlertSeverity::Warning => {
                warn!(title = %alert.title, reasons = ?alert.reasons, "risk alert");
            }
        }
        Ok(())
    }
}
