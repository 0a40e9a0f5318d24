//! Risk check outcome types.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ordered severity classification of a risk-check outcome.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskSeverity {
    /// No threshold approached.
    Ok,
    /// A soft threshold was crossed; the action still proceeds.
    Warn,
    /// A hard threshold was exceeded; the action is blocked.
    Block,
}

impl std::fmt::Display for RiskSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Warn => write!(f, "WARN"),
            Self::Block => write!(f, "BLOCK"),
        }
    }
}

/// Severity-classified admission decision.
///
/// Produced per call and never persisted by the core. Metrics are fully
/// populated even when the check passes, so callers get visibility without
/// enforcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskCheckResult {
    /// Whether the proposed action may proceed.
    pub allowed: bool,
    /// Maximum severity across all evaluated dimensions.
    pub severity: RiskSeverity,
    /// One entry per threshold crossing, in evaluation order.
    pub reasons: Vec<String>,
    /// Every computed metric, keyed by name.
    pub metrics: BTreeMap<String, Decimal>,
}

impl RiskCheckResult {
    /// A passing result carrying the given metrics.
    #[must_use]
    pub fn passed(metrics: BTreeMap<String, Decimal>) -> Self {
        Self {
            allowed: true,
            severity: RiskSeverity::Ok,
            reasons: Vec::new(),
            metrics,
        }
    }

    /// Summarize reasons into a single line for event fields.
    #[must_use]
    pub fn reason_summary(&self) -> String {
        self.reasons.join("; ")
    }
}
