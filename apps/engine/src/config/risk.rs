//! Risk limiter thresholds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Admission-control thresholds for the risk limiter.
///
/// Every cap is optional; an absent cap means that dimension is unlimited.
/// Soft (WARN) thresholds are derived from the hard caps via `warn_ratio`,
/// which keeps them at or below the hard caps by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Master enable flag; when false, checks report metrics but never block.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Escalate violations to a hard stop at the enforcing call site.
    #[serde(default = "default_true")]
    pub block_on_violation: bool,
    /// Maximum notional for a single order.
    #[serde(default)]
    pub max_order_notional: Option<Decimal>,
    /// Maximum aggregate notional per symbol.
    #[serde(default)]
    pub max_symbol_exposure_notional: Option<Decimal>,
    /// Maximum total notional across a batch or portfolio.
    #[serde(default)]
    pub max_total_exposure_notional: Option<Decimal>,
    /// Maximum number of distinct open positions.
    #[serde(default)]
    pub max_open_positions: Option<u32>,
    /// Maximum daily loss, absolute.
    #[serde(default)]
    pub max_daily_loss: Option<Decimal>,
    /// Maximum daily loss as a percentage of starting capital.
    #[serde(default)]
    pub max_daily_loss_pct: Option<Decimal>,
    /// Starting capital, required when `max_daily_loss_pct` is set.
    #[serde(default)]
    pub starting_capital: Option<Decimal>,
    /// Soft-threshold ratio in (0, 1]; absent disables WARN grading.
    #[serde(default)]
    pub warn_ratio: Option<Decimal>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            block_on_violation: true,
            max_order_notional: None,
            max_symbol_exposure_notional: None,
            max_total_exposure_notional: None,
            max_open_positions: None,
            max_daily_loss: None,
            max_daily_loss_pct: None,
            starting_capital: None,
            warn_ratio: None,
        }
    }
}

impl RiskConfig {
    /// Soft threshold for a hard cap, when warn grading is configured.
    #[must_use]
    pub fn soft_threshold(&self, hard: Decimal) -> Option<Decimal> {
        self.warn_ratio.map(|ratio| hard * ratio)
    }
}

const fn default_true() -> bool {
    true
}
