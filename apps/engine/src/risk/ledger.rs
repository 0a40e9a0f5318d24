//! Risk ledger port.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Run categories a ledger query may be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunCategory {
    /// Shadow (log-only) runs.
    Shadow,
    /// Testnet runs.
    Testnet,
    /// Live runs.
    Live,
}

/// Ledger query failure.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// The ledger could not be reached or read.
    #[error("risk ledger unavailable: {0}")]
    Unavailable(String),
}

/// Read-only query over an external, append-only PnL ledger.
///
/// The limiter only ever asks for one aggregated figure; it never writes.
#[cfg_attr(test, automock)]
pub trait RiskLedger: Send + Sync {
    /// Aggregated realized PnL for `day` (UTC) across the given categories.
    fn daily_realized_pnl(
        &self,
        day: NaiveDate,
        categories: &[RunCategory],
    ) -> Result<Decimal, LedgerError>;
}

/// Ledger stub reporting zero realized PnL.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRiskLedger;

impl RiskLedger for NullRiskLedger {
    fn daily_realized_pnl(
        &self,
        _day: NaiveDate,
        _categories: &[RunCategory],
    ) -> Result<Decimal, LedgerError> {
        Ok(Decimal::ZERO)
    }
}
