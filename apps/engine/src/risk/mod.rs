//! Risk admission control.
//!
//! The limiter evaluates proposed order batches and portfolio snapshots
//! against configured thresholds; the ledger and alert sink are narrow
//! ports to external systems.

mod alert;
mod ledger;
mod limiter;
mod price_book;
mod result;

pub use alert::{Alert, AlertError, AlertSeverity, AlertSink, LogAlertSink};
pub use ledger::{LedgerError, NullRiskLedger, RiskLedger, RunCategory};
pub use limiter::RiskLimiter;
pub use price_book::PriceBook;
pub use result::{RiskCheckResult, RiskSeverity};
