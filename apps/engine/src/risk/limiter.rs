//! Risk admission-control engine.
//!
//! Evaluates proposed order batches and live portfolio snapshots against the
//! configured thresholds and returns a severity-classified decision. The
//! limiter itself never throws on a violation; enforcement policy lives at
//! the call site.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::warn;

use crate::config::RiskConfig;
use crate::models::{OrderRequest, PortfolioSnapshot};

use super::alert::{Alert, AlertSeverity, AlertSink};
use super::ledger::{RiskLedger, RunCategory};
use super::price_book::PriceBook;
use super::result::{RiskCheckResult, RiskSeverity};

/// Accumulates per-dimension grades into an overall severity.
struct Grader<'a> {
    config: &'a RiskConfig,
    severity: RiskSeverity,
    reasons: Vec<String>,
}

impl<'a> Grader<'a> {
    fn new(config: &'a RiskConfig) -> Self {
        Self {
            config,
            severity: RiskSeverity::Ok,
            reasons: Vec::new(),
        }
    }

    /// Grade one dimension against an optional hard cap.
    fn cap(&mut self, dimension: &str, observed: Decimal, cap: Option<Decimal>) {
        let Some(hard) = cap else { return };
        if observed > hard {
            self.reasons
                .push(format!("{dimension} {observed} exceeds limit {hard}"));
            self.severity = self.severity.max(RiskSeverity::Block);
        } else if let Some(soft) = self.config.soft_threshold(hard)
            && observed > soft
        {
            self.reasons
                .push(format!("{dimension} {observed} exceeds soft limit {soft}"));
            self.severity = self.severity.max(RiskSeverity::Warn);
        }
    }

    /// Grade the daily-loss dimensions from a signed PnL figure.
    fn daily_loss(&mut self, daily_pnl: Decimal) {
        let loss = (-daily_pnl).max(Decimal::ZERO);
        self.cap("daily loss", loss, self.config.max_daily_loss);

        if let (Some(pct_cap), Some(capital)) =
            (self.config.max_daily_loss_pct, self.config.starting_capital)
            && capital > Decimal::ZERO
        {
            let loss_pct = loss / capital * Decimal::ONE_HUNDRED;
            self.cap("daily loss percentage", loss_pct, Some(pct_cap));
        }
    }

    fn into_result(self, metrics: BTreeMap<String, Decimal>) -> RiskCheckResult {
        RiskCheckResult {
            allowed: self.severity != RiskSeverity::Block,
            severity: self.severity,
            reasons: self.reasons,
            metrics,
        }
    }
}

/// Admission-control engine over configured exposure and loss thresholds.
pub struct RiskLimiter {
    config: RiskConfig,
    ledger: Arc<dyn RiskLedger>,
    alert_sink: Option<Arc<dyn AlertSink>>,
    pnl_categories: Vec<RunCategory>,
}

impl RiskLimiter {
    /// Create a limiter over a threshold configuration and a PnL ledger.
    #[must_use]
    pub fn new(config: RiskConfig, ledger: Arc<dyn RiskLedger>) -> Self {
        Self {
            config,
            ledger,
            alert_sink: None,
            pnl_categories: vec![RunCategory::Testnet, RunCategory::Live],
        }
    }

    /// Wire an alert sink for violation notifications.
    #[must_use]
    pub fn with_alert_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.alert_sink = Some(sink);
        self
    }

    /// Restrict the daily-PnL ledger query to the given run categories.
    #[must_use]
    pub fn with_pnl_categories(mut self, categories: Vec<RunCategory>) -> Self {
        self.pnl_categories = categories;
        self
    }

    /// The threshold configuration in force.
    #[must_use]
    pub const fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Evaluate a proposed order batch.
    ///
    /// Notionals resolve through `prices` (hint, then current, then last
    /// mark). `pnl_estimate` optionally supplies a live PnL figure; the more
    /// conservative of it and the ledger figure is used for the daily-loss
    /// dimensions. Metrics are fully populated even when the batch passes or
    /// the limiter is disabled.
    #[must_use]
    pub fn check_orders(
        &self,
        orders: &[OrderRequest],
        prices: &PriceBook,
        pnl_estimate: Option<Decimal>,
    ) -> RiskCheckResult {
        let mut per_symbol: BTreeMap<&str, Decimal> = BTreeMap::new();
        let mut max_order_notional = Decimal::ZERO;
        let mut total_notional = Decimal::ZERO;

        for order in orders {
            let notional = prices.order_notional(order);
            max_order_notional = max_order_notional.max(notional);
            total_notional += notional;
            *per_symbol.entry(order.symbol.as_str()).or_default() += notional;
        }

        let max_symbol_exposure = per_symbol.values().copied().max().unwrap_or_default();
        let n_symbols = per_symbol.len();
        let daily_pnl = self.daily_realized_pnl(pnl_estimate);

        let mut metrics = BTreeMap::new();
        metrics.insert("n_orders".to_string(), Decimal::from(orders.len()));
        metrics.insert("max_order_notional".to_string(), max_order_notional);
        metrics.insert("max_symbol_exposure".to_string(), max_symbol_exposure);
        metrics.insert("total_notional".to_string(), total_notional);
        metrics.insert("n_symbols".to_string(), Decimal::from(n_symbols));
        metrics.insert("daily_realized_pnl".to_string(), daily_pnl);

        if !self.config.enabled {
            return RiskCheckResult::passed(metrics);
        }

        let mut grader = Grader::new(&self.config);
        grader.cap(
            "per-order notional",
            max_order_notional,
            self.config.max_order_notional,
        );
        grader.cap(
            "per-symbol exposure",
            max_symbol_exposure,
            self.config.max_symbol_exposure_notional,
        );
        grader.cap(
            "total exposure",
            total_notional,
            self.config.max_total_exposure_notional,
        );
        grader.cap(
            "open positions",
            Decimal::from(n_symbols),
            self.config.max_open_positions.map(Decimal::from),
        );
        grader.daily_loss(daily_pnl);

        let result = grader.into_result(metrics);
        self.emit_alert_if_blocked("order batch risk violation", &result);
        result
    }

    /// Evaluate a live portfolio snapshot against the same threshold set.
    #[must_use]
    pub fn evaluate_portfolio(&self, snapshot: &PortfolioSnapshot) -> RiskCheckResult {
        let exposures = snapshot.exposure_by_symbol();
        let total_exposure = snapshot.total_exposure();
        let open_positions = snapshot.open_position_count();
        let max_symbol_exposure = exposures.values().copied().max().unwrap_or_default();
        let daily_pnl = self.daily_realized_pnl(Some(snapshot.realized_pnl()));

        let mut metrics = BTreeMap::new();
        metrics.insert("total_exposure".to_string(), total_exposure);
        metrics.insert("max_symbol_exposure".to_string(), max_symbol_exposure);
        metrics.insert("n_symbols".to_string(), Decimal::from(exposures.len()));
        metrics.insert("open_positions".to_string(), Decimal::from(open_positions));
        metrics.insert("daily_realized_pnl".to_string(), daily_pnl);
        metrics.insert(
            "unrealized_pnl".to_string(),
            snapshot.unrealized_pnl(),
        );

        if !self.config.enabled {
            return RiskCheckResult::passed(metrics);
        }

        let mut grader = Grader::new(&self.config);
        grader.cap(
            "total exposure",
            total_exposure,
            self.config.max_total_exposure_notional,
        );
        for (symbol, exposure) in &exposures {
            grader.cap(
                &format!("symbol {symbol} exposure"),
                *exposure,
                self.config.max_symbol_exposure_notional,
            );
        }
        grader.cap(
            "open positions",
            Decimal::from(open_positions),
            self.config.max_open_positions.map(Decimal::from),
        );
        grader.daily_loss(daily_pnl);

        let result = grader.into_result(metrics);
        self.emit_alert_if_blocked("portfolio risk violation", &result);
        result
    }

    /// Today's realized PnL, merged conservatively with a live estimate.
    ///
    /// The ledger read is advisory: on failure the figure degrades to zero
    /// with a warning rather than blocking trading on observability.
    fn daily_realized_pnl(&self, estimate: Option<Decimal>) -> Decimal {
        let today = Utc::now().date_naive();
        let from_ledger = match self.ledger.daily_realized_pnl(today, &self.pnl_categories) {
            Ok(pnl) => pnl,
            Err(e) => {
                warn!(error = %e, "risk ledger unavailable, assuming zero daily PnL");
                Decimal::ZERO
            }
        };
        match estimate {
            Some(live) => from_ledger.min(live),
            None => from_ledger,
        }
    }

    /// Best-effort alert emission; failures are logged and swallowed.
    fn emit_alert_if_blocked(&self, title: &str, result: &RiskCheckResult) {
        if result.allowed {
            return;
        }
        let Some(sink) = &self.alert_sink else { return };

        let severity = if self.config.block_on_violation {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };
        let alert = Alert {
            severity,
            title: title.to_string(),
            reasons: result.reasons.clone(),
        };
        if let Err(e) = sink.emit(&alert) {
            warn!(error = %e, "alert emission failed");
        }
    }
}

impl std::fmt::Debug for RiskLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskLimiter")
            .field("config", &self.config)
            .field("pnl_categories", &self.pnl_categories)
            .finish_non_exhaustive()
    }
}
