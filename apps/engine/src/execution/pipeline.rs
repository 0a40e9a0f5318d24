//! Signal-to-order execution pipeline.
//!
//! Converts discrete signal transitions into orders, wraps dispatch with the
//! safety guard and risk limiter when they are wired, and records an
//! append-only execution history. With no guard, limiter or logger wired the
//! pipeline degrades to pure simulation; that mode stays supported.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;
use uuid::Uuid;

use crate::config::{EnvironmentConfig, PipelineConfig};
use crate::models::{
    ExecutionResult, OrderRequest, OrderSide, OrderType, OrderValidationError, Signal,
};
use crate::risk::{PriceBook, RiskCheckResult, RiskLimiter};
use crate::safety::SafetyGuard;

use super::events::{RunEvent, RunLogger};
use super::executor::OrderExecutor;

/// Position deltas below this threshold are not worth an order.
const POSITION_EPSILON: Decimal = dec!(0.000001);

/// One point on a price timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    /// Bar timestamp.
    pub timestamp: DateTime<Utc>,
    /// Close (mark) price.
    pub price: Decimal,
}

/// Caller-supplied context for a gated execution cycle.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Step index within the run.
    pub step: u64,
    /// Symbol the cycle trades (used for event fields).
    pub symbol: String,
    /// Signal in force, if the cycle was signal-driven.
    pub signal: Option<Signal>,
    /// Live PnL estimate merged conservatively into the risk check.
    pub pnl_estimate: Option<Decimal>,
}

/// Outcome of a gated execution cycle.
#[derive(Debug, Clone)]
pub struct SafeExecutionOutcome {
    /// True when the whole batch was refused before dispatch.
    pub rejected: bool,
    /// Why the batch was refused.
    pub reason: Option<String>,
    /// The risk decision, when a limiter was consulted.
    pub risk_check: Option<RiskCheckResult>,
    /// Results for dispatched orders (empty when rejected).
    pub executed: Vec<ExecutionResult>,
}

impl SafeExecutionOutcome {
    fn refused(reason: impl Into<String>, risk_check: Option<RiskCheckResult>) -> Self {
        Self {
            rejected: true,
            reason: Some(reason.into()),
            risk_check,
            executed: Vec::new(),
        }
    }
}

/// Aggregate view over the pipeline's execution history.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    /// Orders dispatched in total.
    pub total_orders: usize,
    /// Orders that filled.
    pub filled_orders: usize,
    /// Orders that were rejected.
    pub rejected_orders: usize,
    /// Filled over total, zero when no orders ran.
    pub fill_rate: Decimal,
    /// Total filled notional.
    pub total_notional: Decimal,
    /// Total fees paid.
    pub total_fees: Decimal,
}

/// Signal-to-order execution pipeline.
pub struct ExecutionPipeline {
    config: PipelineConfig,
    executor: Arc<dyn OrderExecutor>,
    environment: Option<EnvironmentConfig>,
    guard: Option<SafetyGuard>,
    limiter: Option<RiskLimiter>,
    logger: Option<Arc<dyn RunLogger>>,
    prices: PriceBook,
    history: Vec<ExecutionResult>,
}

impl ExecutionPipeline {
    /// Create an ungated pipeline over an executor.
    #[must_use]
    pub fn new(config: PipelineConfig, executor: Arc<dyn OrderExecutor>) -> Self {
        Self {
            config,
            executor,
            environment: None,
            guard: None,
            limiter: None,
            logger: None,
            prices: PriceBook::new(),
            history: Vec::new(),
        }
    }

    /// Wire the environment configuration (enables the live hard block).
    #[must_use]
    pub fn with_environment(mut self, environment: EnvironmentConfig) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Wire the safety guard.
    #[must_use]
    pub fn with_safety_guard(mut self, guard: SafetyGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Wire the risk limiter.
    #[must_use]
    pub fn with_risk_limiter(mut self, limiter: RiskLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Wire the run logger.
    #[must_use]
    pub fn with_run_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Record a mark price for risk sizing and executor fills.
    pub fn observe_price(&mut self, symbol: &str, price: Decimal) {
        self.prices.observe(symbol, price);
        self.executor.observe_price(symbol, price);
    }

    /// The append-only execution history.
    #[must_use]
    pub fn history(&self) -> &[ExecutionResult] {
        &self.history
    }

    /// Dispatch a batch straight to the executor, with no gating.
    ///
    /// Used for historical replay; always yields one result per input order.
    pub async fn execute_orders(&mut self, orders: &[OrderRequest]) -> Vec<ExecutionResult> {
        let results = self.executor.execute_orders(orders).await;
        self.history.extend(results.iter().cloned());
        results
    }

    /// Convert a signal transition into zero, one or two orders.
    ///
    /// A flip with existing size yields a closing order for the full position
    /// followed by an opening order for `desired_size`; a plain entry or exit
    /// yields one order; no transition yields none. `current_position` is
    /// signed (negative when short).
    pub fn signal_to_orders(
        &self,
        symbol: &str,
        prev: Signal,
        next: Signal,
        desired_size: Decimal,
        current_position: Decimal,
    ) -> Result<Vec<OrderRequest>, OrderValidationError> {
        if next == prev {
            return Ok(Vec::new());
        }

        let mut orders = Vec::with_capacity(2);

        if prev != Signal::Flat && current_position.abs() > POSITION_EPSILON {
            let (side, intent) = match prev {
                Signal::Long => (OrderSide::Sell, "close_long"),
                Signal::Short => (OrderSide::Buy, "close_short"),
                Signal::Flat => unreachable!(),
            };
            orders.push(self.make_order(symbol, side, current_position.abs(), intent)?);
        }

        if next != Signal::Flat && desired_size > POSITION_EPSILON {
            let (side, intent) = match next {
                Signal::Long => (OrderSide::Buy, "entry_long"),
                Signal::Short => (OrderSide::Sell, "entry_short"),
                Signal::Flat => unreachable!(),
            };
            orders.push(self.make_order(symbol, side, desired_size, intent)?);
        }

        Ok(orders)
    }

    /// Replay a signal series against a price timeline.
    ///
    /// Signals are forward-filled onto the bars and clipped into
    /// {-1, 0, +1}. On each signal change one order sized by the position
    /// delta is dispatched (skipped below epsilon); the running position
    /// advances strictly from the realized fill, never the requested size.
    pub async fn execute_from_signals(
        &mut self,
        signals: &[(DateTime<Utc>, f64)],
        prices: &[PricePoint],
        symbol: &str,
        base_size: Decimal,
    ) -> Result<Vec<ExecutionResult>, OrderValidationError> {
        let mut results = Vec::new();
        let mut position = Decimal::ZERO;
        let mut prev_signal = Signal::Flat;
        let mut next_signal_idx = 0usize;
        let mut raw_signal = 0.0f64;

        for bar in prices {
            while next_signal_idx < signals.len() && signals[next_signal_idx].0 <= bar.timestamp {
                raw_signal = signals[next_signal_idx].1;
                next_signal_idx += 1;
            }
            self.observe_price(symbol, bar.price);

            let signal = Signal::from_raw(raw_signal);
            if signal == prev_signal {
                continue;
            }
            prev_signal = signal;

            let target = signal.sign() * base_size;
            let delta = target - position;
            if delta.abs() <= POSITION_EPSILON {
                continue;
            }

            let side = if delta > Decimal::ZERO {
                OrderSide::Buy
            } else {
                OrderSide::Sell
            };
            let order = self
                .make_order(symbol, side, delta.abs(), "rebalance")?
                .with_metadata("target_signal", signal.to_string());

            let mut batch = self.execute_orders(std::slice::from_ref(&order)).await;
            let result = batch
                .pop()
                .unwrap_or_else(|| ExecutionResult::rejected(order, "executor returned no result"));
            position += result.signed_fill_quantity();
            results.push(result);
        }

        Ok(results)
    }

    /// Run one gated execution cycle in fixed order.
    ///
    /// Live-environment hard block, safety guard, risk limiter, dispatch,
    /// then best-effort event emission. The live block is deliberate and
    /// independent of the guard: live execution is unsupported by this
    /// generation of the pipeline.
    pub async fn execute_with_safety(
        &mut self,
        orders: Vec<OrderRequest>,
        ctx: &ExecutionContext,
    ) -> SafeExecutionOutcome {
        let submitted = orders.len();

        if let Some(environment) = &self.environment
            && environment.environment.is_live()
        {
            let outcome = SafeExecutionOutcome::refused(
                "live execution unsupported by this generation of the pipeline",
                None,
            );
            self.log_cycle(ctx, &outcome, submitted);
            return outcome;
        }

        if let Some(guard) = &self.guard {
            let is_testnet = guard.config().environment.is_testnet();
            if let Err(gate) = guard.ensure_may_place_order(is_testnet) {
                let outcome = SafeExecutionOutcome::refused(gate.to_string(), None);
                self.log_cycle(ctx, &outcome, submitted);
                return outcome;
            }
        }

        let risk_check = self
            .limiter
            .as_ref()
            .map(|limiter| limiter.check_orders(&orders, &self.prices, ctx.pnl_estimate));
        if let Some(check) = &risk_check
            && !check.allowed
        {
            let outcome =
                SafeExecutionOutcome::refused(check.reason_summary(), risk_check.clone());
            self.log_cycle(ctx, &outcome, submitted);
            return outcome;
        }

        let executed = self.execute_orders(&orders).await;
        let outcome = SafeExecutionOutcome {
            rejected: false,
            reason: None,
            risk_check,
            executed,
        };
        self.log_cycle(ctx, &outcome, submitted);
        outcome
    }

    /// Summarize the execution history.
    #[must_use]
    pub fn execution_summary(&self) -> ExecutionSummary {
        let total_orders = self.history.len();
        let filled_orders = self.history.iter().filter(|r| r.is_filled()).count();

        let mut total_notional = Decimal::ZERO;
        let mut total_fees = Decimal::ZERO;
        for fill in self.history.iter().filter_map(|r| r.fill.as_ref()) {
            total_notional += fill.notional();
            total_fees += fill.fee;
        }

        ExecutionSummary {
            total_orders,
            filled_orders,
            rejected_orders: total_orders - filled_orders,
            fill_rate: if total_orders == 0 {
                Decimal::ZERO
            } else {
                Decimal::from(filled_orders) / Decimal::from(total_orders)
            },
            total_notional,
            total_fees,
        }
    }

    fn make_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        intent: &str,
    ) -> Result<OrderRequest, OrderValidationError> {
        let mut order = match (self.config.default_order_type, self.prices.current(symbol)) {
            (OrderType::Limit, Some(price)) => {
                OrderRequest::limit(symbol, side, quantity, price)?
            }
            _ => OrderRequest::market(symbol, side, quantity)?,
        };
        order = order.with_metadata("intent", intent);
        if self.config.generate_client_ids {
            order = order.with_client_order_id(Uuid::new_v4().to_string());
        }
        Ok(order)
    }

    /// Best-effort event emission; logging failures warn and are dropped.
    fn log_cycle(&self, ctx: &ExecutionContext, outcome: &SafeExecutionOutcome, submitted: usize) {
        let Some(logger) = &self.logger else { return };

        let event = RunEvent {
            step: ctx.step,
            timestamp: Utc::now(),
            symbol: ctx.symbol.clone(),
            signal: ctx.signal.map(|s| s.as_i8()),
            orders_submitted: submitted as u32,
            orders_filled: outcome.executed.iter().filter(|r| r.is_filled()).count() as u32,
            risk_allowed: outcome.risk_check.as_ref().map(|c| c.allowed),
            risk_severity: outcome.risk_check.as_ref().map(|c| c.severity),
            price: self.prices.current(&ctx.symbol),
            fill_price: outcome
                .executed
                .iter()
                .find_map(|r| r.fill.as_ref().map(|f| f.price)),
            note: outcome.reason.clone(),
        };
        if let Err(e) = logger.log_event(&event) {
            warn!(error = %e, step = ctx.step, "run event emission failed");
        }
    }
}

impl std::fmt::Debug for ExecutionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionPipeline")
            .field("config", &self.config)
            .field("executor", &self.executor.name())
            .field("gated", &self.guard.is_some())
            .field("risk_limited", &self.limiter.is_some())
            .field("history_len", &self.history.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RiskConfig;
    use crate::execution::events::{LoggingError, MemoryRunLogger, MockRunLogger};
    use crate::execution::executor::{MockOrderExecutor, PaperExecutor, PaperFillConfig};
    use crate::models::Environment;
    use crate::risk::NullRiskLedger;
    use rust_decimal_macros::dec;

    fn paper_pipeline() -> ExecutionPipeline {
        ExecutionPipeline::new(
            PipelineConfig::default(),
            Arc::new(PaperExecutor::new(PaperFillConfig::default())),
        )
    }

    fn live_environment() -> EnvironmentConfig {
        EnvironmentConfig {
            environment: Environment::Live,
            ..Default::default()
        }
    }

    fn limiter(config: RiskConfig) -> RiskLimiter {
        RiskLimiter::new(config, Arc::new(NullRiskLedger))
    }

    #[test]
    fn test_flip_long_to_short_yields_close_then_entry() {
        let pipeline = paper_pipeline();
        let orders = pipeline
            .signal_to_orders("BTCUSDT", Signal::Long, Signal::Short, dec!(3), dec!(2))
            .unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].side, OrderSide::Sell);
        assert_eq!(orders[0].quantity, dec!(2));
        assert_eq!(
            orders[0].metadata.get("intent").map(String::as_str),
            Some("close_long")
        );
        assert_eq!(orders[1].side, OrderSide::Sell);
        assert_eq!(orders[1].quantity, dec!(3));
        assert_eq!(
            orders[1].metadata.get("intent").map(String::as_str),
            Some("entry_short")
        );
    }

    #[test]
    fn test_no_signal_change_yields_no_orders() {
        let pipeline = paper_pipeline();
        for signal in [Signal::Short, Signal::Flat, Signal::Long] {
            let orders = pipeline
                .signal_to_orders("BTCUSDT", signal, signal, dec!(1), dec!(1))
                .unwrap();
            assert!(orders.is_empty());
        }
    }

    #[test]
    fn test_plain_entry_and_exit_yield_one_order() {
        let pipeline = paper_pipeline();

        let entry = pipeline
            .signal_to_orders("BTCUSDT", Signal::Flat, Signal::Long, dec!(1), Decimal::ZERO)
            .unwrap();
        assert_eq!(entry.len(), 1);
        assert_eq!(
            entry[0].metadata.get("intent").map(String::as_str),
            Some("entry_long")
        );

        let exit = pipeline
            .signal_to_orders("BTCUSDT", Signal::Short, Signal::Flat, dec!(1), dec!(-2))
            .unwrap();
        assert_eq!(exit.len(), 1);
        assert_eq!(exit[0].side, OrderSide::Buy);
        assert_eq!(exit[0].quantity, dec!(2));
        assert_eq!(
            exit[0].metadata.get("intent").map(String::as_str),
            Some("close_short")
        );
    }

    #[test]
    fn test_flip_with_no_position_degrades_to_entry() {
        let pipeline = paper_pipeline();
        let orders = pipeline
            .signal_to_orders("BTCUSDT", Signal::Long, Signal::Short, dec!(1), Decimal::ZERO)
            .unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(
            orders[0].metadata.get("intent").map(String::as_str),
            Some("entry_short")
        );
    }

    #[test]
    fn test_generated_client_ids_are_unique() {
        let pipeline = paper_pipeline();
        let orders = pipeline
            .signal_to_orders("BTCUSDT", Signal::Long, Signal::Short, dec!(1), dec!(1))
            .unwrap();
        let ids: Vec<&String> = orders.iter().filter_map(|o| o.client_order_id.as_ref()).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn test_live_environment_hard_blocks_regardless_of_wiring() {
        // No guard, no limiter: the block must still trigger.
        let mut pipeline = paper_pipeline().with_environment(live_environment());
        let order = OrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(1)).unwrap();
        let outcome = pipeline
            .execute_with_safety(vec![order], &ExecutionContext::default())
            .await;

        assert!(outcome.rejected);
        assert!(outcome.reason.unwrap().contains("live execution unsupported"));
        assert!(outcome.executed.is_empty());
        assert!(pipeline.history().is_empty());
    }

    #[tokio::test]
    async fn test_safety_guard_rejection_short_circuits() {
        let mut pipeline = paper_pipeline()
            .with_safety_guard(SafetyGuard::new(EnvironmentConfig::default()));
        let order = OrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(1)).unwrap();
        let outcome = pipeline
            .execute_with_safety(vec![order], &ExecutionContext::default())
            .await;

        assert!(outcome.rejected);
        assert!(outcome.reason.unwrap().contains("paper environment"));
    }

    #[tokio::test]
    async fn test_risk_block_short_circuits_before_executor() {
        let mut mock = MockOrderExecutor::new();
        mock.expect_execute_orders().times(0);
        mock.expect_observe_price().return_const(());
        mock.expect_name().return_const("mock");

        let mut pipeline = ExecutionPipeline::new(PipelineConfig::default(), Arc::new(mock))
            .with_risk_limiter(limiter(RiskConfig {
                max_order_notional: Some(dec!(100)),
                ..Default::default()
            }));
        pipeline.observe_price("BTCUSDT", dec!(100));

        let order = OrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(5)).unwrap();
        let outcome = pipeline
            .execute_with_safety(vec![order], &ExecutionContext::default())
            .await;

        assert!(outcome.rejected);
        let check = outcome.risk_check.unwrap();
        assert!(!check.allowed);
        assert_eq!(check.metrics.get("max_order_notional"), Some(&dec!(500)));
    }

    #[tokio::test]
    async fn test_ungated_pipeline_dispatches_and_logs() {
        let logger = Arc::new(MemoryRunLogger::new(16));
        let mut pipeline = paper_pipeline().with_run_logger(logger.clone());
        pipeline.observe_price("BTCUSDT", dec!(100));

        let order = OrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(2)).unwrap();
        let ctx = ExecutionContext {
            step: 7,
            symbol: "BTCUSDT".to_string(),
            signal: Some(Signal::Long),
            pnl_estimate: None,
        };
        let outcome = pipeline.execute_with_safety(vec![order], &ctx).await;

        assert!(!outcome.rejected);
        assert_eq!(outcome.executed.len(), 1);
        assert!(outcome.risk_check.is_none());

        let events = logger.tail(10);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].step, 7);
        assert_eq!(events[0].orders_filled, 1);
        assert_eq!(events[0].signal, Some(1));
        assert_eq!(events[0].price, Some(dec!(100)));
    }

    #[tokio::test]
    async fn test_logging_failure_never_fails_the_cycle() {
        let mut logger = MockRunLogger::new();
        logger
            .expect_log_event()
            .times(1)
            .returning(|_| Err(LoggingError::WriteFailed("disk full".to_string())));

        let mut pipeline = paper_pipeline().with_run_logger(Arc::new(logger));
        pipeline.observe_price("BTCUSDT", dec!(100));

        let order = OrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(1)).unwrap();
        let outcome = pipeline
            .execute_with_safety(vec![order], &ExecutionContext::default())
            .await;
        assert!(!outcome.rejected);
        assert_eq!(outcome.executed.len(), 1);
    }

    #[tokio::test]
    async fn test_execute_from_signals_walks_bars() {
        let mut pipeline = paper_pipeline();

        let t0 = Utc::now();
        let bar = |offset: i64, price: Decimal| PricePoint {
            timestamp: t0 + chrono::Duration::minutes(offset),
            price,
        };
        let prices = vec![
            bar(0, dec!(100)),
            bar(1, dec!(101)),
            bar(2, dec!(102)),
            bar(3, dec!(103)),
            bar(4, dec!(104)),
        ];
        // Long from bar 1 (forward-filled across bar 2), short from bar 3.
        let signals = vec![
            (t0 + chrono::Duration::minutes(1), 2.5),
            (t0 + chrono::Duration::minutes(3), -1.0),
        ];

        let results = pipeline
            .execute_from_signals(&signals, &prices, "BTCUSDT", dec!(2))
            .await
            .unwrap();

        // Entry long +2 at bar 1, flip to -2 at bar 3 (single delta order of 4).
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].order.side, OrderSide::Buy);
        assert_eq!(results[0].order.quantity, dec!(2));
        assert_eq!(results[0].fill.as_ref().unwrap().price, dec!(101));
        assert_eq!(results[1].order.side, OrderSide::Sell);
        assert_eq!(results[1].order.quantity, dec!(4));
        assert_eq!(results[1].fill.as_ref().unwrap().price, dec!(103));
    }

    #[tokio::test]
    async fn test_execute_from_signals_advances_from_realized_fill_only() {
        // Executor that rejects the first order and fills later ones.
        let mut mock = MockOrderExecutor::new();
        mock.expect_observe_price().return_const(());
        mock.expect_name().return_const("mock");
        let mut call = 0u32;
        mock.expect_execute_orders().returning(move |orders| {
            call += 1;
            let order = orders[0].clone();
            if call == 1 {
                vec![ExecutionResult::rejected(order, "venue closed")]
            } else {
                let price = dec!(100);
                vec![ExecutionResult::filled(
                    order.clone(),
                    crate::models::Fill {
                        quantity: order.quantity,
                        price,
                        fee: Decimal::ZERO,
                        timestamp: Utc::now(),
                    },
                )]
            }
        });

        let mut pipeline = ExecutionPipeline::new(PipelineConfig::default(), Arc::new(mock));
        let t0 = Utc::now();
        let prices = vec![
            PricePoint { timestamp: t0, price: dec!(100) },
            PricePoint {
                timestamp: t0 + chrono::Duration::minutes(1),
                price: dec!(100),
            },
        ];
        let signals = vec![
            (t0, 1.0),
            (t0 + chrono::Duration::minutes(1), -1.0),
        ];

        let results = pipeline
            .execute_from_signals(&signals, &prices, "BTCUSDT", dec!(2))
            .await
            .unwrap();

        // The rejected entry leaves the position flat, so the short targets
        // -2 from 0 rather than from +2.
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, crate::models::ExecutionStatus::Rejected);
        assert_eq!(results[1].order.quantity, dec!(2));
    }

    #[tokio::test]
    async fn test_execution_summary_from_history() {
        let mut pipeline = ExecutionPipeline::new(
            PipelineConfig::default(),
            Arc::new(PaperExecutor::new(PaperFillConfig {
                fee_bps: dec!(10),
                slippage_bps: None,
            })),
        );
        pipeline.observe_price("BTCUSDT", dec!(100));

        let orders = [
            OrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(1)).unwrap(),
            OrderRequest::market("UNKNOWN", OrderSide::Buy, dec!(1)).unwrap(),
        ];
        let _ = pipeline.execute_orders(&orders).await;

        let summary = pipeline.execution_summary();
        assert_eq!(summary.total_orders, 2);
        assert_eq!(summary.filled_orders, 1);
        assert_eq!(summary.rejected_orders, 1);
        assert_eq!(summary.fill_rate, dec!(0.5));
        assert_eq!(summary.total_notional, dec!(100));
        assert_eq!(summary.total_fees, dec!(0.1));
    }

    #[tokio::test]
    async fn test_empty_summary() {
        let pipeline = paper_pipeline();
        let summary = pipeline.execution_summary();
        assert_eq!(summary.total_orders, 0);
        assert_eq!(summary.fill_rate, Decimal::ZERO);
    }
}
