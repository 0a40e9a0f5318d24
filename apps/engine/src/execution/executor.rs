//! Order executor port and in-tree adapters.
//!
//! Executors are interchangeable behind [`OrderExecutor`]; the pipeline is
//! agnostic to which variant is wired. Price discovery is an explicit
//! capability of the port (`observe_price`), resolved at construction time
//! rather than by runtime introspection.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::info;

#[cfg(test)]
use mockall::automock;

use crate::models::{ExecutionResult, Fill, OrderRequest, OrderType};

const BPS_DENOMINATOR: Decimal = rust_decimal_macros::dec!(10000);

/// Port for dispatching orders to an execution venue.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OrderExecutor: Send + Sync {
    /// Execute one order.
    async fn execute_order(&self, order: &OrderRequest) -> ExecutionResult;

    /// Execute a batch, producing exactly one result per input order.
    ///
    /// A failure on one order never aborts its siblings.
    async fn execute_orders(&self, orders: &[OrderRequest]) -> Vec<ExecutionResult> {
        let mut results = Vec::with_capacity(orders.len());
        for order in orders {
            results.push(self.execute_order(order).await);
        }
        results
    }

    /// Feed the executor a mark price observation. No-op by default.
    fn observe_price(&self, _symbol: &str, _price: Decimal) {}

    /// Executor name for logging.
    fn name(&self) -> &'static str;
}

/// Fill model for the paper executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaperFillConfig {
    /// Fee charged per fill, in basis points of notional.
    pub fee_bps: Decimal,
    /// Maximum adverse slippage applied to market fills, in basis points.
    pub slippage_bps: Option<Decimal>,
}

impl Default for PaperFillConfig {
    fn default() -> Self {
        Self {
            fee_bps: Decimal::ZERO,
            slippage_bps: None,
        }
    }
}

/// Fully simulated executor filling at observed mark prices.
#[derive(Debug, Default)]
pub struct PaperExecutor {
    config: PaperFillConfig,
    marks: RwLock<HashMap<String, Decimal>>,
}

impl PaperExecutor {
    /// Create a paper executor with the given fill model.
    #[must_use]
    pub fn new(config: PaperFillConfig) -> Self {
        Self {
            config,
            marks: RwLock::new(HashMap::new()),
        }
    }

    fn fill_price(&self, order: &OrderRequest) -> Option<Decimal> {
        if order.order_type == OrderType::Limit {
            return order.limit_price;
        }
        let mark = self.marks.read().get(&order.symbol).copied()?;
        Some(self.apply_slippage(order, mark))
    }

    /// Adverse slippage: buys fill above the mark, sells below it.
    fn apply_slippage(&self, order: &OrderRequest, mark: Decimal) -> Decimal {
        let Some(max_bps) = self.config.slippage_bps else {
            return mark;
        };
        let jitter = Decimal::from_f64(rand::random::<f64>()).unwrap_or(Decimal::ONE);
        let slip = mark * max_bps * jitter / BPS_DENOMINATOR;
        mark + slip * order.side.sign()
    }
}

#[async_trait]
impl OrderExecutor for PaperExecutor {
    async fn execute_order(&self, order: &OrderRequest) -> ExecutionResult {
        let Some(price) = self.fill_price(order) else {
            return ExecutionResult::rejected(
                order.clone(),
                format!("no mark price for {}", order.symbol),
            );
        };

        let notional = order.quantity * price;
        let fill = Fill {
            quantity: order.quantity,
            price,
            fee: notional * self.config.fee_bps / BPS_DENOMINATOR,
            timestamp: Utc::now(),
        };
        ExecutionResult::filled(order.clone(), fill).with_metadata("simulated", "true")
    }

    fn observe_price(&self, symbol: &str, price: Decimal) {
        self.marks.write().insert(symbol.to_string(), price);
    }

    fn name(&self) -> &'static str {
        "paper"
    }
}

/// Log-only executor: records the order and synthesizes a fee-free fill.
#[derive(Debug, Default)]
pub struct ShadowExecutor {
    marks: RwLock<HashMap<String, Decimal>>,
}

impl ShadowExecutor {
    /// Create a shadow executor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderExecutor for ShadowExecutor {
    async fn execute_order(&self, order: &OrderRequest) -> ExecutionResult {
        let price = match order.order_type {
            OrderType::Limit => order.limit_price,
            OrderType::Market => self.marks.read().get(&order.symbol).copied(),
        };
        let Some(price) = price else {
            return ExecutionResult::rejected(
                order.clone(),
                format!("no mark price for {}", order.symbol),
            );
        };

        info!(
            symbol = %order.symbol,
            side = %order.side,
            quantity = %order.quantity,
            price = %price,
            "shadow order recorded"
        );
        let fill = Fill {
            quantity: order.quantity,
            price,
            fee: Decimal::ZERO,
            timestamp: Utc::now(),
        };
        ExecutionResult::filled(order.clone(), fill).with_metadata("log_only", "true")
    }

    fn observe_price(&self, symbol: &str, price: Decimal) {
        self.marks.write().insert(symbol.to_string(), price);
    }

    fn name(&self) -> &'static str {
        "shadow"
    }
}

/// Validate-only executor for testnet attempts.
///
/// Accepts structurally valid orders without producing a fill, mirroring an
/// exchange test endpoint that acknowledges but never executes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestnetExecutor;

#[async_trait]
impl OrderExecutor for TestnetExecutor {
    async fn execute_order(&self, order: &OrderRequest) -> ExecutionResult {
        ExecutionResult::acknowledged(order.clone()).with_metadata("validate_only", "true")
    }

    fn name(&self) -> &'static str {
        "testnet-validate"
    }
}
