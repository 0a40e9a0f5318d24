//! Order request and execution result types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// Buy order.
    Buy,
    /// Sell order.
    Sell,
}

impl OrderSide {
    /// Signed direction multiplier: +1 for buy, -1 for sell.
    #[must_use]
    pub fn sign(&self) -> Decimal {
        match self {
            Self::Buy => Decimal::ONE,
            Self::Sell => -Decimal::ONE,
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type (market or limit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Market order - execute at best available price.
    Market,
    /// Limit order - execute at specified price or better.
    Limit,
}

/// Errors raised when constructing an [`OrderRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderValidationError {
    /// Symbol was empty.
    #[error("order symbol must not be empty")]
    EmptySymbol,
    /// Quantity was zero or negative.
    #[error("order quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),
    /// Limit order without a limit price.
    #[error("limit order requires a limit price")]
    MissingLimitPrice,
    /// Limit price was zero or negative.
    #[error("limit price must be positive, got {0}")]
    NonPositiveLimitPrice(Decimal),
}

/// A proposed order, validated at construction.
///
/// Quantity is always positive and a limit order always carries a positive
/// limit price; invalid combinations cannot exist as values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Instrument symbol.
    pub symbol: String,
    /// Order side.
    pub side: OrderSide,
    /// Quantity (always > 0).
    pub quantity: Decimal,
    /// Order type.
    pub order_type: OrderType,
    /// Limit price (present and > 0 for limit orders).
    pub limit_price: Option<Decimal>,
    /// Explicit notional hint, used ahead of mark prices in risk sizing.
    pub notional_hint: Option<Decimal>,
    /// Client-assigned order id, if generated.
    pub client_order_id: Option<String>,
    /// Free-form metadata bag (intent tags and similar).
    pub metadata: BTreeMap<String, String>,
}

impl OrderRequest {
    /// Create a validated order request.
    pub fn new(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        order_type: OrderType,
        limit_price: Option<Decimal>,
    ) -> Result<Self, OrderValidationError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(OrderValidationError::EmptySymbol);
        }
        if quantity <= Decimal::ZERO {
            return Err(OrderValidationError::NonPositiveQuantity(quantity));
        }
        match (order_type, limit_price) {
            (OrderType::Limit, None) => return Err(OrderValidationError::MissingLimitPrice),
            (OrderType::Limit, Some(p)) if p <= Decimal::ZERO => {
                return Err(OrderValidationError::NonPositiveLimitPrice(p));
            }
            _ => {}
        }

        Ok(Self {
            symbol,
            side,
            quantity,
            order_type,
            limit_price,
            notional_hint: None,
            client_order_id: None,
            metadata: BTreeMap::new(),
        })
    }

    /// Create a market order.
    pub fn market(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
    ) -> Result<Self, OrderValidationError> {
        Self::new(symbol, side, quantity, OrderType::Market, None)
    }

    /// Create a limit order.
    pub fn limit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        limit_price: Decimal,
    ) -> Result<Self, OrderValidationError> {
        Self::new(symbol, side, quantity, OrderType::Limit, Some(limit_price))
    }

    /// Attach an explicit notional hint.
    #[must_use]
    pub const fn with_notional_hint(mut self, notional: Decimal) -> Self {
        self.notional_hint = Some(notional);
        self
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Attach a client order id.
    #[must_use]
    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }
}

/// Per-order execution outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    /// Order filled (fully or partially).
    Filled,
    /// Order rejected before or at dispatch.
    Rejected,
}

/// Fill details for an executed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    /// Filled quantity.
    pub quantity: Decimal,
    /// Average fill price.
    pub price: Decimal,
    /// Fee charged for the fill.
    pub fee: Decimal,
    /// Fill timestamp.
    pub timestamp: DateTime<Utc>,
}

impl Fill {
    /// Notional value of the fill.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.quantity * self.price
    }
}

/// Result of dispatching a single order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Outcome for this order.
    pub status: ExecutionStatus,
    /// The order that was dispatched.
    pub order: OrderRequest,
    /// Fill details when filled.
    pub fill: Option<Fill>,
    /// Rejection reason when rejected.
    pub reject_reason: Option<String>,
    /// Free-form metadata (executor-specific annotations).
    pub metadata: BTreeMap<String, String>,
}

impl ExecutionResult {
    /// Build a filled result.
    #[must_use]
    pub fn filled(order: OrderRequest, fill: Fill) -> Self {
        Self {
            status: ExecutionStatus::Filled,
            order,
            fill: Some(fill),
            reject_reason: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Build a filled result carrying no fill (validate-only acknowledgement).
    #[must_use]
    pub fn acknowledged(order: OrderRequest) -> Self {
        Self {
            status: ExecutionStatus::Filled,
            order,
            fill: None,
            reject_reason: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Build a rejected result.
    #[must_use]
    pub fn rejected(order: OrderRequest, reason: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Rejected,
            order,
            fill: None,
            reject_reason: Some(reason.into()),
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns true if the order filled.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.status == ExecutionStatus::Filled
    }

    /// Signed position delta realized by this result (zero when rejected).
    #[must_use]
    pub fn signed_fill_quantity(&self) -> Decimal {
        self.fill
            .as_ref()
            .map_or(Decimal::ZERO, |f| f.quantity * self.order.side.sign())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_request_rejects_non_positive_quantity() {
        let err = OrderRequest::market("BTCUSDT", OrderSide::Buy, Decimal::ZERO).unwrap_err();
        assert_eq!(err, OrderValidationError::NonPositiveQuantity(dec!(0)));

        let err = OrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(-1)).unwrap_err();
        assert_eq!(err, OrderValidationError::NonPositiveQuantity(dec!(-1)));
    }

    #[test]
    fn test_order_request_rejects_empty_symbol() {
        let err = OrderRequest::market("  ", OrderSide::Buy, dec!(1)).unwrap_err();
        assert_eq!(err, OrderValidationError::EmptySymbol);
    }

    #[test]
    fn test_limit_order_requires_positive_limit_price() {
        let err =
            OrderRequest::new("ETHUSDT", OrderSide::Sell, dec!(1), OrderType::Limit, None)
                .unwrap_err();
        assert_eq!(err, OrderValidationError::MissingLimitPrice);

        let err = OrderRequest::limit("ETHUSDT", OrderSide::Sell, dec!(1), dec!(0)).unwrap_err();
        assert_eq!(err, OrderValidationError::NonPositiveLimitPrice(dec!(0)));
    }

    #[test]
    fn test_market_order_construction() {
        let order = OrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(0.5))
            .unwrap()
            .with_metadata("intent", "entry_long")
            .with_notional_hint(dec!(15000));

        assert_eq!(order.order_type, OrderType::Market);
        assert!(order.limit_price.is_none());
        assert_eq!(order.metadata.get("intent").map(String::as_str), Some("entry_long"));
        assert_eq!(order.notional_hint, Some(dec!(15000)));
    }

    #[test]
    fn test_signed_fill_quantity() {
        let order = OrderRequest::market("BTCUSDT", OrderSide::Sell, dec!(2)).unwrap();
        let result = ExecutionResult::filled(
            order,
            Fill {
                quantity: dec!(2),
                price: dec!(100),
                fee: dec!(0.2),
                timestamp: Utc::now(),
            },
        );
        assert_eq!(result.signed_fill_quantity(), dec!(-2));

        let order = OrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(2)).unwrap();
        let rejected = ExecutionResult::rejected(order, "no mark price");
        assert_eq!(rejected.signed_fill_quantity(), Decimal::ZERO);
    }
}
