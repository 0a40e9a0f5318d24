//! Mark-price book used for notional resolution.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::OrderRequest;

/// Current and last-known mark prices per symbol.
///
/// Notional resolution walks a fallback chain: an explicit notional hint on
/// the order, then quantity times the current mark, then quantity times the
/// last-known mark, and finally zero when nothing is known.
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    current: HashMap<String, Decimal>,
    last: HashMap<String, Decimal>,
}

impl PriceBook {
    /// Create an empty price book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new mark price, demoting the previous one to last-known.
    pub fn observe(&mut self, symbol: &str, price: Decimal) {
        if let Some(previous) = self.current.insert(symbol.to_string(), price) {
            self.last.insert(symbol.to_string(), previous);
        }
    }

    /// Current mark price for a symbol.
    #[must_use]
    pub fn current(&self, symbol: &str) -> Option<Decimal> {
        self.current.get(symbol).copied()
    }

    /// Last-known mark price for a symbol, prior to the current one.
    #[must_use]
    pub fn last(&self, symbol: &str) -> Option<Decimal> {
        self.last.get(symbol).copied()
    }

    /// Resolve the notional of an order through the fallback chain.
    #[must_use]
    pub fn order_notional(&self, order: &OrderRequest) -> Decimal {
        if let Some(hint) = order.notional_hint {
            return hint;
        }
        if let Some(price) = self.current(&order.symbol) {
            return order.quantity * price;
        }
        if let Some(price) = self.last(&order.symbol) {
            return order.quantity * price;
        }
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderSide;
    use rust_decimal_macros::dec;

    #[test]
    fn test_observe_demotes_previous_mark() {
        let mut book = PriceBook::new();
        book.observe("BTCUSDT", dec!(100));
        assert_eq!(book.current("BTCUSDT"), Some(dec!(100)));
        assert_eq!(book.last("BTCUSDT"), None);

        book.observe("BTCUSDT", dec!(105));
        assert_eq!(book.current("BTCUSDT"), Some(dec!(105)));
        assert_eq!(book.last("BTCUSDT"), Some(dec!(100)));
    }

    #[test]
    fn test_notional_fallback_chain() {
        let mut book = PriceBook::new();
        let order = OrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(2)).unwrap();

        // Nothing known yet.
        assert_eq!(book.order_notional(&order), Decimal::ZERO);

        // Current mark.
        book.observe("BTCUSDT", dec!(100));
        assert_eq!(book.order_notional(&order), dec!(200));

        // Explicit hint wins over marks.
        let hinted = order.clone().with_notional_hint(dec!(500));
        assert_eq!(book.order_notional(&hinted), dec!(500));
    }
}
