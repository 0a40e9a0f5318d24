//! Portfolio snapshot types for risk evaluation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::OrderSide;

/// A single open position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Instrument symbol.
    pub symbol: String,
    /// Position side.
    pub side: OrderSide,
    /// Position size (absolute).
    pub size: Decimal,
    /// Average entry price.
    pub entry_price: Decimal,
    /// Current mark price.
    pub mark_price: Decimal,
    /// Realized PnL attributed to this position.
    pub realized_pnl: Decimal,
}

impl Position {
    /// Notional exposure at the current mark.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.size * self.mark_price
    }

    /// Unrealized PnL at the current mark.
    #[must_use]
    pub fn unrealized_pnl(&self) -> Decimal {
        (self.mark_price - self.entry_price) * self.size * self.side.sign()
    }

    /// Returns true if the position has no size.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.size.is_zero()
    }
}

/// Read-only snapshot of a portfolio, built fresh per risk evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Open positions.
    pub positions: Vec<Position>,
}

impl PortfolioSnapshot {
    /// Build a snapshot from positions, dropping flat entries.
    #[must_use]
    pub fn new(positions: Vec<Position>) -> Self {
        Self {
            positions: positions.into_iter().filter(|p| !p.is_flat()).collect(),
        }
    }

    /// Number of distinct open positions.
    #[must_use]
    pub fn open_position_count(&self) -> usize {
        self.positions.len()
    }

    /// Total notional exposure across all positions.
    #[must_use]
    pub fn total_exposure(&self) -> Decimal {
        self.positions.iter().map(Position::notional).sum()
    }

    /// Notional exposure aggregated per symbol.
    #[must_use]
    pub fn exposure_by_symbol(&self) -> BTreeMap<String, Decimal> {
        let mut out: BTreeMap<String, Decimal> = BTreeMap::new();
        for position in &self.positions {
            *out.entry(position.symbol.clone()).or_default() += position.notional();
        }
        out
    }

    /// Sum of realized PnL across positions.
    #[must_use]
    pub fn realized_pnl(&self) -> Decimal {
        self.positions.iter().map(|p| p.realized_pnl).sum()
    }

    /// Sum of unrealized PnL across positions.
    #[must_use]
    pub fn unrealized_pnl(&self) -> Decimal {
        self.positions.iter().map(Position::unrealized_pnl).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(symbol: &str, side: OrderSide, size: Decimal, entry: Decimal, mark: Decimal) -> Position {
        Position {
            symbol: symbol.to_string(),
            side,
            size,
            entry_price: entry,
            mark_price: mark,
            realized_pnl: Decimal::ZERO,
        }
    }

    #[test]
    fn test_unrealized_pnl_sign() {
        let long = position("BTCUSDT", OrderSide::Buy, dec!(2), dec!(100), dec!(110));
        assert_eq!(long.unrealized_pnl(), dec!(20));

        let short = position("BTCUSDT", OrderSide::Sell, dec!(2), dec!(100), dec!(110));
        assert_eq!(short.unrealized_pnl(), dec!(-20));
    }

    #[test]
    fn test_snapshot_drops_flat_positions() {
        let snapshot = PortfolioSnapshot::new(vec![
            position("BTCUSDT", OrderSide::Buy, dec!(1), dec!(100), dec!(100)),
            position("ETHUSDT", OrderSide::Buy, dec!(0), dec!(10), dec!(10)),
        ]);
        assert_eq!(snapshot.open_position_count(), 1);
    }

    #[test]
    fn test_exposure_aggregation() {
        let snapshot = PortfolioSnapshot::new(vec![
            position("BTCUSDT", OrderSide::Buy, dec!(1), dec!(100), dec!(110)),
            position("BTCUSDT", OrderSide::Sell, dec!(2), dec!(120), dec!(110)),
            position("ETHUSDT", OrderSide::Buy, dec!(5), dec!(10), dec!(12)),
        ]);

        assert_eq!(snapshot.total_exposure(), dec!(390));
        let by_symbol = snapshot.exposure_by_symbol();
        assert_eq!(by_symbol.get("BTCUSDT"), Some(&dec!(330)));
        assert_eq!(by_symbol.get("ETHUSDT"), Some(&dec!(60)));
    }
}
