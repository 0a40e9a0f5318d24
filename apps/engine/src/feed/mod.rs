//! Market data feed boundary.
//!
//! The core treats a feed purely as an iterator of ticks; connectivity and
//! price generation live outside. [`ScriptedFeed`] replays a fixed series
//! deterministically for demos and tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// One price tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Instrument symbol.
    pub symbol: String,
    /// Tick timestamp.
    pub timestamp: DateTime<Utc>,
    /// Mark price.
    pub price: Decimal,
}

/// Feed failure.
#[derive(Debug, Clone, Error)]
pub enum FeedError {
    /// The feed's upstream source went away.
    #[error("feed disconnected: {0}")]
    Disconnected(String),
}

/// Opaque source of price ticks.
///
/// `next_tick` returns `Ok(None)` when the feed is exhausted; a session
/// treats that as a normal end of run.
#[async_trait]
pub trait DataFeed: Send {
    /// Pull the next tick.
    async fn next_tick(&mut self) -> Result<Option<Tick>, FeedError>;
}

/// Constructs a feed per (symbol, timeframe) pair.
pub trait FeedProvider: Send + Sync {
    /// Build a fresh feed for one session.
    fn feed_for(&self, symbol: &str, timeframe: &str) -> Box<dyn DataFeed>;
}

/// Deterministic replay feed over a fixed tick series.
#[derive(Debug, Clone)]
pub struct ScriptedFeed {
    ticks: VecDeque<Tick>,
}

impl ScriptedFeed {
    /// Create a feed replaying the given ticks in order.
    #[must_use]
    pub fn new(ticks: Vec<Tick>) -> Self {
        Self {
            ticks: ticks.into(),
        }
    }

    /// Create a feed from bare prices, one tick per second starting now.
    #[must_use]
    pub fn from_prices(symbol: &str, prices: &[Decimal]) -> Self {
        let start = Utc::now();
        let ticks = prices
            .iter()
            .enumerate()
            .map(|(i, price)| Tick {
                symbol: symbol.to_string(),
                timestamp: start + Duration::seconds(i as i64),
                price: *price,
            })
            .collect();
        Self::new(ticks)
    }
}

#[async_trait]
impl DataFeed for ScriptedFeed {
    async fn next_tick(&mut self) -> Result<Option<Tick>, FeedError> {
        Ok(self.ticks.pop_front())
    }
}

/// Provider handing each session a [`ScriptedFeed`] over the same prices.
#[derive(Debug, Clone)]
pub struct ScriptedFeedProvider {
    prices: Vec<Decimal>,
}

impl ScriptedFeedProvider {
    /// Create a provider replaying `prices` for every session.
    #[must_use]
    pub fn new(prices: Vec<Decimal>) -> Self {
        Self { prices }
    }
}

impl FeedProvider for ScriptedFeedProvider {
    fn feed_for(&self, symbol: &str, _timeframe: &str) -> Box<dyn DataFeed> {
        Box::new(ScriptedFeed::from_prices(symbol, &self.prices))
    }
}
