//! Structured run events and the run logger port.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::risk::RiskSeverity;

/// One structured observability event for a pipeline cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    /// Step index within the run.
    pub step: u64,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Symbol the cycle traded.
    pub symbol: String,
    /// Signal in force, if any.
    pub signal: Option<i8>,
    /// Orders submitted this cycle.
    pub orders_submitted: u32,
    /// Orders filled this cycle.
    pub orders_filled: u32,
    /// Risk decision, when a limiter was consulted.
    pub risk_allowed: Option<bool>,
    /// Risk severity, when a limiter was consulted.
    pub risk_severity: Option<RiskSeverity>,
    /// Mark price at the time of the cycle.
    pub price: Option<Decimal>,
    /// First fill price of the cycle, if any.
    pub fill_price: Option<Decimal>,
    /// Free-form note (rejection reason and similar).
    pub note: Option<String>,
}

/// Observability-path failure; always caught, never escalated.
#[derive(Debug, Clone, Error)]
pub enum LoggingError {
    /// The logger's backing store refused the event.
    #[error("run logger write failed: {0}")]
    WriteFailed(String),
}

/// Append-only sink for run events.
///
/// The core never reads events back except through `tail`, which exists for
/// the orchestrator's event-tail pass-through.
#[cfg_attr(test, automock)]
pub trait RunLogger: Send + Sync {
    /// Append one event.
    fn log_event(&self, event: &RunEvent) -> Result<(), LoggingError>;

    /// The most recent `limit` events, oldest first.
    fn tail(&self, limit: usize) -> Vec<RunEvent>;
}

/// Bounded in-memory ring buffer of run events.
#[derive(Debug)]
pub struct MemoryRunLogger {
    events: Mutex<VecDeque<RunEvent>>,
    capacity: usize,
}

impl MemoryRunLogger {
    /// Create a logger retaining at most `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity: capacity.max(1),
        }
    }

    /// Number of retained events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if no events are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl RunLogger for MemoryRunLogger {
    fn log_event(&self, event: &RunEvent) -> Result<(), LoggingError> {
        let mut events = self.events.lock();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event.clone());
        Ok(())
    }

    fn tail(&self, limit: usize) -> Vec<RunEvent> {
        let events = self.events.lock();
        let skip = events.len().saturating_sub(limit);
        events.iter().skip(skip).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(step: u64) -> RunEvent {
        RunEvent {
            step,
            timestamp: Utc::now(),
            symbol: "BTCUSDT".to_string(),
            signal: None,
            orders_submitted: 0,
            orders_filled: 0,
            risk_allowed: None,
            risk_severity: None,
            price: None,
            fill_price: None,
            note: None,
        }
    }

    #[test]
    fn test_ring_buffer_evicts_oldest() {
        let logger = MemoryRunLogger::new(3);
        for step in 0..5 {
            logger.log_event(&event(step)).unwrap();
        }
        assert_eq!(logger.len(), 3);

        let tail = logger.tail(10);
        let steps: Vec<u64> = tail.iter().map(|e| e.step).collect();
        assert_eq!(steps, vec![2, 3, 4]);
    }

    #[test]
    fn test_tail_returns_most_recent() {
        let logger = MemoryRunLogger::new(10);
        for step in 0..6 {
            logger.log_event(&event(step)).unwrap();
        }
        let tail = logger.tail(2);
        let steps: Vec<u64> = tail.iter().map(|e| e.step).collect();
        assert_eq!(steps, vec![4, 5]);
    }

    #[test]
    fn test_zero_capacity_clamps_to_one() {
        let logger = MemoryRunLogger::new(0);
        logger.log_event(&event(1)).unwrap();
        logger.log_event(&event(2)).unwrap();
        assert_eq!(logger.len(), 1);
        assert_eq!(logger.tail(5)[0].step, 2);
    }
}
