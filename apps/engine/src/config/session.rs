//! Session loop configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration shared by all session loops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Feed poll interval in milliseconds; also the cancellation cadence bound.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Ring-buffer capacity of each session's run logger.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    /// Base position size targeted at full signal strength.
    #[serde(default = "default_base_order_size")]
    pub base_order_size: Decimal,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            event_capacity: default_event_capacity(),
            base_order_size: default_base_order_size(),
        }
    }
}

const fn default_poll_interval() -> u64 {
    250
}

const fn default_event_capacity() -> usize {
    512
}

fn default_base_order_size() -> Decimal {
    Decimal::ONE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.event_capacity, 512);
        assert_eq!(config.base_order_size, Decimal::ONE);
    }
}
