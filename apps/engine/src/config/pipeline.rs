//! Execution pipeline configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::OrderType;

/// Configuration for an execution pipeline instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Order type used for generated orders.
    #[serde(default = "default_order_type")]
    pub default_order_type: OrderType,
    /// Fraction of the base size committed per signal, in (0, 1].
    #[serde(default = "default_sizing_fraction")]
    pub sizing_fraction: Decimal,
    /// Generate a client order id (uuid v4) for each order.
    #[serde(default = "default_true")]
    pub generate_client_ids: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_order_type: default_order_type(),
            sizing_fraction: default_sizing_fraction(),
            generate_client_ids: true,
        }
    }
}

const fn default_order_type() -> OrderType {
    OrderType::Market
}

fn default_sizing_fraction() -> Decimal {
    Decimal::ONE
}

const fn default_true() -> bool {
    true
}
