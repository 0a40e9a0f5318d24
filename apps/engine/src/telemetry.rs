//! Tracing subscriber setup.
//!
//! # Configuration
//!
//! - `RUST_LOG`: log filter (default: `info`)
//!
//! # Usage
//!
//! ```rust,ignore
//! use keel_engine::telemetry::init_telemetry;
//!
//! #[tokio::main]
//! async fn main() {
//!     init_telemetry();
//!     // ... application code
//! }
//! ```

use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with an env filter and console output.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_telemetry() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true);

    Registry::default().with(env_filter).with(fmt_layer).init();
}
