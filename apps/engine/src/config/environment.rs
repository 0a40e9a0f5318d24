//! Environment and safety-flag configuration.

use serde::{Deserialize, Serialize};

use crate::models::Environment;

/// Arming phrase a live confirm token must match to be considered valid.
pub const LIVE_CONFIRM_PHRASE: &str = "I-UNDERSTAND-LIVE-TRADING";

/// Declaration of the active trading environment and its safety flags.
///
/// Created once at process or session start and never mutated; the safety
/// guard evaluates it on every order attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Active trading environment.
    #[serde(default = "default_environment")]
    pub environment: Environment,
    /// Master switch for live trading.
    #[serde(default)]
    pub enable_live_trading: bool,
    /// Live mode must be explicitly armed in addition to being enabled.
    #[serde(default)]
    pub live_mode_armed: bool,
    /// Technical rail: suppresses real live orders even when fully armed.
    #[serde(default = "default_true")]
    pub live_dry_run_mode: bool,
    /// Whether a confirm token is required to authorize live orders.
    #[serde(default = "default_true")]
    pub require_confirm_token: bool,
    /// Confirm token; valid only when equal to [`LIVE_CONFIRM_PHRASE`].
    #[serde(default)]
    pub confirm_token: Option<String>,
    /// Keep testnet calls fully local instead of validate-only network attempts.
    #[serde(default = "default_true")]
    pub testnet_dry_run: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            enable_live_trading: false,
            live_mode_armed: false,
            live_dry_run_mode: true,
            require_confirm_token: true,
            confirm_token: None,
            testnet_dry_run: true,
        }
    }
}

impl EnvironmentConfig {
    /// Returns true if the configured confirm token matches the arming phrase.
    #[must_use]
    pub fn confirm_token_valid(&self) -> bool {
        self.confirm_token
            .as_deref()
            .is_some_and(|token| token == LIVE_CONFIRM_PHRASE)
    }

    /// Returns true only when every gate on the live path is open.
    ///
    /// Requires the live environment, live trading enabled and armed, the
    /// dry-run rail lowered, and a valid confirm token when one is required.
    /// Any other environment always returns false.
    #[must_use]
    pub fn allows_real_orders(&self) -> bool {
        self.environment.is_live()
            && self.enable_live_trading
            && self.live_mode_armed
            && !self.live_dry_run_mode
            && (!self.require_confirm_token || self.confirm_token_valid())
    }
}

const fn default_true() -> bool {
    true
}

const fn default_environment() -> Environment {
    Environment::Paper
}
