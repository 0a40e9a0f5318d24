//! Environment gating for order placement.
//!
//! The safety guard is a pure, stateless evaluator over the environment
//! configuration. It never mutates anything; its only output is either
//! permission or a typed error naming exactly which gate failed.

use thiserror::Error;

use crate::config::EnvironmentConfig;
use crate::models::Environment;

/// A gate refused the attempted order placement.
///
/// Gating errors are never retried; they resolve only by reconfiguration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatingError {
    /// Paper environment forbids order placement of any kind.
    #[error("paper environment forbids order placement")]
    PaperMode,
    /// Live trading is not enabled.
    #[error("live trading is disabled (enable_live_trading is off)")]
    TradingDisabled,
    /// Live mode is enabled but not armed.
    #[error("live mode is not armed (live_mode_armed is off)")]
    NotArmed,
    /// A confirm token is required but none is configured.
    #[error("live confirm token is required but missing")]
    ConfirmTokenMissing,
    /// The configured confirm token does not match the arming phrase.
    #[error("live confirm token is invalid")]
    ConfirmTokenInvalid,
    /// The live dry-run rail is up; real live execution stays blocked.
    #[error("live dry-run mode blocks real orders (live execution not implemented)")]
    LiveDryRun,
    /// Testnet dry-run keeps the call fully local.
    #[error("testnet dry-run forbids network order attempts")]
    TestnetDryRunOnly,
}

/// Composite human-meaningful mode derived from the environment flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveMode {
    /// Fully simulated paper trading.
    Paper,
    /// Testnet with real validate-only network attempts.
    Testnet,
    /// Testnet kept fully local by the dry-run flag.
    DryRun,
    /// Live with every gate open.
    Live,
    /// Live fully armed but short-circuited by the dry-run rail.
    LiveDryRun,
    /// Live environment with an incomplete authorization chain.
    LiveDisarmed,
}

impl std::fmt::Display for EffectiveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paper => write!(f, "paper"),
            Self::Testnet => write!(f, "testnet"),
            Self::DryRun => write!(f, "dry_run"),
            Self::Live => write!(f, "live"),
            Self::LiveDryRun => write!(f, "live_dry_run"),
            Self::LiveDisarmed => write!(f, "live_disarmed"),
        }
    }
}

/// Pure evaluator deciding whether placing an order is currently permitted.
#[derive(Debug, Clone)]
pub struct SafetyGuard {
    config: EnvironmentConfig,
}

impl SafetyGuard {
    /// Create a guard over an immutable environment configuration.
    #[must_use]
    pub const fn new(config: EnvironmentConfig) -> Self {
        Self { config }
    }

    /// The environment configuration this guard evaluates.
    #[must_use]
    pub const fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Check whether an order may be placed right now.
    ///
    /// `is_testnet` marks the attempt as targeting the exchange sandbox
    /// rather than the live venue. Gates are evaluated in fixed precedence:
    /// the paper environment rejects everything; testnet attempts are gated
    /// by the testnet dry-run flag; live attempts walk the authorization
    /// chain (enabled, armed, confirm token) and then hit the always-checked
    /// live dry-run rail.
    pub fn ensure_may_place_order(&self, is_testnet: bool) -> Result<(), GatingError> {
        if self.config.environment.is_paper() {
            return Err(GatingError::PaperMode);
        }

        if is_testnet {
            if self.config.testnet_dry_run {
                return Err(GatingError::TestnetDryRunOnly);
            }
            return Ok(());
        }

        if !self.config.enable_live_trading {
            return Err(GatingError::TradingDisabled);
        }
        if !self.config.live_mode_armed {
            return Err(GatingError::NotArmed);
        }
        if self.config.require_confirm_token {
            if self.config.confirm_token.is_none() {
                return Err(GatingError::ConfirmTokenMissing);
            }
            if !self.config.confirm_token_valid() {
                return Err(GatingError::ConfirmTokenInvalid);
            }
        }
        // Technical rail, checked last and unconditionally.
        if self.config.live_dry_run_mode {
            return Err(GatingError::LiveDryRun);
        }

        Ok(())
    }

    /// Report the composite effective mode.
    #[must_use]
    pub fn effective_mode(&self) -> EffectiveMode {
        match self.config.environment {
            Environment::Paper => EffectiveMode::Paper,
            Environment::Testnet => {
                if self.config.testnet_dry_run {
                    EffectiveMode::DryRun
                } else {
                    EffectiveMode::Testnet
                }
            }
            Environment::Live => {
                if self.config.allows_real_orders() {
                    EffectiveMode::Live
                } else if self.config.live_dry_run_mode {
                    EffectiveMode::LiveDryRun
                } else {
                    EffectiveMode::LiveDisarmed
                }
            }
        }
    }
}
