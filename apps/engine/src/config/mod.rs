//! Configuration module for the engine.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation for all engine components.
//!
//! # Usage
//!
//! ```rust,ignore
//! use keel_engine::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//! ```

mod environment;
mod pipeline;
mod risk;
mod session;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use environment::{EnvironmentConfig, LIVE_CONFIRM_PHRASE};
pub use pipeline::PipelineConfig;
pub use risk::RiskConfig;
pub use session::SessionConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Environment and safety flags.
    #[serde(default)]
    pub environment: EnvironmentConfig,
    /// Risk limiter thresholds.
    #[serde(default)]
    pub risk: RiskConfig,
    /// Execution pipeline configuration.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Session loop configuration.
    #[serde(default)]
    pub session: SessionConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let mut result = input.to_string();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    for cap in re.captures_iter(input) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        let Some(var_match) = cap.get(1) else {
            continue;
        };
        let full_match = full_match.as_str();
        let var_name = var_match.as_str();
        let default_value = cap.get(2).map(|m| m.as_str());

        let value = match std::env::var(var_name) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        };

        result = result.replace(full_match, &value);
    }

    result
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // The live dry-run rail is permanent: an armed live setup with the rail
    // lowered is refused at load time rather than discovered at order time.
    let env = &config.environment;
    if env.enable_live_trading && env.live_mode_armed && !env.live_dry_run_mode {
        return Err(ConfigError::ValidationError(
            "live_dry_run_mode must stay enabled while live trading is enabled and armed"
                .to_string(),
        ));
    }

    let risk = &config.risk;
    for (name, cap) in [
        ("max_order_notional", risk.max_order_notional),
        (
            "max_symbol_exposure_notional",
            risk.max_symbol_exposure_notional,
        ),
        (
            "max_total_exposure_notional",
            risk.max_total_exposure_notional,
        ),
        ("max_daily_loss", risk.max_daily_loss),
        ("max_daily_loss_pct", risk.max_daily_loss_pct),
    ] {
        if let Some(value) = cap
            && value <= Decimal::ZERO
        {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be positive"
            )));
        }
    }

    if risk.max_daily_loss_pct.is_some() && risk.starting_capital.is_none() {
        return Err(ConfigError::ValidationError(
            "max_daily_loss_pct requires starting_capital".to_string(),
        ));
    }

    if let Some(ratio) = risk.warn_ratio
        && (ratio <= Decimal::ZERO || ratio > Decimal::ONE)
    {
        return Err(ConfigError::ValidationError(
            "warn_ratio must be in (0, 1]".to_string(),
        ));
    }

    let fraction = config.pipeline.sizing_fraction;
    if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
        return Err(ConfigError::ValidationError(
            "pipeline.sizing_fraction must be in (0, 1]".to_string(),
        ));
    }

    if config.session.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "session.poll_interval_ms must be positive".to_string(),
        ));
    }

    if config.session.base_order_size <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "session.base_order_size must be positive".to_string(),
        ));
    }

    Ok(())
}
