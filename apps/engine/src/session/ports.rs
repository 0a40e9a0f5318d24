//! Ports the orchestrator resolves per session.
//!
//! Each capability is an explicit interface satisfied (or declined) at
//! construction time; the orchestrator never probes objects at runtime.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::EnvironmentConfig;
use crate::execution::{
    OrderExecutor, PaperExecutor, PaperFillConfig, ShadowExecutor, TestnetExecutor,
};
use crate::feed::Tick;

use super::state::RunMode;

/// A readiness pre-flight failed; the session was never registered.
#[derive(Debug, Clone, Error)]
pub enum ReadinessError {
    /// The process environment does not support the requested mode.
    #[error("environment not ready: {0}")]
    NotReady(String),
}

/// Pre-flight validation run before a session is allowed to start.
#[async_trait]
pub trait ReadinessCheck: Send + Sync {
    /// Check that a run of `mode` can start right now.
    async fn check(&self, mode: RunMode) -> Result<(), ReadinessError>;
}

/// Readiness derived from the process environment configuration.
///
/// A testnet run requires the process to actually be configured for the
/// testnet environment; shadow runs are always ready.
#[derive(Debug, Clone)]
pub struct EnvironmentReadiness {
    environment: EnvironmentConfig,
}

impl EnvironmentReadiness {
    /// Create a readiness check over the process environment.
    #[must_use]
    pub const fn new(environment: EnvironmentConfig) -> Self {
        Self { environment }
    }
}

#[async_trait]
impl ReadinessCheck for EnvironmentReadiness {
    async fn check(&self, mode: RunMode) -> Result<(), ReadinessError> {
        match mode {
            RunMode::Shadow => Ok(()),
            RunMode::Testnet => {
                if self.environment.environment.is_testnet() {
                    Ok(())
                } else {
                    Err(ReadinessError::NotReady(format!(
                        "testnet run requires the TESTNET environment, process is {}",
                        self.environment.environment
                    )))
                }
            }
        }
    }
}

/// Per-tick strategy driving one session.
///
/// The research layer that selects and parameterizes strategies lives
/// outside the core; a session only needs this narrow surface.
pub trait Strategy: Send {
    /// Consume a tick, optionally producing a new raw signal value.
    fn on_tick(&mut self, tick: &Tick) -> Option<f64>;
}

/// Resolves strategy keys to strategy instances.
pub trait StrategyProvider: Send + Sync {
    /// Build a fresh strategy for one session, or `None` for unknown keys.
    fn strategy_for(&self, key: &str) -> Option<Box<dyn Strategy>>;
}

/// Strategy replaying a fixed signal script, one value per tick.
///
/// Once the script is exhausted the last signal holds.
#[derive(Debug, Clone)]
pub struct ScriptedStrategy {
    signals: std::collections::VecDeque<f64>,
}

impl ScriptedStrategy {
    /// Create a strategy replaying `signals` in order.
    #[must_use]
    pub fn new(signals: Vec<f64>) -> Self {
        Self {
            signals: signals.into(),
        }
    }
}

impl Strategy for ScriptedStrategy {
    fn on_tick(&mut self, _tick: &Tick) -> Option<f64> {
        self.signals.pop_front()
    }
}

/// Provider resolving strategy keys to fixed signal scripts.
#[derive(Debug, Clone, Default)]
pub struct ScriptedStrategyProvider {
    scripts: std::collections::HashMap<String, Vec<f64>>,
}

impl ScriptedStrategyProvider {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a signal script under a strategy key.
    #[must_use]
    pub fn with_script(mut self, key: impl Into<String>, signals: Vec<f64>) -> Self {
        self.scripts.insert(key.into(), signals);
        self
    }
}

impl StrategyProvider for ScriptedStrategyProvider {
    fn strategy_for(&self, key: &str) -> Option<Box<dyn Strategy>> {
        self.scripts
            .get(key)
            .map(|signals| Box::new(ScriptedStrategy::new(signals.clone())) as Box<dyn Strategy>)
    }
}

/// Resolves the order executor used by a session.
pub trait ExecutorProvider: Send + Sync {
    /// Build the executor for a run of `mode`.
    fn executor_for(&self, mode: RunMode) -> Arc<dyn OrderExecutor>;
}

/// Default executor wiring by mode and environment.
///
/// Shadow runs get the log-only executor. Testnet runs stay fully local on a
/// paper executor while `testnet_dry_run` is set and graduate to the
/// validate-only executor when it is lifted.
#[derive(Debug, Clone)]
pub struct DefaultExecutorProvider {
    environment: EnvironmentConfig,
    fill: PaperFillConfig,
}

impl DefaultExecutorProvider {
    /// Create the default provider.
    #[must_use]
    pub const fn new(environment: EnvironmentConfig, fill: PaperFillConfig) -> Self {
        Self { environment, fill }
    }
}

impl ExecutorProvider for DefaultExecutorProvider {
    fn executor_for(&self, mode: RunMode) -> Arc<dyn OrderExecutor> {
        match mode {
            RunMode::Shadow => Arc::new(ShadowExecutor::new()),
            RunMode::Testnet => {
                if self.environment.testnet_dry_run {
                    Arc::new(PaperExecutor::new(self.fill))
                } else {
                    Arc::new(TestnetExecutor)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Environment;

    fn environment(env: Environment) -> EnvironmentConfig {
        EnvironmentConfig {
            environment: env,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_shadow_is_always_ready() {
        let check = EnvironmentReadiness::new(environment(Environment::Paper));
        assert!(check.check(RunMode::Shadow).await.is_ok());
    }

    #[tokio::test]
    async fn test_testnet_requires_testnet_environment() {
        let check = EnvironmentReadiness::new(environment(Environment::Paper));
        assert!(check.check(RunMode::Testnet).await.is_err());

        let check = EnvironmentReadiness::new(environment(Environment::Testnet));
        assert!(check.check(RunMode::Testnet).await.is_ok());
    }

    #[test]
    fn test_default_executor_wiring() {
        let provider = DefaultExecutorProvider::new(
            environment(Environment::Testnet),
            PaperFillConfig::default(),
        );
        assert_eq!(provider.executor_for(RunMode::Shadow).name(), "shadow");
        assert_eq!(provider.executor_for(RunMode::Testnet).name(), "paper");

        let mut lifted = environment(Environment::Testnet);
        lifted.testnet_dry_run = false;
        let provider = DefaultExecutorProvider::new(lifted, PaperFillConfig::default());
        assert_eq!(
            provider.executor_for(RunMode::Testnet).name(),
            "testnet-validate"
        );
    }
}
