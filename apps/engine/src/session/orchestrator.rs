//! Concurrent session lifecycle management.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::config::{Config, EnvironmentConfig, PipelineConfig, RiskConfig, SessionConfig};
use crate::execution::{ExecutionPipeline, MemoryRunLogger, RunEvent, RunLogger};
use crate::feed::FeedProvider;
use crate::risk::{AlertSink, RiskLedger, RiskLimiter};
use crate::safety::SafetyGuard;

use super::ports::{
    EnvironmentReadiness, ExecutorProvider, ReadinessCheck, ReadinessError, StrategyProvider,
};
use super::runner::SessionLoop;
use super::state::{RunMode, RunState, RunStatus};

/// Orchestrator operation failure.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// No session with the given run id.
    #[error("run {0} not found")]
    RunNotFound(String),
    /// A readiness pre-flight failed; no session was registered.
    #[error("readiness check failed: {0}")]
    ReadinessFailed(#[from] ReadinessError),
    /// The start request itself was malformed.
    #[error("invalid run request: {0}")]
    InvalidRequest(String),
    /// The strategy key resolved to nothing.
    #[error("unknown strategy key: {0}")]
    UnknownStrategy(String),
}

pub(super) type Registry = Arc<Mutex<HashMap<String, SessionEntry>>>;

/// Registry entry for one session.
pub(super) struct SessionEntry {
    pub(super) status: RunStatus,
    pub(super) cancel: CancellationToken,
    pub(super) logger: Arc<MemoryRunLogger>,
}

/// Manages the concurrent lifecycle of trading sessions.
///
/// The orchestrator is the single coordinator over a mutex-guarded registry
/// mapping run id to session state. Each session owns an independent
/// pipeline, executor and feed; stopping is cooperative through the
/// session's cancellation token.
pub struct SessionOrchestrator {
    environment: EnvironmentConfig,
    risk: RiskConfig,
    pipeline: PipelineConfig,
    session: SessionConfig,
    executors: Arc<dyn ExecutorProvider>,
    feeds: Arc<dyn FeedProvider>,
    strategies: Arc<dyn StrategyProvider>,
    ledger: Arc<dyn RiskLedger>,
    alert_sink: Option<Arc<dyn AlertSink>>,
    readiness: Arc<dyn ReadinessCheck>,
    registry: Registry,
}

impl SessionOrchestrator {
    /// Create an orchestrator over explicit dependencies.
    ///
    /// Readiness defaults to [`EnvironmentReadiness`] over the configured
    /// environment; no alert sink is wired by default.
    #[must_use]
    pub fn new(
        config: Config,
        executors: Arc<dyn ExecutorProvider>,
        feeds: Arc<dyn FeedProvider>,
        strategies: Arc<dyn StrategyProvider>,
        ledger: Arc<dyn RiskLedger>,
    ) -> Self {
        let readiness = Arc::new(EnvironmentReadiness::new(config.environment.clone()));
        Self {
            environment: config.environment,
            risk: config.risk,
            pipeline: config.pipeline,
            session: config.session,
            executors,
            feeds,
            strategies,
            ledger,
            alert_sink: None,
            readiness,
            registry: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Wire an alert sink into every session's risk limiter.
    #[must_use]
    pub fn with_alert_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.alert_sink = Some(sink);
        self
    }

    /// Replace the readiness check.
    #[must_use]
    pub fn with_readiness(mut self, readiness: Arc<dyn ReadinessCheck>) -> Self {
        self.readiness = readiness;
        self
    }

    /// Start a shadow (log-only) run.
    pub async fn start_shadow_run(
        &self,
        strategy: &str,
        symbol: &str,
        timeframe: &str,
        notes: Option<String>,
    ) -> Result<String, OrchestratorError> {
        self.start_run(RunMode::Shadow, strategy, symbol, timeframe, notes)
            .await
    }

    /// Start a testnet run.
    ///
    /// The readiness pre-flight must pass before the session is inserted
    /// into the registry at all; a failing check leaves no trace.
    pub async fn start_testnet_run(
        &self,
        strategy: &str,
        symbol: &str,
        timeframe: &str,
        notes: Option<String>,
    ) -> Result<String, OrchestratorError> {
        self.start_run(RunMode::Testnet, strategy, symbol, timeframe, notes)
            .await
    }

    async fn start_run(
        &self,
        mode: RunMode,
        strategy_key: &str,
        symbol: &str,
        timeframe: &str,
        notes: Option<String>,
    ) -> Result<String, OrchestratorError> {
        if symbol.trim().is_empty() {
            return Err(OrchestratorError::InvalidRequest(
                "symbol must not be empty".to_string(),
            ));
        }
        if timeframe.trim().is_empty() {
            return Err(OrchestratorError::InvalidRequest(
                "timeframe must not be empty".to_string(),
            ));
        }
        let strategy = self
            .strategies
            .strategy_for(strategy_key)
            .ok_or_else(|| OrchestratorError::UnknownStrategy(strategy_key.to_string()))?;

        if mode == RunMode::Testnet {
            self.readiness.check(mode).await?;
        }

        let run_id = Uuid::new_v4().to_string();
        let cancel = CancellationToken::new();
        let logger = Arc::new(MemoryRunLogger::new(self.session.event_capacity));
        let pipeline = self.build_pipeline(mode, logger.clone());
        let feed = self.feeds.feed_for(symbol, timeframe);

        let status = RunStatus {
            run_id: run_id.clone(),
            mode,
            strategy: strategy_key.to_string(),
            symbol: symbol.to_string(),
            timeframe: timeframe.to_string(),
            state: RunState::Pending,
            started_at: None,
            ended_at: None,
            last_error: None,
            notes,
        };

        {
            let mut registry = self.registry.lock();
            let mut entry = SessionEntry {
                status,
                cancel: cancel.clone(),
                logger,
            };
            // Registered and validated; mark running before the loop spawns
            // so its terminal transition can never be overwritten.
            entry.status.state = RunState::Running;
            entry.status.started_at = Some(Utc::now());
            registry.insert(run_id.clone(), entry);
        }

        let session_loop = SessionLoop {
            run_id: run_id.clone(),
            symbol: symbol.to_string(),
            strategy,
            feed,
            pipeline,
            cancel,
            poll_interval: Duration::from_millis(self.session.poll_interval_ms),
            base_size: self.session.base_order_size * self.pipeline.sizing_fraction,
            registry: Arc::clone(&self.registry),
        };
        tokio::spawn(session_loop.run());

        info!(run_id = %run_id, mode = %mode, symbol = %symbol, strategy = %strategy_key, "session started");
        Ok(run_id)
    }

    /// Build the per-session pipeline with mode-appropriate wiring.
    ///
    /// Every session carries the environment hard block, the risk limiter
    /// and the run logger. The safety guard gates network attempts, so it is
    /// wired only for testnet sessions with the dry-run flag lifted; dry-run
    /// and shadow sessions stay fully local simulations.
    fn build_pipeline(&self, mode: RunMode, logger: Arc<MemoryRunLogger>) -> ExecutionPipeline {
        let executor = self.executors.executor_for(mode);
        let mut limiter = RiskLimiter::new(self.risk.clone(), Arc::clone(&self.ledger))
            .with_pnl_categories(vec![mode.category()]);
        if let Some(sink) = &self.alert_sink {
            limiter = limiter.with_alert_sink(Arc::clone(sink));
        }

        let mut pipeline = ExecutionPipeline::new(self.pipeline.clone(), executor)
            .with_environment(self.environment.clone())
            .with_risk_limiter(limiter)
            .with_run_logger(logger as Arc<dyn RunLogger>);

        if mode == RunMode::Testnet && !self.environment.testnet_dry_run {
            pipeline = pipeline.with_safety_guard(SafetyGuard::new(self.environment.clone()));
        }
        pipeline
    }

    /// Snapshot one session's status.
    pub fn get_status(&self, run_id: &str) -> Result<RunStatus, OrchestratorError> {
        let registry = self.registry.lock();
        registry
            .get(run_id)
            .map(|entry| entry.status.clone())
            .ok_or_else(|| OrchestratorError::RunNotFound(run_id.to_string()))
    }

    /// Snapshot all sessions, unordered.
    #[must_use]
    pub fn all_statuses(&self) -> Vec<RunStatus> {
        let registry = self.registry.lock();
        registry.values().map(|entry| entry.status.clone()).collect()
    }

    /// Request a cooperative stop.
    ///
    /// Returns once the stop flag is set, not once the loop has exited;
    /// poll [`Self::get_status`] until the state turns terminal. Stopping an
    /// already-terminal session is a no-op.
    pub fn stop_run(&self, run_id: &str) -> Result<(), OrchestratorError> {
        let registry = self.registry.lock();
        let entry = registry
            .get(run_id)
            .ok_or_else(|| OrchestratorError::RunNotFound(run_id.to_string()))?;
        if entry.status.state.is_terminal() {
            return Ok(());
        }
        entry.cancel.cancel();
        info!(run_id = %run_id, "session stop requested");
        Ok(())
    }

    /// Request a cooperative stop of every active session.
    pub fn stop_all(&self) {
        let registry = self.registry.lock();
        for entry in registry.values() {
            if !entry.status.state.is_terminal() {
                entry.cancel.cancel();
            }
        }
        info!(sessions = registry.len(), "stop requested for all sessions");
    }

    /// The most recent `limit` events of one session.
    ///
    /// Read-only pass-through to the session's run logger.
    pub fn tail_events(
        &self,
        run_id: &str,
        limit: usize,
    ) -> Result<Vec<RunEvent>, OrchestratorError> {
        let logger = {
            let registry = self.registry.lock();
            registry
                .get(run_id)
                .map(|entry| Arc::clone(&entry.logger))
                .ok_or_else(|| OrchestratorError::RunNotFound(run_id.to_string()))?
        };
        Ok(logger.tail(limit))
    }

    /// Evict a terminal session from the registry.
    pub fn evict_run(&self, run_id: &str) -> Result<RunStatus, OrchestratorError> {
        let mut registry = self.registry.lock();
        let entry = registry
            .get(run_id)
            .ok_or_else(|| OrchestratorError::RunNotFound(run_id.to_string()))?;
        if !entry.status.state.is_terminal() {
            return Err(OrchestratorError::InvalidRequest(format!(
                "run {run_id} is still {}",
                entry.status.state
            )));
        }
        let entry = registry
            .remove(run_id)
            .ok_or_else(|| OrchestratorError::RunNotFound(run_id.to_string()))?;
        Ok(entry.status)
    }
}

impl std::fmt::Debug for SessionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionOrchestrator")
            .field("environment", &self.environment.environment)
            .field("sessions", &self.registry.lock().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::PaperFillConfig;
    use crate::feed::ScriptedFeedProvider;
    use crate::models::Environment;
    use crate::risk::NullRiskLedger;
    use crate::session::ports::{DefaultExecutorProvider, ScriptedStrategyProvider};
    use rust_decimal_macros::dec;

    fn fast_config(environment: Environment) -> Config {
        Config {
            environment: EnvironmentConfig {
                environment,
                ..Default::default()
            },
            session: SessionConfig {
                poll_interval_ms: 1,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn orchestrator(environment: Environment, prices: Vec<rust_decimal::Decimal>) -> SessionOrchestrator {
        let config = fast_config(environment);
        let executors = Arc::new(DefaultExecutorProvider::new(
            config.environment.clone(),
            PaperFillConfig::default(),
        ));
        let strategies = Arc::new(
            ScriptedStrategyProvider::new().with_script("trend", vec![0.0, 1.0, 1.0, -1.0]),
        );
        SessionOrchestrator::new(
            config,
            executors,
            Arc::new(ScriptedFeedProvider::new(prices)),
            strategies,
            Arc::new(NullRiskLedger),
        )
    }

    async fn wait_for_terminal(orchestrator: &SessionOrchestrator, run_id: &str) -> RunStatus {
        for _ in 0..500 {
            let status = orchestrator.get_status(run_id).unwrap();
            if status.state.is_terminal() {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("session {run_id} never reached a terminal state");
    }

    #[tokio::test]
    async fn test_shadow_run_completes_on_feed_exhaustion() {
        let orchestrator = orchestrator(
            Environment::Paper,
            vec![dec!(100), dec!(101), dec!(102), dec!(103)],
        );
        let run_id = orchestrator
            .start_shadow_run("trend", "BTCUSDT", "1m", None)
            .await
            .unwrap();

        let status = wait_for_terminal(&orchestrator, &run_id).await;
        assert_eq!(status.state, RunState::Stopped);
        assert!(status.started_at.is_some());
        assert!(status.ended_at.is_some());
        assert!(status.last_error.is_none());

        let events = orchestrator.tail_events(&run_id, 10).unwrap();
        assert_eq!(events.len(), 4);
        assert!(events.iter().any(|e| e.orders_filled > 0));
    }

    #[tokio::test]
    async fn test_unknown_strategy_is_rejected() {
        let orchestrator = orchestrator(Environment::Paper, vec![dec!(100)]);
        let err = orchestrator
            .start_shadow_run("nope", "BTCUSDT", "1m", None)
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::UnknownStrategy(_)));
    }

    #[tokio::test]
    async fn test_empty_symbol_is_rejected() {
        let orchestrator = orchestrator(Environment::Paper, vec![dec!(100)]);
        let err = orchestrator
            .start_shadow_run("trend", " ", "1m", None)
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_failed_testnet_readiness_leaves_no_ghost_entry() {
        // Paper process environment: testnet readiness must fail.
        let orchestrator = orchestrator(Environment::Paper, vec![dec!(100)]);
        let err = orchestrator
            .start_testnet_run("trend", "BTCUSDT", "1m", None)
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::ReadinessFailed(_)));
        assert!(orchestrator.all_statuses().is_empty());
    }

    #[tokio::test]
    async fn test_testnet_run_starts_in_testnet_environment() {
        let orchestrator = orchestrator(Environment::Testnet, vec![dec!(100), dec!(101)]);
        let run_id = orchestrator
            .start_testnet_run("trend", "BTCUSDT", "1m", None)
            .await
            .unwrap();
        let status = wait_for_terminal(&orchestrator, &run_id).await;
        assert_eq!(status.state, RunState::Stopped);
        assert_eq!(status.mode, RunMode::Testnet);
    }

    #[tokio::test]
    async fn test_stop_run_is_cooperative_and_idempotent() {
        // Endless enough feed that the session must be stopped explicitly.
        let orchestrator = orchestrator(Environment::Paper, vec![dec!(100); 100_000]);
        let run_id = orchestrator
            .start_shadow_run("trend", "BTCUSDT", "1m", None)
            .await
            .unwrap();

        assert_eq!(
            orchestrator.get_status(&run_id).unwrap().state,
            RunState::Running
        );

        orchestrator.stop_run(&run_id).unwrap();
        let status = wait_for_terminal(&orchestrator, &run_id).await;
        assert_eq!(status.state, RunState::Stopped);

        // Stopping a stopped session is a no-op.
        orchestrator.stop_run(&run_id).unwrap();
        assert_eq!(
            orchestrator.get_status(&run_id).unwrap().state,
            RunState::Stopped
        );
    }

    #[tokio::test]
    async fn test_get_status_unknown_run() {
        let orchestrator = orchestrator(Environment::Paper, vec![dec!(100)]);
        let err = orchestrator.get_status("missing").unwrap_err();
        assert!(matches!(err, OrchestratorError::RunNotFound(_)));
    }

    #[tokio::test]
    async fn test_stop_all_covers_every_session() {
        let orchestrator = orchestrator(Environment::Paper, vec![dec!(100); 100_000]);
        let a = orchestrator
            .start_shadow_run("trend", "BTCUSDT", "1m", None)
            .await
            .unwrap();
        let b = orchestrator
            .start_shadow_run("trend", "ETHUSDT", "1m", None)
            .await
            .unwrap();

        orchestrator.stop_all();
        assert_eq!(
            wait_for_terminal(&orchestrator, &a).await.state,
            RunState::Stopped
        );
        assert_eq!(
            wait_for_terminal(&orchestrator, &b).await.state,
            RunState::Stopped
        );
    }

    #[tokio::test]
    async fn test_evict_refuses_active_sessions() {
        let orchestrator = orchestrator(Environment::Paper, vec![dec!(100); 100_000]);
        let run_id = orchestrator
            .start_shadow_run("trend", "BTCUSDT", "1m", None)
            .await
            .unwrap();

        assert!(orchestrator.evict_run(&run_id).is_err());

        orchestrator.stop_run(&run_id).unwrap();
        wait_for_terminal(&orchestrator, &run_id).await;

        let evicted = orchestrator.evict_run(&run_id).unwrap();
        assert_eq!(evicted.run_id, run_id);
        assert!(matches!(
            orchestrator.get_status(&run_id).unwrap_err(),
            OrchestratorError::RunNotFound(_)
        ));
    }
}
