// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access
    )
)]

//! Keel Engine - Rust Core Library
//!
//! Safety-gated execution core for the Keel trading system.
//!
//! # Architecture
//!
//! Modules form a strict layering, leaf to root:
//!
//! - **models**: shared data model (orders, fills, portfolio, signals)
//! - **config**: environment safety flags, risk thresholds, loading
//! - **safety**: pure gating evaluator over the environment flags
//! - **risk**: admission control over order batches and portfolios
//! - **execution**: signal-to-order pipeline and executor port
//! - **session**: concurrent session orchestration
//!
//! No module reaches upward; wiring happens in constructors. One
//! orchestrator, limiter or pipeline instance is built explicitly per
//! process (or per test) - there is no ambient global state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod execution;
pub mod feed;
pub mod models;
pub mod risk;
pub mod safety;
pub mod session;
pub mod telemetry;

pub use config::{Config, EnvironmentConfig, PipelineConfig, RiskConfig, SessionConfig, load_config};
pub use execution::{
    ExecutionContext, ExecutionPipeline, ExecutionSummary, MemoryRunLogger, OrderExecutor,
    PaperExecutor, PaperFillConfig, RunEvent, RunLogger, SafeExecutionOutcome, ShadowExecutor,
    TestnetExecutor,
};
pub use feed::{DataFeed, FeedProvider, ScriptedFeed, ScriptedFeedProvider, Tick};
pub use models::{
    Environment, ExecutionResult, ExecutionStatus, Fill, OrderRequest, OrderSide, OrderType,
    PortfolioSnapshot, Position, Signal,
};
pub use risk::{
    Alert, AlertSeverity, AlertSink, LogAlertSink, NullRiskLedger, PriceBook, RiskCheckResult,
    RiskLedger, RiskLimiter, RiskSeverity, RunCategory,
};
pub use safety::{EffectiveMode, GatingError, SafetyGuard};
pub use session::{
    DefaultExecutorProvider, EnvironmentReadiness, ExecutorProvider, OrchestratorError,
    ReadinessCheck, ReadinessError, RunMode, RunState, RunStatus, ScriptedStrategyProvider,
    SessionOrchestrator, Strategy, StrategyProvider,
};
