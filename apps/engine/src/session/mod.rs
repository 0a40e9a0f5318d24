//! Session orchestration.
//!
//! The orchestrator starts, stops and reports on concurrently running
//! trading sessions, each driving its own execution pipeline against a feed.

mod orchestrator;
mod ports;
mod runner;
mod state;

pub use orchestrator::{OrchestratorError, SessionOrchestrator};
pub use ports::{
    DefaultExecutorProvider, EnvironmentReadiness, ExecutorProvider, ReadinessCheck,
    ReadinessError, ScriptedStrategy, ScriptedStrategyProvider, Strategy, StrategyProvider,
};
pub use state::{RunMode, RunState, RunStatus};
