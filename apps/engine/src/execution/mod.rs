//! Execution pipeline and order dispatch.
//!
//! The pipeline converts signal transitions into orders, wraps them with
//! the safety guard and risk limiter when wired, and dispatches through the
//! [`OrderExecutor`] port.

mod events;
mod executor;
mod pipeline;

pub use events::{LoggingError, MemoryRunLogger, RunEvent, RunLogger};
pub use executor::{
    OrderExecutor, PaperExecutor, PaperFillConfig, ShadowExecutor, TestnetExecutor,
};
pub use pipeline::{
    ExecutionContext, ExecutionPipeline, ExecutionSummary, PricePoint, SafeExecutionOutcome,
};
