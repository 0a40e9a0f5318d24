//! The per-session execution loop.

use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::execution::{ExecutionContext, ExecutionPipeline};
use crate::feed::DataFeed;
use crate::models::Signal;

use super::orchestrator::Registry;
use super::ports::Strategy;
use super::state::RunState;

/// One session's loop: feed polling plus one gated pipeline cycle per tick.
///
/// Cancellation is cooperative; the token is checked at every iteration
/// boundary and while waiting out the poll interval. The loop owns its
/// pipeline and executor exclusively, so sessions never contend.
pub(super) struct SessionLoop {
    pub(super) run_id: String,
    pub(super) symbol: String,
    pub(super) strategy: Box<dyn Strategy>,
    pub(super) feed: Box<dyn DataFeed>,
    pub(super) pipeline: ExecutionPipeline,
    pub(super) cancel: CancellationToken,
    pub(super) poll_interval: Duration,
    pub(super) base_size: Decimal,
    pub(super) registry: Registry,
}

impl SessionLoop {
    /// Drive the loop to completion and record the terminal state.
    pub(super) async fn run(mut self) {
        let outcome = self.drive().await;
        let (state, last_error) = match outcome {
            Ok(()) => (RunState::Stopped, None),
            Err(message) => (RunState::Failed, Some(message)),
        };

        {
            let mut registry = self.registry.lock();
            if let Some(entry) = registry.get_mut(&self.run_id) {
                entry.status.state = state;
                entry.status.ended_at = Some(Utc::now());
                entry.status.last_error.clone_from(&last_error);
            }
        }

        match state {
            RunState::Failed => {
                error!(run_id = %self.run_id, error = ?last_error, "session failed");
            }
            _ => info!(run_id = %self.run_id, "session stopped"),
        }
    }

    async fn drive(&mut self) -> Result<(), String> {
        let mut step: u64 = 0;
        let mut prev_signal = Signal::Flat;
        let mut position = Decimal::ZERO;

        loop {
            if self.cancel.is_cancelled() {
                return Ok(());
            }

            let tick = match self.feed.next_tick().await {
                Ok(Some(tick)) => tick,
                Ok(None) => return Ok(()),
                Err(e) => return Err(e.to_string()),
            };

            self.pipeline.observe_price(&tick.symbol, tick.price);
            let signal = self
                .strategy
                .on_tick(&tick)
                .map_or(prev_signal, Signal::from_raw);

            let orders = self
                .pipeline
                .signal_to_orders(&self.symbol, prev_signal, signal, self.base_size, position)
                .map_err(|e| e.to_string())?;

            let ctx = ExecutionContext {
                step,
                symbol: self.symbol.clone(),
                signal: Some(signal),
                pnl_estimate: None,
            };
            let outcome = self.pipeline.execute_with_safety(orders, &ctx).await;
            for result in &outcome.executed {
                position += result.signed_fill_quantity();
            }
            prev_signal = signal;
            step += 1;

            // Wait out the poll interval without sleeping through a stop.
            tokio::select! {
                () = self.cancel.cancelled() => return Ok(()),
                () = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }
}
