//! Keel Engine Binary
//!
//! Starts the engine, runs one shadow session over a replayed price series
//! and stops everything cooperatively on Ctrl-C.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin keel-engine
//! ```
//!
//! # Environment Variables
//!
//! - `KEEL_CONFIG`: config file path (default: config.yaml, optional)
//! - `KEEL_SYMBOL`: symbol for the demo session (default: BTCUSDT)
//! - `RUST_LOG`: log level (default: info)

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use keel_engine::config::{Config, load_config};
use keel_engine::execution::PaperFillConfig;
use keel_engine::feed::{ScriptedFeedProvider, Tick};
use keel_engine::risk::{LogAlertSink, NullRiskLedger};
use keel_engine::session::{
    DefaultExecutorProvider, SessionOrchestrator, Strategy, StrategyProvider,
};
use keel_engine::telemetry::init_telemetry;

/// Last-price momentum: the sign of the latest price change.
///
/// Stands in for the research layer, which lives outside the core.
struct MomentumStrategy {
    last: Option<Decimal>,
}

impl Strategy for MomentumStrategy {
    fn on_tick(&mut self, tick: &Tick) -> Option<f64> {
        let previous = self.last.replace(tick.price)?;
        if tick.price > previous {
            Some(1.0)
        } else if tick.price < previous {
            Some(-1.0)
        } else {
            Some(0.0)
        }
    }
}

struct MomentumProvider;

impl StrategyProvider for MomentumProvider {
    fn strategy_for(&self, key: &str) -> Option<Box<dyn Strategy>> {
        (key == "momentum").then(|| Box::new(MomentumStrategy { last: None }) as Box<dyn Strategy>)
    }
}

fn load_engine_config() -> anyhow::Result<Config> {
    match std::env::var("KEEL_CONFIG") {
        Ok(path) => load_config(Some(&path)).context("loading config"),
        Err(_) if std::path::Path::new("config.yaml").exists() => {
            load_config(None).context("loading config.yaml")
        }
        Err(_) => Ok(Config::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry();

    let config = load_engine_config()?;
    let symbol = std::env::var("KEEL_SYMBOL").unwrap_or_else(|_| "BTCUSDT".to_string());
    info!(environment = %config.environment.environment, %symbol, "starting keel engine");

    // Replayed demo series; real deployments wire a live feed provider here.
    let prices = vec![
        dec!(100), dec!(101), dec!(103), dec!(102), dec!(104), dec!(106), dec!(105),
        dec!(103), dec!(101), dec!(102), dec!(104), dec!(107), dec!(106), dec!(108),
    ];

    let executors = Arc::new(DefaultExecutorProvider::new(
        config.environment.clone(),
        PaperFillConfig {
            fee_bps: dec!(1),
            slippage_bps: Some(dec!(2)),
        },
    ));
    let orchestrator = SessionOrchestrator::new(
        config,
        executors,
        Arc::new(ScriptedFeedProvider::new(prices)),
        Arc::new(MomentumProvider),
        Arc::new(NullRiskLedger),
    )
    .with_alert_sink(Arc::new(LogAlertSink));

    let run_id = orchestrator
        .start_shadow_run("momentum", &symbol, "1m", Some("demo session".to_string()))
        .await?;

    // Run until the replay completes or the operator interrupts.
    loop {
        if orchestrator.get_status(&run_id)?.state.is_terminal() {
            break;
        }
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, stopping all sessions");
                orchestrator.stop_all();
                break;
            }
            () = tokio::time::sleep(Duration::from_millis(200)) => {}
        }
    }

    // Cooperative shutdown: poll until the loop has actually exited.
    while !orchestrator.get_status(&run_id)?.state.is_terminal() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let status = orchestrator.get_status(&run_id)?;
    info!(
        run_id = %status.run_id,
        state = %status.state,
        "session finished"
    );
    for event in orchestrator.tail_events(&run_id, 5)? {
        info!(
            event = %serde_json::to_string(&event).unwrap_or_default(),
            "tail event"
        );
    }

    Ok(())
}
