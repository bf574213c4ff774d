//! Telemetry Server - Binary Entry Point
//!
//! Runs the ingestion pipeline with a periodic drain tick and serves the
//! WebSocket and REST endpoints.

use std::sync::Arc;

use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use sim_telemetry::api::{create_router, AppState};
use sim_telemetry::logging::{init_logging, LogFormat};
use sim_telemetry::{ServerConfig, TelemetryResult, NAME, VERSION};

#[tokio::main]
async fn main() -> TelemetryResult<()> {
    init_logging(LogFormat::from_env());

    let config = ServerConfig::from_env()?;
    let state = Arc::new(AppState::from_config(&config));

    let pipeline = state.pipeline.clone();
    let tick_interval = config.pipeline.tick_interval;
    let ticker = tokio::spawn(async move {
        let mut timer = interval(tick_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            timer.tick().await;
            pipeline.guarded_tick();
        }
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        name = NAME,
        version = VERSION,
        addr = %config.bind_addr,
        tick_ms = tick_interval.as_millis() as u64,
        "telemetry server listening"
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ticker.abort();
    info!("telemetry server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
