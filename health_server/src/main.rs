//! Main entry point for the health monitor server

use anyhow::Result;
use health_monitor::{create_app_with_config, run_server, AppConfig, AppState, HealthMonitor};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.bind_address());
    info!(
        "Check timeout: {}ms, stand-in probe latency: {}ms",
        config.monitor.timeout_ms, config.monitor.probe_latency_ms
    );

    let addr: SocketAddr = config.bind_address().parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    // Built once and shared by every request
    let monitor = Arc::new(HealthMonitor::from_config(&config.monitor));

    let accepted = monitor.register_all(&config.resources);
    if accepted < config.resources.len() {
        warn!(
            "{} of {} configured resources were rejected",
            config.resources.len() - accepted,
            config.resources.len()
        );
    }
    info!("Monitoring {} resources", monitor.resources().len());

    let state = AppState::new(monitor);
    info!("App: {} v{}", state.app_name, state.version);

    let app = create_app_with_config(state, &config);

    run_server(app, addr).await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            let default_level = if cfg!(debug_assertions) {
                "debug"
            } else {
                "info"
            };

            format!(
                "{}={},health_monitor={},tower_http=debug",
                env!("CARGO_CRATE_NAME").replace('-', "_"),
                default_level,
                default_level
            ).into()
        });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}
