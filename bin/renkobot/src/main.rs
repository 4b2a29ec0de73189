use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use common::{Config, TelemetrySwitch, TelemetryTransport, TransportMode};
use engine::Bot;
use signal::ClassifierContext;
use transport::{IotHubClient, RecordingTransport};
use watcher::CommandRouter;

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    info!(
        symbol = %cfg.symbol_name,
        renkomode = %cfg.renko_chart_mode,
        transport = %cfg.transport_mode,
        "RenkoBot starting"
    );

    // ── Transport (injected based on TRANSPORT_MODE) ──────────────────────────
    let transport: Arc<dyn TelemetryTransport> = match cfg.transport_mode {
        TransportMode::Live => {
            let conn = cfg.connection_string();
            info!(host = %conn.host_name, device = %conn.device_id, "Live mode, using IotHubClient");
            match IotHubClient::new(&conn, Duration::from_secs(cfg.sas_ttl_secs)) {
                Ok(client) => Arc::new(client),
                Err(e) => {
                    error!(error = %e, "Cannot build IoT Hub client");
                    std::process::exit(1);
                }
            }
        }
        TransportMode::DryRun => {
            info!("Dry-run mode, using RecordingTransport");
            Arc::new(RecordingTransport::new())
        }
    };

    // ── Shared state ──────────────────────────────────────────────────────────
    // Telemetry starts disabled; only the watcher turns it on.
    let switch = Arc::new(TelemetrySwitch::new());

    // ── Bot ───────────────────────────────────────────────────────────────────
    let (bot, bot_handle) = Bot::new(ClassifierContext::from_config(&cfg), switch.clone(), transport);

    // ── Direct-method API ─────────────────────────────────────────────────────
    let api_state = api::AppState {
        router: Arc::new(CommandRouter::new(switch)),
        bot: bot_handle,
        symbol_name: cfg.symbol_name.clone(),
        renko_mode: cfg.renko_chart_mode.clone(),
    };

    // ── Spawn all tasks ───────────────────────────────────────────────────────
    let port = cfg.api_port;
    tokio::spawn(bot.run());
    tokio::spawn(async move {
        if let Err(e) = api::serve(api_state, port).await {
            error!(error = %e, port, "API server stopped");
        }
    });

    info!("All subsystems started. Waiting for shutdown signal.");
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received. Exiting.");
}
