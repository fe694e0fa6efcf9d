//! Delivery Hatch analytics relay.
//!
//! Counts QR scans, website clicks and Stripe purchases in memory and sends an
//! hourly summary to Telegram.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::ConfigLoader;
use hatch_core::counters::CounterStore;
use hatch_core::events::purchase_alert_channel;
use hatch_core::notifier::{Notifier, TelegramNotifier};
use hatch_core::processors::{PurchaseAlerter, ReportScheduler, Reporter};
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Delivery Hatch - pre-launch analytics relay
#[derive(Parser, Debug)]
#[command(name = "hatch-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "HATCH_CONFIG", default_value = "./hatch-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting hatch-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let server_config = loaded_config.server.clone();
    tracing::info!(
        timezone = %loaded_config.report.timezone,
        telegram = loaded_config.telegram.credentials().is_some(),
        stripe_signed = loaded_config.stripe.secret_bytes().is_some(),
        "Configuration loaded"
    );
    if loaded_config.telegram.credentials().is_none() {
        tracing::warn!("TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set, reports will only be logged");
    }

    // Convert to shared config with one store per section
    let shared_config = loaded_config.into_shared();

    // Core components
    let counters = Arc::new(CounterStore::new());
    let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(shared_config.telegram.clone()));
    let reporter = Reporter::new(counters.clone(), notifier.clone(), shared_config.report.clone());
    let (alert_tx, alert_rx) = purchase_alert_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Background processors
    let scheduler_handle = tokio::spawn(
        ReportScheduler::new(reporter.clone())
            .run(shutdown_rx.clone(), shared_config.report.subscribe()),
    );
    let alerter_handle = tokio::spawn(
        PurchaseAlerter::new(notifier, shared_config.report.clone()).run(shutdown_rx, alert_rx),
    );

    // Spawn config reload handler (listens for SIGHUP)
    let reload_notify = spawn_config_reload_handler(shared_config.clone(), config_loader);

    // Create application state and build the router
    let state = AppState::new(counters, reporter, shared_config, alert_tx);
    let router = build_router(state, &server_config);

    // Run the server
    tracing::info!("Starting HTTP server on {}", server_config.listen);
    let result = run_server(router, server_config.listen).await;

    // Stop background tasks
    reload_notify.notify_one();
    let _ = shutdown_tx.send(true);
    let _ = tokio::join!(scheduler_handle, alerter_handle);
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
