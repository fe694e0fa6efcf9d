//! Signal handling for graceful shutdown and config reload.

use crate::config::ConfigLoader;
use hatch_core::config::SharedConfig;
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::Notify;

/// Completes when SIGTERM or SIGINT (Ctrl+C) is received.
///
/// If a handler cannot be installed the other one still works; if neither
/// can, this never completes and the process has to be killed.
pub async fn shutdown_signal() {
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = interrupt => {
            tracing::info!("Received SIGINT, initiating graceful shutdown");
        }
    }
}

/// Spawns a task that listens for SIGHUP and reloads the configuration.
///
/// Every reloadable section is pushed into its config store, which wakes
/// the processors watching it. The listen address and CORS origins only
/// apply at startup.
///
/// Returns a Notify that stops the task.
pub fn spawn_config_reload_handler(
    config: SharedConfig,
    config_loader: Arc<ConfigLoader>,
) -> Arc<Notify> {
    let shutdown_notify = Arc::new(Notify::new());
    let shutdown_notify_clone = shutdown_notify.clone();

    tokio::spawn(async move {
        let mut sighup = match signal(SignalKind::hangup()) {
            Ok(sighup) => sighup,
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGHUP handler, config reload disabled");
                return;
            }
        };

        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    tracing::info!("Received SIGHUP, reloading configuration");
                    let loader = config_loader.clone();
                    // Reading the file and hashing secrets is blocking work.
                    match tokio::task::spawn_blocking(move || loader.reload()).await {
                        Ok(Ok(loaded_config)) => {
                            loaded_config.apply_to(&config);
                            tracing::info!("Configuration reloaded successfully");
                        }
                        Ok(Err(e)) => {
                            tracing::error!("Failed to reload configuration: {}", e);
                        }
                        Err(e) => {
                            tracing::error!("Configuration reload task failed: {}", e);
                        }
                    }
                }
                _ = shutdown_notify_clone.notified() => {
                    tracing::debug!("Config reload handler shutting down");
                    break;
                }
            }
        }
    });

    shutdown_notify
}
