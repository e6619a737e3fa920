use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use testbed_api::config::{ConfigError, ServerConfig};
use testbed_api::startup::{self, StartupError, StartupFailure};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();

    // --- Tracing ---
    let error_log = config.as_ref().ok().and_then(|c| c.error_log_file.clone());
    let tracing_result = init_tracing(error_log.as_deref());

    match run(config, tracing_result).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            tracing::error!(
                kind = failure.error.kind(),
                file = failure.origin.location.file(),
                line = failure.origin.location.line(),
                error = %failure,
                "Server failed to start",
            );
            startup::report_startup_failure(&failure, |name| std::env::var(name).ok()).await;
            ExitCode::FAILURE
        }
    }
}

async fn run(
    config: Result<ServerConfig, ConfigError>,
    tracing_result: Result<(), StartupFailure>,
) -> Result<(), StartupFailure> {
    tracing_result?;
    let config = config?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    startup::serve(config, shutdown_signal()).await
}

/// Install the global subscriber.
///
/// Always logs to stdout. With an error log path, warnings and errors are
/// also appended to that file. If the file cannot be opened the stdout
/// subscriber is still installed before the failure is returned.
fn init_tracing(error_log: Option<&str>) -> Result<(), StartupFailure> {
    let mut failure = None;
    let file_layer = error_log.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .with_filter(LevelFilter::WARN),
            ),
            Err(source) => {
                failure = Some(StartupFailure::new(StartupError::LogFile {
                    path: path.to_string(),
                    source,
                }));
                None
            }
        }
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "testbed_api=debug,testbed_db=debug,testbed_events=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    match failure {
        Some(failure) => Err(failure),
        None => Ok(()),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
