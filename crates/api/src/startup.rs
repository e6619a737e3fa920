//! Server startup and startup failure reporting.
//!
//! Anything that stops the server from serving is a [`StartupFailure`]. The
//! binary logs it, sends one [`ErrorReport`] marked as a startup failure to
//! the telemetry endpoint (waiting for the exchange, bounded by the client
//! timeout) and exits with status 1.

use std::future::Future;
use std::net::{IpAddr, SocketAddr};

use testbed_core::board::BoardIdSources;
use testbed_core::report::{ErrorReport, FailureDetails};
use testbed_events::{ErrorReportSink, TelemetryError};

use crate::config::{ConfigError, ServerConfig};
use crate::error::Origin;
use crate::router::build_app_router;
use crate::state::AppState;

/// Reasons the server can fail to start or stop serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid HOST address '{0}'")]
    InvalidHost(String),

    #[error("Failed to create telemetry client: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("Failed to open error log file '{path}': {source}")]
    LogFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

impl StartupError {
    /// Failure classification used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            StartupError::Config(_) | StartupError::InvalidHost(_) => "ConfigurationError",
            StartupError::Telemetry(_) => "TelemetryError",
            StartupError::LogFile { .. } => "LogFileError",
            StartupError::Bind { .. } => "BindError",
            StartupError::Serve(_) => "ServerError",
        }
    }
}

/// A [`StartupError`] plus where it was raised.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct StartupFailure {
    pub error: StartupError,
    pub origin: Origin,
}

impl StartupFailure {
    #[track_caller]
    pub fn new(error: StartupError) -> Self {
        Self {
            error,
            origin: Origin::capture(),
        }
    }

    pub fn details(&self) -> FailureDetails {
        FailureDetails {
            kind: self.error.kind().to_string(),
            message: self.error.to_string(),
            file: self.origin.location.file().to_string(),
            line: self.origin.location.line(),
            stack_trace: self.origin.stack_trace(),
        }
    }
}

impl From<ConfigError> for StartupFailure {
    #[track_caller]
    fn from(e: ConfigError) -> Self {
        Self::new(StartupError::Config(e))
    }
}

impl From<TelemetryError> for StartupFailure {
    #[track_caller]
    fn from(e: TelemetryError) -> Self {
        Self::new(StartupError::Telemetry(e))
    }
}

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn serve<F>(config: ServerConfig, shutdown: F) -> Result<(), StartupFailure>
where
    F: Future<Output = ()> + Send + 'static,
{
    let ip: IpAddr = config
        .host
        .parse()
        .map_err(|_| StartupFailure::new(StartupError::InvalidHost(config.host.clone())))?;
    let addr = SocketAddr::new(ip, config.port);

    let state = AppState::new(config)?;
    if state.telemetry.is_none() {
        tracing::warn!("RUNTIME_ERROR_ENDPOINT_URL is not set - error reporting disabled");
    }
    if state.config.database_url.is_none() {
        tracing::warn!("DATABASE_URL is not set - /api requests will fail");
    }

    let app = build_app_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupFailure::new(StartupError::Bind { addr, source }))?;
    tracing::info!(%addr, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| StartupFailure::new(StartupError::Serve(e)))?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Send a startup failure report if a telemetry endpoint is configured.
///
/// Configuration may be what failed, so the endpoint and board id are read
/// through `lookup` rather than from a [`ServerConfig`]. Returns whether the
/// report reached the endpoint.
pub async fn report_startup_failure(
    failure: &StartupFailure,
    lookup: impl Fn(&str) -> Option<String>,
) -> bool {
    let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

    let Some(url) = var("RUNTIME_ERROR_ENDPOINT_URL") else {
        tracing::warn!("RUNTIME_ERROR_ENDPOINT_URL is not set - skipping startup error reporting");
        return false;
    };

    let env_board_id = var("BOARD_ID");
    let board_id = BoardIdSources {
        env: env_board_id.as_deref(),
        endpoint_url: Some(url.as_str()),
        ..Default::default()
    }
    .resolve();

    let report = ErrorReport::startup(board_id, failure.details());

    let sink = match ErrorReportSink::new(url) {
        Ok(sink) => sink,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create telemetry client");
            return false;
        }
    };

    match sink.send(&report).await {
        Ok(()) => {
            tracing::info!(url = %sink.url(), "Startup error report sent");
            true
        }
        Err(e) => {
            tracing::error!(url = %sink.url(), error = %e, "Failed to send startup error report");
            false
        }
    }
}
