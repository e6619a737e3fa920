use std::sync::Arc;

use testbed_events::{ErrorReportSink, TelemetryError};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable and read-only after startup. There is no
/// database pool: storage connections are opened per request.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Error report delivery, present when a telemetry URL is configured.
    pub telemetry: Option<ErrorReportSink>,
}

impl AppState {
    /// Build state from configuration, creating the telemetry sink if configured.
    pub fn new(config: ServerConfig) -> Result<Self, TelemetryError> {
        let telemetry = config
            .telemetry_url
            .as_deref()
            .map(|url| ErrorReportSink::new(url))
            .transpose()?;

        Ok(Self {
            config: Arc::new(config),
            telemetry,
        })
    }
}
