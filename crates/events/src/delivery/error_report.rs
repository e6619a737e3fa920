//! Error report delivery to the runtime telemetry endpoint.
//!
//! [`ErrorReportSink`] posts a JSON-encoded [`ErrorReport`] to a configured
//! URL. Delivery is a single attempt bounded by [`TELEMETRY_TIMEOUT`]; the
//! response body and status are ignored and failures are only logged.

use std::time::Duration;

use testbed_core::report::ErrorReport;
use tokio::task::JoinHandle;

/// Upper bound for a single delivery attempt.
pub const TELEMETRY_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for telemetry delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

// ---------------------------------------------------------------------------
// ErrorReportSink
// ---------------------------------------------------------------------------

/// Delivers error reports to one telemetry endpoint.
#[derive(Debug, Clone)]
pub struct ErrorReportSink {
    client: reqwest::Client,
    url: String,
}

impl ErrorReportSink {
    /// Create a sink for `url` with a pre-configured HTTP client.
    pub fn new(url: impl Into<String>) -> Result<Self, TelemetryError> {
        let client = reqwest::Client::builder()
            .timeout(TELEMETRY_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// The endpoint reports are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Post one report and wait for the exchange to finish.
    ///
    /// Any HTTP status counts as delivered.
    pub async fn send(&self, report: &ErrorReport) -> Result<(), TelemetryError> {
        self.client.post(&self.url).json(report).send().await?;
        Ok(())
    }

    /// Post one report in the background.
    ///
    /// The returned handle may be dropped; the outcome is only logged.
    pub fn spawn(&self, report: ErrorReport) -> JoinHandle<()> {
        let sink = self.clone();
        tokio::spawn(async move {
            match sink.send(&report).await {
                Ok(()) => tracing::debug!(url = %sink.url, "Error report delivered"),
                Err(e) => tracing::debug!(url = %sink.url, error = %e, "Error report delivery failed"),
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
