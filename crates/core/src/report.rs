//! Error report payload delivered to the telemetry sink.

use serde::Serialize;

use crate::types::Timestamp;

/// Placeholder request path/method for failures raised before serving began.
pub const STARTUP_MARKER: &str = "STARTUP";

/// Placeholder user agent for startup failures.
pub const STARTUP_USER_AGENT: &str = "STARTUP_ERROR";

/// A single failure, as posted to `RUNTIME_ERROR_ENDPOINT_URL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub board_id: Option<String>,
    pub timestamp: Timestamp,
    pub file: String,
    pub line: u32,
    pub stack_trace: String,
    pub message: String,
    /// Failure classification, e.g. `DatabaseError` or `Panic`.
    pub exception_type: String,
    pub request_path: String,
    pub request_method: String,
    pub user_agent: Option<String>,
}

/// Where and what failed, independent of any request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetails {
    pub kind: String,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub stack_trace: String,
}

/// The request a failure happened in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDetails {
    pub path: String,
    pub method: String,
    pub user_agent: Option<String>,
}

impl ErrorReport {
    /// Build a report stamped with the current time.
    pub fn new(
        board_id: Option<String>,
        failure: FailureDetails,
        request: RequestDetails,
    ) -> Self {
        Self {
            board_id,
            timestamp: chrono::Utc::now(),
            file: failure.file,
            line: failure.line,
            stack_trace: failure.stack_trace,
            message: failure.message,
            exception_type: failure.kind,
            request_path: request.path,
            request_method: request.method,
            user_agent: request.user_agent,
        }
    }

    /// Build a report for a failure that stopped the server from starting.
    pub fn startup(board_id: Option<String>, failure: FailureDetails) -> Self {
        Self::new(
            board_id,
            failure,
            RequestDetails {
                path: STARTUP_MARKER.to_string(),
                method: STARTUP_MARKER.to_string(),
                user_agent: Some(STARTUP_USER_AGENT.to_string()),
            },
        )
    }
}
