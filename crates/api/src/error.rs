use std::backtrace::{Backtrace, BacktraceStatus};
use std::panic::Location;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use testbed_core::connection::ConnectionStringError;
use testbed_core::error::CoreError;
use testbed_core::report::FailureDetails;

use crate::body::BodyError;

/// `error` field of every fault response.
pub const FAULT_ERROR_MESSAGE: &str = "An error occurred while processing your request";

/// `error` field of the response produced after a panic.
pub const FATAL_ERROR_MESSAGE: &str = "A fatal error occurred";

/// Generic not-found message for unmatched routes.
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Not found";

/// Returned for every `/api/*` request when no connection string is configured.
pub const DATABASE_URL_MISSING_MESSAGE: &str = "DATABASE_URL environment variable not set";

// ---------------------------------------------------------------------------
// Origin
// ---------------------------------------------------------------------------

/// Where a failure was turned into an [`AppError`].
///
/// Captured by the `#[track_caller]` conversions below, so a `?` in a handler
/// records the handler's own file and line.
#[derive(Debug, Clone)]
pub struct Origin {
    pub location: &'static Location<'static>,
    /// Only faults carry a backtrace; client conditions never render one.
    pub backtrace: Option<Arc<Backtrace>>,
}

impl Origin {
    /// Caller location plus a full backtrace.
    #[track_caller]
    pub fn capture() -> Self {
        Self {
            location: Location::caller(),
            backtrace: Some(Arc::new(Backtrace::force_capture())),
        }
    }

    /// Caller location only.
    #[track_caller]
    pub fn locate() -> Self {
        Self {
            location: Location::caller(),
            backtrace: None,
        }
    }

    /// Rendered backtrace, or an empty string if none was captured.
    pub fn stack_trace(&self) -> String {
        match &self.backtrace {
            Some(backtrace) if backtrace.status() == BacktraceStatus::Captured => {
                backtrace.to_string()
            }
            _ => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Application-level error type for HTTP handlers.
///
/// Client conditions (not found) and the missing-connection-string case map
/// to fixed JSON bodies. Everything else is a fault: it becomes a 500 carrying
/// a [`FaultRecord`] that the fault boundary logs and reports.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `testbed_core`.
    #[error("{source}")]
    Core { source: CoreError, origin: Origin },

    /// No route matches the request.
    #[error("Not found")]
    RouteNotFound,

    /// `DATABASE_URL` is not set.
    #[error("DATABASE_URL environment variable not set")]
    DatabaseUrlMissing,

    /// `DATABASE_URL` is set but unusable.
    #[error("{source}")]
    ConnectionString {
        source: ConnectionStringError,
        origin: Origin,
    },

    /// A database error from sqlx, including connection failures.
    #[error("{source}")]
    Database { source: sqlx::Error, origin: Origin },

    /// The request body could not be decoded.
    #[error("{source}")]
    Body { source: BodyError, origin: Origin },

    /// The request did not finish within `REQUEST_TIMEOUT_SECS`.
    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64, origin: Origin },
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<CoreError> for AppError {
    #[track_caller]
    fn from(source: CoreError) -> Self {
        let origin = match source {
            CoreError::NotFound { .. } | CoreError::IdOutOfRange { .. } => Origin::locate(),
            CoreError::DivisionByZero => Origin::capture(),
        };
        AppError::Core { source, origin }
    }
}

impl From<ConnectionStringError> for AppError {
    #[track_caller]
    fn from(source: ConnectionStringError) -> Self {
        AppError::ConnectionString {
            source,
            origin: Origin::capture(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        AppError::Database {
            source,
            origin: Origin::capture(),
        }
    }
}

impl From<BodyError> for AppError {
    #[track_caller]
    fn from(source: BodyError) -> Self {
        AppError::Body {
            source,
            origin: Origin::capture(),
        }
    }
}

enum Outcome {
    Client(StatusCode, String),
    Fault(FaultRecord),
}

impl AppError {
    fn classify(&self) -> Outcome {
        let (kind, reportable, origin) = match self {
            AppError::Core {
                source: CoreError::NotFound { entity, .. } | CoreError::IdOutOfRange { entity, .. },
                ..
            } => return Outcome::Client(StatusCode::NOT_FOUND, format!("{entity} not found")),
            AppError::RouteNotFound => {
                return Outcome::Client(StatusCode::NOT_FOUND, ROUTE_NOT_FOUND_MESSAGE.into())
            }
            AppError::DatabaseUrlMissing => {
                return Outcome::Client(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    DATABASE_URL_MISSING_MESSAGE.into(),
                )
            }
            AppError::Core {
                source: CoreError::DivisionByZero,
                origin,
            } => ("DivisionByZeroError", true, origin),
            AppError::ConnectionString { origin, .. } => ("ConfigurationError", false, origin),
            AppError::Database { source, origin } => {
                let kind = classify_sqlx_error(source);
                (kind, kind != "ConfigurationError", origin)
            }
            AppError::Body { origin, .. } => ("BodyDecodeError", true, origin),
            AppError::Timeout { origin, .. } => ("TimeoutError", true, origin),
        };

        Outcome::Fault(FaultRecord {
            kind,
            message: self.to_string(),
            file: origin.location.file().to_string(),
            line: origin.location.line(),
            stack_trace: origin.stack_trace(),
            severity: Severity::Recoverable,
            reportable,
        })
    }

    /// The fault this error represents, or `None` for client conditions.
    pub fn fault_record(&self) -> Option<FaultRecord> {
        match self.classify() {
            Outcome::Fault(fault) => Some(fault),
            Outcome::Client(..) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.classify() {
            Outcome::Fault(fault) => fault.into_response(),
            Outcome::Client(status, message) => {
                if status.is_server_error() {
                    tracing::error!(error = %message, "Configuration error");
                }
                (status, axum::Json(json!({ "error": message }))).into_response()
            }
        }
    }
}

/// Classify a sqlx error into a failure kind.
///
/// - `Configuration` (e.g. an unknown TLS mode) is a configuration error.
/// - I/O, TLS and protocol failures mean the server could not be reached.
/// - Everything else came back from the database.
fn classify_sqlx_error(err: &sqlx::Error) -> &'static str {
    match err {
        sqlx::Error::Configuration(_) => "ConfigurationError",
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::Protocol(_) => "ConnectionError",
        _ => "DatabaseError",
    }
}

// ---------------------------------------------------------------------------
// FaultRecord
// ---------------------------------------------------------------------------

/// Whether a fault was caught in normal control flow or after a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Returned as an error value; full context available.
    Recoverable,
    /// Recovered after unwinding; only the panic location is known.
    Fatal,
}

/// A caught failure travelling from the point of failure to the fault boundary
/// inside the response's extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultRecord {
    pub kind: &'static str,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub stack_trace: String,
    pub severity: Severity,
    /// Configuration faults are logged but never sent to telemetry.
    pub reportable: bool,
}

impl FaultRecord {
    pub fn details(&self) -> FailureDetails {
        FailureDetails {
            kind: self.kind.to_string(),
            message: self.message.clone(),
            file: self.file.clone(),
            line: self.line,
            stack_trace: self.stack_trace.clone(),
        }
    }
}

impl IntoResponse for FaultRecord {
    fn into_response(self) -> Response {
        let body = match self.severity {
            Severity::Recoverable => json!({
                "error": FAULT_ERROR_MESSAGE,
                "message": self.message,
            }),
            Severity::Fatal => json!({
                "error": FATAL_ERROR_MESSAGE,
                "message": self.message,
                "file": self.file,
                "line": self.line,
            }),
        };

        let mut response = (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}
