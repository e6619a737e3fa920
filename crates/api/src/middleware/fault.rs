//! The fault boundary.
//!
//! Wraps the whole request lifecycle. Inner layers never report failures
//! themselves: they answer with a 500 carrying a [`FaultRecord`] in the
//! response extensions. This middleware removes the record, logs it, derives
//! the board id and, when a telemetry sink is configured, hands one
//! [`ErrorReport`] to it without waiting for delivery.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use testbed_core::board::{BoardIdSources, BOARD_ID_HEADER, BOARD_ID_QUERY_PARAM};
use testbed_core::report::{ErrorReport, RequestDetails};

use crate::error::FaultRecord;
use crate::state::AppState;

/// Request facts captured before the request is handed to the router.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Request target including the query string.
    pub target: String,
    pub method: String,
    pub user_agent: Option<String>,
    pub host: Option<String>,
    pub board_id_query: Option<String>,
    pub board_id_header: Option<String>,
}

impl RequestContext {
    pub fn capture(request: &Request) -> Self {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let uri = request.uri();
        let target = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        let board_id_query = uri.query().and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == BOARD_ID_QUERY_PARAM)
                .map(|(_, value)| value.into_owned())
        });

        let host = header("host").or_else(|| uri.host().map(str::to_string));

        Self {
            target,
            method: request.method().to_string(),
            user_agent: header("user-agent"),
            host,
            board_id_query,
            board_id_header: header(BOARD_ID_HEADER),
        }
    }

    /// Best-effort board id for this request.
    pub fn board_id(&self, state: &AppState) -> Option<String> {
        BoardIdSources {
            query: self.board_id_query.as_deref(),
            header: self.board_id_header.as_deref(),
            env: state.config.board_id.as_deref(),
            host: self.host.as_deref(),
            endpoint_url: state.config.telemetry_url.as_deref(),
        }
        .resolve()
    }

    fn details(&self) -> RequestDetails {
        RequestDetails {
            path: self.target.clone(),
            method: self.method.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Middleware that logs and reports the fault carried by a response, if any.
pub async fn fault_boundary(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let context = RequestContext::capture(&request);
    let mut response = next.run(request).await;

    if let Some(fault) = response.extensions_mut().remove::<FaultRecord>() {
        report_fault(&state, &context, &fault);
    }

    response
}

/// Log a fault and, if reportable and a sink is configured, send it.
pub fn report_fault(state: &AppState, context: &RequestContext, fault: &FaultRecord) {
    let board_id = context.board_id(state);

    tracing::error!(
        kind = fault.kind,
        severity = ?fault.severity,
        file = %fault.file,
        line = fault.line,
        method = %context.method,
        path = %context.target,
        board_id = board_id.as_deref().unwrap_or("NULL"),
        error = %fault.message,
        "Unhandled failure",
    );
    if !fault.stack_trace.is_empty() {
        tracing::debug!(stack_trace = %fault.stack_trace, "Failure stack trace");
    }

    if !fault.reportable {
        return;
    }

    match &state.telemetry {
        Some(sink) => {
            tracing::info!(url = %sink.url(), "Sending error report");
            sink.spawn(ErrorReport::new(board_id, fault.details(), context.details()));
        }
        None => {
            tracing::warn!("RUNTIME_ERROR_ENDPOINT_URL is not set - skipping error reporting");
        }
    }
}
