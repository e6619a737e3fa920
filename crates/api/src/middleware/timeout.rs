//! Request deadline.
//!
//! A request still running after `REQUEST_TIMEOUT_SECS` is abandoned and
//! answered with a `TimeoutError` fault, so it is logged and reported like
//! any other failure.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::{AppError, Origin};
use crate::state::AppState;

pub async fn request_timeout(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let seconds = state.config.request_timeout_secs;

    match tokio::time::timeout(Duration::from_secs(seconds), next.run(request)).await {
        Ok(response) => response,
        Err(_) => AppError::Timeout {
            seconds,
            origin: Origin::capture(),
        }
        .into_response(),
    }
}
