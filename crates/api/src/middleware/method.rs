use axum::extract::Request;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;

/// Answer HEAD with the generic not-found response.
///
/// GET routes would otherwise serve HEAD implicitly.
pub async fn reject_head(request: Request, next: Next) -> Response {
    if request.method() == Method::HEAD {
        return AppError::RouteNotFound.into_response();
    }
    next.run(request).await
}
