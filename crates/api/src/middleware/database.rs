//! Storage access guard and per-request connection extractor.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use sqlx::PgConnection;
use testbed_core::connection::{self, ConnectionParameters};

use crate::error::AppError;
use crate::state::AppState;

/// Resolve connection parameters before any `/api/*` handler runs.
///
/// Fails fast with the missing-`DATABASE_URL` error before any connection
/// is attempted. On success the parameters are stored in the request
/// extensions for [`DbConn`].
pub async fn require_database(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(url) = state.config.database_url.as_deref() else {
        return AppError::DatabaseUrlMissing.into_response();
    };

    match connection::resolve(url) {
        Ok(params) => {
            request.extensions_mut().insert(params);
            next.run(request).await
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// A storage connection opened for this request only.
///
/// Dropped (and thereby closed) when the handler returns.
pub struct DbConn(pub PgConnection);

impl FromRequestParts<AppState> for DbConn {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let params = parts
            .extensions
            .get::<ConnectionParameters>()
            .ok_or(AppError::DatabaseUrlMissing)?;

        let conn = testbed_db::connect(params).await?;
        Ok(DbConn(conn))
    }
}
