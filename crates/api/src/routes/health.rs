use axum::routing::get;
use axum::Router;

use crate::handlers::status;
use crate::state::AppState;

/// Service status routes, mounted at the root and never guarded.
///
/// ```text
/// GET    /                                  -> root
/// GET    /health                            -> health
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(status::root))
        .route("/health", get(status::health))
}
