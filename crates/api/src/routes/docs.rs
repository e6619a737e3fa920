use axum::routing::get;
use axum::Router;

use crate::handlers::docs;
use crate::state::AppState;

/// Documentation routes.
///
/// ```text
/// GET    /swagger                           -> swagger_ui
/// GET    /swagger.json                      -> openapi
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/swagger", get(docs::swagger_ui))
        .route("/swagger.json", get(docs::openapi))
}
