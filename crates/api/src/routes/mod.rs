pub mod docs;
pub mod health;
pub mod test_project;

use axum::routing::any;
use axum::Router;

use crate::handlers::status;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /test                                   list, create
/// /test/                                  list, create
/// /test/{id}                              get, update, delete
/// /{*rest}                                not found
/// ```
///
/// Every request reaching this tree, including the catch-all and wrong
/// methods, needs storage configuration. The caller layers the database
/// guard over it after setting the method fallback.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(test_project::router())
        .route("/api/{*rest}", any(status::not_found))
}
