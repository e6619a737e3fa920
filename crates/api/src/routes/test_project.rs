//! Route definitions for the `/api/test` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::test_project;
use crate::state::AppState;

/// Routes for test projects.
///
/// ```text
/// GET    /api/test                          -> list
/// POST   /api/test                          -> create
/// GET    /api/test/{id}                     -> get_by_id
/// PUT    /api/test/{id}                     -> update
/// DELETE /api/test/{id}                     -> delete
/// ```
///
/// The collection routes also answer with a trailing slash.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/test",
            get(test_project::list).post(test_project::create),
        )
        .route(
            "/api/test/",
            get(test_project::list).post(test_project::create),
        )
        .route(
            "/api/test/{id}",
            get(test_project::get_by_id)
                .put(test_project::update)
                .delete(test_project::delete),
        )
}
