//! Shared application router builder.
//!
//! Provides [`build_app_router`] so both the production binary (`main.rs`)
//! and integration tests (`tests/common/mod.rs`) use the exact same middleware
//! stack.

use axum::http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers::status;
use crate::middleware::database::require_database;
use crate::middleware::fault::fault_boundary;
use crate::middleware::method::reject_head;
use crate::middleware::panic::{install_panic_hook, post_mortem};
use crate::middleware::timeout::request_timeout;
use crate::routes;
use crate::state::AppState;

/// Methods advertised to browsers.
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Request headers advertised to browsers.
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Build the full application [`Router`] with all middleware layers.
pub fn build_app_router(state: AppState) -> Router {
    let api = routes::api_routes()
        .method_not_allowed_fallback(status::not_found)
        .layer(from_fn_with_state(state.clone(), require_database));

    let routes = Router::new()
        .merge(routes::health::router())
        .merge(routes::docs::router())
        .merge(api);

    with_middleware(routes, state)
}

/// Wrap an arbitrary route tree in the production middleware stack.
///
/// The middleware stack is applied bottom-up:
///
/// 1. CORS
/// 2. CORS method/header advertisement on every response
/// 3. Set request ID on incoming requests
/// 4. Structured request/response tracing
/// 5. Propagate request ID to response
/// 6. Fault boundary (log and report faults)
/// 7. Request timeout (overrun becomes a fault)
/// 8. Panic post-mortem (catch panics, return fatal 500)
///
/// HEAD on a matched route is answered with the generic 404.
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    install_panic_hook();

    let request_id_header = HeaderName::from_static("x-request-id");

    routes
        .route_layer(from_fn(reject_head))
        .fallback(status::not_found)
        .method_not_allowed_fallback(status::not_found)
        // -- Middleware stack (applied bottom-up) --
        .layer(CatchPanicLayer::custom(post_mortem))
        .layer(from_fn_with_state(state.clone(), request_timeout))
        .layer(from_fn_with_state(state.clone(), fault_boundary))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(build_cors_layer())
        .with_state(state)
}

/// Any origin may call the API; OPTIONS on any path is answered here.
pub fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
}
