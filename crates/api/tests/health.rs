//! Integration tests for the status endpoints and general HTTP behaviour.
//!
//! None of these touch storage.

mod common;

use axum::http::StatusCode;
use common::{body_bytes, body_json, get, head, options, test_config};
use testbed_api::config::ServerConfig;

// ---------------------------------------------------------------------------
// Status endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn root_describes_the_service() {
    let app = common::build_test_app(test_config());
    let response = get(app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Backend API is running");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["swagger"], "/swagger");
    assert_eq!(json["api"], "/api/test");
}

#[tokio::test]
async fn health_check_returns_healthy() {
    let app = common::build_test_app(test_config());
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "Backend API");
}

#[tokio::test]
async fn swagger_ui_is_html() {
    let app = common::build_test_app(test_config());
    let response = get(app, "/swagger").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/html"), "got {content_type}");
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("swagger-ui"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = common::build_test_app(test_config());
    let response = get(app, "/swagger.json").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["openapi"], "3.0.0");
    assert_eq!(json["info"]["version"], "1.0.0");
    assert!(json["paths"]["/api/test/{id}"]["put"].is_object());
}

// ---------------------------------------------------------------------------
// Unmatched routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app(test_config());
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Not found");
}

#[tokio::test]
async fn wrong_method_on_public_route_returns_404() {
    let app = common::build_test_app(test_config());
    let response = common::delete(app, "/health").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Not found");
}

#[tokio::test]
async fn head_is_not_served_by_get_routes() {
    for uri in ["/", "/health", "/swagger", "/swagger.json"] {
        let app = common::build_test_app(test_config());
        let response = head(app, uri).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response.headers()["access-control-allow-origin"], "*", "{uri}");
    }
}

#[tokio::test]
async fn head_on_api_route_never_touches_storage() {
    let (url, received) = common::start_receiver().await;
    let config = ServerConfig {
        database_url: Some(common::UNREACHABLE_DATABASE_URL.into()),
        telemetry_url: Some(url),
        ..test_config()
    };

    for uri in ["/api/test", "/api/test/1"] {
        let app = common::build_test_app(config.clone());
        let response = head(app, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    assert!(common::wait_for_reports(&received, 0).await.is_empty());
}

// ---------------------------------------------------------------------------
// CORS and request ids
// ---------------------------------------------------------------------------

#[tokio::test]
async fn options_on_any_path_is_acknowledged() {
    for uri in ["/", "/api/test", "/api/test/42", "/nowhere"] {
        let app = common::build_test_app(test_config());
        let response = options(app, uri).await;

        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert!(body_bytes(response).await.is_empty(), "{uri}");
    }
}

#[tokio::test]
async fn preflight_advertises_methods_and_headers() {
    let app = common::build_test_app(test_config());
    let response = options(app, "/api/test").await;

    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
        assert!(methods.contains(method), "missing {method} in {methods}");
    }
    let allowed = headers["access-control-allow-headers"].to_str().unwrap();
    assert!(allowed.eq_ignore_ascii_case("content-type"), "got {allowed}");
}

#[tokio::test]
async fn every_response_carries_cors_headers() {
    for uri in ["/health", "/nowhere", "/api/test"] {
        let app = common::build_test_app(test_config());
        let response = get(app, uri).await;

        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*", "{uri}");
        assert!(headers.contains_key("access-control-allow-methods"), "{uri}");
        assert!(headers.contains_key("access-control-allow-headers"), "{uri}");
    }
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app(test_config());
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
