//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly and need no server.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use testbed_api::error::{
    AppError, FaultRecord, Severity, DATABASE_URL_MISSING_MESSAGE, FAULT_ERROR_MESSAGE,
};
use testbed_core::connection::ConnectionStringError;
use testbed_core::error::CoreError;

/// Helper: convert an `AppError` into its status, fault record and JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, Option<FaultRecord>, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let fault = response.extensions().get::<FaultRecord>().cloned();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, fault, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::from(CoreError::NotFound {
        entity: "Project",
        id: 42,
    });

    let (status, fault, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(fault.is_none());
    assert_eq!(json, serde_json::json!({ "error": "Project not found" }));
}

#[tokio::test]
async fn out_of_range_id_reads_as_not_found() {
    let err = AppError::from(CoreError::IdOutOfRange {
        entity: "Project",
        raw: "99999999999".into(),
    });

    let (status, _, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Project not found");
}

#[tokio::test]
async fn route_not_found_returns_generic_404() {
    let (status, fault, json) = error_to_response(AppError::RouteNotFound).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(fault.is_none());
    assert_eq!(json, serde_json::json!({ "error": "Not found" }));
}

#[tokio::test]
async fn missing_database_url_is_a_plain_500() {
    let (status, fault, json) = error_to_response(AppError::DatabaseUrlMissing).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(fault.is_none());
    assert_eq!(json, serde_json::json!({ "error": DATABASE_URL_MISSING_MESSAGE }));
}

#[tokio::test]
async fn runtime_fault_hides_stack_trace() {
    let (status, fault, json) = error_to_response(AppError::from(CoreError::DivisionByZero)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], FAULT_ERROR_MESSAGE);
    assert_eq!(json["message"], "Division by zero");
    assert_eq!(json.as_object().unwrap().len(), 2);

    let fault = fault.expect("fault record in extensions");
    assert_eq!(fault.kind, "DivisionByZeroError");
    assert_eq!(fault.severity, Severity::Recoverable);
    assert!(fault.reportable);
    assert!(fault.file.ends_with("error_handling.rs"));
}

#[tokio::test]
async fn malformed_connection_string_is_an_unreported_fault() {
    let err = AppError::from(ConnectionStringError::InvalidFormat);

    let (status, fault, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], FAULT_ERROR_MESSAGE);
    assert_eq!(json["message"], "Invalid DATABASE_URL format");
    assert!(!fault.unwrap().reportable);
}

#[tokio::test]
async fn storage_error_is_a_reported_fault() {
    let err = AppError::from(sqlx::Error::PoolTimedOut);

    let (status, fault, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], FAULT_ERROR_MESSAGE);
    let fault = fault.unwrap();
    assert_eq!(fault.kind, "DatabaseError");
    assert!(fault.reportable);
}
