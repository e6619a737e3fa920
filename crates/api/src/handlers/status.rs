//! Service status handlers. None of these touch storage.

use axum::Json;
use serde::Serialize;

use crate::error::AppError;

/// Payload of `GET /`.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub swagger: &'static str,
    pub api: &'static str,
}

/// Payload of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Backend API is running",
        status: "ok",
        swagger: "/swagger",
        api: "/api/test",
    })
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "Backend API",
    })
}

/// Fallback for unmatched paths and methods.
pub async fn not_found() -> AppError {
    AppError::RouteNotFound
}
