//! Handlers for the `/api/test` resource.

use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use testbed_core::error::CoreError;
use testbed_core::types::DbId;
use testbed_db::models::test_project::TestProject;
use testbed_db::repositories::TestProjectRepo;

use crate::body::ProjectInput;
use crate::error::{AppError, AppResult};
use crate::middleware::database::DbConn;
use crate::state::AppState;

const ENTITY: &str = "Project";

/// The `{id}` path segment.
///
/// Only all-digit segments name a project; anything else is an unknown route.
/// A digit string too large for [`DbId`] is a valid route whose lookup can
/// never succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectId(pub DbId);

impl ProjectId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::RouteNotFound);
        }
        let id = raw.parse::<DbId>().map_err(|_| CoreError::IdOutOfRange {
            entity: ENTITY,
            raw: raw.to_string(),
        })?;
        Ok(Self(id))
    }
}

impl<S> FromRequestParts<S> for ProjectId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::RouteNotFound)?;
        Self::parse(&raw)
    }
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: ENTITY, id }
}

/// Divide by the given value. Listing divides by zero when the fault smoke
/// test is enabled.
fn smoke_test_divide(divisor: i32) -> Result<i32, CoreError> {
    1i32.checked_div(divisor).ok_or(CoreError::DivisionByZero)
}

/// GET /api/test
pub async fn list(
    State(state): State<AppState>,
    DbConn(mut conn): DbConn,
) -> AppResult<Json<Vec<TestProject>>> {
    if state.config.fault_smoke_test {
        smoke_test_divide(0)?;
    }

    let projects = TestProjectRepo::list_all(&mut conn).await?;
    testbed_db::disconnect(conn).await;
    Ok(Json(projects))
}

/// POST /api/test
pub async fn create(
    DbConn(mut conn): DbConn,
    input: ProjectInput,
) -> AppResult<(StatusCode, Json<TestProject>)> {
    let name = input.name()?;
    let project = TestProjectRepo::create(&mut conn, name.as_deref()).await?;
    testbed_db::disconnect(conn).await;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/test/{id}
pub async fn get_by_id(
    ProjectId(id): ProjectId,
    DbConn(mut conn): DbConn,
) -> AppResult<Json<TestProject>> {
    let project = TestProjectRepo::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    testbed_db::disconnect(conn).await;
    Ok(Json(project))
}

/// PUT /api/test/{id}
pub async fn update(
    ProjectId(id): ProjectId,
    DbConn(mut conn): DbConn,
    input: ProjectInput,
) -> AppResult<Json<TestProject>> {
    let name = input.name()?;
    let project = TestProjectRepo::update(&mut conn, id, name.as_deref())
        .await?
        .ok_or_else(|| not_found(id))?;
    testbed_db::disconnect(conn).await;
    Ok(Json(project))
}

/// DELETE /api/test/{id}
pub async fn delete(ProjectId(id): ProjectId, DbConn(mut conn): DbConn) -> AppResult<Json<Value>> {
    let deleted = TestProjectRepo::delete(&mut conn, id).await?;
    testbed_db::disconnect(conn).await;
    if deleted {
        Ok(Json(json!({ "message": "Deleted successfully" })))
    } else {
        Err(AppError::from(not_found(id)))
    }
}
