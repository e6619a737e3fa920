//! TestProject entity model.

use serde::Serialize;
use sqlx::FromRow;
use testbed_core::types::DbId;

/// A row from the `"TestProjects"` table.
///
/// Serialized with the table's column names (`Id`, `Name`).
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct TestProject {
    #[sqlx(rename = "Id")]
    #[serde(rename = "Id")]
    pub id: DbId,
    /// Nullable at this layer; the storage schema decides whether NULL is allowed.
    #[sqlx(rename = "Name")]
    #[serde(rename = "Name")]
    pub name: Option<String>,
}
