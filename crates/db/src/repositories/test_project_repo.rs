//! Repository for the `"TestProjects"` table.
//!
//! Every operation sets the search path on the given connection first.
//! Storage errors are returned unchanged so the caller's fault boundary can
//! classify and report them.

use sqlx::PgConnection;
use testbed_core::types::DbId;

use crate::models::test_project::TestProject;
use crate::set_search_path;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = r#""Id", "Name""#;

/// Provides CRUD operations for test projects.
pub struct TestProjectRepo;

impl TestProjectRepo {
    /// List every project ordered by ascending id.
    pub async fn list_all(conn: &mut PgConnection) -> Result<Vec<TestProject>, sqlx::Error> {
        set_search_path(conn).await?;
        let query = format!(r#"SELECT {COLUMNS} FROM "TestProjects" ORDER BY "Id""#);
        sqlx::query_as::<_, TestProject>(&query)
            .fetch_all(&mut *conn)
            .await
    }

    /// Find a project by id.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<TestProject>, sqlx::Error> {
        set_search_path(conn).await?;
        let query = format!(r#"SELECT {COLUMNS} FROM "TestProjects" WHERE "Id" = $1"#);
        sqlx::query_as::<_, TestProject>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Insert a project, returning the stored row with its assigned id.
    ///
    /// `name` is forwarded as-is; `None` binds `NULL` and the table's own
    /// constraints decide whether that is accepted.
    pub async fn create(
        conn: &mut PgConnection,
        name: Option<&str>,
    ) -> Result<TestProject, sqlx::Error> {
        set_search_path(conn).await?;
        let query = format!(r#"INSERT INTO "TestProjects" ("Name") VALUES ($1) RETURNING {COLUMNS}"#);
        sqlx::query_as::<_, TestProject>(&query)
            .bind(name)
            .fetch_one(&mut *conn)
            .await
    }

    /// Replace a project's name. Never inserts.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        name: Option<&str>,
    ) -> Result<Option<TestProject>, sqlx::Error> {
        set_search_path(conn).await?;
        let query =
            format!(r#"UPDATE "TestProjects" SET "Name" = $2 WHERE "Id" = $1 RETURNING {COLUMNS}"#);
        sqlx::query_as::<_, TestProject>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Delete a project by id. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        set_search_path(conn).await?;
        let result = sqlx::query(r#"DELETE FROM "TestProjects" WHERE "Id" = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
