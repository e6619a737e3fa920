//! Per-request PostgreSQL access for the TestProjects service.
//!
//! There is no pool: every request that touches storage opens its own
//! connection from freshly resolved [`ConnectionParameters`] and closes it
//! when done.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{ConnectOptions, Connection, PgConnection};
use testbed_core::connection::ConnectionParameters;

pub mod models;
pub mod repositories;

/// Search path applied before every repository operation. Isolated roles may
/// start with a restricted default scope.
pub const SEARCH_PATH_SQL: &str = r#"SET search_path = public, "$user""#;

/// Build driver connect options from resolved parameters.
///
/// Fails with [`sqlx::Error::Configuration`] when the TLS mode is not one the
/// driver understands.
pub fn connect_options(params: &ConnectionParameters) -> Result<PgConnectOptions, sqlx::Error> {
    let ssl_mode = PgSslMode::from_str(&params.tls_mode)?;

    Ok(PgConnectOptions::new()
        .host(&params.host)
        .port(params.port)
        .database(&params.database)
        .username(&params.username)
        .password(&params.password)
        .ssl_mode(ssl_mode))
}

/// Open a single connection.
///
/// Connection failures are logged with everything but the password and then
/// returned unchanged.
pub async fn connect(params: &ConnectionParameters) -> Result<PgConnection, sqlx::Error> {
    let options = connect_options(params)?;

    options.connect().await.inspect_err(|e| {
        tracing::error!(
            host = %params.host,
            port = params.port,
            database = %params.database,
            user = %params.username,
            error = %e,
            "Database connection failed",
        );
    })
}

/// Close a connection, logging rather than failing if the goodbye fails.
pub async fn disconnect(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        tracing::debug!(error = %e, "Error while closing database connection");
    }
}

/// Point the connection's default namespace at `public`.
pub async fn set_search_path(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    sqlx::query(SEARCH_PATH_SQL).execute(&mut *conn).await?;
    Ok(())
}
