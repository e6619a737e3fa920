//! Connection string resolution.
//!
//! Turns a single URL-form connection string
//! (`scheme://[user[:pass]@]host[:port]/database[?sslmode=...]`) into the
//! discrete parameters needed to open a PostgreSQL connection. Resolution is
//! a pure function of its input and is performed fresh for every request that
//! touches storage.

use std::borrow::Cow;
use std::fmt;

use url::Url;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_DATABASE: &str = "postgres";
pub const DEFAULT_USERNAME: &str = "postgres";

/// Hosted databases require encryption, so TLS is on unless the URL says otherwise.
pub const DEFAULT_TLS_MODE: &str = "require";

/// Query parameter on the source URL that overrides [`DEFAULT_TLS_MODE`].
pub const TLS_MODE_PARAM: &str = "sslmode";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionStringError {
    /// The value could not be parsed as a URL at all.
    #[error("Invalid DATABASE_URL format")]
    InvalidFormat,

    /// A percent-encoded component did not decode to UTF-8.
    #[error("Invalid DATABASE_URL format: {component} is not valid UTF-8 after decoding")]
    InvalidEncoding { component: &'static str },
}

// ---------------------------------------------------------------------------
// ConnectionParameters
// ---------------------------------------------------------------------------

/// Resolved connection parameters. Never mutated after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParameters {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub tls_mode: String,
}

impl fmt::Debug for ConnectionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParameters")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("tls_mode", &self.tls_mode)
            .finish()
    }
}

/// Resolve a connection string into [`ConnectionParameters`].
///
/// Absent components fall back to the `DEFAULT_*` constants. The database
/// name (path without its leading `/`), username and password are
/// percent-decoded independently; an empty database name becomes
/// [`DEFAULT_DATABASE`].
pub fn resolve(connection_string: &str) -> Result<ConnectionParameters, ConnectionStringError> {
    let url = Url::parse(connection_string).map_err(|_| ConnectionStringError::InvalidFormat)?;

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .unwrap_or(DEFAULT_HOST)
        .to_string();

    let port = url.port().unwrap_or(DEFAULT_PORT);

    let database = decode(url.path().trim_start_matches('/'), "database")?;
    let database = if database.is_empty() {
        DEFAULT_DATABASE.to_string()
    } else {
        database
    };

    let username = match url.username() {
        "" => DEFAULT_USERNAME.to_string(),
        raw => decode(raw, "username")?,
    };

    let password = match url.password() {
        Some(raw) => decode(raw, "password")?,
        None => String::new(),
    };

    // Later occurrences win, like a flat query-string map.
    let tls_mode = url
        .query_pairs()
        .filter(|(key, value)| key == TLS_MODE_PARAM && !value.is_empty())
        .map(|(_, value)| value.into_owned())
        .last()
        .unwrap_or_else(|| DEFAULT_TLS_MODE.to_string());

    Ok(ConnectionParameters {
        host,
        port,
        database,
        username,
        password,
        tls_mode,
    })
}

fn decode(raw: &str, component: &'static str) -> Result<String, ConnectionStringError> {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .map_err(|_| ConnectionStringError::InvalidEncoding { component })
}
