/// Server configuration loaded from environment variables.
///
/// Read once at startup and shared read-only for the life of the process.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Storage connection string. `None` makes every `/api/*` request fail
    /// with a configuration error.
    pub database_url: Option<String>,
    /// Telemetry sink for error reports. `None` disables reporting.
    pub telemetry_url: Option<String>,
    /// Fallback board id used when the request carries none.
    pub board_id: Option<String>,
    /// When set, listing projects raises a division-by-zero fault so the
    /// failure pipeline can be exercised end to end.
    pub fault_smoke_test: bool,
    /// Append-only log receiving warnings and errors.
    pub error_log_file: Option<String>,
}

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default   |
    /// |------------------------------|-----------|
    /// | `HOST`                       | `0.0.0.0` |
    /// | `PORT`                       | `3000`    |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`      |
    /// | `DATABASE_URL`               | unset     |
    /// | `RUNTIME_ERROR_ENDPOINT_URL` | unset     |
    /// | `BOARD_ID`                   | unset     |
    /// | `FAULT_SMOKE_TEST`           | `false`   |
    /// | `ERROR_LOG_FILE`             | unset     |
    ///
    /// Empty values count as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_var(&var, "PORT", "u16", 3000u16)?;
        let request_timeout_secs = parse_var(&var, "REQUEST_TIMEOUT_SECS", "u64", 30u64)?;
        let fault_smoke_test = parse_var(&var, "FAULT_SMOKE_TEST", "bool", false)?;

        Ok(Self {
            host,
            port,
            request_timeout_secs,
            database_url: var("DATABASE_URL"),
            telemetry_url: var("RUNTIME_ERROR_ENDPOINT_URL"),
            board_id: var("BOARD_ID"),
            fault_smoke_test,
            error_log_file: var("ERROR_LOG_FILE"),
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(name) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}
