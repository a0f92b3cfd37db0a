use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use todos_db::StoreTimeouts;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Which document store backs the todo collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo {
        uri: String,
        db_name: String,
        collection: String,
    },
    /// Process-local storage; contents are lost on restart.
    Memory,
}

/// Document store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Budget for list and ping calls, in seconds (default: `10`).
    pub read_timeout_secs: u64,
    /// Budget for insert, update and delete calls, in seconds (default: `5`).
    pub write_timeout_secs: u64,
    /// Budget for the startup connection check, in seconds (default: `10`).
    pub connect_timeout_secs: u64,
}

impl StoreConfig {
    pub fn timeouts(&self) -> StoreTimeouts {
        StoreTimeouts {
            read: Duration::from_secs(self.read_timeout_secs),
            write: Duration::from_secs(self.write_timeout_secs),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the MongoDB URI have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `9000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Time allowed for in-flight requests to drain on shutdown (default: `5`).
    pub shutdown_timeout_secs: u64,
    /// Directory holding the home page and static assets (default: `static`).
    pub static_dir: PathBuf,
    pub store: StoreConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                  |
    /// |------------------------------|--------------------------|
    /// | `HOST`                       | `0.0.0.0`                |
    /// | `PORT`                       | `9000`                   |
    /// | `CORS_ORIGINS`               | `http://localhost:9000`  |
    /// | `REQUEST_TIMEOUT_SECS`       | `60`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS`      | `5`                      |
    /// | `STATIC_DIR`                 | `static`                 |
    /// | `STORE_BACKEND`              | `mongo` (or `memory`)    |
    /// | `MONGODB_URI`                | required for `mongo`     |
    /// | `DB_NAME`                    | `todos`                  |
    /// | `TODO_COLLECTION`            | `todos`                  |
    /// | `STORE_READ_TIMEOUT_SECS`    | `10`                     |
    /// | `STORE_WRITE_TIMEOUT_SECS`   | `5`                      |
    /// | `STORE_CONNECT_TIMEOUT_SECS` | `10`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");
        let port = parse("PORT", &var("PORT", "9000"), "a valid port number")?;

        let cors_origins = var("CORS_ORIGINS", "http://localhost:9000")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    expected: "a comma-separated list of origins",
                    value: origin.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let request_timeout_secs = parse(
            "REQUEST_TIMEOUT_SECS",
            &var("REQUEST_TIMEOUT_SECS", "60"),
            "a whole number of seconds",
        )?;
        let shutdown_timeout_secs = parse(
            "SHUTDOWN_TIMEOUT_SECS",
            &var("SHUTDOWN_TIMEOUT_SECS", "5"),
            "a whole number of seconds",
        )?;
        let static_dir = PathBuf::from(var("STATIC_DIR", "static"));

        let backend = match var("STORE_BACKEND", "mongo").as_str() {
            "mongo" => StoreBackend::Mongo {
                uri: lookup("MONGODB_URI").ok_or(ConfigError::Missing("MONGODB_URI"))?,
                db_name: var("DB_NAME", "todos"),
                collection: var("TODO_COLLECTION", "todos"),
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    var: "STORE_BACKEND",
                    expected: "`mongo` or `memory`",
                    value: other.to_string(),
                })
            }
        };

        let store = StoreConfig {
            backend,
            read_timeout_secs: parse(
                "STORE_READ_TIMEOUT_SECS",
                &var("STORE_READ_TIMEOUT_SECS", "10"),
                "a whole number of seconds",
            )?,
            write_timeout_secs: parse(
                "STORE_WRITE_TIMEOUT_SECS",
                &var("STORE_WRITE_TIMEOUT_SECS", "5"),
                "a whole number of seconds",
            )?,
            connect_timeout_secs: parse(
                "STORE_CONNECT_TIMEOUT_SECS",
                &var("STORE_CONNECT_TIMEOUT_SECS", "10"),
                "a whole number of seconds",
            )?,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            static_dir,
            store,
        })
    }
}

fn parse<T: FromStr>(
    var: &'static str,
    value: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        var,
        expected,
        value: value.to_string(),
    })
}
