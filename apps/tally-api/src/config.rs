//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                   | Default      |
//! |----------------------------|--------------|
//! | `TALLY_HTTP_PORT`          | `8080`       |
//! | `TALLY_DATABASE_PATH`      | `./tally.db` |
//! | `TALLY_DB_MAX_CONNECTIONS` | `5`          |
//! | `TALLY_ADMIN_TOKEN`        | unset        |
//! | `TALLY_SALES_PAGE_LIMIT`   | `100`        |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Connection pool size
    pub db_max_connections: u32,

    /// Bearer token for catalog mutations. None refuses all mutations.
    pub admin_token: Option<String>,

    /// Default page size for sales history
    pub sales_page_limit: u32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_port: parse_or(&lookup, "TALLY_HTTP_PORT", 8080)?,

            database_path: lookup("TALLY_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./tally.db")),

            db_max_connections: parse_or(&lookup, "TALLY_DB_MAX_CONNECTIONS", 5)?,

            admin_token: lookup("TALLY_ADMIN_TOKEN").filter(|t| !t.trim().is_empty()),

            sales_page_limit: parse_or(&lookup, "TALLY_SALES_PAGE_LIMIT", 100)?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("TALLY_DB_MAX_CONNECTIONS".to_string()));
        }
        if config.sales_page_limit == 0 {
            return Err(ConfigError::InvalidValue("TALLY_SALES_PAGE_LIMIT".to_string()));
        }

        Ok(config)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            http_port: 8080,
            database_path: PathBuf::from("./tally.db"),
            db_max_connections: 5,
            admin_token: None,
            sales_page_limit: 100,
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
