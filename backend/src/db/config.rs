//! Database connection settings read from the environment.
//!
//! Environment variables:
//! - `DATABASE_URL` or `SQLITE_PATH`: Database file (default: `sales_data.db`)
//! - `SQLITE_POOL_MAX`: Maximum pool size (default: 4)
//! - `SQLITE_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `SQLITE_BUSY_TIMEOUT_MS`: SQLite busy timeout in milliseconds (default: 5000)
//! - `SQLITE_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `SQLITE_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

pub const DEFAULT_DATABASE_PATH: &str = "sales_data.db";
const IN_MEMORY: &str = ":memory:";

/// Configuration for connecting to SQLite.
#[derive(Debug, Clone, PartialEq)]
pub struct SqliteConfig {
    /// Database file path or `:memory:`
    pub database_url: String,
    pub max_pool_size: u32,
    pub connection_timeout_sec: u64,
    /// How long SQLite waits on a locked database before failing a statement
    pub busy_timeout_ms: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_PATH.to_string(),
            max_pool_size: 4,
            connection_timeout_sec: 30,
            busy_timeout_ms: 5000,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl SqliteConfig {
    /// Create configuration from environment variables.
    ///
    /// Unset or unparseable values fall back to [`SqliteConfig::default`].
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("SQLITE_PATH"))
            .unwrap_or(defaults.database_url);
        let database_url = database_url
            .strip_prefix("sqlite://")
            .map(str::to_string)
            .unwrap_or(database_url);
        if database_url.trim().is_empty() {
            return Err("DATABASE_URL / SQLITE_PATH must not be empty".to_string());
        }

        Ok(Self {
            database_url,
            max_pool_size: env_or("SQLITE_POOL_MAX", defaults.max_pool_size),
            connection_timeout_sec: env_or(
                "SQLITE_CONN_TIMEOUT_SEC",
                defaults.connection_timeout_sec,
            ),
            busy_timeout_ms: env_or("SQLITE_BUSY_TIMEOUT_MS", defaults.busy_timeout_ms),
            max_retries: env_or("SQLITE_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("SQLITE_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    pub fn with_path(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// In-memory databases live and die with a single connection.
    pub fn is_in_memory(&self) -> bool {
        self.database_url == IN_MEMORY
    }
}
