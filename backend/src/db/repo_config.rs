//! Repository configuration file support.
//!
//! Reads `repository.toml`:
//!
//! ```toml
//! [repository]
//! type = "sqlite"
//!
//! [sqlite]
//! database_url = "sales_data.db"
//! max_connections = 4
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::config::SqliteConfig;
use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub sqlite: SqliteSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
    /// Seed the store with generated history when it is empty.
    #[serde(default)]
    pub seed_sample_data: Option<bool>,
}

/// SQLite connection settings. Missing keys take [`SqliteConfig::default`]
/// values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for SqliteSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
            busy_timeout_ms: default_busy_timeout_ms(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_database_url() -> String {
    SqliteConfig::default().database_url
}

fn default_max_connections() -> u32 {
    SqliteConfig::default().max_pool_size
}

fn default_connect_timeout() -> u64 {
    SqliteConfig::default().connection_timeout_sec
}

fn default_busy_timeout_ms() -> u64 {
    SqliteConfig::default().busy_timeout_ms
}

fn default_max_retries() -> u32 {
    SqliteConfig::default().max_retries
}

fn default_retry_delay_ms() -> u64 {
    SqliteConfig::default().retry_delay_ms
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load repository configuration from the default location.
    ///
    /// Searches for `repository.toml` in the current directory, `backend/`
    /// and the parent directory, in that order. `Ok(None)` when no file
    /// exists; a file that exists but does not parse is an error.
    pub fn from_default_location() -> Result<Option<Self>, RepositoryError> {
        Self::discover(&[
            PathBuf::from("repository.toml"),
            PathBuf::from("backend/repository.toml"),
            PathBuf::from("../repository.toml"),
        ])
    }

    /// Load the first of `search_paths` that exists.
    pub fn discover(search_paths: &[PathBuf]) -> Result<Option<Self>, RepositoryError> {
        match search_paths.iter().find(|path| path.exists()) {
            Some(path) => {
                log::info!("Loading repository configuration from {}", path.display());
                Self::from_file(path).map(Some)
            }
            None => Ok(None),
        }
    }

    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// SQLite settings when this configuration selects SQLite, `None` otherwise.
    pub fn to_sqlite_config(&self) -> Result<Option<SqliteConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type != RepositoryType::Sqlite {
            return Ok(None);
        }

        if self.sqlite.database_url.trim().is_empty() {
            return Err(RepositoryError::configuration(
                "SQLite repository requires 'sqlite.database_url' setting",
            ));
        }

        Ok(Some(SqliteConfig {
            database_url: self.sqlite.database_url.clone(),
            max_pool_size: self.sqlite.max_connections,
            connection_timeout_sec: self.sqlite.connect_timeout,
            busy_timeout_ms: self.sqlite.busy_timeout_ms,
            max_retries: self.sqlite.max_retries,
            retry_delay_ms: self.sqlite.retry_delay_ms,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_config() {
        let toml = r#"
[repository]
type = "local"
"#;

        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert_eq!(config.repository.seed_sample_data, None);
        assert!(config.to_sqlite_config().unwrap().is_none());
    }

    #[test]
    fn test_parse_sqlite_config() {
        let toml = r#"
[repository]
type = "sqlite"
seed_sample_data = false

[sqlite]
database_url = "/var/lib/forecast/sales.db"
max_connections = 8
connect_timeout = 15
busy_timeout_ms = 1000
max_retries = 5
retry_delay_ms = 250
"#;

        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Sqlite);
        assert_eq!(config.repository.seed_sample_data, Some(false));

        let sqlite = config.to_sqlite_config().unwrap().unwrap();
        assert_eq!(sqlite.database_url, "/var/lib/forecast/sales.db");
        assert_eq!(sqlite.max_pool_size, 8);
        assert_eq!(sqlite.connection_timeout_sec, 15);
        assert_eq!(sqlite.busy_timeout_ms, 1000);
        assert_eq!(sqlite.max_retries, 5);
        assert_eq!(sqlite.retry_delay_ms, 250);
    }

    #[test]
    fn test_sqlite_section_defaults() {
        let config = RepositoryConfig::from_toml_str("[repository]\ntype = \"sqlite\"\n").unwrap();
        let sqlite = config.to_sqlite_config().unwrap().unwrap();
        assert_eq!(sqlite, SqliteConfig::default());
    }

    #[test]
    fn test_sqlite_requires_database_url() {
        let toml = r#"
[repository]
type = "sqlite"

[sqlite]
database_url = ""
"#;

        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        assert!(config.to_sqlite_config().is_err());
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let err = RepositoryConfig::from_toml_str("[repository").unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }

    #[test]
    fn test_from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repository.toml");
        std::fs::write(&path, "[repository]\ntype = \"local\"\n").unwrap();

        let config = RepositoryConfig::from_file(&path).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert!(RepositoryConfig::from_file(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_discover_without_files_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let found = RepositoryConfig::discover(&[dir.path().join("repository.toml")]).unwrap();
        assert!(found.is_none());
    }
}
