//! Repository factory for dependency injection.
//!
//! Creates repository instances from runtime configuration: environment
//! variables, a `repository.toml` file, or explicit builder calls.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::config::SqliteConfig;
use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "sqlite-repo")]
use super::repositories::SqliteRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// SQLite + Diesel implementation
    Sqlite,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Without it, SQLite is chosen when a database
    /// path is configured and the `sqlite-repo` feature is enabled, otherwise
    /// Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or_else(|e| {
                log::warn!("{}; falling back to local repository", e);
                Self::Local
            });
        }

        let has_path = std::env::var("DATABASE_URL").is_ok() || std::env::var("SQLITE_PATH").is_ok();
        if has_path && cfg!(feature = "sqlite-repo") {
            Self::Sqlite
        } else {
            Self::Local
        }
    }
}

fn sqlite_disabled() -> RepositoryError {
    RepositoryError::configuration("SQLite repository feature not enabled")
}

/// Repository factory for creating repository instances.
///
/// ```ignore
/// use demand_forecast::db::{RepositoryFactory, RepositoryType, SqliteConfig};
///
/// let config = SqliteConfig::from_env()?;
/// let repo = RepositoryFactory::create(RepositoryType::Sqlite, Some(&config)).await?;
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// `sqlite_config` is required for [`RepositoryType::Sqlite`].
    pub async fn create(
        repo_type: RepositoryType,
        sqlite_config: Option<&SqliteConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Sqlite => {
                let config = sqlite_config.ok_or_else(|| {
                    RepositoryError::configuration("SQLite repository requires SqliteConfig")
                })?;
                Self::create_sqlite_dyn(config).await
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Open a SQLite repository. Migrations run on a blocking thread.
    #[cfg(feature = "sqlite-repo")]
    pub async fn create_sqlite(config: &SqliteConfig) -> RepositoryResult<Arc<SqliteRepository>> {
        let config = config.clone();
        let repo = tokio::task::spawn_blocking(move || SqliteRepository::new(config)).await??;
        Ok(Arc::new(repo))
    }

    #[cfg(feature = "sqlite-repo")]
    async fn create_sqlite_dyn(config: &SqliteConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo = Self::create_sqlite(config).await?;
        Ok(repo as Arc<dyn FullRepository>)
    }

    #[cfg(not(feature = "sqlite-repo"))]
    async fn create_sqlite_dyn(_config: &SqliteConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        Err(sqlite_disabled())
    }

    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    pub async fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        match RepositoryType::from_env() {
            RepositoryType::Sqlite => {
                let config = SqliteConfig::from_env().map_err(RepositoryError::configuration)?;
                Self::create_sqlite_dyn(&config).await
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create repository from a TOML configuration file.
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_config(&config).await
    }

    /// Create repository from an already parsed configuration.
    pub async fn from_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match config.to_sqlite_config()? {
            Some(sqlite) => Self::create_sqlite_dyn(&sqlite).await,
            None => Ok(Self::create_local()),
        }
    }
}

/// Builder for configuring repository creation.
///
/// ```ignore
/// let repo = RepositoryBuilder::new()
///     .repository_type(RepositoryType::Sqlite)
///     .sqlite_config(SqliteConfig::with_path("sales.db"))
///     .build()
///     .await?;
/// ```
pub struct RepositoryBuilder {
    repo_type: RepositoryType,
    sqlite_config: Option<SqliteConfig>,
}

impl RepositoryBuilder {
    /// Defaults follow [`RepositoryType::from_env`].
    pub fn new() -> Self {
        Self {
            repo_type: RepositoryType::from_env(),
            sqlite_config: None,
        }
    }

    pub fn repository_type(mut self, repo_type: RepositoryType) -> Self {
        self.repo_type = repo_type;
        self
    }

    pub fn sqlite_config(mut self, config: SqliteConfig) -> Self {
        self.sqlite_config = Some(config);
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Result<Self, RepositoryError> {
        self.repo_type = RepositoryType::from_env();
        if self.repo_type == RepositoryType::Sqlite {
            if !cfg!(feature = "sqlite-repo") {
                return Err(sqlite_disabled());
            }
            self.sqlite_config =
                Some(SqliteConfig::from_env().map_err(RepositoryError::configuration)?);
        }
        Ok(self)
    }

    /// Load configuration from a TOML file.
    pub fn from_config_file<P: AsRef<Path>>(
        mut self,
        config_path: P,
    ) -> Result<Self, RepositoryError> {
        let repo_config = RepositoryConfig::from_file(config_path)?;
        self.repo_type = repo_config
            .repository_type()
            .map_err(RepositoryError::configuration)?;
        self.sqlite_config = repo_config.to_sqlite_config()?;
        Ok(self)
    }

    pub async fn build(self) -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryFactory::create(self.repo_type, self.sqlite_config.as_ref()).await
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_type_from_str() {
        assert_eq!(
            RepositoryType::from_str("local").unwrap(),
            RepositoryType::Local
        );
        assert_eq!(
            RepositoryType::from_str("sqlite").unwrap(),
            RepositoryType::Sqlite
        );
        assert_eq!(
            RepositoryType::from_str(" SQLite3 ").unwrap(),
            RepositoryType::Sqlite
        );
        assert!(RepositoryType::from_str("postgres").is_err());
    }

    #[tokio::test]
    async fn test_create_local_repository() {
        let repo = RepositoryFactory::create_local();
        assert!(repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_builder_local_repository() {
        let repo = RepositoryBuilder::new()
            .repository_type(RepositoryType::Local)
            .build()
            .await
            .unwrap();

        assert!(repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_sqlite_without_config_is_rejected() {
        let result = RepositoryFactory::create(RepositoryType::Sqlite, None).await;
        assert!(matches!(
            result,
            Err(RepositoryError::ConfigurationError { .. })
        ));
    }

    #[cfg(not(feature = "sqlite-repo"))]
    #[tokio::test]
    async fn test_sqlite_requires_feature() {
        let config = SqliteConfig::with_path(":memory:");
        let result = RepositoryFactory::create(RepositoryType::Sqlite, Some(&config)).await;
        assert!(result.is_err());
    }

    #[cfg(feature = "sqlite-repo")]
    #[tokio::test]
    async fn test_builder_sqlite_in_memory() {
        let repo = RepositoryBuilder::new()
            .repository_type(RepositoryType::Sqlite)
            .sqlite_config(SqliteConfig::with_path(":memory:"))
            .build()
            .await
            .unwrap();

        assert!(repo.health_check().await.unwrap());
        assert_eq!(repo.count_observations().await.unwrap(), 0);
    }
}
