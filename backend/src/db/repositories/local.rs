//! In-memory local repository implementation.
//!
//! Keeps the sales series and the active profile in process memory. Used as
//! the default backend and by unit and HTTP tests that need isolation and
//! speed.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::{sort_by_date, HyperparameterProfile, Observation};

/// In-memory local repository.
///
/// Clones share the same underlying data.
///
/// ```
/// use demand_forecast::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// assert_eq!(repo.observation_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    history: Vec<Observation>,
    profile: Option<HyperparameterProfile>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            history: Vec::new(),
            profile: None,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with `rows` (sorted by date on insert).
    pub fn with_history(rows: Vec<Observation>) -> Self {
        let repo = Self::new();
        repo.replace_history(rows);
        repo
    }

    fn replace_history(&self, mut rows: Vec<Observation>) -> usize {
        sort_by_date(&mut rows);
        let count = rows.len();
        self.data.write().history = rows;
        count
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    pub fn observation_count(&self) -> usize {
        self.data.read().history.len()
    }

    pub fn has_saved_profile(&self) -> bool {
        self.data.read().profile.is_some()
    }

    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if self.data.read().is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "Local repository marked unhealthy",
                ErrorContext::new(operation),
            ))
        }
    }
}

#[async_trait]
impl SalesRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn load_history(&self) -> RepositoryResult<Vec<Observation>> {
        self.check_health("load_history")?;
        Ok(self.data.read().history.clone())
    }

    async fn save_history(&self, rows: &[Observation]) -> RepositoryResult<usize> {
        self.check_health("save_history")?;
        Ok(self.replace_history(rows.to_vec()))
    }

    async fn count_observations(&self) -> RepositoryResult<usize> {
        self.check_health("count_observations")?;
        Ok(self.observation_count())
    }
}

#[async_trait]
impl ProfileRepository for LocalRepository {
    async fn load_active_profile(&self) -> RepositoryResult<HyperparameterProfile> {
        self.check_health("load_active_profile")?;
        Ok(self.data.read().profile.clone().unwrap_or_default())
    }

    async fn save_profile(&self, profile: &HyperparameterProfile) -> RepositoryResult<()> {
        self.check_health("save_profile")?;
        self.data.write().profile = Some(profile.clone());
        Ok(())
    }
}
