//! Repository trait for historical sales observations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::Observation;

/// Storage of the sales series the forecast runs on.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait SalesRepository: Send + Sync {
    /// Check if the database connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// All stored observations, ordered by date ascending.
    async fn load_history(&self) -> RepositoryResult<Vec<Observation>>;

    /// Replace the stored series with `rows`.
    ///
    /// The replacement is atomic: on error the previous series is left intact.
    /// Returns the number of rows written.
    async fn save_history(&self, rows: &[Observation]) -> RepositoryResult<usize>;

    /// Number of stored observations.
    async fn count_observations(&self) -> RepositoryResult<usize>;
}
