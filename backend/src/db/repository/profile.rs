//! Repository trait for the active hyperparameter profile.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::HyperparameterProfile;

/// Single-slot profile storage: a save replaces the whole record and a load
/// returns the most recent save.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// The active profile, or [`HyperparameterProfile::default`] if none was
    /// ever saved.
    async fn load_active_profile(&self) -> RepositoryResult<HyperparameterProfile>;

    async fn save_profile(&self, profile: &HyperparameterProfile) -> RepositoryResult<()>;
}
