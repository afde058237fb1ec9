//! Persistence layer for sales history and the active model profile.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (HTTP handlers, training jobs)       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Auto-selection and training profile resolution       │
//! │  - Sample data seeding                                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                        │
//! │  - SalesRepository / ProfileRepository                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                 │
//! ┌───▼──────────────┐     ┌──────────▼──────────────┐
//! │ SQLite (Diesel)  │     │ Local Repository        │
//! │ sqlite-repo      │     │ (in-memory)             │
//! └──────────────────┘     └─────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use demand_forecast::db::{services, RepositoryFactory};
//!
//! let repo = RepositoryFactory::from_env().await?;
//! let history = services::get_sales_history(repo.as_ref()).await?;
//! ```

// Feature flag priority: sqlite > local
#[cfg(not(any(feature = "sqlite-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod config;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

#[cfg(test)]
#[path = "services_tests.rs"]
mod services_tests;

pub use config::SqliteConfig;
#[cfg(feature = "sqlite-repo")]
pub use repositories::{PoolStats, SqliteRepository};

pub use services::{
    auto_select_profile, get_active_profile, get_sales_history, health_check,
    replace_sales_history, resolve_training_profile, save_active_profile,
    seed_sample_data_if_empty,
};

pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
pub use repository::{
    ErrorContext, FullRepository, ProfileRepository, RepositoryError, RepositoryResult,
    SalesRepository,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

#[cfg(feature = "sqlite-repo")]
fn create_selected_repository() -> RepositoryResult<Arc<dyn FullRepository>> {
    if RepositoryType::from_env() == RepositoryType::Local {
        return Ok(RepositoryFactory::create_local());
    }
    let config = SqliteConfig::from_env().map_err(RepositoryError::configuration)?;
    let repo = SqliteRepository::new(config)?;
    Ok(Arc::new(repo) as Arc<dyn FullRepository>)
}

#[cfg(not(feature = "sqlite-repo"))]
fn create_selected_repository() -> RepositoryResult<Arc<dyn FullRepository>> {
    Ok(RepositoryFactory::create_local())
}

/// Initialize the global repository singleton for the selected backend.
///
/// Opening SQLite runs migrations synchronously; call this before entering
/// hot async paths.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = create_selected_repository().context("Failed to initialize repository")?;
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if REPOSITORY.get().is_none() {
        init_repository()?;
    }

    REPOSITORY
        .get()
        .context("Database not initialized. Call init_repository() first.")
}
