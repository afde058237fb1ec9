//! High-level database service layer.
//!
//! Repository-agnostic operations shared by the HTTP handlers, the background
//! training jobs and the server bootstrap. Logging and the rules that tie the
//! stored history to the active profile live here rather than in each
//! backend.
//!
//! ```no_run
//! use demand_forecast::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let history = services::get_sales_history(&repo).await?;
//!     println!("{} observations", history.len());
//!     Ok(())
//! }
//! ```

use chrono::NaiveDate;
use log::{debug, info};
use rand::Rng;

use super::repository::{FullRepository, RepositoryResult};
use crate::models::{HyperparameterProfile, Observation};
use crate::services::parameter_selector::select_profile;
use crate::services::sample_data::generate_sample_history;

// ==================== Health & Connection ====================

pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Sales History ====================

/// All stored observations, date ascending.
pub async fn get_sales_history<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<Observation>> {
    let history = repo.load_history().await?;
    debug!("Loaded {} observations", history.len());
    Ok(history)
}

/// Replace the stored history with freshly imported rows.
pub async fn replace_sales_history<R: FullRepository + ?Sized>(
    repo: &R,
    rows: &[Observation],
) -> RepositoryResult<usize> {
    let written = repo.save_history(rows).await?;
    match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => info!(
            "Stored {} observations ({} .. {})",
            written, first.date, last.date
        ),
        _ => info!("Cleared sales history"),
    }
    Ok(written)
}

/// Fill an empty store with `days` of generated history ending at `end`.
///
/// Returns the number of rows written, 0 when the store already had data.
pub async fn seed_sample_data_if_empty<R, G>(
    repo: &R,
    end: NaiveDate,
    days: usize,
    rng: &mut G,
) -> RepositoryResult<usize>
where
    R: FullRepository + ?Sized,
    G: Rng + ?Sized,
{
    let existing = repo.count_observations().await?;
    if existing > 0 {
        debug!("Store already holds {} observations; not seeding", existing);
        return Ok(0);
    }

    let rows = generate_sample_history(end, days, rng);
    let written = repo.save_history(&rows).await?;
    info!("Seeded {} days of sample sales data ending {}", written, end);
    Ok(written)
}

// ==================== Profiles ====================

pub async fn get_active_profile<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<HyperparameterProfile> {
    repo.load_active_profile().await
}

/// Replace the active profile.
pub async fn save_active_profile<R: FullRepository + ?Sized>(
    repo: &R,
    profile: &HyperparameterProfile,
) -> RepositoryResult<()> {
    repo.save_profile(profile).await?;
    info!(
        "Active profile set to {} ({} layers x {} units, {} epochs, batch {}, auto={})",
        profile.model_family,
        profile.hidden_layers,
        profile.hidden_units,
        profile.epochs,
        profile.batch_size,
        profile.auto_selected
    );
    Ok(())
}

/// Size a profile from the stored history length and make it active.
pub async fn auto_select_profile<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<HyperparameterProfile> {
    let data_size = repo.count_observations().await?;
    let profile = select_profile(data_size);
    info!(
        "Auto-selected {} for {} observations",
        profile.model_family, data_size
    );
    save_active_profile(repo, &profile).await?;
    Ok(profile)
}

/// Profile a training run should use.
///
/// In auto mode the profile is re-derived from the data size and persisted;
/// the epoch and batch overrides are ignored. Otherwise the active profile is
/// used with the overrides applied for this run only.
pub async fn resolve_training_profile<R: FullRepository + ?Sized>(
    repo: &R,
    auto_mode: bool,
    epochs: Option<u32>,
    batch_size: Option<u32>,
) -> RepositoryResult<HyperparameterProfile> {
    if auto_mode {
        return auto_select_profile(repo).await;
    }
    let active = repo.load_active_profile().await?;
    Ok(active.with_training_overrides(epochs, batch_size))
}
