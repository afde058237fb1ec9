//! Repository trait definitions for the data store.
//!
//! Sales history and the active model profile are independent concerns, so
//! each has its own trait. [`FullRepository`] is the bound handlers and
//! services actually hold.
//!
//! - [`error`]: Error types for repository operations
//! - [`sales`]: Historical sales observations
//! - [`profile`]: Single-slot storage of the active hyperparameter profile

pub mod error;
pub mod profile;
pub mod sales;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use profile::ProfileRepository;
pub use sales::SalesRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type implementing both traits.
///
/// ```ignore
/// async fn retrain<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
///     let rows = repo.count_observations().await?;
///     repo.save_profile(&select_profile(rows)).await
/// }
/// ```
pub trait FullRepository: SalesRepository + ProfileRepository {}

impl<T> FullRepository for T where T: SalesRepository + ProfileRepository {}
