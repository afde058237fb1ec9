//! Repository implementations module.
//!
//! - `local`: In-memory implementation for tests and local development
//! - `sqlite`: SQLite implementation with Diesel ORM
pub mod local;
#[cfg(feature = "sqlite-repo")]
pub mod sqlite;

pub use local::LocalRepository;
#[cfg(feature = "sqlite-repo")]
pub use sqlite::{PoolStats, SqliteRepository};
