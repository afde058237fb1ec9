//! Public API surface for the forecasting backend.
//!
//! Re-exports the wire types served over HTTP so clients and tests can depend
//! on one module. All types derive Serialize/Deserialize with camelCase keys.

pub use crate::routes::forecast::ForecastResponse;
pub use crate::routes::history::{ImportResponse, SalesDataResponse, SalesRecord};
pub use crate::routes::settings::{ProfileDto, SaveSettingsResponse, SettingsResponse};
pub use crate::routes::training::{TrainingJobResponse, TrainingResponse};

pub use crate::models::{HyperparameterProfile, ModelFamily, Observation};
pub use crate::services::csv_import::SkippedRow;
pub use crate::services::job_tracker::{JobStatus, LogEntry, LogLevel};
