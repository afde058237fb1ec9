//! Forecasting engine and job orchestration.
//!
//! The engine modules are pure functions over in-memory data; randomness is
//! always passed in so callers decide between seeded and entropy sources.
//! [`training_job`] ties the engine to the repository and the job tracker.

pub mod csv_import;
pub mod error;
pub mod forecast;
pub mod job_tracker;
pub mod parameter_selector;
pub mod sample_data;
pub mod training;
pub mod training_job;


pub use csv_import::{parse_sales_csv, CsvImport, SkippedRow};
pub use error::{EngineResult, ForecastError};
pub use forecast::{forecast, forecast_with_params, ForecastParams, ForecastResult};
pub use job_tracker::{Job, JobStatus, JobTracker, LogEntry, LogLevel};
pub use parameter_selector::select_profile;
pub use sample_data::generate_sample_history;
pub use training::{simulate_training, TrainingOptions, TrainingResult};
pub use training_job::{run_training_job, TrainingRequest};
