//! Request bodies and HTTP-only responses.
//!
//! Response payloads shared with jobs and tests live in [`crate::routes`] and
//! are re-exported here.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    ForecastResponse, ImportResponse, ProfileDto, SalesDataResponse, SaveSettingsResponse,
    SettingsResponse, TrainingJobResponse, TrainingResponse,
};
use crate::models::{HyperparameterProfile, ModelFamily};
use crate::services::error::{bounded_count, positive_count, EngineResult, ForecastError};
use crate::services::training::TrainingLimits;
use crate::services::training_job::TrainingRequest;

/// Body of `POST /api/predict`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    /// Days to forecast; the configured default when omitted
    #[serde(default)]
    pub period: Option<i64>,
}

/// Body of `POST /api/train` and `POST /api/train/jobs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainRequest {
    #[serde(default)]
    pub epochs: Option<i64>,
    #[serde(default)]
    pub batch_size: Option<i64>,
    #[serde(default)]
    pub auto_mode: bool,
}

impl TrainRequest {
    /// Validate the overrides. They are checked even in auto mode, where they
    /// are otherwise ignored.
    pub fn validate(&self, limits: TrainingLimits) -> EngineResult<TrainingRequest> {
        Ok(TrainingRequest {
            epochs: self
                .epochs
                .map(|v| bounded_count("epochs", v, limits.max_epochs))
                .transpose()?,
            batch_size: self
                .batch_size
                .map(|v| bounded_count("batchSize", v, limits.max_batch_size))
                .transpose()?,
            auto_mode: self.auto_mode,
        })
    }
}

/// Body of `POST /api/settings/save`. Omitted fields keep the active values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSettingsRequest {
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub hidden_layers: Option<i64>,
    #[serde(default)]
    pub hidden_units: Option<i64>,
    #[serde(default)]
    pub epochs: Option<i64>,
    #[serde(default)]
    pub batch_size: Option<i64>,
    #[serde(default)]
    pub auto_mode: bool,
}

impl SaveSettingsRequest {
    /// Merge the request over `active` into a manually chosen profile.
    pub fn apply_to(
        &self,
        active: &HyperparameterProfile,
        limits: TrainingLimits,
    ) -> EngineResult<HyperparameterProfile> {
        let model_family = match &self.model_type {
            Some(name) => name
                .parse::<ModelFamily>()
                .map_err(ForecastError::invalid_configuration)?,
            None => active.model_family,
        };
        let pick = |name: &str, value: Option<i64>, current: u32| -> EngineResult<u32> {
            value.map_or(Ok(current), |v| positive_count(name, v))
        };
        let profile = HyperparameterProfile {
            model_family,
            hidden_layers: pick("hiddenLayers", self.hidden_layers, active.hidden_layers)?,
            hidden_units: pick("hiddenUnits", self.hidden_units, active.hidden_units)?,
            epochs: self.epochs.map_or(Ok(active.epochs), |v| {
                bounded_count("epochs", v, limits.max_epochs)
            })?,
            batch_size: self.batch_size.map_or(Ok(active.batch_size), |v| {
                bounded_count("batchSize", v, limits.max_batch_size)
            })?,
            auto_selected: false,
        };
        profile.validate()?;
        Ok(profile)
    }
}

/// Body of `POST /api/data/import`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    #[serde(default)]
    pub csv_content: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Crate version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Connectivity check used by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResponse {
    pub message: String,
    pub status: String,
}

/// Job status response for background training.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: String,
    pub progress: Option<crate::services::job_tracker::JobProgress>,
    pub logs: Vec<crate::services::job_tracker::LogEntry>,
    /// Training response body once completed
    pub result: Option<serde_json::Value>,
}
