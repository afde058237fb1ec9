use serde::{Deserialize, Serialize};

use super::settings::ProfileDto;
use crate::services::training::TrainingResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingResponse {
    pub success: bool,
    pub accuracy: f64,
    pub used_params: ProfileDto,
    pub auto_mode: bool,
    pub epoch_losses: Vec<f64>,
}

impl TrainingResponse {
    pub fn from_result(result: &TrainingResult, auto_mode: bool) -> Self {
        Self {
            success: true,
            accuracy: result.accuracy_pct,
            used_params: ProfileDto::from(&result.used_params),
            auto_mode,
            epoch_losses: result.epoch_losses.clone(),
        }
    }
}

/// Accepted background training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingJobResponse {
    pub job_id: String,
    pub message: String,
}

pub const POST_TRAIN: &str = "/api/train";
pub const POST_TRAIN_JOB: &str = "/api/train/jobs";
pub const GET_JOB_STATUS: &str = "/api/jobs/{job_id}";
pub const GET_JOB_LOGS: &str = "/api/jobs/{job_id}/logs";

/// Path a client polls for a job's log stream.
pub fn job_logs_path(job_id: &str) -> String {
    GET_JOB_LOGS.replace("{job_id}", job_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HyperparameterProfile;

    #[test]
    fn test_training_response_json_shape() {
        let result = TrainingResult {
            accuracy_pct: 91.5,
            used_params: HyperparameterProfile::default(),
            epoch_losses: vec![1.0, 0.55],
        };
        let json = serde_json::to_value(TrainingResponse::from_result(&result, true)).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["accuracy"], 91.5);
        assert_eq!(json["autoMode"], true);
        assert_eq!(json["usedParams"]["modelType"], "lstm");
        assert_eq!(json["epochLosses"][1], 0.55);
    }

    #[test]
    fn test_job_logs_path() {
        assert_eq!(job_logs_path("abc"), "/api/jobs/abc/logs");
    }
}
