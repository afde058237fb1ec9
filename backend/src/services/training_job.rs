//! Background training jobs.
//!
//! Runs the training simulator off the request path, reporting each epoch to
//! the job tracker so clients can follow it over SSE.

use rand::rngs::StdRng;
use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::db::services as db_services;
use crate::routes::training::TrainingResponse;
use crate::services::job_tracker::{JobTracker, LogLevel};
use crate::services::training::{simulate_training, TrainingOptions, TrainingResult};

/// Parameters of a training request after validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainingRequest {
    pub epochs: Option<u32>,
    pub batch_size: Option<u32>,
    pub auto_mode: bool,
}

/// Train asynchronously and record the outcome on `job_id`.
///
/// Designed to be spawned as a background task. On success the job result is
/// the same JSON body `POST /api/train` returns.
pub async fn run_training_job(
    job_id: String,
    tracker: JobTracker,
    repo: Arc<dyn FullRepository>,
    request: TrainingRequest,
    options: TrainingOptions,
    mut rng: StdRng,
) -> Result<TrainingResult, String> {
    tracker.log(&job_id, LogLevel::Info, "Starting training run...");

    let profile = match db_services::resolve_training_profile(
        repo.as_ref(),
        request.auto_mode,
        request.epochs,
        request.batch_size,
    )
    .await
    {
        Ok(profile) => {
            let source = if request.auto_mode { "auto-selected" } else { "active" };
            tracker.log(
                &job_id,
                LogLevel::Info,
                format!(
                    "Using {} profile: {} ({} layers x {} units, {} epochs, batch {})",
                    source,
                    profile.model_family,
                    profile.hidden_layers,
                    profile.hidden_units,
                    profile.epochs,
                    profile.batch_size
                ),
            );
            profile
        }
        Err(e) => {
            let msg = format!("Failed to resolve training profile: {}", e);
            tracker.fail_job(&job_id, &msg);
            return Err(msg);
        }
    };

    tracker.set_progress(&job_id, 0, profile.epochs);
    let outcome = tokio::task::spawn_blocking({
        let tracker = tracker.clone();
        let job_id = job_id.clone();
        move || {
            simulate_training(&profile, &options, &mut rng, |progress| {
                tracker.set_progress(&job_id, progress.epoch, progress.total_epochs);
                tracker.log(
                    &job_id,
                    LogLevel::Info,
                    format!(
                        "Epoch {}/{} - loss {:.4}",
                        progress.epoch, progress.total_epochs, progress.loss
                    ),
                );
            })
        }
    })
    .await;

    let result = match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            let msg = format!("Training failed: {}", e);
            tracker.fail_job(&job_id, &msg);
            return Err(msg);
        }
        Err(e) => {
            let msg = format!("Training task panic: {}", e);
            tracker.fail_job(&job_id, &msg);
            return Err(msg);
        }
    };

    tracker.log(
        &job_id,
        LogLevel::Success,
        format!("Training complete: accuracy {:.2}%", result.accuracy_pct),
    );
    let body = serde_json::to_value(TrainingResponse::from_result(&result, request.auto_mode))
        .map_err(|e| {
            let msg = format!("Failed to serialize training result: {}", e);
            tracker.fail_job(&job_id, &msg);
            msg
        })?;
    tracker.complete_job(&job_id, Some(body));

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::models::{HyperparameterProfile, Observation};
    use crate::services::job_tracker::JobStatus;
    use chrono::NaiveDate;
    use rand::SeedableRng;

    fn history(days: usize) -> Vec<Observation> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..days)
            .map(|i| Observation::new(start + chrono::Duration::days(i as i64), 1000.0))
            .collect()
    }

    #[tokio::test]
    async fn test_training_job_completes_with_response_body() {
        let tracker = JobTracker::new();
        let job_id = tracker.create_job();
        let repo: Arc<dyn FullRepository> = Arc::new(LocalRepository::with_history(history(100)));

        let result = run_training_job(
            job_id.clone(),
            tracker.clone(),
            repo,
            TrainingRequest {
                auto_mode: true,
                ..Default::default()
            },
            TrainingOptions::default(),
            StdRng::seed_from_u64(3),
        )
        .await
        .unwrap();

        assert_eq!(result.used_params.epochs, 50);
        assert_eq!(result.used_params.batch_size, 16);

        let job = tracker.get_job(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        let progress = job.progress.unwrap();
        assert_eq!((progress.current, progress.total), (50, 50));

        let body = job.result.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["autoMode"], true);
        assert_eq!(body["usedParams"]["modelType"], "lstm");
        assert_eq!(body["epochLosses"].as_array().unwrap().len(), 50);

        let epoch_lines = job
            .logs
            .iter()
            .filter(|entry| entry.message.starts_with("Epoch "))
            .count();
        assert_eq!(epoch_lines, 50);
    }

    #[tokio::test]
    async fn test_manual_overrides_apply_to_single_run() {
        let tracker = JobTracker::new();
        let job_id = tracker.create_job();
        let repo = Arc::new(LocalRepository::new());
        let repo_dyn: Arc<dyn FullRepository> = repo.clone();

        let result = run_training_job(
            job_id,
            tracker,
            repo_dyn,
            TrainingRequest {
                epochs: Some(5),
                batch_size: Some(8),
                auto_mode: false,
            },
            TrainingOptions::default(),
            StdRng::seed_from_u64(3),
        )
        .await
        .unwrap();

        assert_eq!(result.epoch_losses.len(), 5);
        assert_eq!(result.used_params.batch_size, 8);
        assert!(!repo.has_saved_profile());
    }

    #[tokio::test]
    async fn test_invalid_profile_fails_job() {
        let tracker = JobTracker::new();
        let job_id = tracker.create_job();
        let repo = LocalRepository::new();
        crate::db::services::save_active_profile(
            &repo,
            &HyperparameterProfile {
                hidden_units: 0,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = run_training_job(
            job_id.clone(),
            tracker.clone(),
            Arc::new(repo),
            TrainingRequest::default(),
            TrainingOptions::default(),
            StdRng::seed_from_u64(3),
        )
        .await
        .unwrap_err();

        assert!(err.starts_with("Training failed"));
        assert_eq!(tracker.get_status(&job_id), Some(JobStatus::Failed));
    }

    #[tokio::test]
    async fn test_unhealthy_repository_fails_job() {
        let tracker = JobTracker::new();
        let job_id = tracker.create_job();
        let repo = LocalRepository::new();
        repo.set_healthy(false);

        let err = run_training_job(
            job_id.clone(),
            tracker.clone(),
            Arc::new(repo),
            TrainingRequest::default(),
            TrainingOptions::default(),
            StdRng::seed_from_u64(3),
        )
        .await
        .unwrap_err();

        assert!(err.contains("training profile"));
        assert_eq!(tracker.get_status(&job_id), Some(JobStatus::Failed));
    }
}
