//! HTTP handlers for the REST API.
//!
//! Handlers load what they need from the repository, hand plain slices to the
//! forecasting services and map the results onto the wire types.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;

use super::dto::{
    ForecastResponse, HealthResponse, ImportRequest, ImportResponse, JobStatusResponse,
    PredictRequest, ProfileDto, SalesDataResponse, SaveSettingsRequest, SaveSettingsResponse,
    SettingsResponse, TestResponse, TrainRequest, TrainingJobResponse, TrainingResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::routes::history::to_records;
use crate::routes::training::job_logs_path;
use crate::services::csv_import::parse_sales_csv;
use crate::services::error::{positive_count, ForecastError};
use crate::services::forecast;
use crate::services::job_tracker::JobStatus;
use crate::services::training::simulate_training;
use crate::services::training_job::run_training_job;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Finished jobs older than this are dropped when a new job starts.
const FINISHED_JOB_RETENTION_HOURS: i64 = 1;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and database is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

/// GET /api/test
pub async fn api_test() -> Json<TestResponse> {
    Json(TestResponse {
        message: "Forecast API is running".to_string(),
        status: "ok".to_string(),
    })
}

// =============================================================================
// Sales History
// =============================================================================

/// GET /api/data
pub async fn get_sales_data(State(state): State<AppState>) -> HandlerResult<SalesDataResponse> {
    let history = db_services::get_sales_history(state.repository.as_ref()).await?;
    Ok(Json(SalesDataResponse {
        success: true,
        sales_data: to_records(&history),
    }))
}

/// POST /api/data/import
///
/// Replace the stored history with the rows parsed from `csvContent`.
/// Unparsable rows are skipped and reported; the store is left untouched when
/// no row survives.
pub async fn import_data(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> HandlerResult<ImportResponse> {
    let content = request
        .csv_content
        .ok_or_else(|| AppError::BadRequest("csvContent is required".to_string()))?;

    let import = parse_sales_csv(&content)?;
    for skipped in &import.skipped {
        tracing::warn!("Skipped CSV line {}: {}", skipped.line, skipped.reason);
    }
    let imported_rows =
        db_services::replace_sales_history(state.repository.as_ref(), &import.rows).await?;

    Ok(Json(ImportResponse {
        success: true,
        data: to_records(&import.rows),
        imported_rows,
        skipped_rows: import.skipped,
    }))
}

// =============================================================================
// Model Settings
// =============================================================================

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> HandlerResult<SettingsResponse> {
    let profile = db_services::get_active_profile(state.repository.as_ref()).await?;
    Ok(Json(SettingsResponse {
        success: true,
        settings: ProfileDto::from(&profile),
    }))
}

/// POST /api/settings/save
///
/// With `autoMode` the profile is derived from the history size and the other
/// fields are ignored.
pub async fn save_settings(
    State(state): State<AppState>,
    Json(request): Json<SaveSettingsRequest>,
) -> HandlerResult<SaveSettingsResponse> {
    let repo = state.repository.as_ref();
    let profile = if request.auto_mode {
        db_services::auto_select_profile(repo).await?
    } else {
        let active = db_services::get_active_profile(repo).await?;
        let profile = request.apply_to(&active, state.config.training_limits())?;
        db_services::save_active_profile(repo, &profile).await?;
        profile
    };

    Ok(Json(SaveSettingsResponse {
        success: true,
        settings: ProfileDto::from(&profile),
        auto_mode: request.auto_mode,
    }))
}

/// POST /api/settings/auto
pub async fn auto_settings(State(state): State<AppState>) -> HandlerResult<SaveSettingsResponse> {
    let profile = db_services::auto_select_profile(state.repository.as_ref()).await?;
    Ok(Json(SaveSettingsResponse {
        success: true,
        settings: ProfileDto::from(&profile),
        auto_mode: true,
    }))
}

// =============================================================================
// Forecasting
// =============================================================================

/// POST /api/predict
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> HandlerResult<ForecastResponse> {
    let period = match request.period {
        Some(value) => positive_count("period", value)?,
        None => state.config.default_period,
    };
    if period > state.config.max_period {
        return Err(ForecastError::invalid_configuration(format!(
            "period must be at most {} days (got {})",
            state.config.max_period, period
        ))
        .into());
    }

    let history = db_services::get_sales_history(state.repository.as_ref()).await?;
    let mut rng = state.config.rng();
    let result = forecast::forecast(&history, period as usize, &mut rng)?;
    tracing::info!(
        "Forecast {} days from {} observations: total {:.1}",
        period,
        history.len(),
        result.total_demand
    );

    Ok(Json(ForecastResponse::from(result)))
}

// =============================================================================
// Training
// =============================================================================

/// POST /api/train
///
/// Run the training simulation and wait for it to finish.
pub async fn train(
    State(state): State<AppState>,
    Json(request): Json<TrainRequest>,
) -> HandlerResult<TrainingResponse> {
    let request = request.validate(state.config.training_limits())?;
    let profile = db_services::resolve_training_profile(
        state.repository.as_ref(),
        request.auto_mode,
        request.epochs,
        request.batch_size,
    )
    .await?;

    let options = state.config.training_options();
    let mut rng = state.config.rng();
    let result = tokio::task::spawn_blocking(move || {
        simulate_training(&profile, &options, &mut rng, |_| {})
    })
    .await
    .map_err(|e| AppError::Internal(format!("Training task panic: {}", e)))??;

    Ok(Json(TrainingResponse::from_result(&result, request.auto_mode)))
}

/// POST /api/train/jobs
///
/// Start training in the background. Returns a job ID for tracking progress.
pub async fn start_training_job(
    State(state): State<AppState>,
    Json(request): Json<TrainRequest>,
) -> Result<(StatusCode, Json<TrainingJobResponse>), AppError> {
    let request = request.validate(state.config.training_limits())?;

    let pruned = state
        .job_tracker
        .prune_finished(chrono::Utc::now() - chrono::Duration::hours(FINISHED_JOB_RETENTION_HOURS));
    if pruned > 0 {
        tracing::debug!("Pruned {} finished training jobs", pruned);
    }

    let job_id = state.job_tracker.create_job();
    let response_job_id = job_id.clone();

    let tracker = state.job_tracker.clone();
    let repo = state.repository.clone();
    let options = state.config.training_options();
    let rng = state.config.rng();

    tokio::spawn(async move {
        if let Err(e) = run_training_job(job_id, tracker, repo, request, options, rng).await {
            tracing::warn!("Training job failed: {}", e);
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(TrainingJobResponse {
            message: format!(
                "Training started. Track progress at {}",
                job_logs_path(&response_job_id)
            ),
            job_id: response_job_id,
        }),
    ))
}

// =============================================================================
// Async Job Management
// =============================================================================

/// GET /api/jobs/{job_id}
///
/// Get the current status and logs of a background job.
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> HandlerResult<JobStatusResponse> {
    let job = state
        .job_tracker
        .get_job(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

    Ok(Json(JobStatusResponse {
        job_id: job.job_id,
        status: job.status.as_str().to_string(),
        progress: job.progress,
        logs: job.logs,
        result: job.result,
    }))
}

/// GET /api/jobs/{job_id}/logs
///
/// Stream job logs via Server-Sent Events (SSE).
pub async fn stream_job_logs(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    if state.job_tracker.get_job(&job_id).is_none() {
        return Err(AppError::NotFound(format!("Job {} not found", job_id)));
    }

    let tracker = state.job_tracker.clone();
    let stream = async_stream::stream! {
        let mut sent = 0;
        loop {
            for log in tracker.logs_since(&job_id, sent) {
                sent += 1;
                let event_data = serde_json::to_string(&log).unwrap_or_default();
                yield Ok(Event::default().data(event_data));
            }

            match tracker.get_job(&job_id) {
                Some(job) if job.status != JobStatus::Running => {
                    // Entries logged between the two reads above
                    for log in job.logs.iter().skip(sent) {
                        let event_data = serde_json::to_string(log).unwrap_or_default();
                        yield Ok(Event::default().data(event_data));
                    }
                    let final_event = serde_json::json!({
                        "status": job.status,
                        "result": job.result,
                    });
                    yield Ok(Event::default()
                        .event("complete")
                        .data(serde_json::to_string(&final_event).unwrap_or_default()));
                    break;
                }
                Some(_) => {}
                None => break,
            }

            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    };

    Ok(Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(1))
            .text("keep-alive"),
    ))
}
