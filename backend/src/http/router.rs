//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;
use crate::routes::{forecast, history, settings, training, GET_HEALTH, GET_TEST};

/// Largest accepted request body; CSV uploads can run to several years of rows.
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // The dashboard is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(GET_HEALTH, get(handlers::health_check))
        .route(GET_TEST, get(handlers::api_test))
        // Sales history
        .route(history::GET_SALES_DATA, get(handlers::get_sales_data))
        .route(history::POST_IMPORT_DATA, post(handlers::import_data))
        // Model settings
        .route(settings::GET_SETTINGS, get(handlers::get_settings))
        .route(settings::POST_SAVE_SETTINGS, post(handlers::save_settings))
        .route(settings::POST_AUTO_SETTINGS, post(handlers::auto_settings))
        // Forecasting and training
        .route(forecast::POST_PREDICT, post(handlers::predict))
        .route(training::POST_TRAIN, post(handlers::train))
        .route(training::POST_TRAIN_JOB, post(handlers::start_training_job))
        // Job management
        .route(training::GET_JOB_STATUS, get(handlers::get_job_status))
        .route(training::GET_JOB_LOGS, get(handlers::stream_job_logs))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
