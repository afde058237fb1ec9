//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::services::error::ForecastError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Forecasting core error
    Forecast(ForecastError),
    /// Repository error
    Repository(RepositoryError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Forecast(e) => match e {
                ForecastError::InsufficientData(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ForecastError::InvalidConfiguration(_)
                | ForecastError::MalformedRow { .. }
                | ForecastError::ImportEmpty => StatusCode::BAD_REQUEST,
                ForecastError::Numeric(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Repository(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(self) -> ApiError {
        match self {
            AppError::NotFound(msg) => ApiError::new("NOT_FOUND", msg),
            AppError::BadRequest(msg) => ApiError::new("BAD_REQUEST", msg),
            AppError::Internal(msg) => ApiError::new("INTERNAL_ERROR", msg),
            AppError::Forecast(e) => {
                let code = match &e {
                    ForecastError::InsufficientData(_) => "INSUFFICIENT_DATA",
                    ForecastError::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
                    ForecastError::MalformedRow { .. } => "MALFORMED_ROW",
                    ForecastError::ImportEmpty => "IMPORT_EMPTY",
                    ForecastError::Numeric(_) => "NUMERIC_ERROR",
                };
                ApiError::new(code, e.to_string())
            }
            AppError::Repository(e) => {
                let code = if e.is_not_found() {
                    "NOT_FOUND"
                } else {
                    "REPOSITORY_ERROR"
                };
                let error = ApiError::new(code, e.to_string());
                match e.context().operation.clone() {
                    Some(operation) => error.with_details(format!("operation: {}", operation)),
                    None => error,
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self);
        }
        (status, Json(self.body())).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        AppError::Forecast(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
