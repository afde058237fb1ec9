//! Error taxonomy for the forecasting core.

/// Result type for core forecasting operations.
pub type EngineResult<T> = Result<T, ForecastError>;

/// Errors raised by the parameter selector, forecast engine, training
/// simulator and CSV importer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForecastError {
    /// History is empty or too short to forecast from.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Non-positive epochs, batch size, horizon or similar.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A single CSV row could not be parsed. The importer records and skips it.
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    /// No valid rows survived parsing; nothing is written.
    #[error("Import contains no valid rows")]
    ImportEmpty,

    /// A distribution or numeric routine rejected its parameters.
    #[error("Numeric error: {0}")]
    Numeric(String),
}

impl ForecastError {
    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::InsufficientData(message.into())
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub fn malformed_row(line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            line,
            reason: reason.into(),
        }
    }

    /// Whether the caller (rather than the server) caused the error.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Numeric(_))
    }
}

/// Convert a caller-supplied count into a positive `u32`.
pub fn positive_count(name: &str, value: i64) -> EngineResult<u32> {
    if value < 1 {
        return Err(ForecastError::invalid_configuration(format!(
            "{} must be at least 1 (got {})",
            name, value
        )));
    }
    u32::try_from(value).map_err(|_| {
        ForecastError::invalid_configuration(format!("{} is too large (got {})", name, value))
    })
}

/// Like [`positive_count`], also rejecting values above `max`.
pub fn bounded_count(name: &str, value: i64, max: u32) -> EngineResult<u32> {
    let count = positive_count(name, value)?;
    if count > max {
        return Err(ForecastError::invalid_configuration(format!(
            "{} must be at most {} (got {})",
            name, max, count
        )));
    }
    Ok(count)
}
