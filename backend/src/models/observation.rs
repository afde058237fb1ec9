use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Largest daily sales value accepted. Keeps sums of squares over a
/// history window well inside `f64` range.
pub const MAX_SALES: f64 = 1e15;

/// Whether `sales` is a usable daily value.
pub fn is_valid_sales(sales: f64) -> bool {
    sales.is_finite() && (0.0..=MAX_SALES).contains(&sales)
}

/// A single historical sales data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub sales: f64,
    /// Free-text tag such as "holiday" or "campaign".
    pub features: Option<String>,
}

impl Observation {
    pub fn new(date: NaiveDate, sales: f64) -> Self {
        Self {
            date,
            sales,
            features: None,
        }
    }

    pub fn with_features(mut self, features: impl Into<String>) -> Self {
        self.features = Some(features.into());
        self
    }
}

/// Sort observations by date ascending, keeping the input order of
/// same-day rows.
pub fn sort_by_date(rows: &mut [Observation]) {
    rows.sort_by_key(|row| row.date);
}

/// The trailing `n` observations (or all of them when there are fewer).
pub fn trailing(rows: &[Observation], n: usize) -> &[Observation] {
    &rows[rows.len().saturating_sub(n)..]
}
