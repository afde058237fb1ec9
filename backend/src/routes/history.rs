use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Observation;
use crate::services::csv_import::SkippedRow;

/// One row of sales history as the dashboard renders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub sales: f64,
    pub features: Option<String>,
}

impl From<&Observation> for SalesRecord {
    fn from(obs: &Observation) -> Self {
        Self {
            date: obs.date,
            sales: obs.sales,
            features: obs.features.clone(),
        }
    }
}

pub fn to_records(rows: &[Observation]) -> Vec<SalesRecord> {
    rows.iter().map(SalesRecord::from).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesDataResponse {
    pub success: bool,
    pub sales_data: Vec<SalesRecord>,
}

/// Result of a CSV upload: the stored series plus what was skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub success: bool,
    pub data: Vec<SalesRecord>,
    pub imported_rows: usize,
    pub skipped_rows: Vec<SkippedRow>,
}

pub const GET_SALES_DATA: &str = "/api/data";
pub const POST_IMPORT_DATA: &str = "/api/data/import";
