//! CSV import of sales history.
//!
//! Accepts the dashboard's upload format: a header row followed by
//! `date,sales[,features]` records. Headers are matched in English or
//! Japanese and may appear in any order. Bad rows are skipped and reported
//! rather than failing the whole import.

use serde::{Deserialize, Serialize};

use super::error::{EngineResult, ForecastError};
use crate::models::{is_valid_sales, parse_date, sort_by_date, Observation};

const DATE_HEADERS: &[&str] = &["date", "日付"];
const SALES_HEADERS: &[&str] = &["sales", "売上", "revenue"];
const FEATURE_HEADERS: &[&str] = &["features", "特徴量", "category"];

/// A record that was skipped during import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-based line in the uploaded text.
    pub line: u64,
    pub reason: String,
}

impl From<ForecastError> for SkippedRow {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::MalformedRow { line, reason } => SkippedRow { line, reason },
            other => SkippedRow {
                line: 0,
                reason: other.to_string(),
            },
        }
    }
}

/// Parsed rows, date-ordered, plus whatever was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvImport {
    pub rows: Vec<Observation>,
    pub skipped: Vec<SkippedRow>,
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnLayout {
    date: usize,
    sales: usize,
    features: usize,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let find = |names: &[&str], fallback: usize| {
            headers
                .iter()
                .position(|h| {
                    let h = h.trim().trim_start_matches('\u{feff}').to_lowercase();
                    names.iter().any(|name| *name == h)
                })
                .unwrap_or(fallback)
        };

        Self {
            date: find(DATE_HEADERS, 0),
            sales: find(SALES_HEADERS, 1),
            features: find(FEATURE_HEADERS, 2),
        }
    }
}

/// Parse a sales figure, tolerating thousands separators.
fn parse_sales(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let value: f64 = cleaned.trim().parse().ok()?;
    is_valid_sales(value).then_some(value)
}

fn parse_record(
    record: &csv::StringRecord,
    layout: ColumnLayout,
    line: u64,
) -> EngineResult<Observation> {
    if record.len() < 2 {
        return Err(ForecastError::malformed_row(
            line,
            format!("expected at least 2 fields, found {}", record.len()),
        ));
    }

    let raw_date = record.get(layout.date).unwrap_or_default();
    let date = parse_date(raw_date)
        .ok_or_else(|| ForecastError::malformed_row(line, format!("invalid date '{}'", raw_date)))?;

    let raw_sales = record.get(layout.sales).unwrap_or_default();
    let sales = parse_sales(raw_sales).ok_or_else(|| {
        ForecastError::malformed_row(line, format!("invalid sales value '{}'", raw_sales))
    })?;

    let features = record
        .get(layout.features)
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string);

    Ok(Observation {
        date,
        sales,
        features,
    })
}

/// Parse uploaded CSV text into observations.
///
/// Returns [`ForecastError::ImportEmpty`] when no row survives; malformed rows
/// are only reported in [`CsvImport::skipped`].
pub fn parse_sales_csv(content: &str) -> EngineResult<CsvImport> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let layout = match reader.headers() {
        Ok(headers) => ColumnLayout::from_headers(headers),
        Err(e) => {
            log::warn!("CSV import: unreadable header row: {}", e);
            return Err(ForecastError::ImportEmpty);
        }
    };

    let mut rows = Vec::new();
    let mut skipped = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let fallback_line = idx as u64 + 2;
        let parsed = match result {
            Ok(record) => {
                let line = record
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(fallback_line);
                if record.iter().all(str::is_empty) {
                    continue;
                }
                parse_record(&record, layout, line)
            }
            Err(e) => Err(ForecastError::malformed_row(
                e.position().map(|p| p.line()).unwrap_or(fallback_line),
                e.to_string(),
            )),
        };

        match parsed {
            Ok(obs) => rows.push(obs),
            Err(err) => skipped.push(SkippedRow::from(err)),
        }
    }

    if rows.is_empty() {
        log::warn!(
            "CSV import produced no valid rows ({} skipped)",
            skipped.len()
        );
        return Err(ForecastError::ImportEmpty);
    }

    sort_by_date(&mut rows);
    if !skipped.is_empty() {
        log::info!(
            "CSV import: {} rows parsed, {} skipped",
            rows.len(),
            skipped.len()
        );
    }

    Ok(CsvImport { rows, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_skips_malformed_row() {
        let content = "date,sales,features\n2024-01-01,1000,holiday\nBAD,ROW\n2024-01-02,900,normal";
        let import = parse_sales_csv(content).unwrap();

        assert_eq!(import.rows.len(), 2);
        assert_eq!(import.rows[0].date, date(2024, 1, 1));
        assert_eq!(import.rows[0].sales, 1000.0);
        assert_eq!(import.rows[0].features.as_deref(), Some("holiday"));
        assert_eq!(import.rows[1].sales, 900.0);

        assert_eq!(import.skipped.len(), 1);
        assert_eq!(import.skipped[0].line, 3);
        assert!(import.skipped[0].reason.contains("BAD"));
    }

    #[test]
    fn test_japanese_headers_in_any_order() {
        let content = "売上,日付,特徴量\n1200,2024/03/02,週末\n800,2024/03/01,";
        let import = parse_sales_csv(content).unwrap();

        assert_eq!(import.rows.len(), 2);
        assert_eq!(import.rows[0].date, date(2024, 3, 1));
        assert_eq!(import.rows[0].sales, 800.0);
        assert_eq!(import.rows[0].features, None);
        assert_eq!(import.rows[1].features.as_deref(), Some("週末"));
    }

    #[test]
    fn test_unknown_headers_fall_back_to_positions() {
        let content = "day,amount\n2024-05-01,10\n2024-05-02,20";
        let import = parse_sales_csv(content).unwrap();
        assert_eq!(import.rows.len(), 2);
        assert_eq!(import.rows[1].sales, 20.0);
    }

    #[test]
    fn test_revenue_and_category_aliases() {
        let content = "Category,Revenue,Date\npromo,500,2024-02-01";
        let import = parse_sales_csv(content).unwrap();
        assert_eq!(import.rows[0].sales, 500.0);
        assert_eq!(import.rows[0].features.as_deref(), Some("promo"));
    }

    #[test]
    fn test_thousands_separator_is_stripped() {
        let content = "date,sales\n2024-01-01,\"1,250.5\"";
        let import = parse_sales_csv(content).unwrap();
        assert_eq!(import.rows[0].sales, 1250.5);
    }

    #[test]
    fn test_negative_sales_are_skipped() {
        let content = "date,sales\n2024-01-01,-5\n2024-01-02,5";
        let import = parse_sales_csv(content).unwrap();
        assert_eq!(import.rows.len(), 1);
        assert_eq!(import.skipped.len(), 1);
    }

    #[test]
    fn test_out_of_range_sales_are_skipped() {
        let content = "date,sales\n2024-01-01,1e308\n2024-01-02,1e16\n2024-01-03,1e15";
        let import = parse_sales_csv(content).unwrap();
        assert_eq!(import.rows.len(), 1);
        assert_eq!(import.rows[0].sales, 1e15);
        assert_eq!(import.skipped.len(), 2);
    }

    #[test]
    fn test_single_field_row_is_skipped() {
        let content = "date,sales\n2024-01-01\n2024-01-02,5";
        let import = parse_sales_csv(content).unwrap();
        assert_eq!(import.rows.len(), 1);
        assert!(import.skipped[0].reason.contains("at least 2 fields"));
    }

    #[test]
    fn test_rows_are_sorted_by_date() {
        let content = "date,sales\n2024-01-03,3\n2024-01-01,1\n2024-01-02,2";
        let import = parse_sales_csv(content).unwrap();
        let sales: Vec<f64> = import.rows.iter().map(|r| r.sales).collect();
        assert_eq!(sales, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_empty_input_is_import_empty() {
        assert_eq!(parse_sales_csv(""), Err(ForecastError::ImportEmpty));
    }

    #[test]
    fn test_header_only_is_import_empty() {
        assert_eq!(
            parse_sales_csv("date,sales,features\n"),
            Err(ForecastError::ImportEmpty)
        );
    }

    #[test]
    fn test_all_rows_malformed_is_import_empty() {
        assert_eq!(
            parse_sales_csv("date,sales\nfoo,bar\nbaz,qux"),
            Err(ForecastError::ImportEmpty)
        );
    }
}
