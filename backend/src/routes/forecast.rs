use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::services::forecast::ForecastResult;

/// Forecast payload consumed by the dashboard chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub dates: Vec<NaiveDate>,
    pub forecast_data: Vec<f64>,
    pub historical_dates: Vec<NaiveDate>,
    pub historical_data: Vec<f64>,
    pub total_demand: f64,
    /// Percent; 0 when there is not enough prior-year history
    pub year_over_year_change: f64,
    /// Placeholder score, not a backtest
    pub accuracy: f64,
}

impl From<ForecastResult> for ForecastResponse {
    fn from(result: ForecastResult) -> Self {
        Self {
            dates: result.dates,
            forecast_data: result.forecast_values,
            historical_dates: result.historical_dates,
            historical_data: result.historical_values,
            total_demand: result.total_demand,
            year_over_year_change: result.year_over_year_change_pct,
            accuracy: result.accuracy_pct,
        }
    }
}

pub const POST_PREDICT: &str = "/api/predict";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_response_keys() {
        let day = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
        let response = ForecastResponse::from(ForecastResult {
            dates: vec![day],
            forecast_values: vec![1200.0],
            historical_dates: vec![],
            historical_values: vec![],
            total_demand: 1200.0,
            year_over_year_change_pct: 0.0,
            accuracy_pct: 90.0,
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["dates"][0], "2024-04-10");
        assert_eq!(json["forecastData"][0], 1200.0);
        assert_eq!(json["totalDemand"], 1200.0);
        assert_eq!(json["yearOverYearChange"], 0.0);
        assert_eq!(json["accuracy"], 90.0);
        assert!(json["historicalDates"].as_array().unwrap().is_empty());
        assert!(json.get("historicalData").is_some());
    }
}
