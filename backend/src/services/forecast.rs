//! Forecast engine.
//!
//! The forecast is an explainable multiplicative decomposition rather than a
//! trained model:
//!
//! ```text
//! value(i) = max(0, level * weekday(i) * season(i) * trend(i) + noise)
//! ```
//!
//! `level` is the mean of the trailing basis window and `noise` is drawn from
//! `N(0, noise_ratio * std_dev)` using the caller's random source, so the
//! output is reproducible under a seeded generator.

use chrono::NaiveDate;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::error::{EngineResult, ForecastError};
use crate::models::{
    add_days, day_of_year, is_valid_sales, is_weekend, trailing, Observation, MAX_SALES,
};

/// Baseline of the placeholder accuracy score.
pub const ACCURACY_BASELINE: f64 = 85.0;
/// Width of the uniform offset added to [`ACCURACY_BASELINE`].
pub const ACCURACY_SPREAD: f64 = 10.0;

/// Shape constants of the forecast curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastParams {
    /// Trailing observations used for the level and noise scale.
    pub basis_window: usize,
    /// Trailing observations echoed back for display.
    pub history_window: usize,
    /// Multiplier applied on Saturdays and Sundays.
    pub weekend_factor: f64,
    /// Amplitude of the yearly sine component.
    pub seasonal_amplitude: f64,
    /// Relative growth per 365 forecast days.
    pub trend_slope: f64,
    /// Noise standard deviation as a fraction of the window's std dev.
    pub noise_ratio: f64,
    /// Offset of the year-over-year comparison window.
    pub year_lag_days: i64,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            basis_window: 30,
            history_window: 60,
            weekend_factor: 1.3,
            seasonal_amplitude: 0.2,
            trend_slope: 0.1,
            noise_ratio: 0.1,
            year_lag_days: 365,
        }
    }
}

/// Forecast curve plus summary metrics. Created per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub dates: Vec<NaiveDate>,
    pub forecast_values: Vec<f64>,
    pub historical_dates: Vec<NaiveDate>,
    pub historical_values: Vec<f64>,
    pub total_demand: f64,
    /// 0 when the prior-year window holds fewer than `horizon` observations.
    pub year_over_year_change_pct: f64,
    /// Placeholder score in `[85, 95)`. It is random and is not derived from
    /// any held-out comparison.
    pub accuracy_pct: f64,
}

/// Mean and population standard deviation of a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

/// Compute mean and population standard deviation.
pub fn window_stats(values: &[f64]) -> WindowStats {
    if values.is_empty() {
        return WindowStats {
            count: 0,
            mean: 0.0,
            std_dev: 0.0,
        };
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;

    WindowStats {
        count,
        mean,
        std_dev: variance.sqrt(),
    }
}

/// Combined weekday, seasonal and trend multiplier for the `offset`-th
/// forecast day (0-based) landing on `target`.
pub fn demand_multiplier(target: NaiveDate, offset: usize, params: &ForecastParams) -> f64 {
    let weekday = if is_weekend(target) {
        params.weekend_factor
    } else {
        1.0
    };
    let seasonal =
        1.0 + params.seasonal_amplitude * (PI * day_of_year(target) as f64 / 180.0).sin();
    let trend = 1.0 + (offset as f64 / 365.0) * params.trend_slope;

    weekday * seasonal * trend
}

/// Draw the placeholder accuracy score `85 + U[0, 10)`.
pub fn placeholder_accuracy<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    ACCURACY_BASELINE + rng.gen_range(0.0..ACCURACY_SPREAD)
}

/// Percentage change of `total_demand` against the actual sales in
/// `[last_date - lag, last_date - lag + horizon]`.
///
/// Returns 0 when fewer than `horizon` observations fall in that window or
/// their sum is not positive.
pub fn year_over_year_change(
    history: &[Observation],
    last_date: NaiveDate,
    horizon: usize,
    total_demand: f64,
    lag_days: i64,
) -> f64 {
    let window_start = add_days(last_date, -lag_days);
    let window_end = add_days(window_start, horizon as i64);

    let prior: Vec<f64> = history
        .iter()
        .filter(|obs| obs.date >= window_start && obs.date <= window_end)
        .map(|obs| obs.sales)
        .collect();

    let prior_total: f64 = prior.iter().sum();
    if prior.len() < horizon || prior_total <= 0.0 {
        return 0.0;
    }

    (total_demand / prior_total - 1.0) * 100.0
}

/// Forecast `horizon` days past the last observation using the default
/// curve shape.
///
/// `history` must be ordered by date ascending; the final element anchors the
/// forecast dates.
pub fn forecast<R: Rng + ?Sized>(
    history: &[Observation],
    horizon: usize,
    rng: &mut R,
) -> EngineResult<ForecastResult> {
    forecast_with_params(history, horizon, &ForecastParams::default(), rng)
}

/// Forecast with explicit curve constants.
pub fn forecast_with_params<R: Rng + ?Sized>(
    history: &[Observation],
    horizon: usize,
    params: &ForecastParams,
    rng: &mut R,
) -> EngineResult<ForecastResult> {
    let last = history
        .last()
        .ok_or_else(|| ForecastError::insufficient_data("sales history is empty"))?;
    if horizon == 0 {
        return Err(ForecastError::invalid_configuration(
            "forecast period must be at least 1 day",
        ));
    }
    if let Some(bad) = history
        .iter()
        .find(|obs| !is_valid_sales(obs.sales))
    {
        return Err(ForecastError::invalid_configuration(format!(
            "sales on {} must be between 0 and {} (got {})",
            bad.date, MAX_SALES, bad.sales
        )));
    }

    let last_date = last.date;
    let basis: Vec<f64> = trailing(history, params.basis_window.max(1))
        .iter()
        .map(|obs| obs.sales)
        .collect();
    let stats = window_stats(&basis);

    let noise_std = stats.std_dev * params.noise_ratio;
    let noise = if noise_std > 0.0 {
        Some(Normal::new(0.0, noise_std).map_err(|e| {
            ForecastError::Numeric(format!("invalid noise distribution: {}", e))
        })?)
    } else {
        None
    };

    let mut dates = Vec::with_capacity(horizon);
    let mut forecast_values = Vec::with_capacity(horizon);
    for offset in 0..horizon {
        let target = add_days(last_date, offset as i64 + 1);
        let mut value = stats.mean * demand_multiplier(target, offset, params);
        if let Some(noise) = &noise {
            value += noise.sample(rng);
        }
        dates.push(target);
        forecast_values.push(value.max(0.0));
    }

    let total_demand: f64 = forecast_values.iter().sum();
    let accuracy_pct = placeholder_accuracy(rng);
    let year_over_year_change_pct = year_over_year_change(
        history,
        last_date,
        horizon,
        total_demand,
        params.year_lag_days,
    );

    let display = trailing(history, params.history_window);

    log::debug!(
        "Forecast: {} days from {} (level={:.2}, std_dev={:.2}, total={:.2}, yoy={:.2}%)",
        horizon,
        last_date,
        stats.mean,
        stats.std_dev,
        total_demand,
        year_over_year_change_pct
    );

    Ok(ForecastResult {
        dates,
        forecast_values,
        historical_dates: display.iter().map(|obs| obs.date).collect(),
        historical_values: display.iter().map(|obs| obs.sales).collect(),
        total_demand,
        year_over_year_change_pct,
        accuracy_pct,
    })
}
