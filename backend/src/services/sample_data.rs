//! Synthetic sales history used to seed an empty store.

use chrono::NaiveDate;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;

use crate::models::{add_days, is_weekend, Observation};

/// Days generated when the server seeds an empty store.
pub const DEFAULT_SAMPLE_DAYS: usize = 365;

const BASE_SALES: f64 = 1000.0;
const WEEKEND_FACTOR: f64 = 1.5;
const SEASONAL_AMPLITUDE: f64 = 0.3;
const YEARLY_GROWTH: f64 = 0.2;
const NOISE_STD_DEV: f64 = 100.0;

/// Generate `days` consecutive daily observations ending at `end`.
///
/// Values follow `1000 * weekday * season * trend + N(0, 100)`, clamped to
/// zero, where the season and trend terms are indexed from the first day.
pub fn generate_sample_history<R: Rng + ?Sized>(
    end: NaiveDate,
    days: usize,
    rng: &mut R,
) -> Vec<Observation> {
    // Constant non-zero std dev; construction cannot fail.
    let noise = Normal::new(0.0, NOISE_STD_DEV).ok();
    let start = add_days(end, 1 - days as i64);

    (0..days)
        .map(|i| {
            let date = add_days(start, i as i64);
            let weekday = if is_weekend(date) { WEEKEND_FACTOR } else { 1.0 };
            let season = 1.0 + SEASONAL_AMPLITUDE * (PI * i as f64 / 180.0).sin();
            let trend = 1.0 + (i as f64 / 365.0) * YEARLY_GROWTH;
            let jitter = noise.as_ref().map(|n| n.sample(rng)).unwrap_or(0.0);
            let sales = (BASE_SALES * weekday * season * trend + jitter).max(0.0);
            Observation::new(date, sales)
        })
        .collect()
}
