//! Runtime configuration read from the environment.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use std::time::Duration;

use crate::services::training::{
    TrainingLimits, TrainingOptions, DEFAULT_MAX_BATCH_SIZE, DEFAULT_MAX_EPOCHS,
};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5003;
pub const DEFAULT_FORECAST_PERIOD: u32 = 30;
pub const DEFAULT_MAX_FORECAST_PERIOD: u32 = 730;

/// Server and engine settings.
///
/// Repository selection is configured separately, see
/// [`crate::db::RepositoryFactory::from_env`].
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Horizon used when a predict request omits `period`
    pub default_period: u32,
    /// Largest horizon a predict request may ask for
    pub max_period: u32,
    /// Fixed RNG seed; entropy when unset
    pub seed: Option<u64>,
    pub epoch_delay: Duration,
    /// Upper bound on epochs for a training run or a saved profile
    pub max_epochs: u32,
    pub max_batch_size: u32,
    /// Generate a year of sample history when the store is empty at startup
    pub seed_sample_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            default_period: DEFAULT_FORECAST_PERIOD,
            max_period: DEFAULT_MAX_FORECAST_PERIOD,
            seed: None,
            epoch_delay: Duration::ZERO,
            max_epochs: DEFAULT_MAX_EPOCHS,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            seed_sample_data: true,
        }
    }
}

impl AppConfig {
    /// Read configuration from environment variables.
    ///
    /// Unset variables take their defaults; set but unparsable ones are an
    /// error.
    ///
    /// - `HOST` (default `0.0.0.0`), `PORT` (default 5003)
    /// - `FORECAST_DEFAULT_PERIOD` (30), `FORECAST_MAX_PERIOD` (730)
    /// - `FORECAST_SEED` (unset)
    /// - `TRAINING_EPOCH_DELAY_MS` (0)
    /// - `TRAINING_MAX_EPOCHS` (1000), `TRAINING_MAX_BATCH_SIZE` (1024)
    /// - `SEED_SAMPLE_DATA` (true)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT")?.unwrap_or(defaults.port),
            default_period: parse_var("FORECAST_DEFAULT_PERIOD")?
                .unwrap_or(defaults.default_period),
            max_period: parse_var("FORECAST_MAX_PERIOD")?.unwrap_or(defaults.max_period),
            seed: parse_var("FORECAST_SEED")?,
            epoch_delay: parse_var::<u64>("TRAINING_EPOCH_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.epoch_delay),
            max_epochs: parse_var("TRAINING_MAX_EPOCHS")?.unwrap_or(defaults.max_epochs),
            max_batch_size: parse_var("TRAINING_MAX_BATCH_SIZE")?
                .unwrap_or(defaults.max_batch_size),
            seed_sample_data: match env::var("SEED_SAMPLE_DATA") {
                Ok(value) => parse_flag(&value)
                    .with_context(|| format!("Invalid SEED_SAMPLE_DATA value '{}'", value))?,
                Err(_) => defaults.seed_sample_data,
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_period == 0 || self.max_period == 0 {
            anyhow::bail!("Forecast periods must be at least 1");
        }
        if self.max_epochs == 0 || self.max_batch_size == 0 {
            anyhow::bail!("Training limits must be at least 1");
        }
        if self.default_period > self.max_period {
            anyhow::bail!(
                "FORECAST_DEFAULT_PERIOD ({}) exceeds FORECAST_MAX_PERIOD ({})",
                self.default_period,
                self.max_period
            );
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Fresh RNG for one request or job.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn training_limits(&self) -> TrainingLimits {
        TrainingLimits {
            max_epochs: self.max_epochs,
            max_batch_size: self.max_batch_size,
        }
    }

    pub fn training_options(&self) -> TrainingOptions {
        TrainingOptions::default()
            .with_epoch_delay(self.epoch_delay)
            .with_limits(self.training_limits())
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid {} value '{}'", name, value)),
        _ => Ok(None),
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:5003");
        assert_eq!(config.default_period, 30);
        assert_eq!(config.max_period, 730);
        assert!(config.seed_sample_data);
        assert!(config.training_options().epoch_delay.is_zero());
        assert_eq!(config.training_options().limits.max_epochs, 1000);
        assert_eq!(config.training_limits().max_batch_size, 1024);
    }

    #[test]
    fn test_validate_rejects_zero_training_limits() {
        let config = AppConfig {
            max_epochs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = AppConfig {
            seed: Some(42),
            ..Default::default()
        };
        let a: f64 = config.rng().gen();
        let b: f64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_validate_rejects_default_above_max() {
        let config = AppConfig {
            default_period: 800,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(!parse_flag(" off ").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
