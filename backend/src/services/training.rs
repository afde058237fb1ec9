//! Simulated model training.
//!
//! No network is fitted. The simulator walks a linear loss curve for the
//! configured number of epochs and reports a placeholder accuracy, so the
//! dashboard can exercise its training flow end to end.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{EngineResult, ForecastError};
use super::forecast::placeholder_accuracy;
use crate::models::HyperparameterProfile;

/// Fraction of the initial loss shed over a full run.
pub const LOSS_DECAY: f64 = 0.9;

/// Default upper bound on epochs per run, well above the largest auto-selected profile.
pub const DEFAULT_MAX_EPOCHS: u32 = 1000;
pub const DEFAULT_MAX_BATCH_SIZE: u32 = 1024;

/// Largest epoch count and batch size a run may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingLimits {
    pub max_epochs: u32,
    pub max_batch_size: u32,
}

impl Default for TrainingLimits {
    fn default() -> Self {
        Self {
            max_epochs: DEFAULT_MAX_EPOCHS,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl TrainingLimits {
    /// Reject a profile whose epochs or batch size exceed the limits.
    pub fn check(&self, profile: &HyperparameterProfile) -> EngineResult<()> {
        let checks = [
            ("epochs", profile.epochs, self.max_epochs),
            ("batch_size", profile.batch_size, self.max_batch_size),
        ];
        for (name, value, max) in checks {
            if value > max {
                return Err(ForecastError::invalid_configuration(format!(
                    "{} must be at most {} (got {})",
                    name, max, value
                )));
            }
        }
        Ok(())
    }
}

/// Knobs that do not belong to the model profile.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOptions {
    pub decay: f64,
    /// Pause after each epoch. Zero in tests and by default.
    pub epoch_delay: Duration,
    pub limits: TrainingLimits,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            decay: LOSS_DECAY,
            epoch_delay: Duration::ZERO,
            limits: TrainingLimits::default(),
        }
    }
}

impl TrainingOptions {
    pub fn with_epoch_delay(mut self, delay: Duration) -> Self {
        self.epoch_delay = delay;
        self
    }

    pub fn with_limits(mut self, limits: TrainingLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Progress notification emitted once per epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochProgress {
    /// 1-based epoch number.
    pub epoch: u32,
    pub total_epochs: u32,
    pub loss: f64,
}

/// Outcome of a simulated run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub accuracy_pct: f64,
    pub used_params: HyperparameterProfile,
    pub epoch_losses: Vec<f64>,
}

/// Loss after `epoch` (0-based) of `total` epochs.
pub fn epoch_loss(epoch: u32, total: u32, decay: f64) -> f64 {
    1.0 - (epoch as f64 / total.max(1) as f64) * decay
}

/// Run the simulated training loop for `profile`.
///
/// `on_epoch` is called after every epoch with the loss just reached. The
/// call blocks for `epochs * options.epoch_delay`; async callers should run
/// it on a blocking thread.
pub fn simulate_training<R, F>(
    profile: &HyperparameterProfile,
    options: &TrainingOptions,
    rng: &mut R,
    mut on_epoch: F,
) -> EngineResult<TrainingResult>
where
    R: Rng + ?Sized,
    F: FnMut(EpochProgress),
{
    profile.validate()?;
    options.limits.check(profile)?;

    let total_epochs = profile.epochs;
    let mut epoch_losses = Vec::with_capacity(total_epochs as usize);
    for epoch in 0..total_epochs {
        let loss = epoch_loss(epoch, total_epochs, options.decay);
        epoch_losses.push(loss);
        on_epoch(EpochProgress {
            epoch: epoch + 1,
            total_epochs,
            loss,
        });
        if !options.epoch_delay.is_zero() {
            std::thread::sleep(options.epoch_delay);
        }
    }

    let accuracy_pct = placeholder_accuracy(rng);
    log::info!(
        "Simulated training of {} ({} layers x {} units) for {} epochs, batch {}: accuracy {:.2}%",
        profile.model_family,
        profile.hidden_layers,
        profile.hidden_units,
        total_epochs,
        profile.batch_size,
        accuracy_pct
    );

    Ok(TrainingResult {
        accuracy_pct,
        used_params: profile.clone(),
        epoch_losses,
    })
}
