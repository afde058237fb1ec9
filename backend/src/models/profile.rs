use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::services::error::{EngineResult, ForecastError};

/// Network family the (simulated) model is sized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    Lstm,
    Gru,
    Transformer,
}

impl ModelFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFamily::Lstm => "lstm",
            ModelFamily::Gru => "gru",
            ModelFamily::Transformer => "transformer",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lstm" => Ok(Self::Lstm),
            "gru" => Ok(Self::Gru),
            "transformer" => Ok(Self::Transformer),
            _ => Err(format!("Unknown model type: {}", s)),
        }
    }
}

/// Hyperparameters of the active forecasting model.
///
/// Exactly one profile is active at a time; stores replace it as a whole
/// rather than patching individual fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyperparameterProfile {
    pub model_family: ModelFamily,
    pub hidden_layers: u32,
    pub hidden_units: u32,
    pub epochs: u32,
    pub batch_size: u32,
    /// Whether the profile was derived from data size rather than chosen by a user.
    pub auto_selected: bool,
}

impl Default for HyperparameterProfile {
    fn default() -> Self {
        Self {
            model_family: ModelFamily::Lstm,
            hidden_layers: 2,
            hidden_units: 64,
            epochs: 50,
            batch_size: 32,
            auto_selected: false,
        }
    }
}

impl HyperparameterProfile {
    /// Reject profiles with a zero count in any dimension.
    pub fn validate(&self) -> EngineResult<()> {
        let checks = [
            ("epochs", self.epochs),
            ("batch_size", self.batch_size),
            ("hidden_layers", self.hidden_layers),
            ("hidden_units", self.hidden_units),
        ];
        for (name, value) in checks {
            if value == 0 {
                return Err(ForecastError::invalid_configuration(format!(
                    "{} must be at least 1",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Copy of this profile with training-run overrides applied.
    pub fn with_training_overrides(&self, epochs: Option<u32>, batch_size: Option<u32>) -> Self {
        Self {
            epochs: epochs.unwrap_or(self.epochs),
            batch_size: batch_size.unwrap_or(self.batch_size),
            ..self.clone()
        }
    }
}
