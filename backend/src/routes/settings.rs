use serde::{Deserialize, Serialize};

use crate::models::{HyperparameterProfile, ModelFamily};

/// Wire form of [`HyperparameterProfile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub model_type: ModelFamily,
    pub hidden_layers: u32,
    pub hidden_units: u32,
    pub epochs: u32,
    pub batch_size: u32,
    pub auto_selected: bool,
}

impl From<&HyperparameterProfile> for ProfileDto {
    fn from(profile: &HyperparameterProfile) -> Self {
        Self {
            model_type: profile.model_family,
            hidden_layers: profile.hidden_layers,
            hidden_units: profile.hidden_units,
            epochs: profile.epochs,
            batch_size: profile.batch_size,
            auto_selected: profile.auto_selected,
        }
    }
}

impl From<ProfileDto> for HyperparameterProfile {
    fn from(dto: ProfileDto) -> Self {
        Self {
            model_family: dto.model_type,
            hidden_layers: dto.hidden_layers,
            hidden_units: dto.hidden_units,
            epochs: dto.epochs,
            batch_size: dto.batch_size,
            auto_selected: dto.auto_selected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub success: bool,
    pub settings: ProfileDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSettingsResponse {
    pub success: bool,
    pub settings: ProfileDto,
    pub auto_mode: bool,
}

pub const GET_SETTINGS: &str = "/api/settings";
pub const POST_SAVE_SETTINGS: &str = "/api/settings/save";
pub const POST_AUTO_SETTINGS: &str = "/api/settings/auto";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_dto_json_shape() {
        let dto = ProfileDto::from(&HyperparameterProfile::default());
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["modelType"], "lstm");
        assert_eq!(json["hiddenLayers"], 2);
        assert_eq!(json["hiddenUnits"], 64);
        assert_eq!(json["epochs"], 50);
        assert_eq!(json["batchSize"], 32);
        assert_eq!(json["autoSelected"], false);
    }

    #[test]
    fn test_profile_dto_converts_back() {
        let profile = HyperparameterProfile {
            model_family: ModelFamily::Gru,
            auto_selected: true,
            ..Default::default()
        };
        let back: HyperparameterProfile = ProfileDto::from(&profile).into();
        assert_eq!(back, profile);
    }
}
