use chrono::NaiveDate;
use diesel::prelude::*;
use std::str::FromStr;

use super::schema::{sales_data, settings};
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{HyperparameterProfile, ModelFamily, Observation};

/// Row id of the single active profile.
pub const ACTIVE_SETTINGS_ID: i32 = 1;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sales_data)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[allow(dead_code)] // id only orders same-day rows
pub struct SalesRow {
    pub id: i32,
    pub date: NaiveDate,
    pub sales: f64,
    pub features: Option<String>,
}

impl From<SalesRow> for Observation {
    fn from(row: SalesRow) -> Self {
        Observation {
            date: row.date,
            sales: row.sales,
            features: row.features,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sales_data)]
#[diesel(treat_none_as_default_value = false)]
pub struct NewSalesRow<'a> {
    pub date: NaiveDate,
    pub sales: f64,
    pub features: Option<&'a str>,
}

impl<'a> From<&'a Observation> for NewSalesRow<'a> {
    fn from(obs: &'a Observation) -> Self {
        NewSalesRow {
            date: obs.date,
            sales: obs.sales,
            features: obs.features.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = settings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SettingsRow {
    pub id: i32,
    pub model_type: String,
    pub hidden_layers: i32,
    pub hidden_units: i32,
    pub epochs: i32,
    pub batch_size: i32,
    pub auto_selected: bool,
}

fn to_column(name: &str, value: u32) -> RepositoryResult<i32> {
    i32::try_from(value).map_err(|_| {
        RepositoryError::validation_with_context(
            format!("{} out of range: {}", name, value),
            ErrorContext::new("save_profile").with_entity("settings"),
        )
    })
}

fn from_column(name: &str, value: i32) -> RepositoryResult<u32> {
    u32::try_from(value).map_err(|_| {
        RepositoryError::validation_with_context(
            format!("stored {} is negative: {}", name, value),
            ErrorContext::new("load_active_profile")
                .with_entity("settings")
                .with_entity_id(ACTIVE_SETTINGS_ID),
        )
    })
}

impl SettingsRow {
    pub fn from_profile(profile: &HyperparameterProfile) -> RepositoryResult<Self> {
        Ok(Self {
            id: ACTIVE_SETTINGS_ID,
            model_type: profile.model_family.as_str().to_string(),
            hidden_layers: to_column("hidden_layers", profile.hidden_layers)?,
            hidden_units: to_column("hidden_units", profile.hidden_units)?,
            epochs: to_column("epochs", profile.epochs)?,
            batch_size: to_column("batch_size", profile.batch_size)?,
            auto_selected: profile.auto_selected,
        })
    }

    pub fn into_profile(self) -> RepositoryResult<HyperparameterProfile> {
        let model_family = ModelFamily::from_str(&self.model_type).map_err(|e| {
            RepositoryError::validation_with_context(
                e,
                ErrorContext::new("load_active_profile").with_entity("settings"),
            )
        })?;

        Ok(HyperparameterProfile {
            model_family,
            hidden_layers: from_column("hidden_layers", self.hidden_layers)?,
            hidden_units: from_column("hidden_units", self.hidden_units)?,
            epochs: from_column("epochs", self.epochs)?,
            batch_size: from_column("batch_size", self.batch_size)?,
            auto_selected: self.auto_selected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_row_round_trips_profile() {
        let profile = HyperparameterProfile {
            model_family: ModelFamily::Transformer,
            hidden_layers: 4,
            hidden_units: 256,
            epochs: 150,
            batch_size: 64,
            auto_selected: true,
        };
        let row = SettingsRow::from_profile(&profile).unwrap();
        assert_eq!(row.id, ACTIVE_SETTINGS_ID);
        assert_eq!(row.model_type, "transformer");
        assert_eq!(row.into_profile().unwrap(), profile);
    }

    #[test]
    fn test_unknown_model_type_is_validation_error() {
        let row = SettingsRow {
            id: 1,
            model_type: "cnn".into(),
            hidden_layers: 1,
            hidden_units: 1,
            epochs: 1,
            batch_size: 1,
            auto_selected: false,
        };
        let err = row.into_profile().unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
    }

    #[test]
    fn test_oversized_count_is_rejected() {
        let profile = HyperparameterProfile {
            hidden_units: u32::MAX,
            ..Default::default()
        };
        assert!(SettingsRow::from_profile(&profile).is_err());
    }
}
