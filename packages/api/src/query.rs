//! Filter state and its translation into upstream query parameters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wildguard_conflict_models::{DamageClass, SpeciesOption};

/// The active dashboard filter selection.
///
/// Species are selected by ID in the UI but the upstream filters by
/// common name, so building query pairs requires the species options to
/// resolve against. IDs with no matching option are dropped silently;
/// they can only arise from a stale options list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ConflictFilter {
    /// Selected species IDs.
    pub species_ids: Vec<i64>,
    /// Selected damage classes.
    pub damage_classes: Vec<DamageClass>,
    /// Inclusive window start.
    pub start_date: Option<NaiveDate>,
    /// Inclusive window end.
    pub end_date: Option<NaiveDate>,
}

impl ConflictFilter {
    /// Whether no filter dimension is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.species_ids.is_empty()
            && self.damage_classes.is_empty()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Builds the repeated query pairs the upstream expects:
    /// `species_names` (one per resolved selection), `damage_classes`,
    /// and `start_date`/`end_date` as `YYYY-MM-DD`.
    #[must_use]
    pub fn to_query_pairs(&self, species_options: &[SpeciesOption]) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        for id in &self.species_ids {
            if let Some(option) = species_options.iter().find(|option| option.id == *id) {
                pairs.push(("species_names", option.common_name.clone()));
            }
        }
        for class in &self.damage_classes {
            pairs.push(("damage_classes", class.to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }

        pairs
    }
}

/// Request body for `POST /weather_details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherQuery {
    /// Taluka the prediction is for.
    pub taluka_type: String,
    /// Crop the prediction is for.
    pub crop_type: String,
    /// Tree age in years.
    pub tree_age: u32,
    /// Forecast horizon in days.
    pub prediction_days: u32,
}
