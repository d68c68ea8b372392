#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crop-cultivation table types and prediction records.
//!
//! The cultivation parser service publishes a nested mapping of
//! `district -> year-label -> crop -> metrics`, with metric fields named
//! exactly as they appear in the source spreadsheets. Any metric may be
//! absent or loosely typed; all of them coerce to finite numbers on the
//! way in so downstream sums stay clean.
//!
//! Cultivation predictions are a separate record kind from wildlife
//! incidents and stay structurally distinct.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use wildguard_json_utils::lenient_f64;

/// Per-crop metrics for one district and year, under the exact field
/// names the upstream spreadsheet parser emits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CropMetrics {
    /// Total area under cultivation, in hectares.
    #[serde(
        rename = "Total Cultivated Area (hectares)",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub total_cultivated_area: f64,
    /// Area actually utilized, in hectares.
    #[serde(
        rename = "Cultivation area(hectare)",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub area_used: f64,
    /// Productivity in metric tons per hectare.
    #[serde(
        rename = "Productivity MT/(hectare)",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub productivity: f64,
    /// Production in metric tons per hectare.
    #[serde(
        rename = "Production MT/(Hectare)",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub production: f64,
}

/// Selector for one of the four cultivation metrics.
///
/// Displays as the exact upstream field label so chart legends and query
/// parameters round-trip without a translation table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum CropMetric {
    /// `"Total Cultivated Area (hectares)"`
    #[strum(serialize = "Total Cultivated Area (hectares)")]
    TotalCultivatedArea,
    /// `"Cultivation area(hectare)"`
    #[strum(serialize = "Cultivation area(hectare)")]
    AreaUsed,
    /// `"Productivity MT/(hectare)"`
    #[strum(serialize = "Productivity MT/(hectare)")]
    Productivity,
    /// `"Production MT/(Hectare)"`
    #[strum(serialize = "Production MT/(Hectare)")]
    Production,
}

impl CropMetric {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::TotalCultivatedArea,
            Self::AreaUsed,
            Self::Productivity,
            Self::Production,
        ]
    }

    /// Reads this metric's value out of a metrics record.
    #[must_use]
    pub const fn of(self, metrics: &CropMetrics) -> f64 {
        match self {
            Self::TotalCultivatedArea => metrics.total_cultivated_area,
            Self::AreaUsed => metrics.area_used,
            Self::Productivity => metrics.productivity,
            Self::Production => metrics.production,
        }
    }
}

/// Crop metrics keyed by crop name.
pub type CropsByName = BTreeMap<String, CropMetrics>;

/// Crops keyed by year label (e.g. `"2020-21"`).
pub type YearsByLabel = BTreeMap<String, CropsByName>;

/// The full cultivation table: `district -> year-label -> crop -> metrics`.
///
/// Key order carries no semantics upstream; sorted maps give every caller
/// the same deterministic display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct CultivationTable(pub BTreeMap<String, YearsByLabel>);

impl CultivationTable {
    /// Returns all district names.
    #[must_use]
    pub fn districts(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// Returns the sorted union of year labels across all districts.
    #[must_use]
    pub fn year_labels(&self) -> Vec<&str> {
        let labels: BTreeSet<&str> = self
            .0
            .values()
            .flat_map(|years| years.keys().map(String::as_str))
            .collect();
        labels.into_iter().collect()
    }

    /// Returns the sorted union of crop names across the given districts
    /// (all districts when `districts` is empty).
    #[must_use]
    pub fn crops_for(&self, districts: &[String]) -> Vec<&str> {
        let crops: BTreeSet<&str> = self
            .0
            .iter()
            .filter(|(district, _)| {
                districts.is_empty() || districts.iter().any(|d| d == *district)
            })
            .flat_map(|(_, years)| years.values())
            .flat_map(|crops| crops.keys().map(String::as_str))
            .collect();
        crops.into_iter().collect()
    }

    /// Returns the crops recorded for one district and year, if any.
    #[must_use]
    pub fn year_data(&self, district: &str, year_label: &str) -> Option<&CropsByName> {
        self.0.get(district)?.get(year_label)
    }

    /// Reads one metric value; any missing level of the nesting yields
    /// `0.0`.
    #[must_use]
    pub fn metric_value(
        &self,
        district: &str,
        year_label: &str,
        crop: &str,
        metric: CropMetric,
    ) -> f64 {
        self.year_data(district, year_label)
            .and_then(|crops| crops.get(crop))
            .map_or(0.0, |metrics| metric.of(metrics))
    }
}

/// A cultivation prediction row from the prediction service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropPrediction {
    /// Upstream row ID.
    pub id: i64,
    /// Village the prediction applies to.
    pub village: String,
    /// Taluka (sub-district) the village belongs to.
    pub taluka: String,
    /// Species the prediction model associated with the row.
    pub species: String,
    /// Month label the prediction applies to.
    pub month: String,
    /// Predicted crop label. Treated as opaque display text.
    pub predicted_crop: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_table() -> CultivationTable {
        serde_json::from_value(json!({
            "Kudal": {
                "2020-21": {
                    "Mango": {
                        "Total Cultivated Area (hectares)": 100,
                        "Cultivation area(hectare)": 40
                    },
                    "Cashew": {
                        "Total Cultivated Area (hectares)": "1,250",
                        "Productivity MT/(hectare)": 2.5
                    }
                }
            },
            "Sawantwadi": {
                "2021-22": {
                    "Mango": { "Production MT/(Hectare)": 12 }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn absent_metrics_default_to_zero() {
        let table = sample_table();
        let mango = table.year_data("Kudal", "2020-21").unwrap()["Mango"];
        assert!((mango.total_cultivated_area - 100.0).abs() < f64::EPSILON);
        assert!((mango.area_used - 40.0).abs() < f64::EPSILON);
        assert!((mango.productivity - 0.0).abs() < f64::EPSILON);
        assert!((mango.production - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn formatted_strings_coerce() {
        let table = sample_table();
        let cashew = table.year_data("Kudal", "2020-21").unwrap()["Cashew"];
        assert!((cashew.total_cultivated_area - 1250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unions_are_sorted() {
        let table = sample_table();
        assert_eq!(table.districts(), vec!["Kudal", "Sawantwadi"]);
        assert_eq!(table.year_labels(), vec!["2020-21", "2021-22"]);
        assert_eq!(table.crops_for(&[]), vec!["Cashew", "Mango"]);
        assert_eq!(
            table.crops_for(&["Sawantwadi".to_string()]),
            vec!["Mango"]
        );
    }

    #[test]
    fn metric_value_is_total() {
        let table = sample_table();
        assert!(
            (table.metric_value("Kudal", "2020-21", "Mango", CropMetric::AreaUsed) - 40.0).abs()
                < f64::EPSILON
        );
        // Missing district, year, and crop all collapse to zero.
        assert!(
            (table.metric_value("Vengurla", "2020-21", "Mango", CropMetric::AreaUsed) - 0.0).abs()
                < f64::EPSILON
        );
        assert!(
            (table.metric_value("Kudal", "2019-20", "Mango", CropMetric::AreaUsed) - 0.0).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn metric_labels_round_trip() {
        for metric in CropMetric::all() {
            let label = metric.to_string();
            assert_eq!(label.parse::<CropMetric>().unwrap(), *metric);
        }
        assert_eq!(
            "Total Cultivated Area (hectares)".parse::<CropMetric>().unwrap(),
            CropMetric::TotalCultivatedArea
        );
    }
}
