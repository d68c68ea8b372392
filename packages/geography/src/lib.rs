#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Choropleth intensity tiers and region/count joins over `GeoJSON`
//! boundaries.
//!
//! The incident heat map colors each named region by a fixed-threshold
//! scale. The scale lives here as a pure function so every surface that
//! visualizes counts geographically uses the identical mapping.

use std::collections::BTreeMap;

use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

/// Property keys checked, in order, for a feature's region name.
const REGION_NAME_KEYS: [&str; 3] = ["Village", "village", "name"];

/// Incident-count intensity tier with a fixed color token.
///
/// Thresholds are evaluated highest-first and each lower bound is
/// exclusive: a count of exactly 100 lands in [`Self::High`] (`>50`),
/// not [`Self::Severe`] (`>100`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentTier {
    /// No incidents.
    None,
    /// 1-20 incidents.
    Low,
    /// 21-50 incidents.
    Moderate,
    /// 51-100 incidents.
    High,
    /// 101-500 incidents.
    Severe,
    /// More than 500 incidents.
    Extreme,
}

impl IncidentTier {
    /// Classifies a count into its tier, highest threshold first.
    #[must_use]
    pub const fn for_count(count: u64) -> Self {
        if count > 500 {
            Self::Extreme
        } else if count > 100 {
            Self::Severe
        } else if count > 50 {
            Self::High
        } else if count > 20 {
            Self::Moderate
        } else if count > 0 {
            Self::Low
        } else {
            Self::None
        }
    }

    /// The fill color token for this tier.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Extreme => "#7b2cbf",
            Self::Severe => "#5f0f40",
            Self::High => "#9a031e",
            Self::Moderate => "#fb5607",
            Self::Low => "#ffbe0b",
            Self::None => "#d0f4de",
        }
    }
}

/// The fill color token for a count. Every geographic count
/// visualization must share this one mapping.
#[must_use]
pub const fn color_for_count(count: u64) -> &'static str {
    IncidentTier::for_count(count).color()
}

/// A region joined with its incident count and fill color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionFill {
    /// Region display name (the join key).
    pub name: String,
    /// Incident count; 0 for regions absent from the count map.
    pub count: u64,
    /// Fill color token for the count's tier.
    pub color: String,
}

/// Extracts a feature's region name from its properties, trying
/// `Village`, `village`, then `name`.
#[must_use]
pub fn region_name(feature: &geojson::Feature) -> Option<&str> {
    let properties = feature.properties.as_ref()?;
    REGION_NAME_KEYS
        .iter()
        .find_map(|key| properties.get(*key).and_then(serde_json::Value::as_str))
        .filter(|name| !name.is_empty())
}

/// Joins a count-by-name map onto named boundary features.
///
/// The join is exact and case-sensitive; regions missing from the count
/// map get count 0 and the zero-tier color rather than an error state.
/// Features without a usable name property are skipped.
#[must_use]
pub fn join_counts(
    boundaries: &FeatureCollection,
    counts: &BTreeMap<String, u64>,
) -> Vec<RegionFill> {
    let mut skipped = 0_usize;
    let fills: Vec<RegionFill> = boundaries
        .features
        .iter()
        .filter_map(|feature| {
            let Some(name) = region_name(feature) else {
                skipped += 1;
                return None;
            };
            let count = counts.get(name).copied().unwrap_or(0);
            Some(RegionFill {
                name: name.to_string(),
                count,
                color: color_for_count(count).to_string(),
            })
        })
        .collect();

    if skipped > 0 {
        log::warn!("{skipped} boundary features had no usable name property");
    }
    fills
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_are_exclusive() {
        assert_eq!(IncidentTier::for_count(0), IncidentTier::None);
        assert_eq!(IncidentTier::for_count(1), IncidentTier::Low);
        assert_eq!(IncidentTier::for_count(20), IncidentTier::Low);
        assert_eq!(IncidentTier::for_count(21), IncidentTier::Moderate);
        assert_eq!(IncidentTier::for_count(50), IncidentTier::Moderate);
        assert_eq!(IncidentTier::for_count(51), IncidentTier::High);
        assert_eq!(IncidentTier::for_count(100), IncidentTier::High);
        assert_eq!(IncidentTier::for_count(101), IncidentTier::Severe);
        assert_eq!(IncidentTier::for_count(500), IncidentTier::Severe);
        assert_eq!(IncidentTier::for_count(501), IncidentTier::Extreme);
    }

    #[test]
    fn colors_match_tiers() {
        assert_eq!(color_for_count(0), "#d0f4de");
        assert_eq!(color_for_count(501), "#7b2cbf");
        assert_eq!(color_for_count(100), "#9a031e");
    }

    fn collection(features: serde_json::Value) -> FeatureCollection {
        serde_json::from_value(serde_json::json!({
            "type": "FeatureCollection",
            "features": features
        }))
        .unwrap()
    }

    #[test]
    fn joins_counts_with_zero_fallback() {
        let boundaries = collection(serde_json::json!([
            {
                "type": "Feature",
                "geometry": null,
                "properties": { "Village": "Amberi" }
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": { "village": "Bhedshi" }
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": { "name": "Chendvan" }
            }
        ]));

        let mut counts = BTreeMap::new();
        counts.insert("Amberi".to_string(), 30_u64);

        let fills = join_counts(&boundaries, &counts);
        assert_eq!(fills.len(), 3);
        assert_eq!(fills[0].name, "Amberi");
        assert_eq!(fills[0].count, 30);
        assert_eq!(fills[0].color, "#fb5607");
        assert_eq!(fills[1].count, 0);
        assert_eq!(fills[1].color, "#d0f4de");
        assert_eq!(fills[2].count, 0);
    }

    #[test]
    fn join_is_case_sensitive() {
        let boundaries = collection(serde_json::json!([
            {
                "type": "Feature",
                "geometry": null,
                "properties": { "Village": "amberi" }
            }
        ]));

        let mut counts = BTreeMap::new();
        counts.insert("Amberi".to_string(), 10_u64);

        let fills = join_counts(&boundaries, &counts);
        assert_eq!(fills[0].count, 0);
    }

    #[test]
    fn nameless_features_are_skipped() {
        let boundaries = collection(serde_json::json!([
            { "type": "Feature", "geometry": null, "properties": {} },
            { "type": "Feature", "geometry": null, "properties": { "Village": "" } }
        ]));

        let fills = join_counts(&boundaries, &BTreeMap::new());
        assert!(fills.is_empty());
    }
}
