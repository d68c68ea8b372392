#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation input and chart-series result types.
//!
//! Every view panel (timeline chart, summary cards, utilization pie,
//! trend graph) consumes these shapes from the one shared pipeline, so
//! chart and card totals can never drift apart.

use serde::{Deserialize, Serialize};
use wildguard_conflict_models::DamageClass;

/// Calendar scope for timeline bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PeriodFilter {
    /// Every month between the earliest and latest event, inclusive.
    All,
    /// The twelve months of one calendar year.
    Year {
        /// Calendar year.
        year: i32,
    },
    /// A single calendar month.
    Month {
        /// Calendar year.
        year: i32,
        /// Month of year, 1-based.
        month: u32,
    },
}

/// One calendar-month bucket in a timeline series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBucket {
    /// Zero-padded `YYYY-MM` period key; lexicographic order is
    /// chronological order.
    pub period: String,
    /// Display label (`"Jan 2024"`, or `"Jan"` in year mode).
    pub label: String,
    /// Number of incidents in this period.
    pub count: u64,
}

/// KPI figures derived from a timeline series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStats {
    /// Incidents counted across all seeded buckets.
    pub total: u64,
    /// Buckets with at least one incident.
    pub months_with_data: u64,
    /// `round(total / months_with_data)`, 0 when no month has data.
    pub monthly_average: u64,
    /// Highest-count bucket; earliest wins ties; `None` when every
    /// bucket is zero.
    pub peak: Option<TimelineBucket>,
}

/// A complete timeline panel payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Buckets after the sparse-view display collapse.
    pub buckets: Vec<TimelineBucket>,
    /// KPI figures over the full seeded series.
    pub stats: TimelineStats,
}

/// Incident counts per damage class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DamageCounts {
    /// Crop / tree damage entries.
    pub crop: u64,
    /// Livestock damage entries.
    pub livestock: u64,
    /// Property damage entries.
    pub property: u64,
    /// Human injury entries.
    pub human: u64,
}

impl DamageCounts {
    /// Returns the count for one class.
    #[must_use]
    pub const fn get(&self, class: DamageClass) -> u64 {
        match class {
            DamageClass::Crop => self.crop,
            DamageClass::Livestock => self.livestock,
            DamageClass::Property => self.property,
            DamageClass::Human => self.human,
        }
    }

    /// Increments the count for one class.
    pub const fn increment(&mut self, class: DamageClass) {
        match class {
            DamageClass::Crop => self.crop += 1,
            DamageClass::Livestock => self.livestock += 1,
            DamageClass::Property => self.property += 1,
            DamageClass::Human => self.human += 1,
        }
    }
}

/// The most frequent species in a summary window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesShare {
    /// Species display name.
    pub name: String,
    /// Incidents attributed to this species.
    pub count: u64,
    /// Share of all incidents, percent rounded to 2 decimals.
    pub percent_of_incidents: f64,
}

/// Summary-card payload for a filtered incident window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictSummary {
    /// Total incidents in the window.
    pub incident_count: u64,
    /// Damage entries tallied per normalized class.
    pub damage_counts: DamageCounts,
    /// Monetary losses summed across every damage entry.
    pub total_loss: f64,
    /// Most frequent species, when any event names one.
    pub primary_species: Option<SpeciesShare>,
}

/// One district's cultivation-utilization slice for a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationSlice {
    /// District name.
    pub district: String,
    /// Total cultivated area summed across crops, hectares.
    pub total_cultivated: f64,
    /// Utilized area summed across crops, hectares.
    pub area_used: f64,
    /// `percent_utilized(area_used, total_cultivated)`.
    pub percent_used: f64,
}

/// One year's value in a cultivation trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Year label (e.g. `"2020-21"`).
    pub year_label: String,
    /// Metric value; 0 when the district/year/crop combination is
    /// missing.
    pub value: f64,
}

/// A cultivation metric series for one district and crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    /// District name.
    pub district: String,
    /// Crop name.
    pub crop: String,
    /// Legend label (`"Kudal - Mango"`).
    pub label: String,
    /// Values aligned on the shared year-label axis.
    pub points: Vec<TrendPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_counts_round_trip_by_class() {
        let mut counts = DamageCounts::default();
        for class in DamageClass::all() {
            counts.increment(*class);
            counts.increment(*class);
        }
        for class in DamageClass::all() {
            assert_eq!(counts.get(*class), 2);
        }
    }

    #[test]
    fn period_filter_serializes_tagged() {
        let json = serde_json::to_value(PeriodFilter::Month { year: 2024, month: 5 }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "mode": "month", "year": 2024, "month": 5 })
        );
    }
}
