//! Cultivation-utilization slices for the district pie panel.

use wildguard_analytics_models::UtilizationSlice;
use wildguard_cultivation_models::CultivationTable;

/// Rounds to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of `total` that `used` represents, rounded to two
/// decimals.
///
/// Defined as `0.0` when `total` is zero (or the ratio is otherwise
/// non-finite), so a district with no recorded cultivated area can never
/// poison a chart with `NaN` or infinity.
#[must_use]
pub fn percent_utilized(used: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    let percent = used / total * 100.0;
    if percent.is_finite() { round2(percent) } else { 0.0 }
}

/// Computes one utilization slice per district holding data for
/// `year_label`.
///
/// Metrics are summed across every crop in the district's year entry;
/// districts without that year are omitted entirely (matching the source
/// table, where absence of a year means "not surveyed", not "zero").
#[must_use]
pub fn utilization_by_district(
    table: &CultivationTable,
    year_label: &str,
) -> Vec<UtilizationSlice> {
    table
        .0
        .iter()
        .filter_map(|(district, years)| {
            let crops = years.get(year_label)?;

            let mut total_cultivated = 0.0;
            let mut area_used = 0.0;
            for metrics in crops.values() {
                total_cultivated += metrics.total_cultivated_area;
                area_used += metrics.area_used;
            }

            Some(UtilizationSlice {
                district: district.clone(),
                total_cultivated,
                area_used,
                percent_used: percent_utilized(area_used, total_cultivated),
            })
        })
        .collect()
}
