//! Cultivation metric trends across years, per district and crop.

use std::collections::BTreeSet;

use wildguard_analytics_models::{TrendPoint, TrendSeries};
use wildguard_cultivation_models::{CropMetric, CultivationTable};

/// Builds one metric series per `district × crop` combination.
///
/// Every series is aligned on the sorted union of year labels across the
/// selected districts, with absent district/year/crop values filled with
/// zero so multi-series charts share a single axis.
#[must_use]
pub fn metric_trend(
    table: &CultivationTable,
    districts: &[String],
    crops: &[String],
    metric: CropMetric,
) -> Vec<TrendSeries> {
    let year_axis: BTreeSet<&str> = table
        .0
        .iter()
        .filter(|(district, _)| districts.iter().any(|d| d == *district))
        .flat_map(|(_, years)| years.keys().map(String::as_str))
        .collect();

    let mut series = Vec::with_capacity(districts.len() * crops.len());
    for district in districts {
        for crop in crops {
            let points: Vec<TrendPoint> = year_axis
                .iter()
                .map(|year_label| TrendPoint {
                    year_label: (*year_label).to_string(),
                    value: table.metric_value(district, year_label, crop, metric),
                })
                .collect();

            series.push(TrendSeries {
                label: format!("{district} - {crop}"),
                district: district.clone(),
                crop: crop.clone(),
                points,
            });
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_table() -> CultivationTable {
        serde_json::from_value(json!({
            "Kudal": {
                "2020-21": { "Mango": { "Total Cultivated Area (hectares)": 100 } },
                "2021-22": { "Mango": { "Total Cultivated Area (hectares)": 120 } }
            },
            "Sawantwadi": {
                "2021-22": { "Mango": { "Total Cultivated Area (hectares)": 80 } }
            }
        }))
        .unwrap()
    }

    #[test]
    fn series_per_district_crop_pair() {
        let table = sample_table();
        let series = metric_trend(
            &table,
            &["Kudal".to_string(), "Sawantwadi".to_string()],
            &["Mango".to_string()],
            CropMetric::TotalCultivatedArea,
        );

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "Kudal - Mango");
        assert_eq!(series[1].label, "Sawantwadi - Mango");
    }

    #[test]
    fn series_share_the_year_axis_with_zero_fill() {
        let table = sample_table();
        let series = metric_trend(
            &table,
            &["Kudal".to_string(), "Sawantwadi".to_string()],
            &["Mango".to_string()],
            CropMetric::TotalCultivatedArea,
        );

        // Sawantwadi has no 2020-21 entry, but its series still carries
        // the year at zero so both lines share one axis.
        let sawantwadi = &series[1];
        assert_eq!(sawantwadi.points.len(), 2);
        assert_eq!(sawantwadi.points[0].year_label, "2020-21");
        assert!((sawantwadi.points[0].value - 0.0).abs() < f64::EPSILON);
        assert!((sawantwadi.points[1].value - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_crop_is_all_zeros() {
        let table = sample_table();
        let series = metric_trend(
            &table,
            &["Kudal".to_string()],
            &["Jackfruit".to_string()],
            CropMetric::TotalCultivatedArea,
        );
        assert!(series[0].points.iter().all(|p| p.value == 0.0));
    }

    #[test]
    fn no_districts_means_no_series() {
        let table = sample_table();
        let series = metric_trend(&table, &[], &["Mango".to_string()], CropMetric::AreaUsed);
        assert!(series.is_empty());
    }
}
