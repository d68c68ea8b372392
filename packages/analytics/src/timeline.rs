//! Calendar-month bucketing for the incident timeline panel.
//!
//! Buckets are seeded for every month in the active range before any
//! event is counted, so empty periods render as zeros instead of gaps.
//! Events whose month falls outside the seeded range are dropped
//! silently: the range is derived from data, so this only happens when
//! a filter changes under an in-flight fetch.

use std::collections::BTreeMap;

use chrono::Datelike;
use wildguard_analytics_models::{PeriodFilter, Timeline, TimelineBucket, TimelineStats};
use wildguard_conflict_models::AttackEvent;

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Zero-padded `YYYY-MM` key; lexicographic order is chronological.
fn period_key(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

/// Display label for a period. Year mode omits the year since the axis
/// already states it.
fn period_label(filter: PeriodFilter, year: i32, month: u32) -> String {
    let abbrev = MONTH_ABBREV[(month - 1) as usize];
    match filter {
        PeriodFilter::Year { .. } => abbrev.to_string(),
        PeriodFilter::All | PeriodFilter::Month { .. } => format!("{abbrev} {year}"),
    }
}

/// Advances a `(year, month)` pair by one calendar month.
const fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// Groups events into calendar-month buckets for the given scope.
///
/// * `All` seeds one bucket per month between the earliest and latest
///   `occurred_at`, inclusive; an empty event list seeds nothing.
/// * `Year` seeds exactly twelve buckets.
/// * `Month` seeds exactly one bucket (`month` is 1-based).
///
/// Each event increments the bucket matching its year and month; events
/// outside the seeded range are ignored. Buckets come back in ascending
/// period order, zero counts included.
#[must_use]
pub fn bucket_by_period(events: &[AttackEvent], filter: PeriodFilter) -> Vec<TimelineBucket> {
    let mut seeded: BTreeMap<(i32, u32), u64> = BTreeMap::new();

    match filter {
        PeriodFilter::All => {
            let months = events
                .iter()
                .map(|event| (event.occurred_at.year(), event.occurred_at.month()));
            let Some(first) = months.clone().min() else {
                return Vec::new();
            };
            let last = months.max().unwrap_or(first);

            let mut cursor = first;
            while cursor <= last {
                seeded.insert(cursor, 0);
                cursor = next_month(cursor.0, cursor.1);
            }
        }
        PeriodFilter::Year { year } => {
            for month in 1..=12 {
                seeded.insert((year, month), 0);
            }
        }
        PeriodFilter::Month { year, month } => {
            seeded.insert((year, month.clamp(1, 12)), 0);
        }
    }

    let mut dropped = 0_u64;
    for event in events {
        let key = (event.occurred_at.year(), event.occurred_at.month());
        if let Some(count) = seeded.get_mut(&key) {
            *count += 1;
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        log::debug!("{dropped} events fell outside the seeded {filter:?} range");
    }

    seeded
        .into_iter()
        .map(|((year, month), count)| TimelineBucket {
            period: period_key(year, month),
            label: period_label(filter, year, month),
            count,
        })
        .collect()
}

/// Applies the sparse-view display policy.
///
/// * `All`: keep non-zero buckets; if every bucket is zero, fall back to
///   the first twelve seeded buckets so the chart never renders empty.
/// * `Year`: keep non-zero buckets; if every bucket is zero, keep all
///   twelve.
/// * `Month`: unchanged.
#[must_use]
pub fn collapse_for_display(
    filter: PeriodFilter,
    buckets: &[TimelineBucket],
) -> Vec<TimelineBucket> {
    match filter {
        PeriodFilter::All => {
            let non_empty: Vec<TimelineBucket> =
                buckets.iter().filter(|b| b.count > 0).cloned().collect();
            if non_empty.is_empty() {
                buckets.iter().take(12).cloned().collect()
            } else {
                non_empty
            }
        }
        PeriodFilter::Year { .. } => {
            let non_empty: Vec<TimelineBucket> =
                buckets.iter().filter(|b| b.count > 0).cloned().collect();
            if non_empty.is_empty() {
                buckets.to_vec()
            } else {
                non_empty
            }
        }
        PeriodFilter::Month { .. } => buckets.to_vec(),
    }
}

/// Derives the KPI figures from a seeded bucket series.
///
/// The total is the sum of bucket counts (in-range events only) so the
/// stat tiles always agree with the chart they sit under. The peak bucket
/// is the first one holding the highest non-zero count.
#[must_use]
pub fn timeline_stats(seeded: &[TimelineBucket]) -> TimelineStats {
    let total: u64 = seeded.iter().map(|b| b.count).sum();
    let months_with_data = seeded.iter().filter(|b| b.count > 0).count() as u64;

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let monthly_average = if months_with_data == 0 {
        0
    } else {
        (total as f64 / months_with_data as f64).round() as u64
    };

    let mut peak: Option<&TimelineBucket> = None;
    for bucket in seeded {
        if bucket.count > peak.map_or(0, |p| p.count) {
            peak = Some(bucket);
        }
    }

    TimelineStats {
        total,
        months_with_data,
        monthly_average,
        peak: peak.cloned(),
    }
}

/// Buckets, collapses, and summarizes in one call: the full timeline
/// panel payload.
#[must_use]
pub fn build_timeline(events: &[AttackEvent], filter: PeriodFilter) -> Timeline {
    let seeded = bucket_by_period(events, filter);
    let stats = timeline_stats(&seeded);
    Timeline {
        buckets: collapse_for_display(filter, &seeded),
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(id: i64, date: &str) -> AttackEvent {
        AttackEvent {
            id,
            occurred_at: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            species: None,
            damages: Vec::new(),
        }
    }

    #[test]
    fn all_mode_seeds_every_month_in_range() {
        let events = vec![
            event(1, "2023-11-20"),
            event(2, "2024-02-05"),
            event(3, "2024-02-10"),
        ];
        let buckets = bucket_by_period(&events, PeriodFilter::All);

        let periods: Vec<&str> = buckets.iter().map(|b| b.period.as_str()).collect();
        assert_eq!(periods, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);

        let counts: Vec<u64> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 0, 2]);

        // Every event in range is counted exactly once.
        assert_eq!(buckets.iter().map(|b| b.count).sum::<u64>(), 3);
    }

    #[test]
    fn all_mode_with_no_events_seeds_nothing() {
        assert!(bucket_by_period(&[], PeriodFilter::All).is_empty());
    }

    #[test]
    fn year_mode_seeds_twelve_and_drops_out_of_range() {
        let events = vec![
            event(1, "2024-03-15"),
            event(2, "2024-03-20"),
            event(3, "2023-03-20"), // outside the seeded year
        ];
        let buckets = bucket_by_period(&events, PeriodFilter::Year { year: 2024 });

        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].period, "2024-01");
        assert_eq!(buckets[2].count, 2);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<u64>(), 2);
        // Year mode labels omit the year.
        assert_eq!(buckets[2].label, "Mar");
    }

    #[test]
    fn month_mode_seeds_one_bucket() {
        let events = vec![event(1, "2024-05-02"), event(2, "2024-06-02")];
        let buckets = bucket_by_period(&events, PeriodFilter::Month { year: 2024, month: 5 });

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].period, "2024-05");
        assert_eq!(buckets[0].label, "May 2024");
        assert_eq!(buckets[0].count, 1);
    }

    #[test]
    fn december_rolls_into_january() {
        let events = vec![event(1, "2023-12-30"), event(2, "2024-01-02")];
        let buckets = bucket_by_period(&events, PeriodFilter::All);
        let periods: Vec<&str> = buckets.iter().map(|b| b.period.as_str()).collect();
        assert_eq!(periods, vec!["2023-12", "2024-01"]);
    }

    #[test]
    fn collapse_drops_zero_months_in_all_mode() {
        let events = vec![event(1, "2023-01-10"), event(2, "2024-01-10")];
        let seeded = bucket_by_period(&events, PeriodFilter::All);
        assert_eq!(seeded.len(), 13);

        let displayed = collapse_for_display(PeriodFilter::All, &seeded);
        assert_eq!(displayed.len(), 2);
        assert!(displayed.iter().all(|b| b.count > 0));
    }

    #[test]
    fn collapse_falls_back_when_year_is_empty() {
        let seeded = bucket_by_period(&[], PeriodFilter::Year { year: 2024 });
        let displayed = collapse_for_display(PeriodFilter::Year { year: 2024 }, &seeded);
        assert_eq!(displayed.len(), 12);
    }

    #[test]
    fn stats_average_and_peak() {
        let events = vec![
            event(1, "2024-01-05"),
            event(2, "2024-01-15"),
            event(3, "2024-01-25"),
            event(4, "2024-03-10"),
        ];
        let seeded = bucket_by_period(&events, PeriodFilter::Year { year: 2024 });
        let stats = timeline_stats(&seeded);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.months_with_data, 2);
        assert_eq!(stats.monthly_average, 2);
        assert_eq!(stats.peak.unwrap().period, "2024-01");
    }

    #[test]
    fn peak_tie_goes_to_earliest_month() {
        let events = vec![event(1, "2024-02-05"), event(2, "2024-04-05")];
        let seeded = bucket_by_period(&events, PeriodFilter::Year { year: 2024 });
        let stats = timeline_stats(&seeded);
        assert_eq!(stats.peak.unwrap().period, "2024-02");
    }

    #[test]
    fn stats_of_empty_series_are_zero() {
        let stats = timeline_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.monthly_average, 0);
        assert!(stats.peak.is_none());
    }
}
