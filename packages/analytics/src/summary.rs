//! Summary-card aggregation over a filtered incident window.

use wildguard_analytics_models::{ConflictSummary, DamageCounts, SpeciesShare};
use wildguard_conflict_models::{AttackEvent, map_damage_class};
use wildguard_json_utils::to_number_opt;

use crate::utilization::round2;

/// Counts items by the key `key_fn` derives, in first-encountered key
/// order.
///
/// Items for which `key_fn` returns `None` are excluded. The stable
/// ordering is the substrate for every "most frequent" read-out: ranking
/// ties resolve to the key seen earliest, never arbitrarily.
pub fn tally_by<T, K: PartialEq>(
    items: &[T],
    mut key_fn: impl FnMut(&T) -> Option<K>,
) -> Vec<(K, u64)> {
    let mut tallies: Vec<(K, u64)> = Vec::new();
    for item in items {
        let Some(key) = key_fn(item) else { continue };
        match tallies.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, count)) => *count += 1,
            None => tallies.push((key, 1)),
        }
    }
    tallies
}

/// Aggregates a filtered incident window into the summary-card payload.
///
/// * Species: one count per event by resolved display name; events
///   without a name are skipped; the primary species is the highest
///   count with earliest-seen winning ties.
/// * Damage classes: every damage entry contributes to its normalized
///   class independently, so one event can count toward several classes
///   (or toward the same class more than once). Unrecognized labels
///   count nowhere.
/// * Loss: coerced and summed across every damage entry, independent of
///   the class tally.
#[must_use]
pub fn summarize(events: &[AttackEvent]) -> ConflictSummary {
    let incident_count = events.len() as u64;

    let species_tally = tally_by(events, |event| {
        event.species_name().map(str::to_string)
    });

    let mut damage_counts = DamageCounts::default();
    let mut total_loss = 0.0;
    for event in events {
        for damage in &event.damages {
            if let Some(class) = damage.raw_class().and_then(map_damage_class) {
                damage_counts.increment(class);
            }
            total_loss += to_number_opt(damage.loss_amount());
        }
    }

    let mut primary: Option<&(String, u64)> = None;
    for entry in &species_tally {
        if entry.1 > primary.map_or(0, |p| p.1) {
            primary = Some(entry);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let primary_species = primary.map(|(name, count)| SpeciesShare {
        name: name.clone(),
        count: *count,
        percent_of_incidents: if incident_count == 0 {
            0.0
        } else {
            round2(*count as f64 / incident_count as f64 * 100.0)
        },
    });

    ConflictSummary {
        incident_count,
        damage_counts,
        total_loss,
        primary_species,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use wildguard_conflict_models::SpeciesField;

    fn event(id: i64, date: &str, species: Option<&str>, damages: serde_json::Value) -> AttackEvent {
        AttackEvent {
            id,
            occurred_at: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            species: species.map(|name| SpeciesField::Name(name.to_string())),
            damages: serde_json::from_value(damages).unwrap(),
        }
    }

    #[test]
    fn two_event_scenario() {
        let events = vec![
            event(
                1,
                "2024-01-15",
                Some("Elephant"),
                json!([{ "damage_class": "Tree Damage", "loss": 1000 }]),
            ),
            event(
                2,
                "2024-01-20",
                Some("Leopard"),
                json!([{ "damage_class": "Livestock", "loss": "2,500" }]),
            ),
        ];

        let summary = summarize(&events);
        assert_eq!(summary.incident_count, 2);
        assert_eq!(summary.damage_counts.crop, 1);
        assert_eq!(summary.damage_counts.livestock, 1);
        assert_eq!(summary.damage_counts.property, 0);
        assert_eq!(summary.damage_counts.human, 0);
        assert!((summary.total_loss - 3500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn one_event_can_count_toward_several_classes() {
        let events = vec![event(
            1,
            "2024-02-01",
            None,
            json!([
                { "damage_class": "Crop Damage", "loss": 100 },
                { "damage_class": "Property", "loss": null },
                { "damage_class": "dispute resolution" }
            ]),
        )];

        let summary = summarize(&events);
        assert_eq!(summary.damage_counts.crop, 1);
        assert_eq!(summary.damage_counts.property, 1);
        // The unrecognized entry counts nowhere but its (null) loss is
        // still absorbed as zero.
        assert!((summary.total_loss - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn primary_species_tie_goes_to_first_encountered() {
        let events = vec![
            event(1, "2024-01-01", Some("Gaur"), json!([])),
            event(2, "2024-01-02", Some("Monkey"), json!([])),
            event(3, "2024-01-03", Some("Monkey"), json!([])),
            event(4, "2024-01-04", Some("Gaur"), json!([])),
        ];

        let summary = summarize(&events);
        let primary = summary.primary_species.unwrap();
        assert_eq!(primary.name, "Gaur");
        assert_eq!(primary.count, 2);
        assert!((primary.percent_of_incidents - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn events_without_species_are_skipped() {
        let events = vec![
            event(1, "2024-01-01", None, json!([])),
            event(2, "2024-01-02", None, json!([])),
        ];
        let summary = summarize(&events);
        assert_eq!(summary.incident_count, 2);
        assert!(summary.primary_species.is_none());
    }

    #[test]
    fn tally_by_preserves_first_encounter_order() {
        let items = ["b", "a", "b", "c", "a", "b"];
        let tallies = tally_by(&items, |item| Some(*item));
        assert_eq!(tallies, vec![("b", 3), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn empty_window_is_all_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.incident_count, 0);
        assert_eq!(summary.damage_counts, DamageCounts::default());
        assert!((summary.total_loss - 0.0).abs() < f64::EPSILON);
        assert!(summary.primary_species.is_none());
    }
}
