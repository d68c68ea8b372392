#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Wildlife-conflict damage taxonomy and incident wire types.
//!
//! This crate defines the canonical damage-class taxonomy used across the
//! entire wildguard system, plus the incident records as the upstream
//! conflict service actually emits them (loosely typed fields, several
//! historical key spellings). Aggregation code normalizes raw labels into
//! the shared taxonomy via [`map_damage_class`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The four classes of harm a wildlife incident can cause.
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
pub enum DamageClass {
    /// Damage to standing crops or planted trees
    Crop,
    /// Livestock killed or injured
    Livestock,
    /// Damage to buildings, fences, or equipment
    Property,
    /// Human injury or death
    Human,
}

impl DamageClass {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Crop, Self::Livestock, Self::Property, Self::Human]
    }
}

/// Attempts to map a raw damage-class label from the upstream service to
/// the canonical taxonomy.
///
/// Uses keyword-based matching and is case-insensitive. Rules are checked
/// in declaration order and the first match wins, so a label containing
/// both "animal" and "human" classifies as [`DamageClass::Livestock`].
/// Returns `None` when no keyword matches; callers exclude such entries
/// from every tally rather than treating them as errors.
#[must_use]
pub fn map_damage_class(raw: &str) -> Option<DamageClass> {
    let lower = raw.to_lowercase();

    if contains_any(&lower, &["crop", "tree"]) {
        return Some(DamageClass::Crop);
    }
    if contains_any(&lower, &["livestock", "sheep", "animal"]) {
        return Some(DamageClass::Livestock);
    }
    if lower.contains("property") {
        return Some(DamageClass::Property);
    }
    if lower.contains("human") {
        return Some(DamageClass::Human);
    }

    None
}

/// Checks if `haystack` contains any of the given `needles`.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// A species reference as returned by the filter-options endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesOption {
    /// Upstream primary key, used to translate UI selections into query
    /// parameters.
    pub id: i64,
    /// User-facing species name (the join key for event filtering).
    pub common_name: String,
    /// Scientific name, when the upstream knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific: Option<String>,
}

/// The species field of an incident record.
///
/// Older upstream rows carry a bare name string; newer rows carry a
/// reference object. Both resolve to the same display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpeciesField {
    /// Bare species name.
    Name(String),
    /// Structured species reference.
    Reference(SpeciesRef),
}

impl SpeciesField {
    /// Returns the display name, or `None` when the field is an empty
    /// string (treated as missing, like the upstream UI does).
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        let name = match self {
            Self::Name(name) => name.as_str(),
            Self::Reference(species) => species.common_name.as_str(),
        };
        if name.is_empty() { None } else { Some(name) }
    }
}

/// Structured species reference embedded in incident records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRef {
    /// User-facing species name.
    pub common_name: String,
    /// Upstream primary key, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Scientific name, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific: Option<String>,
}

/// A single damage entry on an incident.
///
/// The raw class label and the loss amount each have several historical
/// key spellings and loose types; [`Damage::raw_class`] and
/// [`Damage::loss_amount`] encode the resolution order the data requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Damage {
    /// Raw damage-class label (normalized via [`map_damage_class`]).
    #[serde(default, alias = "class", skip_serializing_if = "Option::is_none")]
    pub damage_class: Option<String>,
    /// Nested item record some rows use instead of a top-level class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<DamageItem>,
    /// Estimated monetary loss. May be a number, a string with thousands
    /// separators, or null.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<serde_json::Value>,
    /// Legacy spelling of the loss field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub est_loss_val: Option<serde_json::Value>,
}

impl Damage {
    /// Resolves the raw class label: `damage_class`, then
    /// `item.damage_class`, then `item.name`.
    #[must_use]
    pub fn raw_class(&self) -> Option<&str> {
        if let Some(class) = self.damage_class.as_deref() {
            return Some(class);
        }
        let item = self.item.as_ref()?;
        item.damage_class.as_deref().or(item.name.as_deref())
    }

    /// Resolves the loss amount: `loss`, falling back to `est_loss_val`.
    #[must_use]
    pub fn loss_amount(&self) -> Option<&serde_json::Value> {
        self.loss.as_ref().or(self.est_loss_val.as_ref())
    }
}

/// Nested item record carried by some damage entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DamageItem {
    /// Raw damage-class label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_class: Option<String>,
    /// Item name, used as the class label when no explicit class exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A wildlife-conflict incident as returned by the filtered-summary
/// endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackEvent {
    /// Unique incident ID.
    #[serde(default)]
    pub id: i64,
    /// Date the incident occurred. Always parseable per the upstream
    /// contract.
    #[serde(alias = "occurredAt")]
    pub occurred_at: NaiveDate,
    /// Species involved, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<SpeciesField>,
    /// Damage entries. May be empty, in which case the event contributes
    /// zero to every damage tally.
    #[serde(default)]
    pub damages: Vec<Damage>,
}

impl AttackEvent {
    /// Returns the resolved species display name, if any.
    #[must_use]
    pub fn species_name(&self) -> Option<&str> {
        self.species.as_ref().and_then(SpeciesField::display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_keyword_labels() {
        assert_eq!(map_damage_class("Tree Damage"), Some(DamageClass::Crop));
        assert_eq!(map_damage_class("CROP LOSS"), Some(DamageClass::Crop));
        assert_eq!(map_damage_class("sheep killed"), Some(DamageClass::Livestock));
        assert_eq!(
            map_damage_class("Animal attack on cattle"),
            Some(DamageClass::Livestock)
        );
        assert_eq!(
            map_damage_class("property damage"),
            Some(DamageClass::Property)
        );
        assert_eq!(map_damage_class("Human Injury"), Some(DamageClass::Human));
    }

    #[test]
    fn first_match_wins() {
        // "animal" is checked before "human", so mixed labels land on
        // Livestock.
        assert_eq!(
            map_damage_class("human-animal conflict"),
            Some(DamageClass::Livestock)
        );
    }

    #[test]
    fn unmatched_labels_are_none() {
        assert_eq!(map_damage_class("vehicle collision"), None);
        assert_eq!(map_damage_class(""), None);
    }

    #[test]
    fn damage_class_resolution_order() {
        let top_level = Damage {
            damage_class: Some("Crop".to_string()),
            item: Some(DamageItem {
                damage_class: Some("Human".to_string()),
                name: None,
            }),
            ..Damage::default()
        };
        assert_eq!(top_level.raw_class(), Some("Crop"));

        let nested = Damage {
            item: Some(DamageItem {
                damage_class: None,
                name: Some("Livestock".to_string()),
            }),
            ..Damage::default()
        };
        assert_eq!(nested.raw_class(), Some("Livestock"));

        assert_eq!(Damage::default().raw_class(), None);
    }

    #[test]
    fn loss_falls_back_to_legacy_field() {
        let damage: Damage = serde_json::from_value(serde_json::json!({
            "damage_class": "Crop",
            "est_loss_val": "2,500"
        }))
        .unwrap();
        assert_eq!(
            damage.loss_amount(),
            Some(&serde_json::Value::String("2,500".to_string()))
        );
    }

    #[test]
    fn deserializes_bare_and_structured_species() {
        let bare: AttackEvent = serde_json::from_value(serde_json::json!({
            "id": 1,
            "occurred_at": "2024-01-15",
            "species": "Leopard",
            "damages": []
        }))
        .unwrap();
        assert_eq!(bare.species_name(), Some("Leopard"));

        let structured: AttackEvent = serde_json::from_value(serde_json::json!({
            "id": 2,
            "occurred_at": "2024-01-20",
            "species": { "common_name": "Gaur", "id": 7 },
            "damages": [{ "class": "Livestock", "loss": 1000 }]
        }))
        .unwrap();
        assert_eq!(structured.species_name(), Some("Gaur"));
        assert_eq!(structured.damages[0].raw_class(), Some("Livestock"));
    }

    #[test]
    fn empty_species_name_is_missing() {
        let event: AttackEvent = serde_json::from_value(serde_json::json!({
            "id": 3,
            "occurred_at": "2024-02-01",
            "species": ""
        }))
        .unwrap();
        assert_eq!(event.species_name(), None);
        assert!(event.damages.is_empty());
    }
}
