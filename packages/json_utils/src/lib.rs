#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Lenient numeric coercion helpers for loosely-typed upstream JSON.
//!
//! The upstream services mix numbers, formatted strings (`"2,500"`),
//! nulls, and missing fields within the same numeric columns. Every
//! coercion here is total: malformed input becomes `0.0` so a single bad
//! field can never corrupt a downstream sum.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerces a JSON value into a finite `f64`.
///
/// * `Null` → `0.0`
/// * numbers pass through when finite, otherwise `0.0`
/// * strings are trimmed, thousands separators (`,` and spaces) are
///   stripped, then parsed; anything unparseable → `0.0`
/// * booleans, arrays, and objects → `0.0`
#[must_use]
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(num) => num.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(text) => {
            let cleaned: String = text.trim().chars().filter(|c| *c != ',' && *c != ' ').collect();
            cleaned
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .unwrap_or(0.0)
        }
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => 0.0,
    }
}

/// Coerces an optional JSON value into a finite `f64`. Absent → `0.0`.
#[must_use]
pub fn to_number_opt(value: Option<&Value>) -> f64 {
    value.map_or(0.0, to_number)
}

/// Serde deserializer for numeric fields the upstream may send as
/// numbers, formatted strings, or null.
///
/// Pair with `#[serde(default)]` so absent fields also become `0.0`.
///
/// # Errors
///
/// Returns a deserialization error only when the field is not valid JSON
/// at all; every representable value coerces.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(to_number(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_null_and_empty() {
        assert!((to_number(&Value::Null) - 0.0).abs() < f64::EPSILON);
        assert!((to_number(&json!("")) - 0.0).abs() < f64::EPSILON);
        assert!((to_number_opt(None) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn strips_thousands_separators() {
        assert!((to_number(&json!("2,500")) - 2500.0).abs() < f64::EPSILON);
        assert!((to_number(&json!(" 1,234.56 ")) - 1234.56).abs() < f64::EPSILON);
        assert!((to_number(&json!("12 000")) - 12000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn passes_finite_numbers_through() {
        assert!((to_number(&json!(1000)) - 1000.0).abs() < f64::EPSILON);
        assert!((to_number(&json!(-3.5)) - -3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_values_become_zero() {
        assert!((to_number(&json!("not a number")) - 0.0).abs() < f64::EPSILON);
        assert!((to_number(&json!(true)) - 0.0).abs() < f64::EPSILON);
        assert!((to_number(&json!([1, 2])) - 0.0).abs() < f64::EPSILON);
        assert!((to_number(&json!({"a": 1})) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn result_is_always_finite() {
        for value in [
            json!(f64::MAX),
            json!("1e309"),
            json!("-inf"),
            json!("NaN"),
        ] {
            assert!(to_number(&value).is_finite());
        }
    }

    #[test]
    fn lenient_deserializer_accepts_mixed_types() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "super::lenient_f64")]
            value: f64,
        }

        let parsed: Row = serde_json::from_value(json!({ "value": "1,000" })).unwrap();
        assert!((parsed.value - 1000.0).abs() < f64::EPSILON);

        let absent: Row = serde_json::from_value(json!({})).unwrap();
        assert!((absent.value - 0.0).abs() < f64::EPSILON);
    }
}
