//! Forgiving serde helpers for backend payloads.
//!
//! The backend is loosely typed: numbers sometimes arrive as strings, flags
//! as `null`, dates in more than one layout. A single odd field must not
//! reject a whole match list, so these helpers degrade to `None`/defaults.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a value, falling back to `T::default()` on `null` or a wrong shape
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(from_value_lossy).unwrap_or_default())
}

/// Optional nested object; `null` or a wrong shape becomes `None`
pub fn opt_struct<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(from_value_lossy))
}

/// List where elements that fail to decode are dropped, not the whole list
pub fn vec_lossy<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.into_iter().filter_map(from_value_lossy).collect(),
        _ => Vec::new(),
    })
}

/// Optional text from a string or a number; blank strings become `None`
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Optional float from a JSON number or numeric string
pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

/// Optional non-negative integer (goals, minutes, corner counts)
pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32))
}

/// Optional UTC instant; anything unparseable becomes `None`
pub fn opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse_instant(&s),
        _ => None,
    })
}

/// Boolean flag where `null`, missing or non-boolean means `false`
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(Value::Bool(true))))
}

/// Identifier that may be sent as a string or a number
pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Parse an RFC 3339 timestamp, or a naive `YYYY-MM-DD HH:MM:SS` read as UTC
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn from_value_lossy<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    serde_json::from_value(value).ok()
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|n: &f64| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "opt_f64")]
        pct: Option<f64>,
        #[serde(default, deserialize_with = "opt_u32")]
        goals: Option<u32>,
        #[serde(default, deserialize_with = "opt_datetime")]
        date: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "flag")]
        featured: bool,
        #[serde(default, deserialize_with = "id")]
        id: String,
    }

    fn sample(json: &str) -> Sample {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_numbers_accept_strings() {
        let p = sample(r#"{"pct": "55.5", "goals": "2"}"#);
        assert_eq!(p.pct, Some(55.5));
        assert_eq!(p.goals, Some(2));
    }

    #[test]
    fn test_bad_values_degrade_to_none() {
        let p = sample(r#"{"pct": "n/a", "goals": -1, "date": "yesterday", "featured": null, "id": null}"#);
        assert_eq!(p.pct, None);
        assert_eq!(p.goals, None);
        assert_eq!(p.date, None);
        assert!(!p.featured);
        assert!(p.id.is_empty());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let p = sample("{}");
        assert_eq!(p.pct, None);
        assert!(!p.featured);
    }

    #[test]
    fn test_parse_instant_layouts() {
        let rfc = parse_instant("2026-03-29T14:00:00+01:00").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2026-03-29T13:00:00+00:00");

        let naive = parse_instant("2026-03-29 13:00:00").unwrap();
        assert_eq!(naive, rfc);

        let millis = parse_instant("2026-03-29T13:00:00.000").unwrap();
        assert_eq!(millis, rfc);
    }

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Inner {
        n: u32,
    }

    #[derive(Debug, Deserialize)]
    struct Nested {
        #[serde(default, deserialize_with = "opt_struct")]
        inner: Option<Inner>,
        #[serde(default, deserialize_with = "or_default")]
        fallback: Inner,
        #[serde(default, deserialize_with = "vec_lossy")]
        items: Vec<Inner>,
        #[serde(default, deserialize_with = "opt_string")]
        label: Option<String>,
    }

    #[test]
    fn test_wrong_shapes_degrade_per_field() {
        let nested: Nested = serde_json::from_str(
            r#"{"inner": "pending", "fallback": "x", "items": [{"n": 1}, "junk", {"n": "x"}, {"n": 3}], "label": 7}"#,
        )
        .unwrap();

        assert_eq!(nested.inner, None);
        assert_eq!(nested.fallback, Inner::default());
        assert_eq!(nested.items, vec![Inner { n: 1 }, Inner { n: 3 }]);
        assert_eq!(nested.label.as_deref(), Some("7"));
    }

    #[test]
    fn test_nested_happy_path() {
        let nested: Nested =
            serde_json::from_str(r#"{"inner": {"n": 2}, "fallback": {"n": 5}, "items": "none", "label": " "}"#)
                .unwrap();

        assert_eq!(nested.inner, Some(Inner { n: 2 }));
        assert_eq!(nested.fallback, Inner { n: 5 });
        assert!(nested.items.is_empty());
        assert_eq!(nested.label, None);
    }

    #[test]
    fn test_numeric_id() {
        let p = sample(r#"{"id": 1035012}"#);
        assert_eq!(p.id, "1035012");
    }
}
