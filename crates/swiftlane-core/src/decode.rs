//! # Lenient Field Decoding
//!
//! `deserialize_with` helpers for backend records.
//!
//! The backend is loosely typed: ids arrive as numbers or numeric strings,
//! amounts as numbers, strings or null, timestamps in whatever form its JSON
//! encoder picked. Each helper turns one of those into a typed field.
//!
//! ```text
//! ┌───────────────────────┬───────────────────────────┬──────────────────┐
//! │ Helper                │ Accepts                   │ On malformed     │
//! ├───────────────────────┼───────────────────────────┼──────────────────┤
//! │ id                    │ 7, 7.0, "7"               │ record rejected  │
//! │ opt_id                │ same, or null             │ None             │
//! │ opt_text              │ string, number, or null   │ None             │
//! │ opt_number            │ 4.5, "4.5", or null       │ None             │
//! │ opt_timestamp         │ RFC 2822, RFC 3339, naive │ None             │
//! │ availability          │ bool, 0/1, "true"/"false" │ true             │
//! └───────────────────────┴───────────────────────────┴──────────────────┘
//! ```
//!
//! Only `id` rejects a record, and only menu items use it. Every other field,
//! record ids included, degrades to "absent".

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::DataShapeError;

// =============================================================================
// Value Parsers
// =============================================================================

/// Parses a record id from a JSON value.
pub fn parse_id(value: &Value) -> Result<i64, DataShapeError> {
    match value {
        Value::Null => Err(DataShapeError::Absent),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or_else(|| DataShapeError::Unparseable {
                expected: "id",
                value: n.to_string(),
            }),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| DataShapeError::Unparseable {
            expected: "id",
            value: s.clone(),
        }),
        other => Err(DataShapeError::WrongType {
            expected: "id",
            found: type_name(other),
        }),
    }
}

/// Parses a finite decimal (ratings, coordinates) from a JSON value.
pub fn parse_number(value: &Value) -> Result<f64, DataShapeError> {
    let parsed = match value {
        Value::Null => return Err(DataShapeError::Absent),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        other => {
            return Err(DataShapeError::WrongType {
                expected: "number",
                found: type_name(other),
            })
        }
    };

    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| DataShapeError::Unparseable {
            expected: "number",
            value: value.to_string(),
        })
}

/// Parses a timestamp in any of the forms the backend emits.
///
/// Naive timestamps are taken as UTC.
pub fn parse_timestamp(value: &Value) -> Result<DateTime<Utc>, DataShapeError> {
    let text = match value {
        Value::Null => return Err(DataShapeError::Absent),
        Value::String(s) => s.trim(),
        other => {
            return Err(DataShapeError::WrongType {
                expected: "timestamp",
                found: type_name(other),
            })
        }
    };

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(DataShapeError::Unparseable {
        expected: "timestamp",
        value: text.to_string(),
    })
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Serde Adapters
// =============================================================================

/// Required id. A malformed id fails the record.
pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    parse_id(&value).map_err(serde::de::Error::custom)
}

/// Optional id: record ids and foreign keys.
pub fn opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| parse_id(&v).ok()))
}

/// Optional text. Numbers are rendered, blank strings are absent.
pub fn opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Required display name. Absent or non-text names become empty.
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(opt_text(deserializer)?.unwrap_or_default())
}

/// Optional decimal (ratings).
pub fn opt_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| parse_number(&v).ok()))
}

/// Optional timestamp.
pub fn opt_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| parse_timestamp(&v).ok()))
}

/// Optional status string mapped through `From<String>`.
pub fn opt_status<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    Ok(opt_text(deserializer)?.map(T::from))
}

/// Menu item availability. Anything unrecognised counts as available.
pub fn availability<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "false" | "0" | "no"
        ),
        _ => true,
    })
}

/// Default for serde when the availability field is missing.
pub fn available() -> bool {
    true
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_parse_id_shapes() {
        assert_eq!(parse_id(&json!(7)), Ok(7));
        assert_eq!(parse_id(&json!(7.0)), Ok(7));
        assert_eq!(parse_id(&json!(" 12 ")), Ok(12));
        assert_eq!(parse_id(&json!(null)), Err(DataShapeError::Absent));
        assert!(parse_id(&json!(7.5)).is_err());
        assert!(parse_id(&json!("seven")).is_err());
        assert!(matches!(
            parse_id(&json!({})),
            Err(DataShapeError::WrongType { found: "object", .. })
        ));
    }

    #[test]
    fn test_parse_number_rejects_garbage() {
        assert_eq!(parse_number(&json!(4.5)), Ok(4.5));
        assert_eq!(parse_number(&json!("4.2")), Ok(4.2));
        assert!(parse_number(&json!("high")).is_err());
        assert!(parse_number(&json!(true)).is_err());
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let rfc2822 = parse_timestamp(&json!("Tue, 02 Jan 2024 10:30:00 GMT")).unwrap();
        assert_eq!((rfc2822.year(), rfc2822.month(), rfc2822.day()), (2024, 1, 2));
        assert_eq!(rfc2822.hour(), 10);

        let rfc3339 = parse_timestamp(&json!("2024-01-02T10:30:00+05:30")).unwrap();
        assert_eq!(rfc3339.hour(), 5);

        let naive = parse_timestamp(&json!("2024-01-02 10:30:00")).unwrap();
        assert_eq!(naive.minute(), 30);

        assert!(parse_timestamp(&json!("yesterday")).is_err());
        assert_eq!(parse_timestamp(&json!(null)), Err(DataShapeError::Absent));
    }
}
