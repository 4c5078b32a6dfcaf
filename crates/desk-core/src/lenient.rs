//! Field deserializers for a loosely typed backend.
//!
//! Flags arrive as `true`, `1` or `"1"`; timestamps arrive as RFC 3339 or as
//! `YYYY-MM-DD HH:MM:SS`. These helpers accept the known shapes and reject
//! everything else so malformed records fail at decode time.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a boolean-ish value. `null` and a missing field mean `false`.
///
/// # Errors
///
/// Fails for objects, arrays and unrecognized strings.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(b),
        Some(Value::Number(n)) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
        Some(Value::String(s)) => parse_flag(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid boolean flag '{s}'"))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid boolean flag: {other}"
        ))),
    }
}

/// Same as [`flag`] but keeps the distinction between "absent" and `false`.
///
/// # Errors
///
/// Fails for objects, arrays and unrecognized strings.
pub fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => flag(value).map(Some).map_err(serde::de::Error::custom),
    }
}

/// Deserialize an optional timestamp.
///
/// # Errors
///
/// Fails when a non-null value is not a string in a supported format.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{s}'"))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid timestamp: {other}"
        ))),
    }
}

/// Deserialize an optional string, treating blank strings as absent.
///
/// # Errors
///
/// Fails when the value is neither null nor a string.
pub fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" | "" => Some(false),
        _ => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Flagged {
        #[serde(default, deserialize_with = "flag")]
        value: bool,
    }

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(default, deserialize_with = "timestamp")]
        at: Option<DateTime<Utc>>,
    }

    #[rstest]
    #[case(r#"{"value": true}"#, true)]
    #[case(r#"{"value": 1}"#, true)]
    #[case(r#"{"value": "1"}"#, true)]
    #[case(r#"{"value": "true"}"#, true)]
    #[case(r#"{"value": 0}"#, false)]
    #[case(r#"{"value": "0"}"#, false)]
    #[case(r#"{"value": null}"#, false)]
    #[case(r"{}", false)]
    fn flag_accepts_known_shapes(#[case] json: &str, #[case] expected: bool) {
        let parsed: Flagged = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.value, expected);
    }

    #[test]
    fn flag_rejects_garbage() {
        assert!(serde_json::from_str::<Flagged>(r#"{"value": "maybe"}"#).is_err());
        assert!(serde_json::from_str::<Flagged>(r#"{"value": [1]}"#).is_err());
    }

    #[test]
    fn timestamp_accepts_rfc3339_and_sql_format() {
        let a: Stamped = serde_json::from_str(r#"{"at": "2024-03-01T10:00:00.000000Z"}"#).unwrap();
        let b: Stamped = serde_json::from_str(r#"{"at": "2024-03-01 10:00:00"}"#).unwrap();
        assert_eq!(a.at, b.at);
        assert!(a.at.is_some());
    }

    #[test]
    fn timestamp_null_and_missing_are_none() {
        let a: Stamped = serde_json::from_str(r#"{"at": null}"#).unwrap();
        let b: Stamped = serde_json::from_str("{}").unwrap();
        assert!(a.at.is_none());
        assert!(b.at.is_none());
    }

    #[test]
    fn timestamp_rejects_unknown_format() {
        assert!(serde_json::from_str::<Stamped>(r#"{"at": "yesterday"}"#).is_err());
    }
}
