//! Lenient serde helpers for fields the editing UI historically wrote as
//! either numbers or strings.
//!
//! Anything that cannot be read as the expected type collapses to the
//! default instead of failing the whole document.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

fn value_to_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Number or numeric string, `0` otherwise
pub fn u32_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_u32(&value).unwrap_or(0))
}

/// Number or numeric string, `None` otherwise (including `""` and `null`)
pub fn optional_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_u32(&value))
}

/// Index stored as number or string
pub fn as_index(value: &Value) -> Option<usize> {
    value_to_u32(value).map(|n| n as usize)
}

/// Any scalar rendered as a string; `null` becomes empty
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Truthy flag: booleans, `0`/`1`, or `"true"`
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
        Value::String(s) => matches!(s.trim(), "1" | "true" | "True"),
        _ => false,
    })
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// `yyyy-MM-dd` date; invalid or missing dates become `None`
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(parse_date))
}

/// Two-element `[start, end]` date list
pub fn optional_period<'de, D>(deserializer: D) -> Result<Option<(NaiveDate, NaiveDate)>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let period = match value.as_array().map(Vec::as_slice) {
        Some([a, b]) => match (a.as_str().and_then(parse_date), b.as_str().and_then(parse_date)) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        },
        _ => None,
    };
    Ok(period)
}

/// Parse `HH:MM` (seconds tolerated)
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// `HH:MM` time-of-day encoding used by the time table
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).ok_or_else(|| D::Error::custom(format!("invalid time: {raw}")))
    }
}

pub fn serialize_optional_date<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
        None => serializer.serialize_str(""),
    }
}

pub fn serialize_optional_period<S>(
    period: &Option<(NaiveDate, NaiveDate)>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::ser::SerializeSeq;
    match period {
        Some((a, b)) => {
            let mut seq = serializer.serialize_seq(Some(2))?;
            seq.serialize_element(&a.format("%Y-%m-%d").to_string())?;
            seq.serialize_element(&b.format("%Y-%m-%d").to_string())?;
            seq.end()
        }
        None => serializer.serialize_seq(Some(0))?.end(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "u32_or_zero")]
        count: u32,
        #[serde(default, deserialize_with = "optional_u32")]
        dir: Option<u32>,
        #[serde(default, deserialize_with = "optional_period")]
        period: Option<(NaiveDate, NaiveDate)>,
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let p: Probe = serde_json::from_str(r#"{"count": "4", "dir": " 2 "}"#).unwrap();
        assert_eq!(p.count, 4);
        assert_eq!(p.dir, Some(2));
    }

    #[test]
    fn test_malformed_numbers_collapse() {
        let p: Probe = serde_json::from_str(r#"{"count": "four", "dir": ""}"#).unwrap();
        assert_eq!(p.count, 0);
        assert_eq!(p.dir, None);
    }

    #[test]
    fn test_period_requires_two_valid_dates() {
        let p: Probe =
            serde_json::from_str(r#"{"count": 1, "period": ["2025-01-02", "2025-01-09"]}"#).unwrap();
        assert_eq!(
            p.period,
            Some((
                NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 9).unwrap()
            ))
        );

        let p: Probe = serde_json::from_str(r#"{"count": 1, "period": ["2025-01-02"]}"#).unwrap();
        assert_eq!(p.period, None);
    }

    #[test]
    fn test_parse_time_tolerates_seconds() {
        assert_eq!(parse_time("07:15"), NaiveTime::from_hms_opt(7, 15, 0));
        assert_eq!(parse_time("07:15:00"), NaiveTime::from_hms_opt(7, 15, 0));
        assert_eq!(parse_time("7시"), None);
    }
}
