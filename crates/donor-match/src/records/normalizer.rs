use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use super::CoordinatesRecord;
use crate::matching::{BloodGroup, Urgency};

pub(crate) fn normalize_text(value: &str) -> Option<String> {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

pub(crate) fn normalize_optional(value: Option<&str>) -> Option<String> {
    value.and_then(normalize_text)
}

pub(crate) fn parse_blood_group(owner: &str, raw: Option<&str>) -> Option<BloodGroup> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
    match raw.parse::<BloodGroup>() {
        Ok(group) => Some(group),
        Err(err) => {
            warn!(record = owner, %err, "ignoring blood group");
            None
        }
    }
}

pub(crate) fn parse_timestamp(owner: &str, field: &str, raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Some(midnight.and_utc());
    }

    warn!(record = owner, field, value = raw, "ignoring unparseable timestamp");
    None
}

pub(crate) fn parse_urgency(raw: Option<&str>) -> Urgency {
    let Some(raw) = raw else {
        return Urgency::default();
    };
    let key: String = raw
        .trim()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_uppercase())
        .collect();

    match key.as_str() {
        "IMMEDIATE" | "URGENT" | "CRITICAL" => Urgency::Immediate,
        "WITHIN24H" | "WITHIN24HOURS" | "24H" => Urgency::Within24h,
        "SCHEDULED" | "" => Urgency::Scheduled,
        _ => {
            warn!(value = raw, "unknown urgency, treating as scheduled");
            Urgency::Scheduled
        }
    }
}

pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

/// Whole, non-negative count. Fractional input is floored.
pub(crate) fn parse_count(value: &str) -> Option<u32> {
    value.trim().parse::<f64>().ok().and_then(whole_count)
}

fn whole_count(value: f64) -> Option<u32> {
    (value.is_finite() && value >= 0.0).then(|| value.floor().min(f64::from(u32::MAX)) as u32)
}

fn loose_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}

// Document fields below never fail deserialization: a malformed value on one
// donor degrades to "missing" instead of rejecting the whole batch.

pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(raw) => Some(raw),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(loose_number(&value).and_then(whole_count))
}

pub(crate) fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(loose_number(&value)
        .filter(|rating| rating.is_finite())
        .map(|rating| rating as f32))
}

pub(crate) fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => flag,
        Value::String(raw) => parse_flag(&raw),
        Value::Number(number) => number.as_f64() == Some(1.0),
        _ => false,
    })
}

pub(crate) fn lenient_coordinates<'de, D>(
    deserializer: D,
) -> Result<Option<CoordinatesRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
