//! Field-name reconciliation for gateway payloads
//!
//! Different gateway endpoints return the same logical field under different
//! names and casings (`totalValueUSDT`, `pricing_total_value`, `totalValue`,
//! ...). Every monetary or count field that crosses the gateway boundary goes
//! through an accessor in [`accessors`], which tries a fixed, priority-ordered
//! alias list and falls back to zero or `None`. Nothing in this module fails:
//! malformed input coerces to the fallback instead of producing `NaN`.

pub mod accessors;
mod entities;

pub use accessors::*;
pub use entities::*;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// Resolve a dotted path (`pricing.totalValue`) inside a JSON object.
pub fn lookup<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(raw, |node, key| node.get(key))
}

/// Parse a JSON value as a finite number.
///
/// Accepts numbers and numeric strings; strings may carry surrounding
/// whitespace, thousands separators and a leading `$`. Booleans, nulls,
/// objects and non-finite results yield `None`.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .trim_start_matches('$')
                .chars()
                .filter(|c| *c != ',' && *c != '_')
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Parse a float, defaulting to 0 on any failure.
pub fn parse_f64_or_zero(value: Option<&Value>) -> f64 {
    value.and_then(coerce_f64).unwrap_or(0.0)
}

/// Parse a JSON value as a non-empty string; numbers are stringified so
/// numeric identifiers survive.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// RFC 3339 strings, or unix timestamps in seconds or milliseconds.
pub fn coerce_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .ok(),
        Value::Number(n) => {
            let raw = n.as_i64()?;
            // anything past year 2286 in seconds is really milliseconds
            if raw.abs() > 9_999_999_999 {
                Utc.timestamp_millis_opt(raw).single()
            } else {
                Utc.timestamp_opt(raw, 0).single()
            }
        }
        _ => None,
    }
}

/// First alias that holds a usable number. Present-but-malformed values are
/// skipped so a later alias can still supply the figure.
pub fn first_f64(raw: &Value, aliases: &[&str]) -> Option<f64> {
    aliases
        .iter()
        .find_map(|alias| lookup(raw, alias).and_then(coerce_f64))
}

pub fn first_string(raw: &Value, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|alias| lookup(raw, alias).and_then(coerce_string))
}

pub fn first_bool(raw: &Value, aliases: &[&str]) -> Option<bool> {
    aliases
        .iter()
        .find_map(|alias| lookup(raw, alias).and_then(coerce_bool))
}

pub fn first_datetime(raw: &Value, aliases: &[&str]) -> Option<DateTime<Utc>> {
    aliases
        .iter()
        .find_map(|alias| lookup(raw, alias).and_then(coerce_datetime))
}

/// Token quantities keep their fraction; negative or non-finite figures are 0.
pub fn to_quantity(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
