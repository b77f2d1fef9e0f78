//! Lenient accessors for skill parameters.
//!
//! Parameters arrive from templates, pipelines and remote callers, so numbers
//! may be strings and unfilled placeholders may remain as literal text. The
//! accessors accept what they can and fall back to defaults otherwise.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{TrekError, TrekResult};
use crate::types::Params;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A required string parameter. Present but non-string values are invalid input.
pub fn required_str<'a>(params: &'a Params, skill_name: &str, key: &str) -> TrekResult<&'a str> {
    match params.get(key) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(TrekError::InvalidParameter {
            skill_name: skill_name.to_string(),
            message: format!("'{key}' must be a string, got {other}"),
        }),
        None => Err(TrekError::InvalidParameter {
            skill_name: skill_name.to_string(),
            message: format!("'{key}' is required"),
        }),
    }
}

/// A non-empty string parameter.
pub fn opt_str<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub fn str_or<'a>(params: &'a Params, key: &str, default: &'a str) -> &'a str {
    opt_str(params, key).unwrap_or(default)
}

pub fn bool_or(params: &Params, key: &str, default: bool) -> bool {
    match params.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => true,
            "false" | "no" | "0" => false,
            _ => default,
        },
        _ => default,
    }
}

pub fn opt_u64(params: &Params, key: &str) -> Option<u64> {
    match params.get(key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn u64_or(params: &Params, key: &str, default: u64) -> u64 {
    opt_u64(params, key).unwrap_or(default)
}

pub fn opt_f64(params: &Params, key: &str) -> Option<f64> {
    match params.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

/// A list of strings; non-string items are skipped.
pub fn str_list(params: &Params, key: &str) -> Vec<String> {
    params
        .get(key)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Whole days from `start` to `end` when both parse as `YYYY-MM-DD`.
pub fn days_between(start: Option<&str>, end: Option<&str>) -> Option<i64> {
    let start = parse_date(start?)?;
    let end = parse_date(end?)?;
    Some((end - start).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::into_params;
    use serde_json::json;

    #[test]
    fn required_str_rejects_non_string() {
        let params = into_params(json!({"destination": 42}));
        let err = required_str(&params, "get_weather", "destination").unwrap_err();
        assert!(err.to_string().contains("must be a string"));
    }

    #[test]
    fn required_str_reports_missing() {
        let err = required_str(&Params::new(), "get_weather", "destination").unwrap_err();
        assert!(err.to_string().contains("'destination' is required"));
    }

    #[test]
    fn numbers_accept_strings() {
        let params = into_params(json!({"days": "7", "budget": "3,000", "n": 4.0}));
        assert_eq!(opt_u64(&params, "days"), Some(7));
        assert_eq!(opt_u64(&params, "n"), Some(4));
        assert_eq!(opt_f64(&params, "budget"), Some(3000.0));
    }

    #[test]
    fn placeholders_fall_back_to_defaults() {
        let params = into_params(json!({"duration_days": "$duration_days"}));
        assert_eq!(u64_or(&params, "duration_days", 5), 5);
        assert_eq!(opt_f64(&params, "duration_days"), None);
    }

    #[test]
    fn bool_accepts_strings() {
        let params = into_params(json!({"a": "false", "b": true, "c": "maybe"}));
        assert!(!bool_or(&params, "a", true));
        assert!(bool_or(&params, "b", false));
        assert!(bool_or(&params, "c", true));
    }

    #[test]
    fn days_between_parses_iso_dates() {
        assert_eq!(days_between(Some("2024-05-01"), Some("2024-05-06")), Some(5));
        assert_eq!(days_between(Some("2024-05-01"), Some("next week")), None);
        assert_eq!(days_between(None, Some("2024-05-06")), None);
    }

    #[test]
    fn opt_str_skips_blank() {
        let params = into_params(json!({"a": "  ", "b": "x"}));
        assert_eq!(opt_str(&params, "a"), None);
        assert_eq!(opt_str(&params, "b"), Some("x"));
        assert_eq!(str_or(&params, "a", "dflt"), "dflt");
    }
}
