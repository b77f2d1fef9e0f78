//! Request parser — free text plus structured metadata into a [`TripRequest`].
//!
//! Extraction is lexical: a trigger phrase for the destination, a number
//! followed by "days"/"nights" for the duration, and a `$` amount for the
//! budget. Metadata fields win whenever they are present and non-empty.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::skill::params::{opt_f64, opt_str, opt_u64, str_list};
use crate::types::Params;

static DESTINATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:visit|go to|trip to|travel to)\s+([A-Za-z\s]+?)(?:\s+for|\s+with|\s+in|\s*$| \d)",
    )
    .expect("destination pattern is valid")
});

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:days?|nights?)").expect("duration pattern is valid")
});

static BUDGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([\d,]+)").expect("budget pattern is valid"));

/// Fallback values for fields neither metadata nor text supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripDefaults {
    pub duration_days: u32,
    pub budget: f64,
    pub accommodation_type: String,
    pub pace: String,
}

impl Default for TripDefaults {
    fn default() -> Self {
        Self {
            duration_days: 5,
            budget: 2000.0,
            accommodation_type: "mid-range".into(),
            pace: "moderate".into(),
        }
    }
}

/// Structured travel request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub destination: Option<String>,
    pub duration_days: u32,
    pub budget: f64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub interests: Vec<String>,
    pub accommodation_type: String,
    pub pace: String,
    pub raw_message: String,
}

impl TripRequest {
    pub fn has_destination(&self) -> bool {
        self.destination.is_some()
    }

    /// Values for template filling. Absent fields are left out so their
    /// placeholders stay literal.
    pub fn to_parameters(&self) -> Params {
        let mut params = Params::new();
        if let Some(destination) = &self.destination {
            params.insert("destination".into(), json!(destination));
        }
        params.insert("duration_days".into(), json!(self.duration_days));
        params.insert("budget".into(), json!(self.budget));
        if let Some(start) = &self.start_date {
            params.insert("start_date".into(), json!(start));
        }
        if let Some(end) = &self.end_date {
            params.insert("end_date".into(), json!(end));
        }
        params.insert("interests".into(), json!(self.interests));
        params.insert("accommodation_type".into(), json!(self.accommodation_type));
        params.insert("pace".into(), json!(self.pace));
        params
    }
}

/// Parses trip requests. Never fails; anything it cannot extract takes a default.
#[derive(Debug, Clone, Default)]
pub struct RequestParser {
    defaults: TripDefaults,
}

impl RequestParser {
    pub fn new(defaults: TripDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &TripDefaults {
        &self.defaults
    }

    pub fn parse(&self, text: &str, metadata: &Params) -> TripRequest {
        let destination = opt_str(metadata, "destination")
            .map(String::from)
            .or_else(|| extract_destination(text));

        let duration_days = opt_u64(metadata, "duration_days")
            .filter(|d| *d > 0)
            .and_then(|d| u32::try_from(d).ok())
            .or_else(|| extract_duration(text))
            .unwrap_or(self.defaults.duration_days);

        let budget = opt_f64(metadata, "budget")
            .filter(|b| *b > 0.0)
            .or_else(|| extract_budget(text))
            .unwrap_or(self.defaults.budget);

        TripRequest {
            destination,
            duration_days,
            budget,
            start_date: opt_str(metadata, "start_date").map(String::from),
            end_date: opt_str(metadata, "end_date").map(String::from),
            interests: str_list(metadata, "interests"),
            accommodation_type: opt_str(metadata, "accommodation_type")
                .unwrap_or(&self.defaults.accommodation_type)
                .to_string(),
            pace: opt_str(metadata, "pace")
                .unwrap_or(&self.defaults.pace)
                .to_string(),
            raw_message: text.to_string(),
        }
    }
}

fn extract_destination(text: &str) -> Option<String> {
    DESTINATION_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|d| !d.is_empty())
}

fn extract_duration(text: &str) -> Option<u32> {
    DURATION_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .filter(|d: &u32| *d > 0)
}

fn extract_budget(text: &str) -> Option<f64> {
    BUDGET_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
        .filter(|b: &f64| *b > 0.0)
}

/// Metadata built from a JSON value. Non-objects give empty metadata.
pub fn metadata_from(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> TripRequest {
        RequestParser::default().parse(text, &Params::new())
    }

    #[test]
    fn extracts_all_fields_from_text() {
        let request = parse("I want to go to Paris for 7 days with $3,000");
        assert_eq!(request.destination.as_deref(), Some("Paris"));
        assert_eq!(request.duration_days, 7);
        assert_eq!(request.budget, 3000.0);
        assert_eq!(request.raw_message, "I want to go to Paris for 7 days with $3,000");
    }

    #[test]
    fn destination_is_case_insensitive() {
        let request = parse("Plan a TRIP TO New York in spring");
        assert_eq!(request.destination.as_deref(), Some("New York"));

        let request = parse("I'd love to visit Bali");
        assert_eq!(request.destination.as_deref(), Some("Bali"));
    }

    #[test]
    fn destination_stops_before_digit() {
        let request = parse("travel to Tokyo 5 nights");
        assert_eq!(request.destination.as_deref(), Some("Tokyo"));
        assert_eq!(request.duration_days, 5);
    }

    #[test]
    fn defaults_apply_when_nothing_matches() {
        let request = parse("hello there");
        assert_eq!(request.destination, None);
        assert_eq!(request.duration_days, 5);
        assert_eq!(request.budget, 2000.0);
        assert_eq!(request.accommodation_type, "mid-range");
        assert_eq!(request.pace, "moderate");
        assert!(request.interests.is_empty());
    }

    #[test]
    fn metadata_wins_over_text() {
        let metadata = metadata_from(json!({
            "destination": "Tokyo",
            "duration_days": 10,
            "budget": 5000,
            "pace": "relaxed",
            "interests": ["food"],
            "start_date": "2024-04-01"
        }));
        let request = RequestParser::default()
            .parse("go to Paris for 7 days with $3,000", &metadata);
        assert_eq!(request.destination.as_deref(), Some("Tokyo"));
        assert_eq!(request.duration_days, 10);
        assert_eq!(request.budget, 5000.0);
        assert_eq!(request.pace, "relaxed");
        assert_eq!(request.interests, vec!["food"]);
        assert_eq!(request.start_date.as_deref(), Some("2024-04-01"));
        assert_eq!(request.end_date, None);
    }

    #[test]
    fn empty_metadata_values_fall_through() {
        let metadata = metadata_from(json!({"destination": "", "duration_days": 0, "budget": 0}));
        let request = RequestParser::default()
            .parse("go to Paris for 7 days with $3,000", &metadata);
        assert_eq!(request.destination.as_deref(), Some("Paris"));
        assert_eq!(request.duration_days, 7);
        assert_eq!(request.budget, 3000.0);
    }

    #[test]
    fn configured_defaults_are_used() {
        let parser = RequestParser::new(TripDefaults {
            duration_days: 3,
            budget: 900.0,
            accommodation_type: "budget".into(),
            pace: "packed".into(),
        });
        let request = parser.parse("somewhere nice", &Params::new());
        assert_eq!(request.duration_days, 3);
        assert_eq!(request.budget, 900.0);
        assert_eq!(request.accommodation_type, "budget");
        assert_eq!(request.pace, "packed");
    }

    #[test]
    fn to_parameters_omits_absent_fields() {
        let params = parse("visit Lima").to_parameters();
        assert_eq!(params["destination"], "Lima");
        assert_eq!(params["duration_days"], 5);
        assert!(!params.contains_key("start_date"));
        assert!(!params.contains_key("end_date"));

        let params = parse("nothing here").to_parameters();
        assert!(!params.contains_key("destination"));
    }
}
