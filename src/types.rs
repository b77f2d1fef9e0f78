use serde::{Deserialize, Serialize};

use crate::error::TrekError;

/// Structured mapping used for skill parameters and results.
pub type Params = serde_json::Map<String, serde_json::Value>;

// ─── Skill Category ─────────────────────────────────────────────────────────

/// Closed set of skill categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Destination,
    Pricing,
    Reviews,
    Weather,
    Planning,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 5] = [
        SkillCategory::Destination,
        SkillCategory::Pricing,
        SkillCategory::Reviews,
        SkillCategory::Weather,
        SkillCategory::Planning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Destination => "destination",
            SkillCategory::Pricing => "pricing",
            SkillCategory::Reviews => "reviews",
            SkillCategory::Weather => "weather",
            SkillCategory::Planning => "planning",
        }
    }
}

impl std::fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SkillCategory {
    type Err = TrekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        SkillCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| TrekError::UnknownCategory(s.to_string()))
    }
}

// ─── Skill Definition ───────────────────────────────────────────────────────

/// Discovery record for a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
    #[serde(rename = "outputSchema")]
    pub output_schema: serde_json::Value,
    pub category: SkillCategory,
    pub version: String,
}

impl SkillDefinition {
    /// Field names listed under `required` in the input schema.
    pub fn required_fields(&self) -> Vec<String> {
        required_fields(&self.input_schema)
    }
}

/// Read `required` from a JSON-Schema object. Anything malformed yields no fields.
pub fn required_fields(schema: &serde_json::Value) -> Vec<String> {
    schema
        .get("required")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

// ─── Skill Call ─────────────────────────────────────────────────────────────

/// A named invocation request: which skill, with which parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCall {
    #[serde(alias = "skill_name", alias = "name")]
    pub skill: String,
    #[serde(default, alias = "input")]
    pub parameters: Params,
}

impl SkillCall {
    pub fn new(skill: impl Into<String>, parameters: Params) -> Self {
        Self {
            skill: skill.into(),
            parameters,
        }
    }

    /// Build a call from a `json!` object literal. Non-object values give empty parameters.
    pub fn with_json(skill: impl Into<String>, parameters: serde_json::Value) -> Self {
        let parameters = match parameters {
            serde_json::Value::Object(map) => map,
            _ => Params::new(),
        };
        Self::new(skill, parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!(
            "Weather".parse::<SkillCategory>().unwrap(),
            SkillCategory::Weather
        );
        assert_eq!(
            " pricing ".parse::<SkillCategory>().unwrap(),
            SkillCategory::Pricing
        );
    }

    #[test]
    fn unknown_category_rejected() {
        let err = "nightlife".parse::<SkillCategory>().unwrap_err();
        assert!(matches!(err, TrekError::UnknownCategory(c) if c == "nightlife"));
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&SkillCategory::Destination).unwrap();
        assert_eq!(json, "\"destination\"");
    }

    #[test]
    fn definition_uses_camel_case_schema_keys() {
        let def = SkillDefinition {
            name: "get_weather".into(),
            description: "Weather".into(),
            input_schema: json!({"type": "object", "required": ["destination"]}),
            output_schema: json!({"type": "object"}),
            category: SkillCategory::Weather,
            version: "1.0.0".into(),
        };
        let value = serde_json::to_value(&def).unwrap();
        assert!(value.get("inputSchema").is_some());
        assert!(value.get("outputSchema").is_some());
        assert_eq!(value["category"], "weather");
        assert_eq!(def.required_fields(), vec!["destination".to_string()]);
    }

    #[test]
    fn required_fields_tolerates_missing_key() {
        assert!(required_fields(&json!({"type": "object"})).is_empty());
        assert!(required_fields(&json!({"required": "destination"})).is_empty());
    }

    #[test]
    fn skill_call_accepts_aliases() {
        let call: SkillCall =
            serde_json::from_value(json!({"name": "get_weather", "input": {"destination": "Bali"}}))
                .unwrap();
        assert_eq!(call.skill, "get_weather");
        assert_eq!(call.parameters["destination"], "Bali");

        let call: SkillCall = serde_json::from_value(json!({"skill_name": "query_prices"})).unwrap();
        assert_eq!(call.skill, "query_prices");
        assert!(call.parameters.is_empty());
    }
}
