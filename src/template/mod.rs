//! Template planner — named, ordered skill sequences with `$placeholder` values.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{TrekError, TrekResult};
use crate::types::{Params, SkillCall};

pub const PLACEHOLDER_SIGIL: char = '$';

/// One step of a template: a skill and its declared parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateStep {
    pub skill: String,
    #[serde(default)]
    pub parameters: Params,
}

impl TemplateStep {
    fn new(skill: &str, parameters: Value) -> Self {
        Self {
            skill: skill.to_string(),
            parameters: match parameters {
                Value::Object(map) => map,
                _ => Params::new(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub description: String,
    pub steps: Vec<TemplateStep>,
}

impl Template {
    pub fn fill(&self, values: &Params) -> Vec<SkillCall> {
        fill(self, values)
    }
}

/// Substitute placeholders in every step. A placeholder whose key is missing
/// from `values` is kept as the literal string.
pub fn fill(template: &Template, values: &Params) -> Vec<SkillCall> {
    template
        .steps
        .iter()
        .map(|step| {
            let parameters = step
                .parameters
                .iter()
                .map(|(key, value)| (key.clone(), substitute(value, values)))
                .collect();
            SkillCall::new(step.skill.clone(), parameters)
        })
        .collect()
}

fn substitute(value: &Value, values: &Params) -> Value {
    match value {
        Value::String(s) => match s.strip_prefix(PLACEHOLDER_SIGIL) {
            Some(key) => values.get(key).cloned().unwrap_or_else(|| value.clone()),
            None => value.clone(),
        },
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), substitute(v, values)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| substitute(v, values)).collect()),
        other => other.clone(),
    }
}

/// Catalog of templates by name.
#[derive(Debug, Clone)]
pub struct TemplatePlanner {
    templates: Vec<Template>,
}

impl TemplatePlanner {
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
        }
    }

    /// `basic_planning`, `comprehensive` and `quick_check`.
    pub fn with_builtin_templates() -> Self {
        Self {
            templates: builtin_templates(),
        }
    }

    /// Add a template, replacing any with the same name.
    pub fn add(&mut self, template: Template) {
        match self.templates.iter_mut().find(|t| t.name == template.name) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn fill_named(&self, name: &str, values: &Params) -> TrekResult<Vec<SkillCall>> {
        self.get(name)
            .map(|t| t.fill(values))
            .ok_or_else(|| TrekError::TemplateNotFound {
                name: name.to_string(),
            })
    }
}

impl Default for TemplatePlanner {
    fn default() -> Self {
        Self::with_builtin_templates()
    }
}

fn builtin_templates() -> Vec<Template> {
    vec![
        Template {
            name: "basic_planning".into(),
            description: "Destination overview, prices, then a plan".into(),
            steps: vec![
                TemplateStep::new("search_destination", json!({"destination": "$destination"})),
                TemplateStep::new(
                    "query_prices",
                    json!({
                        "destination": "$destination",
                        "check_in": "$start_date",
                        "check_out": "$end_date"
                    }),
                ),
                TemplateStep::new(
                    "create_travel_plan",
                    json!({
                        "destination": "$destination",
                        "duration_days": "$duration_days",
                        "budget": "$budget"
                    }),
                ),
            ],
        },
        Template {
            name: "comprehensive".into(),
            description: "Every skill, ending with a dated plan".into(),
            steps: vec![
                TemplateStep::new(
                    "search_destination",
                    json!({"destination": "$destination", "include_tips": true}),
                ),
                TemplateStep::new(
                    "query_prices",
                    json!({
                        "destination": "$destination",
                        "check_in": "$start_date",
                        "check_out": "$end_date"
                    }),
                ),
                TemplateStep::new(
                    "get_destination_reviews",
                    json!({"destination": "$destination", "limit": 5}),
                ),
                TemplateStep::new(
                    "get_weather",
                    json!({
                        "destination": "$destination",
                        "start_date": "$start_date",
                        "end_date": "$end_date"
                    }),
                ),
                TemplateStep::new(
                    "create_travel_plan",
                    json!({
                        "destination": "$destination",
                        "duration_days": "$duration_days",
                        "budget": "$budget",
                        "travel_dates": {"start": "$start_date", "end": "$end_date"}
                    }),
                ),
            ],
        },
        Template {
            name: "quick_check".into(),
            description: "Destination overview and top reviews".into(),
            steps: vec![
                TemplateStep::new("search_destination", json!({"destination": "$destination"})),
                TemplateStep::new(
                    "get_destination_reviews",
                    json!({"destination": "$destination", "limit": 3}),
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(v: Value) -> Params {
        match v {
            Value::Object(map) => map,
            _ => Params::new(),
        }
    }

    #[test]
    fn builtins_are_registered() {
        let planner = TemplatePlanner::default();
        assert_eq!(
            planner.names(),
            vec!["basic_planning", "comprehensive", "quick_check"]
        );
        assert_eq!(planner.get("comprehensive").unwrap().steps.len(), 5);
        assert_eq!(planner.get("quick_check").unwrap().steps.len(), 2);
    }

    #[test]
    fn fill_substitutes_and_keeps_missing_literal() {
        let planner = TemplatePlanner::default();
        let calls = planner
            .fill_named("basic_planning", &values(json!({"destination": "Tokyo", "budget": 1500})))
            .unwrap();

        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].skill, "search_destination");
        assert_eq!(calls[0].parameters["destination"], "Tokyo");
        assert_eq!(calls[1].parameters["check_in"], "$start_date");
        assert_eq!(calls[2].parameters["budget"], 1500);
        assert_eq!(calls[2].parameters["duration_days"], "$duration_days");
    }

    #[test]
    fn non_placeholder_values_pass_through() {
        let planner = TemplatePlanner::default();
        let calls = planner
            .fill_named("quick_check", &values(json!({"destination": "Bali", "limit": 99})))
            .unwrap();
        assert_eq!(calls[1].parameters["limit"], 3);
    }

    #[test]
    fn nested_placeholders_are_filled() {
        let planner = TemplatePlanner::default();
        let calls = planner
            .fill_named(
                "comprehensive",
                &values(json!({"destination": "Paris", "start_date": "2024-05-01"})),
            )
            .unwrap();
        let dates = &calls[4].parameters["travel_dates"];
        assert_eq!(dates["start"], "2024-05-01");
        assert_eq!(dates["end"], "$end_date");
    }

    #[test]
    fn arrays_are_walked() {
        let template = Template {
            name: "custom".into(),
            description: String::new(),
            steps: vec![TemplateStep::new(
                "create_travel_plan",
                json!({"interests": ["$first", "museums"]}),
            )],
        };
        let calls = template.fill(&values(json!({"first": "food"})));
        assert_eq!(calls[0].parameters["interests"], json!(["food", "museums"]));
    }

    #[test]
    fn unknown_template_is_an_error() {
        let err = TemplatePlanner::default()
            .fill_named("grand_tour", &Params::new())
            .unwrap_err();
        assert!(matches!(err, TrekError::TemplateNotFound { name } if name == "grand_tour"));
    }

    #[test]
    fn add_replaces_by_name() {
        let mut planner = TemplatePlanner::new();
        planner.add(Template {
            name: "x".into(),
            description: "one".into(),
            steps: Vec::new(),
        });
        planner.add(Template {
            name: "x".into(),
            description: "two".into(),
            steps: Vec::new(),
        });
        assert_eq!(planner.names(), vec!["x"]);
        assert_eq!(planner.get("x").unwrap().description, "two");
    }
}
