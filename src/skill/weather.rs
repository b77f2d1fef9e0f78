//! `get_weather` — current conditions, forecast and packing advice.

use async_trait::async_trait;
use chrono::Duration;
use serde_json::{json, Value};

use super::params::{bool_or, days_between, opt_str, parse_date, required_str};
use super::{catalog_key, into_params, Skill};
use crate::error::TrekResult;
use crate::types::{Params, SkillCategory};

pub const DEFAULT_FORECAST_DAYS: i64 = 7;
pub const MAX_FORECAST_DAYS: i64 = 14;

const CONDITIONS: [&str; 5] = ["Sunny", "Partly Cloudy", "Cloudy", "Light Rain", "Clear"];

pub struct GetWeatherSkill;

impl GetWeatherSkill {
    pub const NAME: &'static str = "get_weather";

    fn forecast(base_temp: i64, start_date: Option<&str>, end_date: Option<&str>) -> Vec<Value> {
        let num_days = days_between(start_date, end_date)
            .map(|d| (d + 1).clamp(0, MAX_FORECAST_DAYS))
            .unwrap_or(DEFAULT_FORECAST_DAYS);
        let start = start_date.and_then(parse_date);

        (0..num_days)
            .map(|i| {
                let date = match start {
                    Some(s) => (s + Duration::days(i)).format("%Y-%m-%d").to_string(),
                    None => format!("2024-{:02}-{:02}", (i % 12) + 1, (i % 28) + 1),
                };
                let condition = CONDITIONS[(i as usize) % CONDITIONS.len()];
                json!({
                    "date": date,
                    "temperature_high": base_temp + (i % 5),
                    "temperature_low": base_temp - (5 - i % 5),
                    "condition": condition,
                    "precipitation_chance": if condition.contains("Rain") { 20 } else { 10 }
                })
            })
            .collect()
    }
}

#[async_trait]
impl Skill for GetWeatherSkill {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Get current weather and forecast for travel destinations to help with packing and planning"
    }

    fn category(&self) -> SkillCategory {
        SkillCategory::Weather
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "destination": {"type": "string", "description": "Name of the destination"},
                "start_date": {"type": "string", "description": "Start date of travel (YYYY-MM-DD)"},
                "end_date": {"type": "string", "description": "End date of travel (YYYY-MM-DD)"},
                "include_forecast": {
                    "type": "boolean",
                    "description": "Include daily forecast for travel dates",
                    "default": true
                }
            },
            "required": ["destination"]
        })
    }

    fn output_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "destination": {"type": "string"},
                "current": {
                    "type": "object",
                    "properties": {
                        "temperature": {"type": "number"},
                        "condition": {"type": "string"},
                        "humidity": {"type": "number"},
                        "wind_speed": {"type": "number"},
                        "uv_index": {"type": "number"}
                    }
                },
                "forecast": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "date": {"type": "string"},
                            "temperature_high": {"type": "number"},
                            "temperature_low": {"type": "number"},
                            "condition": {"type": "string"},
                            "precipitation_chance": {"type": "number"}
                        }
                    }
                },
                "packing_recommendations": {"type": "array", "items": {"type": "string"}},
                "best_activities": {
                    "type": "object",
                    "properties": {
                        "indoor": {"type": "array", "items": {"type": "string"}},
                        "outdoor": {"type": "array", "items": {"type": "string"}}
                    }
                }
            },
            "required": ["destination"]
        })
    }

    async fn execute(&self, parameters: &Params) -> TrekResult<Params> {
        let destination = required_str(parameters, Self::NAME, "destination")?;
        let start_date = opt_str(parameters, "start_date");
        let end_date = opt_str(parameters, "end_date");
        let include_forecast = bool_or(parameters, "include_forecast", true);

        let mut result = into_params(
            catalog_entry(&catalog_key(destination)).unwrap_or_else(generic_entry),
        );
        result.insert("destination".into(), Value::String(destination.to_string()));

        if include_forecast {
            let base_temp = result
                .get("current")
                .and_then(|c| c.get("temperature"))
                .and_then(|t| t.as_i64())
                .unwrap_or(20);
            result.insert(
                "forecast".into(),
                Value::Array(Self::forecast(base_temp, start_date, end_date)),
            );
        }

        Ok(result)
    }
}

fn catalog_entry(key: &str) -> Option<Value> {
    let entry = match key {
        "tokyo" => json!({
            "current": {"temperature": 18, "condition": "Partly Cloudy", "humidity": 65, "wind_speed": 12, "uv_index": 5},
            "packing_recommendations": [
                "Light layers",
                "Compact umbrella (rainy season: Jun-Jul)",
                "Comfortable walking shoes",
                "Light jacket for evenings"
            ],
            "best_activities": {
                "indoor": ["Museums", "Shopping malls", "Temples", "Anime districts"],
                "outdoor": ["Cherry blossom viewing (Mar-Apr)", "Parks", "Rooftop bars"]
            }
        }),
        "paris" => json!({
            "current": {"temperature": 15, "condition": "Sunny", "humidity": 55, "wind_speed": 8, "uv_index": 4},
            "packing_recommendations": [
                "Light sweaters",
                "Elegant casual wear for dining",
                "Comfortable shoes for cobblestones",
                "Light rain jacket",
                "Adapter for European outlets"
            ],
            "best_activities": {
                "indoor": ["Louvre", "Musée d'Orsay", "Cafés", "Wine bars"],
                "outdoor": ["Seine walks", "Jardin du Luxembourg", "Montmartre"]
            }
        }),
        "bali" => json!({
            "current": {"temperature": 29, "condition": "Sunny", "humidity": 80, "wind_speed": 10, "uv_index": 9},
            "packing_recommendations": [
                "Light, breathable clothing",
                "Swimwear",
                "Sunscreen (high SPF)",
                "Insect repellent",
                "Raincoat (wet season: Nov-Mar)",
                "Modest clothing for temples"
            ],
            "best_activities": {
                "indoor": ["Spa treatments", "Cooking classes", "Temple visits"],
                "outdoor": ["Beach", "Surfing", "Rice terrace treks", "Waterfalls"]
            }
        }),
        _ => return None,
    };
    Some(entry)
}

fn generic_entry() -> Value {
    json!({
        "current": {"temperature": 22, "condition": "Clear", "humidity": 60, "wind_speed": 10, "uv_index": 6},
        "packing_recommendations": [
            "Check local weather before packing",
            "Bring comfortable walking shoes",
            "Pack layers"
        ],
        "best_activities": {
            "indoor": ["Local museums", "Markets"],
            "outdoor": ["Explore local parks", "Walking tours"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(params: Value) -> Params {
        GetWeatherSkill.execute(&into_params(params)).await.unwrap()
    }

    #[tokio::test]
    async fn default_forecast_is_a_week() {
        let result = run(json!({"destination": "Tokyo"})).await;
        let forecast = result["forecast"].as_array().unwrap();
        assert_eq!(forecast.len(), 7);
        assert_eq!(forecast[0]["temperature_high"], 18);
        assert_eq!(forecast[0]["temperature_low"], 13);
        assert_eq!(forecast[3]["condition"], "Light Rain");
        assert_eq!(forecast[3]["precipitation_chance"], 20);
    }

    #[tokio::test]
    async fn forecast_spans_travel_dates() {
        let result = run(json!({
            "destination": "Bali",
            "start_date": "2024-06-28",
            "end_date": "2024-07-02"
        }))
        .await;
        let forecast = result["forecast"].as_array().unwrap();
        assert_eq!(forecast.len(), 5);
        assert_eq!(forecast[0]["date"], "2024-06-28");
        assert_eq!(forecast[4]["date"], "2024-07-02");
    }

    #[tokio::test]
    async fn forecast_is_capped() {
        let result = run(json!({
            "destination": "Paris",
            "start_date": "2024-01-01",
            "end_date": "2024-03-01"
        }))
        .await;
        assert_eq!(result["forecast"].as_array().unwrap().len(), 14);
    }

    #[tokio::test]
    async fn forecast_can_be_skipped() {
        let result = run(json!({"destination": "Paris", "include_forecast": false})).await;
        assert!(result.get("forecast").is_none());
        assert_eq!(result["current"]["condition"], "Sunny");
    }

    #[tokio::test]
    async fn unknown_destination_is_generic() {
        let result = run(json!({"destination": "Atlantis", "start_date": "garbage"})).await;
        assert_eq!(result["destination"], "Atlantis");
        assert_eq!(result["current"]["temperature"], 22);
        assert_eq!(result["forecast"].as_array().unwrap().len(), 7);
    }
}
