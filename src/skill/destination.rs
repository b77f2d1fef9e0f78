//! `search_destination` — destination overview, highlights and local tips.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::params::{bool_or, required_str};
use super::{catalog_key, into_params, Skill};
use crate::error::TrekResult;
use crate::types::{Params, SkillCategory};

pub struct SearchDestinationSkill;

impl SearchDestinationSkill {
    pub const NAME: &'static str = "search_destination";

    /// Exact catalog match first, then containment in either direction.
    fn lookup(destination: &str) -> Option<Value> {
        let key = catalog_key(destination);
        if let Some(entry) = catalog_entry(&key) {
            return Some(entry);
        }
        if key.is_empty() {
            return None;
        }
        CATALOG_KEYS
            .iter()
            .find(|k| k.contains(key.as_str()) || key.contains(*k))
            .and_then(|k| catalog_entry(k))
    }
}

#[async_trait]
impl Skill for SearchDestinationSkill {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Search for travel destination information including attractions, culture, best time to visit, and local tips"
    }

    fn category(&self) -> SkillCategory {
        SkillCategory::Destination
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "destination": {
                    "type": "string",
                    "description": "Name of the destination (city, country, or region)"
                },
                "language": {
                    "type": "string",
                    "description": "Preferred language for information (default: en)",
                    "default": "en"
                },
                "include_tips": {
                    "type": "boolean",
                    "description": "Include travel tips and recommendations",
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
                "country": {"type": "string"},
                "region": {"type": "string"},
                "description": {"type": "string"},
                "highlights": {"type": "array", "items": {"type": "string"}},
                "best_time_to_visit": {"type": "string"},
                "average_duration": {"type": "string"},
                "local_tips": {"type": "array", "items": {"type": "string"}},
                "currency": {"type": "string"},
                "language": {"type": "string"},
                "visa_info": {"type": "string"}
            },
            "required": ["destination"]
        })
    }

    async fn execute(&self, parameters: &Params) -> TrekResult<Params> {
        let destination = required_str(parameters, Self::NAME, "destination")?;
        let include_tips = bool_or(parameters, "include_tips", true);

        let mut result = into_params(
            Self::lookup(destination).unwrap_or_else(|| generic_entry(destination)),
        );
        if !include_tips {
            result.insert("local_tips".into(), Value::Null);
        }
        Ok(result)
    }
}

const CATALOG_KEYS: [&str; 3] = ["tokyo", "paris", "bali"];

fn catalog_entry(key: &str) -> Option<Value> {
    let entry = match key {
        "tokyo" => json!({
            "destination": "Tokyo",
            "country": "Japan",
            "region": "Asia",
            "description": "Tokyo is a vibrant metropolis blending ultramodern and traditional culture. Experience cutting-edge technology alongside ancient temples.",
            "highlights": [
                "Senso-ji Temple in Asakusa",
                "Shibuya Crossing",
                "Tokyo Tower and Skytree",
                "Imperial Palace",
                "Tsukiji Outer Market",
                "Akihabara electronics district"
            ],
            "best_time_to_visit": "March-May (cherry blossom) or September-November (autumn foliage)",
            "average_duration": "5-7 days",
            "local_tips": [
                "Get a Suica or Pasmo card for easy transportation",
                "Download offline maps - Tokyo Metro can be complex",
                "Tipping is not customary in Japan",
                "Carry cash - many small shops don't accept cards"
            ],
            "currency": "Japanese Yen (JPY)",
            "language": "Japanese",
            "visa_info": "Visa-free for many countries for up to 30 days"
        }),
        "paris" => json!({
            "destination": "Paris",
            "country": "France",
            "region": "Europe",
            "description": "Paris, the City of Light, offers world-renowned art, cuisine, and architecture. Iconic landmarks and charming cafes await.",
            "highlights": [
                "Eiffel Tower",
                "Louvre Museum",
                "Notre-Dame Cathedral",
                "Montmartre and Sacré-Cœur",
                "Champs-Élysées and Arc de Triomphe",
                "Seine River cruise"
            ],
            "best_time_to_visit": "April-June or September-October",
            "average_duration": "4-5 days",
            "local_tips": [
                "Learn basic French phrases - locals appreciate the effort",
                "Museum pass can save money on multiple attractions",
                "Avoid tourist restaurants near major landmarks",
                "Metro is the easiest way to get around"
            ],
            "currency": "Euro (EUR)",
            "language": "French",
            "visa_info": "Schengen visa for non-EU visitors"
        }),
        "bali" => json!({
            "destination": "Bali",
            "country": "Indonesia",
            "region": "Southeast Asia",
            "description": "Bali is a tropical paradise known for its beautiful beaches, ancient temples, and vibrant arts scene. The Island of the Gods offers something for every traveler.",
            "highlights": [
                "Uluwatu Temple",
                "Rice terraces of Tegallalang",
                "Sacred Monkey Forest in Ubud",
                "Mount Batur sunrise trek",
                "Seminyak beach clubs",
                "Traditional dance performances"
            ],
            "best_time_to_visit": "April-October (dry season)",
            "average_duration": "7-10 days",
            "local_tips": [
                "Respect local customs and dress modestly at temples",
                "Rent a scooter for flexibility",
                "Bargain at markets but with a smile",
                "Try the local cuisine - nasi goreng and satay!"
            ],
            "currency": "Indonesian Rupiah (IDR)",
            "language": "Indonesian (Bahasa Indonesia)",
            "visa_info": "Visa on arrival available for 30 days (extendable)"
        }),
        _ => return None,
    };
    Some(entry)
}

fn generic_entry(destination: &str) -> Value {
    json!({
        "destination": destination,
        "country": "Unknown",
        "region": "Unknown",
        "description": format!("Information for {destination} is being prepared."),
        "highlights": ["Local attractions", "Cultural sites", "Restaurants", "Shopping areas"],
        "best_time_to_visit": "Check local climate",
        "average_duration": "3-5 days",
        "local_tips": [
            "Research local customs before visiting",
            "Learn basic local phrases",
            "Check visa requirements"
        ],
        "currency": "Verify local currency",
        "language": "Verify local language",
        "visa_info": "Check with embassy"
    })
}
