//! `query_prices` — hotel and flight price estimates.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::params::{days_between, opt_str, required_str, str_or, u64_or};
use super::{catalog_key, into_params, Skill};
use crate::error::TrekResult;
use crate::types::{Params, SkillCategory};

pub const DEFAULT_NIGHTS: i64 = 5;

/// Upper bound for `guests` and `rooms`; larger requests are priced at the cap.
pub const MAX_PARTY_SIZE: u64 = 100;

pub struct QueryPricesSkill;

impl QueryPricesSkill {
    pub const NAME: &'static str = "query_prices";
}

struct FlightProfile {
    base: f64,
    hours_min: u32,
    hours_max: u32,
    direct: bool,
}

fn flight_profile(destination: &str) -> FlightProfile {
    let (base, hours_min, hours_max, direct) = match catalog_key(destination).as_str() {
        "tokyo" => (800.0, 12, 14, true),
        "paris" => (700.0, 8, 10, true),
        "bali" => (1100.0, 18, 22, true),
        _ => (1000.0, 10, 12, false),
    };
    FlightProfile {
        base,
        hours_min,
        hours_max,
        direct,
    }
}

fn class_multiplier(flight_class: &str) -> f64 {
    match flight_class {
        "business" => 3.0,
        "first" => 5.0,
        _ => 1.0,
    }
}

/// (name, rating, price per night, amenities, location)
const HOTELS: [(&str, f64, i64, &[&str], &str); 3] = [
    (
        "Grand Plaza Hotel",
        4.5,
        250,
        &["WiFi", "Pool", "Gym", "Restaurant", "Room Service"],
        "City Center",
    ),
    (
        "Seaside Resort",
        4.8,
        400,
        &["WiFi", "Beach Access", "Spa", "Multiple Restaurants", "Concierge"],
        "Beachfront",
    ),
    (
        "Budget Inn Express",
        3.8,
        90,
        &["WiFi", "Breakfast", "Parking"],
        "Near Airport",
    ),
];

#[async_trait]
impl Skill for QueryPricesSkill {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Get pricing information for hotels and flights to help travelers plan their budget"
    }

    fn category(&self) -> SkillCategory {
        SkillCategory::Pricing
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "destination": {"type": "string", "description": "Name of the destination"},
                "check_in": {"type": "string", "description": "Check-in date (YYYY-MM-DD)"},
                "check_out": {"type": "string", "description": "Check-out date (YYYY-MM-DD)"},
                "guests": {
                    "type": "integer",
                    "description": "Number of guests",
                    "default": 2,
                    "maximum": MAX_PARTY_SIZE
                },
                "rooms": {
                    "type": "integer",
                    "description": "Number of rooms needed",
                    "default": 1,
                    "maximum": MAX_PARTY_SIZE
                },
                "flight_class": {
                    "type": "string",
                    "description": "Flight class (economy, business, first)",
                    "default": "economy"
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
                "dates": {
                    "type": "object",
                    "properties": {
                        "check_in": {"type": "string"},
                        "check_out": {"type": "string"},
                        "nights": {"type": "integer"}
                    }
                },
                "hotels": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "rating": {"type": "number"},
                            "price_per_night": {"type": "number"},
                            "total_price": {"type": "number"},
                            "amenities": {"type": "array", "items": {"type": "string"}},
                            "location": {"type": "string"}
                        }
                    }
                },
                "flights": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "airline": {"type": "string"},
                            "price": {"type": "number"},
                            "duration": {"type": "string"},
                            "stops": {"type": "integer"},
                            "class": {"type": "string"}
                        }
                    }
                },
                "total_budget_estimate": {
                    "type": "object",
                    "properties": {
                        "budget": {"type": "string"},
                        "hotel_total": {"type": "number"},
                        "flight_total": {"type": "number"},
                        "daily_budget": {"type": "number"}
                    }
                }
            },
            "required": ["destination"]
        })
    }

    async fn execute(&self, parameters: &Params) -> TrekResult<Params> {
        let destination = required_str(parameters, Self::NAME, "destination")?;
        let check_in = opt_str(parameters, "check_in");
        let check_out = opt_str(parameters, "check_out");
        let guests = u64_or(parameters, "guests", 2).min(MAX_PARTY_SIZE) as f64;
        let rooms = u64_or(parameters, "rooms", 1).min(MAX_PARTY_SIZE) as i64;
        let flight_class = str_or(parameters, "flight_class", "economy");

        let nights = days_between(check_in, check_out)
            .map(|d| d.max(1))
            .unwrap_or(DEFAULT_NIGHTS);

        let hotels: Vec<Value> = HOTELS
            .iter()
            .map(|(name, rating, per_night, amenities, location)| {
                json!({
                    "name": name,
                    "rating": rating,
                    "price_per_night": per_night,
                    "total_price": per_night.saturating_mul(nights).saturating_mul(rooms),
                    "amenities": amenities,
                    "location": location
                })
            })
            .collect();

        let profile = flight_profile(destination);
        let multiplier = class_multiplier(flight_class);
        let major_price = (profile.base * multiplier * guests) as i64;
        let budget_price = (profile.base * 0.7 * multiplier * guests) as i64;
        let flights = vec![
            json!({
                "airline": "Major Airline",
                "price": major_price,
                "duration": format!("{}-{} hours", profile.hours_min, profile.hours_max),
                "stops": if profile.direct { 0 } else { 1 },
                "class": flight_class
            }),
            json!({
                "airline": "Budget Carrier",
                "price": budget_price,
                "duration": format!("{}-{} hours", profile.hours_min + 4, profile.hours_max + 4),
                "stops": 1,
                "class": flight_class
            }),
        ];

        let hotel_total = HOTELS[0].2.saturating_mul(nights).saturating_mul(rooms);
        let estimate = hotel_total.saturating_add(major_price);

        Ok(into_params(json!({
            "destination": destination,
            "dates": {
                "check_in": check_in.unwrap_or("TBD"),
                "check_out": check_out.unwrap_or("TBD"),
                "nights": nights
            },
            "hotels": hotels,
            "flights": flights,
            "total_budget_estimate": {
                "budget": "mid-range",
                "hotel_total": hotel_total,
                "flight_total": major_price,
                "daily_budget": estimate / nights
            }
        })))
    }
}
