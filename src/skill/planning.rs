//! `create_travel_plan` — day-by-day itinerary with a budget split.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::params::{opt_f64, required_str, str_list, str_or, u64_or};
use super::{catalog_key, into_params, Skill};
use crate::error::TrekResult;
use crate::types::{Params, SkillCategory};

/// Budget share per spending bucket.
pub const BUDGET_SPLIT: [(&str, f64); 6] = [
    ("flights", 0.30),
    ("accommodation", 0.25),
    ("food", 0.20),
    ("activities", 0.15),
    ("transport", 0.05),
    ("buffer", 0.05),
];

pub struct CreateTravelPlanSkill;

impl CreateTravelPlanSkill {
    pub const NAME: &'static str = "create_travel_plan";

    fn budget_breakdown(budget: Option<f64>) -> Params {
        let mut breakdown = Params::new();
        let total = budget.filter(|b| *b > 0.0);
        for (bucket, share) in BUDGET_SPLIT {
            let amount = total.map(|b| round_cents(b * share)).unwrap_or(0.0);
            breakdown.insert(bucket.into(), json!(amount));
        }
        breakdown.insert("total".into(), json!(total.unwrap_or(0.0)));
        breakdown
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[async_trait]
impl Skill for CreateTravelPlanSkill {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Create a comprehensive travel plan with day-by-day itinerary, budget breakdown, packing list, and booking recommendations"
    }

    fn category(&self) -> SkillCategory {
        SkillCategory::Planning
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "destination": {"type": "string", "description": "Travel destination"},
                "duration_days": {
                    "type": "integer",
                    "description": "Number of days for the trip",
                    "default": 5
                },
                "budget": {"type": "number", "description": "Total budget in USD"},
                "travel_dates": {
                    "type": "object",
                    "properties": {
                        "start": {"type": "string"},
                        "end": {"type": "string"}
                    }
                },
                "interests": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Traveler interests and preferences"
                },
                "accommodation_type": {
                    "type": "string",
                    "description": "Preferred accommodation style",
                    "default": "mid-range"
                },
                "pace": {
                    "type": "string",
                    "description": "Travel pace (relaxed, moderate, packed)",
                    "default": "moderate"
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
                "title": {"type": "string"},
                "overview": {"type": "string"},
                "itinerary": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "day": {"type": "integer"},
                            "date": {"type": "string"},
                            "theme": {"type": "string"},
                            "activities": {"type": "array", "items": {"type": "string"}},
                            "meals": {"type": "array", "items": {"type": "string"}}
                        }
                    }
                },
                "budget_breakdown": {
                    "type": "object",
                    "properties": {
                        "flights": {"type": "number"},
                        "accommodation": {"type": "number"},
                        "food": {"type": "number"},
                        "activities": {"type": "number"},
                        "transport": {"type": "number"},
                        "buffer": {"type": "number"},
                        "total": {"type": "number"}
                    }
                },
                "packing_list": {"type": "array", "items": {"type": "string"}},
                "tips": {"type": "array", "items": {"type": "string"}},
                "booking_recommendations": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["destination"]
        })
    }

    async fn execute(&self, parameters: &Params) -> TrekResult<Params> {
        let destination = required_str(parameters, Self::NAME, "destination")?;
        let duration_days = u64_or(parameters, "duration_days", 5) as usize;
        let budget = opt_f64(parameters, "budget");
        let accommodation_type = str_or(parameters, "accommodation_type", "mid-range");
        let pace = str_or(parameters, "pace", "moderate");
        let interests = str_list(parameters, "interests");
        let travel_dates = parameters
            .get("travel_dates")
            .filter(|v| v.is_object())
            .cloned()
            .unwrap_or_else(|| json!({"start": "", "end": ""}));

        let plan = itinerary_entry(&catalog_key(destination))
            .unwrap_or_else(|| generic_itinerary(destination));

        let itinerary: Vec<Value> = plan
            .days
            .into_iter()
            .take(duration_days)
            .enumerate()
            .map(|(i, (theme, activities, meals))| {
                json!({
                    "day": i + 1,
                    "date": format!("Day {}", i + 1),
                    "theme": theme,
                    "activities": activities,
                    "meals": meals
                })
            })
            .collect();

        Ok(into_params(json!({
            "destination": destination,
            "title": plan.title,
            "theme": plan.theme,
            "overview": plan.overview,
            "itinerary": itinerary,
            "budget_breakdown": Self::budget_breakdown(budget),
            "packing_list": plan.packing,
            "tips": plan.tips,
            "booking_recommendations": plan.booking,
            "travel_dates": travel_dates,
            "preferences": {
                "interests": interests,
                "accommodation_type": accommodation_type,
                "pace": pace
            }
        })))
    }
}

type DayPlan = (&'static str, Vec<&'static str>, Vec<&'static str>);

struct Itinerary {
    title: String,
    theme: &'static str,
    overview: String,
    days: Vec<DayPlan>,
    packing: Vec<&'static str>,
    tips: Vec<&'static str>,
    booking: Vec<&'static str>,
}

fn itinerary_entry(key: &str) -> Option<Itinerary> {
    let plan = match key {
        "tokyo" => Itinerary {
            title: "Tokyo Adventure".into(),
            theme: "Modern meets Traditional",
            overview: "Experience the perfect blend of cutting-edge technology and ancient traditions in Japan's vibrant capital.".into(),
            days: vec![
                (
                    "Arrival & Traditional Tokyo",
                    vec!["Arrive at Narita/Haneda Airport", "Check in at hotel in Shinjuku", "Explore Shibuya Crossing", "Dinner at local izakaya"],
                    vec!["Breakfast on flight", "Lunch at Shibuya cafe", "Dinner at izakaya"],
                ),
                (
                    "Ancient Temples & Culture",
                    vec!["Senso-ji Temple visit", "Nakamise shopping street", "Asakusa traditional district", "Sumida River cruise"],
                    vec!["Hotel breakfast", "Lunch at traditional restaurant", "Dinner at riverside restaurant"],
                ),
                (
                    "Modern Attractions",
                    vec!["Tokyo Skytree", "Akihabara electronic district", "TeamLab Planets digital museum", "Evening at Tokyo Tower"],
                    vec!["Hotel breakfast", "Lunch in Akihabara", "Dinner at Roppongi Hills"],
                ),
                (
                    "Day Trip & Parks",
                    vec!["Day trip to Mt. Fuji (optional)", "Shinjuku Gyoen garden", "Harajuku fashion street", "Takeshita Street exploration"],
                    vec!["Hotel breakfast", "Lunch in Harajuku", "Farewell dinner at tempura restaurant"],
                ),
                (
                    "Departure",
                    vec!["Last minute shopping", "Visit Imperial Palace gardens", "Head to airport"],
                    vec!["Hotel breakfast", "Lunch near palace", "Snacks for flight"],
                ),
            ],
            packing: vec![
                "Comfortable walking shoes",
                "Suica/Pasmo card for transport",
                "Portable WiFi or SIM",
                "Power adapter (Type A/B)",
                "Light rain jacket",
                "Cash (many places don't accept cards)",
            ],
            tips: vec![
                "Get an IC card (Suica/Pasmo/ICOCA) for easy transport",
                "Download Google Maps offline",
                "JR Pass may be worth it for day trips",
                "Peak hours on metro are very crowded",
                "Most museums closed on Mondays",
            ],
            booking: vec![
                "Book Shinkansen tickets in advance for day trips",
                "Make restaurant reservations for fine dining",
                "Consider hotel with breakfast included",
                "Book TeamLab tickets online to skip lines",
            ],
        },
        "paris" => Itinerary {
            title: "Paris Romance".into(),
            theme: "City of Lights",
            overview: "Discover the magic of Paris - from iconic landmarks to hidden gems in charming neighborhoods.".into(),
            days: vec![
                (
                    "Iconic First Impressions",
                    vec!["Arrive at Charles de Gaulle Airport", "Check in at hotel near Marais", "Eiffel Tower visit", "Seine River cruise at sunset"],
                    vec!["Lunch at Latin Quarter", "Dinner near Eiffel Tower"],
                ),
                (
                    "Art & Culture",
                    vec!["Louvre Museum (arrive early)", "Tuileries Garden", "Musée d'Orsay", "Montmartre sunset"],
                    vec!["Café au lait and croissant", "Lunch in Saint-Germain", "Dinner in Montmartre"],
                ),
                (
                    "Historic Paris",
                    vec!["Notre-Dame Cathedral", "Pont Neuf", "Conciergerie", "Latin Quarter exploration", "Luxembourg Gardens"],
                    vec!["Market picnic in the Marais", "Classic French dinner"],
                ),
                (
                    "Palaces & Gardens",
                    vec!["Versailles Day Trip", "Palace of Versailles", "Gardens and Trianon", "Return via train"],
                    vec!["Picnic in Versailles gardens", "Dinner in local neighborhood"],
                ),
                (
                    "Shopping & Departure",
                    vec!["Champs-Élysées shopping", "Arc de Triomphe", "Le Marais boutiques", "Head to airport"],
                    vec!["Final French breakfast", "Lunch in Le Marais"],
                ),
            ],
            packing: vec![
                "Elegant casual clothes for dining",
                "Comfortable walking shoes (cobblestones!)",
                "Light rain jacket",
                "Power adapter (Type E)",
                "Museum pass (if visiting many sites)",
            ],
            tips: vec![
                "Book museum tickets online to avoid lines",
                "Museum pass includes Palace of Versailles",
                "Avoid restaurants on main boulevards",
                "Learn basic French phrases",
                "Be aware of pickpockets near tourist sites",
            ],
            booking: vec![
                "Book Louvre tickets for specific time slot",
                "Make dinner reservations for famous restaurants",
                "Consider Paris Museum Pass for savings",
                "Book Seine cruise in advance for sunset",
            ],
        },
        "bali" => Itinerary {
            title: "Bali Bliss".into(),
            theme: "Island Paradise",
            overview: "Experience the perfect balance of beach relaxation, cultural exploration, and wellness in the Island of the Gods.".into(),
            days: vec![
                (
                    "Arrival & Beach",
                    vec!["Arrive at Ngurah Rai Airport", "Transfer to Seminyak hotel", "Beach relaxation", "Beach club sunset dinner"],
                    vec!["Lunch on arrival", "Dinner at beach club"],
                ),
                (
                    "Cultural Immersion",
                    vec!["Uluwatu Temple visit", "Kecak dance performance", "Jimbaran Beach dinner", "Spa treatment"],
                    vec!["Hotel breakfast", "Lunch at clifftop cafe", "Seafood dinner at Jimbaran"],
                ),
                (
                    "Ubud Wellness",
                    vec!["Transfer to Ubud", "Rice terrace trek", "Traditional cooking class", "Evening yoga session"],
                    vec!["Hotel breakfast", "Lunch at warung", "Own healthy dinner"],
                ),
                (
                    "Nature & Temples",
                    vec!["Sacred Monkey Forest", "Tegallalang Rice Terraces", "Local temple visit", "Balinese massage"],
                    vec!["Hotel breakfast", "Lunch with rice terrace view", "Dinner in Ubud market"],
                ),
                (
                    "Departure",
                    vec!["Morning beach time", "Spa treatment", "Head to airport"],
                    vec!["Hotel breakfast", "Lunch before departure"],
                ),
            ],
            packing: vec![
                "Swimwear and beachwear",
                "Modest clothing for temples",
                "Sunscreen (high SPF)",
                "Insect repellent",
                "Yoga clothes (if interested)",
                "Reef-safe sunscreen for ocean",
            ],
            tips: vec![
                "Bargain at markets but stay friendly",
                "Hire a scooter for flexibility",
                "Book activities through reputable sources",
                "Respect local customs at temples",
                "Try the local coffee (Kopi Luwak!)",
            ],
            booking: vec![
                "Book cooking class in advance",
                "Reserve Uluwatu temple sunset spot",
                "Book beach club day passes early",
                "Consider villa with private pool",
            ],
        },
        _ => return None,
    };
    Some(plan)
}

fn generic_itinerary(destination: &str) -> Itinerary {
    Itinerary {
        title: format!("Explore {destination}"),
        theme: "Adventure Awaits",
        overview: format!("Discover the wonders of {destination} with this curated itinerary."),
        days: vec![
            (
                "Arrival",
                vec!["Arrive at destination", "Check in at hotel", "Local exploration"],
                vec!["Lunch on arrival", "Dinner at local restaurant"],
            ),
            (
                "Main Attractions",
                vec!["Visit top attractions", "Local market exploration", "Cultural sites"],
                vec!["Hotel breakfast", "Lunch in town", "Dinner at local spot"],
            ),
        ],
        packing: vec![
            "Comfortable walking shoes",
            "Weather-appropriate clothing",
            "Camera",
            "Portable charger",
        ],
        tips: vec![
            "Research local customs before visiting",
            "Learn basic local phrases",
            "Stay aware of surroundings",
        ],
        booking: vec![
            "Book popular attractions in advance",
            "Make restaurant reservations for popular spots",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(params: Value) -> Params {
        CreateTravelPlanSkill
            .execute(&into_params(params))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn itinerary_respects_duration() {
        let result = run(json!({"destination": "Tokyo", "duration_days": 3})).await;
        let days = result["itinerary"].as_array().unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[2]["day"], 3);
        assert_eq!(days[2]["date"], "Day 3");
        assert_eq!(result["title"], "Tokyo Adventure");
    }

    #[tokio::test]
    async fn itinerary_is_capped_by_available_days() {
        let result = run(json!({"destination": "Paris", "duration_days": 10})).await;
        assert_eq!(result["itinerary"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn budget_is_split() {
        let result = run(json!({"destination": "bali", "budget": 3000})).await;
        let breakdown = &result["budget_breakdown"];
        assert_eq!(breakdown["flights"], 900.0);
        assert_eq!(breakdown["accommodation"], 750.0);
        assert_eq!(breakdown["food"], 600.0);
        assert_eq!(breakdown["activities"], 450.0);
        assert_eq!(breakdown["transport"], 150.0);
        assert_eq!(breakdown["buffer"], 150.0);
        assert_eq!(breakdown["total"], 3000.0);
    }

    #[tokio::test]
    async fn missing_budget_is_zeroed() {
        let result = run(json!({"destination": "bali", "budget": "$budget"})).await;
        assert_eq!(result["budget_breakdown"]["total"], 0.0);
        assert_eq!(result["budget_breakdown"]["flights"], 0.0);
    }

    #[tokio::test]
    async fn unknown_destination_gets_generic_plan() {
        let result = run(json!({"destination": "Atlantis", "duration_days": 7})).await;
        assert_eq!(result["destination"], "Atlantis");
        assert_eq!(result["title"], "Explore Atlantis");
        assert_eq!(result["itinerary"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn preferences_are_echoed() {
        let result = run(json!({
            "destination": "Tokyo",
            "interests": ["food", "temples"],
            "pace": "relaxed",
            "travel_dates": {"start": "2024-04-01", "end": "2024-04-05"}
        }))
        .await;
        assert_eq!(result["preferences"]["pace"], "relaxed");
        assert_eq!(result["preferences"]["accommodation_type"], "mid-range");
        assert_eq!(result["preferences"]["interests"][1], "temples");
        assert_eq!(result["travel_dates"]["start"], "2024-04-01");
    }
}
