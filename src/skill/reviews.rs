//! `get_destination_reviews` — ratings, sample reviews and pros/cons.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::params::{bool_or, required_str, str_or, u64_or};
use super::{catalog_key, into_params, Skill};
use crate::error::TrekResult;
use crate::types::{Params, SkillCategory};

pub struct GetDestinationReviewsSkill;

impl GetDestinationReviewsSkill {
    pub const NAME: &'static str = "get_destination_reviews";
}

#[async_trait]
impl Skill for GetDestinationReviewsSkill {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Get user reviews, ratings, and sentiment analysis for travel destinations"
    }

    fn category(&self) -> SkillCategory {
        SkillCategory::Reviews
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "destination": {
                    "type": "string",
                    "description": "Name of the destination to get reviews for"
                },
                "category": {
                    "type": "string",
                    "description": "Filter by category (hotels, attractions, restaurants, general)",
                    "default": "general"
                },
                "limit": {"type": "integer", "description": "Number of reviews to return", "default": 5},
                "include_sentiment": {
                    "type": "boolean",
                    "description": "Include sentiment analysis",
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
                "overall_rating": {"type": "number"},
                "total_reviews": {"type": "integer"},
                "sentiment_breakdown": {
                    "type": "object",
                    "properties": {
                        "positive": {"type": "number"},
                        "neutral": {"type": "number"},
                        "negative": {"type": "number"}
                    }
                },
                "rating_breakdown": {
                    "type": "object",
                    "properties": {
                        "5_star": {"type": "number"},
                        "4_star": {"type": "number"},
                        "3_star": {"type": "number"},
                        "2_star": {"type": "number"},
                        "1_star": {"type": "number"}
                    }
                },
                "reviews": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "author": {"type": "string"},
                            "rating": {"type": "number"},
                            "date": {"type": "string"},
                            "title": {"type": "string"},
                            "content": {"type": "string"},
                            "sentiment": {"type": "string"}
                        }
                    }
                },
                "pros_cons": {
                    "type": "object",
                    "properties": {
                        "pros": {"type": "array", "items": {"type": "string"}},
                        "cons": {"type": "array", "items": {"type": "string"}}
                    }
                }
            },
            "required": ["destination"]
        })
    }

    async fn execute(&self, parameters: &Params) -> TrekResult<Params> {
        let destination = required_str(parameters, Self::NAME, "destination")?;
        let category = str_or(parameters, "category", "general");
        let limit = u64_or(parameters, "limit", 5) as usize;
        let include_sentiment = bool_or(parameters, "include_sentiment", true);

        let mut result = into_params(
            catalog_entry(&catalog_key(destination)).unwrap_or_else(generic_entry),
        );

        if let Some(Value::Array(reviews)) = result.get_mut("reviews") {
            reviews.truncate(limit);
            if !include_sentiment {
                for review in reviews.iter_mut() {
                    if let Some(obj) = review.as_object_mut() {
                        obj.remove("sentiment");
                    }
                }
            }
        }

        result.insert("destination".into(), Value::String(destination.to_string()));
        result.insert("category".into(), Value::String(category.to_string()));
        Ok(result)
    }
}

fn review(author: &str, rating: u8, date: &str, title: &str, content: &str, sentiment: &str) -> Value {
    json!({
        "author": author,
        "rating": rating,
        "date": date,
        "title": title,
        "content": content,
        "sentiment": sentiment
    })
}

fn catalog_entry(key: &str) -> Option<Value> {
    let entry = match key {
        "tokyo" => json!({
            "overall_rating": 4.7,
            "total_reviews": 15420,
            "sentiment_breakdown": {"positive": 85, "neutral": 12, "negative": 3},
            "rating_breakdown": {"5_star": 60, "4_star": 25, "3_star": 10, "2_star": 3, "1_star": 2},
            "reviews": [
                review("Traveler_123", 5, "2024-03-15", "Amazing blend of old and new!",
                    "Tokyo exceeded all expectations. The food, the people, the technology - everything was incredible. Shibuya Crossing is a must-see!",
                    "positive"),
                review("WorldExplorer", 5, "2024-03-10", "Clean, safe, and fascinating",
                    "First time in Japan and I was blown away by how clean and safe everything felt. The metro system takes getting used to but works great.",
                    "positive"),
                review("BudgetBackpacker", 4, "2024-02-28", "Expensive but worth it",
                    "Tokyo is pricey but you get what you pay for. Great value for money overall. Accommodations can be small but functional.",
                    "neutral"),
                review("CultureSeeker", 5, "2024-02-20", "Temple hopping was incredible",
                    "Senso-ji and Meiji Shrine were highlights. The traditional districts like Asakusa preserve so much history.",
                    "positive"),
                review("FirstTimeAsia", 4, "2024-02-15", "Language barrier but manageable",
                    "Not much English spoken outside tourist areas but translation apps helped a lot. Locals are very helpful once you communicate.",
                    "neutral")
            ],
            "pros_cons": {
                "pros": [
                    "Excellent public transportation",
                    "Incredible food scene",
                    "Safety and cleanliness",
                    "Rich culture and history",
                    "Cutting-edge technology"
                ],
                "cons": [
                    "Can be expensive",
                    "Language barrier outside tourist areas",
                    "Crowded during peak seasons",
                    "Accommodations can be small"
                ]
            }
        }),
        "paris" => json!({
            "overall_rating": 4.5,
            "total_reviews": 28340,
            "sentiment_breakdown": {"positive": 78, "neutral": 15, "negative": 7},
            "rating_breakdown": {"5_star": 50, "4_star": 28, "3_star": 15, "2_star": 5, "1_star": 2},
            "reviews": [
                review("RomanticDreamer", 5, "2024-03-14", "City of Romance indeed!",
                    "Paris is magical. The Eiffel Tower at night, Seine river walk, cozy cafes - perfect for couples.",
                    "positive"),
                review("ArtLover", 5, "2024-03-08", "Louvre is a must",
                    "Spent 3 days exploring museums. The Louvre, Musée d'Orsay, and Orangerie are world-class.",
                    "positive"),
                review("PracticalTraveler", 3, "2024-02-25", "Beautiful but touristy",
                    "Many areas feel overly tourist-focused. Step away from main attractions to find authentic Paris.",
                    "neutral"),
                review("FoodieExplorer", 4, "2024-02-18", "Great food but need local tips",
                    "Amazing cuisine but avoid restaurants on main boulevards. Le Marais has fantastic hidden gems.",
                    "neutral")
            ],
            "pros_cons": {
                "pros": [
                    "World-class museums and art",
                    "Beautiful architecture",
                    "Amazing cuisine and wine",
                    "Romantic atmosphere",
                    "Great shopping"
                ],
                "cons": [
                    "Can be crowded with tourists",
                    "Some areas can be pricey",
                    "Language barrier with staff",
                    "Pickpocketing in tourist areas"
                ]
            }
        }),
        "bali" => json!({
            "overall_rating": 4.6,
            "total_reviews": 12780,
            "sentiment_breakdown": {"positive": 82, "neutral": 14, "negative": 4},
            "rating_breakdown": {"5_star": 55, "4_star": 27, "3_star": 12, "2_star": 4, "1_star": 2},
            "reviews": [
                review("BeachLover", 5, "2024-03-12", "Tropical paradise!",
                    "Uluwatu cliffs, beaches in Canggu, rice terraces in Ubud - Bali has it all. The spirituality of Ubud touched my soul.",
                    "positive"),
                review("YogaEnthusiast", 5, "2024-03-05", "Perfect for wellness retreats",
                    "Did a week-long yoga retreat. The energy of this place is special. Healthy food options everywhere.",
                    "positive"),
                review("BudgetTraveler", 4, "2024-02-22", "Great value for money",
                    "Amazing how far your dollar goes here. Great accommodations and food at reasonable prices.",
                    "positive"),
                review("LuxurySeeker", 4, "2024-02-15", "Great villas and resorts",
                    "Stayed in a private villa with pool. Excellent service and beautiful surroundings. Highly recommend Seminyak.",
                    "positive")
            ],
            "pros_cons": {
                "pros": [
                    "Beautiful beaches",
                    "Affordable luxury",
                    "Rich spiritual culture",
                    "Great surfing spots",
                    "Friendly locals"
                ],
                "cons": [
                    "Monkey Forest can be tricky",
                    "Traffic in main areas",
                    "Some areas overly developed",
                    "Bargaining culture takes getting used to"
                ]
            }
        }),
        _ => return None,
    };
    Some(entry)
}

fn generic_entry() -> Value {
    json!({
        "overall_rating": 4.0,
        "total_reviews": 500,
        "sentiment_breakdown": {"positive": 70, "neutral": 20, "negative": 10},
        "rating_breakdown": {"5_star": 40, "4_star": 30, "3_star": 20, "2_star": 7, "1_star": 3},
        "reviews": [
            review("Traveler", 4, "2024-03-01", "Good destination",
                "Had a pleasant experience. Would recommend to friends.", "positive")
        ],
        "pros_cons": {
            "pros": ["Interesting attractions", "Good food", "Friendly people"],
            "cons": ["Some areas need improvement", "Can be crowded"]
        }
    })
}
