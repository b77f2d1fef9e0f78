//! Skills — named, schema-described units of travel domain logic.
//!
//! Every skill implements [`Skill`]. The five built-in skills serve canned
//! catalog data for a handful of destinations and synthesize a generic payload
//! for anything else, so any non-empty destination always yields a result.

pub mod destination;
pub mod params;
pub mod planning;
pub mod pricing;
pub mod registry;
pub mod reviews;
pub mod weather;

pub use destination::SearchDestinationSkill;
pub use planning::CreateTravelPlanSkill;
pub use pricing::QueryPricesSkill;
pub use registry::SkillRegistry;
pub use reviews::GetDestinationReviewsSkill;
pub use weather::GetWeatherSkill;

use async_trait::async_trait;

use crate::error::TrekResult;
use crate::types::{Params, SkillCategory, SkillDefinition};

pub const DEFAULT_SKILL_VERSION: &str = "1.0.0";

/// An invocable skill.
#[async_trait]
pub trait Skill: Send + Sync {
    /// Unique name within a registry.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn category(&self) -> SkillCategory;

    fn version(&self) -> &str {
        DEFAULT_SKILL_VERSION
    }

    /// JSON Schema for accepted parameters. `required` drives dispatcher validation.
    fn input_schema(&self) -> serde_json::Value;

    /// JSON Schema for the produced payload. Discovery only.
    fn output_schema(&self) -> serde_json::Value;

    /// Execute the skill.
    async fn execute(&self, parameters: &Params) -> TrekResult<Params>;

    fn to_definition(&self) -> SkillDefinition {
        SkillDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
            output_schema: self.output_schema(),
            category: self.category(),
            version: self.version().to_string(),
        }
    }
}

/// Normalized catalog key for a destination name.
pub(crate) fn catalog_key(destination: &str) -> String {
    destination.trim().to_lowercase()
}

/// Unwrap a `json!` object literal into a `Params` map.
pub(crate) fn into_params(value: serde_json::Value) -> Params {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Params::new(),
    }
}
