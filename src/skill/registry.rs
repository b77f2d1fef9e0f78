use std::collections::HashMap;
use std::sync::Arc;

use super::{
    CreateTravelPlanSkill, GetDestinationReviewsSkill, GetWeatherSkill, QueryPricesSkill,
    SearchDestinationSkill, Skill,
};
use crate::error::{TrekError, TrekResult};
use crate::types::{SkillCategory, SkillDefinition};

/// Registry of skills, keyed by name. Listing follows registration order.
pub struct SkillRegistry {
    skills: HashMap<String, Arc<dyn Skill>>,
    order: Vec<String>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self {
            skills: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// The five built-in travel skills.
    pub fn with_builtin_skills() -> Self {
        let mut registry = Self::new();
        let builtins: [Arc<dyn Skill>; 5] = [
            Arc::new(SearchDestinationSkill),
            Arc::new(QueryPricesSkill),
            Arc::new(GetDestinationReviewsSkill),
            Arc::new(GetWeatherSkill),
            Arc::new(CreateTravelPlanSkill),
        ];
        for skill in builtins {
            let registered = registry.register(skill);
            debug_assert!(registered.is_ok(), "built-in skill names must be distinct");
        }
        registry
    }

    pub fn register(&mut self, skill: Arc<dyn Skill>) -> TrekResult<()> {
        let name = skill.name().to_string();
        if self.skills.contains_key(&name) {
            return Err(TrekError::DuplicateSkill { name });
        }
        self.order.push(name.clone());
        self.skills.insert(name, skill);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Skill>> {
        self.skills.get(name).cloned()
    }

    /// Like [`get`](Self::get), but a missing skill is an error.
    pub fn require(&self, name: &str) -> TrekResult<Arc<dyn Skill>> {
        self.get(name).ok_or_else(|| TrekError::SkillNotFound {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.skills.contains_key(name)
    }

    pub fn list(&self) -> Vec<Arc<dyn Skill>> {
        self.order
            .iter()
            .filter_map(|name| self.skills.get(name).cloned())
            .collect()
    }

    pub fn list_names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn filter_by_category(&self, category: SkillCategory) -> Vec<Arc<dyn Skill>> {
        self.list()
            .into_iter()
            .filter(|s| s.category() == category)
            .collect()
    }

    /// Category filter from a wire string. Unknown categories are an error.
    pub fn filter_by_category_name(&self, category: &str) -> TrekResult<Vec<Arc<dyn Skill>>> {
        let category: SkillCategory = category.parse()?;
        Ok(self.filter_by_category(category))
    }

    pub fn get_definitions(&self) -> Vec<SkillDefinition> {
        self.list().iter().map(|s| s.to_definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SkillRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillRegistry")
            .field("skills", &self.order)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Params;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct StubSkill {
        name: &'static str,
        category: SkillCategory,
    }

    #[async_trait]
    impl Skill for StubSkill {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "stub"
        }

        fn category(&self) -> SkillCategory {
            self.category
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object", "required": []})
        }

        fn output_schema(&self) -> Value {
            json!({"type": "object"})
        }

        async fn execute(&self, _parameters: &Params) -> TrekResult<Params> {
            Ok(Params::new())
        }
    }

    fn stub(name: &'static str, category: SkillCategory) -> Arc<dyn Skill> {
        Arc::new(StubSkill { name, category })
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = SkillRegistry::new();
        assert!(registry.is_empty());

        registry.register(stub("a", SkillCategory::Weather)).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("a"));
        assert_eq!(registry.get("a").unwrap().name(), "a");
        assert!(registry.get("b").is_none());
    }

    #[test]
    fn require_reports_missing_skill() {
        let mut registry = SkillRegistry::new();
        registry.register(stub("a", SkillCategory::Weather)).unwrap();

        assert_eq!(registry.require("a").unwrap().name(), "a");
        let err = registry.require("teleport").err().unwrap();
        assert!(matches!(err, TrekError::SkillNotFound { ref name } if name == "teleport"));
        assert_eq!(err.to_string(), "Skill not found: teleport");
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut registry = SkillRegistry::new();
        registry.register(stub("a", SkillCategory::Weather)).unwrap();
        let err = registry
            .register(stub("a", SkillCategory::Pricing))
            .unwrap_err();
        assert!(matches!(err, TrekError::DuplicateSkill { name } if name == "a"));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("a").unwrap().category(),
            SkillCategory::Weather
        );
    }

    #[test]
    fn listing_preserves_registration_order() {
        let mut registry = SkillRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register(stub(name, SkillCategory::Planning)).unwrap();
        }
        assert_eq!(registry.list_names(), vec!["zeta", "alpha", "mid"]);
        let defs = registry.get_definitions();
        assert_eq!(defs[0].name, "zeta");
        assert_eq!(defs[2].name, "mid");
    }

    #[test]
    fn builtin_registry_has_five_skills() {
        let registry = SkillRegistry::with_builtin_skills();
        assert_eq!(
            registry.list_names(),
            vec![
                "search_destination",
                "query_prices",
                "get_destination_reviews",
                "get_weather",
                "create_travel_plan"
            ]
        );
        for def in registry.get_definitions() {
            assert_eq!(def.required_fields(), vec!["destination"]);
            assert_eq!(def.version, "1.0.0");
        }
    }

    #[test]
    fn filter_by_category() {
        let registry = SkillRegistry::with_builtin_skills();
        let weather = registry.filter_by_category(SkillCategory::Weather);
        assert_eq!(weather.len(), 1);
        assert_eq!(weather[0].name(), "get_weather");

        let pricing = registry.filter_by_category_name("PRICING").unwrap();
        assert_eq!(pricing[0].name(), "query_prices");

        assert!(registry.filter_by_category_name("nightlife").is_err());
    }
}
