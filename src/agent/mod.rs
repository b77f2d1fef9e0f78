//! Travel agent — parse a request, gather data in parallel, then build a plan.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::dispatch::{BatchResults, Dispatcher, SkillInvocationResult};
use crate::error::TrekResult;
use crate::request::{RequestParser, TripRequest};
use crate::skill::{
    CreateTravelPlanSkill, GetDestinationReviewsSkill, GetWeatherSkill, QueryPricesSkill,
    SearchDestinationSkill,
};
use crate::template::TemplatePlanner;
use crate::types::{Params, SkillCall, SkillDefinition};

pub const NO_DESTINATION_ERROR: &str = "no destination specified";

/// Result of one agent run.
#[derive(Debug, Clone, Serialize)]
pub struct AgentOutcome {
    pub request: TripRequest,
    /// Gathering results in call order: destination, pricing, reviews, weather.
    pub gathered: Vec<SkillInvocationResult>,
    pub plan: Params,
    /// False when `plan` is the fallback structure.
    pub plan_created: bool,
}

pub struct TravelAgent {
    dispatcher: Arc<Dispatcher>,
    parser: RequestParser,
    templates: TemplatePlanner,
}

impl TravelAgent {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            parser: RequestParser::default(),
            templates: TemplatePlanner::with_builtin_templates(),
        }
    }

    pub fn with_parser(mut self, parser: RequestParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_templates(mut self, templates: TemplatePlanner) -> Self {
        self.templates = templates;
        self
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn parser(&self) -> &RequestParser {
        &self.parser
    }

    pub fn templates(&self) -> &TemplatePlanner {
        &self.templates
    }

    pub async fn run(&self, message: &str, metadata: &Params) -> AgentOutcome {
        let request = self.parser.parse(message, metadata);

        let Some(destination) = request.destination.clone() else {
            tracing::warn!("No destination specified, skipping skills");
            let plan = fallback_plan("Unknown", NO_DESTINATION_ERROR, &[]);
            return AgentOutcome {
                request,
                gathered: Vec::new(),
                plan,
                plan_created: false,
            };
        };

        tracing::info!("Gathering travel data for {destination}");
        let gathered = self
            .dispatcher
            .invoke_parallel(gather_calls(&destination, &request))
            .await
            .results;

        let plan_result = self
            .dispatcher
            .invoke(CreateTravelPlanSkill::NAME, plan_parameters(&destination, &request))
            .await;

        match plan_result.outcome {
            Ok(plan) => AgentOutcome {
                request,
                gathered,
                plan,
                plan_created: true,
            },
            Err(e) => {
                tracing::error!("Plan creation failed for {destination}: {e}");
                let plan = fallback_plan(&destination, &e.to_string(), &gathered);
                AgentOutcome {
                    request,
                    gathered,
                    plan,
                    plan_created: false,
                }
            }
        }
    }

    /// Fill a named template from the request and run it as a pipeline.
    ///
    /// Fails before running anything if a step names an unregistered skill.
    pub async fn run_template(
        &self,
        name: &str,
        request: &TripRequest,
    ) -> TrekResult<BatchResults> {
        let calls = self.templates.fill_named(name, &request.to_parameters())?;
        for call in &calls {
            self.dispatcher.registry().require(&call.skill)?;
        }
        tracing::info!("Running template {name} with {} steps", calls.len());
        Ok(self.dispatcher.invoke_pipeline(calls).await)
    }

    pub fn list_available_skills(&self) -> Vec<String> {
        self.dispatcher.registry().list_names()
    }

    pub fn get_skill_info(&self, skill_name: &str) -> Option<SkillDefinition> {
        self.dispatcher.get_skill_info(skill_name)
    }
}

fn gather_calls(destination: &str, request: &TripRequest) -> Vec<SkillCall> {
    let mut pricing = json!({"destination": destination, "guests": 2, "rooms": 1});
    let mut weather = json!({"destination": destination});
    if let Some(start) = &request.start_date {
        pricing["check_in"] = json!(start);
        weather["start_date"] = json!(start);
    }
    if let Some(end) = &request.end_date {
        pricing["check_out"] = json!(end);
        weather["end_date"] = json!(end);
    }

    vec![
        SkillCall::with_json(
            SearchDestinationSkill::NAME,
            json!({"destination": destination, "include_tips": true}),
        ),
        SkillCall::with_json(QueryPricesSkill::NAME, pricing),
        SkillCall::with_json(
            GetDestinationReviewsSkill::NAME,
            json!({"destination": destination, "limit": 5, "include_sentiment": true}),
        ),
        SkillCall::with_json(GetWeatherSkill::NAME, weather),
    ]
}

fn plan_parameters(destination: &str, request: &TripRequest) -> Params {
    let value = json!({
        "destination": destination,
        "duration_days": request.duration_days,
        "budget": request.budget,
        "travel_dates": {
            "start": request.start_date.as_deref().unwrap_or(""),
            "end": request.end_date.as_deref().unwrap_or("")
        },
        "interests": request.interests,
        "accommodation_type": request.accommodation_type,
        "pace": request.pace
    });
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

/// Plan returned when `create_travel_plan` could not run.
fn fallback_plan(destination: &str, error: &str, gathered: &[SkillInvocationResult]) -> Params {
    let raw = |skill: &str| -> Value {
        gathered
            .iter()
            .find(|r| r.skill_name == skill)
            .and_then(|r| r.result())
            .map(|p| Value::Object(p.clone()))
            .unwrap_or(Value::Null)
    };
    let value = json!({
        "destination": destination,
        "title": format!("Travel Plan for {destination}"),
        "overview": "Plan creation encountered an issue.",
        "error": error,
        "raw_data": {
            "destination_info": raw(SearchDestinationSkill::NAME),
            "pricing": raw(QueryPricesSkill::NAME),
            "reviews": raw(GetDestinationReviewsSkill::NAME),
            "weather": raw(GetWeatherSkill::NAME)
        }
    });
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::tests::{scripted, Mode};
    use crate::skill::SkillRegistry;

    fn agent() -> TravelAgent {
        TravelAgent::new(Arc::new(Dispatcher::with_builtin_skills()))
    }

    #[tokio::test]
    async fn full_run_produces_plan() {
        let outcome = agent()
            .run("I want to go to Paris for 3 days with $3,000", &Params::new())
            .await;

        assert!(outcome.plan_created);
        assert_eq!(outcome.request.destination.as_deref(), Some("Paris"));
        assert_eq!(outcome.gathered.len(), 4);
        assert!(outcome.gathered.iter().all(|r| r.is_success()));
        assert_eq!(outcome.gathered[1].skill_name, "query_prices");
        assert_eq!(outcome.plan["title"], "Paris Romance");
        assert_eq!(outcome.plan["itinerary"].as_array().unwrap().len(), 3);
        assert_eq!(outcome.plan["budget_breakdown"]["total"], 3000.0);
    }

    #[tokio::test]
    async fn missing_destination_skips_skills() {
        let agent = agent();
        let outcome = agent.run("help me plan something", &Params::new()).await;

        assert!(!outcome.plan_created);
        assert!(outcome.gathered.is_empty());
        assert_eq!(outcome.plan["error"], NO_DESTINATION_ERROR);
        assert!(outcome.plan["raw_data"]["pricing"].is_null());
        assert_eq!(agent.dispatcher().history_len(), 0);
    }

    #[tokio::test]
    async fn plan_failure_returns_fallback_with_raw_data() {
        let mut registry = SkillRegistry::new();
        registry.register(Arc::new(SearchDestinationSkill)).unwrap();
        registry.register(Arc::new(QueryPricesSkill)).unwrap();
        registry
            .register(scripted(
                "create_travel_plan",
                vec!["destination"],
                Mode::Fail("planner offline"),
            ))
            .unwrap();
        let agent = TravelAgent::new(Arc::new(Dispatcher::new(Arc::new(registry))));

        let metadata = crate::request::metadata_from(json!({"destination": "Tokyo"}));
        let outcome = agent.run("", &metadata).await;

        assert!(!outcome.plan_created);
        let plan = &outcome.plan;
        assert_eq!(plan["title"], "Travel Plan for Tokyo");
        assert!(plan["error"].as_str().unwrap().contains("planner offline"));
        assert_eq!(plan["raw_data"]["destination_info"]["country"], "Japan");
        assert!(plan["raw_data"]["reviews"].is_null());
        assert_eq!(outcome.gathered.len(), 4);
        assert!(!outcome.gathered[2].is_success());
    }

    #[tokio::test]
    async fn run_template_pipelines_request() {
        let agent = agent();
        let request = agent.parser().parse("visit Bali", &Params::new());
        let batch = agent.run_template("basic_planning", &request).await.unwrap();

        assert_eq!(batch.total, 3);
        assert!(batch.all_succeeded());
        assert_eq!(
            batch.result_for("create_travel_plan").unwrap()["title"],
            "Bali Bliss"
        );
        assert!(agent.run_template("grand_tour", &request).await.is_err());
    }

    #[tokio::test]
    async fn run_template_rejects_unregistered_step() {
        let mut templates = TemplatePlanner::with_builtin_templates();
        templates.add(crate::template::Template {
            name: "with_spa".into(),
            description: "Destination plus spa booking".into(),
            steps: vec![
                crate::template::TemplateStep {
                    skill: "search_destination".into(),
                    parameters: crate::request::metadata_from(
                        json!({"destination": "$destination"}),
                    ),
                },
                crate::template::TemplateStep {
                    skill: "book_spa".into(),
                    parameters: Params::new(),
                },
            ],
        });
        let agent = agent().with_templates(templates);
        let request = agent.parser().parse("visit Bali", &Params::new());

        let err = agent.run_template("with_spa", &request).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::TrekError::SkillNotFound { ref name } if name == "book_spa"
        ));
        assert_eq!(agent.dispatcher().history_len(), 0);
    }

    #[test]
    fn skill_discovery() {
        let agent = agent();
        assert_eq!(agent.list_available_skills().len(), 5);
        let info = agent.get_skill_info("get_weather").unwrap();
        assert_eq!(info.name, "get_weather");
        assert!(agent.get_skill_info("teleport").is_none());
    }
}
