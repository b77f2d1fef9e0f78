//! Planning workflow — collect, search, recommend, book.
//!
//! Stages run in order over a shared [`PlanningState`]. A failing stage
//! writes its error into the state and the remaining stages still run.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use crate::collab::completion::extract_json_object;
use crate::collab::{CompletionService, ItineraryStore};
use crate::dispatch::{Dispatcher, SkillInvocationResult};
use crate::error::TrekResult;
use crate::request::{RequestParser, TripRequest};
use crate::skill::{GetDestinationReviewsSkill, SearchDestinationSkill};
use crate::template::TemplatePlanner;
use crate::types::Params;

pub const SEARCH_TEMPLATE: &str = "quick_check";

/// Fields the completion service may fill in during collection.
const COLLECTED_STRING_FIELDS: [&str; 5] =
    ["destination", "start_date", "end_date", "accommodation_type", "pace"];

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanningState {
    pub user_message: String,
    pub metadata: Params,
    pub collected_info: Option<TripRequest>,
    pub search_results: Vec<SkillInvocationResult>,
    pub recommendations: Vec<Value>,
    pub summary: Option<String>,
    pub booking_status: Option<Value>,
    pub final_plan: Option<Value>,
    pub error: Option<String>,
}

impl PlanningState {
    pub fn new(user_message: impl Into<String>, metadata: Params) -> Self {
        Self {
            user_message: user_message.into(),
            metadata,
            ..Default::default()
        }
    }

    pub fn destination(&self) -> Option<&str> {
        self.collected_info
            .as_ref()
            .and_then(|r| r.destination.as_deref())
    }
}

/// One step of the workflow.
#[async_trait]
pub trait WorkflowStage: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, state: &mut PlanningState) -> TrekResult<()>;
}

/// Parse the message into a [`TripRequest`], refined by the completion service when ready.
pub struct CollectInfoStage {
    parser: RequestParser,
    completion: Arc<dyn CompletionService>,
}

impl CollectInfoStage {
    pub fn new(parser: RequestParser, completion: Arc<dyn CompletionService>) -> Self {
        Self { parser, completion }
    }
}

#[async_trait]
impl WorkflowStage for CollectInfoStage {
    fn name(&self) -> &str {
        "collect_info"
    }

    async fn run(&self, state: &mut PlanningState) -> TrekResult<()> {
        let mut request = self.parser.parse(&state.user_message, &state.metadata);
        if !self.completion.is_ready() {
            tracing::debug!("Completion service not ready, using parsed request");
            state.collected_info = Some(request);
            return Ok(());
        }

        state.collected_info = Some(request.clone());
        let prompt = format!(
            "Extract the travel requirements from the message below. Reply with one JSON \
             object using the keys destination, start_date (YYYY-MM-DD), end_date \
             (YYYY-MM-DD), accommodation_type and pace. Omit keys that are not mentioned.\n\n\
             Message: {}",
            state.user_message
        );
        let reply = self.completion.complete(&prompt).await?;
        let Some(fields) = extract_json_object(&reply) else {
            tracing::warn!("Completion reply had no JSON object, keeping parsed request");
            return Ok(());
        };

        for key in COLLECTED_STRING_FIELDS {
            let Some(value) = fields
                .get(key)
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|v| !v.is_empty())
            else {
                continue;
            };
            let value = value.to_string();
            match key {
                "destination" => request.destination = Some(value),
                "start_date" => request.start_date = Some(value),
                "end_date" => request.end_date = Some(value),
                "accommodation_type" => request.accommodation_type = value,
                _ => request.pace = value,
            }
        }
        tracing::info!("Collected info: destination={:?}", request.destination);
        state.collected_info = Some(request);
        Ok(())
    }
}

/// Run the quick-check template for the destination.
pub struct SearchStage {
    dispatcher: Arc<Dispatcher>,
    templates: TemplatePlanner,
}

impl SearchStage {
    pub fn new(dispatcher: Arc<Dispatcher>, templates: TemplatePlanner) -> Self {
        Self {
            dispatcher,
            templates,
        }
    }
}

#[async_trait]
impl WorkflowStage for SearchStage {
    fn name(&self) -> &str {
        "search"
    }

    async fn run(&self, state: &mut PlanningState) -> TrekResult<()> {
        state.search_results.clear();
        let Some(request) = state.collected_info.as_ref().filter(|r| r.has_destination()) else {
            tracing::warn!("Destination not specified, returning empty results");
            return Ok(());
        };

        let calls = self
            .templates
            .fill_named(SEARCH_TEMPLATE, &request.to_parameters())?;
        let batch = self.dispatcher.invoke_parallel(calls).await;
        tracing::info!(
            "Search results: {} successful, {} failed",
            batch.successful,
            batch.failed
        );
        state.search_results = batch.results;
        Ok(())
    }
}

/// Turn search results into recommendation entries.
pub struct RecommendStage {
    completion: Arc<dyn CompletionService>,
}

impl RecommendStage {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }
}

#[async_trait]
impl WorkflowStage for RecommendStage {
    fn name(&self) -> &str {
        "recommend"
    }

    async fn run(&self, state: &mut PlanningState) -> TrekResult<()> {
        state.recommendations = build_recommendations(state);
        tracing::info!("Generated {} recommendations", state.recommendations.len());

        if state.recommendations.is_empty() || !self.completion.is_ready() {
            return Ok(());
        }

        let prompt = format!(
            "Write a short travel recommendation for this trip.\n\nRequest: {}\n\nOptions: {}",
            serde_json::to_string(&state.collected_info)?,
            serde_json::to_string(&state.recommendations)?
        );
        state.summary = Some(self.completion.complete(&prompt).await?);
        Ok(())
    }
}

fn build_recommendations(state: &PlanningState) -> Vec<Value> {
    let find = |skill: &str| {
        state
            .search_results
            .iter()
            .find(|r| r.skill_name == skill)
            .and_then(|r| r.result())
    };
    let (Some(request), Some(info)) = (
        state.collected_info.as_ref(),
        find(SearchDestinationSkill::NAME),
    ) else {
        return Vec::new();
    };

    let destination = info
        .get("destination")
        .and_then(|d| d.as_str())
        .or(state.destination())
        .unwrap_or("Unknown");
    let highlights: Vec<Value> = info
        .get("highlights")
        .and_then(|h| h.as_array())
        .map(|h| h.iter().take(3).cloned().collect())
        .unwrap_or_default();
    let rating = find(GetDestinationReviewsSkill::NAME)
        .and_then(|r| r.get("overall_rating"))
        .cloned()
        .unwrap_or(Value::Null);

    vec![json!({
        "itinerary_id": "rec_001",
        "title": format!("{destination} Classic Journey"),
        "destination": destination,
        "days": request.duration_days,
        "highlights": highlights,
        "rating": rating,
        "estimated_cost": request.budget
    })]
}

/// Settle the booking status and assemble the final plan.
pub struct BookStage {
    store: Option<Arc<dyn ItineraryStore>>,
}

impl BookStage {
    pub fn new(store: Option<Arc<dyn ItineraryStore>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl WorkflowStage for BookStage {
    fn name(&self) -> &str {
        "book"
    }

    async fn run(&self, state: &mut PlanningState) -> TrekResult<()> {
        let mut stored: TrekResult<()> = Ok(());
        let status = match state.recommendations.first() {
            None => json!({
                "status": "no_recommendations",
                "message": "No recommendations to book"
            }),
            Some(selected) => {
                let mut status = json!({
                    "status": "pending",
                    "message": "Awaiting confirmation",
                    "selected_itinerary": selected.get("itinerary_id").cloned().unwrap_or(Value::Null)
                });
                if let Some(store) = &self.store {
                    let data = match selected {
                        Value::Object(map) => map.clone(),
                        _ => Params::new(),
                    };
                    match store.create_itinerary(&data).await {
                        Ok(response) => status["itinerary"] = response,
                        Err(e) => stored = Err(e),
                    }
                }
                status
            }
        };

        tracing::info!("Booking status: {}", status["status"]);
        state.final_plan = Some(json!({
            "recommendations": state.recommendations,
            "booking": status,
            "summary": state.summary
        }));
        state.booking_status = Some(status);
        stored
    }
}

/// Ordered stages over a [`PlanningState`].
pub struct PlanningWorkflow {
    stages: Vec<Arc<dyn WorkflowStage>>,
}

impl PlanningWorkflow {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// collect_info → search → recommend → book.
    pub fn standard(
        dispatcher: Arc<Dispatcher>,
        parser: RequestParser,
        completion: Arc<dyn CompletionService>,
        store: Option<Arc<dyn ItineraryStore>>,
    ) -> Self {
        let mut workflow = Self::new();
        workflow.add_stage(Arc::new(CollectInfoStage::new(parser, completion.clone())));
        workflow.add_stage(Arc::new(SearchStage::new(
            dispatcher,
            TemplatePlanner::with_builtin_templates(),
        )));
        workflow.add_stage(Arc::new(RecommendStage::new(completion)));
        workflow.add_stage(Arc::new(BookStage::new(store)));
        workflow
    }

    pub fn add_stage(&mut self, stage: Arc<dyn WorkflowStage>) {
        self.stages.push(stage);
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub async fn run(&self, message: &str, metadata: Params) -> PlanningState {
        tracing::info!("Starting planning workflow");
        let mut state = PlanningState::new(message, metadata);
        for stage in &self.stages {
            tracing::info!("[{}] starting", stage.name());
            if let Err(e) = stage.run(&mut state).await {
                tracing::error!("[{}] error: {e}", stage.name());
                state.error = Some(e.to_string());
            }
        }
        state
    }
}

impl Default for PlanningWorkflow {
    fn default() -> Self {
        Self::new()
    }
}
