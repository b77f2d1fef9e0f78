//! Assistant service — wires config, skills, agent and workflow together.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::agent::{AgentOutcome, TravelAgent};
use crate::collab::{
    AnthropicCompletion, BackendClient, CompletionService, DisabledCompletion, HealthProbe,
    ItineraryStore,
};
use crate::config::AssistantConfig;
use crate::dispatch::Dispatcher;
use crate::error::{TrekError, TrekResult};
use crate::request::RequestParser;
use crate::skill::SkillRegistry;
use crate::types::Params;
use crate::workflow::{PlanningState, PlanningWorkflow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Ok,
    NotConfigured,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthComponents {
    pub database: ComponentStatus,
    pub completion: ComponentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub app_env: String,
    pub components: HealthComponents,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanningResponse {
    pub request_id: Uuid,
    pub status: String,
    pub result: PlanningState,
}

pub struct TravelAssistant {
    config: AssistantConfig,
    dispatcher: Arc<Dispatcher>,
    agent: TravelAgent,
    workflow: PlanningWorkflow,
    completion: Arc<dyn CompletionService>,
    store_probe: Option<Arc<dyn HealthProbe>>,
}

impl TravelAssistant {
    /// Build from config: built-in skills, Anthropic completion when a key is
    /// set, and the backend as itinerary store when a URL is set.
    pub fn new(config: AssistantConfig) -> TrekResult<Self> {
        let completion: Arc<dyn CompletionService> = if config.completion.is_configured() {
            Arc::new(AnthropicCompletion::new(config.completion.clone()))
        } else {
            tracing::warn!("ANTHROPIC_API_KEY not configured");
            Arc::new(DisabledCompletion)
        };
        let store = BackendClient::from_config(&config.backend)?
            .map(|client| Arc::new(client) as Arc<dyn ItineraryStore>);
        Ok(Self::from_parts(config, completion, store, None))
    }

    pub fn from_parts(
        config: AssistantConfig,
        completion: Arc<dyn CompletionService>,
        store: Option<Arc<dyn ItineraryStore>>,
        store_probe: Option<Arc<dyn HealthProbe>>,
    ) -> Self {
        let mut dispatcher = Dispatcher::new(Arc::new(SkillRegistry::with_builtin_skills()));
        if let Some(timeout) = config.skills.call_timeout() {
            dispatcher = dispatcher.with_timeout(timeout);
        }
        let dispatcher = Arc::new(dispatcher);
        let parser = RequestParser::new(config.trip_defaults.clone());

        let agent = TravelAgent::new(dispatcher.clone()).with_parser(parser.clone());
        let workflow =
            PlanningWorkflow::standard(dispatcher.clone(), parser, completion.clone(), store);

        Self {
            config,
            dispatcher,
            agent,
            workflow,
            completion,
            store_probe,
        }
    }

    pub fn with_store_probe(mut self, probe: Arc<dyn HealthProbe>) -> Self {
        self.store_probe = Some(probe);
        self
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn agent(&self) -> &TravelAgent {
        &self.agent
    }

    pub async fn health(&self) -> HealthReport {
        let store_ok = match &self.store_probe {
            Some(probe) => probe.health_check().await,
            None => false,
        };
        let database = if store_ok {
            ComponentStatus::Ok
        } else {
            ComponentStatus::Error
        };
        let completion = if self.completion.is_ready() {
            ComponentStatus::Ok
        } else if !self.completion.is_configured() {
            ComponentStatus::NotConfigured
        } else {
            ComponentStatus::Error
        };

        let healthy = database == ComponentStatus::Ok && completion != ComponentStatus::Error;
        HealthReport {
            status: if healthy {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            app_env: self.config.app_env.clone(),
            components: HealthComponents {
                database,
                completion,
            },
        }
    }

    /// Run the planning workflow for a user message.
    pub async fn start_planning(
        &self,
        message: &str,
        metadata: Params,
    ) -> TrekResult<PlanningResponse> {
        if message.trim().is_empty() {
            return Err(TrekError::InvalidRequest("user_message is required".into()));
        }

        let request_id = Uuid::new_v4();
        tracing::info!("[{request_id}] Received planning request: {message}");
        let result = self.workflow.run(message, metadata).await;
        if let Some(error) = &result.error {
            tracing::warn!("[{request_id}] Workflow finished with error: {error}");
        }

        Ok(PlanningResponse {
            request_id,
            status: "completed".into(),
            result,
        })
    }

    /// Run the skill agent for a user message.
    pub async fn plan_trip(&self, message: &str, metadata: &Params) -> AgentOutcome {
        self.agent.run(message, metadata).await
    }
}
