//! External collaborators: completion service, travel backend, relational store.
//!
//! Each is a trait so the workflow and service can run without the real thing.

pub mod backend;
pub mod completion;

pub use backend::BackendClient;
pub use completion::{AnthropicCompletion, CompletionService, DisabledCompletion};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TrekResult;
use crate::types::Params;

/// Somewhere a finished itinerary can be saved.
#[async_trait]
pub trait ItineraryStore: Send + Sync {
    async fn create_itinerary(&self, data: &Params) -> TrekResult<Value>;
}

/// Liveness probe for the relational store.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn health_check(&self) -> bool;
}

/// Probe with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub bool);

#[async_trait]
impl HealthProbe for FixedProbe {
    async fn health_check(&self) -> bool {
        self.0
    }
}
