//! Invocation dispatcher — resolve, validate, execute and record skill calls.
//!
//! [`Dispatcher::invoke`] never returns an error. Every failure mode becomes
//! an [`InvocationError`] inside a [`SkillInvocationResult`], and every call
//! (successful or not) is appended to the in-memory call history.

pub mod batch;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::skill::SkillRegistry;
use crate::types::{Params, SkillDefinition};

pub use batch::{effective_parameters, BatchMode, BatchResults};

/// Why an invocation failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvocationError {
    #[error("skill '{skill_name}' not found")]
    NotFound {
        skill_name: String,
        available: Vec<String>,
    },

    #[error("missing required parameters: {}", .missing.join(", "))]
    Validation {
        missing: Vec<String>,
        required: Vec<String>,
    },

    #[error("{message}")]
    Execution { message: String },

    #[error("skill timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
}

/// Outcome of one invocation attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillInvocationResult {
    pub skill_name: String,
    pub outcome: Result<Params, InvocationError>,
}

impl SkillInvocationResult {
    pub fn succeeded(skill_name: impl Into<String>, result: Params) -> Self {
        Self {
            skill_name: skill_name.into(),
            outcome: Ok(result),
        }
    }

    pub fn failed(skill_name: impl Into<String>, error: InvocationError) -> Self {
        Self {
            skill_name: skill_name.into(),
            outcome: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn result(&self) -> Option<&Params> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&InvocationError> {
        self.outcome.as_ref().err()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error().map(|e| e.to_string())
    }

    pub fn into_result(self) -> Option<Params> {
        self.outcome.ok()
    }
}

impl Serialize for SkillInvocationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("success", &self.is_success())?;
        map.serialize_entry("skill_name", &self.skill_name)?;
        match &self.outcome {
            Ok(result) => {
                map.serialize_entry("result", result)?;
                map.serialize_entry("error", &Option::<String>::None)?;
            }
            Err(error) => {
                map.serialize_entry("result", &Option::<Params>::None)?;
                map.serialize_entry("error", &error.to_string())?;
                match error {
                    InvocationError::NotFound { available, .. } => {
                        map.serialize_entry("available_skills", available)?;
                    }
                    InvocationError::Validation { missing, required } => {
                        map.serialize_entry("missing_parameters", missing)?;
                        map.serialize_entry("required_parameters", required)?;
                    }
                    _ => {}
                }
            }
        }
        map.end()
    }
}

/// One entry of the dispatcher's call history.
#[derive(Debug, Clone, Serialize)]
pub struct CallRecord {
    pub timestamp: DateTime<Utc>,
    pub skill_name: String,
    pub parameters: Params,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Connectivity report for callers that treat the dispatcher as a service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatcherStatus {
    /// Always true: skills run in-process.
    pub connected: bool,
    pub skills_count: usize,
    pub skill_names: Vec<String>,
}

/// Routes named calls to registered skills.
pub struct Dispatcher {
    registry: Arc<SkillRegistry>,
    history: Mutex<Vec<CallRecord>>,
    timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(registry: Arc<SkillRegistry>) -> Self {
        Self {
            registry,
            history: Mutex::new(Vec::new()),
            timeout: None,
        }
    }

    pub fn with_builtin_skills() -> Self {
        Self::new(Arc::new(SkillRegistry::with_builtin_skills()))
    }

    /// Bound every skill execution. Expired calls fail with [`InvocationError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn registry(&self) -> &Arc<SkillRegistry> {
        &self.registry
    }

    /// Invoke a skill by name.
    pub async fn invoke(&self, skill_name: &str, parameters: Params) -> SkillInvocationResult {
        let started_at = Utc::now();
        let start = Instant::now();
        let outcome = self.run(skill_name, &parameters).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match &outcome {
            Ok(_) => tracing::debug!(skill = skill_name, duration_ms, "skill succeeded"),
            Err(e) => tracing::warn!(skill = skill_name, duration_ms, "skill failed: {e}"),
        }

        self.lock_history().push(CallRecord {
            timestamp: started_at,
            skill_name: skill_name.to_string(),
            parameters,
            success: outcome.is_ok(),
            error: outcome.as_ref().err().map(|e| e.to_string()),
            duration_ms,
        });

        SkillInvocationResult {
            skill_name: skill_name.to_string(),
            outcome,
        }
    }

    async fn run(&self, skill_name: &str, parameters: &Params) -> Result<Params, InvocationError> {
        let skill = self
            .registry
            .get(skill_name)
            .ok_or_else(|| InvocationError::NotFound {
                skill_name: skill_name.to_string(),
                available: self.registry.list_names(),
            })?;

        let required = crate::types::required_fields(&skill.input_schema());
        let missing: Vec<String> = required
            .iter()
            .filter(|field| !parameters.contains_key(field.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(InvocationError::Validation { missing, required });
        }

        let execution = AssertUnwindSafe(skill.execute(parameters)).catch_unwind();
        let caught = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, execution)
                .await
                .map_err(|_| InvocationError::Timeout {
                    after_ms: limit.as_millis() as u64,
                })?,
            None => execution.await,
        };

        match caught {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(InvocationError::Execution {
                message: e.to_string(),
            }),
            Err(payload) => Err(InvocationError::Execution {
                message: format!("skill panicked: {}", panic_message(payload.as_ref())),
            }),
        }
    }

    pub fn list_skills(&self) -> Vec<SkillDefinition> {
        self.registry.get_definitions()
    }

    pub fn get_skill_info(&self, skill_name: &str) -> Option<SkillDefinition> {
        self.registry.get(skill_name).map(|s| s.to_definition())
    }

    pub fn status(&self) -> DispatcherStatus {
        DispatcherStatus {
            connected: true,
            skills_count: self.registry.len(),
            skill_names: self.registry.list_names(),
        }
    }

    /// Snapshot of the call history, oldest first.
    pub fn history(&self) -> Vec<CallRecord> {
        self.lock_history().clone()
    }

    pub fn history_len(&self) -> usize {
        self.lock_history().len()
    }

    pub fn clear_history(&self) {
        self.lock_history().clear();
    }

    fn lock_history(&self) -> MutexGuard<'_, Vec<CallRecord>> {
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
