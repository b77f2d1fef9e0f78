//! Assistant configuration: serde defaults, JSON files, environment overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{TrekError, TrekResult};
use crate::request::TripDefaults;

/// Top-level settings for a [`crate::service::TravelAssistant`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub app_name: String,
    pub app_env: String,
    pub log_level: String,
    pub completion: CompletionConfig,
    pub backend: BackendConfig,
    pub skills: SkillSettings,
    pub trip_defaults: TripDefaults,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            app_name: "travel-assistant".into(),
            app_env: "development".into(),
            log_level: "info".into(),
            completion: CompletionConfig::default(),
            backend: BackendConfig::default(),
            skills: SkillSettings::default(),
            trip_defaults: TripDefaults::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// No key means the completion service is not configured.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub base_url: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "claude-3-5-sonnet-20241022".into(),
            max_tokens: 4096,
            temperature: 0.7,
            base_url: "https://api.anthropic.com".into(),
        }
    }
}

impl CompletionConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the travel backend REST API. Unset disables itinerary booking.
    pub api_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSettings {
    /// Per-call execution limit. Unset means no limit.
    pub call_timeout_ms: Option<u64>,
}

impl SkillSettings {
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }
}

impl AssistantConfig {
    /// Defaults overlaid with process environment variables.
    pub fn from_env() -> TrekResult<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> TrekResult<Self> {
        serde_json::from_str(json).map_err(|e| TrekError::Config(format!("invalid config: {e}")))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> TrekResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Overlay values from `lookup`. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> TrekResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("APP_NAME") {
            self.app_name = v;
        }
        if let Some(v) = get("APP_ENV") {
            self.app_env = v;
        }
        if let Some(v) = get("LOG_LEVEL") {
            self.log_level = v.to_lowercase();
        }
        if let Some(v) = get("ANTHROPIC_API_KEY") {
            self.completion.api_key = Some(v);
        }
        if let Some(v) = get("CLAUDE_MODEL") {
            self.completion.model = v;
        }
        if let Some(v) = get("CLAUDE_MAX_TOKENS") {
            self.completion.max_tokens = parse_env("CLAUDE_MAX_TOKENS", &v)?;
        }
        if let Some(v) = get("CLAUDE_TEMPERATURE") {
            self.completion.temperature = parse_env("CLAUDE_TEMPERATURE", &v)?;
        }
        if let Some(v) = get("BACKEND_API_URL") {
            self.backend.api_url = Some(v);
        }
        if let Some(v) = get("BACKEND_TIMEOUT_SECS") {
            self.backend.timeout_secs = parse_env("BACKEND_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = get("SKILL_CALL_TIMEOUT_MS") {
            self.skills.call_timeout_ms = Some(parse_env("SKILL_CALL_TIMEOUT_MS", &v)?);
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> TrekResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| TrekError::Config(format!("{key} has invalid value '{value}'")))
}
