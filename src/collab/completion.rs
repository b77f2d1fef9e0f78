use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::config::CompletionConfig;
use crate::error::{TrekError, TrekResult};

/// Opaque text-completion service.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Credentials are present.
    fn is_configured(&self) -> bool;

    /// The service can take requests now.
    fn is_ready(&self) -> bool;

    async fn complete(&self, prompt: &str) -> TrekResult<String>;
}

/// Stand-in used when no API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCompletion;

#[async_trait]
impl CompletionService for DisabledCompletion {
    fn is_configured(&self) -> bool {
        false
    }

    fn is_ready(&self) -> bool {
        false
    }

    async fn complete(&self, _prompt: &str) -> TrekResult<String> {
        Err(TrekError::CompletionNotConfigured)
    }
}

/// Anthropic Messages API, single-turn and non-streaming.
pub struct AnthropicCompletion {
    client: Client,
    config: CompletionConfig,
}

impl AnthropicCompletion {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn with_client(client: Client, config: CompletionConfig) -> Self {
        Self { client, config }
    }

    fn build_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [{"role": "user", "content": prompt}],
        })
    }
}

impl std::fmt::Debug for AnthropicCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicCompletion")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

#[async_trait]
impl CompletionService for AnthropicCompletion {
    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn is_ready(&self) -> bool {
        self.config.is_configured()
    }

    async fn complete(&self, prompt: &str) -> TrekResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(TrekError::CompletionNotConfigured)?;
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&self.build_body(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TrekError::Completion(format!(
                "Anthropic API error {status}: {body}"
            )));
        }

        let data: serde_json::Value = response.json().await?;
        Ok(extract_text(&data))
    }
}

/// Concatenate the text blocks of a Messages API response.
fn extract_text(data: &serde_json::Value) -> String {
    data.get("content")
        .and_then(|c| c.as_array())
        .map(|blocks| {
            blocks
                .iter()
                .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
                .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

/// Pull the first JSON object out of free text, tolerating code fences and prose.
pub fn extract_json_object(text: &str) -> Option<serde_json::Map<String, serde_json::Value>> {
    text.match_indices('{').find_map(|(start, _)| {
        let mut values =
            serde_json::Deserializer::from_str(&text[start..]).into_iter::<serde_json::Value>();
        match values.next()? {
            Ok(serde_json::Value::Object(map)) => Some(map),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_completion_refuses() {
        let service = DisabledCompletion;
        assert!(!service.is_configured());
        assert!(!service.is_ready());
        let err = service.complete("hello").await.unwrap_err();
        assert!(matches!(err, TrekError::CompletionNotConfigured));
    }

    #[tokio::test]
    async fn anthropic_without_key_is_not_configured() {
        let service = AnthropicCompletion::new(CompletionConfig::default());
        assert!(!service.is_configured());
        let err = service.complete("hello").await.unwrap_err();
        assert!(matches!(err, TrekError::CompletionNotConfigured));
    }

    #[test]
    fn body_uses_config() {
        let config = CompletionConfig {
            api_key: Some("sk-test".into()),
            model: "claude-test".into(),
            max_tokens: 256,
            ..CompletionConfig::default()
        };
        let service = AnthropicCompletion::new(config);
        assert!(service.is_ready());
        let body = service.build_body("Plan Tokyo");
        assert_eq!(body["model"], "claude-test");
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["messages"][0]["content"], "Plan Tokyo");
    }

    #[test]
    fn text_blocks_are_joined() {
        let data = json!({
            "content": [
                {"type": "text", "text": "Hello "},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": "world"}
            ]
        });
        assert_eq!(extract_text(&data), "Hello world");
        assert_eq!(extract_text(&json!({})), "");
    }

    #[test]
    fn json_object_is_extracted_from_prose() {
        let text = "Sure! ```json\n{\"destination\": \"Kyoto\", \"budget\": \"3000\"}\n``` Enjoy.";
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["destination"], "Kyoto");

        assert!(extract_json_object("no json here").is_none());
        assert!(extract_json_object("} backwards {").is_none());
        assert!(extract_json_object("[1, 2]").is_none());
    }

    #[test]
    fn first_of_several_objects_wins() {
        let text = r#"Either {"destination": "Kyoto", "pace": {"days": 2}} or {"destination": "Osaka"}"#;
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["destination"], "Kyoto");
        assert_eq!(map["pace"]["days"], 2);

        let map = extract_json_object(r#"use {braces} like {"destination": "Lima"}"#).unwrap();
        assert_eq!(map["destination"], "Lima");
    }
}
