//! REST client for the travel backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use super::ItineraryStore;
use crate::config::BackendConfig;
use crate::error::{TrekError, TrekResult};
use crate::types::Params;

pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> TrekResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// A client for the configured backend, or `None` when no URL is set.
    pub fn from_config(config: &BackendConfig) -> TrekResult<Option<Self>> {
        match config.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(url) => Ok(Some(Self::new(
                url,
                Duration::from_secs(config.timeout_secs),
            )?)),
            None => Ok(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get_destinations(&self, params: &Params) -> TrekResult<Value> {
        let query: Vec<(String, String)> = params
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let v = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), v)
            })
            .collect();
        self.send(self.client.get(self.url("destinations")).query(&query))
            .await
    }

    pub async fn get_attractions(&self, destination_id: u64) -> TrekResult<Value> {
        self.send(
            self.client
                .get(self.url(&format!("destinations/{destination_id}/attractions"))),
        )
        .await
    }

    pub async fn create_itinerary(&self, data: &Params) -> TrekResult<Value> {
        self.send(self.client.post(self.url("itineraries")).json(data))
            .await
    }

    async fn send(&self, builder: RequestBuilder) -> TrekResult<Value> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("Backend request failed: {e}");
            TrekError::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Backend returned {status}: {body}");
            return Err(TrekError::Backend {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.json().await?)
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl ItineraryStore for BackendClient {
    async fn create_itinerary(&self, data: &Params) -> TrekResult<Value> {
        BackendClient::create_itinerary(self, data).await
    }
}
