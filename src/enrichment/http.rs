use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::app::{Result, ScoutError};
use crate::enrichment::{EnrichmentConfig, Enricher};

const SYSTEM_PROMPT: &str = "You fill in missing graphics card specifications. \
     Reply with a single JSON object and nothing else.";

/// Completion client for OpenAI-compatible chat endpoints.
pub struct HttpEnricher {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpEnricher {
    pub fn new(config: &EnrichmentConfig) -> Result<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            ScoutError::Enrichment(format!("{} is not set", config.api_key_env))
        })?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("gpuscout/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl Enricher for HttpEnricher {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let req_body = json!({
            "model": self.model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "temperature": 0.0
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&req_body)
            .send()
            .await?;

        response.error_for_status_ref()?;

        let body: Value = response.json().await?;
        message_content(&body)
            .map(String::from)
            .ok_or_else(|| ScoutError::Enrichment("reply had no message content".into()))
    }
}

fn message_content(body: &Value) -> Option<&str> {
    body.get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|msg| msg.get("content"))
        .and_then(Value::as_str)
}
