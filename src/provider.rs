//! Client for the external multimodal completion API (OpenAI Responses).
//!
//! Built once at startup and shared across requests; the request timeout is
//! baked into the underlying `reqwest::Client`.

use thiserror::Error;

use crate::config::{Config, PROMPT};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider call timed out")]
    Timeout,

    #[error("provider request failed")]
    Request(#[source] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("no output text in provider response")]
    MalformedResponse,
}

#[derive(Debug, Clone)]
pub struct Provider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl Provider {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.provider_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    /// Sends the fixed instruction plus the inline image and returns the
    /// generated text. `image_data_url` is a `data:<mime>;base64,...` URL.
    pub async fn describe(&self, image_data_url: &str) -> Result<String, ProviderError> {
        let payload = serde_json::json!({
            "model": self.model,
            "input": [{
                "role": "user",
                "content": [
                    { "type": "input_text", "text": PROMPT },
                    { "type": "input_image", "image_url": image_data_url },
                ],
            }],
        });

        tracing::debug!(model = %self.model, "sending analyse request to provider");

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Request(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(ProviderError::Request)?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status,
                // enough to diagnose from the log without dumping huge bodies
                body: body.chars().take(500).collect(),
            });
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|_| ProviderError::MalformedResponse)?;

        output_text(&value).ok_or(ProviderError::MalformedResponse)
    }
}

/// First `output_text` part in the Responses API `output` array.
fn output_text(value: &serde_json::Value) -> Option<String> {
    value["output"]
        .as_array()?
        .iter()
        .filter_map(|item| item["content"].as_array())
        .flatten()
        .find(|part| part["type"] == "output_text")
        .and_then(|part| part["text"].as_str())
        .map(str::to_owned)
}
