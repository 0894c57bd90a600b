use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error, info};

use shared_config::AppConfig;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Generative language API is not configured")]
    NotConfigured,

    #[error("Generative language API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Generative language request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid generative language response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self, GeminiError> {
        if !config.is_ai_configured() {
            return Err(GeminiError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Plain text completion for a single-turn prompt.
    pub async fn generate_text(&self, model: &str, prompt: &str) -> Result<String, GeminiError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self.generate_content(model, body).await?;
        candidate_text(&response)
    }

    /// Completion constrained to `schema`, decoded into `T`.
    pub async fn generate_json<T>(
        &self,
        model: &str,
        prompt: &str,
        schema: Value,
    ) -> Result<T, GeminiError>
    where
        T: DeserializeOwned,
    {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        });

        let response = self.generate_content(model, body).await?;
        let text = candidate_text(&response)?;

        serde_json::from_str(&text).map_err(|e| {
            GeminiError::InvalidResponse(format!("model output is not the requested JSON: {}", e))
        })
    }

    async fn generate_content(&self, model: &str, body: Value) -> Result<Value, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        info!("Calling generative language model {}", model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;
        debug!("Generative language response: {}", status);

        if !status.is_success() {
            error!("Generative language call failed: {} - {}", status, response_text);
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: response_text,
            });
        }

        serde_json::from_str(&response_text)
            .map_err(|e| GeminiError::InvalidResponse(format!("response is not JSON: {}", e)))
    }
}

fn candidate_text(response: &Value) -> Result<String, GeminiError> {
    response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(|text| text.trim().to_string())
        .ok_or_else(|| GeminiError::InvalidResponse("missing candidate text".to_string()))
}
