pub mod extract;
pub mod validate;

use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::error::AppError;

/// Instruction appended when the caller submits a blank prompt. The provider
/// is treated as unreliable either way; this only raises the odds of a
/// parseable reply.
pub const DEFAULT_STRUCTURE_HINT: &str = "Return only a JSON array of programming courses. \
Each course must have: name (string), description (string), price (number), inStock (boolean). \
Output only valid JSON, no explanation, no markdown, no text.";

#[derive(Clone, Debug)]
pub struct GenerationConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

impl GenerationConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let api_key = env::var("OPENROUTER_API_KEY")
            .map_err(|_| AppError::BadRequest("OPENROUTER_API_KEY is not set".to_string()))?;
        let api_url = env::var("OPENROUTER_API_URL")
            .map_err(|_| AppError::BadRequest("OPENROUTER_API_URL is not set".to_string()))?;
        let model = env::var("OPENROUTER_MODEL")
            .unwrap_or_else(|_| "openai/gpt-3.5-turbo".to_string());

        Ok(Self {
            api_key,
            api_url,
            model,
        })
    }
}

/// The generation provider, at its interface boundary. The returned envelope
/// is opaque; its shape is resolved downstream by [`extract::payload_text`].
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Value, AppError>;
}

pub struct OpenRouterClient {
    client: Client,
    config: GenerationConfig,
}

impl OpenRouterClient {
    pub fn new(config: GenerationConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::BadRequest(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl GenerationClient for OpenRouterClient {
    async fn generate(&self, prompt: &str) -> Result<Value, AppError> {
        let prompt = if prompt.trim().is_empty() {
            DEFAULT_STRUCTURE_HINT
        } else {
            prompt
        };

        let request_body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::warn!("generation provider returned {}: {}", status, body_text);
            return Err(AppError::Generation {
                raw: json!({
                    "status": status.as_u16(),
                    "body": body_text,
                }),
            });
        }

        serde_json::from_str::<Value>(&body_text).map_err(|e| {
            tracing::error!("generation provider returned non-JSON body: {}", e);
            AppError::Generation {
                raw: Value::String(body_text),
            }
        })
    }
}

/// Stand-in used when no provider is configured. Every call reports an
/// explicit error envelope instead of fabricating content.
pub struct NoopGenerationClient;

#[async_trait]
impl GenerationClient for NoopGenerationClient {
    async fn generate(&self, _prompt: &str) -> Result<Value, AppError> {
        Ok(json!({ "error": "generation provider is not configured" }))
    }
}
