//! OpenAI-compatible completion backend.
//!
//! Works with any server that speaks the `/chat/completions` shape,
//! including OpenAI itself and local gateways. The API key comes from
//! configuration or the `OPENAI_API_KEY` environment variable.

use crate::config::ModelConfig;
use crate::error::CompletionError;
use crate::llm::CompletionClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Chat completions API request.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completions API response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client for an OpenAI-compatible chat completions API.
pub struct OpenAiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout_seconds: u64,
}

impl OpenAiClient {
    /// Creates a client from the model configuration.
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let api_key = match &config.api_key {
            Some(key) => key.clone(),
            None => std::env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY is not set and no api_key is configured")?,
        };

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.name.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_seconds: config.timeout_seconds,
        })
    }

    fn map_send_error(&self, error: reqwest::Error) -> CompletionError {
        if error.is_timeout() {
            CompletionError::Timeout {
                seconds: self.timeout_seconds,
            }
        } else if error.is_connect() {
            CompletionError::Connect {
                url: self.base_url.clone(),
            }
        } else {
            CompletionError::Request(error)
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!("Sending chat request to {} (model {})", url, self.model);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api { status, body });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                CompletionError::InvalidResponse("response contains no choices".to_string())
            })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
