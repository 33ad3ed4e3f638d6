//! Ollama completion backend.
//!
//! Talks to a local Ollama server via its `/api/generate` endpoint
//! with streaming disabled.

use crate::config::ModelConfig;
use crate::error::CompletionError;
use crate::llm::CompletionClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Ollama generate API request.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Ollama generate API response.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for a local Ollama server.
pub struct OllamaClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout_seconds: u64,
}

impl OllamaClient {
    /// Creates a client from the model configuration.
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.ollama_url.trim_end_matches('/').to_string(),
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
impl CompletionClient for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };

        debug!("Sending generate request to {} (model {})", url, self.model);

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api { status, body });
        }

        let generate_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        Ok(generate_response.response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
