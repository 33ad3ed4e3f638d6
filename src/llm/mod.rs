//! Completion backends for action synthesis.
//!
//! The synthesizer only sees the `CompletionClient` trait; the
//! concrete backend (a local Ollama server or an OpenAI-compatible
//! API) is picked from configuration.

pub mod ollama;
pub mod openai;

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

use crate::config::ModelConfig;
use crate::error::CompletionError;
use anyhow::Result;
use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A text-completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends a prompt and returns the raw completion text.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;

    /// Name of the underlying model, for report metadata.
    fn model(&self) -> &str;
}

/// Which completion backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Local Ollama server.
    Ollama,
    /// OpenAI-compatible chat completions API.
    Openai,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Ollama => write!(f, "ollama"),
            Backend::Openai => write!(f, "openai"),
        }
    }
}

/// Builds the configured completion client.
pub fn build_client(config: &ModelConfig) -> Result<Arc<dyn CompletionClient>> {
    Ok(match config.backend {
        Backend::Ollama => Arc::new(OllamaClient::new(config)?),
        Backend::Openai => Arc::new(OpenAiClient::new(config)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_wire_names() {
        assert_eq!(serde_json::to_string(&Backend::Ollama).unwrap(), "\"ollama\"");
        assert_eq!(serde_json::to_string(&Backend::Openai).unwrap(), "\"openai\"");
        assert_eq!(Backend::Ollama.to_string(), "ollama");
    }

    #[test]
    fn test_build_ollama_client() {
        let config = ModelConfig::default();
        let client = build_client(&config).unwrap();
        assert_eq!(client.model(), config.name);
    }
}
