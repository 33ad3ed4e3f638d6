//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.actionlens.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::llm::Backend;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Dataset loading settings.
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "actionlens_report.md".to_string()
}

/// LLM model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Completion backend ("ollama" or "openai").
    #[serde(default = "default_backend")]
    pub backend: Backend,

    /// Default model name.
    #[serde(default = "default_model")]
    pub name: String,

    /// Ollama API URL.
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Base URL for the OpenAI-compatible API.
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// API key for the OpenAI backend.
    /// Falls back to the OPENAI_API_KEY environment variable when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum tokens in response.
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            name: default_model(),
            ollama_url: default_ollama_url(),
            openai_base_url: default_openai_base_url(),
            api_key: None,
            temperature: default_temperature(),
            timeout_seconds: default_timeout(),
            max_tokens: None,
        }
    }
}

fn default_backend() -> Backend {
    Backend::Ollama
}

fn default_model() -> String {
    "gemma3:12b".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_timeout() -> u64 {
    120
}

/// Dataset loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Number of rows sampled for column type inference.
    #[serde(default = "default_infer_rows")]
    pub infer_rows: usize,

    /// Number of rows shown in the report preview.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            infer_rows: default_infer_rows(),
            preview_rows: default_preview_rows(),
        }
    }
}

fn default_infer_rows() -> usize {
    100
}

fn default_preview_rows() -> usize {
    5
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the KPI section.
    #[serde(default = "default_true")]
    pub include_kpis: bool,

    /// Include the trend section.
    #[serde(default = "default_true")]
    pub include_trends: bool,

    /// Include the data preview section.
    #[serde(default = "default_true")]
    pub include_preview: bool,

    /// Group action items by priority (true) or list them flat (false).
    #[serde(default = "default_true")]
    pub group_by_priority: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_kpis: true,
            include_trends: true,
            include_preview: true,
            group_by_priority: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".actionlens.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Model settings - always override since they have defaults in CLI
        self.model.name = args.model.clone();
        self.model.ollama_url = args.ollama_url.clone();
        self.model.temperature = args.temperature;
        self.general.output = args.output.display().to_string();

        // Optional settings - only override if explicitly provided
        if let Some(backend) = args.backend {
            self.model.backend = backend;
        }
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = timeout;
        }
        if let Some(rows) = args.preview_rows {
            self.loader.preview_rows = rows;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
