//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::llm::Backend;

/// ActionLens - turn tabular business data into prioritized action items
///
/// Load a CSV/TSV file, compute descriptive analytics (summary, KPIs,
/// trends, preview) and ask an LLM for concrete action items. Falls
/// back to rule-based suggestions when the model response can't be
/// parsed. Markdown/JSON reports. Built in Rust.
///
/// Examples:
///   actionlens --file sales.csv
///   actionlens --file sales.csv --context "Q3 focus is customer retention"
///   actionlens --file data.tsv --model llama3.2:latest --format json
///   actionlens --file sales.csv --no-actions
///   actionlens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset file to analyze (CSV or TSV)
    ///
    /// The delimiter is picked from the file extension: `.csv` uses
    /// commas, `.tsv` uses tabs. Other extensions are rejected.
    /// Not required when using --init-config.
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present = "init_config"
    )]
    pub file: Option<PathBuf>,

    /// Business context used to reprioritize action items
    ///
    /// Example: --context "Budget freeze until Q2, retention first".
    /// When empty, the initial priorities are kept as-is.
    #[arg(short, long, default_value = "", value_name = "TEXT")]
    pub context: String,

    /// Model to use for action synthesis
    ///
    /// Can also be set via ACTIONLENS_MODEL env var or .actionlens.toml config.
    #[arg(short, long, default_value = "gemma3:12b", env = "ACTIONLENS_MODEL")]
    pub model: String,

    /// Completion backend (ollama, openai)
    ///
    /// If not specified, uses the config file setting (default: ollama).
    #[arg(long, value_name = "BACKEND")]
    pub backend: Option<Backend>,

    /// Ollama API endpoint URL
    #[arg(long, default_value = "http://localhost:11434", env = "OLLAMA_URL")]
    pub ollama_url: String,

    /// Output file path for the report
    #[arg(
        short,
        long,
        default_value = "actionlens_report.md",
        value_name = "FILE"
    )]
    pub output: PathBuf,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Temperature for LLM responses (0.0 - 1.0)
    ///
    /// Lower values produce more consistent/deterministic output
    #[arg(long, default_value = "0.1")]
    pub temperature: f32,

    /// Request timeout in seconds
    ///
    /// How long to wait for the LLM to respond. Default: from config or 120s.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of rows shown in the report preview
    #[arg(long, value_name = "ROWS")]
    pub preview_rows: Option<usize>,

    /// Skip action synthesis and report analytics only
    ///
    /// No LLM is contacted; the report contains the data summary,
    /// KPIs, trends and the preview.
    #[arg(long)]
    pub no_actions: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .actionlens.toml in the current directory
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .actionlens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the dataset path, empty if not set (should be validated first).
    pub fn dataset_path(&self) -> &Path {
        self.file.as_deref().unwrap_or(Path::new(""))
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate the dataset path
        if let Some(ref file) = self.file {
            if !file.exists() {
                return Err(format!("Dataset file does not exist: {}", file.display()));
            }
            if !file.is_file() {
                return Err(format!("Dataset path is not a file: {}", file.display()));
            }
        }

        // Validate Ollama URL format (only when that backend will be used)
        let uses_ollama = self.backend.map_or(true, |b| b == Backend::Ollama);
        if !self.no_actions && uses_ollama {
            if !self.ollama_url.starts_with("http://") && !self.ollama_url.starts_with("https://") {
                return Err("Ollama URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Validate temperature range
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err("Temperature must be between 0.0 and 1.0".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Validate preview rows if provided
        if let Some(rows) = self.preview_rows {
            if rows == 0 {
                return Err("Preview rows must be at least 1".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            file: Some(PathBuf::from("data.csv")),
            context: String::new(),
            model: "gemma3:12b".to_string(),
            backend: None,
            ollama_url: "http://localhost:11434".to_string(),
            output: PathBuf::from("report.md"),
            format: OutputFormat::Markdown,
            temperature: 0.1,
            timeout: None,
            preview_rows: None,
            no_actions: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    fn with_existing_file(args: &mut Args) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        args.file = Some(file.path().to_path_buf());
        file
    }

    #[test]
    fn test_validation_missing_file() {
        let args = make_args();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_existing_file() {
        let mut args = make_args();
        let _file = with_existing_file(&mut args);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_ollama_url() {
        let mut args = make_args();
        let _file = with_existing_file(&mut args);
        args.ollama_url = "localhost:11434".to_string();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_url_skipped_with_no_actions() {
        let mut args = make_args();
        let _file = with_existing_file(&mut args);
        args.ollama_url = "localhost:11434".to_string();
        args.no_actions = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_url_skipped_for_openai_backend() {
        let mut args = make_args();
        let _file = with_existing_file(&mut args);
        args.ollama_url = "localhost:11434".to_string();
        args.backend = Some(Backend::Openai);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_temperature_range() {
        let mut args = make_args();
        let _file = with_existing_file(&mut args);
        args.temperature = 1.5;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        let _file = with_existing_file(&mut args);
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.file = None;
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
