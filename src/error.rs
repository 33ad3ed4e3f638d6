//! Error types for dataset loading, completion calls, and plan extraction.
//!
//! Only `LoadError` is ever surfaced to the user: completion and
//! extraction failures are absorbed by the synthesis pipeline, which
//! falls back to a deterministic plan instead of failing the request.

use crate::dataset::ColumnType;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a tabular dataset from disk.
///
/// These are fatal to the analysis request and propagate to `main`.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file extension is not one we know how to parse.
    #[error("unsupported file extension '{0}' (expected .csv or .tsv)")]
    UnsupportedExtension(String),

    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV/TSV content could not be parsed (ragged rows, bad quoting).
    #[error("failed to parse file: {0}")]
    Csv(#[from] csv::Error),

    /// A cell past the inference window does not match the column's type.
    #[error("type conflict in column '{column}' at row {row}: '{value}' is not {expected}")]
    TypeConflict {
        column: String,
        row: usize,
        value: String,
        expected: ColumnType,
    },

    /// The file has no header row to name columns with.
    #[error("file has no header row")]
    MissingHeaders,
}

/// Errors from the injected completion backend.
///
/// Never propagates past the synthesizer: any variant is treated the
/// same as an unparseable completion and recovered via fallback.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("cannot connect to completion backend at {url}")]
    Connect { url: String },

    #[error("completion request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("completion API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed response from completion backend: {0}")]
    InvalidResponse(String),

    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Errors from extracting a structured plan out of raw completion text.
///
/// Internal to the synthesizer; always recovered via fallback or by
/// keeping the pre-reprioritization plan.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The text contains no `{` ... `}` span to try.
    #[error("completion contains no JSON object")]
    NoJsonObject,

    /// The brace-delimited span is not valid JSON.
    #[error("extracted text is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The JSON parsed but has no `action_items` field.
    #[error("completion JSON has no action_items field")]
    MissingActionItems,

    /// The JSON has `action_items` but does not form a well-formed plan.
    #[error("completion JSON is not a valid action plan: {0}")]
    InvalidPlan(#[source] serde_json::Error),
}
