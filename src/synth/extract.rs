//! Structured plan extraction from raw completion text.
//!
//! Models rarely return bare JSON; the object is usually wrapped in
//! prose or a Markdown fence. The scan takes the span from the first
//! `{` to the last `}` and parses that. Stray braces in surrounding
//! text can defeat it, in which case the caller falls back.

use crate::error::ExtractError;
use crate::models::ActionPlan;
use serde_json::Value;

/// Extracts an `ActionPlan` from raw completion text.
pub fn extract_plan(text: &str) -> Result<ActionPlan, ExtractError> {
    let start = text.find('{').ok_or(ExtractError::NoJsonObject)?;
    let end = text.rfind('}').ok_or(ExtractError::NoJsonObject)?;
    if end < start {
        return Err(ExtractError::NoJsonObject);
    }

    let candidate = &text[start..=end];
    let value: Value = serde_json::from_str(candidate).map_err(ExtractError::InvalidJson)?;

    if value.get("action_items").is_none() {
        return Err(ExtractError::MissingActionItems);
    }

    serde_json::from_value(value).map_err(ExtractError::InvalidPlan)
}
