//! Action-item synthesis: prompt building, plan extraction from raw
//! completions, and the deterministic rule-based fallback.

pub mod extract;
pub mod fallback;
pub mod pipeline;
pub mod prompt;

pub use pipeline::ActionSynthesizer;
