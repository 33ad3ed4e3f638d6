//! Dataset analytics: summaries, KPIs, trends and previews.

pub mod engine;
pub mod stats;

pub use engine::AnalyticsEngine;
