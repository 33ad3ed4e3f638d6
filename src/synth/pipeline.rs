//! The action synthesis pipeline.
//!
//! One `synthesize` call walks through formatting, completion,
//! extraction and (on failure) fallback, then optionally runs a second
//! completion to reprioritize against a business context. The pipeline
//! never returns an error: every degraded path ends in a usable plan.

use crate::llm::CompletionClient;
use crate::models::{ActionPlan, Analytics};
use crate::synth::{extract, fallback, prompt};
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns analytics into a prioritized action plan via a completion
/// client, with deterministic fallback.
pub struct ActionSynthesizer {
    client: Arc<dyn CompletionClient>,
}

impl ActionSynthesizer {
    /// Creates a synthesizer around the given completion client.
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Name of the underlying model, for report metadata.
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Produces an action plan for the analytics. With a non-empty
    /// `business_context` the draft plan goes through a second
    /// completion pass that adjusts priorities.
    pub async fn synthesize(&self, analytics: &Analytics, business_context: &str) -> ActionPlan {
        let plan = self.draft_plan(analytics).await;
        self.reprioritize(plan, business_context).await
    }

    async fn draft_plan(&self, analytics: &Analytics) -> ActionPlan {
        let digest = prompt::format_analytics(analytics);
        let request = prompt::build_plan_prompt(&digest);
        debug!("Requesting action plan from model {}", self.client.model());

        let completion = match self.client.complete(&request).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Completion failed, using fallback plan: {}", e);
                return fallback::derive_plan(&analytics.summary, &analytics.trends);
            }
        };

        debug!("Parsing completion ({} chars)", completion.len());
        match extract::extract_plan(&completion) {
            Ok(plan) => plan,
            Err(e) => {
                warn!("Could not extract a plan from the completion: {}", e);
                fallback::derive_plan(&analytics.summary, &analytics.trends)
            }
        }
    }

    /// Asks the model to reorder priorities for the given context. Any
    /// failure keeps the input plan; a successful draft is never
    /// degraded into a fallback here.
    pub async fn reprioritize(&self, plan: ActionPlan, business_context: &str) -> ActionPlan {
        if business_context.is_empty() {
            return plan;
        }

        let plan_json = match serde_json::to_string_pretty(&plan) {
            Ok(json) => json,
            Err(e) => {
                warn!("Could not serialize plan for reprioritization: {}", e);
                return plan;
            }
        };

        let request = prompt::build_reprioritize_prompt(&plan_json, business_context);
        debug!("Requesting reprioritization against business context");

        let completion = match self.client.complete(&request).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Reprioritization call failed, keeping original plan: {}", e);
                return plan;
            }
        };

        match extract::extract_plan(&completion) {
            Ok(reprioritized) => reprioritized,
            Err(e) => {
                debug!("Reprioritized completion did not parse, keeping original: {}", e);
                plan
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::AnalyticsEngine;
    use crate::dataset::{Column, ColumnData, Dataset};
    use crate::error::CompletionError;
    use crate::models::Priority;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays a fixed sequence of completion results.
    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Result<String, CompletionError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().collect()),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(CompletionError::InvalidResponse(
                        "script exhausted".to_string(),
                    ))
                })
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    fn sales_analytics() -> Analytics {
        let dataset = Dataset::new(vec![
            Column::new(
                "revenue",
                ColumnData::Numeric(vec![Some(100.0), Some(90.0), Some(80.0)]),
            ),
            Column::new(
                "region",
                ColumnData::Text(vec![
                    Some("east".to_string()),
                    Some("east".to_string()),
                    Some("west".to_string()),
                ]),
            ),
        ]);
        AnalyticsEngine::new().analyze(&dataset, 5)
    }

    fn plan_json(priority: &str) -> String {
        format!(
            r#"{{"action_items": [{{"priority": "{}", "category": "risk", "title": "t", "description": "d", "expected_impact": "e", "timeline": "1 week", "responsible": "team"}}], "summary": "drafted", "key_insights": []}}"#,
            priority
        )
    }

    #[tokio::test]
    async fn test_synthesize_parses_prose_wrapped_completion() {
        let client = ScriptedClient::new(vec![Ok(
            r#"Here is the plan: {"action_items": [], "summary": "ok", "key_insights": []} hope this helps"#
                .to_string(),
        )]);
        let synthesizer = ActionSynthesizer::new(client);

        let plan = synthesizer.synthesize(&sales_analytics(), "").await;

        assert!(plan.action_items.is_empty());
        assert_eq!(plan.summary, "ok");
        assert!(plan.note.is_none());
    }

    #[tokio::test]
    async fn test_synthesize_falls_back_on_unparseable_completion() {
        let client = ScriptedClient::new(vec![Ok("I cannot answer that.".to_string())]);
        let synthesizer = ActionSynthesizer::new(client);

        let plan = synthesizer.synthesize(&sales_analytics(), "").await;

        // Derived from the decreasing revenue trend.
        assert_eq!(plan.action_items.len(), 1);
        assert_eq!(
            plan.action_items[0].title,
            "Investigate the decrease in revenue values"
        );
        assert_eq!(
            plan.note.as_deref(),
            Some("LLM response could not be parsed, fallback actions used")
        );
    }

    #[tokio::test]
    async fn test_synthesize_falls_back_on_completion_error() {
        let client = ScriptedClient::new(vec![Err(CompletionError::Timeout { seconds: 120 })]);
        let synthesizer = ActionSynthesizer::new(client);

        let plan = synthesizer.synthesize(&sales_analytics(), "").await;

        assert!(plan.note.is_some());
        assert_eq!(plan.action_items.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_completion_triggers_fallback() {
        let client = ScriptedClient::new(vec![Ok(String::new())]);
        let synthesizer = ActionSynthesizer::new(client);

        let plan = synthesizer.synthesize(&sales_analytics(), "").await;

        assert!(plan.note.is_some());
        assert_eq!(plan.key_insights.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_action_items_triggers_fallback() {
        let client =
            ScriptedClient::new(vec![Ok(r#"{"summary": "no items field"}"#.to_string())]);
        let synthesizer = ActionSynthesizer::new(client);

        let plan = synthesizer.synthesize(&sales_analytics(), "").await;
        assert!(plan.note.is_some());
    }

    #[tokio::test]
    async fn test_empty_context_skips_reprioritization() {
        // A second, different reply is queued; an empty context must
        // leave it unconsumed.
        let client = ScriptedClient::new(vec![Ok(plan_json("high")), Ok(plan_json("low"))]);
        let synthesizer = ActionSynthesizer::new(client);

        let plan = synthesizer.synthesize(&sales_analytics(), "").await;

        assert_eq!(plan.action_items[0].priority, Priority::High);
    }

    #[tokio::test]
    async fn test_context_triggers_reprioritization() {
        let client = ScriptedClient::new(vec![Ok(plan_json("high")), Ok(plan_json("low"))]);
        let synthesizer = ActionSynthesizer::new(client);

        let plan = synthesizer
            .synthesize(&sales_analytics(), "cash is tight this quarter")
            .await;

        assert_eq!(plan.action_items[0].priority, Priority::Low);
        assert!(plan.note.is_none());
    }

    #[tokio::test]
    async fn test_whitespace_context_still_counts() {
        // Only the empty string skips the second pass.
        let client = ScriptedClient::new(vec![Ok(plan_json("high")), Ok(plan_json("low"))]);
        let synthesizer = ActionSynthesizer::new(client);

        let plan = synthesizer.synthesize(&sales_analytics(), " ").await;

        assert_eq!(plan.action_items[0].priority, Priority::Low);
    }

    #[tokio::test]
    async fn test_failed_reprioritization_keeps_original_plan() {
        let client = ScriptedClient::new(vec![
            Ok(plan_json("high")),
            Ok("not json at all".to_string()),
        ]);
        let synthesizer = ActionSynthesizer::new(client);

        let plan = synthesizer
            .synthesize(&sales_analytics(), "focus on retention")
            .await;

        assert_eq!(plan.summary, "drafted");
        assert_eq!(plan.action_items[0].priority, Priority::High);
        // Still not a fallback plan.
        assert!(plan.note.is_none());
    }

    #[tokio::test]
    async fn test_reprioritization_error_never_degrades_to_fallback() {
        let client = ScriptedClient::new(vec![
            Ok(plan_json("high")),
            Err(CompletionError::Connect {
                url: "http://localhost:11434".to_string(),
            }),
        ]);
        let synthesizer = ActionSynthesizer::new(client);

        let plan = synthesizer
            .synthesize(&sales_analytics(), "expand to new markets")
            .await;

        assert_eq!(plan.summary, "drafted");
        assert!(plan.note.is_none());
    }

    #[tokio::test]
    async fn test_fallback_plan_can_still_be_reprioritized() {
        let client = ScriptedClient::new(vec![
            Ok("garbage".to_string()),
            Ok(plan_json("low")),
        ]);
        let synthesizer = ActionSynthesizer::new(client);

        let plan = synthesizer
            .synthesize(&sales_analytics(), "steady as she goes")
            .await;

        // The reprioritized completion replaced the fallback plan.
        assert_eq!(plan.summary, "drafted");
        assert_eq!(plan.action_items[0].priority, Priority::Low);
    }

    #[test]
    fn test_reprioritize_empty_context_returns_plan_unchanged() {
        let client = ScriptedClient::new(vec![]);
        let synthesizer = ActionSynthesizer::new(client);

        let original: ActionPlan = serde_json::from_str(&plan_json("medium")).unwrap();
        let result = tokio_test::block_on(synthesizer.reprioritize(original.clone(), ""));

        assert_eq!(result, original);
    }
}
