//! Rule-based fallback plan, used when no plan can be extracted from
//! the completion.
//!
//! The rules only look at trend directions and null counts, so the
//! same analytics always produce byte-identical plans. The degraded
//! origin is visible to the reader through the plan's `note`.

use crate::models::{
    ActionItem, ActionPlan, Category, Priority, Summary, TrendDirection, TrendSet,
};

/// Derives a deterministic plan from trend directions and null counts.
pub fn derive_plan(summary: &Summary, trends: &TrendSet) -> ActionPlan {
    let mut action_items = Vec::new();

    for (column, record) in trends.iter() {
        match record.direction {
            TrendDirection::Decreasing => action_items.push(ActionItem {
                priority: Priority::High,
                category: Category::Performance,
                title: format!("Investigate the decrease in {} values", column),
                description: format!(
                    "A decreasing trend detected in {} metric. Analyze the reasons.",
                    column
                ),
                expected_impact: "Performance improvement".to_string(),
                timeline: "2 weeks".to_string(),
                responsible: "Analysis team".to_string(),
            }),
            TrendDirection::Increasing => action_items.push(ActionItem {
                priority: Priority::Medium,
                category: Category::Opportunity,
                title: format!("Sustain the increase in {} values", column),
                description: format!(
                    "There is a positive trend in {} metric. Develop strategies to sustain this increase.",
                    column
                ),
                expected_impact: "Growth momentum".to_string(),
                timeline: "1 month".to_string(),
                responsible: "Strategy team".to_string(),
            }),
            TrendDirection::Stable => {}
        }
    }

    for (column, count) in &summary.null_counts {
        match count.as_count() {
            Some(n) if n > 0 => action_items.push(ActionItem {
                priority: Priority::Medium,
                category: Category::DataQuality,
                title: format!("Complete missing data in {} column", column),
                description: format!("{} missing data detected in {} column.", n, column),
                expected_impact: "Data quality increase".to_string(),
                timeline: "1 week".to_string(),
                responsible: "Data team".to_string(),
            }),
            Some(_) => {}
            // Uncoercible but truthy still deserves a look.
            None if count.is_truthy() => action_items.push(ActionItem {
                priority: Priority::Medium,
                category: Category::DataQuality,
                title: format!("Check data quality in {} column", column),
                description: format!("Data quality issues detected in {} column.", column),
                expected_impact: "Data quality increase".to_string(),
                timeline: "1 week".to_string(),
                responsible: "Data team".to_string(),
            }),
            None => {}
        }
    }

    ActionPlan {
        action_items,
        summary: "Action items created based on automatic analysis results.".to_string(),
        key_insights: vec![
            "Data analysis completed".to_string(),
            "Trend analyses reviewed".to_string(),
            "Action items determined".to_string(),
        ],
        note: Some("LLM response could not be parsed, fallback actions used".to_string()),
    }
}
