//! Prompt construction for action synthesis.
//!
//! The analytics digest is a compact plain-text rendition of the
//! computed analytics; the surrounding instruction blocks pin the JSON
//! shape the completion is expected to produce.

use crate::models::{Analytics, TrendDirection};

/// Renders the analytics bundle as a compact plain-text digest.
pub fn format_analytics(analytics: &Analytics) -> String {
    let mut lines: Vec<String> = Vec::new();

    let summary = &analytics.summary;
    lines.push("📊 DATA SUMMARY:".to_string());
    lines.push(format!("- Total rows: {}", summary.rows));
    lines.push(format!("- Number of columns: {}", summary.columns));
    if !summary.column_names.is_empty() {
        let mut preview = summary
            .column_names
            .iter()
            .take(5)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        if summary.column_names.len() > 5 {
            preview.push_str(" ...");
        }
        lines.push(format!("- Columns: {}", preview));
    }

    lines.push("\n📈 KPI ANALYSIS:".to_string());
    lines.push("- Statistical Summary:".to_string());
    for (column, stats) in &analytics.kpis.statistics {
        match stats.mean {
            Some(mean) => lines.push(format!("  * {}: Average {:.2}", column, mean)),
            None => lines.push(format!("  * {}: Insufficient data", column)),
        }
    }
    lines.push("- Categorical Analysis:".to_string());
    for (column, stats) in &analytics.kpis.categorical {
        lines.push(format!(
            "  * {}: {} unique values",
            column, stats.unique_count
        ));
    }

    lines.push("\n📊 TREND ANALYSIS:".to_string());
    for (column, record) in analytics.trends.iter() {
        let phrase = match record.direction {
            TrendDirection::Increasing => "↗️ INCREASING trend",
            TrendDirection::Decreasing => "↘️ DECREASING trend",
            TrendDirection::Stable => "➡️ STABLE trend",
        };
        lines.push(format!("  * {}: {}", column, phrase));
        if let Some(correlation) = record.correlation {
            lines.push(format!("    (Correlation: {:.3})", correlation));
        }
    }

    if !analytics.sample_data.head.is_empty() {
        lines.push("\n📝 SAMPLE DATA:".to_string());
        for (column, value) in analytics.sample_data.first_row_fields().take(3) {
            lines.push(format!("  * {}: {}", column, value));
        }
    }

    lines.join("\n")
}

/// Builds the full action-plan prompt around the analytics digest.
pub fn build_plan_prompt(digest: &str) -> String {
    format!(
        r#"
Based on the following data analysis results, suggest concrete action items for business.

{digest}

Please respond in the following JSON format:

{{
    "action_items": [
        {{
            "priority": "high|medium|low",
            "category": "performance|optimization|risk|opportunity|data_quality",
            "title": "Short title",
            "description": "Detailed description",
            "expected_impact": "Expected impact",
            "timeline": "Time frame (e.g.: 1 week, 1 month)",
            "responsible": "Who should be responsible"
        }}
    ],
    "summary": "General evaluation and recommendations summary",
    "key_insights": [
        "Key finding 1",
        "Key finding 2",
        "Key finding 3"
    ]
}}

Action items should focus on:
- Performance improvements
- Risk reduction
- Evaluating opportunities
- Data quality improvement
- Operational optimization

Each action item should be concrete, measurable, and actionable.
"#
    )
}

/// Builds the second-pass prompt that asks for updated priorities given
/// a business context.
pub fn build_reprioritize_prompt(plan_json: &str, context: &str) -> String {
    format!(
        r#"
Reprioritize the existing action items according to the following business context:

Business Context: {context}

Existing Action Items: {plan_json}

Please respond in the same JSON format, but with priorities updated according to the business context.
"#
    )
}
