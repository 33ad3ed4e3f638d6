//! Markdown and JSON report generation.
//!
//! Renders the full analysis report (analytics plus the optional
//! action plan) from the in-memory models. Sections can be toggled
//! through `ReportConfig`.

use crate::config::ReportConfig;
use crate::dataset::format_number;
use crate::models::{
    ActionItem, ActionPlan, AnalysisReport, Analytics, NullCount, Preview, Priority,
    ReportMetadata,
};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &AnalysisReport, config: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# ActionLens Report\n\n");

    // Metadata section
    output.push_str(&generate_metadata_section(&report.metadata));

    // Data summary
    output.push_str(&generate_summary_section(&report.analytics));

    // KPIs
    if config.include_kpis {
        output.push_str(&generate_kpi_section(&report.analytics));
    }

    // Trends
    if config.include_trends {
        output.push_str(&generate_trend_section(&report.analytics));
    }

    // Sample data
    if config.include_preview {
        output.push_str(&generate_preview_section(&report.analytics.sample_data));
    }

    // Action plan
    if let Some(ref plan) = report.action_plan {
        output.push_str(&generate_plan_section(plan, config.group_by_priority));
    }

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source File:** `{}`\n", metadata.source_file));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Model Used:** `{}`\n", metadata.model_used));
    section.push_str(&format!("- **Rows:** {}\n", metadata.rows));
    section.push_str(&format!("- **Columns:** {}\n", metadata.columns));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the per-column structure table.
fn generate_summary_section(analytics: &Analytics) -> String {
    let summary = &analytics.summary;
    let mut section = String::new();

    section.push_str("## Data Summary\n\n");

    if summary.column_names.is_empty() {
        section.push_str("The dataset has no columns.\n\n");
        return section;
    }

    section.push_str("| Column | Type | Missing |\n");
    section.push_str("|:---|:---|:---:|\n");

    for name in &summary.column_names {
        let kind = summary
            .data_types
            .get(name)
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());
        let missing = summary
            .null_counts
            .get(name)
            .and_then(NullCount::as_count)
            .map_or_else(|| "N/A".to_string(), |n| n.to_string());
        section.push_str(&format!("| `{}` | {} | {} |\n", name, kind, missing));
    }
    section.push('\n');

    section
}

/// Generate the KPI tables.
fn generate_kpi_section(analytics: &Analytics) -> String {
    let kpis = &analytics.kpis;
    let mut section = String::new();

    section.push_str("## Key Performance Indicators\n\n");

    if !kpis.statistics.is_empty() {
        section.push_str("### Numeric Columns\n\n");
        section.push_str("| Column | Min | Max | Mean | Median | Std Dev |\n");
        section.push_str("|:---|---:|---:|---:|---:|---:|\n");
        for (column, stats) in &kpis.statistics {
            section.push_str(&format!(
                "| `{}` | {} | {} | {} | {} | {} |\n",
                column,
                fmt_opt(stats.min),
                fmt_opt(stats.max),
                fmt_opt(stats.mean),
                fmt_opt(stats.median),
                fmt_opt(stats.std_dev),
            ));
        }
        section.push('\n');
    }

    if !kpis.categorical.is_empty() {
        section.push_str("### Categorical Columns\n\n");
        section.push_str("| Column | Unique Values | Most Common |\n");
        section.push_str("|:---|:---:|:---|\n");
        for (column, stats) in &kpis.categorical {
            section.push_str(&format!(
                "| `{}` | {} | {} |\n",
                column,
                stats.unique_count,
                stats.most_common.as_deref().unwrap_or("-"),
            ));
        }
        section.push('\n');
    }

    if kpis.statistics.is_empty() && kpis.categorical.is_empty() {
        section.push_str("No KPI-eligible columns were found.\n\n");
    }

    section
}

/// Generate the trend table.
fn generate_trend_section(analytics: &Analytics) -> String {
    let mut section = String::new();

    section.push_str("## Trends\n\n");

    if analytics.trends.is_empty() {
        section.push_str("No column carried enough data points for a trend.\n\n");
        return section;
    }

    section.push_str("| Column | Direction | Correlation | First | Last | Points |\n");
    section.push_str("|:---|:---|:---:|---:|---:|:---:|\n");
    for (column, record) in analytics.trends.iter() {
        let correlation = record
            .correlation
            .map_or_else(|| "-".to_string(), |c| format!("{:.3}", c));
        section.push_str(&format!(
            "| `{}` | {} {} | {} | {} | {} | {} |\n",
            column,
            record.direction.arrow(),
            record.direction,
            correlation,
            format_number(record.first_value),
            format_number(record.last_value),
            record.points,
        ));
    }
    section.push('\n');

    section
}

/// Generate the head/tail sample tables.
fn generate_preview_section(preview: &Preview) -> String {
    if preview.column_names.is_empty() || preview.head.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Sample Data\n\n");
    section.push_str("### First Rows\n\n");
    section.push_str(&generate_preview_table(&preview.column_names, &preview.head));
    section.push_str("### Last Rows\n\n");
    section.push_str(&generate_preview_table(&preview.column_names, &preview.tail));

    section
}

fn generate_preview_table(column_names: &[String], rows: &[Vec<String>]) -> String {
    let mut table = String::new();

    table.push_str(&format!("| {} |\n", column_names.join(" | ")));
    table.push_str(&format!(
        "|{}\n",
        "---|".repeat(column_names.len())
    ));
    for row in rows {
        table.push_str(&format!("| {} |\n", row.join(" | ")));
    }
    table.push('\n');

    table
}

/// Generate the action plan section.
fn generate_plan_section(plan: &ActionPlan, group_by_priority: bool) -> String {
    let mut section = String::new();

    section.push_str("## Action Plan\n\n");

    if let Some(ref note) = plan.note {
        section.push_str(&format!("> ⚠️ **Note:** {}\n\n", note));
    }

    if !plan.summary.is_empty() {
        section.push_str(plan.summary.as_str());
        section.push_str("\n\n");
    }

    if !plan.key_insights.is_empty() {
        section.push_str("### Key Insights\n\n");
        for (i, insight) in plan.key_insights.iter().enumerate() {
            section.push_str(&format!("{}. {}\n", i + 1, insight));
        }
        section.push('\n');
    }

    if plan.action_items.is_empty() {
        section.push_str("No action items were derived from this dataset.\n\n");
        return section;
    }

    if group_by_priority {
        for priority in [Priority::High, Priority::Medium, Priority::Low] {
            let items: Vec<_> = plan
                .action_items
                .iter()
                .filter(|item| item.priority == priority)
                .collect();
            if items.is_empty() {
                continue;
            }

            section.push_str(&format!(
                "### {} {} Priority\n\n",
                priority.emoji(),
                priority
            ));
            for item in items {
                section.push_str(&generate_item_block(item, false));
            }
        }
    } else {
        section.push_str("### Action Items\n\n");
        for item in &plan.action_items {
            section.push_str(&generate_item_block(item, true));
        }
    }

    section
}

/// Generate a single action item block.
fn generate_item_block(item: &ActionItem, with_badge: bool) -> String {
    let mut block = String::new();

    if with_badge {
        block.push_str(&format!(
            "#### {} **{}** - {}\n\n",
            item.priority.emoji(),
            item.priority.to_string().to_uppercase(),
            item.title
        ));
    } else {
        block.push_str(&format!("#### {}\n\n", item.title));
    }

    block.push_str(&format!("**Category:** {}\n\n", item.category));

    if !item.description.is_empty() {
        block.push_str(&format!("{}\n\n", item.description));
    }

    if !item.expected_impact.is_empty() {
        block.push_str(&format!(
            "> 🎯 **Expected Impact:** {}\n\n",
            item.expected_impact
        ));
    }

    block.push_str(&format!("- **Timeline:** {}\n", item.timeline));
    block.push_str(&format!("- **Responsible:** {}\n\n", item.responsible));

    block.push_str("---\n\n");

    block
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by ActionLens*\n");

    footer
}

/// Render a value that may be absent.
fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), format_number)
}

/// Generate a JSON report.
pub fn generate_json_report(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
