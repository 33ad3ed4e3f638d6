//! Descriptive analytics over a loaded dataset.
//!
//! The engine is stateless: every method takes the dataset by
//! reference and produces plain data models, so repeated runs over the
//! same dataset always yield identical results.

use crate::analytics::stats;
use crate::dataset::{ColumnData, Dataset};
use crate::models::{
    Analytics, CategoricalStats, KpiSet, NullCount, NumericStats, Preview, Summary,
    TrendDirection, TrendRecord, TrendSet,
};
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;
use tracing::debug;

/// Computes summaries, KPIs, trends and previews from a dataset.
#[derive(Debug, Default)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    /// Creates a new engine.
    pub fn new() -> Self {
        Self
    }

    /// Runs the full analysis: summary, KPIs, trends and a preview of
    /// at most `preview_rows` rows from each end.
    pub fn analyze(&self, dataset: &Dataset, preview_rows: usize) -> Analytics {
        debug!(
            "Computing analytics for {} rows x {} columns",
            dataset.row_count(),
            dataset.column_count()
        );

        Analytics {
            summary: self.summarize(dataset),
            kpis: self.compute_kpis(dataset),
            trends: self.identify_trends(dataset),
            sample_data: self.sample_preview(dataset, preview_rows),
        }
    }

    /// Builds the structural summary: dimensions, column names, column
    /// types and per-column null counts.
    pub fn summarize(&self, dataset: &Dataset) -> Summary {
        let mut data_types = BTreeMap::new();
        let mut null_counts = BTreeMap::new();

        for column in dataset.columns() {
            data_types.insert(column.name.clone(), column.data.kind().to_string());
            null_counts.insert(
                column.name.clone(),
                NullCount::Int(column.data.null_count() as i64),
            );
        }

        Summary {
            rows: dataset.row_count(),
            columns: dataset.column_count(),
            column_names: dataset.columns().iter().map(|c| c.name.clone()).collect(),
            data_types,
            null_counts,
        }
    }

    /// Computes per-column KPIs. Numeric columns with zero non-null
    /// values are omitted entirely; boolean columns contribute nothing.
    pub fn compute_kpis(&self, dataset: &Dataset) -> KpiSet {
        let mut kpis = KpiSet::default();

        for column in dataset.columns() {
            match &column.data {
                ColumnData::Numeric(values) => {
                    let present: Vec<f64> = values.iter().copied().flatten().collect();
                    if present.is_empty() {
                        continue;
                    }
                    kpis.statistics.insert(
                        column.name.clone(),
                        NumericStats {
                            min: present.iter().copied().reduce(f64::min),
                            max: present.iter().copied().reduce(f64::max),
                            mean: stats::mean(&present),
                            median: stats::median(&present),
                            std_dev: stats::std_dev(&present),
                        },
                    );
                }
                ColumnData::Text(values) => {
                    let present: Vec<&str> =
                        values.iter().flatten().map(String::as_str).collect();
                    kpis.categorical
                        .insert(column.name.clone(), categorize(&present));
                }
                ColumnData::Boolean(_) => {}
            }
        }

        kpis
    }

    /// Identifies trends in numeric columns. A column needs at least
    /// two non-null values to carry a trend; with exactly two the
    /// correlation is reported as `0.0`.
    pub fn identify_trends(&self, dataset: &Dataset) -> TrendSet {
        let mut trends = TrendSet::default();

        for column in dataset.columns() {
            let ColumnData::Numeric(values) = &column.data else {
                continue;
            };
            let present: Vec<f64> = values.iter().copied().flatten().collect();
            if present.len() < 2 {
                continue;
            }

            let first = present[0];
            let last = present[present.len() - 1];
            let direction = if last > first {
                TrendDirection::Increasing
            } else if last < first {
                TrendDirection::Decreasing
            } else {
                TrendDirection::Stable
            };

            let correlation = if present.len() == 2 {
                Some(0.0)
            } else {
                stats::index_correlation(&present)
            };

            trends.insert(
                column.name.clone(),
                TrendRecord {
                    direction,
                    correlation,
                    first_value: first,
                    last_value: last,
                    points: present.len(),
                },
            );
        }

        trends
    }

    /// Renders a head/tail preview of at most `rows` rows each. The
    /// two windows overlap when the dataset is shorter than twice the
    /// requested size.
    pub fn sample_preview(&self, dataset: &Dataset, rows: usize) -> Preview {
        let total = dataset.row_count();
        let take = rows.min(total);

        Preview {
            column_names: dataset.columns().iter().map(|c| c.name.clone()).collect(),
            head: render_rows(dataset, 0..take),
            tail: render_rows(dataset, total - take..total),
        }
    }
}

/// Renders the given row range as display strings, one `Vec<String>`
/// per row in column order.
fn render_rows(dataset: &Dataset, range: Range<usize>) -> Vec<Vec<String>> {
    range
        .map(|row| {
            dataset
                .columns()
                .iter()
                .map(|column| column.data.display_value(row))
                .collect()
        })
        .collect()
}

/// Counts distinct values and picks the most frequent one, breaking
/// ties by first occurrence so the result is deterministic.
fn categorize(values: &[&str]) -> CategoricalStats {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for value in values {
        let count = counts[value];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }

    CategoricalStats {
        unique_count: counts.len(),
        most_common: best.map(|(value, _)| value.to_string()),
    }
}
