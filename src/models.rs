//! Data models for analytics results and action plans.
//!
//! The field names here are the wire contract: `Analytics` accepts the
//! same JSON mapping an external caller would send (including a few
//! legacy spellings), and `ActionPlan` serializes with exactly the
//! fields reporting collaborators may depend on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Priority of an action item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

impl Priority {
    /// Returns an emoji representation of the priority.
    pub fn emoji(&self) -> &'static str {
        match self {
            Priority::High => "🔴",
            Priority::Medium => "🟡",
            Priority::Low => "🟢",
        }
    }
}

/// Category of an action item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Performance,
    Optimization,
    Risk,
    Opportunity,
    DataQuality,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Performance => write!(f, "Performance"),
            Category::Optimization => write!(f, "Optimization"),
            Category::Risk => write!(f, "Risk"),
            Category::Opportunity => write!(f, "Opportunity"),
            Category::DataQuality => write!(f, "Data Quality"),
        }
    }
}

/// Direction of a numeric column's trend, decided by comparing the
/// first and last non-null values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    /// Returns an arrow representation of the direction.
    pub fn arrow(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "↗️",
            TrendDirection::Decreasing => "↘️",
            TrendDirection::Stable => "➡️",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// A per-column null count. The analytics engine always produces exact
/// integers, but an external caller may send floats, numeric strings,
/// or arbitrary JSON, so the loose shapes are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NullCount {
    Int(i64),
    Float(f64),
    Text(String),
    Other(Value),
}

impl NullCount {
    /// Coerces to an integer count: floats truncate, numeric strings
    /// parse, booleans map to 0/1, null maps to 0. Returns `None` when
    /// no coercion applies.
    pub fn as_count(&self) -> Option<i64> {
        match self {
            NullCount::Int(n) => Some(*n),
            NullCount::Float(f) if f.is_finite() => Some(*f as i64),
            NullCount::Float(_) => None,
            NullCount::Text(s) => s.trim().parse::<i64>().ok(),
            NullCount::Other(Value::Bool(b)) => Some(i64::from(*b)),
            NullCount::Other(Value::Null) => Some(0),
            NullCount::Other(_) => None,
        }
    }

    /// Whether the raw value counts as "truthy" for the fallback's
    /// generic data-quality rule.
    pub fn is_truthy(&self) -> bool {
        match self {
            NullCount::Int(n) => *n != 0,
            NullCount::Float(f) => *f != 0.0,
            NullCount::Text(s) => !s.is_empty(),
            NullCount::Other(Value::Bool(b)) => *b,
            NullCount::Other(Value::Null) => false,
            NullCount::Other(Value::Array(a)) => !a.is_empty(),
            NullCount::Other(Value::Object(o)) => !o.is_empty(),
            NullCount::Other(_) => true,
        }
    }
}

/// Structural summary of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of data rows.
    #[serde(default)]
    pub rows: usize,
    /// Number of columns.
    #[serde(default)]
    pub columns: usize,
    /// Column names in their original order.
    #[serde(default)]
    pub column_names: Vec<String>,
    /// Column name mapped to its type name.
    #[serde(default, deserialize_with = "lenient")]
    pub data_types: BTreeMap<String, String>,
    /// Column name mapped to its null count.
    #[serde(default)]
    pub null_counts: BTreeMap<String, NullCount>,
}

/// Statistics for a numeric column. Each value is absent when it is
/// not computable (e.g. `std_dev` needs at least two points).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
}

impl<'de> Deserialize<'de> for NumericStats {
    /// Accepts either named fields or the legacy positional list
    /// `[min, max, mean, median, std_dev]`. A positional list shorter
    /// than three entries leaves `mean` absent, which downstream
    /// formatting reports as insufficient data.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Named {
                #[serde(default)]
                min: Option<f64>,
                #[serde(default)]
                max: Option<f64>,
                #[serde(default)]
                mean: Option<f64>,
                #[serde(default)]
                median: Option<f64>,
                #[serde(default)]
                std_dev: Option<f64>,
            },
            Positional(Vec<Option<f64>>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Named {
                min,
                max,
                mean,
                median,
                std_dev,
            } => NumericStats {
                min,
                max,
                mean,
                median,
                std_dev,
            },
            Repr::Positional(values) => NumericStats {
                min: values.first().copied().flatten(),
                max: values.get(1).copied().flatten(),
                mean: values.get(2).copied().flatten(),
                median: values.get(3).copied().flatten(),
                std_dev: values.get(4).copied().flatten(),
            },
        })
    }
}

/// Statistics for a text column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalStats {
    /// Distinct non-null value count.
    pub unique_count: usize,
    /// Most frequent non-null value, ties broken by first occurrence.
    /// Absent for an all-null column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_common: Option<String>,
}

/// KPI statistics, partitioned by column kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiSet {
    /// Numeric column statistics. Columns with zero non-null values
    /// are omitted entirely.
    pub statistics: BTreeMap<String, NumericStats>,
    /// Text column statistics.
    pub categorical: BTreeMap<String, CategoricalStats>,
}

impl<'de> Deserialize<'de> for KpiSet {
    /// Lenient per-entry deserialization: entries that do not convert
    /// are skipped rather than failing the whole set.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            statistics: BTreeMap<String, Value>,
            #[serde(default)]
            categorical: BTreeMap<String, Value>,
        }

        let raw = Raw::deserialize(deserializer)?;

        let mut statistics = BTreeMap::new();
        for (name, value) in raw.statistics {
            if let Ok(stats) = serde_json::from_value::<NumericStats>(value) {
                statistics.insert(name, stats);
            }
        }

        let mut categorical = BTreeMap::new();
        for (name, value) in raw.categorical {
            if let Ok(stats) = serde_json::from_value::<CategoricalStats>(value) {
                categorical.insert(name, stats);
            }
        }

        Ok(KpiSet {
            statistics,
            categorical,
        })
    }
}

/// Trend facts for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    /// Direction from comparing the first and last non-null values.
    /// Accepts the legacy `trend` key on input.
    #[serde(alias = "trend")]
    pub direction: TrendDirection,
    /// Pearson correlation between row position and value. `Some(0.0)`
    /// for exactly two points; absent when undefined. Check `points`
    /// before reading meaning into a zero.
    pub correlation: Option<f64>,
    /// First non-null value in column order.
    pub first_value: f64,
    /// Last non-null value in column order.
    pub last_value: f64,
    /// Number of non-null points the trend was computed from.
    #[serde(default)]
    pub points: usize,
}

/// Column name mapped to its trend record, in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendSet(pub BTreeMap<String, TrendRecord>);

impl TrendSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TrendRecord> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: String, record: TrendRecord) {
        self.0.insert(name, record);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TrendRecord)> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for TrendSet {
    /// Accepts either a `{column: record}` map or the legacy list form
    /// where each record carries a `column` field. Malformed entries
    /// are skipped.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let mut records = BTreeMap::new();

        match value {
            Value::Object(entries) => {
                for (column, entry) in entries {
                    if let Ok(record) = serde_json::from_value::<TrendRecord>(entry) {
                        records.insert(column, record);
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    let Value::Object(mut entry) = item else {
                        continue;
                    };
                    let Some(Value::String(column)) = entry.remove("column") else {
                        continue;
                    };
                    if let Ok(record) =
                        serde_json::from_value::<TrendRecord>(Value::Object(entry))
                    {
                        records.insert(column, record);
                    }
                }
            }
            _ => {}
        }

        Ok(TrendSet(records))
    }
}

/// Bounded head/tail sample of a dataset, rendered as display strings.
/// Purely illustrative; never used in statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    #[serde(default)]
    pub column_names: Vec<String>,
    #[serde(default)]
    pub head: Vec<Vec<String>>,
    #[serde(default)]
    pub tail: Vec<Vec<String>>,
}

impl Preview {
    /// (column, value) pairs of the first preview row.
    pub fn first_row_fields(&self) -> impl Iterator<Item = (&String, &String)> {
        self.column_names
            .iter()
            .zip(self.head.first().into_iter().flatten())
    }
}

/// The full analytics bundle handed to the action synthesizer.
///
/// Every field tolerates absence or a malformed shape so that a
/// generic JSON mapping with the same field names is accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Summary,
    #[serde(default, deserialize_with = "lenient")]
    pub kpis: KpiSet,
    #[serde(default)]
    pub trends: TrendSet,
    #[serde(default, deserialize_with = "lenient")]
    pub sample_data: Preview,
}

/// Deserializes a field, falling back to its default when the value is
/// present but malformed.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// A single prioritized, business-readable action item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    /// Priority of the action.
    pub priority: Priority,
    /// Category of the action.
    pub category: Category,
    /// Short title describing the action.
    pub title: String,
    /// Detailed description.
    pub description: String,
    /// Expected business impact.
    pub expected_impact: String,
    /// Time frame (e.g. "1 week", "1 month").
    pub timeline: String,
    /// Who should own the action.
    pub responsible: String,
}

/// The structured output of the synthesis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    /// Ordered action items. Required on the wire.
    pub action_items: Vec<ActionItem>,
    /// Overall evaluation text.
    #[serde(default)]
    pub summary: String,
    /// Key findings, in order.
    #[serde(default)]
    pub key_insights: Vec<String>,
    /// Set only when the plan was degraded (e.g. fallback used).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ActionPlan {
    /// Returns the number of items at the given priority.
    pub fn priority_count(&self, priority: Priority) -> usize {
        self.action_items
            .iter()
            .filter(|item| item.priority == priority)
            .count()
    }
}

/// Metadata about an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the analyzed dataset file.
    pub source_file: String,
    /// Date and time of the analysis.
    pub generated_at: DateTime<Utc>,
    /// Name of the model used for action synthesis.
    pub model_used: String,
    /// Number of data rows.
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
    /// Duration of the run in seconds.
    pub duration_seconds: f64,
}

/// The complete report: analytics plus the optional action plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Metadata about the run.
    pub metadata: ReportMetadata,
    /// Descriptive analytics for the dataset.
    pub analytics: Analytics,
    /// Synthesized action plan, absent when synthesis was skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_plan: Option<ActionPlan>,
}
