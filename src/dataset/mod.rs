//! In-memory tabular dataset with typed, named, nullable columns.
//!
//! A `Dataset` is immutable once loaded: the loader builds it, the
//! analytics engine only reads it.

pub mod loader;

pub use loader::{load_dataset, LoadOptions};

use std::fmt;

/// Declared scalar type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Finite floating-point values.
    Numeric,
    /// Free text / categorical values.
    Text,
    /// Boolean values; excluded from KPI and trend computation.
    Boolean,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Text => write!(f, "text"),
            ColumnType::Boolean => write!(f, "boolean"),
        }
    }
}

/// Column values, stored densely with one slot per row.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
}

impl ColumnData {
    /// The declared type of this column.
    pub fn kind(&self) -> ColumnType {
        match self {
            ColumnData::Numeric(_) => ColumnType::Numeric,
            ColumnData::Text(_) => ColumnType::Text,
            ColumnData::Boolean(_) => ColumnType::Boolean,
        }
    }

    /// Number of rows (including nulls).
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of null slots.
    pub fn null_count(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Text(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Boolean(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    /// Render the value at `row` for previews. Nulls become `"N/A"`;
    /// integral floats drop their fractional part, other floats keep
    /// two decimals.
    pub fn display_value(&self, row: usize) -> String {
        match self {
            ColumnData::Numeric(v) => match v.get(row).copied().flatten() {
                Some(x) => format_number(x),
                None => NULL_MARKER.to_string(),
            },
            ColumnData::Text(v) => match v.get(row).and_then(|x| x.as_deref()) {
                Some(s) => s.to_string(),
                None => NULL_MARKER.to_string(),
            },
            ColumnData::Boolean(v) => match v.get(row).copied().flatten() {
                Some(b) => b.to_string(),
                None => NULL_MARKER.to_string(),
            },
        }
    }
}

/// Sentinel shown in previews for null values.
pub const NULL_MARKER: &str = "N/A";

/// Format a finite float for display: `100` rather than `100.0`,
/// `99.50` rather than `99.5000001`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// A named column with its values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// An ordered collection of equally-long columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Build a dataset from columns. All columns must have the same
    /// number of rows; the loader guarantees this.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Number of rows (zero for a dataset with no columns).
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Columns in their original file order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_display() {
        assert_eq!(ColumnType::Numeric.to_string(), "numeric");
        assert_eq!(ColumnType::Text.to_string(), "text");
        assert_eq!(ColumnType::Boolean.to_string(), "boolean");
    }

    #[test]
    fn test_null_count() {
        let data = ColumnData::Numeric(vec![Some(1.0), None, Some(3.0), None]);
        assert_eq!(data.null_count(), 2);
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_display_value() {
        let numbers = ColumnData::Numeric(vec![Some(100.0), Some(99.5), None]);
        assert_eq!(numbers.display_value(0), "100");
        assert_eq!(numbers.display_value(1), "99.50");
        assert_eq!(numbers.display_value(2), "N/A");

        let text = ColumnData::Text(vec![Some("east".to_string()), None]);
        assert_eq!(text.display_value(0), "east");
        assert_eq!(text.display_value(1), "N/A");

        let flags = ColumnData::Boolean(vec![Some(true), None]);
        assert_eq!(flags.display_value(0), "true");
        assert_eq!(flags.display_value(1), "N/A");
    }

    #[test]
    fn test_dataset_counts() {
        let dataset = Dataset::new(vec![
            Column::new("a", ColumnData::Numeric(vec![Some(1.0), Some(2.0)])),
            Column::new("b", ColumnData::Text(vec![Some("x".to_string()), None])),
        ]);
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.column_count(), 2);
        assert!(dataset.column("a").is_some());
        assert!(dataset.column("missing").is_none());

        let empty = Dataset::default();
        assert_eq!(empty.row_count(), 0);
        assert_eq!(empty.column_count(), 0);
    }
}
