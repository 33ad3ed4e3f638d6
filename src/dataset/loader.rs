//! Dataset loading from delimiter-separated files.
//!
//! The extension decides the delimiter (`.csv` → comma, `.tsv` → tab);
//! anything else is rejected up front, including spreadsheet formats
//! we recognize but do not parse. Column types are inferred from a
//! bounded window of leading rows, then enforced strictly for the rest
//! of the file.

use crate::dataset::{Column, ColumnData, ColumnType, Dataset};
use crate::error::LoadError;
use csv::StringRecord;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Options controlling dataset loading.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// How many leading rows participate in type inference.
    pub infer_rows: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { infer_rows: 100 }
    }
}

impl From<&crate::config::LoaderConfig> for LoadOptions {
    fn from(config: &crate::config::LoaderConfig) -> Self {
        Self {
            infer_rows: config.infer_rows,
        }
    }
}

/// Load a dataset from a `.csv` or `.tsv` file.
pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<Dataset, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let delimiter = match extension.as_str() {
        "csv" => b',',
        "tsv" => b'\t',
        _ => return Err(LoadError::UnsupportedExtension(extension)),
    };

    let file = File::open(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    if headers.is_empty() {
        return Err(LoadError::MissingHeaders);
    }

    let mut records: Vec<StringRecord> = Vec::new();
    for result in reader.records() {
        records.push(result?);
    }

    debug!(
        "Read {} data rows, {} columns from {}",
        records.len(),
        headers.len(),
        path.display()
    );

    let mut columns = Vec::with_capacity(headers.len());
    for (index, name) in headers.iter().enumerate() {
        let kind = infer_column_type(&records, index, options.infer_rows);
        let data = build_column(&records, index, name, kind)?;
        columns.push(Column::new(name.clone(), data));
    }

    Ok(Dataset::new(columns))
}

/// Infer a column's type from its first `window` non-empty cells:
/// all parse as floats → numeric, all parse as booleans → boolean,
/// otherwise text. A column that is all-null in the window is text.
fn infer_column_type(records: &[StringRecord], index: usize, window: usize) -> ColumnType {
    let mut saw_value = false;
    let mut all_numeric = true;
    let mut all_boolean = true;

    for record in records.iter().take(window) {
        let cell = record.get(index).unwrap_or("");
        if cell.is_empty() {
            continue;
        }
        saw_value = true;

        if cell.parse::<f64>().is_err() {
            all_numeric = false;
        }
        if parse_bool(cell).is_none() {
            all_boolean = false;
        }
        if !all_numeric && !all_boolean {
            return ColumnType::Text;
        }
    }

    if !saw_value {
        ColumnType::Text
    } else if all_numeric {
        ColumnType::Numeric
    } else {
        ColumnType::Boolean
    }
}

/// Materialize one column, enforcing the inferred type on every row.
/// Rows past the inference window that do not parse fail with a
/// `TypeConflict` naming the offending cell.
fn build_column(
    records: &[StringRecord],
    index: usize,
    name: &str,
    kind: ColumnType,
) -> Result<ColumnData, LoadError> {
    match kind {
        ColumnType::Numeric => {
            let mut values = Vec::with_capacity(records.len());
            for (row, record) in records.iter().enumerate() {
                let cell = record.get(index).unwrap_or("");
                if cell.is_empty() {
                    values.push(None);
                    continue;
                }
                let parsed: f64 = cell.parse().map_err(|_| LoadError::TypeConflict {
                    column: name.to_string(),
                    row: row + 1,
                    value: cell.to_string(),
                    expected: kind,
                })?;
                // NaN / inf tokens parse but are stored as null so
                // every stored float is finite.
                values.push(parsed.is_finite().then_some(parsed));
            }
            Ok(ColumnData::Numeric(values))
        }
        ColumnType::Boolean => {
            let mut values = Vec::with_capacity(records.len());
            for (row, record) in records.iter().enumerate() {
                let cell = record.get(index).unwrap_or("");
                if cell.is_empty() {
                    values.push(None);
                    continue;
                }
                let parsed = parse_bool(cell).ok_or_else(|| LoadError::TypeConflict {
                    column: name.to_string(),
                    row: row + 1,
                    value: cell.to_string(),
                    expected: kind,
                })?;
                values.push(Some(parsed));
            }
            Ok(ColumnData::Boolean(values))
        }
        ColumnType::Text => {
            let values = records
                .iter()
                .map(|record| {
                    let cell = record.get(index).unwrap_or("");
                    (!cell.is_empty()).then(|| cell.to_string())
                })
                .collect();
            Ok(ColumnData::Text(values))
        }
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_csv_infers_types() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "sales.csv",
            "month,revenue,active\njan,100.5,true\nfeb,90,false\nmar,80,true\n",
        );

        let dataset = load_dataset(&path, &LoadOptions::default()).unwrap();
        assert_eq!(dataset.row_count(), 3);
        assert_eq!(dataset.column_count(), 3);
        assert_eq!(
            dataset.column("month").unwrap().data.kind(),
            ColumnType::Text
        );
        assert_eq!(
            dataset.column("revenue").unwrap().data.kind(),
            ColumnType::Numeric
        );
        assert_eq!(
            dataset.column("active").unwrap().data.kind(),
            ColumnType::Boolean
        );
    }

    #[test]
    fn test_load_tsv_delimiter() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "data.tsv", "a\tb\n1\tx\n2\ty\n");

        let dataset = load_dataset(&path, &LoadOptions::default()).unwrap();
        assert_eq!(dataset.column_count(), 2);
        assert_eq!(dataset.column("a").unwrap().data.kind(), ColumnType::Numeric);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "book.xlsx", "not a spreadsheet");

        let err = load_dataset(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ref e) if e == "xlsx"));

        let path = dir.path().join("noext");
        File::create(&path).unwrap();
        let err = load_dataset(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_dataset(Path::new("/does/not/exist.csv"), &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_empty_cells_are_null() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "nulls.csv", "a,b\n1,x\n,\n3,z\n");

        let dataset = load_dataset(&path, &LoadOptions::default()).unwrap();
        assert_eq!(dataset.column("a").unwrap().data.null_count(), 1);
        assert_eq!(dataset.column("b").unwrap().data.null_count(), 1);
    }

    #[test]
    fn test_whitespace_cells_are_null() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "ws.csv", "a,b\n1,  \n2,y\n");

        let dataset = load_dataset(&path, &LoadOptions::default()).unwrap();
        assert_eq!(dataset.column("b").unwrap().data.null_count(), 1);
    }

    #[test]
    fn test_type_conflict_past_window() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "conflict.csv", "n\n1\n2\nnot-a-number\n");

        let options = LoadOptions { infer_rows: 2 };
        let err = load_dataset(&path, &options).unwrap_err();
        match err {
            LoadError::TypeConflict { column, row, value, expected } => {
                assert_eq!(column, "n");
                assert_eq!(row, 3);
                assert_eq!(value, "not-a-number");
                assert_eq!(expected, ColumnType::Numeric);
            }
            other => panic!("expected TypeConflict, got {other:?}"),
        }
    }

    #[test]
    fn test_conflict_inside_window_makes_text() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "mixed.csv", "n\n1\nabc\n3\n");

        let dataset = load_dataset(&path, &LoadOptions::default()).unwrap();
        assert_eq!(dataset.column("n").unwrap().data.kind(), ColumnType::Text);
    }

    #[test]
    fn test_non_finite_numbers_stored_as_null() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "nan.csv", "n\n1\nNaN\ninf\n4\n");

        let dataset = load_dataset(&path, &LoadOptions::default()).unwrap();
        let column = dataset.column("n").unwrap();
        assert_eq!(column.data.kind(), ColumnType::Numeric);
        assert_eq!(column.data.null_count(), 2);
    }

    #[test]
    fn test_no_data_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "headers_only.csv", "a,b,c\n");

        let dataset = load_dataset(&path, &LoadOptions::default()).unwrap();
        assert_eq!(dataset.row_count(), 0);
        assert_eq!(dataset.column_count(), 3);
    }

    #[test]
    fn test_ragged_rows_fail() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "ragged.csv", "a,b\n1,2\n3,4,5\n");

        let err = load_dataset(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn test_all_null_column_is_text() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "blank.csv", "a,b\n1,\n2,\n");

        let dataset = load_dataset(&path, &LoadOptions::default()).unwrap();
        let column = dataset.column("b").unwrap();
        assert_eq!(column.data.kind(), ColumnType::Text);
        assert_eq!(column.data.null_count(), 2);
    }
}
