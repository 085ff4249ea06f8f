//! Explicitly typed in-memory table.
//!
//! Each column is homogeneous and its kind is decided once, when the table is
//! loaded. Numeric columns are the only ones the duplicate resolver aggregates
//! and the only ones that can be charted.

use crate::error::{AnalysisError, Result};

/// The values of a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Integer or floating point values, widened to `f64`.
    Numeric(Vec<Option<f64>>),
    /// Anything that is not numeric, kept as text.
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnData::Numeric(_))
    }

    /// Textual form of the cell at `row`, or `None` for nulls.
    pub fn text_at(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Numeric(values) => values.get(row).copied().flatten().map(format_number),
            ColumnData::Text(values) => values.get(row).cloned().flatten(),
        }
    }

    /// Build a new column from the rows at `indices`, in that order.
    pub fn take(&self, indices: &[usize]) -> Self {
        match self {
            ColumnData::Numeric(values) => {
                ColumnData::Numeric(indices.iter().map(|&i| values[i]).collect())
            }
            ColumnData::Text(values) => {
                ColumnData::Text(indices.iter().map(|&i| values[i].clone()).collect())
            }
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values.into_iter().map(|v| v.map(Into::into)).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_numeric(&self) -> bool {
        self.data.is_numeric()
    }

    /// Numeric values of the column, if it is numeric.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(values) => Some(values),
            ColumnData::Text(_) => None,
        }
    }
}

/// A table of equally long, uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table, checking that all columns have the same length and
    /// that names are unique.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let height = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != height) {
                return Err(AnalysisError::UnreadableFile(format!(
                    "column '{}' has {} rows, expected {}",
                    bad.name,
                    bad.len(),
                    height
                )));
            }
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(AnalysisError::UnreadableFile(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }
        Ok(Self { columns })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.columns.iter().filter(|c| c.is_numeric()).map(|c| c.name.as_str()).collect()
    }
}

/// Integral values print without a fractional part so that e.g. epoch
/// seconds read back as "1700000000" rather than "1700000000.0".
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rejects_ragged_columns() {
        let result = Table::new(vec![
            Column::numeric("a", vec![Some(1.0), Some(2.0)]),
            Column::numeric("b", vec![Some(1.0)]),
        ]);
        assert!(matches!(result, Err(AnalysisError::UnreadableFile(_))));
    }

    #[test]
    fn test_table_rejects_duplicate_names() {
        let result = Table::new(vec![
            Column::numeric("a", vec![Some(1.0)]),
            Column::text("a", vec![Some("x")]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_table_accessors() {
        let table = Table::new(vec![
            Column::text("time", vec![Some("2024-01-01 00:00:00"), None]),
            Column::numeric("value", vec![Some(1.5), None]),
        ])
        .unwrap();

        assert_eq!(table.height(), 2);
        assert_eq!(table.width(), 2);
        assert_eq!(table.column_names(), vec!["time", "value"]);
        assert_eq!(table.numeric_column_names(), vec!["value"]);
        assert!(table.column("missing").is_none());
    }

    #[test]
    fn test_text_at_formats_numbers() {
        let data = ColumnData::Numeric(vec![Some(1700000000.0), Some(2.5), None]);
        assert_eq!(data.text_at(0).as_deref(), Some("1700000000"));
        assert_eq!(data.text_at(1).as_deref(), Some("2.5"));
        assert_eq!(data.text_at(2), None);
    }

    #[test]
    fn test_take_reorders_rows() {
        let data = ColumnData::Text(vec![Some("a".into()), Some("b".into()), Some("c".into())]);
        let taken = data.take(&[2, 0]);
        assert_eq!(taken, ColumnData::Text(vec![Some("c".into()), Some("a".into())]));
    }
}
