//! Timestamp normalization.
//!
//! Turns a raw [`Table`] into a [`Series`]: one parsed timestamp per row,
//! sorted ascending, with the remaining columns carried along. Rows whose
//! timestamp cannot be parsed are dropped on purpose so that partially dirty
//! uploads stay usable; the number of dropped rows is reported back.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::timestamp::parse_timestamp;
use crate::error::{AnalysisError, Result};
use crate::source::{Column, Table};

/// Observations keyed by timestamp.
///
/// `columns` holds every attribute except the timestamp, each aligned with
/// `timestamps` row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub timestamp_column: String,
    pub timestamps: Vec<NaiveDateTime>,
    pub columns: Vec<Column>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of the numeric attribute columns.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns.iter().filter(|c| c.is_numeric()).map(|c| c.name.as_str()).collect()
    }

    /// True when timestamps are unique and strictly increasing.
    pub fn is_strictly_increasing(&self) -> bool {
        self.timestamps.windows(2).all(|w| w[0] < w[1])
    }
}

/// Row accounting for the normalization step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    /// Rows in the uploaded table.
    pub input_rows: usize,
    /// Rows dropped because their timestamp was null or unparseable.
    pub dropped_rows: usize,
}

impl NormalizeStats {
    pub fn kept_rows(&self) -> usize {
        self.input_rows - self.dropped_rows
    }
}

/// Parse `timestamp_column`, drop unparseable rows and sort ascending.
///
/// The sort is stable, so rows sharing a timestamp keep their file order.
/// An empty result is not an error here; the grid builder rejects it.
pub fn normalize(table: &Table, timestamp_column: &str) -> Result<(Series, NormalizeStats)> {
    let column = table
        .column(timestamp_column)
        .ok_or_else(|| AnalysisError::UnknownColumn(timestamp_column.to_string()))?;

    let mut kept: Vec<(usize, NaiveDateTime)> = (0..column.len())
        .filter_map(|row| {
            let text = column.data.text_at(row)?;
            parse_timestamp(&text).map(|ts| (row, ts))
        })
        .collect();
    kept.sort_by_key(|&(_, ts)| ts);

    let stats = NormalizeStats {
        input_rows: table.height(),
        dropped_rows: table.height() - kept.len(),
    };
    if stats.dropped_rows > 0 {
        tracing::warn!(
            column = timestamp_column,
            dropped = stats.dropped_rows,
            total = stats.input_rows,
            "dropped rows with unparseable timestamps"
        );
    }

    let indices: Vec<usize> = kept.iter().map(|&(row, _)| row).collect();
    let columns = table
        .columns()
        .iter()
        .filter(|c| c.name != timestamp_column)
        .map(|c| Column {
            name: c.name.clone(),
            data: c.data.take(&indices),
        })
        .collect();

    let series = Series {
        timestamp_column: timestamp_column.to_string(),
        timestamps: kept.into_iter().map(|(_, ts)| ts).collect(),
        columns,
    };
    Ok((series, stats))
}

/// Pick a timestamp column when the user has not chosen one: the first
/// column with at least one parseable cell, else the first column.
pub fn detect_timestamp_column(table: &Table) -> Option<&str> {
    table
        .columns()
        .iter()
        .find(|c| {
            (0..c.len()).any(|row| c.data.text_at(row).and_then(|t| parse_timestamp(&t)).is_some())
        })
        .or_else(|| table.columns().first())
        .map(|c| c.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(vec![
            Column::numeric("value", vec![Some(3.0), Some(1.0), Some(9.0), Some(2.0)]),
            Column::text(
                "time",
                vec![
                    Some("2024-01-01 00:10:00"),
                    Some("2024-01-01 00:00:00"),
                    Some("garbage"),
                    Some("2024-01-01 00:05:00"),
                ],
            ),
            Column::text("site", vec![Some("c"), Some("a"), Some("x"), Some("b")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_normalize_drops_and_sorts() {
        let (series, stats) = normalize(&table(), "time").unwrap();

        assert_eq!(stats.input_rows, 4);
        assert_eq!(stats.dropped_rows, 1);
        assert_eq!(stats.kept_rows(), 3);
        assert_eq!(series.len(), 3);
        assert!(series.is_strictly_increasing());
        assert_eq!(series.timestamp_column, "time");
        assert_eq!(
            series.column("value").unwrap().as_numeric().unwrap(),
            &[Some(1.0), Some(2.0), Some(3.0)]
        );
        assert_eq!(series.column("site").unwrap().data.text_at(0).as_deref(), Some("a"));
        assert!(series.column("time").is_none());
    }

    #[test]
    fn test_normalize_unknown_column() {
        let err = normalize(&table(), "nope").unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownColumn(name) if name == "nope"));
    }

    #[test]
    fn test_normalize_all_invalid_is_empty() {
        let table = Table::new(vec![Column::text("time", vec![Some("x"), None])]).unwrap();
        let (series, stats) = normalize(&table, "time").unwrap();
        assert!(series.is_empty());
        assert_eq!(stats.dropped_rows, 2);
    }

    #[test]
    fn test_normalize_keeps_file_order_for_ties() {
        let table = Table::new(vec![
            Column::text("time", vec![Some("2024-01-01"), Some("2024-01-01")]),
            Column::numeric("v", vec![Some(10.0), Some(20.0)]),
        ])
        .unwrap();
        let (series, _) = normalize(&table, "time").unwrap();
        assert_eq!(series.column("v").unwrap().as_numeric().unwrap(), &[Some(10.0), Some(20.0)]);
    }

    #[test]
    fn test_detect_timestamp_column() {
        assert_eq!(detect_timestamp_column(&table()), Some("time"));

        let no_dates = Table::new(vec![
            Column::numeric("a", vec![Some(1.0)]),
            Column::text("b", vec![Some("x")]),
        ])
        .unwrap();
        assert_eq!(detect_timestamp_column(&no_dates), Some("a"));
        assert_eq!(detect_timestamp_column(&Table::default()), None);
    }
}
