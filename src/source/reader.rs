//! Table decoding.
//!
//! Delimited text goes through the polars CSV reader for parsing and type
//! inference; the resulting frame is converted into a [`Table`] so the rest
//! of the crate never deals with inferred dtypes. Spreadsheets are handed to
//! [`read_spreadsheet`].

use std::io::Cursor;
use std::path::Path;

use polars::prelude::{CsvParseOptions, CsvReadOptions, DataType, SerReader};

use super::spreadsheet::{read_spreadsheet, SPREADSHEET_EXTENSIONS};
use super::table::{Column, ColumnData, Table};
use crate::error::{AnalysisError, Result};

/// Rows scanned by polars to infer column dtypes.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Candidate separators for sniffing, in tie-break order.
const SEPARATORS: &[u8] = b",;\t";

/// Decode delimited text or a spreadsheet into a typed table.
///
/// `name` is only used for its extension, which selects spreadsheet
/// decoding or the text separator.
pub fn read_table(bytes: &[u8], name: &str) -> Result<Table> {
    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    if let Some(ext) = extension.as_deref() {
        if SPREADSHEET_EXTENSIONS.contains(&ext) {
            return read_spreadsheet(bytes);
        }
    }

    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(AnalysisError::UnreadableFile("file is empty".to_string()));
    }

    let separator = match extension.as_deref() {
        Some("tsv") | Some("tab") => b'\t',
        _ => sniff_separator(bytes),
    };

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_parse_options(CsvParseOptions::default().with_separator(separator))
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()?;

    let columns = frame
        .get_columns()
        .iter()
        .map(|column| -> Result<Column> {
            let series = column.as_materialized_series();
            let data = if is_numeric(series.dtype()) {
                let floats = series.cast(&DataType::Float64)?;
                ColumnData::Numeric(floats.f64()?.into_iter().collect())
            } else {
                let strings = series.cast(&DataType::String)?;
                ColumnData::Text(
                    strings.str()?.into_iter().map(|v| v.map(str::to_owned)).collect(),
                )
            };
            Ok(Column {
                name: column.name().to_string(),
                data,
            })
        })
        .collect::<Result<Vec<Column>>>()?;

    let table = Table::new(columns)?;
    tracing::debug!(
        rows = table.height(),
        columns = table.width(),
        separator = %(separator as char).escape_default(),
        "decoded table"
    );
    Ok(table)
}

fn is_numeric(dtype: &DataType) -> bool {
    dtype.is_integer() || dtype.is_float()
}

/// Pick the separator that occurs most often in the header line.
fn sniff_separator(bytes: &[u8]) -> u8 {
    let header = bytes.split(|&b| b == b'\n').next().unwrap_or_default();
    SEPARATORS
        .iter()
        .copied()
        .map(|sep| (sep, header.iter().filter(|&&b| b == sep).count()))
        .fold((b',', 0), |best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_infers_column_kinds() {
        let csv = "time,value,label\n2024-01-01 00:00:00,1,a\n2024-01-01 00:05:00,2.5,b\n";
        let table = read_table(csv.as_bytes(), "data.csv").unwrap();

        assert_eq!(table.height(), 2);
        assert_eq!(table.column_names(), vec!["time", "value", "label"]);
        assert_eq!(table.numeric_column_names(), vec!["value"]);
        assert_eq!(
            table.column("value").unwrap().as_numeric().unwrap(),
            &[Some(1.0), Some(2.5)]
        );
    }

    #[test]
    fn test_read_semicolon_separated() {
        let csv = "time;value\n2024-01-01 00:00:00;10\n";
        let table = read_table(csv.as_bytes(), "upload.txt").unwrap();
        assert_eq!(table.column_names(), vec!["time", "value"]);
    }

    #[test]
    fn test_read_tsv_by_extension() {
        let tsv = "time\tvalue\n2024-01-01 00:00:00\t10\n";
        let table = read_table(tsv.as_bytes(), "upload.tsv").unwrap();
        assert_eq!(table.width(), 2);
    }

    #[test]
    fn test_read_spreadsheet_by_extension() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "time").unwrap();
        sheet.write_string(0, 1, "value").unwrap();
        sheet.write_string(1, 0, "2024-01-01 00:00:00").unwrap();
        sheet.write_number(1, 1, 7).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = read_table(&bytes, "Readings.XLSX").unwrap();
        assert_eq!(table.column_names(), vec!["time", "value"]);
        assert_eq!(table.column("value").unwrap().as_numeric().unwrap(), &[Some(7.0)]);
    }

    #[test]
    fn test_reject_empty_input() {
        let err = read_table(b"  \n", "empty.csv").unwrap_err();
        assert!(matches!(err, AnalysisError::UnreadableFile(_)));
    }

    #[test]
    fn test_sniff_separator() {
        assert_eq!(sniff_separator(b"a,b,c\n1,2,3"), b',');
        assert_eq!(sniff_separator(b"a;b;c\n1;2;3"), b';');
        assert_eq!(sniff_separator(b"a\tb\n"), b'\t');
        assert_eq!(sniff_separator(b"single\n"), b',');
    }
}
