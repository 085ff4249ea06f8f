//! Spreadsheet decoding.
//!
//! Reads the first worksheet with calamine. The first row holds the column
//! names. A column is numeric when every non-empty cell is a number;
//! otherwise every cell is kept as text.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use super::table::{Column, ColumnData, Table};
use crate::data::timestamp::format_timestamp;
use crate::error::{AnalysisError, Result};

/// Extensions decoded as spreadsheets.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Decode the first worksheet of a spreadsheet into a typed table.
pub fn read_spreadsheet(bytes: &[u8]) -> Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| AnalysisError::UnreadableFile(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AnalysisError::UnreadableFile("workbook has no sheets".to_string()))?
        .map_err(|e| AnalysisError::UnreadableFile(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(AnalysisError::UnreadableFile("sheet is empty".to_string()));
    };
    let body: Vec<&[Data]> = rows.collect();

    let columns = header
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let cells: Vec<&Data> =
                body.iter().map(|row| row.get(i).unwrap_or(&Data::Empty)).collect();
            Column {
                name: column_name(name, i),
                data: column_data(&cells),
            }
        })
        .collect();

    let table = Table::new(columns)?;
    tracing::debug!(rows = table.height(), columns = table.width(), "decoded spreadsheet");
    Ok(table)
}

fn column_name(cell: &Data, index: usize) -> String {
    match cell_text(cell) {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => format!("column_{}", index + 1),
    }
}

fn column_data(cells: &[&Data]) -> ColumnData {
    let mut has_number = false;
    let all_numeric = cells.iter().all(|cell| match cell {
        Data::Int(_) | Data::Float(_) => {
            has_number = true;
            true
        }
        Data::Empty | Data::Error(_) => true,
        _ => false,
    });

    if all_numeric && has_number {
        ColumnData::Numeric(cells.iter().map(|cell| cell_number(cell)).collect())
    } else {
        ColumnData::Text(cells.iter().map(|cell| cell_text(cell)).collect())
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(v) => Some(*v as f64),
        Data::Float(v) => Some(*v),
        _ => None,
    }
}

/// Textual form of a cell. Date cells are written in the report timestamp
/// format so the normalizer can parse them.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Int(v) => Some(v.to_string()),
        Data::Float(v) => Some(v.to_string()),
        Data::Bool(v) => Some(v.to_string()),
        Data::DateTime(dt) => Some(
            dt.as_datetime()
                .map(|ts| format_timestamp(&ts))
                .unwrap_or_else(|| dt.as_f64().to_string()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn workbook_bytes() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "time").unwrap();
        sheet.write_string(0, 1, "value").unwrap();
        sheet.write_string(0, 2, "site").unwrap();
        let rows = [("2024-01-01 00:00:00", 1.5, "a"), ("2024-01-01 00:10:00", 3.0, "b")];
        for (i, (time, value, site)) in rows.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, *time).unwrap();
            sheet.write_number(row, 1, *value).unwrap();
            sheet.write_string(row, 2, *site).unwrap();
        }
        sheet.write_string(3, 0, "2024-01-01 00:15:00").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_read_xlsx_first_sheet() {
        let table = read_spreadsheet(&workbook_bytes()).unwrap();

        assert_eq!(table.column_names(), vec!["time", "value", "site"]);
        assert_eq!(table.height(), 3);
        assert_eq!(table.numeric_column_names(), vec!["value"]);
        assert_eq!(
            table.column("value").unwrap().as_numeric().unwrap(),
            &[Some(1.5), Some(3.0), None]
        );
        assert_eq!(table.column("site").unwrap().data.text_at(2), None);
        assert_eq!(
            table.column("time").unwrap().data.text_at(1).as_deref(),
            Some("2024-01-01 00:10:00")
        );
    }

    #[test]
    fn test_mixed_column_is_text() {
        let cells = [Data::Float(1.0), Data::String("n/a".to_string()), Data::Empty];
        let refs: Vec<&Data> = cells.iter().collect();
        assert_eq!(
            column_data(&refs),
            ColumnData::Text(vec![Some("1".to_string()), Some("n/a".to_string()), None])
        );
    }

    #[test]
    fn test_empty_column_is_text() {
        let cells = [Data::Empty, Data::Empty];
        let refs: Vec<&Data> = cells.iter().collect();
        assert_eq!(column_data(&refs), ColumnData::Text(vec![None, None]));
    }

    #[test]
    fn test_blank_header_gets_positional_name() {
        assert_eq!(column_name(&Data::Empty, 2), "column_3");
        assert_eq!(column_name(&Data::String(" temp ".to_string()), 0), "temp");
    }

    #[test]
    fn test_corrupt_workbook() {
        let err = read_spreadsheet(b"PK\x03\x04").unwrap_err();
        assert!(matches!(err, AnalysisError::UnreadableFile(_)));
    }
}
