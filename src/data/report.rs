//! Gap report table and its delimited-text export.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use super::gaps::Gap;

/// Default file name for the exported report.
pub const DEFAULT_REPORT_FILE: &str = "missing_data_report.csv";

/// Header of the exported report.
const HEADER: [&str; 3] = ["Duration", "Time_Interval", "Count"];

/// One row of the gap report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapReportRow {
    #[serde(rename = "Duration")]
    pub duration: String,
    #[serde(rename = "Time_Interval")]
    pub time_interval: String,
    #[serde(rename = "Count")]
    pub count: usize,
}

impl From<&Gap> for GapReportRow {
    fn from(gap: &Gap) -> Self {
        Self {
            duration: gap.duration_label(),
            time_interval: gap.interval.label(),
            count: gap.count,
        }
    }
}

pub fn report_rows(gaps: &[Gap]) -> Vec<GapReportRow> {
    gaps.iter().map(GapReportRow::from).collect()
}

/// Write the header and one record per row. The header is written even when
/// there are no gaps.
pub fn write_rows<W: Write>(writer: W, rows: &[GapReportRow]) -> csv::Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Render rows as CSV text.
pub fn to_csv(rows: &[GapReportRow]) -> csv::Result<String> {
    let mut buffer = Vec::new();
    write_rows(&mut buffer, rows)?;
    String::from_utf8(buffer)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Write the report as UTF-8 CSV.
pub fn write_csv(path: &Path, rows: &[GapReportRow]) -> io::Result<()> {
    let file = File::create(path)?;
    write_rows(file, rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "wrote gap report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::gaps::group_gaps;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

    fn at(minutes: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
            + TimeDelta::minutes(minutes)
    }

    #[test]
    fn test_report_rows_from_gaps() {
        let gaps = group_gaps(&[at(5), at(10), at(30)], "5min".parse().unwrap());
        let rows = report_rows(&gaps);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].duration, "2024-01-01 00:05:00 → 2024-01-01 00:10:00");
        assert_eq!(rows[0].time_interval, "5min");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].count, 1);
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let gaps = group_gaps(&[at(60)], "1H".parse().unwrap());
        let csv = to_csv(&report_rows(&gaps)).unwrap();

        assert_eq!(
            csv,
            "Duration,Time_Interval,Count\n2024-01-01 01:00:00 → 2024-01-01 01:00:00,1H,1\n"
        );
    }

    #[test]
    fn test_csv_empty_report_is_header_only() {
        assert_eq!(to_csv(&[]).unwrap(), "Duration,Time_Interval,Count\n");
    }

    #[test]
    fn test_csv_quotes_special_fields() {
        let rows = vec![
            GapReportRow {
                duration: "a,b".to_string(),
                time_interval: "say \"hi\"".to_string(),
                count: 1,
            },
            GapReportRow {
                duration: "line\rbreak".to_string(),
                time_interval: "two\nlines".to_string(),
                count: 2,
            },
        ];
        let csv = to_csv(&rows).unwrap();

        assert_eq!(
            csv,
            concat!(
                "Duration,Time_Interval,Count\n",
                "\"a,b\",\"say \"\"hi\"\"\",1\n",
                "\"line\rbreak\",\"two\nlines\",2\n",
            )
        );
    }

    #[test]
    fn test_write_csv_is_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_REPORT_FILE);
        let gaps = group_gaps(&[at(5)], "5min".parse().unwrap());

        write_csv(&path, &report_rows(&gaps)).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains('→'));
    }

    #[test]
    fn test_rows_serialize_with_report_headers() {
        let gaps = group_gaps(&[at(5)], "5min".parse().unwrap());
        let json = serde_json::to_value(report_rows(&gaps)).unwrap();
        assert_eq!(json[0]["Time_Interval"], "5min");
        assert_eq!(json[0]["Count"], 1);
    }
}
