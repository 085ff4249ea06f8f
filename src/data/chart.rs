//! Chart specification for the data-with-gaps timeline.
//!
//! The chart is renderer independent: the TUI draws it on a canvas and
//! `--chart` writes it out as JSON.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::gaps::Gap;
use super::normalize::Series;
use crate::error::{AnalysisError, Result};

pub const CHART_TITLE: &str = "Data Points with Missing Intervals Highlighted";
pub const X_LABEL: &str = "Time";
pub const DEFAULT_Y_LABEL: &str = "Value";
pub const REGION_LABEL: &str = "Missing";

/// Default file name for the exported chart spec.
pub const DEFAULT_CHART_FILE: &str = "missing_data_chart.json";

/// One observed value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// A shaded span covering one gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRegion {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ChartPoint>,
    pub regions: Vec<ChartRegion>,
}

impl ChartSpec {
    /// Build the chart for `value_column` of the resolved series.
    ///
    /// Null values are skipped. Fails with [`AnalysisError::InvalidValueColumn`]
    /// when the column does not exist or is not numeric.
    pub fn build(series: &Series, value_column: &str, gaps: &[Gap]) -> Result<Self> {
        let values = series
            .column(value_column)
            .and_then(|c| c.as_numeric())
            .ok_or_else(|| AnalysisError::InvalidValueColumn(value_column.to_string()))?;

        let points = series
            .timestamps
            .iter()
            .zip(values)
            .filter_map(|(&timestamp, value)| value.map(|value| ChartPoint { timestamp, value }))
            .collect();

        Ok(Self {
            title: CHART_TITLE.to_string(),
            x_label: X_LABEL.to_string(),
            y_label: value_column.to_string(),
            points,
            regions: regions(gaps),
        })
    }

    /// A chart with gap regions only, used when no value column is available.
    pub fn regions_only(gaps: &[Gap]) -> Self {
        Self {
            title: CHART_TITLE.to_string(),
            x_label: X_LABEL.to_string(),
            y_label: DEFAULT_Y_LABEL.to_string(),
            points: Vec::new(),
            regions: regions(gaps),
        }
    }

    /// Time span covered by points and regions, as epoch seconds.
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        let times = self
            .points
            .iter()
            .map(|p| p.timestamp)
            .chain(self.regions.iter().flat_map(|r| [r.start, r.end]));
        min_max(times.map(epoch_secs))
    }

    /// Value range of the points, padded when flat.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        let (lo, hi) = min_max(self.points.iter().map(|p| p.value))?;
        if lo == hi {
            Some((lo - 1.0, hi + 1.0))
        } else {
            Some((lo, hi))
        }
    }
}

fn regions(gaps: &[Gap]) -> Vec<ChartRegion> {
    gaps.iter()
        .map(|gap| ChartRegion {
            start: gap.start,
            end: gap.end,
            label: REGION_LABEL.to_string(),
        })
        .collect()
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Seconds since the Unix epoch, for plotting.
pub fn epoch_secs(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp_millis() as f64 / 1000.0
}
