//! One full analysis pass over a table.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::chart::ChartSpec;
use super::gaps::{detect_gaps, Gap};
use super::grid::build_grid;
use super::normalize::{normalize, NormalizeStats, Series};
use super::report::{report_rows, GapReportRow};
use super::resolve::{resolve, ResolveStats};
use super::summary::{AvailabilityStatus, SummaryMetrics};
use crate::config::Settings;
use crate::error::{AnalysisError, Result};
use crate::source::Table;

/// Everything derived from a table under one set of settings.
///
/// The pass is a pure function of its inputs: running it twice on the same
/// table and settings gives the same result.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Settings with the effective timestamp and value columns filled in.
    pub settings: Settings,
    pub normalize: NormalizeStats,
    pub resolve: ResolveStats,
    pub summary: SummaryMetrics,
    pub status: AvailabilityStatus,
    pub gaps: Vec<Gap>,
    /// Why the chart could not be built, if it could not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_error: Option<String>,
    #[serde(skip)]
    pub series: Series,
    #[serde(skip)]
    pub missing: Vec<NaiveDateTime>,
    #[serde(skip)]
    pub chart: Option<ChartSpec>,
}

impl Analysis {
    /// Normalize, resolve duplicates, build the grid and find the gaps.
    ///
    /// Fails when the timestamp column is unknown or no timestamp survives
    /// parsing. A bad value column only removes the chart.
    pub fn run(table: &Table, settings: &Settings) -> Result<Self> {
        let timestamp_column = settings
            .timestamp_column_for(table)
            .ok_or(AnalysisError::EmptyDataset)?;

        let (series, normalize_stats) = normalize(table, &timestamp_column)?;
        let (series, resolve_stats) = resolve(series, settings.duplicate_policy);
        let grid = build_grid(&series.timestamps, settings.interval)?;
        let (missing, gaps) = detect_gaps(&grid, &series.timestamps, settings.interval);
        let summary = SummaryMetrics::compute(&series.timestamps, &grid, missing.len());

        let value_column = settings.value_column_for(&series);
        let (chart, chart_error) = match &value_column {
            Some(column) => match ChartSpec::build(&series, column, &gaps) {
                Ok(chart) => (Some(chart), None),
                Err(err) => {
                    tracing::warn!(error = %err, "chart unavailable");
                    (None, Some(err.to_string()))
                }
            },
            None => (Some(ChartSpec::regions_only(&gaps)), None),
        };

        tracing::info!(
            actual = summary.actual_points,
            expected = summary.expected_points,
            availability = summary.availability_pct,
            gaps = gaps.len(),
            "analysis complete"
        );

        Ok(Self {
            settings: Settings {
                timestamp_column: Some(timestamp_column),
                value_column,
                ..settings.clone()
            },
            normalize: normalize_stats,
            resolve: resolve_stats,
            status: summary.status(&settings.thresholds),
            summary,
            gaps,
            chart_error,
            series,
            missing,
            chart,
        })
    }

    pub fn report_rows(&self) -> Vec<GapReportRow> {
        report_rows(&self.gaps)
    }

    /// The whole analysis as a JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
