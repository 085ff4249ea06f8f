//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::config::Settings;
use crate::data::{report, Analysis, Gap};
use crate::source::{DataSource, Table};
use crate::ui::gaps::{sort_gaps_by, GapSortColumn};
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Gap detail is shown as an overlay (controlled by `App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Headline metrics, row accounting and the active settings.
    Summary,
    /// One row per gap.
    Gaps,
    /// Observed values on a timeline with the gaps shaded.
    Chart,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Summary => View::Gaps,
            View::Gaps => View::Chart,
            View::Chart => View::Summary,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Summary => View::Chart,
            View::Gaps => View::Summary,
            View::Chart => View::Gaps,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Summary => "Summary",
            View::Gaps => "Gaps",
            View::Chart => "Chart",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub table: Option<Table>,
    pub analysis: Option<Analysis>,
    pub load_error: Option<String>,
    pub settings: Settings,
    pub last_updated: Option<Instant>,

    // Navigation state (Gaps view)
    pub selected_gap_index: usize,

    // Sorting (Gaps view)
    pub gap_sort_column: GapSortColumn,
    pub gap_sort_ascending: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App with the given data source and settings.
    pub fn new(source: Box<dyn DataSource>, settings: Settings) -> Self {
        Self::with_theme(source, settings, Theme::auto_detect())
    }

    /// Create a new App with an explicit theme.
    pub fn with_theme(source: Box<dyn DataSource>, settings: Settings, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Summary,
            show_help: false,
            show_detail_overlay: false,
            source,
            table: None,
            analysis: None,
            load_error: None,
            settings,
            last_updated: None,
            selected_gap_index: 0,
            gap_sort_column: GapSortColumn::default(),
            gap_sort_ascending: true,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source for a new table and re-run the analysis.
    ///
    /// Returns true if a new table was received. A source error clears the
    /// table so no stale report stays on screen.
    pub fn reload_data(&mut self) -> bool {
        if let Some(table) = self.source.poll() {
            self.table = Some(table);
            self.recompute();
            return true;
        }

        if let Some(err) = self.source.error() {
            self.load_error = Some(err.to_string());
            self.table = None;
            self.analysis = None;
        }
        false
    }

    /// Re-read the source even if it has not changed.
    pub fn force_reload(&mut self) {
        self.source.refresh();
        if !self.reload_data() && self.table.is_some() {
            self.recompute();
        }
    }

    /// Run the full analysis pass on the current table with the current settings.
    pub fn recompute(&mut self) {
        let Some(ref table) = self.table else {
            return;
        };

        match Analysis::run(table, &self.settings) {
            Ok(analysis) => {
                let max = analysis.gaps.len().saturating_sub(1);
                self.selected_gap_index = self.selected_gap_index.min(max);
                self.analysis = Some(analysis);
                self.load_error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "analysis failed");
                self.analysis = None;
                self.load_error = Some(err.to_string());
                self.show_detail_overlay = false;
            }
        }
        self.last_updated = Some(Instant::now());
    }

    /// Switch to the next duplicate policy and re-run.
    pub fn cycle_policy(&mut self) {
        self.settings.duplicate_policy = self.settings.duplicate_policy.next();
        self.recompute();
        self.set_status_message(format!("Duplicates: {}", self.settings.duplicate_policy));
    }

    /// Switch to the next interval preset and re-run.
    pub fn cycle_interval(&mut self) {
        self.settings.interval = self.settings.interval.next_preset();
        self.recompute();
        self.set_status_message(format!("Interval: {}", self.settings.interval));
    }

    /// Use the next table column as the timestamp column and re-run.
    pub fn cycle_timestamp_column(&mut self) {
        let Some(ref table) = self.table else {
            return;
        };
        let names = table.column_names();
        let current = self.settings.timestamp_column_for(table);
        let Some(next) = next_name(&names, current.as_deref()) else {
            return;
        };

        self.settings.timestamp_column = Some(next.clone());
        // The old value column may now be the timestamp column.
        if self.settings.value_column.as_deref() == Some(next.as_str()) {
            self.settings.value_column = None;
        }
        self.recompute();
        self.set_status_message(format!("Timestamp column: {}", next));
    }

    /// Chart the next numeric column and re-run.
    pub fn cycle_value_column(&mut self) {
        let Some(ref analysis) = self.analysis else {
            return;
        };
        let names = analysis.series.numeric_columns();
        let current = analysis.settings.value_column.as_deref();
        let Some(next) = next_name(&names, current) else {
            self.set_status_message("No numeric column to chart".to_string());
            return;
        };

        self.settings.value_column = Some(next.clone());
        self.recompute();
        self.set_status_message(format!("Value column: {}", next));
    }

    /// Gaps in display order.
    pub fn sorted_gaps(&self) -> Vec<&Gap> {
        let Some(ref analysis) = self.analysis else {
            return Vec::new();
        };
        let mut gaps: Vec<&Gap> = analysis.gaps.iter().collect();
        sort_gaps_by(&mut gaps, self.gap_sort_column, self.gap_sort_ascending);
        gaps
    }

    /// The gap under the cursor in the Gaps view.
    pub fn selected_gap(&self) -> Option<&Gap> {
        self.sorted_gaps().get(self.selected_gap_index).copied()
    }

    fn gap_count(&self) -> usize {
        self.analysis.as_ref().map_or(0, |a| a.gaps.len())
    }

    /// Switch to the next view (cycles through Summary → Gaps → Chart).
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view (cycles through Chart → Gaps → Summary).
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.gap_count().saturating_sub(1);
        self.selected_gap_index = (self.selected_gap_index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_gap_index = self.selected_gap_index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        self.selected_gap_index = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        self.selected_gap_index = self.gap_count().saturating_sub(1);
    }

    /// Open the detail overlay for the selected gap.
    pub fn enter_detail(&mut self) {
        if self.current_view == View::Gaps && self.selected_gap().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, then go to Summary.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
        } else {
            self.current_view = View::Summary;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Cycle to the next sort column for the gap table.
    pub fn cycle_sort(&mut self) {
        self.gap_sort_column = self.gap_sort_column.next();
        self.selected_gap_index = 0;
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        self.gap_sort_ascending = !self.gap_sort_ascending;
        self.selected_gap_index = 0;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Write the gap report as CSV. Returns the number of gap rows written.
    pub fn export_report(&self, path: &Path) -> Result<usize> {
        let Some(ref analysis) = self.analysis else {
            anyhow::bail!("No report to export");
        };
        let rows = analysis.report_rows();
        report::write_csv(path, &rows)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(rows.len())
    }

    /// Write the chart specification as JSON.
    pub fn export_chart(&self, path: &Path) -> Result<()> {
        let Some(ref analysis) = self.analysis else {
            anyhow::bail!("No chart to export");
        };
        let Some(ref chart) = analysis.chart else {
            anyhow::bail!(
                "{}",
                analysis.chart_error.as_deref().unwrap_or("Chart unavailable")
            );
        };
        let json = serde_json::to_string_pretty(chart)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote chart spec");
        Ok(())
    }
}

/// The entry after `current` in `names`, wrapping around. Starts at the
/// first entry when `current` is not in the list.
fn next_name(names: &[&str], current: Option<&str>) -> Option<String> {
    if names.is_empty() {
        return None;
    }
    let next = match current.and_then(|c| names.iter().position(|n| *n == c)) {
        Some(i) => names[(i + 1) % names.len()],
        None => names[0],
    };
    Some(next.to_string())
}
