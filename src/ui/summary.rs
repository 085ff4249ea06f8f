//! Summary view rendering.
//!
//! Shows the four headline metrics with availability status, how many rows
//! were dropped or merged on the way, and the settings of the current pass.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::Analysis;

/// Render the Summary view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref analysis) = app.analysis else {
        return;
    };

    let chunks = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let right = Layout::vertical([Constraint::Length(7), Constraint::Min(7)]).split(chunks[1]);

    render_metrics(frame, app, analysis, chunks[0]);
    render_rows(frame, app, analysis, right[0]);
    render_settings(frame, app, analysis, right[1]);
}

fn render_metrics(frame: &mut Frame, app: &App, analysis: &Analysis, area: Rect) {
    let summary = &analysis.summary;
    let status_style = app.theme.status_style(analysis.status);

    let mut rows = vec![
        Row::new(vec![
            Cell::from("Availability"),
            Cell::from(format!("{:.2}%", summary.availability_pct)).style(status_style),
        ]),
        Row::new(vec![
            Cell::from("Status"),
            Cell::from(analysis.status.symbol()).style(status_style),
        ]),
        Row::new(vec![
            Cell::from("Actual points"),
            Cell::from(summary.actual_points.to_string()),
        ]),
        Row::new(vec![
            Cell::from("Expected points"),
            Cell::from(summary.expected_points.to_string()),
        ]),
        Row::new(vec![
            Cell::from("Missing points"),
            Cell::from(summary.missing_points.to_string()),
        ]),
        Row::new(vec![
            Cell::from("Gaps"),
            Cell::from(analysis.gaps.len().to_string()),
        ]),
    ];

    if summary.off_grid_points > 0 {
        rows.push(Row::new(vec![
            Cell::from("Off-grid points"),
            Cell::from(summary.off_grid_points.to_string())
                .style(Style::default().fg(app.theme.warning)),
        ]));
    }

    if let Some(longest) = analysis.gaps.iter().max_by_key(|g| g.count) {
        rows.push(Row::new(vec![
            Cell::from("Longest gap"),
            Cell::from(format!("{} × {}", longest.count, longest.interval)),
        ]));
    }

    frame.render_widget(key_value_table(app, rows, " Availability "), area);
}

fn render_rows(frame: &mut Frame, app: &App, analysis: &Analysis, area: Rect) {
    let dropped_style = if analysis.normalize.dropped_rows > 0 {
        Style::default().fg(app.theme.warning)
    } else {
        Style::default()
    };
    let resolve = &analysis.resolve;

    let rows = vec![
        Row::new(vec![
            Cell::from("Rows read"),
            Cell::from(analysis.normalize.input_rows.to_string()),
        ]),
        Row::new(vec![
            Cell::from("Unparseable timestamps"),
            Cell::from(analysis.normalize.dropped_rows.to_string()).style(dropped_style),
        ]),
        Row::new(vec![
            Cell::from("Duplicate rows"),
            Cell::from(if resolve.duplicate_rows > 0 {
                format!("{} in {} groups", resolve.duplicate_rows, resolve.duplicate_groups)
            } else {
                "-".to_string()
            }),
        ]),
        Row::new(vec![
            Cell::from("Distinct timestamps"),
            Cell::from(analysis.series.len().to_string()),
        ]),
    ];

    frame.render_widget(key_value_table(app, rows, " Rows "), area);
}

fn render_settings(frame: &mut Frame, app: &App, analysis: &Analysis, area: Rect) {
    let settings = &analysis.settings;
    let thresholds = &settings.thresholds;
    let chart_value = match (&settings.value_column, &analysis.chart_error) {
        (_, Some(err)) => err.clone(),
        (Some(column), None) => column.clone(),
        (None, None) => "-".to_string(),
    };

    let rows = vec![
        Row::new(vec![
            Cell::from("Timestamp column [t]"),
            Cell::from(settings.timestamp_column.clone().unwrap_or_default()),
        ]),
        Row::new(vec![
            Cell::from("Duplicates [p]"),
            Cell::from(settings.duplicate_policy.label()),
        ]),
        Row::new(vec![
            Cell::from("Interval [i]"),
            Cell::from(settings.interval.label()),
        ]),
        Row::new(vec![Cell::from("Value column [v]"), Cell::from(chart_value)]),
        Row::new(vec![
            Cell::from("Thresholds"),
            Cell::from(format!(
                "warn < {}% crit < {}%",
                thresholds.availability_warning, thresholds.availability_critical
            )),
        ]),
        Row::new(vec![
            Cell::from("Source"),
            Cell::from(app.source_description().to_string())
                .style(Style::default().add_modifier(Modifier::DIM)),
        ]),
    ];

    frame.render_widget(key_value_table(app, rows, " Settings "), area);
}

fn key_value_table<'a>(app: &App, rows: Vec<Row<'a>>, title: &'a str) -> Table<'a> {
    Table::new(rows, [Constraint::Fill(1), Constraint::Fill(1)]).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    )
}
