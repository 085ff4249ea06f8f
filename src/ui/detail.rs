//! Detail overlay rendering.
//!
//! Displays a modal overlay for the selected gap: its bounds, the
//! observations on either side, and the missing timestamps it covers.

use chrono::NaiveDateTime;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::gaps::format_span;
use crate::app::App;
use crate::data::timestamp::format_timestamp;
use crate::data::Gap;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 14;

/// Render the gap detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(ref analysis) = app.analysis else {
        return;
    };
    let Some(gap) = app.selected_gap() else {
        return;
    };

    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = (area.height * 80 / 100).clamp(MIN_OVERLAY_HEIGHT, 30);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(8), // Gap bounds and neighbours
        Constraint::Min(3),    // Missing timestamps
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    let (before, after) = neighbours(&analysis.series.timestamps, gap);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let or_none =
        |ts: Option<NaiveDateTime>| ts.map(|t| format_timestamp(&t)).unwrap_or("-".into());

    let header_lines = vec![
        Line::from(vec![Span::styled(format!(" {} ", gap.duration_label()), bold)]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Missing points: "),
            Span::styled(gap.count.to_string(), bold.fg(app.theme.warning)),
            Span::raw(format!("    Interval: {}", gap.interval)),
            Span::raw(format!("    Span: {}", format_span(gap))),
        ]),
        Line::from(vec![Span::raw(" Last seen before: "), Span::styled(or_none(before), dim)]),
        Line::from(vec![Span::raw(" First seen after: "), Span::styled(or_none(after), dim)]),
    ];

    let header = Paragraph::new(header_lines).block(
        Block::default()
            .title(" Gap Detail ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.highlight)),
    );
    frame.render_widget(header, chunks[0]);

    let missing: Vec<String> = analysis
        .missing
        .iter()
        .filter(|ts| **ts >= gap.start && **ts <= gap.end)
        .map(format_timestamp)
        .collect();
    let list = Paragraph::new(missing.join("  "))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" Missing timestamps ({}) ", missing.len()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );
    frame.render_widget(list, chunks[1]);

    let footer = Paragraph::new(" ↑↓:previous/next gap  Esc/Enter:close").style(dim);
    frame.render_widget(footer, chunks[2]);
}

/// Closest observed timestamps before the gap starts and after it ends.
fn neighbours(
    timestamps: &[NaiveDateTime],
    gap: &Gap,
) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
    let split = timestamps.partition_point(|ts| *ts < gap.start);
    let before = split.checked_sub(1).map(|i| timestamps[i]);
    let after_idx = timestamps.partition_point(|ts| *ts <= gap.end);
    (before, timestamps.get(after_idx).copied())
}
