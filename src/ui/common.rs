//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, error panel and
//! help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, View};

/// Render the header bar with the availability overview.
///
/// Displays: status indicator, availability, actual/expected points, gap count.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref analysis) = app.analysis else {
        let state = if app.load_error.is_some() { "Error" } else { "Loading..." };
        let line = Line::from(vec![
            Span::styled(" GAPWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("| {}", state)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let summary = &analysis.summary;
    let status_style = app.theme.status_style(analysis.status);

    let line = Line::from(vec![
        Span::styled(" ● ", status_style),
        Span::styled("GAPWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(format!("{:.2}%", summary.availability_pct), status_style),
        Span::raw(" available │ "),
        Span::styled(
            format!("{}", summary.actual_points),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("/{} points │ ", summary.expected_points)),
        if analysis.gaps.is_empty() {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        } else {
            Span::styled(
                format!("{}", analysis.gaps.len()),
                Style::default().fg(app.theme.warning),
            )
        },
        Span::raw(format!(
            " gaps │ {} @ {}",
            app.settings.duplicate_policy, app.settings.interval
        )),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Summary "),
        Line::from(" 2:Gaps "),
        Line::from(" 3:Chart "),
    ];

    let selected = match app.current_view {
        View::Summary => 0,
        View::Gaps => 1,
        View::Chart => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the failure of the last pass in place of the views.
pub fn render_error(frame: &mut Frame, app: &App, area: Rect) {
    let message = app.load_error.as_deref().unwrap_or("No data loaded yet");
    let text = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Source: {}", app.source_description())),
        Line::from(""),
        Line::from(Span::styled(
            "t:timestamp column  r:reload  q:quit",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" No report ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.critical));

    frame.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: true }), area);
}

/// Render the status bar at the bottom.
///
/// Shows: current view, time since last pass, available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if app.analysis.is_some() {
        let elapsed = app.last_updated.map(|t| t.elapsed().as_secs_f64()).unwrap_or(0.0);

        let controls = match app.current_view {
            View::Summary => "t:ts col p:policy i:interval e:export ?:help q:quit",
            View::Gaps => "s:sort S:reverse Enter:detail e:export ?:help q:quit",
            View::Chart => "v:value col c:export chart i:interval ?:help q:quit",
        };

        format!(
            " {} | Updated {:.1}s ago | {}",
            app.current_view.label(),
            elapsed,
            controls,
        )
    } else if let Some(ref err) = app.load_error {
        format!(" Error: {} | q:quit r:retry", err)
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(title, Style::default().add_modifier(Modifier::BOLD))])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  Tab 1-3     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate gaps"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Enter       Gap detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" Analysis"),
        Line::from("  t         Cycle timestamp column"),
        Line::from("  p         Cycle duplicate policy"),
        Line::from("  i         Cycle interval"),
        Line::from("  v         Cycle value column"),
        Line::from("  s / S     Sort gaps / reverse"),
        Line::from(""),
        section(" General"),
        Line::from("  r         Reload data"),
        Line::from("  e         Export report CSV"),
        Line::from("  c         Export chart JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
