//! Gap table rendering.

use std::cmp::Ordering;

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::timestamp::format_timestamp;
use crate::data::Gap;

/// Column to sort gaps by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapSortColumn {
    /// Chronological, as detected.
    #[default]
    Start,
    /// Number of missing points.
    Count,
}

impl GapSortColumn {
    pub fn next(self) -> Self {
        match self {
            Self::Start => Self::Count,
            Self::Count => Self::Start,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Count => "count",
        }
    }
}

/// Render the gap report as a table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref analysis) = app.analysis else {
        return;
    };

    if analysis.gaps.is_empty() {
        render_no_gaps(frame, app, area);
        return;
    }

    let gaps = app.sorted_gaps();

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from(format_header("Start", GapSortColumn::Start, app)),
        Cell::from("End"),
        Cell::from("Interval"),
        Cell::from(format_header("Count", GapSortColumn::Count, app)),
        Cell::from("Span"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = gaps
        .iter()
        .enumerate()
        .map(|(i, gap)| {
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(format_timestamp(&gap.start)),
                Cell::from(format_timestamp(&gap.end)),
                Cell::from(gap.interval.label()),
                Cell::from(gap.count.to_string()).style(Style::default().fg(app.theme.warning)),
                Cell::from(format_span(gap)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Fill(3),
        Constraint::Fill(3),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let selected = app.selected_gap_index.min(gaps.len().saturating_sub(1));
    let sort_dir = if app.gap_sort_ascending { "↑" } else { "↓" };
    let title = format!(
        " Gaps ({}) [s:sort {}{}] [{}/{}] ",
        gaps.len(),
        app.gap_sort_column.label(),
        sort_dir,
        selected + 1,
        gaps.len()
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_no_gaps(frame: &mut Frame, app: &App, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "✓ No missing timestamps",
            Style::default().fg(app.theme.healthy).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "Every {} step between the first and last observation is present.",
            app.settings.interval
        )),
    ];
    let block = Block::default()
        .title(" Gaps ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    frame.render_widget(
        Paragraph::new(text).block(block).alignment(ratatui::layout::Alignment::Center),
        area,
    );
}

fn format_header(name: &str, col: GapSortColumn, app: &App) -> Span<'static> {
    if app.gap_sort_column == col {
        let arrow = if app.gap_sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

/// Wall-clock time covered by the missing points, e.g. "15m" or "2d 3h".
pub fn format_span(gap: &Gap) -> String {
    let secs = gap.interval.as_secs().saturating_mul(gap.count as i64);
    let (days, hours, minutes, seconds) =
        (secs / 86400, secs % 86400 / 3600, secs % 3600 / 60, secs % 60);
    match (days, hours, minutes) {
        (0, 0, 0) => format!("{}s", seconds),
        (0, 0, m) => format!("{}m", m),
        (0, h, m) => format!("{}h {}m", h, m),
        (d, h, _) => format!("{}d {}h", d, h),
    }
}

/// Sort gaps by the given column and direction. Ties keep chronological order.
pub fn sort_gaps_by(gaps: &mut [&Gap], column: GapSortColumn, ascending: bool) {
    gaps.sort_by(|a, b| {
        let primary = match column {
            GapSortColumn::Start => a.start.cmp(&b.start),
            GapSortColumn::Count => a.count.cmp(&b.count),
        };

        let primary = if ascending { primary } else { primary.reverse() };

        if primary == Ordering::Equal {
            a.start.cmp(&b.start)
        } else {
            primary
        }
    });
}
