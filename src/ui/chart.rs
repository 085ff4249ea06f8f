//! Timeline chart rendering.
//!
//! Draws the chart spec on a braille canvas: observed values as points and
//! each gap as a hatched band. When no chart could be built the gap table is
//! shown instead, with the reason above it.

use chrono::DateTime;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Borders, Paragraph,
    },
    Frame,
};

use crate::app::App;
use crate::data::chart::epoch_secs;
use crate::data::ChartSpec;

/// Vertical hatch lines drawn per gap band.
const HATCH_LINES: usize = 6;

/// Render the Chart view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref analysis) = app.analysis else {
        return;
    };

    let Some(ref chart) = analysis.chart else {
        let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).split(area);
        let reason = analysis.chart_error.as_deref().unwrap_or("Chart unavailable");
        let line = Line::from(vec![
            Span::styled(format!(" {} ", reason), Style::default().fg(app.theme.warning)),
            Span::styled(
                "(v: pick another value column)",
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), chunks[0]);
        super::gaps::render(frame, app, chunks[1]);
        return;
    };

    let half_step = analysis.settings.interval.as_secs() as f64 / 2.0;
    let Some((x_min, x_max)) = chart.x_bounds() else {
        let empty = Paragraph::new(" No values and no gaps to plot")
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(empty, area);
        return;
    };
    let (x_min, x_max) = (x_min - half_step, x_max + half_step);
    let (y_min, y_max) = chart.y_bounds().unwrap_or((0.0, 1.0));
    let y_pad = (y_max - y_min) * 0.05;
    let (y_min, y_max) = (y_min - y_pad, y_max + y_pad);

    let points: Vec<(f64, f64)> =
        chart.points.iter().map(|p| (epoch_secs(p.timestamp), p.value)).collect();

    let block = Block::default()
        .title(format!(" {} ", chart.title))
        .title_bottom(axis_footer(chart, x_min, x_max))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([x_min, x_max])
        .y_bounds([y_min, y_max])
        .paint(|ctx| {
            for region in &chart.regions {
                let left = epoch_secs(region.start) - half_step;
                let right = epoch_secs(region.end) + half_step;
                let step = (right - left) / HATCH_LINES as f64;
                for i in 0..=HATCH_LINES {
                    let x = left + step * i as f64;
                    ctx.draw(&CanvasLine {
                        x1: x,
                        y1: y_min,
                        x2: x,
                        y2: y_max,
                        color: app.theme.missing,
                    });
                }
            }
            ctx.layer();
            ctx.draw(&Points {
                coords: &points,
                color: app.theme.data,
            });
            ctx.print(
                x_min,
                y_max,
                Span::styled(format!("{} {:.2}", chart.y_label, y_max), app.theme.header),
            );
            ctx.print(x_min, y_min, Span::raw(format!("{:.2}", y_min)));
        });

    frame.render_widget(canvas, area);
}

/// Bottom border text: x axis range and legend.
fn axis_footer(chart: &ChartSpec, x_min: f64, x_max: f64) -> String {
    format!(
        " {}: {} → {} │ • data  ▒ {} ({}) ",
        chart.x_label,
        format_epoch(x_min),
        format_epoch(x_max),
        crate::data::chart::REGION_LABEL,
        chart.regions.len()
    )
}

fn format_epoch(secs: f64) -> String {
    DateTime::from_timestamp(secs.round() as i64, 0)
        .map(|dt| dt.naive_utc().format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_epoch() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(12, 30, 0).unwrap();
        assert_eq!(format_epoch(epoch_secs(ts)), "2024-03-01 12:30");
    }

    #[test]
    fn test_axis_footer_mentions_regions() {
        let chart = ChartSpec::regions_only(&[]);
        let footer = axis_footer(&chart, 0.0, 3600.0);
        assert!(footer.contains("Time: 1970-01-01 00:00 → 1970-01-01 01:00"));
        assert!(footer.contains("Missing (0)"));
    }
}
