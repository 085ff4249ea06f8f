use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};
use crate::data::chart::DEFAULT_CHART_FILE;
use crate::data::DEFAULT_REPORT_FILE;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If detail overlay is shown, handle overlay-specific keys
    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Step through gaps while the overlay is open
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Home => app.select_first(),
            KeyCode::End => app.select_last(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Char('1') => app.set_view(View::Summary),
        KeyCode::Char('2') => app.set_view(View::Gaps),
        KeyCode::Char('3') => app.set_view(View::Chart),

        // Navigation (up/down for gaps, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Enter => app.enter_detail(),
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Analysis parameters, each re-runs the pass
        KeyCode::Char('t') => app.cycle_timestamp_column(),
        KeyCode::Char('p') => app.cycle_policy(),
        KeyCode::Char('i') => app.cycle_interval(),
        KeyCode::Char('v') => app.cycle_value_column(),

        // Sorting (Gaps view)
        KeyCode::Char('s') => {
            if app.current_view == View::Gaps {
                app.cycle_sort();
            }
        }
        KeyCode::Char('S') => {
            if app.current_view == View::Gaps {
                app.toggle_sort_direction();
            }
        }

        KeyCode::Char('r') => {
            app.force_reload();
            app.set_status_message("Reloaded".to_string());
        }

        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let path = Path::new(DEFAULT_REPORT_FILE);
            match app.export_report(path) {
                Ok(rows) => {
                    app.set_status_message(format!("Exported {} gaps to {}", rows, path.display()));
                }
                Err(e) => app.set_status_message(format!("Export failed: {:#}", e)),
            }
        }
        KeyCode::Char('c') => {
            let path = Path::new(DEFAULT_CHART_FILE);
            match app.export_chart(path) {
                Ok(()) => app.set_status_message(format!("Chart saved to {}", path.display())),
                Err(e) => app.set_status_message(format!("Chart export failed: {:#}", e)),
            }
        }

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Rows below the gap table header select a gap
            if app.current_view == View::Gaps && clicked_row > content_start_row {
                let item_row = (clicked_row - content_start_row - 1) as usize;
                let count = app.analysis.as_ref().map_or(0, |a| a.gaps.len());
                if item_row < count {
                    app.selected_gap_index = item_row;
                }
            }

            // Check for tab clicks (row 1, after header)
            if clicked_row == 1 {
                let col = mouse.column;
                // Approximate tab positions: Summary (0-12), Gaps (13-22), Chart (23-33)
                if col < 13 {
                    app.set_view(View::Summary);
                } else if col < 23 {
                    app.set_view(View::Gaps);
                } else if col < 34 {
                    app.set_view(View::Chart);
                }
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}
