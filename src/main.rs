use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing_subscriber::EnvFilter;

use gapwatch::app::View;
use gapwatch::config::Overrides;
use gapwatch::data::report;
use gapwatch::{
    events, read_table, ui, Analysis, App, AvailabilityStatus, DataSource, DuplicatePolicy,
    FileSource, Interval, Settings,
};

#[derive(Parser, Debug)]
#[command(name = "gapwatch")]
#[command(about = "Find missing intervals in time-series data")]
struct Args {
    /// Data file to analyse (CSV, TSV, semicolon separated, or a spreadsheet)
    #[arg(short, long)]
    file: PathBuf,

    /// Column holding the timestamps (detected when omitted)
    #[arg(short, long)]
    timestamp_column: Option<String>,

    /// How to collapse duplicate timestamps: keep_first, keep_last, mean, median, min, max
    #[arg(short, long)]
    policy: Option<DuplicatePolicy>,

    /// Expected interval between points (e.g. "5min", "1H", "1D")
    #[arg(short, long)]
    interval: Option<Interval>,

    /// Numeric column to chart (first numeric column when omitted)
    #[arg(long)]
    value_column: Option<String>,

    /// TOML config file (defaults to ./gapwatch.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds between checks for a changed file
    #[arg(short, long, default_value = "1")]
    refresh: u64,

    /// Write the gap report as CSV and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Write the chart specification as JSON and exit
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Print the whole analysis as JSON and exit
    #[arg(long)]
    json: bool,

    /// Availability below this percentage is a warning
    #[arg(long)]
    availability_warn: Option<f64>,

    /// Availability below this percentage is critical
    #[arg(long)]
    availability_crit: Option<f64>,

    /// Write logs to this file while the TUI is running
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn is_batch(&self) -> bool {
        self.export.is_some() || self.chart.is_some() || self.json
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            timestamp_column: self.timestamp_column.clone(),
            duplicate_policy: self.policy,
            interval: self.interval,
            value_column: self.value_column.clone(),
            availability_warning: self.availability_warn,
            availability_critical: self.availability_crit,
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    if args.is_batch() {
        init_tracing(LogTarget::Stderr)?;
    } else if let Some(ref path) = args.log_file {
        init_tracing(LogTarget::File(path))?;
    }

    let settings = Settings::load(args.config.as_deref())?.apply(args.overrides());

    // Handle export mode (non-interactive)
    if args.is_batch() {
        return run_batch(&args, &settings);
    }

    let source = Box::new(FileSource::new(&args.file));
    run_tui(source, settings, Duration::from_secs(args.refresh))?;
    Ok(ExitCode::SUCCESS)
}

enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

/// Install the tracing subscriber. Level comes from `RUST_LOG`, default `info`.
fn init_tracing(target: LogTarget) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match target {
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))
}

/// Run one pass, write the requested artifacts and exit.
///
/// Exits with status 2 when availability is critical.
fn run_batch(args: &Args, settings: &Settings) -> Result<ExitCode> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
    let table = read_table(&bytes, &args.file.to_string_lossy())?;
    let analysis = Analysis::run(&table, settings)?;

    if let Some(ref path) = args.export {
        let rows = analysis.report_rows();
        report::write_csv(path, &rows)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Exported {} gaps to {}", rows.len(), path.display());
    }

    if let Some(ref path) = args.chart {
        let Some(ref chart) = analysis.chart else {
            anyhow::bail!(
                "Cannot export chart: {}",
                analysis.chart_error.as_deref().unwrap_or("chart unavailable")
            );
        };
        fs::write(path, serde_json::to_string_pretty(chart)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Wrote chart spec to {}", path.display());
    }

    if args.json {
        println!("{}", analysis.to_json()?);
    }

    let summary = &analysis.summary;
    eprintln!(
        "{} availability {:.2}% ({}/{} points, {} gaps)",
        analysis.status.symbol(),
        summary.availability_pct,
        summary.actual_points,
        summary.expected_points,
        analysis.gaps.len()
    );

    if analysis.status == AvailabilityStatus::Critical {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    settings: Settings,
    refresh_interval: Duration,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, settings);
    app.reload_data();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let top = (area.height / 2).saturating_sub(2);
                let centered = ratatui::layout::Rect::new(0, top, area.width, 5.min(area.height));
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            // A failed pass replaces every view
            if app.analysis.is_none() {
                ui::common::render_error(frame, app, chunks[2]);
            } else {
                match app.current_view {
                    View::Summary => ui::summary::render(frame, app, chunks[2]),
                    View::Gaps => ui::gaps::render(frame, app, chunks[2]),
                    View::Chart => ui::chart::render(frame, app, chunks[2]),
                }
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + table border (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Re-run when the file changes on disk
        if last_refresh.elapsed() >= refresh_interval {
            app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}
