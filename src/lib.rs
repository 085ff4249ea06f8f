//! # gapwatch
//!
//! Find the holes in a time series.
//!
//! Given a table with a timestamp column and an expected sampling interval,
//! gapwatch parses and sorts the timestamps, collapses duplicate timestamps
//! under a chosen policy, builds the regular grid the data should cover, and
//! reports every contiguous run of missing grid entries. The result is shown
//! in an interactive terminal UI or exported as CSV and JSON.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(analysis)│    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │              ▲                                      │
//! │       ▼              │ Settings (config)                    │
//! │  ┌─────────┐         │                                      │
//! │  │ source  │◀── FileSource | BytesSource                    │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) that turns a
//!   file or an in-memory upload into a typed [`Table`]
//! - **[`data`]**: The analysis pass - normalization, duplicate resolution, grid,
//!   gaps, summary metrics, report and chart spec
//! - **[`config`]**: Layered [`Settings`] from defaults, a TOML file, the
//!   environment and the command line
//! - **[`app`]**: Application state, view navigation and parameter cycling
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Explore a file interactively
//! gapwatch --file readings.csv --interval 10min
//!
//! # Write the gap report and exit
//! gapwatch --file readings.csv --export missing_data_report.csv
//! ```
//!
//! ### As a library
//!
//! ```
//! use gapwatch::{read_table, Analysis, Settings};
//!
//! let csv = b"time,value\n2024-01-01 00:00:00,1\n2024-01-01 00:15:00,2\n";
//! let table = read_table(csv, "readings.csv").unwrap();
//!
//! let analysis = Analysis::run(&table, &Settings::default()).unwrap();
//! assert_eq!(analysis.summary.expected_points, 4);
//! assert_eq!(analysis.gaps.len(), 1);
//! assert_eq!(analysis.gaps[0].count, 2);
//! ```
//!
//! ### Driving the TUI state from an upload
//!
//! ```
//! use gapwatch::{App, BytesSource, Settings};
//!
//! let source = BytesSource::new(b"time\n2024-01-01\n".to_vec(), "upload.csv");
//! let app = App::new(Box::new(source), Settings::default());
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use data::{
    Analysis, AvailabilityStatus, ChartSpec, DuplicatePolicy, Gap, GapReportRow, Interval,
    SummaryMetrics, Thresholds,
};
pub use error::AnalysisError;
pub use source::{read_table, BytesSource, Column, ColumnData, DataSource, FileSource, Table};
