//! Gap analysis of a typed table.
//!
//! ## Submodules
//!
//! - [`timestamp`] and [`normalize`]: parse the timestamp column, drop bad rows, sort
//! - [`resolve`]: collapse duplicate timestamps under a [`DuplicatePolicy`]
//! - [`interval`] and [`grid`]: the expected cadence and the timestamps it implies
//! - [`gaps`]: missing grid entries grouped into contiguous [`Gap`]s
//! - [`summary`], [`report`], [`chart`]: metrics and the artifacts built from them
//! - [`analysis`]: the whole pass in one call
//!
//! ## Data Flow
//!
//! ```text
//! Table
//!   │
//!   ▼
//! normalize() ──▶ Series (sorted, NormalizeStats)
//!   │
//!   ▼
//! resolve()   ──▶ Series (unique timestamps, ResolveStats)
//!   │
//!   ├──▶ build_grid() ──▶ detect_gaps() ──▶ Vec<Gap> ──▶ report / chart
//!   │
//!   └──▶ SummaryMetrics::compute() ──▶ AvailabilityStatus
//! ```

pub mod analysis;
pub mod chart;
pub mod gaps;
pub mod grid;
pub mod interval;
pub mod normalize;
pub mod report;
pub mod resolve;
pub mod summary;
pub mod timestamp;

pub use analysis::Analysis;
pub use chart::{ChartPoint, ChartRegion, ChartSpec};
pub use gaps::Gap;
pub use interval::Interval;
pub use normalize::{NormalizeStats, Series};
pub use report::{GapReportRow, DEFAULT_REPORT_FILE};
pub use resolve::{DuplicatePolicy, ResolveStats};
pub use summary::{AvailabilityStatus, SummaryMetrics, Thresholds};
