//! Terminal UI rendering using ratatui.
//!
//! Each view is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`summary`]: Headline metrics, row accounting and active settings
//! - [`gaps`]: Sortable table of detected gaps
//! - [`chart`]: Timeline canvas with observed points and shaded gaps
//! - [`detail`]: Modal overlay for the selected gap
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (summary/gaps/chart::render)         │
//! │  or common::render_error             │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod chart;
pub mod common;
pub mod detail;
pub mod gaps;
pub mod summary;
pub mod theme;

pub use gaps::GapSortColumn;
pub use theme::Theme;
