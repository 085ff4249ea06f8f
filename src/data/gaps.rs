//! Gap detection and grouping.
//!
//! ```text
//! grid      00:00 00:05 00:10 00:15 00:20 00:25 00:30
//! observed  00:00             00:15             00:30
//! missing         00:05 00:10       00:20 00:25
//! gaps            [ 00:05 → 00:10 ] [ 00:20 → 00:25 ]
//! ```
//!
//! Missing timestamps are grouped by a single linear scan: a new gap starts
//! whenever the step from the previous *missing* timestamp is not exactly
//! one interval.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::interval::Interval;
use super::timestamp::format_timestamp;

/// A maximal run of consecutive missing grid entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gap {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Number of missing grid entries in the run.
    pub count: usize,
    pub interval: Interval,
}

impl Gap {
    /// `"<start> → <end>"`, as shown in the report.
    pub fn duration_label(&self) -> String {
        format!("{} → {}", format_timestamp(&self.start), format_timestamp(&self.end))
    }
}

/// Grid entries absent from `observed`, in grid order.
pub fn find_missing(grid: &[NaiveDateTime], observed: &[NaiveDateTime]) -> Vec<NaiveDateTime> {
    let present: HashSet<&NaiveDateTime> = observed.iter().collect();
    grid.iter().filter(|ts| !present.contains(ts)).copied().collect()
}

/// Merge ascending missing timestamps into gaps.
pub fn group_gaps(missing: &[NaiveDateTime], interval: Interval) -> Vec<Gap> {
    let step = interval.as_delta();
    let mut gaps: Vec<Gap> = Vec::new();

    for &ts in missing {
        match gaps.last_mut() {
            Some(gap) if ts - gap.end == step => {
                gap.end = ts;
                gap.count += 1;
            }
            _ => gaps.push(Gap {
                start: ts,
                end: ts,
                count: 1,
                interval,
            }),
        }
    }

    gaps
}

/// Missing timestamps and their grouping in one call.
pub fn detect_gaps(
    grid: &[NaiveDateTime],
    observed: &[NaiveDateTime],
    interval: Interval,
) -> (Vec<NaiveDateTime>, Vec<Gap>) {
    let missing = find_missing(grid, observed);
    let gaps = group_gaps(&missing, interval);
    tracing::debug!(missing = missing.len(), gaps = gaps.len(), "detected gaps");
    (missing, gaps)
}
