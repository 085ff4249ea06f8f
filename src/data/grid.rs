//! Expected timestamp grid.

use chrono::NaiveDateTime;

use super::interval::Interval;
use crate::error::{AnalysisError, Result};

/// Number of grid entries between `min` and `max` inclusive:
/// `floor((max - min) / interval) + 1`.
pub fn expected_len(min: NaiveDateTime, max: NaiveDateTime, interval: Interval) -> usize {
    let span = (max - min).num_milliseconds().max(0);
    let step = interval.as_delta().num_milliseconds();
    (span / step) as usize + 1
}

/// Build every timestamp from the earliest to the latest observation,
/// spaced exactly by `interval` and anchored at the earliest one.
///
/// Fails with [`AnalysisError::EmptyDataset`] when there is nothing to anchor on.
pub fn build_grid(timestamps: &[NaiveDateTime], interval: Interval) -> Result<Vec<NaiveDateTime>> {
    let (Some(&min), Some(&max)) = (timestamps.iter().min(), timestamps.iter().max()) else {
        return Err(AnalysisError::EmptyDataset);
    };

    let len = expected_len(min, max, interval);
    let step = interval.as_delta();
    let grid: Vec<NaiveDateTime> =
        std::iter::successors(Some(min), |&ts| ts.checked_add_signed(step)).take(len).collect();

    tracing::debug!(start = %min, end = %max, interval = %interval, len, "built grid");
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};
    use proptest::prelude::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn five_min() -> Interval {
        "5min".parse().unwrap()
    }

    #[test]
    fn test_grid_is_inclusive() {
        let grid = build_grid(&[ts("2024-01-01 00:00:00"), ts("2024-01-01 00:20:00")], five_min())
            .unwrap();
        assert_eq!(grid.len(), 5);
        assert_eq!(grid.first(), Some(&ts("2024-01-01 00:00:00")));
        assert_eq!(grid.last(), Some(&ts("2024-01-01 00:20:00")));
    }

    #[test]
    fn test_grid_floors_partial_step() {
        let grid = build_grid(&[ts("2024-01-01 00:00:00"), ts("2024-01-01 00:12:00")], five_min())
            .unwrap();
        assert_eq!(grid, vec![
            ts("2024-01-01 00:00:00"),
            ts("2024-01-01 00:05:00"),
            ts("2024-01-01 00:10:00"),
        ]);
    }

    #[test]
    fn test_single_point_grid() {
        let grid = build_grid(&[ts("2024-01-01 00:00:00")], five_min()).unwrap();
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_interval_longer_than_span() {
        let interval: Interval = "100000000000000s".parse().unwrap();
        let grid = build_grid(&[ts("2024-01-01 00:00:00"), ts("2024-01-02 00:00:00")], interval)
            .unwrap();
        assert_eq!(grid, vec![ts("2024-01-01 00:00:00")]);
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(build_grid(&[], five_min()), Err(AnalysisError::EmptyDataset)));
    }

    proptest! {
        #[test]
        fn prop_grid_len_matches_formula(
            offset_secs in 0i64..(400 * 86400),
            span_secs in 0i64..(30 * 86400),
            step_secs in 1i64..(2 * 86400),
        ) {
            let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
            let min = base + TimeDelta::seconds(offset_secs);
            let max = min + TimeDelta::seconds(span_secs);
            let interval = Interval::from_secs(step_secs).unwrap();

            let grid = build_grid(&[max, min], interval).unwrap();

            prop_assert_eq!(grid.len() as i64, span_secs / step_secs + 1);
            prop_assert_eq!(grid.len(), expected_len(min, max, interval));
            prop_assert_eq!(grid[0], min);
            prop_assert!(*grid.last().unwrap() <= max);
            prop_assert!(grid.windows(2).all(|w| w[1] - w[0] == interval.as_delta()));
        }
    }
}
