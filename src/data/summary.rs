//! Availability metrics and their health classification.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Thresholds for availability status computation.
///
/// Availability below `availability_warning` is a warning, below
/// `availability_critical` it is critical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub availability_warning: f64,
    pub availability_critical: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            availability_warning: 99.0,
            availability_critical: 90.0,
        }
    }
}

/// Health status of a dataset's availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum AvailabilityStatus {
    Healthy,
    Warning,
    Critical,
}

impl AvailabilityStatus {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            AvailabilityStatus::Healthy => "OK",
            AvailabilityStatus::Warning => "WARN",
            AvailabilityStatus::Critical => "CRIT",
        }
    }
}

/// The four headline metrics plus grid bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryMetrics {
    /// Distinct observed timestamps.
    pub actual_points: usize,
    /// Grid length.
    pub expected_points: usize,
    /// `expected_points - actual_points`. Negative only when some observed
    /// timestamps fall between grid entries.
    pub missing_points: i64,
    /// `actual / expected` as a percentage rounded to two decimals; 0 for an
    /// empty grid.
    pub availability_pct: f64,
    /// Grid entries with no observation.
    pub missing_timestamps: usize,
    /// Observed timestamps that are not grid entries.
    pub off_grid_points: usize,
}

impl SummaryMetrics {
    pub fn compute(
        observed: &[NaiveDateTime],
        grid: &[NaiveDateTime],
        missing_timestamps: usize,
    ) -> Self {
        let actual_points = observed.iter().collect::<HashSet<_>>().len();
        let expected_points = grid.len();
        let on_grid = expected_points - missing_timestamps;

        Self {
            actual_points,
            expected_points,
            missing_points: expected_points as i64 - actual_points as i64,
            availability_pct: availability_pct(actual_points, expected_points),
            missing_timestamps,
            off_grid_points: actual_points.saturating_sub(on_grid),
        }
    }

    pub fn status(&self, thresholds: &Thresholds) -> AvailabilityStatus {
        if self.availability_pct < thresholds.availability_critical {
            AvailabilityStatus::Critical
        } else if self.availability_pct < thresholds.availability_warning {
            AvailabilityStatus::Warning
        } else {
            AvailabilityStatus::Healthy
        }
    }
}

/// Percentage of expected points present, rounded to two decimals.
pub fn availability_pct(actual: usize, expected: usize) -> f64 {
    if expected == 0 {
        return 0.0;
    }
    (100.0 * actual as f64 / expected as f64 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};

    fn at(minutes: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
            + TimeDelta::minutes(minutes)
    }

    #[test]
    fn test_availability_rounding() {
        assert_eq!(availability_pct(2, 3), 66.67);
        assert_eq!(availability_pct(1, 1), 100.0);
        assert_eq!(availability_pct(0, 0), 0.0);
        assert_eq!(availability_pct(1, 8), 12.5);
    }

    #[test]
    fn test_metrics_add_up() {
        let grid: Vec<_> = (0..5).map(|i| at(i * 5)).collect();
        let observed = [at(0), at(20)];
        let metrics = SummaryMetrics::compute(&observed, &grid, 3);

        assert_eq!(metrics.actual_points, 2);
        assert_eq!(metrics.expected_points, 5);
        assert_eq!(metrics.missing_points, 3);
        assert_eq!(metrics.availability_pct, 40.0);
        assert_eq!(metrics.off_grid_points, 0);
        assert_eq!(
            metrics.missing_points + metrics.actual_points as i64,
            metrics.expected_points as i64
        );
    }

    #[test]
    fn test_single_point() {
        let metrics = SummaryMetrics::compute(&[at(0)], &[at(0)], 0);
        assert_eq!(metrics.expected_points, 1);
        assert_eq!(metrics.missing_points, 0);
        assert_eq!(metrics.availability_pct, 100.0);
    }

    #[test]
    fn test_off_grid_points() {
        // Grid at 0, 5, 10; observation at 7 is between entries.
        let grid = [at(0), at(5), at(10)];
        let observed = [at(0), at(7), at(10)];
        let metrics = SummaryMetrics::compute(&observed, &grid, 1);
        assert_eq!(metrics.off_grid_points, 1);
        assert_eq!(metrics.missing_points, 0);
    }

    #[test]
    fn test_status_thresholds() {
        let thresholds = Thresholds::default();
        let mut metrics = SummaryMetrics::compute(&[at(0)], &[at(0)], 0);
        assert_eq!(metrics.status(&thresholds), AvailabilityStatus::Healthy);

        metrics.availability_pct = 95.0;
        assert_eq!(metrics.status(&thresholds), AvailabilityStatus::Warning);

        metrics.availability_pct = 50.0;
        assert_eq!(metrics.status(&thresholds), AvailabilityStatus::Critical);
        assert_eq!(metrics.status(&thresholds).symbol(), "CRIT");
    }
}
