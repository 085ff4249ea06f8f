//! Duplicate timestamp resolution.
//!
//! Every downstream step assumes one row per timestamp. Rows that share a
//! timestamp are collapsed into one, either by keeping a representative row
//! or by aggregating the numeric columns.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::normalize::Series;
use crate::error::AnalysisError;
use crate::source::Column;

/// How to collapse rows that share a timestamp.
///
/// `Mean` is the default even though it is lossy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first row of each group, all columns included.
    KeepFirst,
    /// Keep the last row of each group, all columns included.
    KeepLast,
    #[default]
    Mean,
    Median,
    Min,
    Max,
}

impl DuplicatePolicy {
    pub const ALL: [DuplicatePolicy; 6] = [
        DuplicatePolicy::KeepFirst,
        DuplicatePolicy::KeepLast,
        DuplicatePolicy::Mean,
        DuplicatePolicy::Median,
        DuplicatePolicy::Min,
        DuplicatePolicy::Max,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DuplicatePolicy::KeepFirst => "Keep First",
            DuplicatePolicy::KeepLast => "Keep Last",
            DuplicatePolicy::Mean => "Mean",
            DuplicatePolicy::Median => "Median",
            DuplicatePolicy::Min => "Min",
            DuplicatePolicy::Max => "Max",
        }
    }

    /// Whether this policy aggregates numeric columns (and drops text ones).
    pub fn is_aggregate(&self) -> bool {
        self.aggregation().is_some()
    }

    fn aggregation(&self) -> Option<Aggregation> {
        match self {
            DuplicatePolicy::KeepFirst | DuplicatePolicy::KeepLast => None,
            DuplicatePolicy::Mean => Some(Aggregation::Mean),
            DuplicatePolicy::Median => Some(Aggregation::Median),
            DuplicatePolicy::Min => Some(Aggregation::Min),
            DuplicatePolicy::Max => Some(Aggregation::Max),
        }
    }

    /// Cycle to the next policy.
    pub fn next(self) -> Self {
        match self {
            DuplicatePolicy::KeepFirst => DuplicatePolicy::KeepLast,
            DuplicatePolicy::KeepLast => DuplicatePolicy::Mean,
            DuplicatePolicy::Mean => DuplicatePolicy::Median,
            DuplicatePolicy::Median => DuplicatePolicy::Min,
            DuplicatePolicy::Min => DuplicatePolicy::Max,
            DuplicatePolicy::Max => DuplicatePolicy::KeepFirst,
        }
    }
}

/// Numeric reduction used by the aggregating policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Aggregation {
    Mean,
    Median,
    Min,
    Max,
}

impl Aggregation {
    /// Reduce a group's values, ignoring nulls. All-null groups stay null.
    fn apply(self, values: &[Option<f64>]) -> Option<f64> {
        let mut present: Vec<f64> = values.iter().flatten().copied().collect();
        if present.is_empty() {
            return None;
        }
        match self {
            Aggregation::Mean => Some(present.iter().sum::<f64>() / present.len() as f64),
            Aggregation::Median => {
                present.sort_by(|a, b| a.total_cmp(b));
                let mid = present.len() / 2;
                if present.len() % 2 == 0 {
                    Some((present[mid - 1] + present[mid]) / 2.0)
                } else {
                    Some(present[mid])
                }
            }
            Aggregation::Min => present.into_iter().reduce(f64::min),
            Aggregation::Max => present.into_iter().reduce(f64::max),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts `keep_first`, `Keep First`, `keep-first`, `first`, `mean`, ...
impl FromStr for DuplicatePolicy {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "keepfirst" | "first" => Ok(DuplicatePolicy::KeepFirst),
            "keeplast" | "last" => Ok(DuplicatePolicy::KeepLast),
            "mean" | "average" => Ok(DuplicatePolicy::Mean),
            "median" => Ok(DuplicatePolicy::Median),
            "min" => Ok(DuplicatePolicy::Min),
            "max" => Ok(DuplicatePolicy::Max),
            _ => Err(AnalysisError::InvalidPolicy(s.to_string())),
        }
    }
}

/// What the resolver found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolveStats {
    pub policy: DuplicatePolicy,
    /// Rows whose timestamp repeats an earlier row.
    pub duplicate_rows: usize,
    /// Distinct timestamps that occur more than once.
    pub duplicate_groups: usize,
    /// False when there was nothing to resolve and the input passed through.
    pub applied: bool,
}

/// Collapse rows sharing a timestamp according to `policy`.
///
/// The input must be sorted (as produced by normalization). When there are no
/// duplicates the series is returned unchanged, so text columns survive even
/// under aggregating policies. Resolving an already resolved series is a no-op.
pub fn resolve(series: Series, policy: DuplicatePolicy) -> (Series, ResolveStats) {
    let groups = timestamp_groups(&series);
    let duplicate_rows = series.len() - groups.len();
    let duplicate_groups = groups.iter().filter(|g| g.len() > 1).count();

    let mut stats = ResolveStats {
        policy,
        duplicate_rows,
        duplicate_groups,
        applied: false,
    };
    if duplicate_rows == 0 {
        return (series, stats);
    }

    tracing::warn!(
        duplicate_rows,
        duplicate_groups,
        policy = %policy,
        "found rows with duplicate timestamps"
    );

    let timestamps: Vec<_> = groups.iter().map(|g| series.timestamps[g.start]).collect();
    let columns: Vec<Column> = if let Some(aggregation) = policy.aggregation() {
        series
            .columns
            .iter()
            .filter_map(|column| {
                let values = column.as_numeric()?;
                let aggregated = groups
                    .iter()
                    .map(|g| aggregation.apply(&values[g.clone()]))
                    .collect();
                Some(Column::numeric(column.name.clone(), aggregated))
            })
            .collect()
    } else {
        let indices: Vec<usize> = groups
            .iter()
            .map(|g| if policy == DuplicatePolicy::KeepFirst { g.start } else { g.end - 1 })
            .collect();
        series
            .columns
            .iter()
            .map(|column| Column {
                name: column.name.clone(),
                data: column.data.take(&indices),
            })
            .collect()
    };

    stats.applied = true;
    let resolved = Series {
        timestamp_column: series.timestamp_column,
        timestamps,
        columns,
    };
    (resolved, stats)
}

/// Row ranges of equal timestamps in a sorted series.
fn timestamp_groups(series: &Series) -> Vec<Range<usize>> {
    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..=series.len() {
        if i == series.len() || series.timestamps[i] != series.timestamps[start] {
            groups.push(start..i);
            start = i;
        }
    }
    groups
}

/// Count rows that repeat an earlier timestamp without resolving anything.
pub fn count_duplicates(series: &Series) -> usize {
    series.len() - timestamp_groups(series).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn series_with_duplicates() -> Series {
        Series {
            timestamp_column: "time".to_string(),
            timestamps: vec![
                ts("2024-01-01 00:00:00"),
                ts("2024-01-01 00:00:00"),
                ts("2024-01-01 00:05:00"),
                ts("2024-01-01 00:10:00"),
                ts("2024-01-01 00:10:00"),
                ts("2024-01-01 00:10:00"),
            ],
            columns: vec![
                Column::numeric(
                    "value",
                    vec![Some(10.0), Some(20.0), Some(5.0), Some(1.0), None, Some(4.0)],
                ),
                Column::text(
                    "site",
                    vec![Some("a"), Some("b"), Some("c"), Some("d"), Some("e"), Some("f")],
                ),
            ],
        }
    }

    fn values(series: &Series) -> Vec<Option<f64>> {
        series.column("value").unwrap().as_numeric().unwrap().to_vec()
    }

    #[test]
    fn test_only_aggregating_policies_reduce() {
        assert_eq!(DuplicatePolicy::KeepFirst.aggregation(), None);
        assert_eq!(DuplicatePolicy::KeepLast.aggregation(), None);
        assert_eq!(DuplicatePolicy::Median.aggregation(), Some(Aggregation::Median));

        let group = [Some(4.0), None, Some(1.0), Some(3.0), Some(2.0)];
        assert_eq!(Aggregation::Mean.apply(&group), Some(2.5));
        assert_eq!(Aggregation::Median.apply(&group), Some(2.5));
        assert_eq!(Aggregation::Min.apply(&group), Some(1.0));
        assert_eq!(Aggregation::Max.apply(&group), Some(4.0));
        assert_eq!(Aggregation::Mean.apply(&[None, None]), None);
    }

    #[test]
    fn test_mean_collapses_duplicates() {
        let (resolved, stats) = resolve(series_with_duplicates(), DuplicatePolicy::Mean);

        assert_eq!(resolved.len(), 3);
        assert!(resolved.is_strictly_increasing());
        assert_eq!(values(&resolved), vec![Some(15.0), Some(5.0), Some(2.5)]);
        assert!(resolved.column("site").is_none(), "text columns are dropped");
        assert_eq!(stats.duplicate_rows, 3);
        assert_eq!(stats.duplicate_groups, 2);
        assert!(stats.applied);
    }

    #[test]
    fn test_median_min_max() {
        let (median, _) = resolve(series_with_duplicates(), DuplicatePolicy::Median);
        assert_eq!(values(&median), vec![Some(15.0), Some(5.0), Some(2.5)]);

        let (min, _) = resolve(series_with_duplicates(), DuplicatePolicy::Min);
        assert_eq!(values(&min), vec![Some(10.0), Some(5.0), Some(1.0)]);

        let (max, _) = resolve(series_with_duplicates(), DuplicatePolicy::Max);
        assert_eq!(values(&max), vec![Some(20.0), Some(5.0), Some(4.0)]);
    }

    #[test]
    fn test_keep_first_and_last_keep_whole_rows() {
        let (first, _) = resolve(series_with_duplicates(), DuplicatePolicy::KeepFirst);
        assert_eq!(values(&first), vec![Some(10.0), Some(5.0), Some(1.0)]);
        assert_eq!(first.column("site").unwrap().data.text_at(2).as_deref(), Some("d"));

        let (last, _) = resolve(series_with_duplicates(), DuplicatePolicy::KeepLast);
        assert_eq!(values(&last), vec![Some(20.0), Some(5.0), Some(4.0)]);
        assert_eq!(last.column("site").unwrap().data.text_at(0).as_deref(), Some("b"));
    }

    #[test]
    fn test_all_null_group_stays_null() {
        let series = Series {
            timestamp_column: "time".to_string(),
            timestamps: vec![ts("2024-01-01 00:00:00"), ts("2024-01-01 00:00:00")],
            columns: vec![Column::numeric("value", vec![None, None])],
        };
        let (resolved, _) = resolve(series, DuplicatePolicy::Mean);
        assert_eq!(values(&resolved), vec![None]);
    }

    #[test]
    fn test_no_duplicates_is_noop() {
        let (once, _) = resolve(series_with_duplicates(), DuplicatePolicy::KeepFirst);
        let (twice, stats) = resolve(once.clone(), DuplicatePolicy::Mean);

        assert_eq!(twice, once);
        assert!(!stats.applied);
        assert_eq!(stats.duplicate_rows, 0);
        assert!(twice.column("site").is_some(), "text columns survive a no-op");
    }

    #[test]
    fn test_count_duplicates() {
        assert_eq!(count_duplicates(&series_with_duplicates()), 3);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("keep_first".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::KeepFirst);
        assert_eq!("Keep Last".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::KeepLast);
        assert_eq!("MEDIAN".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Median);
        assert!("mode".parse::<DuplicatePolicy>().is_err());
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::Mean);
    }

    #[test]
    fn test_policy_cycle_covers_all() {
        let mut policy = DuplicatePolicy::KeepFirst;
        for expected in DuplicatePolicy::ALL {
            assert_eq!(policy, expected);
            policy = policy.next();
        }
        assert_eq!(policy, DuplicatePolicy::KeepFirst);
    }
}
