//! Sampling interval parsing and labelling.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Suffix to seconds multiplier (order matters: longer suffixes first)
const UNITS: &[(&str, i64)] = &[
    ("seconds", 1),
    ("minutes", MINUTE),
    ("second", 1),
    ("minute", MINUTE),
    ("hours", HOUR),
    ("weeks", WEEK),
    ("hour", HOUR),
    ("days", DAY),
    ("week", WEEK),
    ("secs", 1),
    ("mins", MINUTE),
    ("day", DAY),
    ("sec", 1),
    ("min", MINUTE),
    ("hrs", HOUR),
    ("hr", HOUR),
    ("s", 1),
    ("m", MINUTE),
    ("h", HOUR),
    ("d", DAY),
    ("w", WEEK),
];

/// The expected spacing between consecutive data points.
///
/// Intervals have whole-second resolution and are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Interval {
    secs: i64,
}

impl Interval {
    /// Presets offered for quick selection, in cycling order.
    pub const PRESETS: [Interval; 5] = [
        Interval::from_minutes(5),
        Interval::from_minutes(10),
        Interval::from_minutes(30),
        Interval { secs: HOUR },
        Interval { secs: DAY },
    ];

    /// Create an interval from a number of seconds.
    ///
    /// The interval must be positive and representable as a [`TimeDelta`].
    pub fn from_secs(secs: i64) -> Result<Self, AnalysisError> {
        if secs <= 0 {
            return Err(AnalysisError::InvalidInterval(format!(
                "{}s is not a positive duration",
                secs
            )));
        }
        if TimeDelta::try_seconds(secs).is_none() {
            return Err(AnalysisError::InvalidInterval(format!("{}s is too long", secs)));
        }
        Ok(Self { secs })
    }

    const fn from_minutes(minutes: i64) -> Self {
        Self {
            secs: minutes * MINUTE,
        }
    }

    pub fn as_secs(&self) -> i64 {
        self.secs
    }

    pub fn as_delta(&self) -> TimeDelta {
        TimeDelta::seconds(self.secs)
    }

    /// Compact label in the same style as the usual frequency aliases:
    /// `90s`, `5min`, `1H`, `1D`.
    pub fn label(&self) -> String {
        if self.secs % DAY == 0 {
            format!("{}D", self.secs / DAY)
        } else if self.secs % HOUR == 0 {
            format!("{}H", self.secs / HOUR)
        } else if self.secs % MINUTE == 0 {
            format!("{}min", self.secs / MINUTE)
        } else {
            format!("{}s", self.secs)
        }
    }

    /// The preset after this one, or the first preset for custom intervals.
    pub fn next_preset(self) -> Self {
        Self::PRESETS
            .iter()
            .position(|p| *p == self)
            .map(|i| Self::PRESETS[(i + 1) % Self::PRESETS.len()])
            .unwrap_or(Self::PRESETS[0])
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::PRESETS[0]
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Parse interval strings like "5min", "1H", "1 hour", "90s", "2d".
/// A missing number means one unit ("H" is one hour).
impl FromStr for Interval {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();

        for (suffix, multiplier) in UNITS {
            if let Some(val_str) = normalized.strip_suffix(suffix) {
                let val_str = val_str.trim();
                let count: i64 = if val_str.is_empty() {
                    1
                } else {
                    val_str
                        .parse()
                        .map_err(|_| AnalysisError::InvalidInterval(s.to_string()))?
                };
                let secs = count
                    .checked_mul(*multiplier)
                    .ok_or_else(|| AnalysisError::InvalidInterval(s.to_string()))?;
                return Self::from_secs(secs);
            }
        }

        Err(AnalysisError::InvalidInterval(s.to_string()))
    }
}

impl From<Interval> for String {
    fn from(interval: Interval) -> Self {
        interval.label()
    }
}

impl TryFrom<String> for Interval {
    type Error = AnalysisError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_presets() {
        assert_eq!("5min".parse::<Interval>().unwrap().as_secs(), 300);
        assert_eq!("10min".parse::<Interval>().unwrap().as_secs(), 600);
        assert_eq!("30min".parse::<Interval>().unwrap().as_secs(), 1800);
        assert_eq!("1hour".parse::<Interval>().unwrap().as_secs(), 3600);
        assert_eq!("1day".parse::<Interval>().unwrap().as_secs(), 86400);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("1H".parse::<Interval>().unwrap().as_secs(), 3600);
        assert_eq!("1D".parse::<Interval>().unwrap().as_secs(), 86400);
        assert_eq!("H".parse::<Interval>().unwrap().as_secs(), 3600);
        assert_eq!("90s".parse::<Interval>().unwrap().as_secs(), 90);
        assert_eq!("15 minutes".parse::<Interval>().unwrap().as_secs(), 900);
        assert_eq!("2w".parse::<Interval>().unwrap().as_secs(), 14 * 86400);
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!("".parse::<Interval>().is_err());
        assert!("5".parse::<Interval>().is_err());
        assert!("0min".parse::<Interval>().is_err());
        assert!("-5min".parse::<Interval>().is_err());
        assert!("fivemin".parse::<Interval>().is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        let err = "10000000000000000s".parse::<Interval>().unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInterval(_)));
        assert!(Interval::from_secs(i64::MAX).is_err());

        let huge = "100000000000000s".parse::<Interval>().unwrap();
        assert_eq!(huge.as_delta().num_seconds(), 100_000_000_000_000);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Interval::from_secs(300).unwrap().label(), "5min");
        assert_eq!(Interval::from_secs(3600).unwrap().label(), "1H");
        assert_eq!(Interval::from_secs(86400).unwrap().label(), "1D");
        assert_eq!(Interval::from_secs(90).unwrap().label(), "90s");
        assert_eq!(Interval::from_secs(5400).unwrap().label(), "90min");
    }

    #[test]
    fn test_next_preset_cycles() {
        let mut interval = Interval::default();
        let mut seen = Vec::new();
        for _ in 0..Interval::PRESETS.len() {
            seen.push(interval.label());
            interval = interval.next_preset();
        }
        assert_eq!(seen, vec!["5min", "10min", "30min", "1H", "1D"]);
        assert_eq!(interval, Interval::default());

        let custom = Interval::from_secs(42).unwrap();
        assert_eq!(custom.next_preset(), Interval::PRESETS[0]);
    }

    #[test]
    fn test_serde_uses_label() {
        let json = serde_json::to_string(&Interval::from_secs(600).unwrap()).unwrap();
        assert_eq!(json, "\"10min\"");
        let back: Interval = serde_json::from_str("\"1H\"").unwrap();
        assert_eq!(back.as_secs(), 3600);
    }
}
