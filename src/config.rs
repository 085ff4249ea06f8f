//! Layered settings for an analysis pass.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config`, or `gapwatch.toml` in the working directory
//!    if present)
//! 3. `GAPWATCH_*` environment variables
//!    (`GAPWATCH_THRESHOLDS__AVAILABILITY_WARNING` for nested keys)
//! 4. command-line flags, applied with [`Settings::apply`]
//!
//! ```toml
//! timestamp_column = "time"
//! duplicate_policy = "median"
//! interval = "10min"
//! value_column = "load"
//!
//! [thresholds]
//! availability_warning = 99.5
//! availability_critical = 95.0
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::data::{
    normalize::detect_timestamp_column, DuplicatePolicy, Interval, Series, Thresholds,
};
use crate::source::Table;

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "gapwatch.toml";

const ENV_PREFIX: &str = "GAPWATCH";

/// Parameters of one analysis pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Column holding the timestamps. Detected from the table when unset.
    pub timestamp_column: Option<String>,
    pub duplicate_policy: DuplicatePolicy,
    pub interval: Interval,
    /// Column plotted on the chart. First numeric column when unset.
    pub value_column: Option<String>,
    pub thresholds: Thresholds,
}

/// Values given on the command line. `None` leaves the layered value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub timestamp_column: Option<String>,
    pub duplicate_policy: Option<DuplicatePolicy>,
    pub interval: Option<Interval>,
    pub value_column: Option<String>,
    pub availability_warning: Option<f64>,
    pub availability_critical: Option<f64>,
}

impl Settings {
    /// Load defaults, the config file and the process environment.
    ///
    /// An explicit `config_path` must exist; the default file is optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_path, None)
    }

    /// Like [`Settings::load`], reading variables from `env` instead of the
    /// process environment when given.
    pub fn load_with_env(
        config_path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let file = match config_path {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .with_context(|| match config_path {
                Some(path) => format!("Failed to load config from {}", path.display()),
                None => "Failed to load configuration".to_string(),
            })?;

        let settings: Settings =
            config.try_deserialize().context("Invalid configuration values")?;
        tracing::debug!(?settings, "loaded settings");
        Ok(settings)
    }

    /// Apply command-line overrides on top of the layered values.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(column) = overrides.timestamp_column {
            self.timestamp_column = Some(column);
        }
        if let Some(policy) = overrides.duplicate_policy {
            self.duplicate_policy = policy;
        }
        if let Some(interval) = overrides.interval {
            self.interval = interval;
        }
        if let Some(column) = overrides.value_column {
            self.value_column = Some(column);
        }
        if let Some(warning) = overrides.availability_warning {
            self.thresholds.availability_warning = warning;
        }
        if let Some(critical) = overrides.availability_critical {
            self.thresholds.availability_critical = critical;
        }
        self
    }

    /// The timestamp column to use for `table`.
    pub fn timestamp_column_for(&self, table: &Table) -> Option<String> {
        self.timestamp_column
            .clone()
            .or_else(|| detect_timestamp_column(table).map(str::to_string))
    }

    /// The value column to chart for `series`.
    pub fn value_column_for(&self, series: &Series) -> Option<String> {
        self.value_column
            .clone()
            .or_else(|| series.numeric_columns().first().map(|name| name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Column;
    use std::io::Write;

    fn empty_env() -> Option<config::Map<String, String>> {
        Some(config::Map::new())
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.duplicate_policy, DuplicatePolicy::Mean);
        assert_eq!(settings.interval.label(), "5min");
        assert_eq!(settings.thresholds.availability_warning, 99.0);
        assert_eq!(settings.thresholds.availability_critical, 90.0);
        assert!(settings.timestamp_column.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            concat!(
                "timestamp_column = \"time\"\n",
                "duplicate_policy = \"median\"\n",
                "interval = \"10min\"\n",
                "\n",
                "[thresholds]\n",
                "availability_warning = 95.0",
            )
        )
        .unwrap();

        let settings = Settings::load_with_env(Some(file.path()), empty_env()).unwrap();

        assert_eq!(settings.timestamp_column.as_deref(), Some("time"));
        assert_eq!(settings.duplicate_policy, DuplicatePolicy::Median);
        assert_eq!(settings.interval.as_secs(), 600);
        assert_eq!(settings.thresholds.availability_warning, 95.0);
        assert_eq!(settings.thresholds.availability_critical, 90.0);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "interval = \"10min\"\nvalue_column = \"load\"").unwrap();

        let mut env = config::Map::new();
        env.insert("GAPWATCH_INTERVAL".to_string(), "1H".to_string());
        env.insert(
            "GAPWATCH_THRESHOLDS__AVAILABILITY_CRITICAL".to_string(),
            "80".to_string(),
        );

        let settings = Settings::load_with_env(Some(file.path()), Some(env)).unwrap();

        assert_eq!(settings.interval.label(), "1H");
        assert_eq!(settings.value_column.as_deref(), Some("load"));
        assert_eq!(settings.thresholds.availability_critical, 80.0);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(Settings::load_with_env(Some(&path), empty_env()).is_err());
    }

    #[test]
    fn test_invalid_interval_in_file_fails() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "interval = \"soon\"").unwrap();
        assert!(Settings::load_with_env(Some(file.path()), empty_env()).is_err());
    }

    #[test]
    fn test_cli_overrides_win() {
        let settings = Settings {
            interval: "1D".parse().unwrap(),
            ..Settings::default()
        }
        .apply(Overrides {
            interval: Some("30min".parse().unwrap()),
            duplicate_policy: Some(DuplicatePolicy::Max),
            availability_critical: Some(50.0),
            ..Overrides::default()
        });

        assert_eq!(settings.interval.label(), "30min");
        assert_eq!(settings.duplicate_policy, DuplicatePolicy::Max);
        assert_eq!(settings.thresholds.availability_critical, 50.0);
        assert_eq!(settings.thresholds.availability_warning, 99.0);
    }

    #[test]
    fn test_column_resolution() {
        let table = Table::new(vec![
            Column::text("site", vec![Some("a")]),
            Column::text("when", vec![Some("2024-01-01 00:00:00")]),
            Column::numeric("load", vec![Some(1.0)]),
        ])
        .unwrap();
        let settings = Settings::default();
        assert_eq!(settings.timestamp_column_for(&table).as_deref(), Some("when"));

        let chosen = Settings {
            timestamp_column: Some("site".to_string()),
            ..Settings::default()
        };
        assert_eq!(chosen.timestamp_column_for(&table).as_deref(), Some("site"));

        let series = Series {
            timestamp_column: "when".to_string(),
            timestamps: Vec::new(),
            columns: vec![
                Column::text("site", Vec::<Option<&str>>::new()),
                Column::numeric("load", Vec::new()),
            ],
        };
        assert_eq!(settings.value_column_for(&series).as_deref(), Some("load"));
    }
}
