//! Serializable screen job configuration.
//!
//! A job config captures everything needed to reproduce a screen run:
//! input file paths, indicator windows, scoring thresholds, and report
//! settings. Loaded from TOML; every `[screen]` field falls back to the
//! documented defaults.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use scanlab_core::engine::ScreenConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Report flavor: the weekend report adds the rethink-notes block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    #[default]
    Daily,
    Weekend,
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportMode::Daily => write!(f, "daily"),
            ReportMode::Weekend => write!(f, "weekend"),
        }
    }
}

impl FromStr for ReportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(ReportMode::Daily),
            "weekend" => Ok(ReportMode::Weekend),
            other => Err(format!("unknown report mode '{other}' (daily|weekend)")),
        }
    }
}

/// Input file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// History CSV: date,ticker,open,high,low,close,volume.
    pub history: PathBuf,
    /// Snapshot CSV: ticker plus nullable quote columns.
    pub snapshot: PathBuf,
    /// Optional watchlist CSV restricting which tickers are screened.
    #[serde(default)]
    pub watchlist: Option<PathBuf>,
}

/// Report output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub mode: ReportMode,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reports"),
            mode: ReportMode::Daily,
        }
    }
}

/// Complete job configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub data: DataConfig,
    #[serde(default)]
    pub screen: ScreenConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl JobConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = JobConfig::from_toml(
            r#"
[data]
history = "outputs/daily/latest_watchlist_history.csv"
snapshot = "outputs/daily/latest_watchlist_snapshot.csv"
"#,
        )
        .unwrap();

        assert_eq!(cfg.screen, ScreenConfig::default());
        assert_eq!(cfg.report.mode, ReportMode::Daily);
        assert_eq!(cfg.report.output_dir, PathBuf::from("reports"));
        assert!(cfg.data.watchlist.is_none());
    }

    #[test]
    fn thresholds_are_overridable() {
        let cfg = JobConfig::from_toml(
            r#"
[data]
history = "hist.csv"
snapshot = "snap.csv"
watchlist = "watchlist.csv"

[screen.scoring]
micro_cap_max = 500000000.0
min_buy_score = 4

[screen.indicators]
sma_long = 100

[report]
mode = "weekend"
output_dir = "out"
"#,
        )
        .unwrap();

        assert_eq!(cfg.screen.scoring.micro_cap_max, 500_000_000.0);
        assert_eq!(cfg.screen.scoring.min_buy_score, 4);
        assert_eq!(cfg.screen.indicators.sma_long, 100);
        // untouched fields keep their defaults
        assert_eq!(cfg.screen.scoring.price_floor, 0.20);
        assert_eq!(cfg.screen.indicators.rsi_period, 14);
        assert_eq!(cfg.report.mode, ReportMode::Weekend);
    }

    #[test]
    fn missing_data_section_is_an_error() {
        assert!(JobConfig::from_toml("[report]\nmode = \"daily\"").is_err());
    }

    #[test]
    fn mode_parses_from_str() {
        assert_eq!("daily".parse::<ReportMode>().unwrap(), ReportMode::Daily);
        assert_eq!("weekend".parse::<ReportMode>().unwrap(), ReportMode::Weekend);
        assert!("hourly".parse::<ReportMode>().is_err());
    }
}
