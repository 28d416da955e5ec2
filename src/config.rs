//! Run configuration.
//!
//! Read from an optional TOML file; command-line flags override single
//! values afterwards. A missing file means "all defaults".

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::plan::PlotType;

/// Lead-time range plotted when nothing else is requested.
pub const DEFAULT_LT_RANGE: &str = "19-24";

/// Filesystem locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Directory holding one subdirectory per model version.
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Alternative score metadata file; the bundled copy is used if unset.
    pub score_metadata: Option<PathBuf>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("plots"),
            score_metadata: None,
        }
    }
}

/// Data file naming: `<prefix><lt_range>_<parameter><postfix>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNaming {
    pub postfix: String,
    pub station_scores: String,
    pub time_scores: String,
    pub daytime_scores: String,
    pub total_scores: String,
}

impl Default for FileNaming {
    fn default() -> Self {
        Self {
            postfix: ".dat".to_string(),
            station_scores: "station_scores".to_string(),
            time_scores: "time_scores".to_string(),
            daytime_scores: "daytime_scores".to_string(),
            total_scores: "total_scores".to_string(),
        }
    }
}

impl FileNaming {
    /// File prefix of a plot type. Ensemble scores live in the total files.
    pub fn prefix(&self, plot_type: PlotType) -> &str {
        match plot_type {
            PlotType::Station => &self.station_scores,
            PlotType::Time => &self.time_scores,
            PlotType::Daytime => &self.daytime_scores,
            PlotType::Total | PlotType::Ensemble => &self.total_scores,
        }
    }
}

/// Defaults for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub lt_ranges: Vec<String>,
    pub plot_types: Vec<PlotType>,
    pub debug: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            lt_ranges: vec![DEFAULT_LT_RANGE.to_string()],
            plot_types: PlotType::ALL.to_vec(),
            debug: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathConfig,
    pub files: FileNaming,
    pub run: RunConfig,
}

impl Config {
    /// Load `path`, or the defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::info!("config loaded from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.run.lt_ranges, vec!["19-24".to_string()]);
        assert_eq!(config.files.prefix(PlotType::Ensemble), "total_scores");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("verifplot.toml");
        fs::write(
            &path,
            r#"
[paths]
input_dir = "/scratch/verif"

[run]
lt_ranges = ["07-12", "19-24"]
plot_types = ["station", "total"]
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.paths.input_dir, PathBuf::from("/scratch/verif"));
        assert_eq!(config.paths.output_dir, PathBuf::from("plots"));
        assert_eq!(config.run.plot_types, vec![PlotType::Station, PlotType::Total]);
        assert_eq!(config.files.postfix, ".dat");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[run\nlt_ranges = 3").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
