//! Command-line interface.
//!
//! Score strings use `,` between entries and `/` to join two scores on one
//! set of axes; categorical thresholds use `:` between parameters.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::plan::PlotType;
use crate::setup::SetupRequest;

/// Plot verification scores of one or more model versions.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Model versions; `,` separates figures, `/` overlays models
    #[arg(value_name = "MODEL_VERSIONS", default_value = "C-1E-CTR_ch,C-1E_ch")]
    pub model_versions: String,

    /// Parameters for regular scores (e.g. `T_2M,CLCT`)
    #[arg(long = "plot_params")]
    pub plot_params: Option<String>,

    /// Regular scores (e.g. `ME,MMOD/MOBS,MAE`)
    #[arg(long = "plot_scores")]
    pub plot_scores: Option<String>,

    /// Parameters for categorical scores
    #[arg(long = "plot_cat_params")]
    pub plot_cat_params: Option<String>,

    /// Categorical thresholds, `:` between parameters (e.g. `0.1,1:2.5,6.5`)
    #[arg(long = "plot_cat_thresh")]
    pub plot_cat_thresh: Option<String>,

    /// Categorical scores (e.g. `FBI,MF/OF,POD`)
    #[arg(long = "plot_cat_scores")]
    pub plot_cat_scores: Option<String>,

    /// Parameters for ensemble scores
    #[arg(long = "plot_ens_params")]
    pub plot_ens_params: Option<String>,

    /// Ensemble scores
    #[arg(long = "plot_ens_scores")]
    pub plot_ens_scores: Option<String>,

    /// Parameters for ensemble categorical scores
    #[arg(long = "plot_ens_cat_params")]
    pub plot_ens_cat_params: Option<String>,

    /// Ensemble categorical thresholds
    #[arg(long = "plot_ens_cat_thresh")]
    pub plot_ens_cat_thresh: Option<String>,

    /// Ensemble categorical scores
    #[arg(long = "plot_ens_cat_scores")]
    pub plot_ens_cat_scores: Option<String>,

    /// Lead-time ranges, comma separated [default: 19-24]
    #[arg(long = "lt_ranges")]
    pub lt_ranges: Option<String>,

    /// Plot types to generate; repeat for several [default: all]
    #[arg(long = "plot_type", value_enum)]
    pub plot_type: Vec<PlotType>,

    /// Directory with one subdirectory per model version
    #[arg(long = "input_dir", value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory receiving the figures [default: plots]
    #[arg(long = "output_dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// One colour per model version, comma separated
    #[arg(long)]
    pub colors: Option<String>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE", default_value = "verifplot.toml")]
    pub config: PathBuf,

    /// Log at debug level
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Score strings for the setup compiler.
    pub fn setup_request(&self) -> SetupRequest {
        SetupRequest {
            model_versions: self.model_versions.clone(),
            params: self.plot_params.clone(),
            scores: self.plot_scores.clone(),
            cat_params: self.plot_cat_params.clone(),
            cat_scores: self.plot_cat_scores.clone(),
            cat_thresh: self.plot_cat_thresh.clone(),
            ens_params: self.plot_ens_params.clone(),
            ens_scores: self.plot_ens_scores.clone(),
            ens_cat_params: self.plot_ens_cat_params.clone(),
            ens_cat_scores: self.plot_ens_cat_scores.clone(),
            ens_cat_thresh: self.plot_ens_cat_thresh.clone(),
            colors: self.colors.clone(),
        }
    }

    /// Overwrite config values with the flags given on the command line.
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.input_dir {
            config.paths.input_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.paths.output_dir = dir.clone();
        }
        if let Some(ranges) = &self.lt_ranges {
            config.run.lt_ranges = ranges
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(String::from)
                .collect();
        }
        if !self.plot_type.is_empty() {
            config.run.plot_types = self.plot_type.clone();
        }
        config.run.debug |= self.debug;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underscore_flags_parse() {
        let cli = Cli::try_parse_from([
            "verifplot",
            "C-1E_ch",
            "--plot_cat_params",
            "CLCT",
            "--plot_cat_thresh",
            "2.5,6.5",
            "--plot_cat_scores",
            "FBI,MF/OF",
            "--plot_type",
            "total",
        ])
        .unwrap();
        let request = cli.setup_request();
        assert_eq!(request.model_versions, "C-1E_ch");
        assert_eq!(request.cat_thresh.as_deref(), Some("2.5,6.5"));
        assert_eq!(cli.plot_type, vec![PlotType::Total]);
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "verifplot",
            "--lt_ranges",
            "07-12, 19-24",
            "--output_dir",
            "out",
            "--debug",
        ])
        .unwrap();
        assert_eq!(cli.model_versions, "C-1E-CTR_ch,C-1E_ch");

        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.run.lt_ranges, vec!["07-12", "19-24"]);
        assert_eq!(config.paths.output_dir, PathBuf::from("out"));
        assert_eq!(config.run.plot_types, PlotType::ALL.to_vec());
        assert!(config.run.debug);
    }
}
