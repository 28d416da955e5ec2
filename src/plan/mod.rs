//! Render planning: compiled setup + resolved files → figure jobs.
//!
//! ```text
//!  PlotSetup ──┐
//!              ├─▶ RenderPlanner ──▶ Vec<FigureJob> ──▶ Renderer
//!  data files ─┘        │
//!                       └─ ScoreMetadata (bounds, colormaps) + axis::resolve
//! ```

pub mod planner;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::transform::{self, Transform};
use crate::metadata::Aggregation;

pub use planner::{FigureJob, Panel, RenderPlanner, ScoreTrace, Series};

/// Kind of figure, one per family of data files.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PlotType {
    Station,
    Time,
    Daytime,
    Total,
    Ensemble,
}

impl PlotType {
    pub const ALL: [PlotType; 5] = [
        PlotType::Station,
        PlotType::Time,
        PlotType::Daytime,
        PlotType::Total,
        PlotType::Ensemble,
    ];

    /// Which metadata range table applies.
    pub fn aggregation(self) -> Aggregation {
        match self {
            PlotType::Station => Aggregation::Station,
            PlotType::Time => Aggregation::Time,
            PlotType::Daytime => Aggregation::Daytime,
            PlotType::Total | PlotType::Ensemble => Aggregation::Total,
        }
    }

    pub fn panels_per_page(self) -> usize {
        match self {
            PlotType::Station => 1,
            PlotType::Time | PlotType::Daytime => 2,
            PlotType::Total | PlotType::Ensemble => 4,
        }
    }

    pub fn transform(self) -> Transform {
        match self {
            PlotType::Station => transform::station_scores,
            PlotType::Time => transform::time_scores,
            PlotType::Daytime => transform::daytime_scores,
            PlotType::Total | PlotType::Ensemble => transform::total_scores,
        }
    }

    pub fn is_ensemble(self) -> bool {
        self == PlotType::Ensemble
    }

    pub fn name(self) -> &'static str {
        match self {
            PlotType::Station => "station",
            PlotType::Time => "time",
            PlotType::Daytime => "daytime",
            PlotType::Total => "total",
            PlotType::Ensemble => "ensemble",
        }
    }
}

impl fmt::Display for PlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlotType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlotType::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown plot type '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_per_plot_type() {
        assert_eq!(PlotType::Station.panels_per_page(), 1);
        assert_eq!(PlotType::Daytime.panels_per_page(), 2);
        assert_eq!(PlotType::Ensemble.panels_per_page(), 4);
        assert_eq!(PlotType::Ensemble.aggregation(), Aggregation::Total);
    }

    #[test]
    fn parses_names() {
        assert_eq!("Total".parse::<PlotType>(), Ok(PlotType::Total));
        assert!("map".parse::<PlotType>().is_err());
    }
}
