//! Score metadata: tabulated axis bounds and colormaps per (parameter, score).
//!
//! ```text
//! plot_synop_ch ──parse──▶ ParsedSynop ──▶ ScoreMetadata
//!                                            ├─ normalize_parameter
//!                                            ├─ range_for
//!                                            └─ colormap_for
//! ```
//!
//! Lookups never fail. Gaps fall back to a handful of score-specific
//! defaults and otherwise report `None`.

pub mod alias;
pub mod synop;

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::MetadataError;

pub use alias::{AliasStrategy, ParameterAliases, Resolution, WILDCARD};
pub use synop::ParsedSynop;

/// Colormap when no table has an entry.
pub const DEFAULT_COLORMAP: &str = "viridis";

/// FBI bounds for cloud-cover parameters when no entry is tabulated.
pub const FBI_CLCT_BOUNDS: ScoreBounds = ScoreBounds { min: 0.3, max: 3.0 };
/// FBI bounds for every other parameter.
pub const FBI_DEFAULT_BOUNDS: ScoreBounds = ScoreBounds { min: 0.1, max: 10.0 };

const BUNDLED: &str = include_str!("../../config/plot_synop_ch");

/// Temporal aggregation of a score file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Station,
    Time,
    Daytime,
    Total,
}

impl Aggregation {
    pub const ALL: [Aggregation; 4] = [
        Aggregation::Station,
        Aggregation::Time,
        Aggregation::Daytime,
        Aggregation::Total,
    ];
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Aggregation::Station => "station",
            Aggregation::Time => "time",
            Aggregation::Daytime => "daytime",
            Aggregation::Total => "total",
        };
        f.write_str(s)
    }
}

/// Tabulated axis bounds. `(0, 0)` means "autoscale".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBounds {
    pub min: f64,
    pub max: f64,
}

impl ScoreBounds {
    pub fn is_autoscale(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }
}

/// One categorical range row, labelled with the parameter's own score name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatScoreRange {
    pub score: String,
    pub bounds: ScoreBounds,
}

/// Colormap cell from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColormapCode {
    Known(&'static str),
    /// Code outside the translation table.
    Unknown(i64),
}

/// Read-only lookup tables, built once per process.
#[derive(Debug, Clone)]
pub struct ScoreMetadata {
    parsed: ParsedSynop,
    aliases: ParameterAliases,
}

impl std::str::FromStr for ScoreMetadata {
    type Err = MetadataError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let parsed = synop::parse(text)?;
        let mut canonical = parsed.params.clone();
        for p in &parsed.cat_params {
            if !canonical.contains(p) {
                canonical.push(p.clone());
            }
        }
        Ok(ScoreMetadata {
            parsed,
            aliases: ParameterAliases::new(canonical),
        })
    }
}

impl ScoreMetadata {
    /// Tables compiled into the binary.
    pub fn bundled() -> Result<Self, MetadataError> {
        BUNDLED.parse()
    }

    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let text = std::fs::read_to_string(path).map_err(|e| MetadataError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        log::info!("score metadata read from {}", path.display());
        text.parse()
    }

    pub fn parsed(&self) -> &ParsedSynop {
        &self.parsed
    }

    pub fn aliases(&self) -> &ParameterAliases {
        &self.aliases
    }

    /// Canonical table key for a data-file parameter name. Idempotent.
    pub fn normalize_parameter(&self, name: &str) -> String {
        self.aliases.normalize(name)
    }

    fn tabulated_range(&self, agg: Aggregation, param: &str, score: &str) -> Option<ScoreBounds> {
        if let Some(b) = self
            .parsed
            .ranges
            .get(&agg)
            .and_then(|t| t.get(param))
            .and_then(|s| s.get(score))
        {
            return Some(*b);
        }
        self.parsed
            .cat_ranges
            .get(&agg)
            .and_then(|t| t.get(param))
            .and_then(|rows| rows.iter().find(|r| r.score == score))
            .map(|r| r.bounds)
    }

    fn tabulated_colormap(&self, param: &str, score: &str) -> Option<ColormapCode> {
        if let Some(c) = self.parsed.colours.get(param).and_then(|s| s.get(score)) {
            return Some(*c);
        }
        self.parsed
            .cat_colours
            .get(param)
            .and_then(|rows| rows.iter().find(|(s, _)| s == score))
            .map(|(_, c)| *c)
    }

    /// Axis bounds for a score. Tries the regular table, then the
    /// parameter's categorical rows, then the substitutions
    /// `MOBS → MMOD` and `OF(t) → MF(t)`, then the FBI defaults.
    pub fn range_for(&self, agg: Aggregation, parameter: &str, score: &str) -> Option<ScoreBounds> {
        let param = self.normalize_parameter(parameter);
        if let Some(b) = self.tabulated_range(agg, &param, score) {
            return Some(b);
        }
        if let Some(alt) = substitute_score(score) {
            if let Some(b) = self.tabulated_range(agg, &param, &alt) {
                log::debug!("{param}/{score}: using {alt} range");
                return Some(b);
            }
        }
        if score.starts_with("FBI") {
            return Some(if param.starts_with("CLCT") {
                FBI_CLCT_BOUNDS
            } else {
                FBI_DEFAULT_BOUNDS
            });
        }
        None
    }

    /// Colormap for station maps. Unmapped codes give `None` with a warning;
    /// scores without any entry get [`DEFAULT_COLORMAP`].
    pub fn colormap_for(&self, parameter: &str, score: &str) -> Option<&'static str> {
        let param = self.normalize_parameter(parameter);
        let code = self.tabulated_colormap(&param, score).or_else(|| {
            substitute_score(score).and_then(|alt| self.tabulated_colormap(&param, &alt))
        });
        match code {
            Some(ColormapCode::Known(name)) => Some(name),
            Some(ColormapCode::Unknown(raw)) => {
                log::warn!("{param}/{score}: colormap code {raw} is not mapped");
                None
            }
            None => Some(DEFAULT_COLORMAP),
        }
    }
}

/// Score whose table entry stands in for `score`, if any.
fn substitute_score(score: &str) -> Option<String> {
    if score == "MOBS" {
        return Some("MMOD".to_string());
    }
    score.strip_prefix("OF(").map(|rest| format!("MF({rest}"))
}
