use serde::Serialize;

use crate::color::ModelColors;

/// Scores drawn on the same sub-axes (one or two names).
pub type ScoreGroup = Vec<String>;

/// Score groups requested for one parameter, per score family.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParameterScores {
    pub regular_scores: Vec<ScoreGroup>,
    pub cat_scores: Vec<ScoreGroup>,
    pub regular_ens_scores: Vec<ScoreGroup>,
    pub ens_cat_scores: Vec<ScoreGroup>,
}

impl ParameterScores {
    /// Deterministic (non-ensemble) groups: regular first, then categorical.
    pub fn deterministic(&self) -> impl Iterator<Item = &ScoreGroup> {
        self.regular_scores.iter().chain(self.cat_scores.iter())
    }

    /// Ensemble groups: regular first, then categorical.
    pub fn ensemble(&self) -> impl Iterator<Item = &ScoreGroup> {
        self.regular_ens_scores
            .iter()
            .chain(self.ens_cat_scores.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.regular_scores.is_empty()
            && self.cat_scores.is_empty()
            && self.regular_ens_scores.is_empty()
            && self.ens_cat_scores.is_empty()
    }
}

/// Fully compiled plotting request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSetup {
    /// Each inner list is drawn together on one figure.
    pub model_version_groups: Vec<Vec<String>>,
    /// Parameters in first-mention order with their score groups.
    pub parameters: Vec<(String, ParameterScores)>,
    pub model_colors: ModelColors,
}

impl PlotSetup {
    pub fn parameter(&self, name: &str) -> Option<&ParameterScores> {
        self.parameters
            .iter()
            .find(|(p, _)| p == name)
            .map(|(_, s)| s)
    }

    /// Every requested model version, in input order, without duplicates.
    pub fn all_models(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for m in self.model_version_groups.iter().flatten() {
            if !out.contains(m) {
                out.push(m.clone());
            }
        }
        out
    }
}

/// Raw CLI strings, each optional.
///
/// Encoding: `,` separates entries, `/` joins scores drawn on the same axes,
/// `:` separates the per-parameter threshold lists.
#[derive(Debug, Clone, Default)]
pub struct SetupRequest {
    pub model_versions: String,
    pub params: Option<String>,
    pub scores: Option<String>,
    pub cat_params: Option<String>,
    pub cat_scores: Option<String>,
    pub cat_thresh: Option<String>,
    pub ens_params: Option<String>,
    pub ens_scores: Option<String>,
    pub ens_cat_params: Option<String>,
    pub ens_cat_scores: Option<String>,
    pub ens_cat_thresh: Option<String>,
    pub colors: Option<String>,
}
