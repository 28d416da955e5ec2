use std::collections::BTreeSet;
use std::path::Path;

use crate::color::ModelColors;
use crate::error::SetupError;

use super::model::{ParameterScores, PlotSetup, ScoreGroup, SetupRequest};

/// Parameters without ensemble verification.
pub const ENSEMBLE_EXCLUDED_PARAMS: [&str; 4] = ["DD_10M", "DD_10M_KAL", "DURSUN1", "DURSUN12"];

/// Ensemble score always drawn on its own axes.
pub const RANK: &str = "RANK";

/// Ensemble categorical score always drawn on its own axes.
pub const REL_DIA: &str = "REL_DIA";

type ScoreDict = Vec<(String, Vec<ScoreGroup>)>;

/// Non-empty, trimmed tokens of `s` split on `sep`.
fn tokens(s: &str, sep: char) -> Vec<String> {
    s.split(sep)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn present(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Model-version groups: `,` separates figures, `/` joins models on one figure.
pub fn model_version_groups(model_versions: &str) -> Vec<Vec<String>> {
    tokens(model_versions, ',')
        .iter()
        .map(|g| tokens(g, '/'))
        .filter(|g| !g.is_empty())
        .collect()
}

/// Fail with every requested model that is not a subdirectory of `input_dir`.
pub fn check_model_dirs(models: &[String], input_dir: &Path) -> Result<(), SetupError> {
    let entries = std::fs::read_dir(input_dir).map_err(|source| SetupError::InputDir {
        dir: input_dir.to_path_buf(),
        source,
    })?;
    let dirs: BTreeSet<String> = entries
        .filter_map(Result::ok)
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();

    let mut missing: Vec<String> = Vec::new();
    for m in models {
        if !dirs.contains(m) && !missing.contains(m) {
            missing.push(m.clone());
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SetupError::MissingModelDirs {
            missing,
            dir: input_dir.to_path_buf(),
        })
    }
}

/// Split a `/`-joined score entry, appending `suffix` to every member.
fn score_group(entry: &str, suffix: &str) -> Vec<String> {
    entry
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("{s}{suffix}"))
        .collect()
}

/// Turn one score entry into groups. `standalone` (if any) is moved into its
/// own singleton group after the remaining scores.
fn expand_entry(
    entry: &str,
    suffix: &str,
    standalone: Option<&str>,
) -> Result<Vec<ScoreGroup>, SetupError> {
    let mut members = score_group(entry, suffix);
    let mut groups = Vec::new();
    let mut alone = None;
    if let Some(name) = standalone {
        let target = format!("{name}{suffix}");
        if members.len() > 1 {
            if let Some(pos) = members.iter().position(|m| *m == target) {
                alone = Some(members.remove(pos));
            }
        }
    }
    if members.len() > 2 {
        return Err(SetupError::OversizedGroup(entry.to_string()));
    }
    if !members.is_empty() {
        groups.push(members);
    }
    if let Some(s) = alone {
        groups.push(vec![s]);
    }
    Ok(groups)
}

/// `params × scores`, parameters outer.
fn regular_dict(
    params: &str,
    scores: &str,
    standalone: Option<&str>,
) -> Result<ScoreDict, SetupError> {
    let scores = tokens(scores, ',');
    tokens(params, ',')
        .into_iter()
        .map(|param| {
            let mut groups = Vec::new();
            for score in &scores {
                groups.extend(expand_entry(score, "", standalone)?);
            }
            Ok((param, groups))
        })
        .collect()
}

/// Per parameter, per threshold, per score; every member gets `(threshold)`.
/// Parameters beyond the last threshold list keep an empty group list.
fn categorical_dict(
    params: &str,
    scores: &str,
    thresholds: &str,
    standalone: Option<&str>,
) -> Result<ScoreDict, SetupError> {
    let scores = tokens(scores, ',');
    let threshold_lists: Vec<&str> = thresholds.split(':').collect();
    tokens(params, ',')
        .into_iter()
        .enumerate()
        .map(|(i, param)| {
            let mut groups = Vec::new();
            let thresholds = threshold_lists.get(i).map(|t| tokens(t, ',')).unwrap_or_default();
            for threshold in &thresholds {
                let suffix = format!("({threshold})");
                for score in &scores {
                    groups.extend(expand_entry(score, &suffix, standalone)?);
                }
            }
            Ok((param, groups))
        })
        .collect()
}

fn reject_excluded(dict: &ScoreDict) -> Result<(), SetupError> {
    let bad: Vec<String> = dict
        .iter()
        .map(|(p, _)| p)
        .filter(|p| ENSEMBLE_EXCLUDED_PARAMS.contains(&p.as_str()))
        .cloned()
        .collect();
    if bad.is_empty() {
        Ok(())
    } else {
        Err(SetupError::DisallowedEnsembleParams(bad))
    }
}

fn lookup(dict: &ScoreDict, param: &str) -> Vec<ScoreGroup> {
    dict.iter()
        .find(|(p, _)| p == param)
        .map(|(_, g)| g.clone())
        .unwrap_or_default()
}

/// Compile the raw CLI strings into a [`PlotSetup`].
///
/// All-or-nothing: any configuration error aborts before a single data file
/// is read.
pub fn compile(request: &SetupRequest, input_dir: &Path) -> Result<PlotSetup, SetupError> {
    log::info!("parsing user inputs");

    let groups = model_version_groups(&request.model_versions);
    let all_models: Vec<String> = groups.iter().flatten().cloned().collect();
    check_model_dirs(&all_models, input_dir)?;

    let model_colors = match present(&request.colors) {
        Some(colors) => ModelColors::with_override(&all_models, &tokens(colors, ','))?,
        None => ModelColors::with_defaults(&all_models),
    };

    let regular = match (present(&request.params), present(&request.scores)) {
        (Some(p), Some(s)) => regular_dict(p, s, None)?,
        _ => Vec::new(),
    };
    let categorical = match (
        present(&request.cat_params),
        present(&request.cat_scores),
        present(&request.cat_thresh),
    ) {
        (Some(p), Some(s), Some(t)) => categorical_dict(p, s, t, None)?,
        _ => Vec::new(),
    };
    let ensemble = match (present(&request.ens_params), present(&request.ens_scores)) {
        (Some(p), Some(s)) => regular_dict(p, s, Some(RANK))?,
        _ => Vec::new(),
    };
    let ensemble_cat = match (
        present(&request.ens_cat_params),
        present(&request.ens_cat_scores),
        present(&request.ens_cat_thresh),
    ) {
        (Some(p), Some(s), Some(t)) => categorical_dict(p, s, t, Some(REL_DIA))?,
        _ => Vec::new(),
    };
    reject_excluded(&ensemble)?;
    reject_excluded(&ensemble_cat)?;

    let mut names: Vec<String> = Vec::new();
    for (param, _) in regular
        .iter()
        .chain(&categorical)
        .chain(&ensemble)
        .chain(&ensemble_cat)
    {
        if !names.contains(param) {
            names.push(param.clone());
        }
    }
    let parameters: Vec<(String, ParameterScores)> = names
        .into_iter()
        .map(|param| {
            let scores = ParameterScores {
                regular_scores: lookup(&regular, &param),
                cat_scores: lookup(&categorical, &param),
                regular_ens_scores: lookup(&ensemble, &param),
                ens_cat_scores: lookup(&ensemble_cat, &param),
            };
            (param, scores)
        })
        .collect();

    if parameters.is_empty() {
        return Err(SetupError::EmptySetup);
    }

    for (param, scores) in &parameters {
        log::debug!("{param}: {scores:?}");
    }

    Ok(PlotSetup {
        model_version_groups: groups,
        parameters,
        model_colors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(v: &[&[&str]]) -> Vec<ScoreGroup> {
        v.iter()
            .map(|g| g.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn regular_scores_pair_on_slash() {
        let dict = regular_dict("CLCT,T_2M", "ME,MMOD/MOBS", None).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict[1].0, "T_2M");
        assert_eq!(dict[1].1, groups(&[&["ME"], &["MMOD", "MOBS"]]));
    }

    #[test]
    fn categorical_order_is_threshold_then_score() {
        let dict = categorical_dict("CLCT", "FBI,MF/OF", "2.5,6.5", None).unwrap();
        assert_eq!(
            dict[0].1,
            groups(&[
                &["FBI(2.5)"],
                &["MF(2.5)", "OF(2.5)"],
                &["FBI(6.5)"],
                &["MF(6.5)", "OF(6.5)"],
            ])
        );
    }

    #[test]
    fn categorical_thresholds_zip_with_params() {
        let dict = categorical_dict("TOT_PREC12,CLCT,T_2M", "ETS", "0.1,1:2.5", None).unwrap();
        assert_eq!(dict[0].1, groups(&[&["ETS(0.1)"], &["ETS(1)"]]));
        assert_eq!(dict[1].1, groups(&[&["ETS(2.5)"]]));
        assert!(dict[2].1.is_empty());
    }

    #[test]
    fn rank_is_pulled_out() {
        let dict = regular_dict("T_2M", "OUTLIERS/RANK,RPS", Some(RANK)).unwrap();
        assert_eq!(dict[0].1, groups(&[&["OUTLIERS"], &["RANK"], &["RPS"]]));
    }

    #[test]
    fn rel_dia_is_pulled_out_with_threshold() {
        let dict = categorical_dict("CLCT", "BSSD/REL_DIA", "2.5", Some(REL_DIA)).unwrap();
        assert_eq!(dict[0].1, groups(&[&["BSSD(2.5)"], &["REL_DIA(2.5)"]]));
    }

    #[test]
    fn three_way_group_is_rejected() {
        let err = regular_dict("T_2M", "ME/MAE/RMSE", None).unwrap_err();
        assert!(matches!(err, SetupError::OversizedGroup(_)));
        // RANK leaves, two remain
        assert!(regular_dict("T_2M", "OUTLIERS/RPS/RANK", Some(RANK)).is_ok());
    }

    #[test]
    fn model_groups_keep_order() {
        assert_eq!(
            model_version_groups("C-1E_ch/C-1E-CTR_ch,C-2E_alps"),
            vec![
                vec!["C-1E_ch".to_string(), "C-1E-CTR_ch".to_string()],
                vec!["C-2E_alps".to_string()],
            ]
        );
    }
}
