//! Plot setup compilation against an input directory.

mod fixtures;
use fixtures::*;

use verifplot::error::SetupError;
use verifplot::setup::{compile, SetupRequest};

fn request(models: &str) -> SetupRequest {
    SetupRequest {
        model_versions: models.to_string(),
        ..Default::default()
    }
}

#[test]
fn categorical_scores_expand_per_threshold() {
    let tree = model_tree(&["C-1E_ch"]);
    let setup = compile(
        &SetupRequest {
            cat_params: Some("CLCT".into()),
            cat_scores: Some("FBI,MF/OF".into()),
            cat_thresh: Some("2.5,6.5".into()),
            ..request("C-1E_ch")
        },
        tree.path(),
    )
    .unwrap();

    let clct = setup.parameter("CLCT").unwrap();
    assert_eq!(
        clct.cat_scores,
        vec![
            names(&["FBI(2.5)"]),
            names(&["MF(2.5)", "OF(2.5)"]),
            names(&["FBI(6.5)"]),
            names(&["MF(6.5)", "OF(6.5)"]),
        ]
    );
    assert!(clct.regular_scores.is_empty());
}

#[test]
fn regular_and_categorical_merge_per_parameter() {
    let tree = model_tree(&["C-1E_ch", "C-1E-CTR_ch"]);
    let setup = compile(
        &SetupRequest {
            params: Some("T_2M,CLCT".into()),
            scores: Some("ME,MMOD/MOBS".into()),
            cat_params: Some("CLCT".into()),
            cat_scores: Some("ETS".into()),
            cat_thresh: Some("2.5".into()),
            ..request("C-1E_ch/C-1E-CTR_ch")
        },
        tree.path(),
    )
    .unwrap();

    let order: Vec<&str> = setup.parameters.iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(order, ["T_2M", "CLCT"]);
    let clct = setup.parameter("CLCT").unwrap();
    assert_eq!(clct.regular_scores.len(), 2);
    assert_eq!(clct.cat_scores, vec![names(&["ETS(2.5)"])]);
    assert_eq!(setup.model_version_groups, vec![names(&["C-1E_ch", "C-1E-CTR_ch"])]);
    assert_eq!(setup.model_colors.color_for("C-1E-CTR_ch"), "red");
}

#[test]
fn every_missing_model_is_reported() {
    let tree = model_tree(&["C-1E_ch"]);
    let err = compile(
        &SetupRequest {
            params: Some("T_2M".into()),
            scores: Some("ME".into()),
            ..request("C-1E_ch,X1/X2")
        },
        tree.path(),
    )
    .unwrap_err();
    match err {
        SetupError::MissingModelDirs { missing, .. } => assert_eq!(missing, names(&["X1", "X2"])),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn colour_list_must_cover_models() {
    let tree = model_tree(&["a", "b", "c"]);
    let err = compile(
        &SetupRequest {
            params: Some("T_2M".into()),
            scores: Some("ME".into()),
            colors: Some("orange,black".into()),
            ..request("a,b/c")
        },
        tree.path(),
    )
    .unwrap_err();
    assert!(matches!(err, SetupError::TooFewColors { colors: 2, models: 3 }));
}

#[test]
fn nothing_to_plot_is_an_error() {
    let tree = model_tree(&["a"]);
    let err = compile(
        &SetupRequest {
            params: Some("T_2M".into()),
            ..request("a")
        },
        tree.path(),
    )
    .unwrap_err();
    assert!(matches!(err, SetupError::EmptySetup));
}

#[test]
fn ensemble_rejects_excluded_parameters() {
    let tree = model_tree(&["a"]);
    let err = compile(
        &SetupRequest {
            ens_params: Some("T_2M,DD_10M".into()),
            ens_scores: Some("RPS".into()),
            ..request("a")
        },
        tree.path(),
    )
    .unwrap_err();
    assert!(matches!(err, SetupError::DisallowedEnsembleParams(p) if p == names(&["DD_10M"])));
}

#[test]
fn missing_input_dir_is_reported() {
    let tree = model_tree(&[]);
    let err = compile(&request("a"), &tree.path().join("absent")).unwrap_err();
    assert!(matches!(err, SetupError::InputDir { .. }));
}
