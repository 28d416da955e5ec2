//! Render planning over real files, and the binary end to end.

mod fixtures;
use fixtures::*;

use std::process::Command;

use verifplot::axis::AxisScaling;
use verifplot::config::FileNaming;
use verifplot::data::loader::AtabLoader;
use verifplot::metadata::ScoreMetadata;
use verifplot::plan::{PlotType, RenderPlanner};
use verifplot::setup::{compile, SetupRequest};

fn verifplot_bin() -> &'static str {
    env!("CARGO_BIN_EXE_verifplot")
}

#[test]
fn total_scores_paginate_and_resolve_axes() {
    let tree = model_tree(&["C-1E_ch"]);
    write_atab(
        tree.path(),
        "C-1E_ch",
        "total_scores19-24_T_2M_KAL.dat",
        &total_atab(
            "C-1E_ch",
            "T_2M_KAL",
            &[("ME", 0.5), ("MAE", 1.2), ("RMSE", 1.6), ("COR", 0.9), ("NOBS", 97.0)],
        ),
    );

    let setup = compile(
        &SetupRequest {
            model_versions: "C-1E_ch".into(),
            params: Some("T_2M_KAL".into()),
            scores: Some("ME,MAE/RMSE,COR,NOBS,ETS".into()),
            ..Default::default()
        },
        tree.path(),
    )
    .unwrap();

    let metadata = ScoreMetadata::bundled().unwrap();
    let loader = AtabLoader::default();
    let planner = RenderPlanner::new(
        &metadata,
        &loader,
        tree.path(),
        FileNaming::default(),
        names(&["19-24"]),
    );
    let jobs = planner.plan(&setup, PlotType::Total).unwrap();

    // ETS is absent from the file: four panels remain, one page.
    assert_eq!(jobs.len(), 1);
    let panels = &jobs[0].panels;
    assert_eq!(panels.len(), 4);
    assert_eq!(panels[1].group, names(&["MAE", "RMSE"]));
    assert_eq!(panels[1].traces.len(), 2);

    let me = &panels[0].traces[0];
    assert_eq!(me.series[0].values, vec![0.5]);
    assert_eq!(me.series[0].color, "black");
    assert_eq!(me.colormap, Some("bwr"));
    assert_eq!(
        me.scaling,
        AxisScaling::Clamp {
            lower: -2.4,
            upper: 2.4
        }
    );

    let nobs = &panels[3].traces[0];
    let bounds = nobs.bounds.unwrap();
    assert_eq!((bounds.min, bounds.max), (0.0, 97.0));
}

#[test]
fn missing_range_yields_no_jobs() {
    let tree = model_tree(&["C-1E_ch"]);
    write_atab(
        tree.path(),
        "C-1E_ch",
        "total_scores19-24_CLCT.dat",
        &total_atab("C-1E_ch", "CLCT", &[("ME", 1.0)]),
    );
    let setup = compile(
        &SetupRequest {
            model_versions: "C-1E_ch".into(),
            params: Some("CLCT".into()),
            scores: Some("ME".into()),
            ..Default::default()
        },
        tree.path(),
    )
    .unwrap();

    let metadata = ScoreMetadata::bundled().unwrap();
    let loader = AtabLoader::default();
    let planner = RenderPlanner::new(&metadata, &loader, tree.path(), FileNaming::default(), names(&["07-12"]));
    assert!(planner.plan(&setup, PlotType::Total).unwrap().is_empty());
}

#[test]
fn daytime_outlier_keeps_ceiling() {
    let tree = model_tree(&["a", "b"]);
    let scores = ["ME"];
    write_atab(
        tree.path(),
        "a",
        "daytime_scores19-24_T_2M.dat",
        &daytime_atab("a", "T_2M", &scores, &[(0, vec![0.5]), (12, vec![-9.0])]),
    );
    write_atab(
        tree.path(),
        "b",
        "daytime_scores19-24_T_2M.dat",
        &daytime_atab("b", "T_2M", &scores, &[(0, vec![1.0]), (12, vec![0.2])]),
    );
    let setup = compile(
        &SetupRequest {
            model_versions: "a/b".into(),
            params: Some("T_2M".into()),
            scores: Some("ME".into()),
            ..Default::default()
        },
        tree.path(),
    )
    .unwrap();

    let metadata = ScoreMetadata::bundled().unwrap();
    let loader = AtabLoader::default();
    let planner = RenderPlanner::new(&metadata, &loader, tree.path(), FileNaming::default(), names(&["19-24"]));
    let jobs = planner.plan(&setup, PlotType::Daytime).unwrap();

    let trace = &jobs[0].panels[0].traces[0];
    assert_eq!(trace.series.len(), 2);
    assert_eq!(trace.series[0].labels, names(&["0", "12"]));
    let upper = metadata
        .range_for(PlotType::Daytime.aggregation(), "T_2M", "ME")
        .unwrap()
        .max;
    assert_eq!(trace.scaling, AxisScaling::KeepUpper { upper });
}

#[test]
fn ensemble_rank_histogram_in_bin_order() {
    let tree = model_tree(&["a"]);
    write_atab(
        tree.path(),
        "a",
        "total_scores19-24_T_2M.dat",
        &ensemble_atab("a", "T_2M", &[("RPS", 0.4)], &[(3, 0.3), (1, 0.2), (2, 0.5)]),
    );
    let setup = compile(
        &SetupRequest {
            model_versions: "a".into(),
            ens_params: Some("T_2M".into()),
            ens_scores: Some("RPS,RANK".into()),
            ..Default::default()
        },
        tree.path(),
    )
    .unwrap();

    let metadata = ScoreMetadata::bundled().unwrap();
    let loader = AtabLoader::default();
    let planner = RenderPlanner::new(&metadata, &loader, tree.path(), FileNaming::default(), names(&["19-24"]));
    let jobs = planner.plan(&setup, PlotType::Ensemble).unwrap();

    assert_eq!(jobs.len(), 1);
    let panels = &jobs[0].panels;
    assert_eq!(panels.len(), 2);
    assert_eq!(panels[1].group, names(&["RANK"]));
    let ranks = &panels[1].traces[0].series[0];
    assert_eq!(ranks.labels, names(&["RANK[1]", "RANK[2]", "RANK[3]"]));
    assert_eq!(ranks.values, vec![0.2, 0.5, 0.3]);
    assert_eq!(panels[0].traces[0].series[0].values, vec![0.4]);
}

#[test]
fn binary_writes_manifests() {
    let tree = model_tree(&["C-1E_ch"]);
    write_atab(
        tree.path(),
        "C-1E_ch",
        "station_scores19-24_CLCT.dat",
        &station_atab("C-1E_ch", "CLCT", &[("ME", [5.0, -3.0])]),
    );
    let out = tree.path().join("plots");

    let output = Command::new(verifplot_bin())
        .args(["C-1E_ch", "--plot_params", "CLCT", "--plot_scores", "ME"])
        .args(["--plot_type", "station", "--lt_ranges", "19-24"])
        .arg("--input_dir")
        .arg(tree.path())
        .arg("--output_dir")
        .arg(&out)
        .arg("--config")
        .arg(tree.path().join("none.toml"))
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let manifest = out.join("station_C-1E_ch_CLCT.json");
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(manifest).unwrap()).unwrap();
    assert_eq!(value["panels"][0]["traces"][0]["colormap"], "bwr");
    assert_eq!(value["panels"][0]["traces"][0]["series"][0]["labels"][1], "BAS");
}

#[test]
fn binary_fails_on_missing_model() {
    let tree = model_tree(&["C-1E_ch"]);
    let output = Command::new(verifplot_bin())
        .args(["C-1E_ch,X9", "--plot_params", "CLCT", "--plot_scores", "ME"])
        .arg("--input_dir")
        .arg(tree.path())
        .arg("--output_dir")
        .arg(tree.path().join("plots"))
        .arg("--config")
        .arg(tree.path().join("none.toml"))
        .output()
        .expect("Failed to execute command");

    assert_ne!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("X9"));
}
