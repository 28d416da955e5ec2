//! Shared fixtures: model-version trees of ATAB files on disk.
#![allow(dead_code)] // not every test file uses every fixture

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const START: &str = "2021-11-01 00:00";
pub const END: &str = "2022-02-28 23:59";

/// Owned copies of `v`.
pub fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

/// Temporary input directory with one empty subdirectory per model.
pub fn model_tree(models: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for m in models {
        fs::create_dir_all(dir.path().join(m)).expect("create model dir");
    }
    dir
}

/// Write `content` to `<root>/<model>/<file_name>`.
pub fn write_atab(root: &Path, model: &str, file_name: &str, content: &str) -> PathBuf {
    let dir = root.join(model);
    fs::create_dir_all(&dir).expect("create model dir");
    let path = dir.join(file_name);
    fs::write(&path, content).expect("write ATAB file");
    path
}

fn header(model: &str, parameter: &str, start: &str, end: &str) -> String {
    format!(
        "ATAB\nModel version: {model}\nParameter: {parameter}\nStart time: {start}\nEnd time: {end}\nMissing value code: -999.0\n"
    )
}

/// Total-score file: one `Total` column, one row per score.
pub fn total_atab(model: &str, parameter: &str, scores: &[(&str, f64)]) -> String {
    total_atab_with_dates(model, parameter, START, END, scores)
}

pub fn total_atab_with_dates(
    model: &str,
    parameter: &str,
    start: &str,
    end: &str,
    scores: &[(&str, f64)],
) -> String {
    let mut out = header(model, parameter, start, end);
    out.push_str("Score Total\n");
    for (score, value) in scores {
        out.push_str(&format!("{score} {value}\n"));
    }
    out
}

/// Station-score file with stations ABO and BAS. The row-label column is
/// unnamed, so the column line reads `ScoreABO BAS`.
pub fn station_atab(model: &str, parameter: &str, scores: &[(&str, [f64; 2])]) -> String {
    let mut out = header(model, parameter, START, END);
    out.push_str("Longitude: 7.58 7.58\nLatitude: 46.49 47.54\nScoreABO BAS\n");
    for (score, [abo, bas]) in scores {
        out.push_str(&format!("{score} {abo} {bas}\n"));
    }
    out
}

/// Daytime-score file: rows are hours, columns are scores.
pub fn daytime_atab(model: &str, parameter: &str, scores: &[&str], rows: &[(u32, Vec<f64>)]) -> String {
    let mut out = header(model, parameter, START, END);
    out.push_str(&format!("hh {}\n", scores.join(" ")));
    for (hour, values) in rows {
        let cells: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        out.push_str(&format!("{hour:02} {}\n", cells.join(" ")));
    }
    out
}

/// Ensemble total-score file: plain scores, then `RANK[n]` rows in the given order.
pub fn ensemble_atab(model: &str, parameter: &str, scores: &[(&str, f64)], ranks: &[(u32, f64)]) -> String {
    let mut out = total_atab(model, parameter, scores);
    for (bin, value) in ranks {
        out.push_str(&format!("RANK[{bin}] {value}\n"));
    }
    out
}
