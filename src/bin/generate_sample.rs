//! Writes a small model-version tree of ATAB score files for manual runs.
//!
//! ```text
//! sample_data/
//!   C-1E_ch/
//!     station_scores19-24_T_2M.dat
//!     time_scores19-24_T_2M.dat
//!     daytime_scores19-24_T_2M.dat
//!     total_scores19-24_T_2M.dat
//!     ...
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use clap::Parser;

const MISSING: f64 = -999.0;
const START: &str = "2021-11-01 00:00";
const END: &str = "2022-02-28 23:59";
const SCORES: [&str; 8] = ["ME", "MMOD", "MOBS", "MAE", "STDE", "RMSE", "COR", "NOBS"];
/// Bins of the rank histogram in total-score files.
const RANKS: usize = 11;
const CAT_SCORES: [&str; 6] = ["FBI", "MF", "OF", "POD", "FAR", "ETS"];
const STATIONS: [(&str, f64, f64); 5] = [
    ("ABO", 7.58, 46.49),
    ("BAS", 7.58, 47.54),
    ("GVE", 6.12, 46.25),
    ("LUG", 8.96, 46.00),
    ("SMA", 8.56, 47.38),
];

/// Parameter, thresholds for categorical scores, typical magnitude.
const PARAMS: [(&str, &[&str], f64); 3] = [
    ("T_2M", &["0", "15"], 5.0),
    ("CLCT", &["2.5", "6.5"], 4.0),
    ("TOT_PREC12", &["0.1", "1"], 1.5),
];

#[derive(Parser, Debug)]
#[command(about = "Write sample ATAB score files")]
struct Args {
    /// Root of the generated tree
    #[arg(long, default_value = "sample_data")]
    output: PathBuf,

    /// Model versions, comma separated
    #[arg(long, default_value = "C-1E_ch,C-1E-CTR_ch")]
    models: String,

    /// Lead-time ranges, comma separated
    #[arg(long, default_value = "07-12,19-24")]
    lt_ranges: String,

    /// Seed of the value generator
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// A plausible value of `score`; roughly one cell in thirty is missing.
    fn score(&mut self, score: &str, scale: f64) -> f64 {
        if self.next_f64() < 0.03 {
            return MISSING;
        }
        match score {
            "ME" => self.gauss(0.0, 0.3 * scale),
            "MMOD" | "MOBS" => self.gauss(scale, 0.5 * scale),
            "MAE" | "STDE" | "RMSE" => self.gauss(scale * 0.4, 0.1 * scale).abs(),
            "COR" | "POD" | "FAR" | "ETS" => self.next_f64(),
            "NOBS" => (self.next_f64() * 120.0).round(),
            "FBI" | "MF" | "OF" => self.gauss(1.0, 0.3).abs(),
            _ => self.gauss(0.0, 1.0),
        }
    }
}

fn header(model: &str, parameter: &str, lt_range: &str) -> String {
    format!(
        "ATAB\nModel version: {model}\nParameter: {parameter}\nLead time range: {lt_range}\n\
         Start time: {START}\nEnd time: {END}\nMissing value code: {MISSING:.1}\n"
    )
}

fn score_names(thresholds: &[&str]) -> Vec<String> {
    let mut names: Vec<String> = SCORES.iter().map(|s| s.to_string()).collect();
    for t in thresholds {
        names.extend(CAT_SCORES.iter().map(|s| format!("{s}({t})")));
    }
    names
}

fn base_name(score: &str) -> &str {
    score.split('(').next().unwrap_or(score)
}

/// ` v1 v2 ...` for `n` draws of `score`.
fn draws(rng: &mut SimpleRng, score: &str, scale: f64, n: usize) -> String {
    (0..n)
        .map(|_| format!(" {:.3}", rng.score(base_name(score), scale)))
        .collect()
}

/// Station files leave the row-label column unnamed: the column line starts
/// with `Score` glued to the first station.
fn station_file(rng: &mut SimpleRng, head: String, scores: &[String], scale: f64) -> String {
    let mut out = head;
    let lon: Vec<String> = STATIONS.iter().map(|s| format!("{:.2}", s.1)).collect();
    let lat: Vec<String> = STATIONS.iter().map(|s| format!("{:.2}", s.2)).collect();
    let names: Vec<&str> = STATIONS.iter().map(|s| s.0).collect();
    out.push_str(&format!("Longitude: {}\n", lon.join(" ")));
    out.push_str(&format!("Latitude: {}\n", lat.join(" ")));
    out.push_str(&format!("Score{}\n", names.join(" ")));
    for score in scores {
        out.push_str(&format!("{score}{}\n", draws(rng, score, scale, STATIONS.len())));
    }
    out
}

fn time_file(
    rng: &mut SimpleRng,
    head: String,
    scores: &[String],
    scale: f64,
    start: NaiveDateTime,
) -> String {
    let mut out = head;
    out.push_str(&format!("YYYY MM DD hh mm lt_hh lt_mm {}\n", scores.join(" ")));
    for day in 0..14 {
        let t = start + Duration::days(day);
        out.push_str(&t.format("%Y %m %d %H %M 24 00").to_string());
        for score in scores {
            out.push_str(&draws(rng, score, scale, 1));
        }
        out.push('\n');
    }
    out
}

fn daytime_file(rng: &mut SimpleRng, head: String, scores: &[String], scale: f64) -> String {
    let mut out = head;
    out.push_str(&format!("hh {}\n", scores.join(" ")));
    for hour in (0..24).step_by(3) {
        out.push_str(&format!("{hour:02}"));
        for score in scores {
            out.push_str(&draws(rng, score, scale, 1));
        }
        out.push('\n');
    }
    out
}

/// Total scores plus a rank histogram as `RANK[n]` rows.
fn total_file(rng: &mut SimpleRng, head: String, scores: &[String], scale: f64) -> String {
    let mut out = head;
    out.push_str("Score Total\n");
    for score in scores {
        out.push_str(&format!("{score}{}\n", draws(rng, score, scale, 1)));
    }
    for rank in 1..=RANKS {
        out.push_str(&format!("RANK[{rank}] {:.3}\n", rng.next_f64() / RANKS as f64));
    }
    out
}

fn write_file(dir: &Path, name: &str, content: &str) -> Result<()> {
    let path = dir.join(name);
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let start = NaiveDateTime::parse_from_str(START, "%Y-%m-%d %H:%M")
        .context("Failed to parse sample start time")?;

    let split = |s: &str| -> Vec<String> {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    };
    let models = split(&args.models);
    let lt_ranges = split(&args.lt_ranges);

    let mut written = 0;
    for model in &models {
        let dir = args.output.join(model);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        for lt_range in &lt_ranges {
            for (parameter, thresholds, scale) in PARAMS {
                let scores = score_names(thresholds);
                let head = || header(model, parameter, lt_range);
                let suffix = format!("{lt_range}_{parameter}.dat");
                let files = [
                    ("station_scores", station_file(&mut rng, head(), &scores, scale)),
                    ("time_scores", time_file(&mut rng, head(), &scores, scale, start)),
                    ("daytime_scores", daytime_file(&mut rng, head(), &scores, scale)),
                    ("total_scores", total_file(&mut rng, head(), &scores, scale)),
                ];
                for (prefix, content) in files {
                    write_file(&dir, &format!("{prefix}{suffix}"), &content)?;
                    written += 1;
                }
            }
        }
    }

    log::info!("Wrote {written} files for {} model(s) to {}", models.len(), args.output.display());
    Ok(())
}
