use std::fs;

use anyhow::{Context, Result};
use clap::Parser;

use verifplot::cli::Cli;
use verifplot::config::Config;
use verifplot::data::loader::AtabLoader;
use verifplot::metadata::ScoreMetadata;
use verifplot::plan::RenderPlanner;
use verifplot::render::{JsonManifestRenderer, Renderer};
use verifplot::setup;

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)?;
    cli.apply(&mut config);
    init_logging(config.run.debug);

    let output_dir = &config.paths.output_dir;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let metadata = match &config.paths.score_metadata {
        Some(path) => ScoreMetadata::load(path)?,
        None => ScoreMetadata::bundled()?,
    };

    let plot_setup = setup::compile(&cli.setup_request(), &config.paths.input_dir)?;

    let loader = AtabLoader::default();
    let planner = RenderPlanner::new(
        &metadata,
        &loader,
        &config.paths.input_dir,
        config.files.clone(),
        config.run.lt_ranges.clone(),
    );
    let mut renderer = JsonManifestRenderer::new(output_dir);

    for &plot_type in &config.run.plot_types {
        let jobs = planner
            .plan(&plot_setup, plot_type)
            .with_context(|| format!("Failed to resolve {plot_type} score files"))?;
        for job in &jobs {
            renderer.render(job, &plot_setup.model_colors)?;
        }
    }

    log::info!("--- Done. {} figure(s) in {}", renderer.written(), output_dir.display());
    Ok(())
}
