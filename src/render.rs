use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::color::{resolve_rgb, ModelColors};
use crate::error::RenderError;
use crate::plan::FigureJob;

/// Consumer of planned figures.
pub trait Renderer {
    /// Draw one figure and return the file written.
    fn render(&mut self, job: &FigureJob, colors: &ModelColors) -> Result<PathBuf, RenderError>;
}

#[derive(Serialize)]
struct LegendEntry {
    model: String,
    color: String,
    /// `None` for renderer-specific colour codes.
    rgb: Option<[u8; 3]>,
}

#[derive(Serialize)]
struct Manifest<'a> {
    #[serde(flatten)]
    job: &'a FigureJob,
    legend: Vec<LegendEntry>,
}

/// Writes each figure as a pretty-printed JSON manifest.
#[derive(Debug, Clone)]
pub struct JsonManifestRenderer {
    output_dir: PathBuf,
    written: usize,
}

impl JsonManifestRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            written: 0,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Number of figures written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl Renderer for JsonManifestRenderer {
    fn render(&mut self, job: &FigureJob, colors: &ModelColors) -> Result<PathBuf, RenderError> {
        let path = self.output_dir.join(format!("{}.json", job.file_stem()));
        let legend = job
            .models
            .iter()
            .map(|model| {
                let color = colors.color_for(model).to_string();
                let rgb = resolve_rgb(&color).map(|c| [c.red, c.green, c.blue]);
                LegendEntry {
                    model: model.clone(),
                    color,
                    rgb,
                }
            })
            .collect();
        let manifest = Manifest { job, legend };

        let io_err = |source| RenderError::Io {
            path: path.clone(),
            source,
        };
        let file = File::create(&path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &manifest).map_err(|source| {
            RenderError::Encode {
                path: path.clone(),
                source,
            }
        })?;
        writer.flush().map_err(io_err)?;

        log::info!("saving: {}", path.display());
        self.written += 1;
        Ok(path)
    }
}
