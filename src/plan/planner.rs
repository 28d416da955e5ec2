use std::path::PathBuf;

use serde::Serialize;

use crate::axis::{self, AxisScaling};
use crate::color::{line_style, ModelColors};
use crate::config::FileNaming;
use crate::data::filename::range_start;
use crate::data::loader::{TableLoader, HEADER_COLUMNS};
use crate::data::model::{CellValue, Header, Table};
use crate::data::resolver::{load_relevant_files, FileQuery, IndexOrder, ModelDataIndex};
use crate::error::ResolveError;
use crate::metadata::{ScoreBounds, ScoreMetadata};
use crate::setup::compiler::RANK;
use crate::setup::{PlotSetup, ScoreGroup};

use super::PlotType;

/// Score whose axis always runs from zero to the largest count.
const COUNT_SCORE: &str = "NOBS";

// ---------------------------------------------------------------------------
// Figure jobs
// ---------------------------------------------------------------------------

/// Values of one score from one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub model: String,
    pub lt_range: String,
    pub color: String,
    pub line_style: &'static str,
    pub marker: &'static str,
    /// Station names, timestamps, hours or lead times, depending on the file.
    pub labels: Vec<String>,
    /// Missing cells stay in place as NaN.
    pub values: Vec<f64>,
}

/// One score on a panel, with its resolved axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTrace {
    pub score: String,
    pub bounds: Option<ScoreBounds>,
    pub colormap: Option<&'static str>,
    pub scaling: AxisScaling,
    pub series: Vec<Series>,
}

/// One sub-plot: a score group sharing one set of axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub group: ScoreGroup,
    pub traces: Vec<ScoreTrace>,
}

/// One output figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureJob {
    pub plot_type: PlotType,
    pub models: Vec<String>,
    pub parameter: String,
    /// 1-based.
    pub page: usize,
    pub pages: usize,
    pub panels: Vec<Panel>,
}

impl FigureJob {
    /// Output file name without extension.
    pub fn file_stem(&self) -> String {
        let mut stem = format!("{}_{}_{}", self.plot_type, self.models.join("_"), self.parameter);
        if self.pages > 1 {
            stem.push_str(&format!("_{}", self.page));
        }
        stem.chars()
            .map(|c| if c.is_ascii_alphanumeric() || "-_.".contains(c) { c } else { '_' })
            .collect()
    }
}

/// Split panels into pages, keeping their order.
pub fn paginate(
    plot_type: PlotType,
    models: &[String],
    parameter: &str,
    panels: Vec<Panel>,
) -> Vec<FigureJob> {
    let per_page = plot_type.panels_per_page().max(1);
    let pages = panels.len().div_ceil(per_page);
    let mut panels = panels.into_iter();
    (1..=pages)
        .map(|page| FigureJob {
            plot_type,
            models: models.to_vec(),
            parameter: parameter.to_string(),
            page,
            pages,
            panels: panels.by_ref().take(per_page).collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Score extraction
// ---------------------------------------------------------------------------

fn as_value(c: &CellValue) -> f64 {
    c.as_f64().unwrap_or(f64::NAN)
}

/// Positions of the data columns: neither the index nor a header-derived one.
fn value_columns(table: &Table) -> Vec<usize> {
    let index = table.index_name();
    table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, name)| Some(name.as_str()) != index)
        .filter(|(_, name)| !HEADER_COLUMNS.iter().any(|(column, _)| *column == name.as_str()))
        .map(|(i, _)| i)
        .collect()
}

/// Bin number of a `RANK[n]` label. Rank histograms are stored one bin per row.
fn rank_number(label: &str) -> Option<u32> {
    label
        .strip_prefix(RANK)?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse()
        .ok()
}

/// All `RANK[n]` rows in bin order, valued from the first data column.
fn rank_series(table: &Table) -> Option<(Vec<String>, Vec<f64>)> {
    let column = *value_columns(table).first()?;
    let mut bins: Vec<(u32, String, f64)> = table
        .index_labels()
        .into_iter()
        .zip(table.rows())
        .filter_map(|(label, row)| Some((rank_number(&label)?, label, as_value(&row[column]))))
        .collect();
    if bins.is_empty() {
        return None;
    }
    bins.sort_by_key(|(n, _, _)| *n);
    Some(bins.into_iter().map(|(_, label, value)| (label, value)).unzip())
}

/// Labels and values of a score, as a column or as an index row.
fn score_series(table: &Table, score: &str) -> Option<(Vec<String>, Vec<f64>)> {
    if score == RANK && table.row_by_label(score).is_none() {
        return rank_series(table);
    }

    if let Some(col) = table.column(score) {
        if table.index_name() != Some(score) {
            let labels = if table.index_name().is_some() {
                table.index_labels()
            } else if let Some(stamps) = table.column("timestamp") {
                stamps.iter().map(|c| c.to_string()).collect()
            } else {
                (0..table.len()).map(|i| i.to_string()).collect()
            };
            return Some((labels, col.into_iter().map(as_value).collect()));
        }
    }

    let row = table.row_by_label(score)?;
    Some(
        value_columns(table)
            .into_iter()
            .map(|i| (table.columns()[i].clone(), as_value(&row[i])))
            .unzip(),
    )
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Turns a compiled [`PlotSetup`] into figure jobs, loading files on the way.
pub struct RenderPlanner<'a> {
    metadata: &'a ScoreMetadata,
    loader: &'a dyn TableLoader,
    input_dir: PathBuf,
    naming: FileNaming,
    lt_ranges: Vec<String>,
}

impl<'a> RenderPlanner<'a> {
    pub fn new(
        metadata: &'a ScoreMetadata,
        loader: &'a dyn TableLoader,
        input_dir: impl Into<PathBuf>,
        naming: FileNaming,
        lt_ranges: Vec<String>,
    ) -> Self {
        Self {
            metadata,
            loader,
            input_dir: input_dir.into(),
            naming,
            lt_ranges,
        }
    }

    /// Every figure of one plot type, per model-version group and parameter.
    pub fn plan(&self, setup: &PlotSetup, plot_type: PlotType) -> Result<Vec<FigureJob>, ResolveError> {
        log::info!("planning {plot_type} plots");
        let mut jobs = Vec::new();
        for models in &setup.model_version_groups {
            for (parameter, scores) in &setup.parameters {
                let groups: Vec<&ScoreGroup> = if plot_type.is_ensemble() {
                    scores.ensemble().collect()
                } else {
                    scores.deterministic().collect()
                };
                if groups.is_empty() {
                    continue;
                }
                jobs.extend(self.plan_parameter(
                    plot_type,
                    models,
                    parameter,
                    &groups,
                    &setup.model_colors,
                )?);
            }
        }
        Ok(jobs)
    }

    /// Figures of one parameter for one model-version group.
    pub fn plan_parameter(
        &self,
        plot_type: PlotType,
        models: &[String],
        parameter: &str,
        groups: &[&ScoreGroup],
        colors: &ModelColors,
    ) -> Result<Vec<FigureJob>, ResolveError> {
        let transform = plot_type.transform();
        let query = FileQuery {
            root: &self.input_dir,
            prefix: self.naming.prefix(plot_type),
            postfix: &self.naming.postfix,
            models,
            parameter,
            lt_ranges: &self.lt_ranges,
            order: IndexOrder::RangeFirst,
        };
        let index = load_relevant_files(
            &query,
            self.loader,
            Some(&transform as &dyn Fn(Table, &Header) -> Table),
        )?;
        if index.is_empty() {
            log::warn!(
                "no {plot_type} files for {parameter} of {} in lead-time ranges {:?}",
                models.join("/"),
                self.lt_ranges
            );
            return Ok(Vec::new());
        }

        let panels: Vec<Panel> = groups
            .iter()
            .filter_map(|group| self.panel(plot_type, parameter, group, &index, colors))
            .collect();
        Ok(paginate(plot_type, models, parameter, panels))
    }

    fn panel(
        &self,
        plot_type: PlotType,
        parameter: &str,
        group: &ScoreGroup,
        index: &ModelDataIndex,
        colors: &ModelColors,
    ) -> Option<Panel> {
        let traces: Vec<ScoreTrace> = group
            .iter()
            .filter_map(|score| {
                let trace = self.trace(plot_type, parameter, score, index, colors);
                if trace.is_none() {
                    log::warn!("{score} not found in any {plot_type} file for {parameter}, skipped");
                }
                trace
            })
            .collect();
        if traces.is_empty() {
            return None;
        }
        Some(Panel {
            group: group.clone(),
            traces,
        })
    }

    fn trace(
        &self,
        plot_type: PlotType,
        parameter: &str,
        score: &str,
        index: &ModelDataIndex,
        colors: &ModelColors,
    ) -> Option<ScoreTrace> {
        let mut ranges: Vec<&String> = index.keys().collect();
        ranges.sort_by_key(|r| range_start(r));

        let mut series = Vec::new();
        for (i, lt_range) in ranges.into_iter().enumerate() {
            let (line, marker) = line_style(i);
            for (model, file) in &index[lt_range] {
                let Some((labels, values)) = score_series(&file.table, score) else {
                    continue;
                };
                series.push(Series {
                    model: model.clone(),
                    lt_range: lt_range.clone(),
                    color: colors.color_for(model).to_string(),
                    line_style: line,
                    marker,
                    labels,
                    values,
                });
            }
        }
        if series.is_empty() {
            return None;
        }

        let observed: Vec<f64> = series.iter().flat_map(|s| s.values.iter().copied()).collect();
        let bounds = if score == COUNT_SCORE {
            axis::count_bounds(&observed)
        } else {
            self.metadata.range_for(plot_type.aggregation(), parameter, score)
        };
        Some(ScoreTrace {
            score: score.to_string(),
            bounds,
            colormap: self.metadata.colormap_for(parameter, score),
            scaling: axis::resolve(bounds, &observed),
            series,
        })
    }
}
