//! Parser for the fixed-layout `plot_synop_ch` score metadata file.
//!
//! Section positions are tied to this exact file. Every section is preceded
//! by a marker line that is checked before the rows under it are trusted, so
//! a reformatted file fails loudly instead of yielding shifted numbers.

use std::collections::BTreeMap;

use crate::error::MetadataError;

use super::{Aggregation, CatScoreRange, ColormapCode, ScoreBounds};

/// 0-based line of the regular parameter names.
pub const VERIF_PARAM_LINE: usize = 1;
/// 0-based line of the regular score names.
pub const VERIF_SCORE_LINE: usize = 3;
/// 0-based line of the categorical parameter names.
pub const CAT_PARAM_LINE: usize = 70;
/// First of the per-parameter categorical score lines.
pub const CAT_SCORE_FIRST_LINE: usize = 72;
/// Room for per-parameter categorical score lines.
pub const CAT_SCORE_CAPACITY: usize = 13;

/// Position of one data section.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub marker: &'static str,
    pub first_row: usize,
    pub capacity: usize,
}

impl Section {
    const fn new(marker: &'static str, first_row: usize, capacity: usize) -> Self {
        Section {
            marker,
            first_row,
            capacity,
        }
    }

    fn marker_line(&self) -> usize {
        self.first_row - 1
    }
}

const REGULAR_ROWS: usize = 12;
const CAT_ROWS: usize = 18;

pub const VERIF_PARAM_MARKER: Section = Section::new("VERIFICATION PARAMETERS", VERIF_PARAM_LINE, 1);
pub const VERIF_SCORE_MARKER: Section = Section::new("VERIFICATION SCORES", VERIF_SCORE_LINE, 1);
pub const STATION_RANGES: Section = Section::new("STATION SCORE RANGES", 5, REGULAR_ROWS);
pub const TIME_RANGES: Section = Section::new("TIME SCORE RANGES", 18, REGULAR_ROWS);
pub const DAYTIME_RANGES: Section = Section::new("DAYTIME SCORE RANGES", 31, REGULAR_ROWS);
pub const TOTAL_RANGES: Section = Section::new("TOTAL SCORE RANGES", 44, REGULAR_ROWS);
pub const STATION_COLOURS: Section = Section::new("STATION SCORE COLOURS", 57, REGULAR_ROWS);
pub const CAT_PARAM_MARKER: Section = Section::new("CATEGORICAL PARAMETERS", CAT_PARAM_LINE, 1);
pub const CAT_SCORE_MARKER: Section =
    Section::new("CATEGORICAL SCORES", CAT_SCORE_FIRST_LINE, CAT_SCORE_CAPACITY);
pub const CAT_STATION_RANGES: Section = Section::new("CATEGORICAL STATION SCORE RANGES", 86, CAT_ROWS);
pub const CAT_TIME_RANGES: Section = Section::new("CATEGORICAL TIME SCORE RANGES", 105, CAT_ROWS);
pub const CAT_DAYTIME_RANGES: Section =
    Section::new("CATEGORICAL DAYTIME SCORE RANGES", 124, CAT_ROWS);
pub const CAT_TOTAL_RANGES: Section = Section::new("CATEGORICAL TOTAL SCORE RANGES", 143, CAT_ROWS);
pub const CAT_STATION_COLOURS: Section =
    Section::new("CATEGORICAL STATION SCORE COLOURS", 162, CAT_ROWS);

/// Regular range section per aggregation.
pub fn regular_section(aggregation: Aggregation) -> Section {
    match aggregation {
        Aggregation::Station => STATION_RANGES,
        Aggregation::Time => TIME_RANGES,
        Aggregation::Daytime => DAYTIME_RANGES,
        Aggregation::Total => TOTAL_RANGES,
    }
}

/// Categorical range section per aggregation.
pub fn categorical_section(aggregation: Aggregation) -> Section {
    match aggregation {
        Aggregation::Station => CAT_STATION_RANGES,
        Aggregation::Time => CAT_TIME_RANGES,
        Aggregation::Daytime => CAT_DAYTIME_RANGES,
        Aggregation::Total => CAT_TOTAL_RANGES,
    }
}

/// Colormap code → colormap name. Codes outside this table are authoring defects.
pub fn colormap_name(code: i64) -> Option<&'static str> {
    Some(match code {
        34 => "jet",
        48 => "cubehelix",
        52 => "bwr",
        53 => "bwr_r",
        54 | 57 => "jet_r",
        58 => "turbo",
        59 => "terrain",
        60 => "BrBG",
        63 | 64 | 66 | 67 => "Spectral",
        _ => return None,
    })
}

/// Regular table: parameter → score → bounds.
pub type RangeTable = BTreeMap<String, BTreeMap<String, ScoreBounds>>;
/// Categorical table: parameter → rows in file order.
pub type CatRangeTable = BTreeMap<String, Vec<CatScoreRange>>;
/// Regular colours: parameter → score → code.
pub type ColourTable = BTreeMap<String, BTreeMap<String, ColormapCode>>;
/// Categorical colours: parameter → (score, code) rows in file order.
pub type CatColourTable = BTreeMap<String, Vec<(String, ColormapCode)>>;

/// Everything read from the file, before lookup policies are attached.
#[derive(Debug, Clone, Default)]
pub struct ParsedSynop {
    pub params: Vec<String>,
    pub scores: Vec<String>,
    pub cat_params: Vec<String>,
    pub cat_scores: Vec<Vec<String>>,
    pub ranges: BTreeMap<Aggregation, RangeTable>,
    pub cat_ranges: BTreeMap<Aggregation, CatRangeTable>,
    pub colours: ColourTable,
    pub cat_colours: CatColourTable,
}

struct Lines<'a> {
    lines: Vec<&'a str>,
}

impl<'a> Lines<'a> {
    fn get(&self, line: usize, section: &'static str) -> Result<&'a str, MetadataError> {
        self.lines
            .get(line)
            .copied()
            .map(str::trim)
            .ok_or(MetadataError::Truncated { line, section })
    }

    fn check_marker(&self, section: &Section) -> Result<(), MetadataError> {
        let line = section.marker_line();
        let found = self.get(line, section.marker)?;
        if found.trim_start_matches('#').trim() == section.marker {
            Ok(())
        } else {
            Err(MetadataError::SectionMismatch {
                line,
                expected: section.marker,
                found: found.to_string(),
            })
        }
    }

    fn tokens(&self, line: usize, section: &'static str) -> Result<Vec<String>, MetadataError> {
        Ok(self
            .get(line, section)?
            .split_whitespace()
            .map(String::from)
            .collect())
    }

    /// `n` rows of exactly `width` tokens, starting at the section's first row.
    fn rows(
        &self,
        section: &Section,
        n: usize,
        width: usize,
    ) -> Result<Vec<(usize, Vec<String>)>, MetadataError> {
        self.check_marker(section)?;
        if n > section.capacity {
            return Err(MetadataError::Overfull {
                section: section.marker,
                found: n,
                capacity: section.capacity,
            });
        }
        (section.first_row..section.first_row + n)
            .map(|line| {
                let row = self.tokens(line, section.marker)?;
                if row.len() != width {
                    return Err(MetadataError::ColumnCount {
                        line,
                        expected: width,
                        found: row.len(),
                    });
                }
                Ok((line, row))
            })
            .collect()
    }
}

fn number(line: usize, token: &str) -> Result<f64, MetadataError> {
    token.parse().map_err(|_| MetadataError::Number {
        line,
        token: token.to_string(),
    })
}

fn code(line: usize, token: &str) -> Result<ColormapCode, MetadataError> {
    let raw: i64 = token.parse().map_err(|_| MetadataError::Number {
        line,
        token: token.to_string(),
    })?;
    Ok(match colormap_name(raw) {
        Some(name) => ColormapCode::Known(name),
        None => ColormapCode::Unknown(raw),
    })
}

/// Parse the complete metadata file.
pub fn parse(text: &str) -> Result<ParsedSynop, MetadataError> {
    let lines = Lines {
        lines: text.lines().collect(),
    };

    lines.check_marker(&VERIF_PARAM_MARKER)?;
    let params = lines.tokens(VERIF_PARAM_LINE, VERIF_PARAM_MARKER.marker)?;
    lines.check_marker(&VERIF_SCORE_MARKER)?;
    let scores = lines.tokens(VERIF_SCORE_LINE, VERIF_SCORE_MARKER.marker)?;

    let mut parsed = ParsedSynop {
        params,
        scores,
        ..Default::default()
    };

    for aggregation in Aggregation::ALL {
        let table = regular_ranges(&lines, &parsed, regular_section(aggregation))?;
        parsed.ranges.insert(aggregation, table);
    }
    parsed.colours = regular_colours(&lines, &parsed)?;

    lines.check_marker(&CAT_PARAM_MARKER)?;
    parsed.cat_params = lines.tokens(CAT_PARAM_LINE, CAT_PARAM_MARKER.marker)?;
    lines.check_marker(&CAT_SCORE_MARKER)?;
    if parsed.cat_params.len() > CAT_SCORE_CAPACITY {
        return Err(MetadataError::Overfull {
            section: CAT_SCORE_MARKER.marker,
            found: parsed.cat_params.len(),
            capacity: CAT_SCORE_CAPACITY,
        });
    }
    parsed.cat_scores = (0..parsed.cat_params.len())
        .map(|i| lines.tokens(CAT_SCORE_FIRST_LINE + i, CAT_SCORE_MARKER.marker))
        .collect::<Result<_, _>>()?;

    for aggregation in Aggregation::ALL {
        let table = categorical_ranges(&lines, &parsed, categorical_section(aggregation))?;
        parsed.cat_ranges.insert(aggregation, table);
    }
    parsed.cat_colours = categorical_colours(&lines, &parsed)?;

    Ok(parsed)
}

fn regular_ranges(
    lines: &Lines<'_>,
    parsed: &ParsedSynop,
    section: Section,
) -> Result<RangeTable, MetadataError> {
    let rows = lines.rows(&section, parsed.scores.len(), 2 * parsed.params.len())?;
    let mut table = RangeTable::new();
    for ((line, row), score) in rows.iter().zip(&parsed.scores) {
        for (j, param) in parsed.params.iter().enumerate() {
            let bounds = ScoreBounds {
                min: number(*line, &row[2 * j])?,
                max: number(*line, &row[2 * j + 1])?,
            };
            table
                .entry(param.clone())
                .or_default()
                .insert(score.clone(), bounds);
        }
    }
    Ok(table)
}

fn regular_colours(lines: &Lines<'_>, parsed: &ParsedSynop) -> Result<ColourTable, MetadataError> {
    let rows = lines.rows(&STATION_COLOURS, parsed.scores.len(), parsed.params.len())?;
    let mut table = ColourTable::new();
    for ((line, row), score) in rows.iter().zip(&parsed.scores) {
        for (param, token) in parsed.params.iter().zip(row) {
            table
                .entry(param.clone())
                .or_default()
                .insert(score.clone(), code(*line, token)?);
        }
    }
    Ok(table)
}

/// Row count of the categorical sections: the longest per-parameter score list.
fn cat_row_count(parsed: &ParsedSynop) -> usize {
    parsed.cat_scores.iter().map(Vec::len).max().unwrap_or(0)
}

fn categorical_ranges(
    lines: &Lines<'_>,
    parsed: &ParsedSynop,
    section: Section,
) -> Result<CatRangeTable, MetadataError> {
    let rows = lines.rows(&section, cat_row_count(parsed), 2 * parsed.cat_params.len())?;
    let mut table = CatRangeTable::new();
    for (j, (param, scores)) in parsed.cat_params.iter().zip(&parsed.cat_scores).enumerate() {
        let entries = table.entry(param.clone()).or_default();
        // row i belongs to this parameter's i-th score
        for ((line, row), score) in rows.iter().zip(scores) {
            entries.push(CatScoreRange {
                score: score.clone(),
                bounds: ScoreBounds {
                    min: number(*line, &row[2 * j])?,
                    max: number(*line, &row[2 * j + 1])?,
                },
            });
        }
    }
    Ok(table)
}

fn categorical_colours(
    lines: &Lines<'_>,
    parsed: &ParsedSynop,
) -> Result<CatColourTable, MetadataError> {
    let rows = lines.rows(&CAT_STATION_COLOURS, cat_row_count(parsed), parsed.cat_params.len())?;
    let mut table = CatColourTable::new();
    for (j, (param, scores)) in parsed.cat_params.iter().zip(&parsed.cat_scores).enumerate() {
        let entries = table.entry(param.clone()).or_default();
        for ((line, row), score) in rows.iter().zip(scores) {
            entries.push((score.clone(), code(*line, &row[j])?));
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLED: &str = include_str!("../../config/plot_synop_ch");

    #[test]
    fn bundled_file_parses() {
        let p = parse(BUNDLED).unwrap();
        assert_eq!(p.params.len(), 16);
        assert_eq!(p.scores.len(), 12);
        assert_eq!(p.cat_params.len(), 13);
        assert_eq!(p.cat_scores[4][0], "MF(2.5)");
        let t2m = &p.ranges[&Aggregation::Station]["T_2M*"]["ME"];
        assert_eq!((t2m.min, t2m.max), (-3.0, 3.0));
    }

    #[test]
    fn categorical_rows_follow_parameter_score_list() {
        let p = parse(BUNDLED).unwrap();
        let clct = &p.cat_ranges[&Aggregation::Total]["CLCT"];
        assert_eq!(clct.len(), 6);
        assert_eq!(clct[3].score, "MF(6.5)");
        assert_eq!((clct[3].bounds.min, clct[3].bounds.max), (0.0, 1.8));
    }

    #[test]
    fn colour_codes_are_translated() {
        let p = parse(BUNDLED).unwrap();
        assert_eq!(p.colours["T_2M*"]["ME"], ColormapCode::Known("bwr"));
        assert_eq!(p.colours["*"]["R2"], ColormapCode::Unknown(99));
        assert_eq!(p.cat_colours["CLCT"][0], ("MF(2.5)".to_string(), ColormapCode::Known("jet_r")));
    }

    #[test]
    fn shifted_file_fails_self_check() {
        let shifted = format!("\n{BUNDLED}");
        let err = parse(&shifted).unwrap_err();
        assert!(matches!(err, MetadataError::SectionMismatch { line: 0, .. }));
    }

    #[test]
    fn truncated_file_is_reported() {
        let cut: String = BUNDLED.lines().take(60).collect::<Vec<_>>().join("\n");
        assert!(matches!(parse(&cut).unwrap_err(), MetadataError::Truncated { .. }));
    }

    #[test]
    fn unknown_codes() {
        assert_eq!(colormap_name(66), Some("Spectral"));
        assert_eq!(colormap_name(0), None);
    }
}
