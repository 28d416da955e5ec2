use std::path::Path;

use crate::error::LoadError;

use super::model::{AtabFile, CellValue, Header, Table};

/// Name given to the leading label cell of rows that are one cell wider
/// than the column line.
pub const IMPLICIT_INDEX: &str = "Score";

/// Constant text columns appended from header keys, as `(column, key)`.
pub const HEADER_COLUMNS: [(&str, &str); 2] = [
    ("Experiment", "Experiment"),
    ("Product_Type", "Type_of_product"),
];

// ---------------------------------------------------------------------------
// Loader seam
// ---------------------------------------------------------------------------

/// Loads one data file into header + table.
///
/// The resolver only depends on this trait, so tests and alternative file
/// formats can plug in their own loader.
pub trait TableLoader {
    fn load(&self, path: &Path) -> Result<AtabFile, LoadError>;
}

/// Field separator of an ATAB file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    /// Runs of blanks/tabs separate fields.
    #[default]
    Whitespace,
    Semicolon,
}

impl TryFrom<char> for Separator {
    type Error = LoadError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            ' ' => Ok(Separator::Whitespace),
            ';' => Ok(Separator::Semicolon),
            other => Err(LoadError::UnsupportedSeparator(other)),
        }
    }
}

impl Separator {
    fn split<'a>(&self, s: &'a str) -> Vec<&'a str> {
        match self {
            Separator::Whitespace => s.split_whitespace().collect(),
            Separator::Semicolon => s
                .split(';')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// ATAB loader
// ---------------------------------------------------------------------------

/// Reader for ATAB files.
///
/// Layout:
/// ```text
/// ATAB                                  <- format token
/// Model version: C-1E_ch                <- header, `key: values`
/// Start time: 2021-11-01 00:00
/// Missing value code: -999.0
/// ScoreABO BAS                          <- first line without ':' = columns
/// ME 0.12 -999.0                        <- data rows
/// ```
///
/// Station files label their rows without naming the label column, so every
/// data row is one cell wider than the column line. Those rows get a leading
/// [`IMPLICIT_INDEX`] column.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtabLoader {
    pub sep: Separator,
}

impl AtabLoader {
    pub fn new(sep: Separator) -> Self {
        AtabLoader { sep }
    }
}

impl TableLoader for AtabLoader {
    fn load(&self, path: &Path) -> Result<AtabFile, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_atab(&text, self.sep, path)
    }
}

/// Parse the text of an ATAB file. `path` is only used in error messages.
pub fn parse_atab(text: &str, sep: Separator, path: &Path) -> Result<AtabFile, LoadError> {
    let mut lines = text.lines();
    let mut header = Header::new();

    if let Some(first) = lines.next() {
        header.insert("Format".to_string(), vec![first.trim().to_string()]);
    }

    // Header lines until the first line without ':'.
    let column_line = loop {
        let Some(line) = lines.next() else {
            return Err(LoadError::MissingColumnLine {
                path: path.to_path_buf(),
            });
        };
        match line.trim().split_once(':') {
            Some((key, values)) => {
                let values = sep.split(values).into_iter().map(String::from).collect();
                header.insert(key.trim().to_string(), values);
            }
            None => break line,
        }
    };

    let mut columns: Vec<String> = sep
        .split(column_line)
        .into_iter()
        .map(String::from)
        .collect();
    let rows = read_rows(lines, sep, path)?;
    if rows.is_empty() {
        return Err(LoadError::EmptyData {
            path: path.to_path_buf(),
        });
    }
    if rows.iter().all(|r| r.len() == columns.len() + 1) {
        columns.insert(0, IMPLICIT_INDEX.to_string());
    } else if let Some((row_no, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
        log::debug!(
            "{}: row {row_no} has {} cells, expected {}",
            path.display(),
            row.len(),
            columns.len()
        );
    }

    let mut table = Table::new(columns, rows);

    // Constant columns derived from the header.
    for (column, key) in HEADER_COLUMNS {
        if let Some(value) = header.get(key).and_then(|v| v.first()) {
            let cells = vec![CellValue::Text(value.clone()); table.len()];
            table.push_column(column, cells);
        }
    }
    table.drop_empty_columns();

    Ok(AtabFile { header, table })
}

/// Read the data section through `csv`. Whitespace-separated rows are first
/// normalised to `;` so both separators share one reader configuration.
fn read_rows<'a>(
    lines: impl Iterator<Item = &'a str>,
    sep: Separator,
    path: &Path,
) -> Result<Vec<Vec<CellValue>>, LoadError> {
    let body: String = lines
        .filter(|l| !l.trim().is_empty())
        .map(|l| match sep {
            Separator::Whitespace => l.split_whitespace().collect::<Vec<_>>().join(";"),
            Separator::Semicolon => l.trim().to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|source| LoadError::Row {
            path: path.to_path_buf(),
            row: row_no,
            source,
        })?;
        rows.push(record.iter().map(CellValue::parse).collect());
    }
    Ok(rows)
}
