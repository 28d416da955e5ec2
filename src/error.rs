use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Plot setup compilation
// ---------------------------------------------------------------------------

/// Fatal configuration errors raised while compiling the CLI strings.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("the model version inputs {missing:?} do not exist in the directory {dir}")]
    MissingModelDirs { missing: Vec<String>, dir: PathBuf },
    #[error("cannot list input directory {dir}: {source}")]
    InputDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("the colour list is smaller than the number of models to plot ({colors} < {models})")]
    TooFewColors { colors: usize, models: usize },
    #[error("ensemble plots are not available for parameter(s) {0:?}")]
    DisallowedEnsembleParams(Vec<String>),
    #[error("score combination '{0}' holds more than two scores")]
    OversizedGroup(String),
    #[error("invalid input: parameter and/or scores are missing")]
    EmptySetup,
}

// ---------------------------------------------------------------------------
// ATAB loading
// ---------------------------------------------------------------------------

/// Failures of the ATAB table loader.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("separator {0:?} not supported, must be ' ' or ';'")]
    UnsupportedSeparator(char),
    #[error("{path}: header is not terminated by a column line")]
    MissingColumnLine { path: PathBuf },
    #[error("{path}: data section is empty")]
    EmptyData { path: PathBuf },
    #[error("{path}: data row {row}: {source}")]
    Row {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },
}

// ---------------------------------------------------------------------------
// File resolution
// ---------------------------------------------------------------------------

/// Fatal errors while resolving data files for one parameter.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("the filename {0} does not contain a LT range")]
    MissingLeadTimeRange(String),
    #[error("scanning {dir}: {source}")]
    Scan {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Load(#[from] LoadError),
}

// ---------------------------------------------------------------------------
// Score metadata file
// ---------------------------------------------------------------------------

/// Self-check failures of the fixed-layout score metadata file.
#[derive(Error, Debug, PartialEq)]
pub enum MetadataError {
    #[error("line {line}: expected section marker '{expected}', found '{found}'")]
    SectionMismatch {
        line: usize,
        expected: &'static str,
        found: String,
    },
    #[error("line {line}: file ends before section '{section}' is complete")]
    Truncated { line: usize, section: &'static str },
    #[error("section '{section}' holds {found} entries, at most {capacity} fit")]
    Overfull {
        section: &'static str,
        found: usize,
        capacity: usize,
    },
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: '{token}' is not a number")]
    Number { line: usize, token: String },
    #[error("reading {path}: {message}")]
    Read { path: PathBuf, message: String },
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Failures while writing figure output.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("encoding {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
