use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of an ATAB data table
// ---------------------------------------------------------------------------

/// A dynamically-typed table cell.
/// `Missing` is the designated missing-value marker ("not-a-number").
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Missing,
}

// -- Manual Eq/Ord so cells can key a BTreeSet (e.g. unique station ids) --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Missing => 0,
                Integer(_) => 1,
                Float(_) => 2,
                Text(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Missing, Missing) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Missing => write!(f, "NaN"),
        }
    }
}

impl CellValue {
    /// Guess the cell type from its raw text.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("nan") {
            return CellValue::Missing;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        CellValue::Text(s.to_string())
    }

    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

// ---------------------------------------------------------------------------
// Table – a 2-D labeled container
// ---------------------------------------------------------------------------

/// Row-oriented table with named columns and an optional index column.
///
/// When an index column is set, rows can be addressed by the label stored in
/// that column (e.g. the `Score` column of total/station score files).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    index: Option<usize>,
}

impl Table {
    /// Build a table; every row is padded or cut to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, CellValue::Missing);
                r
            })
            .collect();
        Table {
            columns,
            rows,
            index: None,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Name of the index column, if one is set.
    pub fn index_name(&self) -> Option<&str> {
        self.index.map(|i| self.columns[i].as_str())
    }

    /// All cells of a column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&CellValue>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Use `name` as the row label column. Returns `false` if it does not exist.
    pub fn set_index(&mut self, name: &str) -> bool {
        match self.column_index(name) {
            Some(i) => {
                self.index = Some(i);
                true
            }
            None => false,
        }
    }

    /// Labels of all rows, taken from the index column.
    pub fn index_labels(&self) -> Vec<String> {
        match self.index {
            Some(i) => self.rows.iter().map(|r| r[i].to_string()).collect(),
            None => Vec::new(),
        }
    }

    /// First row whose index label equals `label`.
    pub fn row_by_label(&self, label: &str) -> Option<&[CellValue]> {
        let i = self.index?;
        self.rows
            .iter()
            .find(|r| r[i].to_string() == label)
            .map(|r| r.as_slice())
    }

    /// Keep only the named columns, in the given order. Unknown names are ignored.
    pub fn select_columns(&self, names: &[&str]) -> Table {
        let picks: Vec<usize> = names.iter().filter_map(|n| self.column_index(n)).collect();
        let columns = picks.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|r| picks.iter().map(|&i| r[i].clone()).collect())
            .collect();
        let index = self
            .index
            .and_then(|old| picks.iter().position(|&i| i == old));
        Table {
            columns,
            rows,
            index,
        }
    }

    /// Keep the rows for which `pred` holds.
    pub fn filter_rows<F>(&self, mut pred: F) -> Table
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| pred(r.as_slice())).cloned().collect(),
            index: self.index,
        }
    }

    /// Replace every numeric cell equal to `sentinel` with [`CellValue::Missing`].
    /// Returns the number of replaced cells.
    pub fn replace_missing(&mut self, sentinel: f64) -> usize {
        let mut n = 0;
        for cell in self.rows.iter_mut().flatten() {
            if cell.as_f64().is_some_and(|v| v == sentinel) {
                *cell = CellValue::Missing;
                n += 1;
            }
        }
        n
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(i) => {
                self.columns[i] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove the named columns. The index is cleared if its column goes.
    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep: Vec<&str> = self
            .columns
            .iter()
            .map(String::as_str)
            .filter(|c| !names.contains(c))
            .collect();
        let kept = self.select_columns(&keep);
        *self = kept;
    }

    /// Remove columns in which every cell is missing.
    pub fn drop_empty_columns(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let empty: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(i, _)| self.rows.iter().all(|r| r[*i].is_missing()))
            .map(|(_, c)| c.clone())
            .collect();
        let names: Vec<&str> = empty.iter().map(String::as_str).collect();
        self.drop_columns(&names);
    }

    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Missing);
        self.rows.push(row);
    }

    /// Append a column; `values` shorter than the table are padded with missing cells.
    pub fn push_column(&mut self, name: &str, values: Vec<CellValue>) {
        self.columns.push(name.to_string());
        let mut values = values.into_iter();
        for r in &mut self.rows {
            r.push(values.next().unwrap_or(CellValue::Missing));
        }
    }

    /// Numeric values of a score, skipping missing cells.
    ///
    /// The score is looked up as a column first, then as an index row label
    /// (the non-index cells of that row are returned).
    pub fn score_values(&self, score: &str) -> Option<Vec<f64>> {
        if let Some(col) = self.column(score) {
            if self.index_name() != Some(score) {
                return Some(col.iter().filter_map(|c| c.as_f64()).collect());
            }
        }
        let index = self.index;
        self.row_by_label(score).map(|row| {
            row.iter()
                .enumerate()
                .filter(|(i, _)| Some(*i) != index)
                .filter_map(|(_, c)| c.as_f64())
                .collect()
        })
    }
}

// ---------------------------------------------------------------------------
// AtabFile – header + table of one loaded data file
// ---------------------------------------------------------------------------

/// Header key → whitespace/separator split values.
pub type Header = BTreeMap<String, Vec<String>>;

/// One loaded data file: its header and (possibly transformed) table.
#[derive(Debug, Clone, PartialEq)]
pub struct AtabFile {
    pub header: Header,
    pub table: Table,
}

impl AtabFile {
    /// First value of a header field.
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.header
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// The `Missing value code` header field as a number.
    pub fn missing_value_code(&self) -> Option<f64> {
        self.header_value("Missing value code")?.parse().ok()
    }
}
