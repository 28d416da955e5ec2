use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::ResolveError;

use super::filename::{lead_time_range, matches_candidate};
use super::loader::TableLoader;
use super::model::{AtabFile, Header, Table};

/// Date-time format of the `Start time` / `End time` header fields.
pub const HEADER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Which key comes first in a [`ModelDataIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrder {
    /// `lt_range → model → file`
    RangeFirst,
    /// `model → lt_range → file`
    ModelFirst,
}

/// Two-level lookup of loaded files.
pub type ModelDataIndex = BTreeMap<String, BTreeMap<String, AtabFile>>;

/// What to look for when resolving files for one parameter.
#[derive(Debug, Clone)]
pub struct FileQuery<'a> {
    pub root: &'a Path,
    pub prefix: &'a str,
    pub postfix: &'a str,
    pub models: &'a [String],
    pub parameter: &'a str,
    /// Empty means "every range found on disk".
    pub lt_ranges: &'a [String],
    pub order: IndexOrder,
}

/// Both header time fields parse as `%Y-%m-%d %H:%M`.
pub fn is_valid_data(header: &Header) -> bool {
    ["Start time", "End time"].iter().all(|key| {
        header
            .get(*key)
            .filter(|v| v.len() >= 2)
            .map(|v| v[..2].join(" "))
            .is_some_and(|s| NaiveDateTime::parse_from_str(&s, HEADER_TIME_FORMAT).is_ok())
    })
}

/// Candidate files of one model directory, sorted by name.
fn candidate_files(dir: &Path, query: &FileQuery<'_>) -> Result<Vec<PathBuf>, ResolveError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ResolveError::Scan {
        dir: dir.to_path_buf(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ResolveError::Scan {
            dir: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let matched = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| matches_candidate(n, query.prefix, query.parameter, query.postfix));
        if matched && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load every relevant file for one parameter and one model-version group.
///
/// Files outside the requested ranges are skipped silently; files with
/// unparseable header dates are dropped with a warning. A candidate name
/// without a lead-time range aborts the whole call.
pub fn load_relevant_files(
    query: &FileQuery<'_>,
    loader: &dyn TableLoader,
    transform: Option<&dyn Fn(Table, &Header) -> Table>,
) -> Result<ModelDataIndex, ResolveError> {
    let mut index = ModelDataIndex::new();
    let mut files_list = Vec::new();

    for model in query.models {
        let dir = query.root.join(model);
        for path in candidate_files(&dir, query)? {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let lt_range = lead_time_range(&name)?;
            if !query.lt_ranges.is_empty() && !query.lt_ranges.contains(&lt_range) {
                continue;
            }

            let mut file = loader.load(&path)?;
            if let Some(transform) = transform {
                let table = std::mem::take(&mut file.table);
                file.table = transform(table, &file.header);
            }
            if !is_valid_data(&file.header) {
                log::warn!(
                    "{}: start/end time not in '{HEADER_TIME_FORMAT}' format, file skipped",
                    path.display()
                );
                continue;
            }

            let (first, second) = match query.order {
                IndexOrder::RangeFirst => (lt_range, model.clone()),
                IndexOrder::ModelFirst => (model.clone(), lt_range),
            };
            index.entry(first).or_default().insert(second, file);
            files_list.push(path);
        }
    }

    log::debug!(
        "for parameter {} these files are relevant: {:?}",
        query.parameter,
        files_list
    );
    Ok(index)
}
