use std::sync::OnceLock;

use regex::Regex;

use crate::error::ResolveError;

/// One or two 2–3 digit groups joined by hyphens, e.g. `19-24` or `120`.
const LT_RANGE_PATTERN: &str = r"(\d{2,3})(-\d{2,3})*";

fn lt_range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LT_RANGE_PATTERN).expect("static pattern compiles"))
}

/// Extract the lead-time-range token from a data file name.
///
/// A candidate file without a token breaks the naming convention, which is
/// fatal for the whole resolution.
pub fn lead_time_range(file_name: &str) -> Result<String, ResolveError> {
    lt_range_regex()
        .find(file_name)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ResolveError::MissingLeadTimeRange(file_name.to_string()))
}

/// Whether `file_name` matches the glob `<prefix>*<parameter><postfix>`.
pub fn matches_candidate(file_name: &str, prefix: &str, parameter: &str, postfix: &str) -> bool {
    let suffix = format!("{parameter}{postfix}");
    file_name.len() >= prefix.len() + suffix.len()
        && file_name.starts_with(prefix)
        && file_name.ends_with(&suffix)
}

/// Start hour of a lead-time range, used to sort ranges numerically.
pub fn range_start(lt_range: &str) -> u32 {
    lt_range
        .split('-')
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(u32::MAX)
}
