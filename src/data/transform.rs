//! Load-time table transforms, one per plot type.
//!
//! Each transform runs exactly once per loaded file and its result replaces the
//! table. They only reshape what the file already holds; no values are made up.

use chrono::{NaiveDate, NaiveDateTime};

use super::model::{CellValue, Header, Table};

/// Signature of the load hook handed to the resolver.
pub type Transform = fn(Table, &Header) -> Table;

/// Format of the derived `timestamp` column of time-series files.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

fn missing_code(header: &Header) -> Option<f64> {
    header
        .get("Missing value code")
        .and_then(|v| v.first())
        .and_then(|s| s.parse().ok())
}

fn replace_missing(table: &mut Table, header: &Header) {
    if let Some(code) = missing_code(header) {
        table.replace_missing(code);
    }
}

/// Station scores: rows are scores, columns are stations.
/// Appends `lon` / `lat` rows from the header.
pub fn station_scores(mut table: Table, header: &Header) -> Table {
    replace_missing(&mut table, header);
    table.rename_column("ScoreABO", "ABO");
    if !table.set_index("Score") {
        log::warn!("station table has no 'Score' column");
        return table;
    }
    let index_pos = table.column_index("Score").unwrap_or(0);
    for (label, key) in [("lon", "Longitude"), ("lat", "Latitude")] {
        let Some(coords) = header.get(key) else {
            continue;
        };
        let mut coords = coords.iter().map(|c| CellValue::parse(c));
        let row = (0..table.columns().len())
            .map(|i| {
                if i == index_pos {
                    CellValue::Text(label.to_string())
                } else {
                    coords.next().unwrap_or(CellValue::Missing)
                }
            })
            .collect();
        table.push_row(row);
    }
    table
}

/// Time series: date parts collapse into one `timestamp` column.
pub fn time_scores(mut table: Table, header: &Header) -> Table {
    let parts: Vec<Option<Vec<&CellValue>>> = ["YYYY", "MM", "DD", "hh", "mm"]
        .iter()
        .map(|c| table.column(c))
        .collect();
    if parts.iter().all(Option::is_some) {
        let parts: Vec<Vec<&CellValue>> = parts.into_iter().flatten().collect();
        let stamps: Vec<CellValue> = (0..table.len())
            .map(|row| {
                let field = |col: usize| parts[col][row].as_f64().map(|v| v as u32);
                timestamp(field(0), field(1), field(2), field(3), field(4))
            })
            .collect();
        table.push_column("timestamp", stamps);
        table.drop_columns(&["YYYY", "MM", "DD", "hh", "mm", "lt_hh", "lt_mm"]);
    } else {
        log::warn!("time series table lacks date columns, no timestamp derived");
    }
    replace_missing(&mut table, header);
    table
}

fn date_time(
    year: Option<u32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    minute: Option<u32>,
) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(i32::try_from(year?).ok()?, month?, day?)?.and_hms_opt(hour?, minute?, 0)
}

fn timestamp(
    year: Option<u32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    minute: Option<u32>,
) -> CellValue {
    match date_time(year, month, day, hour, minute) {
        Some(t) => CellValue::Text(t.format(TIMESTAMP_FORMAT).to_string()),
        None => CellValue::Missing,
    }
}

/// Diurnal cycle: rows are hours of the day.
pub fn daytime_scores(mut table: Table, header: &Header) -> Table {
    replace_missing(&mut table, header);
    table.set_index("hh");
    table
}

/// Total and ensemble scores: rows are scores.
pub fn total_scores(mut table: Table, header: &Header) -> Table {
    replace_missing(&mut table, header);
    table.set_index("Score");
    table
}
