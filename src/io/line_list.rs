//! CSV line lists.
//!
//! A line list has one transition per row with the columns
//! `nu, sw, gamma_air, gamma_self, n_air, elower, local_iso_id` and an optional
//! `delta_air` (missing or empty means no pressure shift). Header names are
//! matched case-insensitively; extra columns are ignored.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::catalog::Transition;
use crate::error::LblError;

const REQUIRED_COLUMNS: [&str; 7] = [
    "nu",
    "sw",
    "gamma_air",
    "gamma_self",
    "n_air",
    "elower",
    "local_iso_id",
];

/// A row that could not be turned into a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based line in the file, header included.
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct LineList {
    pub transitions: Vec<Transition>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

pub fn read_line_list(path: &Path) -> Result<LineList, LblError> {
    let file = File::open(path).map_err(|e| {
        LblError::catalog_with(format!("Failed to open line list '{}'", path.display()), e)
    })?;
    parse_line_list(file)
}

/// Parse a line list from any reader; schema problems fail, bad rows are collected.
pub fn parse_line_list<R: std::io::Read>(input: R) -> Result<LineList, LblError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| LblError::catalog_with("Failed to read line list header", e))?
        .clone();
    let header_map = build_header_map(&headers);
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(*c))
        .collect();
    if !missing.is_empty() {
        return Err(LblError::catalog(format!(
            "Line list is missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut list = LineList::default();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        list.rows_read += 1;
        let parsed = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|record| parse_row(&record, &header_map));
        match parsed {
            Ok(t) => list.transitions.push(t),
            Err(message) => list.row_errors.push(RowError { line, message }),
        }
    }
    Ok(list)
}

/// Write transitions with the same columns `read_line_list` expects.
pub fn write_line_list(path: &Path, transitions: &[Transition]) -> Result<(), LblError> {
    let export_err = |source: std::io::Error| LblError::Export {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(|e| export_err(e.into()))?;
    for t in transitions {
        writer.serialize(t).map_err(|e| export_err(e.into()))?;
    }
    writer.flush().map_err(export_err)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let name = name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase();
            (name, idx)
        })
        .collect()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Transition, String> {
    let local_iso_id = get_required(record, header_map, "local_iso_id")?;
    let local_iso_id = local_iso_id
        .parse::<u32>()
        .map_err(|_| format!("Invalid `local_iso_id` '{local_iso_id}'"))?;

    let nu = parse_f64(record, header_map, "nu")?;
    let sw = parse_f64(record, header_map, "sw")?;
    let delta_air = match get_optional(record, header_map, "delta_air") {
        Some(s) => s
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("Invalid `delta_air` '{s}'"))?,
        None => 0.0,
    };

    let transition = Transition {
        nu,
        sw,
        gamma_air: parse_f64(record, header_map, "gamma_air")?,
        gamma_self: parse_f64(record, header_map, "gamma_self")?,
        n_air: parse_f64(record, header_map, "n_air")?,
        elower: parse_f64(record, header_map, "elower")?,
        delta_air,
        local_iso_id,
    };
    transition.check()?;
    Ok(transition)
}

fn parse_f64(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Result<f64, String> {
    let s = get_required(record, header_map, name)?;
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid `{name}` '{s}'")),
    }
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    get_optional(record, header_map, name).ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}
