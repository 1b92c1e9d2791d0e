//! Parsers for the catalog file and its individual cells.
//!
//! The file is a CSV with a header row, as written by the scraper. Cell
//! parsers never fail: a value that cannot be understood becomes `None` and
//! only that record loses eligibility for the stage that needed it.

use crate::error::{DataLoadError, Result};
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Cell values read as "no value", matching the NA markers of the tools
/// that produce and consume the catalog.
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A",
    "<NA>",
];

/// Raw contents of a catalog file.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub has_bom: bool,
}

/// Read a CSV file into headers and rows of raw cells.
///
/// A leading UTF-8 BOM is stripped (and remembered). Header names are kept
/// verbatim so write-back reproduces them. Rows with a different number of
/// fields than the header are rejected.
pub fn read_table(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let bytes = fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let has_bom = bytes.starts_with(UTF8_BOM);
    let body = if has_bom { &bytes[UTF8_BOM.len()..] } else { &bytes[..] };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataLoadError::ParseError {
            file: file_name.clone(),
            line: 1,
            reason: e.to_string(),
        })?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| DataLoadError::ParseError {
            file: file_name.clone(),
            line: e.position().map(|p| p.line() as usize).unwrap_or(idx + 2),
            reason: e.to_string(),
        })?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok(RawTable {
        headers,
        rows,
        has_bom,
    })
}

/// Write headers and rows to `path`, replacing the file.
///
/// The table is written to a temporary file in the target's directory and
/// persisted over the target, so a failed write leaves the original untouched
/// and no temporary file behind.
pub fn write_table(path: &Path, table: &RawTable) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    if table.has_bom {
        tmp.write_all(UTF8_BOM)?;
    }
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| DataLoadError::IoError(e.error))?;
    Ok(())
}

/// Whether a raw cell should be treated as missing.
pub fn is_missing_cell(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

/// Parse a release date in `YYYYMMDD` form.
///
/// Example: "20240101" -> Some(2024-01-01)
///          "2024-01-01", "2024011", "20240230" -> None
pub fn parse_release_date(cell: &str) -> Option<NaiveDate> {
    let s = cell.trim();
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[4..6].parse().ok()?;
    let day: u32 = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a popularity value; anything non-numeric or NaN is `None`.
///
/// Infinite values are kept: "inf" outranks every finite popularity.
pub fn parse_popularity(cell: &str) -> Option<f64> {
    if is_missing_cell(cell) {
        return None;
    }
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| !value.is_nan())
}

/// Split a comma-separated cell into trimmed, non-empty tags.
///
/// Example: " action, hero ,," -> ["action", "hero"]
pub fn split_tags(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse the keyword cell; a missing cell is `None`.
pub fn parse_keywords(cell: &str) -> Option<Vec<String>> {
    if is_missing_cell(cell) {
        None
    } else {
        Some(split_tags(cell))
    }
}
