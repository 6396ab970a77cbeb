//! Header-mapped CSV row reading.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use csv::ReaderBuilder;

use crate::decode::read_decoded;
use crate::error::{IngestError, Result};

/// Read a CSV file into a vector of row maps, one `BTreeMap` per row keyed
/// by column header. Headers are trimmed; cell values are kept as-is (the
/// rules decide their own trimming). Fully blank rows are skipped.
pub fn read_rows(path: &Path) -> Result<Vec<BTreeMap<String, String>>> {
    let text = read_decoded(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(Cursor::new(text));

    let headers: Vec<String> = reader
        .headers()
        .map_err(|error| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?
        .iter()
        .map(|header| header.trim().trim_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let mut row = BTreeMap::new();
        for (idx, header) in headers.iter().enumerate() {
            let value = record.get(idx).unwrap_or("");
            row.insert(header.clone(), value.to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Like [`read_rows`], but verifies the required columns are present in the
/// header before returning any data.
pub fn read_rows_with_required(
    path: &Path,
    required_columns: &[&str],
) -> Result<Vec<BTreeMap<String, String>>> {
    let rows = read_rows(path)?;
    let header_check: &BTreeMap<String, String> = match rows.first() {
        Some(row) => row,
        None => {
            // No data rows; re-read headers alone to validate the shape.
            return validate_headers_of_empty(path, required_columns).map(|()| rows);
        }
    };
    let missing: Vec<&str> = required_columns
        .iter()
        .copied()
        .filter(|column| !header_check.contains_key(*column))
        .collect();
    if missing.is_empty() {
        Ok(rows)
    } else {
        Err(IngestError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing.join(", "),
        })
    }
}

fn validate_headers_of_empty(path: &Path, required_columns: &[&str]) -> Result<()> {
    let text = read_decoded(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(Cursor::new(text));
    let headers: Vec<String> = reader
        .headers()
        .map_err(|error| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?
        .iter()
        .map(|header| header.trim().trim_matches('\u{feff}').to_string())
        .collect();
    let missing: Vec<&str> = required_columns
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == column))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(IngestError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing.join(", "),
        })
    }
}

/// Field value from a row map, empty string when absent.
pub fn get_field(row: &BTreeMap<String, String>, key: &str) -> String {
    row.get(key).cloned().unwrap_or_default()
}
