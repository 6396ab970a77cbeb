//! Helpers shared by the series modules.

use std::collections::BTreeMap;
use std::path::Path;

use corecheck_engine::sink::ViolationSink;
use corecheck_ingest::IngestError;
use corecheck_model::{AuxPaths, Record};

/// Load an optional reference dataset: absent path or a failed load yields
/// `None` with a warning, never an abort. Hard-required datasets go through
/// the series' own `load_refs` instead, where emptiness becomes a sentinel.
pub(crate) fn load_optional<T>(
    aux: &AuxPaths,
    key: &str,
    loader: impl FnOnce(&Path) -> Result<T, IngestError>,
) -> Option<T> {
    let path = aux.get(key)?;
    match loader(path) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(dataset = key, %error, "reference dataset unavailable; related checks are skipped");
            None
        }
    }
}

/// Load a hard-required reference dataset; a failed load is reported and
/// treated like an absent dataset so the caller can emit its sentinel.
pub(crate) fn load_required<T>(
    aux: &AuxPaths,
    key: &str,
    loader: impl FnOnce(&Path) -> Result<T, IngestError>,
) -> Option<T> {
    let path = aux.get(key)?;
    match loader(path) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::error!(dataset = key, %error, "failed to load required reference dataset");
            None
        }
    }
}

/// Occurrence counts of a non-blank id field across the whole collection.
/// Blank and absent ids never count, so they can never register as
/// duplicates.
pub(crate) fn id_occurrences(records: &[Record], id_field: &str) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        let id = record.text_or_empty(id_field);
        if id.trim().is_empty() {
            continue;
        }
        *counts.entry(id).or_default() += 1;
    }
    counts
}

/// Emit one duplicate-id violation per occurrence, so every offending row
/// shows up in the report with its own maintenance id.
pub(crate) fn report_duplicates(
    records: &[Record],
    sink: &mut ViolationSink,
    id_field: &str,
    maintenance_field: &str,
    check_id: &str,
) {
    let counts = id_occurrences(records, id_field);
    for record in records {
        let id = record.text_or_empty(id_field);
        if id.trim().is_empty() {
            continue;
        }
        if counts.get(&id).copied().unwrap_or(0) >= 2 {
            sink.report(id, record.text_or_empty(maintenance_field), check_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use corecheck_model::Value;

    use super::*;

    #[test]
    fn blank_ids_never_count_as_duplicates() {
        let records = vec![
            Record::from_fields([("id", Value::from(""))]),
            Record::from_fields([("id", Value::Null)]),
            Record::from_fields([("id", Value::from("A"))]),
        ];
        let counts = id_occurrences(&records, "id");
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("A"), Some(&1));
    }
}
