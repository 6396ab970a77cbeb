//! Typed materialization of primary record collections.

use std::path::Path;

use chrono::NaiveDate;

use corecheck_model::{FieldKind, Record, RecordSchema, Value};

use crate::error::Result;
use crate::rows::read_rows;

/// Load a primary record CSV, typing every cell through the series schema.
///
/// Cells that fail to parse as their declared kind are kept as strings so
/// the affected rules see the malformed text (and report it) instead of
/// the loader guessing; empty cells become `Null`.
pub fn load_records(path: &Path, schema: &RecordSchema) -> Result<Vec<Record>> {
    let rows = read_rows(path)?;
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let mut record = Record::new();
        for (name, raw) in row {
            let kind = schema.kind_of(&name);
            record.insert(name, type_cell(&raw, kind));
        }
        records.push(record);
    }
    tracing::info!(path = %path.display(), records = records.len(), "records loaded");
    Ok(records)
}

fn type_cell(raw: &str, kind: FieldKind) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match kind {
        FieldKind::Str => Value::Str(raw.to_string()),
        FieldKind::Int => match trimmed.parse::<i64>() {
            Ok(n) => Value::Int(n),
            Err(_) => Value::Str(raw.to_string()),
        },
        FieldKind::Bool => match parse_flag(trimmed) {
            Some(b) => Value::Bool(b),
            None => Value::Str(raw.to_string()),
        },
        FieldKind::Date => match parse_date(trimmed) {
            Some(d) => Value::Date(d),
            None => Value::Str(raw.to_string()),
        },
    }
}

/// Boolean cell forms seen in the source exports.
pub(crate) fn parse_flag(text: &str) -> Option<bool> {
    match text {
        "1" => Some(true),
        "0" => Some(false),
        _ if text.eq_ignore_ascii_case("true") => Some(true),
        _ if text.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    // Dates arrive as plain dates or with a trailing time component.
    let date_part = text.split_whitespace().next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%Y/%m/%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use corecheck_model::FieldKind;

    use super::*;

    #[test]
    fn cells_are_typed_through_the_schema() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "stdUserID,stdNsyu,stdKaiyaku,stdReyear1,stdName\n01234567,121,False,2025-06-19,株式会社テスト\n"
        )
        .unwrap();
        file.flush().unwrap();

        let schema = RecordSchema::from_fields([
            ("stdNsyu", FieldKind::Int),
            ("stdKaiyaku", FieldKind::Bool),
            ("stdReyear1", FieldKind::Date),
        ]);
        let records = load_records(file.path(), &schema).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.int("stdNsyu"), Some(121));
        assert_eq!(record.flag("stdKaiyaku"), Some(false));
        assert_eq!(
            record.date("stdReyear1"),
            NaiveDate::from_ymd_opt(2025, 6, 19)
        );
        assert_eq!(record.text_or_empty("stdName"), "株式会社テスト");
    }

    #[test]
    fn unparseable_typed_cells_stay_strings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "stdNsyu,stdReyear1\nabc,not-a-date\n").unwrap();
        file.flush().unwrap();

        let schema = RecordSchema::from_fields([
            ("stdNsyu", FieldKind::Int),
            ("stdReyear1", FieldKind::Date),
        ]);
        let records = load_records(file.path(), &schema).unwrap();
        let record = &records[0];
        assert_eq!(record.int("stdNsyu"), None);
        assert_eq!(record.text_or_empty("stdNsyu"), "abc");
        assert_eq!(record.date("stdReyear1"), None);
        assert_eq!(record.text_or_empty("stdReyear1"), "not-a-date");
    }

    #[test]
    fn empty_cells_become_null() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "stdUserID,stdTan1\nU1,\n").unwrap();
        file.flush().unwrap();

        let records = load_records(file.path(), &RecordSchema::new()).unwrap();
        assert!(records[0].get("stdTan1").unwrap().is_null());
    }
}
