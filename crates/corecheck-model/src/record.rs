//! Typed record abstraction over one row of series data.
//!
//! Records are materialized once per validation run and immutable while the
//! run is in progress. Field access comes in two flavors mirroring how the
//! rules consume columns: `get`-style accessors default silently when a
//! column is absent, `require`-style accessors surface the absence as a
//! [`MissingField`] error the engine converts into a diagnostic violation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::MissingField;
use crate::value::Value;

/// One row of series-specific data: field name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field access that treats an absent column as an error. This is the
    /// analogue of an indexing lookup in the source system and is what
    /// feeds the engine's `COLUMN_MISSING_ERROR_*` diagnostics.
    pub fn require(&self, name: &str) -> Result<&Value, MissingField> {
        self.fields.get(name).ok_or_else(|| MissingField::new(name))
    }

    /// Display text of a field; absent columns and nulls render empty.
    pub fn text_or_empty(&self, name: &str) -> String {
        self.get(name).map(Value::to_text).unwrap_or_default()
    }

    /// Display text of a required field.
    pub fn require_text(&self, name: &str) -> Result<String, MissingField> {
        self.require(name).map(Value::to_text)
    }

    /// Tri-state boolean: `Some(bool)` for a typed flag, `None` when the
    /// field is absent, null, or not a boolean. Callers decide whether
    /// "absent" behaves as false.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Tri-state boolean of a required column.
    pub fn require_flag(&self, name: &str) -> Result<Option<bool>, MissingField> {
        self.require(name).map(Value::as_bool)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.get(name).and_then(Value::as_date)
    }

    /// True when the field is absent, null, or whitespace-only.
    pub fn is_blank(&self, name: &str) -> bool {
        self.get(name).is_none_or(Value::is_blank)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Expected type of a source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    Int,
    Bool,
    Date,
}

/// Per-series column typing, compiled once and applied at ingest time.
/// Columns not listed default to [`FieldKind::Str`].
#[derive(Debug, Clone, Default)]
pub struct RecordSchema {
    kinds: BTreeMap<String, FieldKind>,
}

impl RecordSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldKind)>,
        K: Into<String>,
    {
        Self {
            kinds: fields
                .into_iter()
                .map(|(name, kind)| (name.into(), kind))
                .collect(),
        }
    }

    pub fn kind_of(&self, name: &str) -> FieldKind {
        self.kinds.get(name).copied().unwrap_or(FieldKind::Str)
    }
}

/// Configuration mapping from logical reference-dataset name to file path.
#[derive(Debug, Clone, Default)]
pub struct AuxPaths {
    paths: BTreeMap<String, PathBuf>,
}

impl AuxPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.paths.insert(name.into(), path.into());
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.paths.get(name).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.paths
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }
}

impl<K, P> FromIterator<(K, P)> for AuxPaths
where
    K: Into<String>,
    P: Into<PathBuf>,
{
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        Self {
            paths: iter
                .into_iter()
                .map(|(name, path)| (name.into(), path.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_reports_the_missing_field() {
        let record = Record::from_fields([("stdUserID", Value::from("01234567"))]);
        let err = record.require("stdFoo").unwrap_err();
        assert_eq!(err.field, "stdFoo");
        assert_eq!(err.to_string(), "'stdFoo'");
    }

    #[test]
    fn absent_field_is_blank_and_renders_empty() {
        let record = Record::new();
        assert!(record.is_blank("stdName"));
        assert_eq!(record.text_or_empty("stdName"), "");
    }

    #[test]
    fn flag_is_tri_state() {
        let record = Record::from_fields([
            ("a", Value::Bool(true)),
            ("b", Value::Bool(false)),
            ("c", Value::Null),
        ]);
        assert_eq!(record.flag("a"), Some(true));
        assert_eq!(record.flag("b"), Some(false));
        assert_eq!(record.flag("c"), None);
        assert_eq!(record.flag("d"), None);
    }

    #[test]
    fn schema_defaults_to_string() {
        let schema = RecordSchema::from_fields([("stdNsyu", FieldKind::Int)]);
        assert_eq!(schema.kind_of("stdNsyu"), FieldKind::Int);
        assert_eq!(schema.kind_of("stdName"), FieldKind::Str);
    }
}
