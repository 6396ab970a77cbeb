//! Error types for the data model.

use std::path::PathBuf;

use thiserror::Error;

/// A rule asked for a column the record does not carry.
///
/// Renders as `'field'` so diagnostic check ids read
/// `COLUMN_MISSING_ERROR_<rule>: 'field'`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{field}'")]
pub struct MissingField {
    pub field: String,
}

impl MissingField {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

/// Errors raised while loading the check-definition catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read check definitions {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse check definitions {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
