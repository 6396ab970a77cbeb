//! Error types for data ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading record or reference data.
#[derive(Debug, Error)]
pub enum IngestError {
    /// File not found or path invalid.
    #[error("file not found or path invalid: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file bytes.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No encoding in the candidate list could decode the file.
    #[error("could not decode {path} with any supported encoding")]
    Encoding { path: PathBuf },

    /// Failed to parse CSV content.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Required columns not present in the file.
    #[error("required column(s) missing in {path}: {columns}")]
    MissingColumns { path: PathBuf, columns: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
