//! Diagnostic check-id construction.
//!
//! Infrastructure failures are reported through the normal result table as
//! rows with recognizable check ids, never as exceptions to the caller.

use corecheck_model::Series;

/// Record id carried by run-level sentinel rows.
pub const SENTINEL_RECORD_ID: &str = "N/A";

/// Diagnostic id for a rule that read a column the record lacks.
pub fn column_missing_id(rule_name: &str, field: &str) -> String {
    format!("COLUMN_MISSING_ERROR_{rule_name}: '{field}'")
}

/// Diagnostic id for any other per-rule failure.
pub fn unexpected_error_id(rule_name: &str, detail: &str) -> String {
    format!("UNEXPECTED_ERROR_{rule_name}: {detail}")
}

/// Sentinel id for a missing or empty hard-required reference dataset.
/// `dataset` is the logical dataset name in upper snake case.
pub fn aux_missing_id(series: Series, dataset: &str) -> String {
    format!("{series}_CHK_AUX_FILE_{dataset}_MISSING")
}

/// Sentinel id for an empty or failed primary data fetch.
pub fn data_fetch_error_id(series: Series) -> String {
    format!("{series}_CHK_DATA_FETCH_ERROR")
}

/// Sentinel id for an uncaught failure at the series boundary.
pub fn app_error_id(series: Series) -> String {
    format!("{series}_CHK_APP_ERROR")
}

/// True when a check id marks a degraded run rather than a business-rule
/// violation. Callers that need to distinguish "clean validation" from
/// "validation degraded by infrastructure failure" inspect ids with this.
pub fn is_diagnostic_id(check_id: &str) -> bool {
    check_id.starts_with("COLUMN_MISSING_ERROR_")
        || check_id.starts_with("UNEXPECTED_ERROR_")
        || check_id.contains("_CHK_AUX_FILE_")
        || check_id.ends_with("_CHK_DATA_FETCH_ERROR")
        || check_id.ends_with("_CHK_APP_ERROR")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_formats() {
        assert_eq!(
            column_missing_id("check_0001", "stdFoo"),
            "COLUMN_MISSING_ERROR_check_0001: 'stdFoo'"
        );
        assert_eq!(
            aux_missing_id(Series::Dekispart, "TOTALNET"),
            "DEKISPART_CHK_AUX_FILE_TOTALNET_MISSING"
        );
        assert_eq!(
            data_fetch_error_id(Series::Cloud),
            "CLOUD_CHK_DATA_FETCH_ERROR"
        );
    }

    #[test]
    fn diagnostic_ids_are_recognized() {
        assert!(is_diagnostic_id("COLUMN_MISSING_ERROR_check_0001: 'stdFoo'"));
        assert!(is_diagnostic_id("UNEXPECTED_ERROR_check_0002: boom"));
        assert!(is_diagnostic_id("DEKISPART_CHK_AUX_FILE_TOTALNET_MISSING"));
        assert!(is_diagnostic_id("INNOSITE_CHK_DATA_FETCH_ERROR"));
        assert!(is_diagnostic_id("CLOUD_CHK_APP_ERROR"));
        assert!(!is_diagnostic_id("DEKISPART_CHK_0001"));
    }
}
