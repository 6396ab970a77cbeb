//! Per-series run boundary.
//!
//! `run_series` is the only entry point a host calls for one series. It
//! always returns a result table: run-level failures (missing reference
//! data, empty primary fetch, anything that escapes the steps below) come
//! back as sentinel rows, never as errors or panics.

use std::panic::{AssertUnwindSafe, catch_unwind};

use corecheck_model::{Record, ResultTable, Series, Violation};

use crate::diagnostics::{
    SENTINEL_RECORD_ID, app_error_id, aux_missing_id, data_fetch_error_id,
};
use crate::engine::run_rules;
use crate::progress::ProgressReporter;
use crate::ruleset::RuleSet;

/// One or more hard-required reference datasets were missing or empty at
/// rule-set build time. Dataset names are logical names in upper snake
/// case (for example `TOTALNET`).
#[derive(Debug, Clone)]
pub struct MissingPrerequisite {
    pub datasets: Vec<String>,
}

impl MissingPrerequisite {
    pub fn one(dataset: impl Into<String>) -> Self {
        Self {
            datasets: vec![dataset.into()],
        }
    }
}

/// Fetch error type of the external data adapter.
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Run one series end to end.
///
/// 1. `load_refs` loads every reference dataset the series needs, exactly
///    once; a missing hard-required dataset aborts the run with one
///    sentinel row per missing dataset, before the primary fetch happens.
/// 2. `fetch` produces the primary record collection; an empty collection
///    or a fetch error yields a single "no data" sentinel row.
/// 3. `build` binds the rule set to the loaded reference data.
/// 4. The engine runs and the series column is forced onto every row.
///
/// Anything that escapes these steps, panics included, is caught here and
/// reported as a one-row diagnostic table.
pub fn run_series<R, L, F, B>(
    series: Series,
    load_refs: L,
    fetch: F,
    build: B,
    progress: &ProgressReporter,
) -> ResultTable
where
    L: FnOnce() -> Result<R, MissingPrerequisite>,
    F: FnOnce() -> Result<Vec<Record>, FetchError>,
    B: FnOnce(R) -> RuleSet,
{
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        run_series_steps(series, load_refs, fetch, build, progress)
    }));
    match outcome {
        Ok(table) => table,
        Err(_) => {
            tracing::error!(series = %series, "series run panicked");
            sentinel(series, app_error_id(series))
        }
    }
}

fn run_series_steps<R, L, F, B>(
    series: Series,
    load_refs: L,
    fetch: F,
    build: B,
    progress: &ProgressReporter,
) -> ResultTable
where
    L: FnOnce() -> Result<R, MissingPrerequisite>,
    F: FnOnce() -> Result<Vec<Record>, FetchError>,
    B: FnOnce(R) -> RuleSet,
{
    progress.emit(&format!("{series}: loading reference data"));
    let refs = match load_refs() {
        Ok(refs) => refs,
        Err(missing) => {
            tracing::warn!(series = %series, datasets = ?missing.datasets, "missing reference data");
            let mut table = ResultTable::new();
            for dataset in &missing.datasets {
                table.push(Violation::new(
                    series,
                    SENTINEL_RECORD_ID,
                    "",
                    aux_missing_id(series, dataset),
                ));
            }
            return table;
        }
    };

    progress.emit(&format!("{series}: fetching records"));
    let records = match fetch() {
        Ok(records) => records,
        Err(error) => {
            tracing::error!(series = %series, %error, "primary fetch failed");
            return sentinel(series, data_fetch_error_id(series));
        }
    };
    if records.is_empty() {
        tracing::warn!(series = %series, "primary fetch returned no records");
        return sentinel(series, data_fetch_error_id(series));
    }

    progress.emit(&format!("{series}: running checks"));
    let rules = build(refs);
    let mut table = run_rules(&records, &rules, progress);
    table.force_series(series);
    table
}

fn sentinel(series: Series, check_id: String) -> ResultTable {
    ResultTable::from(vec![Violation::new(
        series,
        SENTINEL_RECORD_ID,
        "",
        check_id,
    )])
}
