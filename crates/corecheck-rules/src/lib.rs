//! Series rule sets.
//!
//! One module per business series, each carrying its field schema, its
//! reference-data bundle, its ordered rule set, and its run entry point.
//! The shared execution machinery lives in `corecheck-engine`; these
//! modules only encode the business predicates.

pub mod aux_names;
pub mod cloud;
pub mod common;
pub mod dekispart;
pub mod dekispart_school;
pub mod innosite;

pub use cloud::run_cloud_check;
pub use dekispart::run_dekispart_check;
pub use dekispart_school::run_dekispart_school_check;
pub use innosite::run_innosite_check;

use corecheck_engine::orchestrator::FetchError;
use corecheck_engine::progress::ProgressReporter;
use corecheck_model::{AuxPaths, Record, ResultTable, Series};

/// Dispatch a series run to its module.
pub fn run_series_check<F>(
    series: Series,
    aux: &AuxPaths,
    fetch: F,
    progress: &ProgressReporter,
) -> ResultTable
where
    F: FnOnce() -> Result<Vec<Record>, FetchError>,
{
    match series {
        Series::Dekispart => run_dekispart_check(aux, fetch, progress),
        Series::DekispartSchool => run_dekispart_school_check(aux, fetch, progress),
        Series::Innosite => run_innosite_check(aux, fetch, progress),
        Series::Cloud => run_cloud_check(aux, fetch, progress),
        Series::System => ResultTable::new(),
    }
}

/// The record schema a series expects from its data-fetch adapter.
pub fn schema_for(series: Series) -> corecheck_model::RecordSchema {
    match series {
        Series::Dekispart => dekispart::schema(),
        Series::DekispartSchool => dekispart_school::schema(),
        Series::Innosite => innosite::schema(),
        Series::Cloud => cloud::schema(),
        Series::System => corecheck_model::RecordSchema::new(),
    }
}
