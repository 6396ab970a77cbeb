//! Command implementations.

use std::path::{Path, PathBuf};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use corecheck_engine::diagnostics::is_diagnostic_id;
use corecheck_engine::{ProgressReporter, merge};
use corecheck_model::{CheckCatalog, ResultTable, Series};
use corecheck_report::{Summary, write_results_csv};
use corecheck_rules::{run_series_check, schema_for};

use corecheck_cli::settings::AppSettings;

use crate::cli::{ChecksArgs, RunArgs};
use crate::summary::{print_checks_table, print_run_summary};

/// Outcome of a `run` invocation, used for the exit code.
pub struct RunOutcome {
    pub table: ResultTable,
    pub degraded: bool,
}

impl RunOutcome {
    pub fn has_violations(&self) -> bool {
        !self.table.is_empty()
    }
}

/// File name of a series' primary export inside the data directory.
fn data_file_name(series: Series) -> &'static str {
    match series {
        Series::Dekispart => "dekispart.csv",
        Series::DekispartSchool => "dekispart_school.csv",
        Series::Innosite => "innosite.csv",
        Series::Cloud => "cloud.csv",
        Series::System => "",
    }
}

/// Load the check catalog, tolerating an absent file (ids then render with
/// the unknown-id marker).
fn load_catalog(path: &Path) -> CheckCatalog {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "check definitions not found; raw check ids are reported");
        return CheckCatalog::new();
    }
    match CheckCatalog::load(path) {
        Ok(catalog) => catalog,
        Err(error) => {
            tracing::warn!(%error, "failed to load check definitions; raw check ids are reported");
            CheckCatalog::new()
        }
    }
}

pub fn run_checks(args: &RunArgs) -> Result<RunOutcome> {
    let settings = if args.settings.exists() {
        AppSettings::load(&args.settings)?
    } else {
        tracing::warn!(path = %args.settings.display(), "settings file not found; no auxiliary paths configured");
        AppSettings::default()
    };
    let aux = settings.aux_paths();
    let catalog = load_catalog(&args.definitions);

    let selected: Vec<Series> = if args.series.is_empty() {
        Series::ALL.to_vec()
    } else {
        args.series.clone()
    };

    let mut tables = Vec::with_capacity(selected.len());
    for series in selected {
        let data_path: PathBuf = args.data_dir.join(data_file_name(series));
        let schema = schema_for(series);

        let bar = progress_bar(args.no_progress);
        let reporter = {
            let bar = bar.clone();
            ProgressReporter::new(move |message| bar.set_message(message.to_string()))
        };

        tracing::info!(%series, data = %data_path.display(), "starting series run");
        let table = run_series_check(
            series,
            &aux,
            || corecheck_ingest::load_records(&data_path, &schema).map_err(Into::into),
            &reporter,
        );
        bar.finish_and_clear();
        tracing::info!(%series, violations = table.len(), "series run finished");
        tables.push(table);
    }

    let table = merge(tables);
    let degraded = table.iter().any(|row| is_diagnostic_id(&row.check_id));
    let summary = Summary::from_table(&table);
    print_run_summary(&summary, &catalog);

    if let Some(output) = &args.output {
        write_results_csv(output, &table, &catalog)?;
        println!("結果を保存しました: {}", output.display());
    }

    Ok(RunOutcome { table, degraded })
}

pub fn run_checks_listing(args: &ChecksArgs) -> Result<()> {
    let catalog = load_catalog(&args.definitions);
    print_checks_table(&catalog, args.series);
    Ok(())
}

fn progress_bar(disabled: bool) -> ProgressBar {
    if disabled {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar
}
