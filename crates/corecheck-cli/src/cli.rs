//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use corecheck_model::Series;

#[derive(Parser)]
#[command(
    name = "corecheck",
    version,
    about = "Core-data check - validate series records against the business rules",
    long_about = "Validate the maintenance records of the four business series\n\
                  (DEKISPART, DEKISPART_SCHOOL, INNOSITE, CLOUD) against the\n\
                  hand-coded check rules and report every violation as a\n\
                  [series, user id, maintenance id, check id] row."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the validation for one or all series.
    Run(RunArgs),

    /// List the check definitions.
    Checks(ChecksArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Series to validate. Repeatable; defaults to all four.
    #[arg(long = "series", value_name = "SERIES")]
    pub series: Vec<Series>,

    /// Directory containing the primary record exports
    /// (dekispart.csv, dekispart_school.csv, innosite.csv, cloud.csv).
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: PathBuf,

    /// Settings file carrying the auxiliary file paths.
    #[arg(long = "settings", value_name = "PATH", default_value = "app_settings.json")]
    pub settings: PathBuf,

    /// Check-definition file used to resolve display messages.
    #[arg(
        long = "definitions",
        value_name = "PATH",
        default_value = "check_definitions.json"
    )]
    pub definitions: PathBuf,

    /// Write the merged result table to this CSV file.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Disable the progress display.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

#[derive(Parser)]
pub struct ChecksArgs {
    /// Check-definition file to list.
    #[arg(
        long = "definitions",
        value_name = "PATH",
        default_value = "check_definitions.json"
    )]
    pub definitions: PathBuf,

    /// Only list checks of this series.
    #[arg(long = "series", value_name = "SERIES")]
    pub series: Option<Series>,
}
