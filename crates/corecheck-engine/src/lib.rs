//! Validation rule engine.
//!
//! The engine runs many independent predicate rules over every record of a
//! series dataset, collects violations under stable check ids, isolates
//! per-rule failures so one bad rule cannot abort a batch, and merges
//! results from heterogeneous rule sets into one uniform result table.
//!
//! The external contract is deliberately narrow: a validation run for one
//! series always returns a [`ResultTable`](corecheck_model::ResultTable)
//! and never propagates an error to its caller. Infrastructure failures
//! surface as rows with diagnostic check ids.

pub mod aggregate;
pub mod diagnostics;
pub mod engine;
pub mod orchestrator;
pub mod progress;
pub mod rule;
pub mod ruleset;
pub mod sink;

pub use aggregate::merge;
pub use engine::{PROGRESS_INTERVAL, run_rules};
pub use orchestrator::{MissingPrerequisite, run_series};
pub use progress::ProgressReporter;
pub use rule::{Rule, RuleError, RuleResult};
pub use ruleset::{RecordIdentity, RuleSet};
pub use sink::ViolationSink;
