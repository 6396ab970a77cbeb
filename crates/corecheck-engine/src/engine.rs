//! The execution loop.

use std::panic::{AssertUnwindSafe, catch_unwind};

use corecheck_model::{Record, ResultTable};

use crate::diagnostics::{SENTINEL_RECORD_ID, column_missing_id, unexpected_error_id};
use crate::progress::ProgressReporter;
use crate::rule::{Rule, RuleError};
use crate::ruleset::RuleSet;
use crate::sink::ViolationSink;

/// Progress is reported every this many records, and always on the last.
pub const PROGRESS_INTERVAL: usize = 10;

/// Run a bound rule set over a record collection.
///
/// Whole-dataset rules run once, first; then every per-record rule runs
/// against every record in collection order. A single rule's failure on a
/// single record never stops evaluation of the remaining rules for that
/// record, nor of the remaining records: structural errors (and panics)
/// become diagnostic rows in the output instead.
///
/// Always returns a table; an empty table means no violations were found.
pub fn run_rules(
    records: &[Record],
    rules: &RuleSet,
    progress: &ProgressReporter,
) -> ResultTable {
    let series = rules.series();
    let identity = rules.identity();
    let mut sink = ViolationSink::new(series);

    for rule in rules.dataset_rules() {
        let outcome = catch_unwind(AssertUnwindSafe(|| rule.evaluate_dataset(records, &mut sink)));
        record_failure(&mut sink, rule, SENTINEL_RECORD_ID, "", outcome);
    }

    let total = records.len();
    for (index, record) in records.iter().enumerate() {
        let record_id = record.text_or_empty(identity.record_id_field);
        let maintenance_id = record.text_or_empty(identity.maintenance_id_field);
        let first_row = sink.len();

        for rule in rules.record_rules() {
            let outcome = catch_unwind(AssertUnwindSafe(|| rule.evaluate_record(record, &mut sink)));
            record_failure(&mut sink, rule, &record_id, &maintenance_id, outcome);
        }

        sink.backfill_maintenance(first_row, &maintenance_id);

        if index % PROGRESS_INTERVAL == 0 || index + 1 == total {
            progress.emit(&format!(
                "{series}: checking {record_id} ({}/{total})",
                index + 1
            ));
        }
    }

    tracing::debug!(
        series = %series,
        records = total,
        violations = sink.len(),
        "rule evaluation finished"
    );
    sink.into_table()
}

/// Convert a failed rule evaluation into a diagnostic row. Normal returns
/// pass through untouched.
fn record_failure(
    sink: &mut ViolationSink,
    rule: &Rule,
    record_id: &str,
    maintenance_id: &str,
    outcome: std::thread::Result<Result<(), RuleError>>,
) {
    let check_id = match outcome {
        Ok(Ok(())) => return,
        Ok(Err(RuleError::MissingField(missing))) => {
            column_missing_id(rule.name(), &missing.field)
        }
        Ok(Err(error)) => unexpected_error_id(rule.name(), &error.to_string()),
        Err(panic) => unexpected_error_id(rule.name(), &panic_detail(&panic)),
    };
    tracing::warn!(rule = rule.name(), record_id, %check_id, "rule failed");
    sink.report(record_id, maintenance_id, check_id);
}

fn panic_detail(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use corecheck_model::{Record, Series, Value};

    use super::*;
    use crate::rule::RuleResult;
    use crate::ruleset::RecordIdentity;

    const IDENTITY: RecordIdentity = RecordIdentity {
        record_id_field: "id",
        maintenance_id_field: "mnt",
    };

    fn record(id: &str, mnt: &str) -> Record {
        Record::from_fields([("id", Value::from(id)), ("mnt", Value::from(mnt))])
    }

    fn blank_id_rule(record: &Record, sink: &mut ViolationSink) -> RuleResult {
        if record.is_blank("id") {
            sink.report(record.text_or_empty("id"), "", "TEST_CHK_BLANK");
        }
        Ok(())
    }

    #[test]
    fn maintenance_id_is_backfilled() {
        let mut rules = RuleSet::new(Series::Dekispart, IDENTITY);
        rules.add(Rule::per_record("check_blank", blank_id_rule));
        let records = vec![record("", "M001")];
        let table = run_rules(&records, &rules, &ProgressReporter::silent());
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].maintenance_id, "M001");
    }

    #[test]
    fn missing_identity_fields_become_empty_strings() {
        let mut rules = RuleSet::new(Series::Dekispart, IDENTITY);
        rules.add(Rule::per_record("check_noop", |_, _| Ok(())));
        let records = vec![Record::new()];
        let table = run_rules(&records, &rules, &ProgressReporter::silent());
        assert!(table.is_empty());
    }

    #[test]
    fn progress_fires_on_interval_and_last_record() {
        use std::sync::{Arc, Mutex};
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&seen);
        let reporter = ProgressReporter::new(move |message| {
            captured.lock().unwrap().push(message.to_string());
        });
        let rules = RuleSet::new(Series::Innosite, IDENTITY);
        let records: Vec<Record> = (0..25).map(|i| record(&format!("U{i:03}"), "")).collect();
        run_rules(&records, &rules, &reporter);
        let messages = seen.lock().unwrap();
        // Indices 0, 10, 20 plus the final record.
        assert_eq!(
            messages.as_slice(),
            &[
                "INNOSITE: checking U000 (1/25)",
                "INNOSITE: checking U010 (11/25)",
                "INNOSITE: checking U020 (21/25)",
                "INNOSITE: checking U024 (25/25)",
            ]
        );
    }
}
