use corecheck_model::{Record, Series, Value};

use corecheck_engine::{
    ProgressReporter, RecordIdentity, Rule, RuleError, RuleSet, run_rules,
};

const IDENTITY: RecordIdentity = RecordIdentity {
    record_id_field: "stdUserID",
    maintenance_id_field: "stdID",
};

fn record(user_id: &str, maintenance_id: &str) -> Record {
    Record::from_fields([
        ("stdUserID", Value::from(user_id)),
        ("stdID", Value::from(maintenance_id)),
    ])
}

fn rules_with(rules: Vec<Rule>) -> RuleSet {
    let mut set = RuleSet::new(Series::Dekispart, IDENTITY);
    for rule in rules {
        set.add(rule);
    }
    set
}

#[test]
fn clean_records_produce_an_empty_table() {
    let rules = rules_with(vec![Rule::per_record("check_len", |record, sink| {
        let id = record.require_text("stdUserID")?;
        if id.chars().count() != 8 {
            sink.report(id, "", "DEKISPART_CHK_LEN");
        }
        Ok(())
    })]);
    let records = vec![record("12345678", "A001")];
    let table = run_rules(&records, &rules, &ProgressReporter::silent());
    assert!(table.is_empty());
}

#[test]
fn single_violation_carries_the_record_identifiers() {
    let rules = rules_with(vec![Rule::per_record("check_len", |record, sink| {
        let id = record.require_text("stdUserID")?;
        if id.chars().count() != 8 {
            sink.report(id, "", "DEKISPART_CHK_LEN");
        }
        Ok(())
    })]);
    let records = vec![record("1234567", "A001")];
    let table = run_rules(&records, &rules, &ProgressReporter::silent());
    assert_eq!(table.len(), 1);
    let row = &table.rows()[0];
    assert_eq!(row.record_id, "1234567");
    assert_eq!(row.maintenance_id, "A001");
    assert_eq!(row.check_id, "DEKISPART_CHK_LEN");
}

#[test]
fn missing_field_becomes_a_column_missing_diagnostic() {
    // A rule reading a column the records do not carry must surface as a
    // diagnostic row, and later rules must still run for the same record.
    let rules = rules_with(vec![
        Rule::per_record("check_foo", |record, _sink| {
            record.require("stdFoo")?;
            Ok(())
        }),
        Rule::per_record("check_after", |record, sink| {
            sink.report(record.text_or_empty("stdUserID"), "", "DEKISPART_CHK_AFTER");
            Ok(())
        }),
    ]);
    let records = vec![record("01234567", "A001")];
    let table = run_rules(&records, &rules, &ProgressReporter::silent());
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.rows()[0].check_id,
        "COLUMN_MISSING_ERROR_check_foo: 'stdFoo'"
    );
    assert_eq!(table.rows()[0].maintenance_id, "A001");
    assert_eq!(table.rows()[1].check_id, "DEKISPART_CHK_AFTER");
}

#[test]
fn failing_rule_isolates_per_record() {
    // One always-failing rule: every record gets exactly one diagnostic row
    // and every record is still evaluated by the healthy rule.
    let rules = rules_with(vec![
        Rule::per_record("check_broken", |_record, _sink| {
            Err(RuleError::unexpected("boom"))
        }),
        Rule::per_record("check_healthy", |record, sink| {
            sink.report(record.text_or_empty("stdUserID"), "", "DEKISPART_CHK_OK");
            Ok(())
        }),
    ]);
    let records = vec![record("U1", "M1"), record("U2", "M2"), record("U3", "M3")];
    let table = run_rules(&records, &rules, &ProgressReporter::silent());
    assert_eq!(table.len(), 6);
    let diagnostics = table
        .iter()
        .filter(|row| row.check_id == "UNEXPECTED_ERROR_check_broken: boom")
        .count();
    assert_eq!(diagnostics, 3);
    let healthy = table
        .iter()
        .filter(|row| row.check_id == "DEKISPART_CHK_OK")
        .count();
    assert_eq!(healthy, 3);
}

#[test]
fn panicking_rule_is_contained() {
    let rules = rules_with(vec![
        Rule::per_record("check_panics", |_record, _sink| panic!("rule exploded")),
        Rule::per_record("check_healthy", |record, sink| {
            sink.report(record.text_or_empty("stdUserID"), "", "DEKISPART_CHK_OK");
            Ok(())
        }),
    ]);
    let records = vec![record("U1", "M1"), record("U2", "M2")];
    let table = run_rules(&records, &rules, &ProgressReporter::silent());
    assert_eq!(table.len(), 4);
    assert_eq!(
        table.rows()[0].check_id,
        "UNEXPECTED_ERROR_check_panics: rule exploded"
    );
}

#[test]
fn duplicate_detection_reports_each_occurrence() {
    let rules = rules_with(vec![Rule::dataset("check_duplicates", |records, sink| {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for record in records {
            let id = record.text_or_empty("stdUserID");
            if !id.trim().is_empty() {
                *counts.entry(id).or_default() += 1;
            }
        }
        for record in records {
            let id = record.text_or_empty("stdUserID");
            if counts.get(&id).copied().unwrap_or(0) >= 2 {
                sink.report(id, record.text_or_empty("stdID"), "DEKISPART_CHK_DUP");
            }
        }
        Ok(())
    })]);
    let records = vec![record("DUP01", "M1"), record("U2", "M2"), record("DUP01", "M3")];
    let table = run_rules(&records, &rules, &ProgressReporter::silent());
    assert_eq!(table.len(), 2);
    assert!(table.iter().all(|row| row.record_id == "DUP01"));
    assert!(table.iter().all(|row| row.check_id == "DEKISPART_CHK_DUP"));
}

#[test]
fn dataset_phase_runs_before_per_record_phase() {
    let rules = rules_with(vec![
        Rule::per_record("check_record", |record, sink| {
            sink.report(record.text_or_empty("stdUserID"), "", "PER_RECORD");
            Ok(())
        }),
        Rule::dataset("check_dataset", |_records, sink| {
            sink.report("N/A", "", "DATASET");
            Ok(())
        }),
    ]);
    let records = vec![record("U1", "")];
    let table = run_rules(&records, &rules, &ProgressReporter::silent());
    let ids: Vec<&str> = table.iter().map(|row| row.check_id.as_str()).collect();
    assert_eq!(ids, ["DATASET", "PER_RECORD"]);
}

#[test]
fn reruns_are_byte_identical() {
    let build = || {
        rules_with(vec![
            Rule::per_record("check_len", |record, sink| {
                let id = record.require_text("stdUserID")?;
                if id.chars().count() != 8 {
                    sink.report(id, "", "DEKISPART_CHK_LEN");
                }
                Ok(())
            }),
            Rule::per_record("check_broken", |_record, _sink| {
                Err(RuleError::unexpected("boom"))
            }),
        ])
    };
    let records = vec![record("123", "M1"), record("12345678", "M2")];
    let first = run_rules(&records, &build(), &ProgressReporter::silent());
    let second = run_rules(&records, &build(), &ProgressReporter::silent());
    assert_eq!(first, second);
}
