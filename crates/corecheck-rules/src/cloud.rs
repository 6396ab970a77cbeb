//! CLOUD series checks.
//!
//! Validates the cloud subscription table. The primary identifier is
//! `cldUserID`; `cldID` is the maintenance tracking number.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Local, NaiveDate};

use corecheck_engine::orchestrator::{FetchError, MissingPrerequisite, run_series};
use corecheck_engine::progress::ProgressReporter;
use corecheck_engine::rule::{Rule, RuleResult};
use corecheck_engine::ruleset::{RecordIdentity, RuleSet};
use corecheck_engine::sink::ViolationSink;
use corecheck_model::{AuxPaths, FieldKind, Record, RecordSchema, ResultTable, Series, Value};

use crate::aux_names;
use crate::common::{load_optional, load_required, report_duplicates};

pub const SERIES: Series = Series::Cloud;

/// Column names of the primary export.
pub mod fields {
    pub const CLD_ID: &str = "cldID";
    pub const CLD_USER_ID: &str = "cldUserID";
    pub const CLD_PLAN: &str = "cldPlan";
    pub const CLD_SALE1: &str = "cldSale1";
    pub const CLD_SALE2: &str = "cldSale2";
    pub const CLD_NSYU: &str = "cldNsyu";
    pub const CLD_KAIYAKU: &str = "cldKaiyaku";
    pub const CLD_FLG1: &str = "cldFlg1";
    pub const CLD_TSELNO: &str = "cldTselno";
    pub const CLD_START_DAY: &str = "cldStartDay";
    pub const CLD_END_DAY: &str = "cldEndDay";
    pub const CLD_MAIL: &str = "cldMail";
}

pub const IDENTITY: RecordIdentity = RecordIdentity {
    record_id_field: fields::CLD_USER_ID,
    maintenance_id_field: fields::CLD_ID,
};

pub fn schema() -> RecordSchema {
    RecordSchema::from_fields([
        (fields::CLD_KAIYAKU, FieldKind::Bool),
        (fields::CLD_FLG1, FieldKind::Bool),
        (fields::CLD_NSYU, FieldKind::Int),
        (fields::CLD_START_DAY, FieldKind::Date),
        (fields::CLD_END_DAY, FieldKind::Date),
    ])
}

#[derive(Clone)]
pub struct CloudRefs {
    pub totalnet: Arc<BTreeSet<String>>,
    pub excluded_sales: Arc<BTreeSet<String>>,
}

pub fn load_refs(aux: &AuxPaths) -> Result<CloudRefs, MissingPrerequisite> {
    let totalnet = load_required(aux, aux_names::TOTALNET_LIST, corecheck_ingest::load_totalnet)
        .unwrap_or_default();
    if totalnet.is_empty() {
        return Err(MissingPrerequisite::one("TOTALNET"));
    }
    let excluded_sales = load_optional(aux, aux_names::EXCLUDED_SALES, |path| {
        corecheck_ingest::load_code_set(path, "salCode")
    })
    .unwrap_or_default();

    Ok(CloudRefs {
        totalnet: Arc::new(totalnet),
        excluded_sales: Arc::new(excluded_sales),
    })
}

fn note(record: &Record, sink: &mut ViolationSink, check_id: &str) {
    sink.report(
        record.text_or_empty(fields::CLD_USER_ID),
        record.text_or_empty(fields::CLD_ID),
        check_id,
    );
}

fn loose_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(date) => Some(*date),
        Value::Str(raw) => {
            let date_part = raw.trim().split_whitespace().next()?;
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(date_part, "%Y/%m/%d"))
                .ok()
        }
        _ => None,
    }
}

fn check_0001(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    // IDは数字8桁
    let id = record.require_text(fields::CLD_USER_ID)?;
    if id.chars().count() != 8 || !id.chars().all(char::is_numeric) {
        note(record, sink, "CLOUD_CHK_0001");
    }
    Ok(())
}

fn check_0002(records: &[Record], sink: &mut ViolationSink) -> RuleResult {
    report_duplicates(
        records,
        sink,
        fields::CLD_USER_ID,
        fields::CLD_ID,
        "CLOUD_CHK_0002",
    );
    Ok(())
}

fn check_0003(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    let value = record.require(fields::CLD_SALE1)?;
    if value.is_null() {
        return Ok(());
    }
    let code = value.to_text();
    let code = code.trim();
    if code.is_empty() {
        return Ok(());
    }
    let length = code.chars().count();
    let valid = (code.chars().all(char::is_numeric) && length == 6)
        || (code.starts_with("kshh") && length == 4)
        || code.starts_with('A');
    if !valid {
        note(record, sink, "CLOUD_CHK_0003");
    }
    Ok(())
}

fn check_0004(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_text(fields::CLD_SALE1)?.contains("ksALL") {
        note(record, sink, "CLOUD_CHK_0004");
    }
    Ok(())
}

fn check_0005(
    record: &Record,
    sink: &mut ViolationSink,
    totalnet: &BTreeSet<String>,
) -> RuleResult {
    if record.require_text(fields::CLD_NSYU)? == "121"
        && !totalnet.contains(record.require_text(fields::CLD_USER_ID)?.as_str())
    {
        note(record, sink, "CLOUD_CHK_0005");
    }
    Ok(())
}

fn check_0006(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::CLD_KAIYAKU)? == Some(true)
        && record.require_flag(fields::CLD_FLG1)? == Some(true)
    {
        note(record, sink, "CLOUD_CHK_0006");
    }
    Ok(())
}

fn check_0007(
    record: &Record,
    sink: &mut ViolationSink,
    excluded: &BTreeSet<String>,
) -> RuleResult {
    if record.require_flag(fields::CLD_KAIYAKU)? != Some(true)
        && excluded.contains(record.text_or_empty(fields::CLD_TSELNO).as_str())
    {
        note(record, sink, "CLOUD_CHK_0007");
    }
    Ok(())
}

fn check_0008(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::CLD_KAIYAKU)? != Some(true)
        && record.is_blank(fields::CLD_TSELNO)
    {
        note(record, sink, "CLOUD_CHK_0008");
    }
    Ok(())
}

fn check_0009(record: &Record, sink: &mut ViolationSink, today: NaiveDate) -> RuleResult {
    if record.require_flag(fields::CLD_KAIYAKU)? != Some(true) {
        if let Some(end) = loose_date(record.require(fields::CLD_END_DAY)?) {
            if end < today {
                note(record, sink, "CLOUD_CHK_0009");
            }
        }
    }
    Ok(())
}

fn check_0010(record: &Record, sink: &mut ViolationSink, today: NaiveDate) -> RuleResult {
    if record.require_flag(fields::CLD_KAIYAKU)? == Some(true) {
        if let Some(end) = loose_date(record.require(fields::CLD_END_DAY)?) {
            if end > today {
                note(record, sink, "CLOUD_CHK_0010");
            }
        }
    }
    Ok(())
}

fn check_0011(record: &Record, sink: &mut ViolationSink, today: NaiveDate) -> RuleResult {
    if record.require_flag(fields::CLD_KAIYAKU)? == Some(true) {
        if let Some(start) = loose_date(record.require(fields::CLD_START_DAY)?) {
            if start > today {
                note(record, sink, "CLOUD_CHK_0011");
            }
        }
    }
    Ok(())
}

/// 契約中サブスクリプションの必須項目チェック。
fn check_not_blank(
    record: &Record,
    sink: &mut ViolationSink,
    field: &str,
    check_id: &str,
) -> RuleResult {
    if record.require_flag(fields::CLD_KAIYAKU)? != Some(true)
        && record.require(field)?.is_blank()
    {
        note(record, sink, check_id);
    }
    Ok(())
}

pub fn build_rules(refs: &CloudRefs, today: NaiveDate) -> RuleSet {
    let mut set = RuleSet::new(SERIES, IDENTITY);

    set.add(Rule::dataset("check_0002", check_0002));

    set.add(Rule::per_record("check_0001", check_0001));
    set.add(Rule::per_record("check_0003", check_0003));
    set.add(Rule::per_record("check_0004", check_0004));
    let totalnet = Arc::clone(&refs.totalnet);
    set.add(Rule::per_record("check_0005", move |record, sink| {
        check_0005(record, sink, &totalnet)
    }));
    set.add(Rule::per_record("check_0006", check_0006));
    let excluded = Arc::clone(&refs.excluded_sales);
    set.add(Rule::per_record("check_0007", move |record, sink| {
        check_0007(record, sink, &excluded)
    }));
    set.add(Rule::per_record("check_0008", check_0008));
    set.add(Rule::per_record("check_0009", move |record, sink| {
        check_0009(record, sink, today)
    }));
    set.add(Rule::per_record("check_0010", move |record, sink| {
        check_0010(record, sink, today)
    }));
    set.add(Rule::per_record("check_0011", move |record, sink| {
        check_0011(record, sink, today)
    }));
    set.add(Rule::per_record("check_0012", |record, sink| {
        check_not_blank(record, sink, fields::CLD_PLAN, "CLOUD_CHK_0012")
    }));
    set.add(Rule::per_record("check_0013", |record, sink| {
        check_not_blank(record, sink, fields::CLD_MAIL, "CLOUD_CHK_0013")
    }));
    set.add(Rule::per_record("check_0014", |record, sink| {
        check_not_blank(record, sink, fields::CLD_START_DAY, "CLOUD_CHK_0014")
    }));
    set.add(Rule::per_record("check_0015", |record, sink| {
        check_not_blank(record, sink, fields::CLD_END_DAY, "CLOUD_CHK_0015")
    }));

    set
}

/// Run the CLOUD validation end to end.
pub fn run_cloud_check<F>(
    aux: &AuxPaths,
    fetch: F,
    progress: &ProgressReporter,
) -> ResultTable
where
    F: FnOnce() -> Result<Vec<Record>, FetchError>,
{
    let today = Local::now().date_naive();
    run_series(
        SERIES,
        || load_refs(aux),
        fetch,
        |refs| build_rules(&refs, today),
        progress,
    )
}
