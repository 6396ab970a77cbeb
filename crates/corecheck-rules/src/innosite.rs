//! INNOSITE series checks.
//!
//! Validates the INNOSiTE contract table (`t_stdidata` export). The
//! primary identifier is `stdiID`; `stdID_I` is the maintenance tracking
//! number.

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

pub const SERIES: Series = Series::Innosite;

/// Column names of the primary export.
pub mod fields {
    pub const STD_ID_I: &str = "stdID_I";
    pub const STDI_ID: &str = "stdiID";
    pub const STDI_SUP_ID: &str = "stdisupID";
    pub const STDI_NAME: &str = "stdiName";
    pub const STDI_SALE1: &str = "stdisale1";
    pub const STDI_SALE2: &str = "stdisale2";
    pub const STDI_NSYU: &str = "stdiNsyu";
    pub const STDI_KAIYAKU: &str = "stdiKaiyaku";
    pub const STDI_FLG1: &str = "stdiFlg1";
    pub const STDI_TSELNO: &str = "stdiTselno";
    pub const STDI_REYEAR1: &str = "stdiReyear1";
    pub const STDI_REYEAR2: &str = "stdiReyear2";
    pub const STDI_ACDAY: &str = "stdiAcday";
    pub const STDI_REMON: &str = "stdiRemon";
}

pub const IDENTITY: RecordIdentity = RecordIdentity {
    record_id_field: fields::STDI_ID,
    maintenance_id_field: fields::STD_ID_I,
};

pub fn schema() -> RecordSchema {
    RecordSchema::from_fields([
        (fields::STDI_KAIYAKU, FieldKind::Bool),
        (fields::STDI_FLG1, FieldKind::Bool),
        (fields::STDI_NSYU, FieldKind::Int),
        (fields::STDI_REMON, FieldKind::Int),
        (fields::STDI_REYEAR1, FieldKind::Date),
        (fields::STDI_REYEAR2, FieldKind::Date),
        (fields::STDI_ACDAY, FieldKind::Date),
    ])
}

#[derive(Clone)]
pub struct InnositeRefs {
    pub totalnet: Arc<BTreeSet<String>>,
    pub excluded_sales: Arc<BTreeSet<String>>,
}

pub fn load_refs(aux: &AuxPaths) -> Result<InnositeRefs, MissingPrerequisite> {
    let totalnet = load_required(aux, aux_names::TOTALNET_LIST, corecheck_ingest::load_totalnet)
        .unwrap_or_default();
    if totalnet.is_empty() {
        return Err(MissingPrerequisite::one("TOTALNET"));
    }
    let excluded_sales = load_optional(aux, aux_names::EXCLUDED_SALES, |path| {
        corecheck_ingest::load_code_set(path, "salCode")
    })
    .unwrap_or_default();

    Ok(InnositeRefs {
        totalnet: Arc::new(totalnet),
        excluded_sales: Arc::new(excluded_sales),
    })
}

fn note(record: &Record, sink: &mut ViolationSink, check_id: &str) {
    sink.report(
        record.text_or_empty(fields::STDI_ID),
        record.text_or_empty(fields::STD_ID_I),
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
    let id = record.require_text(fields::STDI_ID)?;
    if id.chars().count() != 8 || !id.chars().all(char::is_numeric) {
        note(record, sink, "INNOSITE_CHK_0001");
    }
    Ok(())
}

fn check_0002(records: &[Record], sink: &mut ViolationSink) -> RuleResult {
    report_duplicates(
        records,
        sink,
        fields::STDI_ID,
        fields::STD_ID_I,
        "INNOSITE_CHK_0002",
    );
    Ok(())
}

fn check_0003(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    let supp = record.require(fields::STDI_SUP_ID)?;
    if supp.is_null() {
        return Ok(());
    }
    let supp_head: String = supp.to_text().chars().take(8).collect();
    let id_head: String = record
        .require_text(fields::STDI_ID)?
        .chars()
        .take(8)
        .collect();
    if id_head != supp_head {
        note(record, sink, "INNOSITE_CHK_0003");
    }
    Ok(())
}

fn check_0004(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    let value = record.require(fields::STDI_SALE1)?;
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
        note(record, sink, "INNOSITE_CHK_0004");
    }
    Ok(())
}

fn check_0005(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_text(fields::STDI_SALE1)?.contains("ksALL") {
        note(record, sink, "INNOSITE_CHK_0005");
    }
    Ok(())
}

/// The named dealers resell through a second channel; stdisale2 must be set.
fn check_sale1_needs_sale2(
    record: &Record,
    sink: &mut ViolationSink,
    sale_code: &str,
    check_id: &str,
) -> RuleResult {
    if record.text_or_empty(fields::STDI_SALE1) == sale_code
        && record.text_or_empty(fields::STDI_SALE2).trim().is_empty()
    {
        note(record, sink, check_id);
    }
    Ok(())
}

/// Dealers on direct-debit collection: the payment route must be 211.
fn check_sale1_route_211(
    record: &Record,
    sink: &mut ViolationSink,
    sale_code: &str,
    check_id: &str,
) -> RuleResult {
    if record.text_or_empty(fields::STDI_SALE1) == sale_code
        && record.text_or_empty(fields::STDI_NSYU) != "211"
    {
        note(record, sink, check_id);
    }
    Ok(())
}

fn check_0014(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STDI_KAIYAKU)? == Some(true)
        && record.require_flag(fields::STDI_FLG1)? == Some(true)
    {
        note(record, sink, "INNOSITE_CHK_0014");
    }
    Ok(())
}

fn check_0015(
    record: &Record,
    sink: &mut ViolationSink,
    totalnet: &BTreeSet<String>,
) -> RuleResult {
    if record.require_text(fields::STDI_NSYU)? == "121"
        && !totalnet.contains(record.require_text(fields::STDI_ID)?.as_str())
    {
        note(record, sink, "INNOSITE_CHK_0015");
    }
    Ok(())
}

fn check_0016(
    record: &Record,
    sink: &mut ViolationSink,
    excluded: &BTreeSet<String>,
) -> RuleResult {
    if record.require_flag(fields::STDI_KAIYAKU)? != Some(true)
        && excluded.contains(record.text_or_empty(fields::STDI_TSELNO).as_str())
    {
        note(record, sink, "INNOSITE_CHK_0016");
    }
    Ok(())
}

fn check_0017(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STDI_KAIYAKU)? != Some(true)
        && record.is_blank(fields::STDI_TSELNO)
    {
        note(record, sink, "INNOSITE_CHK_0017");
    }
    Ok(())
}

fn check_0018(record: &Record, sink: &mut ViolationSink, today: NaiveDate) -> RuleResult {
    if record.require_flag(fields::STDI_KAIYAKU)? != Some(true) {
        if let Some(expiry) = loose_date(record.require(fields::STDI_REYEAR1)?) {
            if expiry < today {
                note(record, sink, "INNOSITE_CHK_0018");
            }
        }
    }
    Ok(())
}

fn check_0019(record: &Record, sink: &mut ViolationSink, today: NaiveDate) -> RuleResult {
    if record.require_flag(fields::STDI_KAIYAKU)? == Some(true) {
        if let Some(expiry) = loose_date(record.require(fields::STDI_REYEAR1)?) {
            if expiry > today {
                note(record, sink, "INNOSITE_CHK_0019");
            }
        }
    }
    Ok(())
}

fn check_0020(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STDI_KAIYAKU)? != Some(true)
        && record.is_blank(fields::STDI_REMON)
    {
        note(record, sink, "INNOSITE_CHK_0020");
    }
    Ok(())
}

fn check_0021(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STDI_KAIYAKU)? != Some(true)
        && record.is_blank(fields::STDI_REYEAR1)
    {
        note(record, sink, "INNOSITE_CHK_0021");
    }
    Ok(())
}

fn check_0022(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STDI_KAIYAKU)? != Some(true)
        && record.is_blank(fields::STDI_REYEAR2)
    {
        note(record, sink, "INNOSITE_CHK_0022");
    }
    Ok(())
}

pub fn build_rules(refs: &InnositeRefs, today: NaiveDate) -> RuleSet {
    let mut set = RuleSet::new(SERIES, IDENTITY);

    set.add(Rule::dataset("check_0002", check_0002));

    set.add(Rule::per_record("check_0001", check_0001));
    set.add(Rule::per_record("check_0003", check_0003));
    set.add(Rule::per_record("check_0004", check_0004));
    set.add(Rule::per_record("check_0005", check_0005));
    set.add(Rule::per_record("check_0006", |record, sink| {
        check_sale1_needs_sale2(record, sink, "004359", "INNOSITE_CHK_0006")
    }));
    set.add(Rule::per_record("check_0007", |record, sink| {
        check_sale1_needs_sale2(record, sink, "000286", "INNOSITE_CHK_0007")
    }));
    set.add(Rule::per_record("check_0008", |record, sink| {
        check_sale1_needs_sale2(record, sink, "001275", "INNOSITE_CHK_0008")
    }));
    set.add(Rule::per_record("check_0009", |record, sink| {
        check_sale1_route_211(record, sink, "000332", "INNOSITE_CHK_0009")
    }));
    set.add(Rule::per_record("check_0010", |record, sink| {
        check_sale1_route_211(record, sink, "A30777", "INNOSITE_CHK_0010")
    }));
    set.add(Rule::per_record("check_0011", |record, sink| {
        check_sale1_route_211(record, sink, "000583", "INNOSITE_CHK_0011")
    }));
    set.add(Rule::per_record("check_0012", |record, sink| {
        check_sale1_route_211(record, sink, "000659", "INNOSITE_CHK_0012")
    }));
    set.add(Rule::per_record("check_0013", |record, sink| {
        check_sale1_route_211(record, sink, "000759", "INNOSITE_CHK_0013")
    }));
    set.add(Rule::per_record("check_0014", check_0014));
    let totalnet = Arc::clone(&refs.totalnet);
    set.add(Rule::per_record("check_0015", move |record, sink| {
        check_0015(record, sink, &totalnet)
    }));
    let excluded = Arc::clone(&refs.excluded_sales);
    set.add(Rule::per_record("check_0016", move |record, sink| {
        check_0016(record, sink, &excluded)
    }));
    set.add(Rule::per_record("check_0017", check_0017));
    set.add(Rule::per_record("check_0018", move |record, sink| {
        check_0018(record, sink, today)
    }));
    set.add(Rule::per_record("check_0019", move |record, sink| {
        check_0019(record, sink, today)
    }));
    set.add(Rule::per_record("check_0020", check_0020));
    set.add(Rule::per_record("check_0021", check_0021));
    set.add(Rule::per_record("check_0022", check_0022));

    set
}

/// Run the INNOSITE validation end to end.
pub fn run_innosite_check<F>(
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
