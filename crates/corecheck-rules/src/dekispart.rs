//! DEKISPART series checks.
//!
//! Validates the maintenance-contract table (`T_stdData` export). The
//! primary identifier is `stdUserID`; `stdID` is the maintenance tracking
//! number carried for traceability.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Local, Months, NaiveDate};

use corecheck_engine::orchestrator::{FetchError, MissingPrerequisite, run_series};
use corecheck_engine::progress::ProgressReporter;
use corecheck_engine::rule::{Rule, RuleResult};
use corecheck_engine::ruleset::{RecordIdentity, RuleSet};
use corecheck_engine::sink::ViolationSink;
use corecheck_model::{
    AuxPaths, CustomerMaster, FieldKind, LinkedItemSets, Record, RecordSchema, ResultTable,
    SalesChannelMaster, SalesPersonMaster, Series, Value,
};

use crate::aux_names;
use crate::common::{load_optional, load_required, report_duplicates};

pub const SERIES: Series = Series::Dekispart;

/// Column names of the primary export.
pub mod fields {
    pub const STD_ID: &str = "stdID";
    pub const STD_USER_ID: &str = "stdUserID";
    pub const STD_ITM_S: &str = "stdItmS";
    pub const STD_KAIYAKU: &str = "stdKaiyaku";
    pub const STD_SUPP_ID: &str = "stdSuppID";
    pub const STD_FLG1: &str = "stdFlg1";
    pub const STD_FLG3: &str = "stdFlg3";
    pub const STD_FLG4: &str = "stdFlg4";
    pub const STD_NAME: &str = "stdName";
    pub const STD_NAMEF: &str = "stdNamef";
    pub const STD_TAN1: &str = "stdTan1";
    pub const STD_NAM_CODE: &str = "stdNamCode";
    pub const STD_SALE1: &str = "stdSale1";
    pub const STD_SALE2: &str = "stdSale2";
    pub const STD_SALE_NAM1: &str = "stdSaleNam1";
    pub const STD_ADD: &str = "stdAdd";
    pub const STD_ZIP: &str = "stdZip";
    pub const STD_TELL: &str = "stdTell";
    pub const STD_SBIKO: &str = "stdSbiko";
    pub const STD_BIKO3: &str = "stdbiko3";
    pub const STD_BIKO4: &str = "stdbiko4";
    pub const STD_KBIKO: &str = "stdKbiko";
    pub const STD_KAINSYU: &str = "stdKainsyu";
    pub const STD_TSEL: &str = "stdTsel";
    pub const STD_TPLA: &str = "stdTpla";
    pub const STD_NSYU: &str = "stdNsyu";
    pub const STD_HASSOU_TYPE: &str = "stdHassouType";
    pub const STD_JIFURI_DM: &str = "stdJifuriDM";
    pub const STD_NON_RENEWAL: &str = "stdNonRenewal";
    pub const STD_REYEAR1: &str = "stdReyear1";
    pub const STD_REYEAR2: &str = "stdReyear2";
    pub const STD_ACDAY: &str = "stdAcday";
    pub const STD_REMON: &str = "stdRemon";
    pub const STD_ACYEAR: &str = "stdAcyear";
}

pub const IDENTITY: RecordIdentity = RecordIdentity {
    record_id_field: fields::STD_USER_ID,
    maintenance_id_field: fields::STD_ID,
};

/// Branch offices assumed valid when the sales-person master carries no
/// department codes at all.
const FALLBACK_BRANCHES: [&str; 19] = [
    "九州", "仙台", "会社", "北陸", "南九州", "名古屋", "四国", "大手", "広島", "建築",
    "新潟", "本社", "本社第1", "本社第2", "札幌", "盛岡", "福岡", "関東", "関西",
];

pub fn schema() -> RecordSchema {
    RecordSchema::from_fields([
        (fields::STD_KAIYAKU, FieldKind::Bool),
        (fields::STD_FLG1, FieldKind::Bool),
        (fields::STD_FLG3, FieldKind::Bool),
        (fields::STD_FLG4, FieldKind::Bool),
        (fields::STD_JIFURI_DM, FieldKind::Bool),
        (fields::STD_NON_RENEWAL, FieldKind::Bool),
        (fields::STD_NSYU, FieldKind::Int),
        (fields::STD_HASSOU_TYPE, FieldKind::Int),
        (fields::STD_REMON, FieldKind::Int),
        (fields::STD_ACYEAR, FieldKind::Int),
        (fields::STD_REYEAR1, FieldKind::Date),
        (fields::STD_REYEAR2, FieldKind::Date),
        (fields::STD_ACDAY, FieldKind::Date),
    ])
}

/// Reference datasets bound into the DEKISPART rule set, loaded exactly
/// once per run.
#[derive(Clone)]
pub struct DekispartRefs {
    pub individual_names: Arc<Vec<String>>,
    pub totalnet: Arc<BTreeSet<String>>,
    pub sales_persons: Arc<SalesPersonMaster>,
    pub customers: Arc<CustomerMaster>,
    pub sales_channels: Arc<SalesChannelMaster>,
    pub linked_items: Arc<LinkedItemSets>,
}

/// Load every reference dataset the series needs. All missing or empty
/// hard-required datasets are collected so the caller can report each one.
pub fn load_refs(aux: &AuxPaths) -> Result<DekispartRefs, MissingPrerequisite> {
    let individual_names =
        load_required(aux, aux_names::INDIVIDUAL_LIST, corecheck_ingest::load_individual_names)
            .unwrap_or_default();
    let totalnet =
        load_required(aux, aux_names::TOTALNET_LIST, corecheck_ingest::load_totalnet)
            .unwrap_or_default();
    let sales_persons =
        load_required(aux, aux_names::SALES_PERSON_LIST, corecheck_ingest::load_sales_persons)
            .unwrap_or_default();
    let customers =
        load_required(aux, aux_names::CUSTOMERS_LIST, corecheck_ingest::load_customers)
            .unwrap_or_default();
    let sales_channels =
        load_required(aux, aux_names::SALES_MASTER, corecheck_ingest::load_sales_channels)
            .unwrap_or_default();

    let mut missing = Vec::new();
    if individual_names.is_empty() {
        missing.push("INDIVIDUAL_LIST".to_string());
    }
    if totalnet.is_empty() {
        missing.push("TOTALNET".to_string());
    }
    if sales_persons.is_empty() {
        missing.push("SALES_PERSON".to_string());
    }
    if customers.is_empty() {
        missing.push("CUSTOMERS".to_string());
    }
    if sales_channels.is_empty() {
        missing.push("SALES_MASTER".to_string());
    }
    if !missing.is_empty() {
        return Err(MissingPrerequisite { datasets: missing });
    }

    // The linked-item sets are optional: without them the related check
    // simply has nothing to flag.
    let linked_items = match (
        aux.get(aux_names::LINKED_TARGET_LIST),
        aux.get(aux_names::LINKED_ITEM_LIST),
    ) {
        (Some(targets), Some(registered)) => {
            load_optional(aux, aux_names::LINKED_TARGET_LIST, |_| {
                corecheck_ingest::load_linked_item_sets(targets, registered)
            })
            .unwrap_or_default()
        }
        _ => LinkedItemSets::default(),
    };

    Ok(DekispartRefs {
        individual_names: Arc::new(individual_names),
        totalnet: Arc::new(totalnet),
        sales_persons: Arc::new(sales_persons),
        customers: Arc::new(customers),
        sales_channels: Arc::new(sales_channels),
        linked_items: Arc::new(linked_items),
    })
}

/// Append a violation carrying this record's identifiers.
fn note(record: &Record, sink: &mut ViolationSink, check_id: &str) {
    sink.report(
        record.text_or_empty(fields::STD_USER_ID),
        record.text_or_empty(fields::STD_ID),
        check_id,
    );
}

fn check_0001(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    // stdItmS「ＬＡＮ」と stdUserID「012」始まりは対で成立する
    let user_id = record.require_text(fields::STD_USER_ID)?;
    let item = record.require_text(fields::STD_ITM_S)?;
    if (item == "ＬＡＮ" && !user_id.starts_with("012"))
        || (user_id.starts_with("012") && item != "ＬＡＮ")
    {
        note(record, sink, "DEKISPART_CHK_0001");
    }
    Ok(())
}

fn check_0002(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    let user_id = record.require_text(fields::STD_USER_ID)?;
    let item = record.require_text(fields::STD_ITM_S)?;
    if (item == "単体" && !user_id.starts_with("8001"))
        || (user_id.starts_with("8001") && item != "単体")
    {
        note(record, sink, "DEKISPART_CHK_0002");
    }
    Ok(())
}

fn check_0003(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    let user_id = record.require_text(fields::STD_USER_ID)?;
    let item = record.require_text(fields::STD_ITM_S)?;
    if (item == "レンタル" && !user_id.starts_with("629"))
        || (user_id.starts_with("629") && item != "レンタル")
    {
        note(record, sink, "DEKISPART_CHK_0003");
    }
    Ok(())
}

fn check_0004(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STD_KAIYAKU)? != Some(false) {
        return Ok(());
    }
    let user_id = record.require_text(fields::STD_USER_ID)?;
    let user_id = user_id.trim();
    let item = record.require_text(fields::STD_ITM_S)?;
    let item = item.trim();
    if item == "その他" && !user_id.is_empty() {
        note(record, sink, "DEKISPART_CHK_0004");
    } else if item.is_empty() && !user_id.starts_with("0000") {
        note(record, sink, "DEKISPART_CHK_0004");
    }
    Ok(())
}

fn check_0005(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    // 先頭8桁に英数字以外が混じっていないこと。先頭8桁より後ろは自由
    // (支店名の付記などがある)。
    let user_id = record.require_text(fields::STD_USER_ID)?;
    if user_id.chars().count() >= 8 && !user_id.chars().take(8).all(char::is_alphanumeric) {
        note(record, sink, "DEKISPART_CHK_0005");
    }
    Ok(())
}

fn check_0006(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    let user_id = record.require_text(fields::STD_USER_ID)?;
    if !user_id.is_empty() && ["（", "）", "－"].iter().any(|c| user_id.contains(c)) {
        note(record, sink, "DEKISPART_CHK_0006");
    }
    Ok(())
}

fn check_0007(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    // 1〜7桁の数字のみのIDは移行前の暫定IDであり、"9"/"13"/"15"を除き NG。
    let user_id = record.require_text(fields::STD_USER_ID)?;
    let digits = user_id.chars().count();
    if !user_id.is_empty()
        && (1..=7).contains(&digits)
        && user_id.chars().all(char::is_numeric)
        && !matches!(user_id.as_str(), "9" | "13" | "15")
    {
        note(record, sink, "DEKISPART_CHK_0007");
    }
    Ok(())
}

fn check_0008(records: &[Record], sink: &mut ViolationSink) -> RuleResult {
    report_duplicates(
        records,
        sink,
        fields::STD_USER_ID,
        fields::STD_ID,
        "DEKISPART_CHK_0008",
    );
    Ok(())
}

fn check_0009(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    let supp_id = record.require_text(fields::STD_SUPP_ID)?;
    if supp_id.is_empty() {
        return Ok(());
    }
    let user_id = record.require_text(fields::STD_USER_ID)?;
    let user_head: String = user_id.chars().take(8).collect();
    let supp_head: String = supp_id.chars().take(8).collect();
    if user_head != supp_head {
        note(record, sink, "DEKISPART_CHK_0009");
    }
    Ok(())
}

fn check_0010(record: &Record, sink: &mut ViolationSink, individual: &[String]) -> RuleResult {
    if record.require_flag(fields::STD_FLG4)? != Some(true) {
        return Ok(());
    }
    let name = record.require_text(fields::STD_NAME)?;
    if name.is_empty() {
        return Ok(());
    }
    for keyword in individual {
        if name.contains(keyword.as_str()) {
            note(record, sink, "DEKISPART_CHK_0010");
        }
    }
    Ok(())
}

fn check_0011(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    // 敬称が「様」(stdFlg4) なら担当者(stdTan1)は空白
    if record.require_flag(fields::STD_FLG4)? == Some(true)
        && !record.require(fields::STD_TAN1)?.is_blank()
    {
        note(record, sink, "DEKISPART_CHK_0011");
    }
    Ok(())
}

fn check_0012(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STD_FLG4)? == Some(false)
        && record.require(fields::STD_TAN1)?.is_blank()
    {
        note(record, sink, "DEKISPART_CHK_0012");
    }
    Ok(())
}

fn check_0013(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    // 商魂コードは6桁。数字以外なら半角Bで始まる
    let code = record.require_text(fields::STD_NAM_CODE)?;
    let is_digits = !code.is_empty() && code.chars().all(char::is_numeric);
    if code.chars().count() != 6 {
        note(record, sink, "DEKISPART_CHK_0013");
    } else if !is_digits && !code.starts_with('B') {
        note(record, sink, "DEKISPART_CHK_0013");
    }
    Ok(())
}

fn check_0014(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require(fields::STD_NAM_CODE)?.is_blank() {
        note(record, sink, "DEKISPART_CHK_0014");
    }
    Ok(())
}

fn check_0015(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    let value = record.require(fields::STD_SALE1)?;
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
        note(record, sink, "DEKISPART_CHK_0015");
    }
    Ok(())
}

fn check_0016(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_text(fields::STD_SALE1)?.contains("ksALL") {
        note(record, sink, "DEKISPART_CHK_0016");
    }
    Ok(())
}

fn check_0017(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require(fields::STD_SALE1)?.is_blank() {
        note(record, sink, "DEKISPART_CHK_0017");
    }
    Ok(())
}

fn check_0018(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require(fields::STD_SALE_NAM1)?.is_blank() {
        note(record, sink, "DEKISPART_CHK_0018");
    }
    Ok(())
}

fn check_0019(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_text(fields::STD_SALE1)? == "004359"
        && !record.require_text(fields::STD_SALE2)?.starts_with("00r")
    {
        note(record, sink, "DEKISPART_CHK_0019");
    }
    Ok(())
}

fn check_0020(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_text(fields::STD_SALE1)? == "000286"
        && !record.require_text(fields::STD_SALE2)?.starts_with("ke")
    {
        note(record, sink, "DEKISPART_CHK_0020");
    }
    Ok(())
}

fn check_0021(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_text(fields::STD_SALE1)? == "001275"
        && record.require_text(fields::STD_ADD)?.starts_with("新潟県")
        && record.require_text(fields::STD_SALE2)?.to_lowercase() != "canon"
    {
        note(record, sink, "DEKISPART_CHK_0021");
    }
    Ok(())
}

/// Dealers on direct-debit collection: stdNsyu must be 211.
fn check_sale1_nsyu_211(
    record: &Record,
    sink: &mut ViolationSink,
    sale_code: &str,
    check_id: &str,
) -> RuleResult {
    if record.require_text(fields::STD_SALE1)? == sale_code
        && record.require_text(fields::STD_NSYU)? != "211"
    {
        note(record, sink, check_id);
    }
    Ok(())
}

fn check_0027(record: &Record, sink: &mut ViolationSink, customers: &CustomerMaster) -> RuleResult {
    const FORBIDDEN_LEADING: [&str; 5] = ["：", "×", "▲", "★", "■"];
    let code = record.require_text(fields::STD_SALE_NAM1)?;
    let code = code.trim();
    let Some(customer) = customers.get(code) else {
        return Ok(());
    };
    if record.require_flag(fields::STD_KAIYAKU)? == Some(false)
        && !customer.name1.is_empty()
        && FORBIDDEN_LEADING
            .iter()
            .any(|symbol| customer.name1.starts_with(symbol))
    {
        note(record, sink, "DEKISPART_CHK_0027");
    }
    Ok(())
}

fn check_0028(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    let value = record.require(fields::STD_SBIKO)?;
    if !value.is_blank() && !value.to_text().contains('年') {
        note(record, sink, "DEKISPART_CHK_0028");
    }
    Ok(())
}

fn check_0029(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STD_FLG3)? == Some(true) {
        note(record, sink, "DEKISPART_CHK_0029");
    }
    Ok(())
}

fn check_0030(record: &Record, sink: &mut ViolationSink, today: NaiveDate) -> RuleResult {
    if record.require_flag(fields::STD_KAIYAKU)? != Some(true)
        || !record.require_text(fields::STD_BIKO4)?.contains("特別計算")
    {
        return Ok(());
    }
    match record.require(fields::STD_REYEAR1)? {
        Value::Date(expiry) => {
            if let Some(limit) = expiry.checked_add_months(Months::new(2)) {
                if today >= limit {
                    note(record, sink, "DEKISPART_CHK_0030");
                }
            }
        }
        Value::Str(raw) if !raw.trim().is_empty() => {
            match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
                Ok(expiry) => {
                    if let Some(limit) = expiry.checked_add_months(Months::new(2)) {
                        if today >= limit {
                            note(record, sink, "DEKISPART_CHK_0030");
                        }
                    }
                }
                // 日付形式不正もNG扱い
                Err(_) => note(record, sink, "DEKISPART_CHK_0030"),
            }
        }
        _ => {}
    }
    Ok(())
}

fn check_0031(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STD_KAIYAKU)? == Some(true)
        && record.require_flag(fields::STD_FLG1)? == Some(true)
    {
        note(record, sink, "DEKISPART_CHK_0031");
    }
    Ok(())
}

fn check_0032(
    record: &Record,
    sink: &mut ViolationSink,
    totalnet: &BTreeSet<String>,
) -> RuleResult {
    if record.require(fields::STD_NSYU)?.as_int() == Some(121) {
        let maintenance_id = record.require_text(fields::STD_ID)?;
        if !totalnet.contains(&maintenance_id) {
            note(record, sink, "DEKISPART_CHK_0032");
        }
    }
    Ok(())
}

fn check_0033(
    record: &Record,
    sink: &mut ViolationSink,
    totalnet: &BTreeSet<String>,
) -> RuleResult {
    if record.require_flag(fields::STD_JIFURI_DM)? == Some(true) {
        let sale1 = record.require_text(fields::STD_SALE1)?;
        if totalnet.contains(&sale1) {
            note(record, sink, "DEKISPART_CHK_0033");
        }
    }
    Ok(())
}

fn check_0034(
    record: &Record,
    sink: &mut ViolationSink,
    channels: &SalesChannelMaster,
) -> RuleResult {
    let not_cancelled = record.flag(fields::STD_KAIYAKU) == Some(false);
    let biko3_clear = !record.text_or_empty(fields::STD_BIKO3).contains("自振DM不要");
    let kbiko_clear = !record.text_or_empty(fields::STD_KBIKO).contains("更新案内不要");
    let nsyu_122 = record.int(fields::STD_NSYU) == Some(122);
    let jifuri_dm = record.flag(fields::STD_JIFURI_DM) == Some(true);
    let channel_jifuri_dm = channels
        .get(record.text_or_empty(fields::STD_SALE1).as_str())
        .is_some_and(|entry| entry.jifuri_dm);

    if not_cancelled && biko3_clear && kbiko_clear && channel_jifuri_dm && nsyu_122 && jifuri_dm {
        note(record, sink, "DEKISPART_CHK_0034");
    }
    Ok(())
}

fn check_0035(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    // 備考3に「自振DM不要」があるのに自振DMが立ったままのもの。stdKbiko と
    // 販売店マスタの値は判定に関与しない。
    let not_cancelled = record.flag(fields::STD_KAIYAKU) == Some(false);
    let biko3_marked = record.text_or_empty(fields::STD_BIKO3).contains("自振DM不要");
    let nsyu_122 = record.int(fields::STD_NSYU) == Some(122);
    let jifuri_dm = record.flag(fields::STD_JIFURI_DM) == Some(true);

    if not_cancelled && biko3_marked && nsyu_122 && jifuri_dm {
        note(record, sink, "DEKISPART_CHK_0035");
    }
    Ok(())
}

fn check_0036(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    let not_cancelled = record.flag(fields::STD_KAIYAKU) == Some(false);
    let biko3_marked = record.text_or_empty(fields::STD_BIKO3).contains("自振DM不要");
    let kbiko_marked = record.text_or_empty(fields::STD_KBIKO).contains("更新案内不要");
    let nsyu_122 = record.int(fields::STD_NSYU) == Some(122);
    let jifuri_dm = record.flag(fields::STD_JIFURI_DM) == Some(true);

    if not_cancelled && biko3_marked && kbiko_marked && nsyu_122 && jifuri_dm {
        note(record, sink, "DEKISPART_CHK_0036");
    }
    Ok(())
}

fn check_0037(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STD_KAIYAKU)? == Some(false)
        && record.require_flag(fields::STD_NON_RENEWAL)? == Some(true)
    {
        note(record, sink, "DEKISPART_CHK_0037");
    }
    Ok(())
}

const NG_NSYU_HASSOU: [(i64, i64); 6] = [(121, 1), (121, 2), (122, 1), (122, 2), (211, 1), (211, 2)];

fn check_0038(
    record: &Record,
    sink: &mut ViolationSink,
    channels: &SalesChannelMaster,
) -> RuleResult {
    let not_cancelled = record.flag(fields::STD_KAIYAKU) == Some(false);
    let kbiko_clear = !record.text_or_empty(fields::STD_KBIKO).contains("更新案内不要");
    let channel_notifies = channels
        .get(record.text_or_empty(fields::STD_SALE1).as_str())
        .is_some_and(|entry| entry.notify_renewal);
    if !(not_cancelled && kbiko_clear && channel_notifies) {
        return Ok(());
    }
    if let (Some(nsyu), Some(hassou)) = (
        record.int(fields::STD_NSYU),
        record.int(fields::STD_HASSOU_TYPE),
    ) {
        if NG_NSYU_HASSOU.contains(&(nsyu, hassou)) {
            note(record, sink, "DEKISPART_CHK_0038");
        }
    }
    Ok(())
}

fn check_0039(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    let not_cancelled = record.flag(fields::STD_KAIYAKU) == Some(false);
    let kbiko_marked = record.text_or_empty(fields::STD_KBIKO).contains("更新案内不要");
    if !(not_cancelled && kbiko_marked) {
        return Ok(());
    }
    if let (Some(nsyu), Some(hassou)) = (
        record.int(fields::STD_NSYU),
        record.int(fields::STD_HASSOU_TYPE),
    ) {
        if matches!(nsyu, 121 | 122 | 211) && matches!(hassou, 1 | 2) {
            note(record, sink, "DEKISPART_CHK_0039");
        }
    }
    Ok(())
}

fn check_0040(
    record: &Record,
    sink: &mut ViolationSink,
    persons: &SalesPersonMaster,
) -> RuleResult {
    // 担当者名の先頭「×」「・」は退職・対象外マーク。解約状態は問わない。
    let code = record.require_text(fields::STD_TSEL)?;
    let code = code.trim();
    let Some(person) = persons.get(code) else {
        return Ok(());
    };
    if person.name.starts_with('×') || person.name.starts_with('・') {
        note(record, sink, "DEKISPART_CHK_0040");
    }
    Ok(())
}

fn check_0041(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STD_KAIYAKU)? == Some(false)
        && record.require(fields::STD_TSEL)?.is_blank()
    {
        note(record, sink, "DEKISPART_CHK_0041");
    }
    Ok(())
}

fn check_0042(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STD_KAIYAKU)? == Some(false)
        && record.require(fields::STD_TPLA)?.is_blank()
    {
        note(record, sink, "DEKISPART_CHK_0042");
    }
    Ok(())
}

fn check_0043(
    record: &Record,
    sink: &mut ViolationSink,
    branches: &BTreeSet<String>,
) -> RuleResult {
    if record.require_flag(fields::STD_KAIYAKU)? == Some(false)
        && !branches.contains(record.require_text(fields::STD_TPLA)?.as_str())
    {
        note(record, sink, "DEKISPART_CHK_0043");
    }
    Ok(())
}

fn check_0044(record: &Record, sink: &mut ViolationSink, today: NaiveDate) -> RuleResult {
    let name = record.require_text(fields::STD_NAME)?;
    if ["▲", "×", "■"].iter().any(|symbol| name.contains(symbol)) {
        return Ok(());
    }
    match record.require(fields::STD_REYEAR1)? {
        Value::Date(expiry) => {
            if record.require_flag(fields::STD_KAIYAKU)? == Some(true) && *expiry > today {
                note(record, sink, "DEKISPART_CHK_0044");
            }
        }
        Value::Str(raw) if !raw.trim().is_empty() => {
            match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
                Ok(expiry) => {
                    if record.require_flag(fields::STD_KAIYAKU)? == Some(true) && expiry > today {
                        note(record, sink, "DEKISPART_CHK_0044");
                    }
                }
                Err(_) => note(record, sink, "DEKISPART_CHK_0044_DATE_PARSE_ERROR"),
            }
        }
        _ => {}
    }
    Ok(())
}

/// 解約していない契約の必須項目チェック。
fn check_not_blank(
    record: &Record,
    sink: &mut ViolationSink,
    field: &str,
    check_id: &str,
) -> RuleResult {
    if record.require_flag(fields::STD_KAIYAKU)? == Some(false)
        && record.require(field)?.is_blank()
    {
        note(record, sink, check_id);
    }
    Ok(())
}

fn check_0056(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STD_KAIYAKU)? == Some(false)
        && matches!(
            record.require_text(fields::STD_KAINSYU)?.as_str(),
            "D" | "CD"
        )
        && record
            .require_text(fields::STD_BIKO4)?
            .contains("会員種特別計算")
    {
        note(record, sink, "DEKISPART_CHK_0056");
    }
    Ok(())
}

fn check_0057(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_text(fields::STD_NSYU)? == "121"
        && record.require_text(fields::STD_HASSOU_TYPE)? == "0"
    {
        note(record, sink, "DEKISPART_CHK_0057");
    }
    Ok(())
}

fn check_0058(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_text(fields::STD_NSYU)? == "121"
        && record
            .require_text(fields::STD_KBIKO)?
            .contains("更新案内不要")
    {
        note(record, sink, "DEKISPART_CHK_0058");
    }
    Ok(())
}

fn check_0059(record: &Record, sink: &mut ViolationSink, customers: &CustomerMaster) -> RuleResult {
    // 得意先マスタの会社敬称と敬称フラグ(stdFlg4)の整合性。フラグは
    // TRUE=様、FALSE=御中。
    let sale1 = record.text_or_empty(fields::STD_SALE1);
    let sale1 = sale1.trim();
    if sale1.is_empty() {
        return Ok(());
    }
    let Some(customer) = customers.get(sale1) else {
        return Ok(());
    };
    let honorific = customer.company_honorific.trim();
    let flag = record.flag(fields::STD_FLG4).unwrap_or(false);
    if honorific == "様" && !flag {
        note(record, sink, "DEKISPART_CHK_0059");
    } else if honorific == "御中" && flag {
        note(record, sink, "DEKISPART_CHK_0059");
    } else if !honorific.is_empty() && honorific != "様" && honorific != "御中" {
        note(record, sink, "DEKISPART_CHK_0059");
    }
    Ok(())
}

fn check_0060(record: &Record, sink: &mut ViolationSink, linked: &LinkedItemSets) -> RuleResult {
    let maintenance_id = record.text_or_empty(fields::STD_ID);
    if maintenance_id.is_empty() {
        return Ok(());
    }
    if linked.needs_item(&maintenance_id) {
        note(record, sink, "DEKISPART_CHK_0060");
    }
    Ok(())
}

/// Bind the full DEKISPART rule set. Declaration order fixes the output
/// order within each record.
pub fn build_rules(refs: &DekispartRefs, today: NaiveDate) -> RuleSet {
    let mut set = RuleSet::new(SERIES, IDENTITY);

    set.add(Rule::per_record("check_0001", check_0001));
    set.add(Rule::per_record("check_0002", check_0002));
    set.add(Rule::per_record("check_0003", check_0003));
    set.add(Rule::per_record("check_0004", check_0004));
    set.add(Rule::per_record("check_0005", check_0005));
    set.add(Rule::per_record("check_0006", check_0006));
    set.add(Rule::per_record("check_0007", check_0007));
    set.add(Rule::per_record("check_0009", check_0009));
    set.add(Rule::per_record("check_0011", check_0011));
    set.add(Rule::per_record("check_0012", check_0012));
    set.add(Rule::per_record("check_0013", check_0013));
    set.add(Rule::per_record("check_0014", check_0014));
    set.add(Rule::per_record("check_0015", check_0015));
    set.add(Rule::per_record("check_0016", check_0016));
    set.add(Rule::per_record("check_0017", check_0017));
    set.add(Rule::per_record("check_0018", check_0018));
    set.add(Rule::per_record("check_0019", check_0019));
    set.add(Rule::per_record("check_0020", check_0020));
    set.add(Rule::per_record("check_0021", check_0021));
    set.add(Rule::per_record("check_0022", |record, sink| {
        check_sale1_nsyu_211(record, sink, "000332", "DEKISPART_CHK_0022")
    }));
    set.add(Rule::per_record("check_0023", |record, sink| {
        check_sale1_nsyu_211(record, sink, "A30777", "DEKISPART_CHK_0023")
    }));
    set.add(Rule::per_record("check_0024", |record, sink| {
        check_sale1_nsyu_211(record, sink, "000583", "DEKISPART_CHK_0024")
    }));
    set.add(Rule::per_record("check_0025", |record, sink| {
        check_sale1_nsyu_211(record, sink, "000659", "DEKISPART_CHK_0025")
    }));
    set.add(Rule::per_record("check_0026", |record, sink| {
        check_sale1_nsyu_211(record, sink, "000759", "DEKISPART_CHK_0026")
    }));
    let customers = Arc::clone(&refs.customers);
    set.add(Rule::per_record("check_0027", move |record, sink| {
        check_0027(record, sink, &customers)
    }));
    set.add(Rule::per_record("check_0028", check_0028));
    set.add(Rule::per_record("check_0029", check_0029));
    set.add(Rule::per_record("check_0030", move |record, sink| {
        check_0030(record, sink, today)
    }));
    set.add(Rule::per_record("check_0031", check_0031));
    set.add(Rule::per_record("check_0037", check_0037));
    let persons = Arc::clone(&refs.sales_persons);
    set.add(Rule::per_record("check_0040", move |record, sink| {
        check_0040(record, sink, &persons)
    }));
    set.add(Rule::per_record("check_0041", check_0041));
    set.add(Rule::per_record("check_0042", check_0042));
    let branches = {
        let departments = refs.sales_persons.departments();
        if departments.is_empty() {
            tracing::warn!("sales-person master carries no department codes; using fallback branch list");
            FALLBACK_BRANCHES.iter().map(|s| (*s).to_string()).collect()
        } else {
            departments
        }
    };
    set.add(Rule::per_record("check_0043", move |record, sink| {
        check_0043(record, sink, &branches)
    }));
    set.add(Rule::per_record("check_0044", move |record, sink| {
        check_0044(record, sink, today)
    }));
    set.add(Rule::per_record("check_0045", |record, sink| {
        check_not_blank(record, sink, fields::STD_ACDAY, "DEKISPART_CHK_0045")
    }));
    set.add(Rule::per_record("check_0046", |record, sink| {
        check_not_blank(record, sink, fields::STD_REMON, "DEKISPART_CHK_0046")
    }));
    set.add(Rule::per_record("check_0047", |record, sink| {
        check_not_blank(record, sink, fields::STD_ACYEAR, "DEKISPART_CHK_0047")
    }));
    set.add(Rule::per_record("check_0048", |record, sink| {
        check_not_blank(record, sink, fields::STD_REYEAR1, "DEKISPART_CHK_0048")
    }));
    set.add(Rule::per_record("check_0049", |record, sink| {
        check_not_blank(record, sink, fields::STD_REYEAR2, "DEKISPART_CHK_0049")
    }));
    set.add(Rule::per_record("check_0050", |record, sink| {
        check_not_blank(record, sink, fields::STD_KAINSYU, "DEKISPART_CHK_0050")
    }));
    set.add(Rule::per_record("check_0051", |record, sink| {
        check_not_blank(record, sink, fields::STD_NAME, "DEKISPART_CHK_0051")
    }));
    set.add(Rule::per_record("check_0052", |record, sink| {
        check_not_blank(record, sink, fields::STD_NAMEF, "DEKISPART_CHK_0052")
    }));
    set.add(Rule::per_record("check_0053", |record, sink| {
        check_not_blank(record, sink, fields::STD_ZIP, "DEKISPART_CHK_0053")
    }));
    set.add(Rule::per_record("check_0054", |record, sink| {
        check_not_blank(record, sink, fields::STD_ADD, "DEKISPART_CHK_0054")
    }));
    set.add(Rule::per_record("check_0055", |record, sink| {
        check_not_blank(record, sink, fields::STD_TELL, "DEKISPART_CHK_0055")
    }));
    set.add(Rule::per_record("check_0056", check_0056));
    set.add(Rule::per_record("check_0057", check_0057));
    set.add(Rule::per_record("check_0058", check_0058));

    // Context-bound checks, in their original appended order. The id
    // duplication check runs once in the whole-dataset phase.
    set.add(Rule::dataset("check_0008", check_0008));
    let individual = Arc::clone(&refs.individual_names);
    set.add(Rule::per_record("check_0010", move |record, sink| {
        check_0010(record, sink, &individual)
    }));
    let totalnet = Arc::clone(&refs.totalnet);
    set.add(Rule::per_record("check_0032", move |record, sink| {
        check_0032(record, sink, &totalnet)
    }));
    let totalnet = Arc::clone(&refs.totalnet);
    set.add(Rule::per_record("check_0033", move |record, sink| {
        check_0033(record, sink, &totalnet)
    }));
    let channels = Arc::clone(&refs.sales_channels);
    set.add(Rule::per_record("check_0034", move |record, sink| {
        check_0034(record, sink, &channels)
    }));
    set.add(Rule::per_record("check_0035", check_0035));
    set.add(Rule::per_record("check_0036", check_0036));
    let channels = Arc::clone(&refs.sales_channels);
    set.add(Rule::per_record("check_0038", move |record, sink| {
        check_0038(record, sink, &channels)
    }));
    set.add(Rule::per_record("check_0039", check_0039));
    let customers = Arc::clone(&refs.customers);
    set.add(Rule::per_record("check_0059", move |record, sink| {
        check_0059(record, sink, &customers)
    }));
    let linked = Arc::clone(&refs.linked_items);
    set.add(Rule::per_record("check_0060", move |record, sink| {
        check_0060(record, sink, &linked)
    }));

    set
}

/// Run the DEKISPART validation end to end. `fetch` supplies the primary
/// record collection (database or CSV adapter); always returns a table.
pub fn run_dekispart_check<F>(
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

#[cfg(test)]
mod tests {
    use corecheck_engine::run_rules;
    use corecheck_model::{SalesChannelEntry, SalesPersonEntry};

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 19).unwrap()
    }

    fn empty_refs() -> DekispartRefs {
        DekispartRefs {
            individual_names: Arc::new(Vec::new()),
            totalnet: Arc::new(BTreeSet::new()),
            sales_persons: Arc::new(SalesPersonMaster::new()),
            customers: Arc::new(CustomerMaster::new()),
            sales_channels: Arc::new(SalesChannelMaster::new()),
            linked_items: Arc::new(LinkedItemSets::default()),
        }
    }

    fn run_one(record: Record, refs: &DekispartRefs) -> Vec<String> {
        let rules = build_rules(refs, today());
        let table = run_rules(&[record], &rules, &ProgressReporter::silent());
        table.iter().map(|row| row.check_id.clone()).collect()
    }

    fn sink() -> ViolationSink {
        ViolationSink::new(SERIES)
    }

    fn base_record(user_id: &str) -> Record {
        let mut record = Record::new();
        record.insert(fields::STD_ID, "A001");
        record.insert(fields::STD_USER_ID, user_id);
        record
    }

    #[test]
    fn chk_0001_pairs_lan_with_012_prefix() {
        // ＬＡＮ contract with a matching 012-prefixed id: consistent.
        let mut record = base_record("01234567");
        record.insert(fields::STD_ITM_S, "ＬＡＮ");
        let mut s = sink();
        check_0001(&record, &mut s).unwrap();
        assert!(s.is_empty());

        // ＬＡＮ contract without the 012 prefix: flagged.
        let mut record = base_record("81234567");
        record.insert(fields::STD_ITM_S, "ＬＡＮ");
        let mut s = sink();
        check_0001(&record, &mut s).unwrap();
        assert_eq!(s.len(), 1);

        // 012 prefix on a non-ＬＡＮ contract: flagged.
        let mut record = base_record("01299999");
        record.insert(fields::STD_ITM_S, "単体");
        let mut s = sink();
        check_0001(&record, &mut s).unwrap();
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn chk_0005_flags_non_alnum_in_head() {
        // The id head (first 8 chars) must be plain alphanumerics; trailing
        // branch annotations are free-form.
        let cases: [(&str, usize); 8] = [
            ("12345678", 0),
            ("", 0),
            ("01231246-1", 0),
            ("01201152(7)", 0),
            ("01210469関東", 0),
            ("1234 5678", 1),
            ("12-345678", 1),
            ("1234567", 0), // shorter than the 8-char head is out of scope
        ];
        for (input, expected) in cases {
            let mut s = sink();
            check_0005(&base_record(input), &mut s).unwrap();
            assert_eq!(s.len(), expected, "stdUserID = {input:?}");
        }
    }

    #[test]
    fn chk_0005_null_id_is_skipped() {
        let mut record = Record::new();
        record.insert(fields::STD_ID, "A001");
        record.insert(fields::STD_USER_ID, Value::Null);
        let mut s = sink();
        check_0005(&record, &mut s).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn chk_0007_flags_short_numeric_ids_except_legacy() {
        // A rework of this check (whitespace/invalid-character scan) has
        // been discussed; this pins the in-production predicate. Verify
        // against source of truth before changing it.
        let cases: [(&str, usize); 7] = [
            ("1234567", 1),
            ("12345678", 0),
            ("9", 0),
            ("13", 0),
            ("15", 0),
            ("123456A", 0),
            ("", 0),
        ];
        for (input, expected) in cases {
            let mut s = sink();
            check_0007(&base_record(input), &mut s).unwrap();
            assert_eq!(s.len(), expected, "stdUserID = {input:?}");
        }
    }

    #[test]
    fn chk_0008_reports_each_duplicate_occurrence() {
        let records = vec![
            base_record("DUP01"),
            base_record("U0002"),
            base_record("DUP01"),
        ];
        let mut s = sink();
        check_0008(&records, &mut s).unwrap();
        let table = s.into_table();
        assert_eq!(table.len(), 2);
        assert!(table.iter().all(|row| row.record_id == "DUP01"));
    }

    #[test]
    fn chk_0008_ignores_blank_and_null_ids() {
        let mut null_record = Record::new();
        null_record.insert(fields::STD_ID, "A003");
        null_record.insert(fields::STD_USER_ID, Value::Null);
        let mut null_record2 = Record::new();
        null_record2.insert(fields::STD_ID, "A004");
        null_record2.insert(fields::STD_USER_ID, Value::Null);
        let records = vec![
            base_record(""),
            base_record(""),
            null_record,
            null_record2,
        ];
        let mut s = sink();
        check_0008(&records, &mut s).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn chk_0013_requires_six_chars_or_b_prefix() {
        let mut record = base_record("01234567");
        record.insert(fields::STD_NAM_CODE, "123456");
        let mut s = sink();
        check_0013(&record, &mut s).unwrap();
        assert!(s.is_empty());

        let mut record = base_record("01234567");
        record.insert(fields::STD_NAM_CODE, "B12345");
        let mut s = sink();
        check_0013(&record, &mut s).unwrap();
        assert!(s.is_empty());

        let mut record = base_record("01234567");
        record.insert(fields::STD_NAM_CODE, "X12345");
        let mut s = sink();
        check_0013(&record, &mut s).unwrap();
        assert_eq!(s.len(), 1);

        let mut record = base_record("01234567");
        record.insert(fields::STD_NAM_CODE, "12345");
        let mut s = sink();
        check_0013(&record, &mut s).unwrap();
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn chk_0030_flags_expired_special_calculation() {
        let mut record = base_record("01234567");
        record.insert(fields::STD_KAIYAKU, true);
        record.insert(fields::STD_BIKO4, "特別計算あり");
        record.insert(
            fields::STD_REYEAR1,
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        );
        let mut s = sink();
        check_0030(&record, &mut s, today()).unwrap();
        assert_eq!(s.len(), 1, "expiry + 2 months has passed");

        let mut record = base_record("01234567");
        record.insert(fields::STD_KAIYAKU, true);
        record.insert(fields::STD_BIKO4, "特別計算あり");
        record.insert(
            fields::STD_REYEAR1,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        );
        let mut s = sink();
        check_0030(&record, &mut s, today()).unwrap();
        assert!(s.is_empty(), "still inside the 2-month window");
    }

    #[test]
    fn chk_0030_malformed_date_counts_as_violation() {
        let mut record = base_record("01234567");
        record.insert(fields::STD_KAIYAKU, true);
        record.insert(fields::STD_BIKO4, "特別計算");
        record.insert(fields::STD_REYEAR1, "06/19/2025");
        let mut s = sink();
        check_0030(&record, &mut s, today()).unwrap();
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn chk_0032_checks_totalnet_registration() {
        let totalnet: BTreeSet<String> = ["A001".to_string()].into_iter().collect();
        let mut record = base_record("01234567");
        record.insert(fields::STD_NSYU, 121_i64);
        let mut s = sink();
        check_0032(&record, &mut s, &totalnet).unwrap();
        assert!(s.is_empty(), "A001 is registered");

        let mut record = base_record("01234567");
        record.insert(fields::STD_ID, "B002");
        record.insert(fields::STD_NSYU, 121_i64);
        let mut s = sink();
        check_0032(&record, &mut s, &totalnet).unwrap();
        assert_eq!(s.len(), 1);

        let mut record = base_record("01234567");
        record.insert(fields::STD_ID, "B002");
        record.insert(fields::STD_NSYU, 122_i64);
        let mut s = sink();
        check_0032(&record, &mut s, &totalnet).unwrap();
        assert!(s.is_empty(), "only payment route 121 is checked");
    }

    #[test]
    fn chk_0038_needs_channel_notify_and_ng_pattern() {
        let mut channels = SalesChannelMaster::new();
        channels.insert(
            "123456",
            SalesChannelEntry {
                notify_renewal: true,
                jifuri_dm: false,
            },
        );
        let mut record = base_record("01234567");
        record.insert(fields::STD_KAIYAKU, false);
        record.insert(fields::STD_SALE1, "123456");
        record.insert(fields::STD_NSYU, 121_i64);
        record.insert(fields::STD_HASSOU_TYPE, 1_i64);
        let mut s = sink();
        check_0038(&record, &mut s, &channels).unwrap();
        assert_eq!(s.len(), 1);

        // Renewal note in stdKbiko suppresses the check.
        record.insert(fields::STD_KBIKO, "更新案内不要");
        let mut s = sink();
        check_0038(&record, &mut s, &channels).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn chk_0040_ignores_cancellation_status() {
        let mut persons = SalesPersonMaster::new();
        persons.insert(
            "SEL1",
            SalesPersonEntry {
                name: "・田中".to_string(),
                department: "001".to_string(),
            },
        );
        let mut record = base_record("01234567");
        record.insert(fields::STD_TSEL, "SEL1");
        record.insert(fields::STD_KAIYAKU, true);
        let mut s = sink();
        check_0040(&record, &mut s, &persons).unwrap();
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn chk_0059_matches_company_honorific_against_flag() {
        let mut customers = CustomerMaster::new();
        customers.insert(
            "123456",
            corecheck_model::CustomerEntry {
                name1: "正規店".to_string(),
                usage: String::new(),
                contact_honorific: "様".to_string(),
                company_honorific: "御中".to_string(),
            },
        );

        // Company honorific 御中, flag FALSE (=御中): consistent.
        let mut record = base_record("TEST_USER");
        record.insert(fields::STD_SALE1, "123456");
        record.insert(fields::STD_FLG4, false);
        let mut s = sink();
        check_0059(&record, &mut s, &customers).unwrap();
        assert!(s.is_empty());

        // Company honorific 御中, flag TRUE (=様): inconsistent.
        let mut record = base_record("TEST_USER");
        record.insert(fields::STD_SALE1, "123456");
        record.insert(fields::STD_FLG4, true);
        let mut s = sink();
        check_0059(&record, &mut s, &customers).unwrap();
        assert_eq!(s.len(), 1);

        let mut customers = CustomerMaster::new();
        customers.insert(
            "123456",
            corecheck_model::CustomerEntry {
                name1: "正規店".to_string(),
                usage: String::new(),
                contact_honorific: "御中".to_string(),
                company_honorific: "様".to_string(),
            },
        );
        // Company honorific 様, flag TRUE (=様): consistent even though the
        // contact honorific disagrees.
        let mut record = base_record("TEST_USER");
        record.insert(fields::STD_SALE1, "123456");
        record.insert(fields::STD_FLG4, true);
        let mut s = sink();
        check_0059(&record, &mut s, &customers).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn chk_0060_uses_precomputed_linked_sets() {
        let linked = LinkedItemSets {
            targets: ["A001".to_string()].into_iter().collect(),
            registered: BTreeSet::new(),
        };
        let record = base_record("01234567");
        let mut s = sink();
        check_0060(&record, &mut s, &linked).unwrap();
        assert_eq!(s.len(), 1);

        let linked = LinkedItemSets {
            targets: ["A001".to_string()].into_iter().collect(),
            registered: ["A001".to_string()].into_iter().collect(),
        };
        let mut s = sink();
        check_0060(&base_record("01234567"), &mut s, &linked).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn missing_column_surfaces_as_diagnostic_not_abort() {
        // A record without stdItmS: check_0001 yields a diagnostic row and
        // the remaining rules still run.
        let record = base_record("0123456");
        let ids = run_one(record, &empty_refs());
        assert!(
            ids.iter()
                .any(|id| id == "COLUMN_MISSING_ERROR_check_0001: 'stdItmS'"),
            "got: {ids:?}"
        );
        // check_0007 still fired on the short numeric id.
        assert!(ids.iter().any(|id| id == "DEKISPART_CHK_0007"));
    }

    #[test]
    fn full_rule_set_is_deterministic() {
        let mut record = base_record("01234567");
        record.insert(fields::STD_ITM_S, "ＬＡＮ");
        record.insert(fields::STD_KAIYAKU, false);
        let refs = empty_refs();
        let first = run_one(record.clone(), &refs);
        let second = run_one(record, &refs);
        assert_eq!(first, second);
    }
}
