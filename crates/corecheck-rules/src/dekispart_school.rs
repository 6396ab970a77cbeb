//! DEKISPART_SCHOOL series checks.
//!
//! Validates the school maintenance table (`t_stdddata` export). The
//! primary identifier is `stdDID`; `stdID_D` is the maintenance tracking
//! number.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};

use corecheck_engine::orchestrator::{FetchError, MissingPrerequisite, run_series};
use corecheck_engine::progress::ProgressReporter;
use corecheck_engine::rule::{Rule, RuleResult};
use corecheck_engine::ruleset::{RecordIdentity, RuleSet};
use corecheck_engine::sink::ViolationSink;
use corecheck_model::{
    AuxPaths, FieldKind, Record, RecordSchema, ResultTable, Series, Value,
};

use crate::aux_names;
use crate::common::{load_optional, load_required, report_duplicates};

pub const SERIES: Series = Series::DekispartSchool;

/// Column names of the primary export.
pub mod fields {
    pub const STD_DID: &str = "stdDID";
    pub const STD_ID_D: &str = "stdID_D";
    pub const STD_DSUP_ID: &str = "stdDsupID";
    pub const STD_DSALE1: &str = "stdDsale1";
    pub const STD_DSALE2: &str = "stdDsale2";
    pub const STD_DNSYU: &str = "stdDNsyu";
    /// Read by the A30777 payment-route check. Sibling checks read
    /// `stdDNsyu`; preserved as-is pending confirmation.
    pub const STD_DNKEIRO: &str = "stdDnkeiro";
    pub const STD_DKAIYAKU: &str = "stdDKaiyaku";
    pub const STD_DKAIYAKU_OP: &str = "stdDKaiyakuOP";
    pub const STD_DFLG1: &str = "stdDFlg1";
    pub const STD_DTSELNO: &str = "stdDtselno";
    pub const STD_DREYEAR1: &str = "stdDReyear1";
    pub const STD_DREYEAR2: &str = "stdDReyear2";
    pub const STD_DACDAY: &str = "stdDAcday";
    pub const STD_DREMON: &str = "stdDRemon";
    pub const USER_BIKOU1: &str = "userbikou1";
}

/// Check ids of this series.
pub mod check_ids {
    pub const CHK_0002: &str = "DEKISPART_SCHOOL_CHK_0002"; // IDの桁数が8桁
    pub const CHK_0003: &str = "DEKISPART_SCHOOL_CHK_0003"; // IDの重複
    pub const CHK_0004: &str = "DEKISPART_SCHOOL_CHK_0004"; // stdDIDとstdDsupIDの最初の8桁が一致しない
    pub const CHK_0007: &str = "DEKISPART_SCHOOL_CHK_0007"; // 販店1マスタのコード形式不正
    pub const CHK_0008: &str = "DEKISPART_SCHOOL_CHK_0008"; // stdDsale1に"ksALL"が含まれる
    pub const CHK_0009: &str = "DEKISPART_SCHOOL_CHK_0009"; // stdDsale1が004359(リコー)の場合、stdDsale2が空白
    pub const CHK_0010: &str = "DEKISPART_SCHOOL_CHK_0010"; // stdDsale1が000286(建築資料)の場合、stdDsale2が空白
    pub const CHK_0011: &str = "DEKISPART_SCHOOL_CHK_0011"; // stdDsale1が001275(キヤノン)の場合、stdDsale2が空白
    pub const CHK_0012: &str = "DEKISPART_SCHOOL_CHK_0012"; // 登録販売店が倒産指定されている
    pub const CHK_0013: &str = "DEKISPART_SCHOOL_CHK_0013"; // 000332(ITS三島)で入金経路が211でない
    pub const CHK_0014: &str = "DEKISPART_SCHOOL_CHK_0014"; // A30777(ITS札幌)で入金経路が211でない
    pub const CHK_0015: &str = "DEKISPART_SCHOOL_CHK_0015"; // 000583(富士)で入金経路が211でない
    pub const CHK_0016: &str = "DEKISPART_SCHOOL_CHK_0016"; // 000659(富士FBI秋田)で入金経路が211でない
    pub const CHK_0017: &str = "DEKISPART_SCHOOL_CHK_0017"; // 000759(精密舎)で入金経路が211でない
    pub const CHK_0018: &str = "DEKISPART_SCHOOL_CHK_0018"; // 退会済みで処理中フラグが立ったまま
    pub const CHK_0019: &str = "DEKISPART_SCHOOL_CHK_0019"; // 入金経路121でトータルネット未登録
    pub const CHK_0020: &str = "DEKISPART_SCHOOL_CHK_0020"; // 備考「更新案内不要」なのに経路が112以外
    pub const CHK_0021: &str = "DEKISPART_SCHOOL_CHK_0021"; // 112以外で旭測器(B88299)
    pub const CHK_0022: &str = "DEKISPART_SCHOOL_CHK_0022"; // 担当営業が対象外営業リストに含まれる
    pub const CHK_0023: &str = "DEKISPART_SCHOOL_CHK_0023"; // 担当営業が空白
    pub const CHK_0024: &str = "DEKISPART_SCHOOL_CHK_0024"; // 契約中なのに満了日が過去
    pub const CHK_0025: &str = "DEKISPART_SCHOOL_CHK_0025"; // 退会済みなのに満了日が未来
    pub const CHK_0026: &str = "DEKISPART_SCHOOL_CHK_0026"; // 加入日が1年2か月以上前
    pub const CHK_0027: &str = "DEKISPART_SCHOOL_CHK_0027"; // 退会済みなのに加入日が未来
    pub const CHK_0028: &str = "DEKISPART_SCHOOL_CHK_0028"; // 契約中で更新月が空白
    pub const CHK_0029: &str = "DEKISPART_SCHOOL_CHK_0029"; // 契約中で満了日1が空白
    pub const CHK_0030: &str = "DEKISPART_SCHOOL_CHK_0030"; // 満了日1が1年3か月以上先
    pub const CHK_0031: &str = "DEKISPART_SCHOOL_CHK_0031"; // 契約中で満了日2が空白
    pub const CHK_0032: &str = "DEKISPART_SCHOOL_CHK_0032"; // 退会済みで退会OPが未設定
}

pub const IDENTITY: RecordIdentity = RecordIdentity {
    record_id_field: fields::STD_DID,
    maintenance_id_field: fields::STD_ID_D,
};

pub fn schema() -> RecordSchema {
    RecordSchema::from_fields([
        (fields::STD_DKAIYAKU, FieldKind::Bool),
        (fields::STD_DKAIYAKU_OP, FieldKind::Bool),
        (fields::STD_DFLG1, FieldKind::Bool),
        (fields::STD_DNSYU, FieldKind::Int),
        (fields::STD_DREMON, FieldKind::Int),
        (fields::STD_DREYEAR1, FieldKind::Date),
        (fields::STD_DREYEAR2, FieldKind::Date),
        (fields::STD_DACDAY, FieldKind::Date),
    ])
}

/// Reference datasets bound into the rule set. The totalnet list is hard
/// required; the two code sets derived from the sales systems are optional
/// and their checks simply have nothing to flag without them.
#[derive(Clone)]
pub struct SchoolRefs {
    pub totalnet: Arc<BTreeSet<String>>,
    pub excluded_sales: Arc<BTreeSet<String>>,
    pub bankrupt_shops: Arc<BTreeSet<String>>,
}

pub fn load_refs(aux: &AuxPaths) -> Result<SchoolRefs, MissingPrerequisite> {
    let totalnet = load_required(aux, aux_names::TOTALNET_LIST, corecheck_ingest::load_totalnet)
        .unwrap_or_default();
    if totalnet.is_empty() {
        return Err(MissingPrerequisite::one("TOTALNET"));
    }

    let excluded_sales = load_optional(aux, aux_names::EXCLUDED_SALES, |path| {
        corecheck_ingest::load_code_set(path, "salCode")
    })
    .unwrap_or_default();
    if excluded_sales.is_empty() {
        tracing::warn!("excluded-sales data unavailable; the related check is skipped");
    }
    let bankrupt_shops = load_optional(aux, aux_names::BANKRUPT_SHOPS, |path| {
        corecheck_ingest::load_code_set(path, "maiCode")
    })
    .unwrap_or_default();
    if bankrupt_shops.is_empty() {
        tracing::warn!("bankrupt-shop data unavailable; the related check is skipped");
    }

    Ok(SchoolRefs {
        totalnet: Arc::new(totalnet),
        excluded_sales: Arc::new(excluded_sales),
        bankrupt_shops: Arc::new(bankrupt_shops),
    })
}

fn note(record: &Record, sink: &mut ViolationSink, check_id: &str) {
    sink.report(
        record.text_or_empty(fields::STD_DID),
        record.text_or_empty(fields::STD_ID_D),
        check_id,
    );
}

/// Date cells that survived ingest as strings still get one parse attempt,
/// mirroring the tolerant conversion of the source system.
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

fn check_0002(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    // IDは数字8桁
    let id = record.require_text(fields::STD_DID)?;
    if id.chars().count() != 8 || !id.chars().all(char::is_numeric) {
        note(record, sink, check_ids::CHK_0002);
    }
    Ok(())
}

fn check_0003(records: &[Record], sink: &mut ViolationSink) -> RuleResult {
    report_duplicates(
        records,
        sink,
        fields::STD_DID,
        fields::STD_ID_D,
        check_ids::CHK_0003,
    );
    Ok(())
}

fn check_0004(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    let supp = record.require(fields::STD_DSUP_ID)?;
    if supp.is_null() {
        return Ok(());
    }
    let supp_head: String = supp.to_text().chars().take(8).collect();
    let id_head: String = record.require_text(fields::STD_DID)?.chars().take(8).collect();
    if id_head != supp_head {
        note(record, sink, check_ids::CHK_0004);
    }
    Ok(())
}

fn check_0007(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    let value = record.require(fields::STD_DSALE1)?;
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
        note(record, sink, check_ids::CHK_0007);
    }
    Ok(())
}

fn check_0008(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_text(fields::STD_DSALE1)?.contains("ksALL") {
        note(record, sink, check_ids::CHK_0008);
    }
    Ok(())
}

/// The named dealers resell through a second channel; stdDsale2 must be set.
fn check_sale1_needs_sale2(
    record: &Record,
    sink: &mut ViolationSink,
    sale_code: &str,
    check_id: &str,
) -> RuleResult {
    if record.text_or_empty(fields::STD_DSALE1) == sale_code
        && record.text_or_empty(fields::STD_DSALE2).trim().is_empty()
    {
        note(record, sink, check_id);
    }
    Ok(())
}

fn check_0012(
    record: &Record,
    sink: &mut ViolationSink,
    bankrupt: &BTreeSet<String>,
) -> RuleResult {
    if record.require_flag(fields::STD_DKAIYAKU)? != Some(true)
        && bankrupt.contains(record.require_text(fields::STD_DSALE1)?.as_str())
    {
        note(record, sink, check_ids::CHK_0012);
    }
    Ok(())
}

/// Dealers on direct-debit collection: the payment route must be 211.
fn check_sale1_route_211(
    record: &Record,
    sink: &mut ViolationSink,
    sale_code: &str,
    route_field: &str,
    check_id: &str,
) -> RuleResult {
    if record.text_or_empty(fields::STD_DSALE1) == sale_code
        && record.text_or_empty(route_field) != "211"
    {
        note(record, sink, check_id);
    }
    Ok(())
}

fn check_0018(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STD_DKAIYAKU)? == Some(true)
        && record.require_flag(fields::STD_DFLG1)? == Some(true)
    {
        note(record, sink, check_ids::CHK_0018);
    }
    Ok(())
}

fn check_0019(
    record: &Record,
    sink: &mut ViolationSink,
    totalnet: &BTreeSet<String>,
) -> RuleResult {
    if record.require_text(fields::STD_DNSYU)? == "121"
        && !totalnet.contains(record.require_text(fields::STD_DID)?.as_str())
    {
        note(record, sink, check_ids::CHK_0019);
    }
    Ok(())
}

fn check_0020(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    let remark = record.text_or_empty(fields::USER_BIKOU1);
    if remark.trim().contains("更新案内不要")
        && record.require_text(fields::STD_DNSYU)? != "112"
    {
        note(record, sink, check_ids::CHK_0020);
    }
    Ok(())
}

fn check_0021(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_text(fields::STD_DNSYU)? != "112"
        && record.require_text(fields::STD_DSALE1)? == "B88299"
    {
        note(record, sink, check_ids::CHK_0021);
    }
    Ok(())
}

fn check_0022(
    record: &Record,
    sink: &mut ViolationSink,
    excluded: &BTreeSet<String>,
) -> RuleResult {
    if record.require_flag(fields::STD_DKAIYAKU)? != Some(true)
        && excluded.contains(record.text_or_empty(fields::STD_DTSELNO).as_str())
    {
        note(record, sink, check_ids::CHK_0022);
    }
    Ok(())
}

fn check_0023(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STD_DKAIYAKU)? != Some(true)
        && record.is_blank(fields::STD_DTSELNO)
    {
        note(record, sink, check_ids::CHK_0023);
    }
    Ok(())
}

fn check_0024(record: &Record, sink: &mut ViolationSink, today: NaiveDate) -> RuleResult {
    if record.require_flag(fields::STD_DKAIYAKU)? != Some(true) {
        if let Some(expiry) = loose_date(record.require(fields::STD_DREYEAR1)?) {
            if expiry < today {
                note(record, sink, check_ids::CHK_0024);
            }
        }
    }
    Ok(())
}

fn check_0025(record: &Record, sink: &mut ViolationSink, today: NaiveDate) -> RuleResult {
    if record.require_flag(fields::STD_DKAIYAKU)? == Some(true) {
        if let Some(expiry) = loose_date(record.require(fields::STD_DREYEAR1)?) {
            if expiry > today {
                note(record, sink, check_ids::CHK_0025);
            }
        }
    }
    Ok(())
}

fn check_0026(record: &Record, sink: &mut ViolationSink, today: NaiveDate) -> RuleResult {
    // 1年2か月は14か月の近似(30日換算)で判定する
    if record.require_flag(fields::STD_DKAIYAKU)? != Some(true) {
        if let Some(joined) = loose_date(record.require(fields::STD_DACDAY)?) {
            if joined < today - Duration::days(14 * 30) {
                note(record, sink, check_ids::CHK_0026);
            }
        }
    }
    Ok(())
}

fn check_0027(record: &Record, sink: &mut ViolationSink, today: NaiveDate) -> RuleResult {
    if record.require_flag(fields::STD_DKAIYAKU)? == Some(true) {
        if let Some(joined) = loose_date(record.require(fields::STD_DACDAY)?) {
            if joined > today {
                note(record, sink, check_ids::CHK_0027);
            }
        }
    }
    Ok(())
}

fn check_0028(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STD_DKAIYAKU)? != Some(true)
        && record.is_blank(fields::STD_DREMON)
    {
        note(record, sink, check_ids::CHK_0028);
    }
    Ok(())
}

fn check_0029(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STD_DKAIYAKU)? != Some(true)
        && record.is_blank(fields::STD_DREYEAR1)
    {
        note(record, sink, check_ids::CHK_0029);
    }
    Ok(())
}

fn check_0030(record: &Record, sink: &mut ViolationSink, today: NaiveDate) -> RuleResult {
    // 1年3か月は15か月の近似(30日換算)で判定する
    if record.require_flag(fields::STD_DKAIYAKU)? != Some(true) {
        if let Some(expiry) = loose_date(record.require(fields::STD_DREYEAR1)?) {
            if expiry > today + Duration::days(15 * 30) {
                note(record, sink, check_ids::CHK_0030);
            }
        }
    }
    Ok(())
}

fn check_0031(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STD_DKAIYAKU)? != Some(true)
        && record.is_blank(fields::STD_DREYEAR2)
    {
        note(record, sink, check_ids::CHK_0031);
    }
    Ok(())
}

fn check_0032(record: &Record, sink: &mut ViolationSink) -> RuleResult {
    if record.require_flag(fields::STD_DKAIYAKU)? == Some(true)
        && record.require_flag(fields::STD_DKAIYAKU_OP)? != Some(true)
    {
        note(record, sink, check_ids::CHK_0032);
    }
    Ok(())
}

pub fn build_rules(refs: &SchoolRefs, today: NaiveDate) -> RuleSet {
    let mut set = RuleSet::new(SERIES, IDENTITY);

    set.add(Rule::dataset("check_0003", check_0003));

    set.add(Rule::per_record("check_0002", check_0002));
    set.add(Rule::per_record("check_0004", check_0004));
    set.add(Rule::per_record("check_0007", check_0007));
    set.add(Rule::per_record("check_0008", check_0008));
    set.add(Rule::per_record("check_0009", |record, sink| {
        check_sale1_needs_sale2(record, sink, "004359", check_ids::CHK_0009)
    }));
    set.add(Rule::per_record("check_0010", |record, sink| {
        check_sale1_needs_sale2(record, sink, "000286", check_ids::CHK_0010)
    }));
    set.add(Rule::per_record("check_0011", |record, sink| {
        check_sale1_needs_sale2(record, sink, "001275", check_ids::CHK_0011)
    }));
    let bankrupt = Arc::clone(&refs.bankrupt_shops);
    set.add(Rule::per_record("check_0012", move |record, sink| {
        check_0012(record, sink, &bankrupt)
    }));
    set.add(Rule::per_record("check_0013", |record, sink| {
        check_sale1_route_211(record, sink, "000332", fields::STD_DNSYU, check_ids::CHK_0013)
    }));
    set.add(Rule::per_record("check_0014", |record, sink| {
        check_sale1_route_211(record, sink, "A30777", fields::STD_DNKEIRO, check_ids::CHK_0014)
    }));
    set.add(Rule::per_record("check_0015", |record, sink| {
        check_sale1_route_211(record, sink, "000583", fields::STD_DNSYU, check_ids::CHK_0015)
    }));
    set.add(Rule::per_record("check_0016", |record, sink| {
        check_sale1_route_211(record, sink, "000659", fields::STD_DNSYU, check_ids::CHK_0016)
    }));
    set.add(Rule::per_record("check_0017", |record, sink| {
        check_sale1_route_211(record, sink, "000759", fields::STD_DNSYU, check_ids::CHK_0017)
    }));
    set.add(Rule::per_record("check_0018", check_0018));
    let totalnet = Arc::clone(&refs.totalnet);
    set.add(Rule::per_record("check_0019", move |record, sink| {
        check_0019(record, sink, &totalnet)
    }));
    set.add(Rule::per_record("check_0020", check_0020));
    set.add(Rule::per_record("check_0021", check_0021));
    let excluded = Arc::clone(&refs.excluded_sales);
    set.add(Rule::per_record("check_0022", move |record, sink| {
        check_0022(record, sink, &excluded)
    }));
    set.add(Rule::per_record("check_0023", check_0023));
    set.add(Rule::per_record("check_0024", move |record, sink| {
        check_0024(record, sink, today)
    }));
    set.add(Rule::per_record("check_0025", move |record, sink| {
        check_0025(record, sink, today)
    }));
    set.add(Rule::per_record("check_0026", move |record, sink| {
        check_0026(record, sink, today)
    }));
    set.add(Rule::per_record("check_0027", move |record, sink| {
        check_0027(record, sink, today)
    }));
    set.add(Rule::per_record("check_0028", check_0028));
    set.add(Rule::per_record("check_0029", check_0029));
    set.add(Rule::per_record("check_0030", move |record, sink| {
        check_0030(record, sink, today)
    }));
    set.add(Rule::per_record("check_0031", check_0031));
    set.add(Rule::per_record("check_0032", check_0032));

    set
}

/// Run the DEKISPART_SCHOOL validation end to end.
pub fn run_dekispart_school_check<F>(
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
