//! Reference-dataset loaders.
//!
//! Each loader reads one auxiliary export into its in-memory lookup
//! structure. Loaders run once per validation run, before rule-set
//! binding; rules never touch the filesystem.

use std::collections::BTreeSet;
use std::path::Path;

use corecheck_model::{
    CustomerEntry, CustomerMaster, LinkedItemSets, SalesChannelEntry, SalesChannelMaster,
    SalesPersonEntry, SalesPersonMaster,
};

use crate::error::Result;
use crate::records::parse_flag;
use crate::rows::{get_field, read_rows_with_required};

/// Individual-name keyword list (個人名チェックファイル).
pub fn load_individual_names(path: &Path) -> Result<Vec<String>> {
    let rows = read_rows_with_required(path, &["検索文字"])?;
    Ok(rows
        .iter()
        .map(|row| get_field(row, "検索文字"))
        .filter(|keyword| !keyword.trim().is_empty())
        .collect())
}

/// Totalnet registration list (トータルネット登録ファイル), keyed by 顧客番号.
pub fn load_totalnet(path: &Path) -> Result<BTreeSet<String>> {
    load_code_set(path, "顧客番号")
}

/// Sales-person master (担当者マスタ).
pub fn load_sales_persons(path: &Path) -> Result<SalesPersonMaster> {
    let rows = read_rows_with_required(path, &["担当者コード", "担当者名", "部門コード"])?;
    let mut master = SalesPersonMaster::new();
    for row in &rows {
        let code = get_field(row, "担当者コード");
        if code.trim().is_empty() {
            continue;
        }
        master.insert(
            code.trim(),
            SalesPersonEntry {
                name: get_field(row, "担当者名"),
                department: get_field(row, "部門コード"),
            },
        );
    }
    Ok(master)
}

/// Customer master (得意先マスタ). The 会社敬称 column is optional; older
/// exports only carry 担当敬称.
pub fn load_customers(path: &Path) -> Result<CustomerMaster> {
    let rows = read_rows_with_required(
        path,
        &["得意先コード", "得意先名１", "使用区分", "担当敬称"],
    )?;
    let mut master = CustomerMaster::new();
    for row in &rows {
        let code = get_field(row, "得意先コード");
        if code.trim().is_empty() {
            continue;
        }
        master.insert(
            code.trim(),
            CustomerEntry {
                name1: get_field(row, "得意先名１"),
                usage: get_field(row, "使用区分"),
                contact_honorific: get_field(row, "担当敬称"),
                company_honorific: get_field(row, "会社敬称"),
            },
        );
    }
    Ok(master)
}

/// Sales-channel master (販売店マスタ, T_salMst export).
pub fn load_sales_channels(path: &Path) -> Result<SalesChannelMaster> {
    let rows = read_rows_with_required(path, &["salCode", "salNotifyRenewal", "salJifuriDM"])?;
    let mut master = SalesChannelMaster::new();
    for row in &rows {
        let code = get_field(row, "salCode");
        if code.trim().is_empty() {
            continue;
        }
        master.insert(
            code.trim(),
            SalesChannelEntry {
                notify_renewal: parse_flag(get_field(row, "salNotifyRenewal").trim())
                    .unwrap_or(false),
                jifuri_dm: parse_flag(get_field(row, "salJifuriDM").trim()).unwrap_or(false),
            },
        );
    }
    Ok(master)
}

/// Generic single-column code set.
pub fn load_code_set(path: &Path, column: &str) -> Result<BTreeSet<String>> {
    let rows = read_rows_with_required(path, &[column])?;
    Ok(rows
        .iter()
        .map(|row| get_field(row, column).trim().to_string())
        .filter(|code| !code.is_empty())
        .collect())
}

/// Linked-item registration sets: ids that require the companion item and
/// ids that have it registered, from two single-column exports.
pub fn load_linked_item_sets(targets_path: &Path, registered_path: &Path) -> Result<LinkedItemSets> {
    Ok(LinkedItemSets {
        targets: load_code_set(targets_path, "stdID")?,
        registered: load_code_set(registered_path, "stdID")?,
    })
}
