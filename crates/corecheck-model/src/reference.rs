//! Typed reference datasets consulted by context-dependent rules.
//!
//! Each dataset is built once per validation run from an external source and
//! is read-only for the duration of the run. Lookups are keyed by the
//! natural code of the source table.

use std::collections::{BTreeMap, BTreeSet};

/// Sales-person master (担当者マスタ). Keyed by 担当者コード.
#[derive(Debug, Clone, Default)]
pub struct SalesPersonMaster {
    by_code: BTreeMap<String, SalesPersonEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct SalesPersonEntry {
    /// 担当者名
    pub name: String,
    /// 部門コード
    pub department: String,
}

impl SalesPersonMaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>, entry: SalesPersonEntry) {
        self.by_code.insert(code.into(), entry);
    }

    pub fn get(&self, code: &str) -> Option<&SalesPersonEntry> {
        self.by_code.get(code)
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// Distinct non-empty 部門コード values, used as the set of valid
    /// branch offices.
    pub fn departments(&self) -> BTreeSet<String> {
        self.by_code
            .values()
            .filter(|entry| !entry.department.trim().is_empty())
            .map(|entry| entry.department.clone())
            .collect()
    }
}

/// Customer master (得意先マスタ). Keyed by 得意先コード.
#[derive(Debug, Clone, Default)]
pub struct CustomerMaster {
    by_code: BTreeMap<String, CustomerEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerEntry {
    /// 得意先名１
    pub name1: String,
    /// 使用区分
    pub usage: String,
    /// 担当敬称
    pub contact_honorific: String,
    /// 会社敬称 (optional column; empty when the export lacks it)
    pub company_honorific: String,
}

impl CustomerMaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>, entry: CustomerEntry) {
        self.by_code.insert(code.into(), entry);
    }

    pub fn get(&self, code: &str) -> Option<&CustomerEntry> {
        self.by_code.get(code)
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }
}

/// Sales-channel master (販売店マスタ, T_salMst). Keyed by salCode.
#[derive(Debug, Clone, Default)]
pub struct SalesChannelMaster {
    by_code: BTreeMap<String, SalesChannelEntry>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SalesChannelEntry {
    pub notify_renewal: bool,
    pub jifuri_dm: bool,
}

impl SalesChannelMaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>, entry: SalesChannelEntry) {
        self.by_code.insert(code.into(), entry);
    }

    pub fn get(&self, code: &str) -> Option<&SalesChannelEntry> {
        self.by_code.get(code)
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// Pre-computed id sets for the linked-item registration check: ids that
/// require the companion item, and ids that have it registered.
#[derive(Debug, Clone, Default)]
pub struct LinkedItemSets {
    pub targets: BTreeSet<String>,
    pub registered: BTreeSet<String>,
}

impl LinkedItemSets {
    pub fn needs_item(&self, id: &str) -> bool {
        self.targets.contains(id) && !self.registered.contains(id)
    }
}
