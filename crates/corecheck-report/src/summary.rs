//! Summary report over a merged result table.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use corecheck_model::{CheckCatalog, ResultTable};

/// Aggregated view of one validation run: total count, per-series counts,
/// and the most frequent check ids.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub total: usize,
    pub per_series: BTreeMap<String, usize>,
    /// Top check ids by count, descending; ties break on the id.
    pub top_checks: Vec<(String, usize)>,
}

/// How many of the most frequent check ids the summary lists.
const TOP_CHECKS: usize = 5;

impl Summary {
    pub fn from_table(table: &ResultTable) -> Self {
        let mut per_series: BTreeMap<String, usize> = BTreeMap::new();
        let mut per_check: BTreeMap<String, usize> = BTreeMap::new();
        for row in table.iter() {
            *per_series.entry(row.series.as_str().to_string()).or_default() += 1;
            *per_check.entry(row.check_id.clone()).or_default() += 1;
        }
        let mut top_checks: Vec<(String, usize)> = per_check.into_iter().collect();
        top_checks.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_checks.truncate(TOP_CHECKS);
        Self {
            total: table.len(),
            per_series,
            top_checks,
        }
    }

    /// Plain-text rendering, the summary pane of the desktop application.
    pub fn render(&self, catalog: &CheckCatalog) -> String {
        let mut out = String::new();
        out.push_str("--- チェック結果のサマリー ---\n\n");
        if self.total == 0 {
            out.push_str("エラーは見つかりませんでした。\n");
            return out;
        }
        let _ = writeln!(out, "総エラー件数: {} 件", self.total);
        out.push('\n');
        out.push_str("シリーズ別エラー件数:\n");
        for (series, count) in &self.per_series {
            let _ = writeln!(out, "  - {series}: {count} 件");
        }
        if !self.top_checks.is_empty() {
            out.push('\n');
            let _ = writeln!(out, "主なエラー内容 (上位{}件):", self.top_checks.len());
            for (check_id, count) in &self.top_checks {
                let _ = writeln!(
                    out,
                    "  - {check_id} ({}): {count} 件",
                    catalog.message_for(check_id)
                );
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use corecheck_model::{Series, Violation};

    use super::*;

    fn table() -> ResultTable {
        ResultTable::from(vec![
            Violation::new(Series::Dekispart, "U1", "", "DEKISPART_CHK_0001"),
            Violation::new(Series::Dekispart, "U2", "", "DEKISPART_CHK_0001"),
            Violation::new(Series::Cloud, "C1", "", "CLOUD_CHK_0002"),
        ])
    }

    #[test]
    fn counts_by_series_and_check() {
        let summary = Summary::from_table(&table());
        assert_eq!(summary.total, 3);
        assert_eq!(summary.per_series.get("DEKISPART"), Some(&2));
        assert_eq!(summary.per_series.get("CLOUD"), Some(&1));
        assert_eq!(
            summary.top_checks.first(),
            Some(&("DEKISPART_CHK_0001".to_string(), 2))
        );
    }

    #[test]
    fn clean_run_renders_the_no_error_message() {
        let summary = Summary::from_table(&ResultTable::new());
        let text = summary.render(&CheckCatalog::new());
        assert!(text.contains("エラーは見つかりませんでした"));
    }
}
