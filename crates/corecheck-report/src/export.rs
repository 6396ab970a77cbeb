//! Result table CSV export.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use corecheck_model::{CheckCatalog, ResultTable};

/// UTF-8 BOM so Excel opens the file with the right encoding.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Write the merged result table as CSV, resolving each check id to its
/// display message through the catalog. Column order matches the result
/// grid of the desktop application.
pub fn write_results_csv(
    path: &Path,
    table: &ResultTable,
    catalog: &CheckCatalog,
) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("create result file: {}", path.display()))?;
    file.write_all(UTF8_BOM)
        .with_context(|| format!("write result file: {}", path.display()))?;

    let mut writer = csv::Writer::from_writer(file);
    writer
        .write_record(["シリーズ", "ユーザID", "保守整理番号", "チェックID", "エラー内容"])
        .context("write result header")?;
    for row in table.iter() {
        writer
            .write_record([
                row.series.as_str(),
                row.record_id.as_str(),
                row.maintenance_id.as_str(),
                row.check_id.as_str(),
                catalog.message_for(&row.check_id).as_str(),
            ])
            .context("write result row")?;
    }
    writer.flush().context("flush result file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use corecheck_model::{CheckDefinition, Series, Violation};

    use super::*;

    #[test]
    fn writes_bom_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let mut catalog = CheckCatalog::new();
        catalog.insert(
            "DEKISPART_CHK_0001",
            CheckDefinition {
                series: "DEKISPART".to_string(),
                default_message: "商品区分とIDの対応不正".to_string(),
                ..CheckDefinition::default()
            },
        );
        let table = ResultTable::from(vec![Violation::new(
            Series::Dekispart,
            "01234567",
            "A001",
            "DEKISPART_CHK_0001",
        )]);

        write_results_csv(&path, &table, &catalog).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "シリーズ,ユーザID,保守整理番号,チェックID,エラー内容"
        );
        assert_eq!(
            lines.next().unwrap(),
            "DEKISPART,01234567,A001,DEKISPART_CHK_0001,商品区分とIDの対応不正"
        );
    }

    #[test]
    fn unknown_check_ids_get_the_unknown_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let table = ResultTable::from(vec![Violation::new(
            Series::Cloud,
            "U1",
            "",
            "CLOUD_CHK_9999",
        )]);
        write_results_csv(&path, &table, &CheckCatalog::new()).unwrap();
        let text = String::from_utf8(std::fs::read(&path).unwrap()[3..].to_vec()).unwrap();
        assert!(text.contains("不明なチェックID: CLOUD_CHK_9999"));
    }
}
