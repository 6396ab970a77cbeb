//! Console rendering of run summaries and check listings.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use corecheck_model::{CheckCatalog, Series};
use corecheck_report::Summary;

pub fn print_run_summary(summary: &Summary, catalog: &CheckCatalog) {
    let mut table = Table::new();
    apply_style(&mut table);
    table.set_header(vec![Cell::new("シリーズ"), Cell::new("エラー件数")]);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for (series, count) in &summary.per_series {
        table.add_row(vec![Cell::new(series), Cell::new(count)]);
    }
    table.add_row(vec![Cell::new("合計"), Cell::new(summary.total)]);
    println!("{table}");
    println!();
    println!("{}", summary.render(catalog));
}

pub fn print_checks_table(catalog: &CheckCatalog, series: Option<Series>) {
    let mut table = Table::new();
    apply_style(&mut table);
    table.set_header(vec![
        Cell::new("チェックID"),
        Cell::new("シリーズ"),
        Cell::new("項目名"),
        Cell::new("重要度"),
        Cell::new("エラー内容"),
    ]);
    for (check_id, definition) in catalog.iter() {
        if let Some(series) = series {
            if definition.series != series.as_str() {
                continue;
            }
        }
        table.add_row(vec![
            Cell::new(check_id),
            Cell::new(&definition.series),
            Cell::new(&definition.name),
            Cell::new(&definition.severity),
            Cell::new(definition.message()),
        ]);
    }
    println!("{table}");
}

fn apply_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}
