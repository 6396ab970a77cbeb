//! Result aggregation across series.

use corecheck_model::ResultTable;

/// Concatenate per-series result tables in input order.
///
/// Rows are never reordered and never deduplicated: the same
/// `(record_id, check_id)` pair may legitimately appear more than once when
/// produced by distinct rules. Maintenance ids are already guaranteed
/// non-null by construction (`Violation` stores strings), so the uniform
/// four-column contract holds on every row.
pub fn merge<I>(tables: I) -> ResultTable
where
    I: IntoIterator<Item = ResultTable>,
{
    let mut merged = ResultTable::new();
    for table in tables {
        merged.extend(table);
    }
    merged
}

#[cfg(test)]
mod tests {
    use corecheck_model::{Series, Violation};

    use super::*;

    #[test]
    fn merge_preserves_input_order_without_dedup() {
        let first = ResultTable::from(vec![
            Violation::new(Series::Dekispart, "U1", "M1", "DEKISPART_CHK_0001"),
            Violation::new(Series::Dekispart, "U1", "M1", "DEKISPART_CHK_0002"),
        ]);
        let second = ResultTable::from(vec![
            Violation::new(Series::Cloud, "C1", "", "CLOUD_CHK_0001"),
            // Same record and check id as an earlier row; must survive.
            Violation::new(Series::Dekispart, "U1", "M1", "DEKISPART_CHK_0001"),
        ]);
        let merged = merge([first, second]);
        let ids: Vec<&str> = merged.iter().map(|row| row.check_id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "DEKISPART_CHK_0001",
                "DEKISPART_CHK_0002",
                "CLOUD_CHK_0001",
                "DEKISPART_CHK_0001",
            ]
        );
    }
}
