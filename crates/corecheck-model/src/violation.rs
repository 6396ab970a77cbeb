//! Violations and the four-column result table.

use serde::{Deserialize, Serialize};

use crate::series::Series;

/// One reported rule failure. `check_id` is the stable identifier a
/// separate catalog maps to display text; the engine never embeds messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub series: Series,
    pub record_id: String,
    /// Secondary tracking identifier, for operational traceability only.
    /// Empty when the record carries none; never null.
    pub maintenance_id: String,
    pub check_id: String,
}

impl Violation {
    pub fn new(
        series: Series,
        record_id: impl Into<String>,
        maintenance_id: impl Into<String>,
        check_id: impl Into<String>,
    ) -> Self {
        Self {
            series,
            record_id: record_id.into(),
            maintenance_id: maintenance_id.into(),
            check_id: check_id.into(),
        }
    }
}

/// Insertion-ordered sequence of violations with the fixed column schema
/// `[series, record_id, maintenance_id, check_id]`. Ordering is record
/// iteration order times rule evaluation order; sorting is a presentation
/// concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    rows: Vec<Violation>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.rows.push(violation);
    }

    pub fn extend(&mut self, other: ResultTable) {
        self.rows.extend(other.rows);
    }

    pub fn rows(&self) -> &[Violation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.rows.iter()
    }

    /// Stamp every row with the given series. The orchestrator applies this
    /// defensively so individual rules never have to set provenance.
    pub fn force_series(&mut self, series: Series) {
        for row in &mut self.rows {
            row.series = series;
        }
    }
}

impl From<Vec<Violation>> for ResultTable {
    fn from(rows: Vec<Violation>) -> Self {
        Self { rows }
    }
}

impl IntoIterator for ResultTable {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_series_overwrites_provenance() {
        let mut table = ResultTable::from(vec![Violation::new(
            Series::System,
            "U1",
            "",
            "DEKISPART_CHK_0001",
        )]);
        table.force_series(Series::Dekispart);
        assert_eq!(table.rows()[0].series, Series::Dekispart);
    }
}
