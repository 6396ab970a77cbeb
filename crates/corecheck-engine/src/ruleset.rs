//! Ordered, named collections of rules bound to one series.

use corecheck_model::Series;

use crate::rule::Rule;

/// Which fields of a record carry the primary and the maintenance
/// identifier for a series. Absent fields resolve to empty strings.
#[derive(Debug, Clone, Copy)]
pub struct RecordIdentity {
    pub record_id_field: &'static str,
    pub maintenance_id_field: &'static str,
}

/// An ordered collection of bound rules for one series. Binding against
/// reference datasets happens when the set is built, before the execution
/// loop starts; the set itself is immutable during a run.
pub struct RuleSet {
    series: Series,
    identity: RecordIdentity,
    dataset_rules: Vec<Rule>,
    record_rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(series: Series, identity: RecordIdentity) -> Self {
        Self {
            series,
            identity,
            dataset_rules: Vec::new(),
            record_rules: Vec::new(),
        }
    }

    /// Append a rule, preserving declaration order within its phase.
    pub fn add(&mut self, rule: Rule) {
        if rule.is_dataset() {
            self.dataset_rules.push(rule);
        } else {
            self.record_rules.push(rule);
        }
    }

    pub fn series(&self) -> Series {
        self.series
    }

    pub fn identity(&self) -> RecordIdentity {
        self.identity
    }

    pub fn dataset_rules(&self) -> &[Rule] {
        &self.dataset_rules
    }

    pub fn record_rules(&self) -> &[Rule] {
        &self.record_rules
    }

    pub fn len(&self) -> usize {
        self.dataset_rules.len() + self.record_rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset_rules.is_empty() && self.record_rules.is_empty()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field("series", &self.series)
            .field("dataset_rules", &self.dataset_rules.len())
            .field("record_rules", &self.record_rules.len())
            .finish()
    }
}
