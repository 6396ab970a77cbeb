//! The rule abstraction: a single named predicate over one record or over
//! the whole dataset.

use corecheck_model::{MissingField, Record};
use thiserror::Error;

use crate::sink::ViolationSink;

/// Failure of a single rule evaluation. Business-logic "false" is never an
/// error; rules only fail on structural problems, and the engine converts
/// those into diagnostic violations instead of propagating them.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The record does not carry a column the rule reads.
    #[error("{0}")]
    MissingField(#[from] MissingField),

    /// Anything else a rule did not expect.
    #[error("{0}")]
    Unexpected(String),
}

impl RuleError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        RuleError::Unexpected(message.into())
    }
}

pub type RuleResult = Result<(), RuleError>;

type PerRecordFn = dyn Fn(&Record, &mut ViolationSink) -> RuleResult + Send + Sync;
type DatasetFn = dyn Fn(&[Record], &mut ViolationSink) -> RuleResult + Send + Sync;

pub(crate) enum RuleKind {
    PerRecord(Box<PerRecordFn>),
    Dataset(Box<DatasetFn>),
}

/// A named predicate. Per-record rules run once for every record;
/// whole-dataset rules run exactly once against the full collection.
/// Any reference data a rule needs is closed over at construction time,
/// never loaded inside the rule body.
pub struct Rule {
    name: &'static str,
    kind: RuleKind,
}

impl Rule {
    pub fn per_record<F>(name: &'static str, evaluate: F) -> Self
    where
        F: Fn(&Record, &mut ViolationSink) -> RuleResult + Send + Sync + 'static,
    {
        Self {
            name,
            kind: RuleKind::PerRecord(Box::new(evaluate)),
        }
    }

    pub fn dataset<F>(name: &'static str, evaluate: F) -> Self
    where
        F: Fn(&[Record], &mut ViolationSink) -> RuleResult + Send + Sync + 'static,
    {
        Self {
            name,
            kind: RuleKind::Dataset(Box::new(evaluate)),
        }
    }

    /// Rule name, embedded into diagnostic check ids on failure.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_dataset(&self) -> bool {
        matches!(self.kind, RuleKind::Dataset(_))
    }

    pub(crate) fn evaluate_record(&self, record: &Record, sink: &mut ViolationSink) -> RuleResult {
        match &self.kind {
            RuleKind::PerRecord(f) => f(record, sink),
            RuleKind::Dataset(_) => Ok(()),
        }
    }

    pub(crate) fn evaluate_dataset(
        &self,
        records: &[Record],
        sink: &mut ViolationSink,
    ) -> RuleResult {
        match &self.kind {
            RuleKind::Dataset(f) => f(records, sink),
            RuleKind::PerRecord(_) => Ok(()),
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("dataset", &self.is_dataset())
            .finish()
    }
}
