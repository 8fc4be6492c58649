//! Transition outcome records and immutable logs.
//!
//! Every perform attempt produces a [`TransitionRecord`] whether it
//! committed or rolled back. [`TransitionLog`] accumulates them without
//! mutation: `record` returns a new log, leaving the original untouched.

use super::state::StateValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a performed transition ended.
///
/// A rollback is an outcome, not an error: the persistence scope reported
/// falsy and every write inside it was undone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The transactional scope committed.
    Committed,
    /// The transactional scope rolled back all writes.
    RolledBack,
}

impl Outcome {
    /// Whether the transition's writes were kept.
    pub fn is_committed(&self) -> bool {
        matches!(self, Outcome::Committed)
    }
}

/// Record of one performed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Event that triggered the transition.
    pub event: String,
    /// State transitioned from.
    pub from: StateValue,
    /// State transitioned to.
    pub to: StateValue,
    /// Commit or rollback.
    pub outcome: Outcome,
    /// When the transition finished.
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of performed transitions.
///
/// # Example
///
/// ```rust
/// use gearshift::core::{Outcome, StateValue, TransitionLog, TransitionRecord};
/// use chrono::Utc;
///
/// let log = TransitionLog::new();
/// let log = log.record(TransitionRecord {
///     event: "ignite".to_string(),
///     from: StateValue::new("parked"),
///     to: StateValue::new("idling"),
///     outcome: Outcome::Committed,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(log.records().len(), 1);
/// let path: Vec<&str> = log.path().iter().map(|s| s.as_str()).collect();
/// assert_eq!(path, vec!["parked", "idling"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionLog {
    records: Vec<TransitionRecord>,
}

impl TransitionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        TransitionLog {
            records: Vec::new(),
        }
    }

    /// Append a record, returning a new log.
    pub fn record(&self, record: TransitionRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        TransitionLog { records }
    }

    /// All records in perform order.
    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    /// Records whose transaction committed.
    pub fn committed(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter().filter(|r| r.outcome.is_committed())
    }

    /// States actually traversed: the first committed record's source
    /// followed by the target of every committed record. Rolled-back
    /// attempts never moved the record, so they do not appear.
    pub fn path(&self) -> Vec<&StateValue> {
        let mut path = Vec::new();
        for record in self.committed() {
            if path.is_empty() {
                path.push(&record.from);
            }
            path.push(&record.to);
        }
        path
    }

    /// Elapsed time between the first and last record, if any.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.first()?, self.records.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }
}
