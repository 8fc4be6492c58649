//! A single proposed state change and its execution pipeline.
//!
//! A transition is built by a machine for one event and performed once:
//! before-callbacks, attribute write, persistence inside a transactional
//! scope, then after-callbacks on commit. The transactional scope's
//! boolean alone decides commit versus rollback; rollback is a normal
//! outcome, not an error.

use super::error::TransitionError;
use super::machine::Machine;
use crate::core::{Outcome, Record, StateValue, TransitionContext, TransitionRecord};
use chrono::Utc;
use uuid::Uuid;

/// Lifecycle of a transition object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Built, not yet performed.
    Pending,
    /// Perform in progress.
    Performing,
    /// Performed and committed. Terminal.
    Completed,
    /// Performed and rolled back. Terminal.
    RolledBack,
}

impl Phase {
    /// Whether the transition can no longer be performed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed | Phase::RolledBack)
    }
}

/// One proposed state change for one record.
///
/// Single-use: performing a second time returns
/// [`TransitionError::AlreadyPerformed`]. Retrying a rolled-back change
/// means building a fresh transition.
pub struct Transition {
    id: Uuid,
    event: String,
    from: StateValue,
    to: StateValue,
    attribute: String,
    phase: Phase,
}

impl Transition {
    pub(crate) fn new(event: &str, from: StateValue, to: StateValue, attribute: &str) -> Self {
        Transition {
            id: Uuid::new_v4(),
            event: event.to_string(),
            from,
            to,
            attribute: attribute.to_string(),
            phase: Phase::Pending,
        }
    }

    /// Identifier of this transition attempt.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The event that triggered the transition.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// State being transitioned from.
    pub fn from(&self) -> &StateValue {
        &self.from
    }

    /// State being transitioned to.
    pub fn to(&self) -> &StateValue {
        &self.to
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Snapshot handed to callbacks.
    pub fn context(&self) -> TransitionContext {
        TransitionContext {
            id: self.id,
            event: self.event.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            attribute: self.attribute.clone(),
        }
    }

    /// Perform the transition, persisting through the machine's save
    /// action. The scope commits when the save reports success.
    pub fn perform<R: Record>(
        &mut self,
        machine: &Machine<R>,
        record: &mut R,
    ) -> Result<TransitionRecord, TransitionError> {
        self.run(machine, record, None)
    }

    /// Perform the transition with a caller-supplied transactional body.
    ///
    /// The body runs inside the same scope, after the save action, and its
    /// return value alone decides commit versus rollback; `false` undoes
    /// every write made in the scope, the save included.
    pub fn perform_within<R, F>(
        &mut self,
        machine: &Machine<R>,
        record: &mut R,
        mut body: F,
    ) -> Result<TransitionRecord, TransitionError>
    where
        R: Record,
        F: FnMut(&mut R) -> bool,
    {
        self.run(machine, record, Some(&mut body))
    }

    fn run<R: Record>(
        &mut self,
        machine: &Machine<R>,
        record: &mut R,
        mut caller: Option<&mut dyn FnMut(&mut R) -> bool>,
    ) -> Result<TransitionRecord, TransitionError> {
        if self.phase != Phase::Pending {
            return Err(TransitionError::AlreadyPerformed);
        }
        self.phase = Phase::Performing;

        tracing::debug!(
            event = %self.event,
            from = %self.from,
            to = %self.to,
            "performing transition"
        );

        let ctx = self.context();
        for callback in machine.before_callbacks() {
            callback.invoke_before(record, &ctx)?;
        }

        machine.accessor().write(record, self.to.clone());

        let committed = match machine.provider() {
            Some(provider) => provider.transaction(record, &mut |record| {
                let saved = provider.save(record)?;
                match caller.as_mut() {
                    Some(body) => Ok(body(record)),
                    None => Ok(saved),
                }
            })?,
            // Unbacked machine: no writes to commit or undo.
            None => true,
        };

        if committed {
            // The scope has committed; the transition is complete even if
            // an after-callback fails below.
            self.phase = Phase::Completed;
            for callback in machine.after_callbacks() {
                callback.invoke_after(record, &ctx)?;
            }
        } else {
            self.phase = Phase::RolledBack;
            tracing::debug!(event = %self.event, "transition rolled back");
        }

        Ok(TransitionRecord {
            event: self.event.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            outcome: if committed {
                Outcome::Committed
            } else {
                Outcome::RolledBack
            },
            timestamp: Utc::now(),
        })
    }
}
