//! Machine configuration and transition errors.

use crate::core::{CallbackError, StateValue};
use crate::provider::ProviderError;
use thiserror::Error;

/// Errors raised while configuring a machine.
///
/// Configuration failures are detected at registration time, before any
/// transition runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot register a {kind} callback with a blank target")]
    BlankCallback { kind: &'static str },

    #[error("attribute name cannot be blank")]
    BlankAttribute,

    #[error("initial state '{0}' is not a declared state")]
    UnknownInitialState(String),
}

/// Errors raised while constructing or performing a transition.
///
/// A rolled-back transition is not represented here; rollback is a normal
/// outcome reported by `perform`.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("record is in state '{actual}' but the transition expects '{expected}'")]
    FromStateMismatch {
        expected: StateValue,
        actual: StateValue,
    },

    #[error("record has no current state; expected '{expected}'")]
    MissingCurrentState { expected: StateValue },

    #[error("state '{0}' is not a declared state")]
    UnknownState(String),

    #[error("transition has already been performed")]
    AlreadyPerformed,

    #[error(transparent)]
    Callback(#[from] CallbackError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
