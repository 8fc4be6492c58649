//! Core value types of the engine.
//!
//! This module contains the side-effect-free parts of the library:
//! - State names and ordered state sets
//! - Attribute storage and non-shadowing accessors
//! - The `Record` trait hosts implement
//! - Callback variants and their invocation contract
//! - Immutable transition logs

mod attribute;
mod callback;
mod history;
mod record;
mod state;

pub use attribute::{Accessor, AttributeStore};
pub use callback::{Callback, CallbackArg, CallbackError, TransitionContext};
pub use history::{Outcome, TransitionLog, TransitionRecord};
pub use record::Record;
pub use state::{StateSet, StateValue};
