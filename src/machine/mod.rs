//! Machine configuration and transition execution.

mod error;
mod machine;
mod transition;

pub use error::{ConfigError, TransitionError};
pub use machine::{InitialState, Machine};
pub use transition::{Phase, Transition};
