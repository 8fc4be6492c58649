//! The record trait: what the engine requires of a host object.
//!
//! A record is any object carrying a state attribute. The trait exposes the
//! two ways that attribute may be physically stored (a storage column or
//! the overlay [`AttributeStore`]) plus the dynamic-dispatch hooks that
//! named and expression callbacks are routed through. The hooks have
//! erroring default implementations so closure-only users implement
//! nothing beyond storage access.

use super::attribute::AttributeStore;
use super::callback::{CallbackArg, CallbackError};
use super::state::StateValue;
use uuid::Uuid;

/// Host object for a state machine.
///
/// # Storage contract
///
/// `has_column`/`read_column`/`write_column` describe the record's own
/// storage slots (the mapped columns, for a persistence-backed record).
/// Records with no backing column for the state attribute still work:
/// the generated accessor falls back to the overlay store returned by
/// [`attributes`](Record::attributes).
///
/// # Dispatch hooks
///
/// `run_named_callback` invokes the method of the record named at callback
/// registration time; `eval_expression` evaluates registered source text
/// with access to the record's own fields. Both receive the record as the
/// explicit execution context (`&mut self`) rather than relying on any
/// implicit rebinding.
pub trait Record {
    /// The record's model name, used by providers to pick their table and
    /// to decide whether the record belongs to their object model.
    fn model_name(&self) -> &str;

    /// Whether the record has a storage slot for this attribute.
    fn has_column(&self, name: &str) -> bool;

    /// Read an attribute straight from its storage slot.
    fn read_column(&self, name: &str) -> Option<StateValue>;

    /// Write an attribute straight to its storage slot.
    fn write_column(&mut self, name: &str, value: StateValue);

    /// Overlay store for attributes with no storage slot.
    fn attributes(&self) -> &AttributeStore;

    /// Mutable access to the overlay store.
    fn attributes_mut(&mut self) -> &mut AttributeStore;

    /// Primary key, if the record has been persisted.
    fn id(&self) -> Option<Uuid> {
        None
    }

    /// Called by providers when they assign a primary key on first save.
    fn set_id(&mut self, _id: Uuid) {}

    /// Invoke the callback method registered under `name`.
    fn run_named_callback(
        &mut self,
        name: &str,
        _args: &[CallbackArg],
    ) -> Result<(), CallbackError> {
        Err(CallbackError::UnknownCallback(name.to_string()))
    }

    /// Evaluate callback source text in the record's context.
    fn eval_expression(&mut self, _source: &str) -> Result<(), CallbackError> {
        Err(CallbackError::ExpressionUnsupported)
    }
}
