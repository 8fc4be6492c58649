//! Persistence provider boundary.
//!
//! The engine never talks to a datastore directly. Everything it needs is
//! behind [`PersistenceProvider`]: a save operation, a transactional scope
//! with a truthy/falsy commit contract, adapter detection, and
//! attribute-value queries for scope building. [`memory`] ships a
//! reference provider with real transactional semantics.

pub mod memory;

pub use memory::MemoryProvider;

use crate::core::{Record, StateValue};
use thiserror::Error;

/// Errors raised by a persistence provider.
///
/// A rolled-back transaction is not an error; it is reported through the
/// boolean returned by [`PersistenceProvider::transaction`].
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("save failed: {0}")]
    SaveFailed(String),

    #[error("query failed: {0}")]
    QueryFailed(String),

    #[error("model '{0}' is not managed by this provider")]
    UnknownModel(String),
}

/// Whether a query keeps or drops rows matching the given values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryMode {
    /// Keep rows whose attribute is one of the values.
    Include,
    /// Keep rows whose attribute is present and not one of the values.
    Exclude,
}

/// Body of a transactional scope.
///
/// Returning `Ok(true)` commits; `Ok(false)` rolls back every write made
/// inside the scope. Errors propagate and also roll back.
pub type TransactionBody<'a, R> = dyn FnMut(&mut R) -> Result<bool, ProviderError> + 'a;

/// The narrow interface the engine requires of a datastore.
pub trait PersistenceProvider<R: Record>: Send + Sync {
    /// Whether the record belongs to this provider's object model.
    ///
    /// Machines use this for adapter auto-detection; a record no provider
    /// claims simply runs unbacked.
    fn matches(&self, record: &R) -> bool;

    /// Canonical name of the persistence operation a machine triggers.
    fn default_save_action(&self) -> &str {
        "save"
    }

    /// Persist the record. Returns whether the save took effect.
    fn save(&self, record: &mut R) -> Result<bool, ProviderError>;

    /// Run `body` in a transactional scope.
    ///
    /// The rollback decision is based solely on the body's return value,
    /// not on which writes happened inside: `Ok(false)` undoes all of
    /// them, including writes unrelated to any state attribute.
    fn transaction(
        &self,
        record: &mut R,
        body: &mut TransactionBody<'_, R>,
    ) -> Result<bool, ProviderError>;

    /// Fetch records of `model` by attribute value, in creation order.
    fn query_by_attribute(
        &self,
        model: &str,
        attribute: &str,
        values: &[StateValue],
        mode: QueryMode,
    ) -> Result<Vec<R>, ProviderError>;
}
