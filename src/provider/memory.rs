//! In-memory reference provider.
//!
//! Rows live in per-model tables in creation order. Transactions take a
//! snapshot of every table and restore it on rollback, so writes made by
//! the scope's body are undone wholesale, exactly like the contract asks.

use super::{PersistenceProvider, ProviderError, QueryMode, TransactionBody};
use crate::core::{Accessor, Record, StateValue};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Reference provider storing records in memory.
///
/// # Example
///
/// ```rust
/// use gearshift::provider::{MemoryProvider, PersistenceProvider};
/// # use gearshift::core::{AttributeStore, Record, StateValue};
/// # #[derive(Clone, Default)]
/// # struct Vehicle { id: Option<uuid::Uuid>, state: Option<StateValue>, attributes: AttributeStore }
/// # impl Record for Vehicle {
/// #     fn model_name(&self) -> &str { "vehicle" }
/// #     fn has_column(&self, name: &str) -> bool { name == "state" }
/// #     fn read_column(&self, _n: &str) -> Option<StateValue> { self.state.clone() }
/// #     fn write_column(&mut self, _n: &str, v: StateValue) { self.state = Some(v); }
/// #     fn attributes(&self) -> &AttributeStore { &self.attributes }
/// #     fn attributes_mut(&mut self) -> &mut AttributeStore { &mut self.attributes }
/// #     fn id(&self) -> Option<uuid::Uuid> { self.id }
/// #     fn set_id(&mut self, id: uuid::Uuid) { self.id = Some(id); }
/// # }
///
/// let provider: MemoryProvider<Vehicle> = MemoryProvider::new();
/// let mut car = Vehicle::default();
/// provider.save(&mut car).unwrap();
///
/// assert!(car.id().is_some());
/// assert_eq!(provider.count("vehicle"), 1);
/// ```
pub struct MemoryProvider<R> {
    tables: Mutex<HashMap<String, Vec<R>>>,
    models: Vec<String>,
}

impl<R: Record + Clone + Send + Sync> MemoryProvider<R> {
    /// Provider that claims every record handed to it.
    pub fn new() -> Self {
        MemoryProvider {
            tables: Mutex::new(HashMap::new()),
            models: Vec::new(),
        }
    }

    /// Provider that only claims records of the given models.
    ///
    /// Records of other models fail [`matches`](PersistenceProvider::matches),
    /// which is how detection tests exercise the unbacked path.
    pub fn for_models<I, T>(models: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        MemoryProvider {
            tables: Mutex::new(HashMap::new()),
            models: models.into_iter().map(Into::into).collect(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<R>>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of persisted rows for a model.
    pub fn count(&self, model: &str) -> usize {
        self.lock().get(model).map_or(0, Vec::len)
    }

    /// All persisted rows of a model, in creation order.
    pub fn all(&self, model: &str) -> Vec<R> {
        self.lock().get(model).cloned().unwrap_or_default()
    }

    /// Rows whose attribute equals the single given state.
    pub fn with_state(
        &self,
        model: &str,
        attribute: &str,
        name: &str,
    ) -> Result<Vec<R>, ProviderError> {
        self.with_states(model, attribute, &[name])
    }

    /// Rows whose attribute is one of the given states.
    pub fn with_states(
        &self,
        model: &str,
        attribute: &str,
        names: &[&str],
    ) -> Result<Vec<R>, ProviderError> {
        let values: Vec<StateValue> = names.iter().copied().map(StateValue::from).collect();
        self.query_by_attribute(model, attribute, &values, QueryMode::Include)
    }

    /// Rows whose attribute is present and not one of the given states.
    pub fn without_states(
        &self,
        model: &str,
        attribute: &str,
        names: &[&str],
    ) -> Result<Vec<R>, ProviderError> {
        let values: Vec<StateValue> = names.iter().copied().map(StateValue::from).collect();
        self.query_by_attribute(model, attribute, &values, QueryMode::Exclude)
    }
}

impl<R: Record + Clone + Send + Sync> Default for MemoryProvider<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record + Clone + Send + Sync> PersistenceProvider<R> for MemoryProvider<R> {
    fn matches(&self, record: &R) -> bool {
        self.models.is_empty() || self.models.iter().any(|m| m == record.model_name())
    }

    fn save(&self, record: &mut R) -> Result<bool, ProviderError> {
        if !self.matches(record) {
            return Err(ProviderError::UnknownModel(record.model_name().to_string()));
        }

        let mut tables = self.lock();
        let table = tables
            .entry(record.model_name().to_string())
            .or_default();

        match record.id() {
            // Re-inserting under an existing id covers records whose
            // creating transaction rolled back.
            Some(id) => match table.iter_mut().find(|r| r.id() == Some(id)) {
                Some(row) => *row = record.clone(),
                None => table.push(record.clone()),
            },
            None => {
                record.set_id(Uuid::new_v4());
                table.push(record.clone());
            }
        }

        Ok(true)
    }

    fn transaction(
        &self,
        record: &mut R,
        body: &mut TransactionBody<'_, R>,
    ) -> Result<bool, ProviderError> {
        // Snapshot outside the body's own locking.
        let snapshot = self.lock().clone();

        let outcome = body(record);
        let commit = matches!(outcome, Ok(true));
        if !commit {
            *self.lock() = snapshot;
            tracing::debug!(model = record.model_name(), "transaction rolled back");
        }

        outcome
    }

    fn query_by_attribute(
        &self,
        model: &str,
        attribute: &str,
        values: &[StateValue],
        mode: QueryMode,
    ) -> Result<Vec<R>, ProviderError> {
        let accessor = Accessor::new(attribute);
        let tables = self.lock();
        let rows = tables.get(model).map(Vec::as_slice).unwrap_or(&[]);

        let matched = rows
            .iter()
            .filter(|row| match (accessor.read(*row), mode) {
                (Some(value), QueryMode::Include) => values.contains(&value),
                (Some(value), QueryMode::Exclude) => !values.contains(&value),
                // Rows with no attribute value match neither mode, the
                // same way NULL behaves under IN / NOT IN.
                (None, _) => false,
            })
            .cloned()
            .collect();

        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AttributeStore;

    #[derive(Clone, Default)]
    struct Vehicle {
        id: Option<Uuid>,
        name: String,
        state: Option<StateValue>,
        attributes: AttributeStore,
    }

    impl Vehicle {
        fn named(name: &str, state: &str) -> Self {
            Vehicle {
                name: name.to_string(),
                state: Some(StateValue::new(state)),
                ..Vehicle::default()
            }
        }
    }

    impl Record for Vehicle {
        fn model_name(&self) -> &str {
            "vehicle"
        }

        fn has_column(&self, name: &str) -> bool {
            name == "state"
        }

        fn read_column(&self, name: &str) -> Option<StateValue> {
            if name == "state" {
                self.state.clone()
            } else {
                None
            }
        }

        fn write_column(&mut self, name: &str, value: StateValue) {
            if name == "state" {
                self.state = Some(value);
            }
        }

        fn attributes(&self) -> &AttributeStore {
            &self.attributes
        }

        fn attributes_mut(&mut self) -> &mut AttributeStore {
            &mut self.attributes
        }

        fn id(&self) -> Option<Uuid> {
            self.id
        }

        fn set_id(&mut self, id: Uuid) {
            self.id = Some(id);
        }
    }

    #[test]
    fn save_assigns_an_id_and_creates_a_row() {
        let provider = MemoryProvider::new();
        let mut car = Vehicle::named("car", "parked");

        assert!(provider.save(&mut car).unwrap());
        assert!(car.id().is_some());
        assert_eq!(provider.count("vehicle"), 1);
    }

    #[test]
    fn save_updates_the_existing_row() {
        let provider = MemoryProvider::new();
        let mut car = Vehicle::named("car", "parked");
        provider.save(&mut car).unwrap();

        car.state = Some(StateValue::new("idling"));
        provider.save(&mut car).unwrap();

        assert_eq!(provider.count("vehicle"), 1);
        let rows = provider.all("vehicle");
        assert_eq!(rows[0].state.clone().unwrap(), "idling");
    }

    #[test]
    fn matches_respects_registered_models() {
        let any: MemoryProvider<Vehicle> = MemoryProvider::new();
        let scoped: MemoryProvider<Vehicle> = MemoryProvider::for_models(["truck"]);
        let car = Vehicle::named("car", "parked");

        assert!(any.matches(&car));
        assert!(!scoped.matches(&car));
    }

    #[test]
    fn save_rejects_unclaimed_models() {
        let provider: MemoryProvider<Vehicle> = MemoryProvider::for_models(["truck"]);
        let mut car = Vehicle::named("car", "parked");

        let result = provider.save(&mut car);
        assert!(matches!(result, Err(ProviderError::UnknownModel(_))));
    }

    #[test]
    fn falsy_body_rolls_back_every_write_in_scope() {
        let provider = MemoryProvider::new();
        let mut car = Vehicle::named("car", "parked");
        provider.save(&mut car).unwrap();

        let mut other = Vehicle::named("truck", "parked");
        let committed = provider
            .transaction(&mut car, &mut |record| {
                record.state = Some(StateValue::new("idling"));
                provider.save(record)?;
                // A write unrelated to the state save, also in scope.
                provider.save(&mut other)?;
                Ok(false)
            })
            .unwrap();

        assert!(!committed);
        assert_eq!(provider.count("vehicle"), 1);
        let rows = provider.all("vehicle");
        assert_eq!(rows[0].state.clone().unwrap(), "parked");
    }

    #[test]
    fn truthy_body_commits_every_write_in_scope() {
        let provider = MemoryProvider::new();
        let mut car = Vehicle::named("car", "parked");

        let committed = provider
            .transaction(&mut car, &mut |record| {
                provider.save(record)?;
                let mut second = Vehicle::named("truck", "idling");
                provider.save(&mut second)?;
                Ok(true)
            })
            .unwrap();

        assert!(committed);
        assert_eq!(provider.count("vehicle"), 2);
    }

    #[test]
    fn queries_filter_by_state_in_creation_order() {
        let provider = MemoryProvider::new();
        provider.save(&mut Vehicle::named("car", "parked")).unwrap();
        provider.save(&mut Vehicle::named("truck", "idling")).unwrap();

        let parked = provider.with_state("vehicle", "state", "parked").unwrap();
        assert_eq!(parked.len(), 1);
        assert_eq!(parked[0].name, "car");

        let both = provider
            .with_states("vehicle", "state", &["parked", "idling"])
            .unwrap();
        let names: Vec<&str> = both.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["car", "truck"]);

        let not_first_gear = provider
            .without_states("vehicle", "state", &["first_gear"])
            .unwrap();
        assert_eq!(not_first_gear.len(), 2);
    }

    #[test]
    fn rows_without_a_value_match_no_query() {
        let provider = MemoryProvider::new();
        let mut blank = Vehicle::default();
        blank.name = "ghost".to_string();
        provider.save(&mut blank).unwrap();

        let included = provider.with_state("vehicle", "state", "parked").unwrap();
        assert!(included.is_empty());

        let excluded = provider
            .without_states("vehicle", "state", &["parked"])
            .unwrap();
        assert!(excluded.is_empty());
    }
}
