//! The machine: states, attribute, initial-state policy, callback chains.
//!
//! One machine is configured per model type and shared by every record of
//! that type. It owns no record state of its own; transitions carry the
//! per-attempt state.

use super::error::{ConfigError, TransitionError};
use super::transition::Transition;
use crate::core::{Accessor, Callback, Record, StateSet, StateValue};
use crate::provider::PersistenceProvider;
use std::sync::Arc;

/// How a machine initializes the state attribute on a fresh record.
pub enum InitialState<R> {
    /// A fixed state value.
    Value(StateValue),
    /// A generator invoked with the record being initialized.
    Generator(Arc<dyn Fn(&R) -> StateValue + Send + Sync>),
}

impl<R> InitialState<R> {
    fn resolve(&self, record: &R) -> StateValue {
        match self {
            InitialState::Value(value) => value.clone(),
            InitialState::Generator(f) => f(record),
        }
    }
}

impl<R> Clone for InitialState<R> {
    fn clone(&self) -> Self {
        match self {
            InitialState::Value(value) => InitialState::Value(value.clone()),
            InitialState::Generator(f) => InitialState::Generator(Arc::clone(f)),
        }
    }
}

/// State machine configuration for one model type.
///
/// # Example
///
/// ```rust
/// use gearshift::machine::Machine;
/// # use gearshift::core::{AttributeStore, Record, StateValue};
/// # #[derive(Default)]
/// # struct Vehicle { state: Option<StateValue>, attributes: AttributeStore }
/// # impl Record for Vehicle {
/// #     fn model_name(&self) -> &str { "vehicle" }
/// #     fn has_column(&self, name: &str) -> bool { name == "state" }
/// #     fn read_column(&self, _n: &str) -> Option<StateValue> { self.state.clone() }
/// #     fn write_column(&mut self, _n: &str, v: StateValue) { self.state = Some(v); }
/// #     fn attributes(&self) -> &AttributeStore { &self.attributes }
/// #     fn attributes_mut(&mut self) -> &mut AttributeStore { &mut self.attributes }
/// # }
///
/// let mut machine: Machine<Vehicle> = Machine::new();
/// machine.declare_states(["parked", "idling", "first_gear"]);
/// machine.set_initial("parked").unwrap();
///
/// let mut car = Vehicle::default();
/// machine.initialize_record(&mut car);
/// assert_eq!(machine.current_state(&car).unwrap(), "parked");
/// ```
pub struct Machine<R: Record> {
    accessor: Accessor,
    states: StateSet,
    initial: Option<InitialState<R>>,
    before: Vec<Callback<R>>,
    after: Vec<Callback<R>>,
    action: Option<String>,
    provider: Option<Arc<dyn PersistenceProvider<R>>>,
}

impl<R: Record> Machine<R> {
    /// Create a machine over the default `"state"` attribute.
    pub fn new() -> Self {
        Machine {
            accessor: Accessor::new("state"),
            states: StateSet::new(),
            initial: None,
            before: Vec::new(),
            after: Vec::new(),
            action: None,
            provider: None,
        }
    }

    /// Configure which attribute holds state.
    ///
    /// The generated accessor composes with any storage slot the record
    /// already has for this name; it never shadows it.
    pub fn set_attribute(&mut self, name: &str) -> Result<(), ConfigError> {
        if name.trim().is_empty() {
            return Err(ConfigError::BlankAttribute);
        }
        self.accessor = Accessor::new(name);
        Ok(())
    }

    /// The attribute this machine stores state in.
    pub fn attribute(&self) -> &str {
        self.accessor.attribute()
    }

    /// The accessor generated for the configured attribute.
    pub fn accessor(&self) -> &Accessor {
        &self.accessor
    }

    /// Register valid state names. Existing record data is not validated.
    pub fn declare_states<I, T>(&mut self, names: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<StateValue>,
    {
        self.states.declare_all(names);
    }

    /// Declared states, in declaration order.
    pub fn states(&self) -> &StateSet {
        &self.states
    }

    /// Attribute name and declared states, for adapters building scopes.
    pub fn scope_source(&self) -> (&str, &StateSet) {
        (self.accessor.attribute(), &self.states)
    }

    /// Set a fixed initial state.
    ///
    /// Must be a declared state when a state set was declared; declare
    /// states before configuring the initial value.
    pub fn set_initial(&mut self, value: impl Into<StateValue>) -> Result<(), ConfigError> {
        let value = value.into();
        if !self.states.is_empty() && !self.states.contains(value.as_str()) {
            return Err(ConfigError::UnknownInitialState(value.to_string()));
        }
        self.initial = Some(InitialState::Value(value));
        Ok(())
    }

    /// Set a generator invoked per record to compute the initial state.
    pub fn set_initial_with<F>(&mut self, generator: F)
    where
        F: Fn(&R) -> StateValue + Send + Sync + 'static,
    {
        self.initial = Some(InitialState::Generator(Arc::new(generator)));
    }

    pub(crate) fn set_initial_state(&mut self, initial: InitialState<R>) {
        self.initial = Some(initial);
    }

    /// Override the persistence action name this machine reports.
    pub fn set_action(&mut self, name: impl Into<String>) {
        self.action = Some(name.into());
    }

    /// The persistence operation triggered on perform: the configured
    /// override, the provider's canonical save action, or `"save"` when
    /// the machine is unbacked.
    pub fn default_action(&self) -> &str {
        if let Some(action) = &self.action {
            return action;
        }
        self.provider
            .as_deref()
            .map(|provider| provider.default_save_action())
            .unwrap_or("save")
    }

    /// Append a before-transition callback. Registrations accumulate.
    pub fn register_before_callback(&mut self, callback: Callback<R>) -> Result<(), ConfigError> {
        Self::check_registration(&callback)?;
        self.before.push(callback);
        Ok(())
    }

    /// Append an after-transition callback. Registrations accumulate.
    pub fn register_after_callback(&mut self, callback: Callback<R>) -> Result<(), ConfigError> {
        Self::check_registration(&callback)?;
        self.after.push(callback);
        Ok(())
    }

    fn check_registration(callback: &Callback<R>) -> Result<(), ConfigError> {
        if callback.is_well_formed() {
            Ok(())
        } else {
            Err(ConfigError::BlankCallback {
                kind: callback.kind(),
            })
        }
    }

    pub(crate) fn before_callbacks(&self) -> &[Callback<R>] {
        &self.before
    }

    pub(crate) fn after_callbacks(&self) -> &[Callback<R>] {
        &self.after
    }

    /// Bind a persistence provider directly.
    pub fn bind_provider(&mut self, provider: Arc<dyn PersistenceProvider<R>>) {
        self.provider = Some(provider);
    }

    /// Pick the first candidate provider that claims the probe record.
    ///
    /// When none matches the machine stays unbacked and remains fully
    /// usable; transitions then skip the persistence step.
    pub fn detect_provider(
        &mut self,
        probe: &R,
        candidates: &[Arc<dyn PersistenceProvider<R>>],
    ) -> bool {
        for candidate in candidates {
            if candidate.matches(probe) {
                self.provider = Some(Arc::clone(candidate));
                return true;
            }
        }
        tracing::debug!(
            model = probe.model_name(),
            "no persistence provider matched; machine is unbacked"
        );
        false
    }

    /// The bound provider, if any.
    pub fn provider(&self) -> Option<&Arc<dyn PersistenceProvider<R>>> {
        self.provider.as_ref()
    }

    /// Apply the initial state if the attribute has no value yet.
    ///
    /// Runs before any other initialization the caller performs; a value
    /// explicitly supplied beforehand wins.
    pub fn initialize_record(&self, record: &mut R) {
        if self.accessor.read(record).is_none() {
            if let Some(initial) = &self.initial {
                let value = initial.resolve(record);
                self.accessor.write(record, value);
            }
        }
    }

    /// Current value of the record's state attribute.
    pub fn current_state(&self, record: &R) -> Option<StateValue> {
        self.accessor.read(record)
    }

    /// Build a single-use transition for an event.
    ///
    /// Fails fast when `from` does not match the record's current state,
    /// or when a declared state set does not contain `from`/`to`.
    pub fn build_transition(
        &self,
        record: &R,
        event: &str,
        from: &str,
        to: &str,
    ) -> Result<Transition, TransitionError> {
        if !self.states.is_empty() {
            for state in [from, to] {
                if !self.states.contains(state) {
                    return Err(TransitionError::UnknownState(state.to_string()));
                }
            }
        }

        let expected = StateValue::from(from);
        match self.accessor.read(record) {
            Some(actual) if actual == expected => {}
            Some(actual) => {
                return Err(TransitionError::FromStateMismatch { expected, actual });
            }
            None => return Err(TransitionError::MissingCurrentState { expected }),
        }

        Ok(Transition::new(
            event,
            expected,
            StateValue::from(to),
            self.accessor.attribute(),
        ))
    }
}

impl<R: Record> Default for Machine<R> {
    fn default() -> Self {
        Self::new()
    }
}
