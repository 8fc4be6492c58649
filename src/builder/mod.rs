//! Fluent construction of machines.

pub mod macros;

use crate::core::{Callback, Record, StateValue};
use crate::machine::{ConfigError, InitialState, Machine};
use crate::provider::PersistenceProvider;
use std::sync::Arc;

/// Builder for configuring a [`Machine`] with a fluent API.
///
/// Callback registration fails fast; everything else is validated by
/// [`build`](MachineBuilder::build), so setter order does not matter.
///
/// # Example
///
/// ```rust
/// use gearshift::builder::MachineBuilder;
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
/// let machine = MachineBuilder::<Vehicle>::new()
///     .states(["parked", "idling"])
///     .initial("parked")
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.attribute(), "state");
/// ```
pub struct MachineBuilder<R: Record> {
    attribute: Option<String>,
    states: Vec<StateValue>,
    initial: Option<InitialState<R>>,
    action: Option<String>,
    before: Vec<Callback<R>>,
    after: Vec<Callback<R>>,
    provider: Option<Arc<dyn PersistenceProvider<R>>>,
}

impl<R: Record> MachineBuilder<R> {
    /// Create a new builder.
    pub fn new() -> Self {
        MachineBuilder {
            attribute: None,
            states: Vec::new(),
            initial: None,
            action: None,
            before: Vec::new(),
            after: Vec::new(),
            provider: None,
        }
    }

    /// Set the attribute holding state (default: `"state"`).
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attribute = Some(name.into());
        self
    }

    /// Declare valid states.
    pub fn states<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<StateValue>,
    {
        self.states.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set a fixed initial state.
    pub fn initial(mut self, value: impl Into<StateValue>) -> Self {
        self.initial = Some(InitialState::Value(value.into()));
        self
    }

    /// Set a per-record initial-state generator.
    pub fn initial_with<F>(mut self, generator: F) -> Self
    where
        F: Fn(&R) -> StateValue + Send + Sync + 'static,
    {
        self.initial = Some(InitialState::Generator(Arc::new(generator)));
        self
    }

    /// Override the persistence action name.
    pub fn action(mut self, name: impl Into<String>) -> Self {
        self.action = Some(name.into());
        self
    }

    /// Append a before-transition callback. Fails fast on a blank target.
    pub fn before(mut self, callback: Callback<R>) -> Result<Self, ConfigError> {
        Self::check(&callback)?;
        self.before.push(callback);
        Ok(self)
    }

    /// Append an after-transition callback. Fails fast on a blank target.
    pub fn after(mut self, callback: Callback<R>) -> Result<Self, ConfigError> {
        Self::check(&callback)?;
        self.after.push(callback);
        Ok(self)
    }

    /// Bind a persistence provider.
    pub fn provider(mut self, provider: Arc<dyn PersistenceProvider<R>>) -> Self {
        self.provider = Some(provider);
        self
    }

    fn check(callback: &Callback<R>) -> Result<(), ConfigError> {
        if callback.is_well_formed() {
            Ok(())
        } else {
            Err(ConfigError::BlankCallback {
                kind: callback.kind(),
            })
        }
    }

    /// Build the machine, validating the configuration as a whole.
    pub fn build(self) -> Result<Machine<R>, ConfigError> {
        let mut machine = Machine::new();

        if let Some(attribute) = &self.attribute {
            machine.set_attribute(attribute)?;
        }
        machine.declare_states(self.states);

        match self.initial {
            Some(InitialState::Value(value)) => machine.set_initial(value)?,
            Some(generator) => machine.set_initial_state(generator),
            None => {}
        }

        if let Some(action) = self.action {
            machine.set_action(action);
        }
        for callback in self.before {
            machine.register_before_callback(callback)?;
        }
        for callback in self.after {
            machine.register_after_callback(callback)?;
        }
        if let Some(provider) = self.provider {
            machine.bind_provider(provider);
        }

        Ok(machine)
    }
}

impl<R: Record> Default for MachineBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AttributeStore;

    #[derive(Default)]
    struct Vehicle {
        state: Option<StateValue>,
        attributes: AttributeStore,
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
    }

    #[test]
    fn fluent_api_builds_a_machine() {
        let machine = MachineBuilder::<Vehicle>::new()
            .attribute("status")
            .states(["parked", "idling", "first_gear"])
            .initial("parked")
            .action("persist")
            .build()
            .unwrap();

        assert_eq!(machine.attribute(), "status");
        assert_eq!(machine.states().len(), 3);
        assert_eq!(machine.default_action(), "persist");
    }

    #[test]
    fn setter_order_does_not_matter_for_initial_validation() {
        // Initial declared before states; validated at build time.
        let machine = MachineBuilder::<Vehicle>::new()
            .initial("parked")
            .states(["parked", "idling"])
            .build();

        assert!(machine.is_ok());
    }

    #[test]
    fn build_rejects_an_undeclared_initial_state() {
        let result = MachineBuilder::<Vehicle>::new()
            .states(["parked", "idling"])
            .initial("reverse")
            .build();

        assert!(matches!(result, Err(ConfigError::UnknownInitialState(_))));
    }

    #[test]
    fn build_rejects_a_blank_attribute() {
        let result = MachineBuilder::<Vehicle>::new().attribute("").build();
        assert!(matches!(result, Err(ConfigError::BlankAttribute)));
    }

    #[test]
    fn callback_registration_fails_fast() {
        let result = MachineBuilder::<Vehicle>::new().before(Callback::expression("   "));
        assert!(matches!(
            result,
            Err(ConfigError::BlankCallback { kind: "expression" })
        ));
    }

    #[test]
    fn callbacks_accumulate_through_the_builder() {
        let machine = MachineBuilder::<Vehicle>::new()
            .states(["parked", "idling"])
            .before(Callback::of(|_: &mut Vehicle| {}))
            .unwrap()
            .before(Callback::of(|_: &mut Vehicle| {}))
            .unwrap()
            .after(Callback::of(|_: &mut Vehicle| {}))
            .unwrap()
            .build()
            .unwrap();

        let mut car = Vehicle {
            state: Some(StateValue::new("parked")),
            ..Vehicle::default()
        };
        let mut transition = machine
            .build_transition(&car, "ignite", "parked", "idling")
            .unwrap();
        assert!(transition.perform(&machine, &mut car).is_ok());
    }
}
