//! Macros for ergonomic machine construction.

/// Configure a machine declaratively.
///
/// Expands to a [`MachineBuilder`](crate::builder::MachineBuilder) chain
/// and yields `Result<Machine<R>, ConfigError>`; the record type is taken
/// from context.
///
/// # Example
///
/// ```
/// use gearshift::{machine, machine::Machine};
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
/// let machine: Machine<Vehicle> = machine! {
///     initial: "parked",
///     states: [parked, idling, first_gear],
/// }
/// .unwrap();
///
/// assert!(machine.states().contains("idling"));
/// ```
#[macro_export]
macro_rules! machine {
    (
        $(attribute: $attr:literal,)?
        $(initial: $initial:literal,)?
        states: [$($state:ident),+ $(,)?] $(,)?
    ) => {{
        let builder = $crate::builder::MachineBuilder::new();
        $(let builder = builder.attribute($attr);)?
        $(let builder = builder.initial($initial);)?
        builder.states([$(stringify!($state)),+]).build()
    }};
}
