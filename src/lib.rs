//! Gearshift: a callback-driven state machine library with pluggable persistence.
//!
//! A [`Machine`] is configured once per model type: the valid states, the
//! attribute holding the current state, the initial-state policy, and the
//! before/after callback chains. Each state change is a single-use
//! [`Transition`](machine::Transition) whose `perform` drives the pipeline:
//! before-callbacks, attribute write, persistence inside a transactional
//! scope, after-callbacks on commit.
//!
//! Persistence is a collaborator, not a dependency: everything the engine
//! needs from a datastore sits behind [`PersistenceProvider`], and a
//! machine with no matching provider degrades to a fully usable, unbacked
//! state machine.
//!
//! # Core Concepts
//!
//! - **Record**: any object exposing the state attribute, via the [`Record`] trait
//! - **Machine**: states, attribute, initial-state policy, callback chains
//! - **Transition**: one proposed state change and its execution contract
//! - **Callbacks**: named methods, expressions, or closures run in the record's context
//!
//! # Example
//!
//! ```rust
//! use gearshift::core::{AttributeStore, Record, StateValue};
//! use gearshift::machine::Machine;
//!
//! #[derive(Default)]
//! struct Vehicle {
//!     state: Option<StateValue>,
//!     attributes: AttributeStore,
//! }
//!
//! impl Record for Vehicle {
//!     fn model_name(&self) -> &str {
//!         "vehicle"
//!     }
//!
//!     fn has_column(&self, name: &str) -> bool {
//!         name == "state"
//!     }
//!
//!     fn read_column(&self, _name: &str) -> Option<StateValue> {
//!         self.state.clone()
//!     }
//!
//!     fn write_column(&mut self, _name: &str, value: StateValue) {
//!         self.state = Some(value);
//!     }
//!
//!     fn attributes(&self) -> &AttributeStore {
//!         &self.attributes
//!     }
//!
//!     fn attributes_mut(&mut self) -> &mut AttributeStore {
//!         &mut self.attributes
//!     }
//! }
//!
//! let mut machine: Machine<Vehicle> = Machine::new();
//! machine.declare_states(["parked", "idling"]);
//! machine.set_initial("parked").unwrap();
//!
//! let mut car = Vehicle::default();
//! machine.initialize_record(&mut car);
//!
//! let mut transition = machine
//!     .build_transition(&car, "ignite", "parked", "idling")
//!     .unwrap();
//! let record = transition.perform(&machine, &mut car).unwrap();
//!
//! assert!(record.outcome.is_committed());
//! assert_eq!(machine.current_state(&car).unwrap(), "idling");
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod provider;

// Re-export commonly used types
pub use builder::MachineBuilder;
pub use core::{Callback, Record, StateValue};
pub use machine::{Machine, Transition};
pub use provider::{MemoryProvider, PersistenceProvider};
