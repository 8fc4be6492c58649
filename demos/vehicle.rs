//! Vehicle
//!
//! This example demonstrates a persistence-backed state machine:
//! callback chains, transactional perform, rollback, and state queries.
//!
//! Run with: cargo run --example vehicle

use gearshift::core::{AttributeStore, Callback, Record, StateValue};
use gearshift::machine::Machine;
use gearshift::provider::{MemoryProvider, PersistenceProvider};
use gearshift::MachineBuilder;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Default)]
struct Vehicle {
    id: Option<Uuid>,
    name: String,
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

    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}

fn main() {
    println!("=== Vehicle State Machine Example ===\n");

    let provider = Arc::new(MemoryProvider::new());

    let machine: Machine<Vehicle> = MachineBuilder::new()
        .states(["parked", "idling", "first_gear"])
        .initial("parked")
        .before(Callback::with_context(|_: &mut Vehicle, ctx| {
            println!("  before: {} ({} -> {})", ctx.event, ctx.from, ctx.to);
        }))
        .unwrap()
        .after(Callback::with_context(|_: &mut Vehicle, ctx| {
            println!("  after:  now {}", ctx.to);
        }))
        .unwrap()
        .provider(provider.clone())
        .build()
        .unwrap();

    let mut car = Vehicle {
        name: "car".to_string(),
        ..Vehicle::default()
    };
    machine.initialize_record(&mut car);
    println!("Initial state: {}", machine.current_state(&car).unwrap());

    // A committed transition.
    println!("\nPerforming 'ignite':");
    let mut ignite = machine
        .build_transition(&car, "ignite", "parked", "idling")
        .unwrap();
    let record = ignite.perform(&machine, &mut car).unwrap();
    println!("Outcome: {:?}", record.outcome);

    // A rolled-back transition: the body reports failure.
    println!("\nPerforming 'shift_up' with a failing transactional body:");
    let mut shift = machine
        .build_transition(&car, "shift_up", "idling", "first_gear")
        .unwrap();
    let record = shift
        .perform_within(&machine, &mut car, |_| false)
        .unwrap();
    println!("Outcome: {:?}", record.outcome);

    let persisted = provider.all("vehicle");
    println!(
        "\nPersisted state: {} (rollback kept the committed value)",
        persisted[0].state.clone().unwrap()
    );

    let (attribute, _) = machine.scope_source();
    let idling = provider.with_state("vehicle", attribute, "idling").unwrap();
    println!("Vehicles idling: {}", idling.len());

    println!("\n=== Example Complete ===");
}
