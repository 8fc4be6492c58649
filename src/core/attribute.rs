//! Attribute storage and non-shadowing accessor composition.
//!
//! The state attribute of a record may live in a real storage slot (a
//! mapped column) or nowhere at all (an unmigrated model). [`Accessor`]
//! hides the difference: it delegates to the record's own slot when one
//! exists and otherwise to the record's overlay [`AttributeStore`]. The
//! storage slot is never shadowed by a second copy, so reading the
//! attribute through the accessor and through the slot always agree.

use super::record::Record;
use super::state::StateValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Holds attribute values for records without a backing storage slot.
///
/// # Example
///
/// ```rust
/// use gearshift::core::{AttributeStore, StateValue};
///
/// let mut store = AttributeStore::new();
/// assert!(store.get("state").is_none());
///
/// store.set("state", StateValue::new("parked"));
/// assert_eq!(store.get("state").unwrap(), "parked");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeStore {
    values: HashMap<String, StateValue>,
}

impl AttributeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        AttributeStore {
            values: HashMap::new(),
        }
    }

    /// Current value of an attribute, if any.
    pub fn get(&self, name: &str) -> Option<&StateValue> {
        self.values.get(name)
    }

    /// Set an attribute's value, replacing any previous one.
    pub fn set(&mut self, name: impl Into<String>, value: StateValue) {
        self.values.insert(name.into(), value);
    }

    /// Whether the attribute currently has a value.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

/// Read/write access to one named attribute of a record.
///
/// Generated once per machine for its configured attribute. Composes with
/// pre-existing storage: a record that maps the attribute to a column keeps
/// that column as the single source of truth.
#[derive(Clone, Debug)]
pub struct Accessor {
    attribute: String,
}

impl Accessor {
    /// Create an accessor for the named attribute.
    pub fn new(attribute: impl Into<String>) -> Self {
        Accessor {
            attribute: attribute.into(),
        }
    }

    /// The attribute this accessor reads and writes.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Read the attribute's current value.
    pub fn read<R: Record>(&self, record: &R) -> Option<StateValue> {
        if record.has_column(&self.attribute) {
            record.read_column(&self.attribute)
        } else {
            record.attributes().get(&self.attribute).cloned()
        }
    }

    /// Write the attribute's value.
    pub fn write<R: Record>(&self, record: &mut R, value: StateValue) {
        if record.has_column(&self.attribute) {
            record.write_column(&self.attribute, value);
        } else {
            record.attributes_mut().set(&self.attribute, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Record with a real storage slot for "state".
    #[derive(Default)]
    struct ColumnRecord {
        state: Option<StateValue>,
        attributes: AttributeStore,
    }

    impl Record for ColumnRecord {
        fn model_name(&self) -> &str {
            "column_record"
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

    /// Record with no storage slot at all.
    #[derive(Default)]
    struct UnbackedRecord {
        attributes: AttributeStore,
    }

    impl Record for UnbackedRecord {
        fn model_name(&self) -> &str {
            "unbacked_record"
        }

        fn has_column(&self, _name: &str) -> bool {
            false
        }

        fn read_column(&self, _name: &str) -> Option<StateValue> {
            None
        }

        fn write_column(&mut self, _name: &str, _value: StateValue) {}

        fn attributes(&self) -> &AttributeStore {
            &self.attributes
        }

        fn attributes_mut(&mut self) -> &mut AttributeStore {
            &mut self.attributes
        }
    }

    #[test]
    fn accessor_write_is_visible_through_the_column() {
        let accessor = Accessor::new("state");
        let mut record = ColumnRecord::default();

        accessor.write(&mut record, StateValue::new("parked"));

        assert_eq!(record.read_column("state").unwrap(), "parked");
        assert_eq!(accessor.read(&record).unwrap(), "parked");
    }

    #[test]
    fn column_write_is_visible_through_the_accessor() {
        let accessor = Accessor::new("state");
        let mut record = ColumnRecord::default();

        record.write_column("state", StateValue::new("idling"));

        assert_eq!(accessor.read(&record).unwrap(), "idling");
    }

    #[test]
    fn accessor_never_shadows_the_column() {
        let accessor = Accessor::new("state");
        let mut record = ColumnRecord::default();

        accessor.write(&mut record, StateValue::new("parked"));
        record.write_column("state", StateValue::new("first_gear"));

        // The slot is the single source of truth; no stale copy survives.
        assert_eq!(accessor.read(&record).unwrap(), "first_gear");
        assert!(!record.attributes().contains("state"));
    }

    #[test]
    fn unbacked_record_falls_back_to_the_overlay() {
        let accessor = Accessor::new("state");
        let mut record = UnbackedRecord::default();

        assert!(accessor.read(&record).is_none());

        accessor.write(&mut record, StateValue::new("parked"));
        assert_eq!(accessor.read(&record).unwrap(), "parked");
        assert_eq!(record.attributes().get("state").unwrap(), "parked");
    }

    #[test]
    fn accessors_are_attribute_scoped() {
        let state = Accessor::new("state");
        let status = Accessor::new("status");
        let mut record = UnbackedRecord::default();

        state.write(&mut record, StateValue::new("parked"));
        assert!(status.read(&record).is_none());
    }
}
