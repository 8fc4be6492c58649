//! State name values and ordered state sets.
//!
//! States in a machine are runtime values rather than enum variants: a
//! machine declares the names it considers valid and the state attribute
//! on a record holds one of those names. This mirrors how state-backed
//! columns work in relational mappers, where the column stores a string.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The value of a state attribute.
///
/// A thin newtype over the state's name. Comparisons against plain string
/// slices are supported so call sites can stay terse.
///
/// # Example
///
/// ```rust
/// use gearshift::core::StateValue;
///
/// let state = StateValue::new("parked");
/// assert_eq!(state.as_str(), "parked");
/// assert_eq!(state, "parked");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateValue(String);

impl StateValue {
    /// Create a state value from a name.
    pub fn new(name: impl Into<String>) -> Self {
        StateValue(name.into())
    }

    /// The state's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StateValue {
    fn from(name: &str) -> Self {
        StateValue(name.to_string())
    }
}

impl From<String> for StateValue {
    fn from(name: String) -> Self {
        StateValue(name)
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for StateValue {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<str> for StateValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<StateValue> for &str {
    fn eq(&self, other: &StateValue) -> bool {
        *self == other.0
    }
}

impl PartialEq<StateValue> for str {
    fn eq(&self, other: &StateValue) -> bool {
        self == other.0
    }
}

/// Ordered, duplicate-free collection of valid state names.
///
/// Declaration order is preserved: adapters that build query scopes from
/// the set see states in the order the machine declared them. Declaring
/// a name twice is a no-op, not an error.
///
/// # Example
///
/// ```rust
/// use gearshift::core::StateSet;
///
/// let mut states = StateSet::new();
/// states.declare("parked");
/// states.declare("idling");
/// states.declare("parked"); // already present, ignored
///
/// assert_eq!(states.len(), 2);
/// assert!(states.contains("idling"));
/// assert!(!states.contains("first_gear"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSet {
    states: Vec<StateValue>,
}

impl StateSet {
    /// Create an empty set.
    ///
    /// An empty set means "no states declared"; machines treat that as
    /// membership-not-enforced rather than nothing-is-valid.
    pub fn new() -> Self {
        StateSet { states: Vec::new() }
    }

    /// Declare a state name, preserving first-declaration order.
    pub fn declare(&mut self, name: impl Into<StateValue>) {
        let value = name.into();
        if !self.states.contains(&value) {
            self.states.push(value);
        }
    }

    /// Declare several state names at once.
    pub fn declare_all<I, T>(&mut self, names: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<StateValue>,
    {
        for name in names {
            self.declare(name);
        }
    }

    /// Check membership by name.
    pub fn contains(&self, name: &str) -> bool {
        self.states.iter().any(|s| s.as_str() == name)
    }

    /// Number of declared states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no states have been declared.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Declared states in declaration order.
    pub fn as_slice(&self) -> &[StateValue] {
        &self.states
    }

    /// Iterate over declared states in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, StateValue> {
        self.states.iter()
    }
}

impl<T: Into<StateValue>> FromIterator<T> for StateSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = StateSet::new();
        set.declare_all(iter);
        set
    }
}
