//! Sets of acceptable values, optionally expressed by exclusion.

use std::collections::HashSet;
use std::hash::Hash;

/// A set of values a dimension accepts.
///
/// An including set accepts exactly its members. An excluding set, built
/// from `!name` tokens, accepts everything except its members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueSet<V: Eq + Hash> {
    values: HashSet<V>,
    negated: bool,
}

impl<V: Eq + Hash> ValueSet<V> {
    /// A set accepting exactly the given values.
    pub fn including(values: impl IntoIterator<Item = V>) -> Self {
        Self {
            values: values.into_iter().collect(),
            negated: false,
        }
    }

    /// A set accepting everything except the given values.
    pub fn excluding(values: impl IntoIterator<Item = V>) -> Self {
        Self {
            values: values.into_iter().collect(),
            negated: true,
        }
    }

    /// Returns true if `value` is acceptable.
    #[must_use]
    pub fn admits(&self, value: &V) -> bool {
        self.values.contains(value) != self.negated
    }

    /// Returns true if this set was built by exclusion.
    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Number of listed values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no values are listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates the listed values in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.values.iter()
    }
}
