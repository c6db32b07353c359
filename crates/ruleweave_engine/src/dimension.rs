//! A single match dimension and how specific it is.

use std::hash::Hash;

use crate::value_set::ValueSet;

/// What a rule requires of one dimension, or what an event supplies for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchDimension<V: Eq + Hash> {
    /// Matches every value.
    Any,
    /// Matches one value.
    Exact(V),
    /// Matches members of a set, or non-members of an excluding set.
    OneOf(ValueSet<V>),
    /// A boolean flag; `None` matches either polarity.
    Tristate(Option<bool>),
}

/// How tightly a dimension is pinned, from loosest to tightest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pin {
    /// Unconstrained.
    Wildcard,
    /// Everything except some values.
    Excluding,
    /// One of several values.
    Alternatives,
    /// A single value or flag polarity.
    Exact,
}

impl<V: Eq + Hash> MatchDimension<V> {
    /// Matches any of `values`; a single value collapses to [`Exact`](Self::Exact).
    pub fn one_of(values: impl IntoIterator<Item = V>) -> Self {
        let mut values: Vec<V> = values.into_iter().collect();
        if values.len() == 1 {
            if let Some(value) = values.pop() {
                return Self::Exact(value);
            }
        }
        Self::OneOf(ValueSet::including(values))
    }

    /// Matches anything except `values`; no values means [`Any`](Self::Any).
    pub fn none_of(values: impl IntoIterator<Item = V>) -> Self {
        let set = ValueSet::excluding(values);
        if set.is_empty() {
            Self::Any
        } else {
            Self::OneOf(set)
        }
    }

    /// Requires a flag to have the given polarity.
    #[must_use]
    pub const fn flag(value: bool) -> Self {
        Self::Tristate(Some(value))
    }

    /// Returns true if this is an event-side value: a single value or a set flag.
    #[must_use]
    pub const fn is_concrete(&self) -> bool {
        matches!(self, Self::Exact(_) | Self::Tristate(Some(_)))
    }

    /// Returns true if this matches anything.
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        matches!(self, Self::Any | Self::Tristate(None))
    }

    /// Returns true if this dimension can hold a flag.
    #[must_use]
    pub const fn is_flag_compatible(&self) -> bool {
        matches!(self, Self::Any | Self::Tristate(_))
    }

    /// Returns true if this dimension can hold a named value.
    #[must_use]
    pub const fn is_value_compatible(&self) -> bool {
        matches!(self, Self::Any | Self::Exact(_) | Self::OneOf(_))
    }

    /// Tests a rule-side dimension against a concrete event-side one.
    ///
    /// Non-concrete event values never match a constrained dimension.
    #[must_use]
    pub fn matches(&self, concrete: &Self) -> bool {
        match (self, concrete) {
            (Self::Any | Self::Tristate(None), _) => true,
            (Self::Exact(expected), Self::Exact(actual)) => expected == actual,
            (Self::OneOf(set), Self::Exact(actual)) => set.admits(actual),
            (Self::Tristate(Some(expected)), Self::Tristate(Some(actual))) => expected == actual,
            _ => false,
        }
    }

    /// How tightly this dimension is pinned.
    #[must_use]
    pub fn pin(&self) -> Pin {
        match self {
            Self::Any | Self::Tristate(None) => Pin::Wildcard,
            Self::OneOf(set) if set.is_negated() => Pin::Excluding,
            Self::OneOf(_) => Pin::Alternatives,
            Self::Exact(_) | Self::Tristate(Some(_)) => Pin::Exact,
        }
    }
}
