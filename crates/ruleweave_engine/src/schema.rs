//! The fixed set of dimensions a rule domain matches on.
//!
//! A [`Schema`] names each dimension, records whether it holds named values
//! or a boolean flag, and fixes the priority order used to rank rules by
//! specificity. Priority defaults to declaration order.

use std::hash::Hash;

use ruleweave_foundation::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::atom::normalize;
use crate::query::Query;

/// What a dimension holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DimensionKind {
    /// A named value drawn from a vocabulary.
    Value,
    /// A boolean flag.
    Flag,
}

/// One declared dimension.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DimensionSpec {
    name: String,
    kind: DimensionKind,
}

impl DimensionSpec {
    /// The normalized dimension name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What the dimension holds.
    #[must_use]
    pub const fn kind(&self) -> DimensionKind {
        self.kind
    }
}

/// Dimensions of a rule domain, in declaration order, plus their priority.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schema {
    name: String,
    dimensions: Vec<DimensionSpec>,
    priority: Vec<usize>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dimensions: Vec::new(),
            priority: Vec::new(),
        }
    }

    /// Declares a value dimension with the lowest priority so far.
    #[must_use]
    pub fn with_value(self, name: &str) -> Self {
        self.with_dimension(name, DimensionKind::Value)
    }

    /// Declares a flag dimension with the lowest priority so far.
    #[must_use]
    pub fn with_flag(self, name: &str) -> Self {
        self.with_dimension(name, DimensionKind::Flag)
    }

    fn with_dimension(mut self, name: &str, kind: DimensionKind) -> Self {
        self.priority.push(self.dimensions.len());
        self.dimensions.push(DimensionSpec {
            name: normalize(name),
            kind,
        });
        self
    }

    /// Replaces the priority order, highest first.
    ///
    /// # Errors
    /// Returns `UnrecognizedToken` for an undeclared name and `InvalidQuery`
    /// unless every dimension is listed exactly once.
    pub fn with_priority(mut self, order: &[&str]) -> Result<Self> {
        let mut priority = Vec::with_capacity(order.len());
        for name in order {
            let index = self
                .index_of(name)
                .ok_or_else(|| Error::unrecognized_token(*name))?;
            if priority.contains(&index) {
                return Err(Error::invalid_query(format!(
                    "dimension {name} listed twice in priority of {}",
                    self.name
                )));
            }
            priority.push(index);
        }
        if priority.len() != self.dimensions.len() {
            return Err(Error::invalid_query(format!(
                "priority of {} lists {} of {} dimensions",
                self.name,
                priority.len(),
                self.dimensions.len()
            )));
        }
        self.priority = priority;
        Ok(self)
    }

    /// The schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of dimensions.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.dimensions.len()
    }

    /// Position of the dimension called `name`, in any spelling.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let name = normalize(name);
        self.dimensions.iter().position(|d| d.name == name)
    }

    /// The dimension at `index`.
    #[must_use]
    pub fn dimension(&self, index: usize) -> Option<&DimensionSpec> {
        self.dimensions.get(index)
    }

    /// Dimensions in declaration order.
    pub fn dimensions(&self) -> impl Iterator<Item = &DimensionSpec> {
        self.dimensions.iter()
    }

    /// Dimension indices, highest priority first.
    #[must_use]
    pub fn priority(&self) -> &[usize] {
        &self.priority
    }

    /// Checks that a pattern has this schema's shape.
    ///
    /// # Errors
    /// Returns `InvalidQuery` on an arity mismatch, a flag constraint in a
    /// value dimension, or a value constraint in a flag dimension.
    pub fn validate<V: Eq + Hash + std::fmt::Debug>(&self, query: &Query<V>) -> Result<()> {
        if query.arity() != self.arity() {
            return Err(Error::invalid_query(format!(
                "{} expects {} dimensions, got {}",
                self.name,
                self.arity(),
                query.arity()
            )));
        }
        for (spec, dimension) in self.dimensions.iter().zip(query.dimensions()) {
            let fits = match spec.kind {
                DimensionKind::Value => dimension.is_value_compatible(),
                DimensionKind::Flag => dimension.is_flag_compatible(),
            };
            if !fits {
                return Err(Error::invalid_query(format!(
                    "dimension {} of {} cannot hold {dimension:?}",
                    spec.name, self.name
                )));
            }
        }
        Ok(())
    }
}
