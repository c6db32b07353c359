//! Ordered tuples of dimensions: rule patterns and concrete events.

use std::fmt;
use std::hash::Hash;

use ruleweave_foundation::{Error, Result};

use crate::dimension::{MatchDimension, Pin};
use crate::schema::Schema;

/// One dimension per schema slot, in declaration order.
///
/// The same type serves as a rule pattern and as a lookup key. A lookup key
/// must be concrete: every slot is [`MatchDimension::Exact`] or a set flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query<V: Eq + Hash> {
    dimensions: Vec<MatchDimension<V>>,
}

impl<V: Eq + Hash> Query<V> {
    /// Creates a query from dimensions in declaration order.
    #[must_use]
    pub fn new(dimensions: Vec<MatchDimension<V>>) -> Self {
        Self { dimensions }
    }

    /// A query matching everything in `schema`.
    #[must_use]
    pub fn wildcard(schema: &Schema) -> Self {
        Self {
            dimensions: (0..schema.arity()).map(|_| MatchDimension::Any).collect(),
        }
    }

    /// Starts building a query by dimension name.
    #[must_use]
    pub fn builder(schema: &Schema) -> QueryBuilder<'_, V> {
        QueryBuilder::new(schema)
    }

    /// Number of dimensions.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.dimensions.len()
    }

    /// The dimension at `index`.
    #[must_use]
    pub fn dimension(&self, index: usize) -> Option<&MatchDimension<V>> {
        self.dimensions.get(index)
    }

    /// Dimensions in declaration order.
    pub fn dimensions(&self) -> impl Iterator<Item = &MatchDimension<V>> {
        self.dimensions.iter()
    }

    /// Returns true if every dimension is concrete.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        self.dimensions.iter().all(MatchDimension::is_concrete)
    }

    /// Returns true if this pattern matches the concrete `event`.
    #[must_use]
    pub fn matches(&self, event: &Self) -> bool {
        self.arity() == event.arity()
            && self
                .dimensions
                .iter()
                .zip(&event.dimensions)
                .all(|(pattern, value)| pattern.matches(value))
    }

    /// Ranks this pattern under `schema`'s priority order.
    #[must_use]
    pub fn specificity(&self, schema: &Schema) -> Specificity {
        Specificity(
            schema
                .priority()
                .iter()
                .map(|&index| {
                    self.dimensions
                        .get(index)
                        .map_or(Pin::Wildcard, MatchDimension::pin)
                })
                .collect(),
        )
    }
}

/// Pin levels in priority order; compares lexicographically.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(Vec<Pin>);

impl Specificity {
    /// Pin levels, highest priority first.
    #[must_use]
    pub fn pins(&self) -> &[Pin] {
        &self.0
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            let code = match pin {
                Pin::Wildcard => '*',
                Pin::Excluding => '!',
                Pin::Alternatives => '?',
                Pin::Exact => '=',
            };
            write!(f, "{code}")?;
        }
        Ok(())
    }
}

/// Builds a [`Query`] by naming dimensions.
///
/// Unnamed dimensions stay [`MatchDimension::Any`]. Errors are deferred to
/// [`build`](Self::build) so calls can be chained.
pub struct QueryBuilder<'s, V: Eq + Hash> {
    schema: &'s Schema,
    dimensions: Vec<MatchDimension<V>>,
    error: Option<Error>,
}

impl<'s, V: Eq + Hash> QueryBuilder<'s, V> {
    /// Creates a builder with every dimension unconstrained.
    #[must_use]
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            dimensions: (0..schema.arity()).map(|_| MatchDimension::Any).collect(),
            error: None,
        }
    }

    /// Sets the dimension called `name`.
    #[must_use]
    pub fn set(mut self, name: &str, dimension: MatchDimension<V>) -> Self {
        if self.error.is_some() {
            return self;
        }
        match self.schema.index_of(name) {
            Some(index) => self.dimensions[index] = dimension,
            None => {
                self.error = Some(Error::invalid_query(format!(
                    "{} has no dimension {name}",
                    self.schema.name()
                )));
            }
        }
        self
    }

    /// Pins a value dimension to one value.
    #[must_use]
    pub fn exact(self, name: &str, value: V) -> Self {
        self.set(name, MatchDimension::Exact(value))
    }

    /// Pins a flag dimension to one polarity.
    #[must_use]
    pub fn flag(self, name: &str, value: bool) -> Self {
        self.set(name, MatchDimension::flag(value))
    }

    /// Finishes the query.
    ///
    /// # Errors
    /// Returns `InvalidQuery` for an unknown dimension name or a constraint
    /// of the wrong kind.
    pub fn build(self) -> Result<Query<V>>
    where
        V: fmt::Debug,
    {
        if let Some(error) = self.error {
            return Err(error);
        }
        let query = Query::new(self.dimensions);
        self.schema.validate(&query)?;
        Ok(query)
    }
}
