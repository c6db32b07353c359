//! Most-specific-match rule lookup.
//!
//! A [`RuleIndex`] keeps its rules ranked best-first: by [`Specificity`]
//! under the schema's priority order, then by insertion sequence. Lookup
//! walks the ranking and returns the first rule whose pattern matches, so
//! the answer depends only on the rules present and their ranks.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use ruleweave_foundation::{Error, Result};

use crate::query::{Query, Specificity};
use crate::schema::Schema;

// =============================================================================
// Rule
// =============================================================================

/// A pattern and the payload it resolves to.
#[derive(Clone, Debug)]
pub struct Rule<V: Eq + Hash, T> {
    pattern: Query<V>,
    payload: T,
    specificity: Specificity,
    sequence: u64,
}

impl<V: Eq + Hash, T> Rule<V, T> {
    /// The rule's pattern.
    #[must_use]
    pub fn pattern(&self) -> &Query<V> {
        &self.pattern
    }

    /// The rule's payload.
    #[must_use]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// The rule's rank under the index schema.
    #[must_use]
    pub fn specificity(&self) -> &Specificity {
        &self.specificity
    }

    /// Insertion order; lower sequences win ties.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

// =============================================================================
// RuleIndex
// =============================================================================

/// Rules of one domain, ranked for most-specific lookup.
///
/// Cloning is cheap: the rule list is a persistent vector and rules are
/// shared.
#[derive(Clone)]
pub struct RuleIndex<V: Eq + Hash, T> {
    schema: Arc<Schema>,
    rules: im::Vector<Arc<Rule<V, T>>>,
    next_sequence: u64,
}

impl<V: Eq + Hash, T> RuleIndex<V, T> {
    /// Creates an empty index over `schema`.
    #[must_use]
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        Self {
            schema: schema.into(),
            rules: im::Vector::new(),
            next_sequence: 0,
        }
    }

    /// The schema patterns and queries must follow.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates rules best-first.
    pub fn iter(&self) -> impl Iterator<Item = &Rule<V, T>> {
        self.rules.iter().map(|rule| &**rule)
    }

    /// Adds a rule.
    ///
    /// A rule with an identical pattern has its payload replaced and keeps
    /// its rank.
    ///
    /// # Errors
    /// Returns `InvalidQuery` if the pattern does not fit the schema.
    pub fn insert(&mut self, pattern: Query<V>, payload: T) -> Result<()>
    where
        V: fmt::Debug,
    {
        self.schema.validate(&pattern)?;

        if let Some(position) = self.position_of(&pattern) {
            let sequence = self.rules[position].sequence;
            let specificity = self.rules[position].specificity.clone();
            self.rules[position] = Arc::new(Rule {
                pattern,
                payload,
                specificity,
                sequence,
            });
            return Ok(());
        }

        let specificity = pattern.specificity(&self.schema);
        let position = self
            .rules
            .iter()
            .position(|rule| rule.specificity < specificity)
            .unwrap_or(self.rules.len());
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.rules.insert(
            position,
            Arc::new(Rule {
                pattern,
                payload,
                specificity,
                sequence,
            }),
        );
        Ok(())
    }

    /// Returns the payload of the most specific rule matching `event`.
    ///
    /// Note: This is O(n * d) for n rules of d dimensions in the worst
    /// case. The scan stops at the first match, so events covered by a
    /// specific rule resolve early.
    ///
    /// # Errors
    /// Returns `InvalidQuery` if `event` is not concrete or does not fit
    /// the schema.
    pub fn lookup(&self, event: &Query<V>) -> Result<Option<&T>>
    where
        V: fmt::Debug,
    {
        self.check_event(event)?;
        Ok(self
            .rules
            .iter()
            .find(|rule| rule.pattern.matches(event))
            .map(|rule| &rule.payload))
    }

    /// Returns every payload whose rule matches `event`, best first.
    ///
    /// Note: This always visits every rule.
    ///
    /// # Errors
    /// Returns `InvalidQuery` if `event` is not concrete or does not fit
    /// the schema.
    pub fn lookup_all(&self, event: &Query<V>) -> Result<Vec<&T>>
    where
        V: fmt::Debug,
    {
        self.check_event(event)?;
        Ok(self
            .rules
            .iter()
            .filter(|rule| rule.pattern.matches(event))
            .map(|rule| &rule.payload)
            .collect())
    }

    /// Removes the rule with exactly this pattern, returning its payload.
    pub fn remove(&mut self, pattern: &Query<V>) -> Option<T>
    where
        T: Clone,
    {
        let position = self.position_of(pattern)?;
        let rule = self.rules.remove(position);
        Some(rule.payload.clone())
    }

    /// Derives an index with every payload transformed; ranks are kept.
    #[must_use]
    pub fn map_payloads<U>(&self, mut f: impl FnMut(&T) -> U) -> RuleIndex<V, U>
    where
        V: Clone,
    {
        RuleIndex {
            schema: Arc::clone(&self.schema),
            rules: self
                .rules
                .iter()
                .map(|rule| {
                    Arc::new(Rule {
                        pattern: rule.pattern.clone(),
                        payload: f(&rule.payload),
                        specificity: rule.specificity.clone(),
                        sequence: rule.sequence,
                    })
                })
                .collect(),
            next_sequence: self.next_sequence,
        }
    }

    /// Like [`map_payloads`](Self::map_payloads) with a fallible transform.
    ///
    /// # Errors
    /// Returns the first error `f` produces.
    pub fn try_map_payloads<U>(
        &self,
        mut f: impl FnMut(&T) -> Result<U>,
    ) -> Result<RuleIndex<V, U>>
    where
        V: Clone,
    {
        let mut rules = im::Vector::new();
        for rule in &self.rules {
            rules.push_back(Arc::new(Rule {
                pattern: rule.pattern.clone(),
                payload: f(&rule.payload)?,
                specificity: rule.specificity.clone(),
                sequence: rule.sequence,
            }));
        }
        Ok(RuleIndex {
            schema: Arc::clone(&self.schema),
            rules,
            next_sequence: self.next_sequence,
        })
    }

    fn position_of(&self, pattern: &Query<V>) -> Option<usize> {
        self.rules.iter().position(|rule| rule.pattern == *pattern)
    }

    fn check_event(&self, event: &Query<V>) -> Result<()>
    where
        V: fmt::Debug,
    {
        if event.arity() != self.schema.arity() {
            return Err(Error::invalid_query(format!(
                "{} expects {} dimensions, got {}",
                self.schema.name(),
                self.schema.arity(),
                event.arity()
            )));
        }
        if !event.is_concrete() {
            return Err(Error::invalid_query(format!(
                "lookup in {} needs a concrete event",
                self.schema.name()
            )));
        }
        self.schema.validate(event)
    }
}

impl<V: Eq + Hash + fmt::Debug, T: fmt::Debug> fmt::Debug for RuleIndex<V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleIndex")
            .field("schema", &self.schema.name())
            .field("rules", &self.rules)
            .finish()
    }
}
