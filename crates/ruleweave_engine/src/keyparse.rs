//! Parsing rule keys and live events into queries.
//!
//! A rule key is a `|`-separated list of segments, each a comma-separated
//! list of tokens with an optional `!` prefix:
//!
//! ```text
//! zombie,husk|!fall|spawner
//! ```
//!
//! Flag dimensions claim their tokens (the flag's own name) from any
//! segment. Value dimensions then claim the remaining segments in
//! declaration order: each takes the next segment if every token in it is
//! in the dimension's vocabulary, and otherwise stays a wildcard. A segment
//! of `*` is claimed as a wildcard. Anything left over is an error.

use std::collections::BTreeMap;
use std::hash::Hash;
use std::sync::Arc;

use ruleweave_foundation::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::atom::{Atom, normalize};
use crate::dimension::MatchDimension;
use crate::query::Query;
use crate::schema::{DimensionKind, Schema};

// =============================================================================
// Contradiction Policy
// =============================================================================

/// What to do when a flag is both required and excluded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ContradictionPolicy {
    /// Fail with `DuplicateValue`.
    #[default]
    Reject,
    /// Treat the flag as unconstrained.
    Collapse,
}

// =============================================================================
// Vocabulary
// =============================================================================

/// The names a value dimension understands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary<V> {
    entries: BTreeMap<String, V>,
}

impl<V> Default for Vocabulary<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> Vocabulary<V> {
    /// Creates an empty vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a name for `value`.
    pub fn insert(&mut self, name: &str, value: V) {
        self.entries.insert(normalize(name), value);
    }

    /// Adds a name for `value`, builder style.
    #[must_use]
    pub fn with(mut self, name: &str, value: V) -> Self {
        self.insert(name, value);
        self
    }

    /// Number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no names are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up `name` in any spelling.
    ///
    /// With `allow_prefix`, a name that is not known exactly resolves to the
    /// only known name it is a prefix of.
    #[must_use]
    pub fn resolve(&self, name: &str, allow_prefix: bool) -> Option<&V> {
        let name = normalize(name);
        if let Some(value) = self.entries.get(&name) {
            return Some(value);
        }
        if !allow_prefix || name.is_empty() {
            return None;
        }
        let mut candidates = self
            .entries
            .range(name.clone()..)
            .take_while(|(known, _)| known.starts_with(&name));
        match (candidates.next(), candidates.next()) {
            (Some((_, value)), None) => Some(value),
            _ => None,
        }
    }
}

impl Vocabulary<Atom> {
    /// A vocabulary where every name stands for itself.
    pub fn atoms<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        names
            .into_iter()
            .map(|name| (name, Atom::new(name)))
            .collect()
    }
}

impl<'a, V> FromIterator<(&'a str, V)> for Vocabulary<V> {
    fn from_iter<I: IntoIterator<Item = (&'a str, V)>>(iter: I) -> Self {
        let mut vocabulary = Self::new();
        for (name, value) in iter {
            vocabulary.insert(name, value);
        }
        vocabulary
    }
}

// =============================================================================
// Key Parser
// =============================================================================

/// A token from a segment, with its polarity.
#[derive(Debug)]
struct Token<'k> {
    text: &'k str,
    negated: bool,
}

impl<'k> Token<'k> {
    fn split(segment: &'k str) -> Vec<Self> {
        segment
            .split(',')
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(|text| match text.strip_prefix('!') {
                Some(rest) => Token {
                    text: rest.trim(),
                    negated: true,
                },
                None => Token {
                    text,
                    negated: false,
                },
            })
            .collect()
    }
}

/// Turns rule keys and event names into queries over one schema.
#[derive(Clone, Debug)]
pub struct KeyParser<V> {
    schema: Arc<Schema>,
    vocabularies: Vec<Vocabulary<V>>,
    policy: ContradictionPolicy,
    allow_prefix: bool,
}

impl<V: Clone + Eq + Hash> KeyParser<V> {
    /// Creates a parser whose value dimensions know no names yet.
    #[must_use]
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        let schema = schema.into();
        let vocabularies = (0..schema.arity()).map(|_| Vocabulary::new()).collect();
        Self {
            schema,
            vocabularies,
            policy: ContradictionPolicy::default(),
            allow_prefix: false,
        }
    }

    /// Sets the names a value dimension understands.
    ///
    /// # Errors
    /// Returns `InvalidQuery` if `dimension` is unknown or is a flag.
    pub fn with_vocabulary(mut self, dimension: &str, vocabulary: Vocabulary<V>) -> Result<Self> {
        let index = self.value_dimension(dimension)?;
        self.vocabularies[index] = vocabulary;
        Ok(self)
    }

    /// Sets how contradictory flags are handled.
    #[must_use]
    pub fn with_policy(mut self, policy: ContradictionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enables unique-prefix matching of value names.
    #[must_use]
    pub fn with_prefix_matching(mut self, allow_prefix: bool) -> Self {
        self.allow_prefix = allow_prefix;
        self
    }

    /// The schema queries are built for.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Parses a rule key into a pattern.
    ///
    /// # Errors
    /// Returns `DuplicateValue` when a value and its negation share a
    /// dimension, or a flag contradicts itself under
    /// [`ContradictionPolicy::Reject`]. Returns `UnrecognizedToken` for a
    /// segment no dimension claims.
    pub fn parse_pattern(&self, key: &str) -> Result<Query<V>> {
        let mut segments: Vec<Vec<Token<'_>>> = key
            .split('|')
            .map(Token::split)
            .filter(|tokens| !tokens.is_empty())
            .collect();

        let mut dimensions: Vec<MatchDimension<V>> =
            (0..self.schema.arity()).map(|_| MatchDimension::Any).collect();

        for (index, spec) in self.schema.dimensions().enumerate() {
            if spec.kind() == DimensionKind::Flag {
                dimensions[index] = self.claim_flag(spec.name(), &mut segments)?;
            }
        }
        segments.retain(|tokens| !tokens.is_empty());

        let mut remaining = segments.into_iter().peekable();
        for (index, spec) in self.schema.dimensions().enumerate() {
            if spec.kind() != DimensionKind::Value {
                continue;
            }
            let Some(tokens) = remaining.peek() else {
                break;
            };
            if let Some(dimension) = self.claim_values(index, spec.name(), tokens)? {
                dimensions[index] = dimension;
                remaining.next();
            }
        }

        if let Some(tokens) = remaining.next() {
            let text = tokens.first().map_or("", |token| token.text);
            return Err(Error::unrecognized_token(text));
        }
        Ok(Query::new(dimensions))
    }

    /// Builds a concrete event from value names in declaration order and the
    /// names of the flags that are set.
    ///
    /// Only exact names are accepted; prefix matching applies to rule keys.
    ///
    /// # Errors
    /// Returns `InvalidQuery` if the number of names does not match the
    /// value dimensions, and `UnrecognizedToken` for an unknown name or flag.
    pub fn event(&self, names: &[&str], flags: &[&str]) -> Result<Query<V>> {
        let value_count = self
            .schema
            .dimensions()
            .filter(|spec| spec.kind() == DimensionKind::Value)
            .count();
        if names.len() != value_count {
            return Err(Error::invalid_query(format!(
                "{} expects {value_count} names, got {}",
                self.schema.name(),
                names.len()
            )));
        }

        let mut set = vec![false; self.schema.arity()];
        for flag in flags {
            match self.schema.index_of(flag) {
                Some(index) if self.is_flag(index) => set[index] = true,
                _ => return Err(Error::unrecognized_token(*flag)),
            }
        }

        let mut names = names.iter();
        let mut dimensions = Vec::with_capacity(self.schema.arity());
        for (index, spec) in self.schema.dimensions().enumerate() {
            match spec.kind() {
                DimensionKind::Flag => dimensions.push(MatchDimension::flag(set[index])),
                DimensionKind::Value => {
                    let name = names.next().copied().unwrap_or_default();
                    let value = self.vocabularies[index]
                        .resolve(name, false)
                        .ok_or_else(|| Error::unrecognized_token(name))?;
                    dimensions.push(MatchDimension::Exact(value.clone()));
                }
            }
        }
        Ok(Query::new(dimensions))
    }

    fn is_flag(&self, index: usize) -> bool {
        self.schema
            .dimension(index)
            .is_some_and(|spec| spec.kind() == DimensionKind::Flag)
    }

    fn value_dimension(&self, name: &str) -> Result<usize> {
        match self.schema.index_of(name) {
            Some(index) if !self.is_flag(index) => Ok(index),
            Some(_) => Err(Error::invalid_query(format!("{name} is a flag"))),
            None => Err(Error::invalid_query(format!(
                "{} has no dimension {name}",
                self.schema.name()
            ))),
        }
    }

    /// Removes every token naming `flag` and decides its polarity.
    fn claim_flag(
        &self,
        flag: &str,
        segments: &mut [Vec<Token<'_>>],
    ) -> Result<MatchDimension<V>> {
        let mut required = false;
        let mut excluded = false;
        for tokens in segments.iter_mut() {
            tokens.retain(|token| {
                if normalize(token.text) != flag {
                    return true;
                }
                if token.negated {
                    excluded = true;
                } else {
                    required = true;
                }
                false
            });
        }
        match (required, excluded) {
            (false, false) => Ok(MatchDimension::Any),
            (true, false) => Ok(MatchDimension::flag(true)),
            (false, true) => Ok(MatchDimension::flag(false)),
            (true, true) => match self.policy {
                ContradictionPolicy::Reject => Err(Error::duplicate_value(flag, flag)),
                ContradictionPolicy::Collapse => Ok(MatchDimension::Any),
            },
        }
    }

    /// Builds a value dimension if every token is in its vocabulary.
    fn claim_values(
        &self,
        index: usize,
        dimension: &str,
        tokens: &[Token<'_>],
    ) -> Result<Option<MatchDimension<V>>> {
        if tokens.len() == 1 && tokens[0].text == "*" && !tokens[0].negated {
            return Ok(Some(MatchDimension::Any));
        }

        let vocabulary = &self.vocabularies[index];
        let mut required: Vec<V> = Vec::new();
        let mut excluded: Vec<V> = Vec::new();
        for token in tokens {
            let Some(value) = vocabulary.resolve(token.text, self.allow_prefix) else {
                return Ok(None);
            };
            let (same, other) = if token.negated {
                (&mut excluded, &required)
            } else {
                (&mut required, &excluded)
            };
            if other.contains(value) {
                return Err(Error::duplicate_value(dimension, normalize(token.text)));
            }
            if !same.contains(value) {
                same.push(value.clone());
            }
        }

        Ok(Some(if required.is_empty() {
            MatchDimension::none_of(excluded)
        } else {
            MatchDimension::one_of(required)
        }))
    }
}
