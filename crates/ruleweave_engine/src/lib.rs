//! Dimensions, schemas, queries, and the rule index for ruleweave.
//!
//! This crate provides:
//! - [`MatchDimension`] - Wildcard, exact, set, and flag constraints
//! - [`Schema`] - The named dimensions of a rule domain and their priority
//! - [`Query`] - Rule patterns and concrete events
//! - [`RuleIndex`] - Most-specific-match lookup
//! - [`KeyParser`] - Rule key and event parsing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod atom;
pub mod dimension;
pub mod index;
pub mod keyparse;
pub mod query;
pub mod schema;
pub mod value_set;

pub use atom::Atom;
pub use dimension::{MatchDimension, Pin};
pub use index::{Rule, RuleIndex};
pub use keyparse::{ContradictionPolicy, KeyParser, Vocabulary};
pub use query::{Query, QueryBuilder, Specificity};
pub use schema::{DimensionKind, DimensionSpec, Schema};
pub use value_set::ValueSet;
