//! Configuration resolution for ruleweave.
//!
//! This crate provides:
//! - [`ResolverConfig`] - Multiplier, seed, parsing policy, and timeouts
//! - [`RuleSetLoader`] / [`TierTableLoader`] - Collect-and-continue loading
//! - [`Published`] / [`RuleSet`] - Immutable snapshots swapped atomically
//! - [`PendingLookup`] - Bounded waits on lookups that finish elsewhere
//! - [`Resolver`] - All of the above for one domain
//!
//! Libraries in this workspace only emit `tracing` events; installing a
//! subscriber is left to the host.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod loader;
pub mod pending;
pub mod resolver;
pub mod snapshot;

pub use config::ResolverConfig;
pub use loader::{LoadReport, RuleSetLoader, TierTableLoader};
pub use pending::{Completer, PendingLookup, pending};
pub use resolver::Resolver;
pub use snapshot::{Published, RuleSet};
