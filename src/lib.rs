//! Ruleweave - Multi-dimensional rule matching and interval resolution
//!
//! This crate re-exports all layers of the Ruleweave system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: ruleweave_resolver   — Loading, snapshot publication, pending lookups
//! Layer 2: ruleweave_engine     — Dimensions, schemas, queries, rule index, key parsing
//! Layer 1: ruleweave_payload    — Sample ranges, formulas, amounts
//! Layer 0: ruleweave_foundation — Errors, step keys, interval store
//! ```

pub use ruleweave_engine as engine;
pub use ruleweave_foundation as foundation;
pub use ruleweave_payload as payload;
pub use ruleweave_resolver as resolver;
