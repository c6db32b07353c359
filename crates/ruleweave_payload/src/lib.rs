//! Numeric rule payloads for ruleweave.
//!
//! This crate provides:
//! - [`SampleRange`] - Uniform ranges with probabilistic integer rounding
//! - [`Formula`] - Arithmetic expressions over named variables
//! - [`Amount`] - Either of the above behind one evaluation interface
//! - [`random`] - Deterministic random sources
//!
//! Payloads are opaque to the rule index; callers evaluate them after a
//! lookup with the event's variables and a random source.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod amount;
pub mod expr;
pub mod formula;
pub mod lexer;
pub mod parser;
pub mod random;
pub mod range;
pub mod token;

pub use amount::Amount;
pub use expr::{BinaryOp, Expr, Function, Variables};
pub use formula::Formula;
pub use range::{SampleRange, round_probabilistic};
