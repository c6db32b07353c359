//! Core types and the interval store for ruleweave.
//!
//! This crate provides:
//! - [`Error`] - Rich error types with context
//! - [`StepKey`] - Ordered keys with predecessor and successor
//! - [`IntervalStore`] - Non-overlapping closed intervals mapped to values

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod interval;
pub mod step;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use interval::{Interval, IntervalStore};
pub use step::StepKey;
