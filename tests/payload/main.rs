//! Integration tests for Layer 1: Payload
//!
//! Tests for sample ranges, formulas, and amounts.

mod formulas;
mod ranges;
