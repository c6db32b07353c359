//! Integration tests for Layer 2: Engine
//!
//! Tests for the rule index, specificity ranking, and key parsing.

mod keys;
mod lookup;
