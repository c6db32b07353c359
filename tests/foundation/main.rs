//! Integration tests for Layer 0: Foundation
//!
//! Tests for errors and the interval store.

mod errors;
mod intervals;
