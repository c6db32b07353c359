//! Integration tests for Layer 3: Resolver
//!
//! Tests for loading, snapshot publication, and pending lookups.

mod loading;
