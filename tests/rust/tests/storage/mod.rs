//! Storage integration tests
//!
//! Tests for the DatabaseManager lifecycle driven from Settings.

mod lifecycle;
