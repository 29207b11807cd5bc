//! Logging integration tests
//!
//! Tests for the named logger registry, the async facade and correlation
//! propagation across loggers.

mod facade;
mod registry;
