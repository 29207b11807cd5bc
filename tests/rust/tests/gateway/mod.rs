//! Gateway integration tests
//!
//! Tests for the request logging middleware, CORS and the server lifecycle.

mod server;
