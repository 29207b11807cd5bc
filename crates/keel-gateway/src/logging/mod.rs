//! Request logging support
//!
//! Correlation data for inbound requests. The loggers themselves live in
//! `keel_core`; the middleware lives in `server::logging_middleware`.

mod trace_context;

pub use trace_context::{TraceContext, UNKNOWN_IP};
