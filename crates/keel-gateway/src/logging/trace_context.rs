//! Trace Context - per-request correlation data
//!
//! Extracts the correlation id, client address, method and URL from an inbound
//! request and builds the structured fields for the request log lines.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};
use axum::http::header::HOST;
use keel_core::correlation::{self, REQUEST_ID_HEADER};
use keel_core::Fields;

/// Client address placeholder when the peer address is not known
pub const UNKNOWN_IP: &str = "Unknown IP";

/// Trace context for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    /// Correlation id (from `X-Request-ID` or generated)
    pub request_id: String,
    /// Client IP address or [`UNKNOWN_IP`]
    pub ip_address: String,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Absolute request URL
    pub url: String,
}

impl TraceContext {
    /// Build the trace context for an incoming request
    pub fn from_request(request: &Request) -> Self {
        Self {
            request_id: request_id(request),
            ip_address: client_ip(request),
            method: request.method().to_string(),
            url: full_url(request),
        }
    }

    /// Fields for the "Received request" line
    pub fn received_fields(&self) -> Fields {
        Fields::new()
            .with("request_id", &self.request_id)
            .with("ip_address", &self.ip_address)
            .with("method", &self.method)
            .with("url", &self.url)
    }

    /// Fields for the "Response sent" line
    pub fn sent_fields(&self, status_code: u16) -> Fields {
        Fields::new()
            .with("request_id", &self.request_id)
            .with("ip_address", &self.ip_address)
            .with("status_code", status_code)
    }

    /// Fields for the "Request failed" line
    pub fn failed_fields(&self) -> Fields {
        Fields::new()
            .with("request_id", &self.request_id)
            .with("ip_address", &self.ip_address)
    }
}

fn request_id(request: &Request) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
        .filter(|v| !v.trim().is_empty())
        .map(String::from)
        .unwrap_or_else(correlation::generate)
}

fn client_ip(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}

fn full_url(request: &Request) -> String {
    let uri = request.uri();
    if uri.scheme().is_some() {
        return uri.to_string();
    }

    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    match request.headers().get(HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{}{}", host, path),
        None => uri.to_string(),
    }
}
