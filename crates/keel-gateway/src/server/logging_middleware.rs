//! HTTP Request/Response Logging Middleware
//!
//! Every request gets a correlation id (from `X-Request-ID` or generated) stored
//! in the correlation scope for the duration of the downstream call, plus one
//! "Received request" line before it and one "Response sent" line after it, on
//! the `request_logger` logger.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use futures::FutureExt;
use keel_core::{correlation, ExceptionDetail, LoggerRegistry, REQUEST_LOGGER};
use tracing::error;

use crate::logging::TraceContext;

/// Logging middleware for requests and responses
///
/// A panic in the downstream handler is logged as "Request failed" and then
/// resumed unchanged. Responses (including 4xx/5xx) are returned untouched.
pub async fn request_logging_middleware(
    State(registry): State<Arc<LoggerRegistry>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let logger = match registry.get_logger(REQUEST_LOGGER) {
        Ok(logger) => logger,
        Err(e) => {
            error!("Failed to initialize request logger: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let ctx = TraceContext::from_request(&request);

    correlation::scope(async move {
        correlation::set(ctx.request_id.clone());

        logger.info("Received request", ctx.received_fields()).await;

        let response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
            Ok(response) => response,
            Err(payload) => {
                logger
                    .exception_detail(
                        "Request failed",
                        ExceptionDetail::from_panic(payload.as_ref()),
                        ctx.failed_fields(),
                    )
                    .await;
                std::panic::resume_unwind(payload);
            }
        };

        logger
            .info("Response sent", ctx.sent_fields(response.status().as_u16()))
            .await;

        Ok(response)
    })
    .await
}
