//! API routing module
//!
//! # Structure
//!
//! - [`health`] - health check (public)
//! - [`orders`] - order submission, queries, status transitions
//! - [`ledgers`] - account ledger queries, settlements, profile view

pub mod health;
pub mod ledgers;
pub mod orders;

use axum::Router;
use http::{HeaderMap, HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;
use crate::orders::{CallerContext, CallerRole};

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Caller identity resolved by the (out-of-scope) auth middleware and
/// forwarded via headers; absent or unknown values mean anonymous.
pub fn caller_context(headers: &HeaderMap) -> CallerContext {
    let role = headers
        .get("x-caller-role")
        .and_then(|v| v.to_str().ok())
        .map(|s| match s {
            "admin" => CallerRole::Admin,
            "employee" => CallerRole::Employee,
            "customer" => CallerRole::Customer,
            _ => CallerRole::Anonymous,
        })
        .unwrap_or(CallerRole::Anonymous);
    let user_id = headers
        .get("x-caller-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    CallerContext::new(role, user_id)
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(orders::router())
        .merge(ledgers::router())
        .merge(health::router())
}

/// Build the fully configured application with all middleware
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - handle cross-origin requests from the web clients
        .layer(CorsLayer::permissive())
        // Compression - gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Timeout - bound request duration
        .layer(TimeoutLayer::new(std::time::Duration::from_millis(
            state.config.request_timeout_ms,
        )))
        // Request ID - generate a unique ID per request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to the response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
}
