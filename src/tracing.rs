//! Request-scoped identifiers for log correlation and error responses.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::cell::RefCell;
use std::future::Future;
use uuid::Uuid;

// Re-export tracing macros so crate::tracing::info! etc. resolve.
pub use tracing::{debug, error, info, trace, warn};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

impl Default for RequestId {
    fn default() -> Self {
        RequestId(Uuid::new_v4().to_string())
    }
}

impl RequestId {
    pub fn new(value: impl Into<String>) -> Self {
        RequestId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

tokio::task_local! {
    static CURRENT_REQUEST_ID: RefCell<Option<RequestId>>;
}

/// Runs `future` with the given request id installed in task-local scope.
pub async fn scope_request_id<Fut, R>(request_id: RequestId, future: Fut) -> R
where
    Fut: Future<Output = R>,
{
    CURRENT_REQUEST_ID
        .scope(RefCell::new(Some(request_id)), future)
        .await
}

/// The request id of the current task scope, if any.
pub fn current_request_id() -> Option<RequestId> {
    CURRENT_REQUEST_ID
        .try_with(|id| id.borrow().clone())
        .ok()
        .flatten()
}

/// Middleware: adopt the caller's `x-request-id` or mint a fresh one, scope
/// the request to it, and echo it back on the response.
pub async fn request_id_middleware(request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(RequestId::new)
        .unwrap_or_default();

    let mut response = scope_request_id(request_id.clone(), next.run(request)).await;

    if let Ok(value) = http::HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
