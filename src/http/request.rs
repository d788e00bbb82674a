//! Request tagging and classification.
//!
//! # Responsibilities
//! - Generate a request ID (UUID v4) for every request
//! - Classify the `X-Requested-With` discriminator into a [`RequestKind`]
//! - Attach the classification to request extensions for later layers
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Unknown discriminator values are served like plain navigations

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::net::{RequestKind, X_REQUESTED_WITH};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Issues UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Discriminator carried by a request, if it names a known kind.
pub fn request_kind<B>(request: &axum::http::Request<B>) -> Option<RequestKind> {
    request
        .headers()
        .get(X_REQUESTED_WITH)
        .and_then(|v| v.to_str().ok())
        .and_then(RequestKind::from_header)
}

/// Middleware recording which part of the toolkit issued a request.
pub async fn classify_request(mut request: Request, next: Next) -> Response {
    let kind = request_kind(&request);
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::debug!(
        request_id = %request_id,
        path = %request.uri().path(),
        kind = kind.map(RequestKind::header_value).unwrap_or("Navigation"),
        "Serving request"
    );

    if let Some(kind) = kind {
        request.extensions_mut().insert(kind);
    }

    next.run(request).await
}
