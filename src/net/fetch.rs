//! Document, partial and script fetching.
//!
//! # Responsibilities
//! - Tag every request with the `X-Requested-With` discriminator
//! - Treat only 2xx responses with a non-empty body as success
//! - Enforce a total request timeout
//!
//! # Design Decisions
//! - `Fetcher` is a trait so the router can run against an in-memory site
//! - Timeout errors are distinct from transport errors

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT};
use thiserror::Error;
use url::Url;

use crate::config::FetchConfig;

/// Discriminator header distinguishing toolkit requests from navigations.
pub const X_REQUESTED_WITH: &str = "x-requested-with";

/// What a request is for. Sent as the `X-Requested-With` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Destination document for a content swap.
    Document,
    /// Layout fragment (header, footer).
    Partial,
    /// Page script.
    PageModule,
}

impl RequestKind {
    pub fn header_value(self) -> &'static str {
        match self {
            RequestKind::Document => "PseudoSPA",
            RequestKind::Partial => "LayoutPartial",
            RequestKind::PageModule => "PageModule",
        }
    }

    /// Classify an incoming header value. Unknown values are `None`.
    pub fn from_header(value: &str) -> Option<Self> {
        match value {
            "PseudoSPA" => Some(RequestKind::Document),
            "LayoutPartial" => Some(RequestKind::Partial),
            "PageModule" => Some(RequestKind::PageModule),
            _ => None,
        }
    }
}

/// Errors that can occur while fetching a resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection or protocol failure.
    #[error("request failed: {0}")]
    Transport(String),

    /// Server answered with a non-2xx status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// Server answered 2xx with nothing in it.
    #[error("empty response body")]
    EmptyBody,

    /// Request exceeded the configured timeout.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Retrieves the text body of a URL.
pub trait Fetcher {
    fn fetch(&self, url: &Url, kind: RequestKind) -> impl Future<Output = Result<String, FetchError>>;
}

/// `Fetcher` backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &FetchConfig) -> Self {
        Self {
            client,
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, kind: RequestKind) -> Result<String, FetchError> {
        let request = self
            .client
            .get(url.clone())
            .header(X_REQUESTED_WITH, HeaderValue::from_static(kind.header_value()))
            .header(ACCEPT, HeaderValue::from_static("text/html, */*"))
            .timeout(self.timeout)
            .send();

        let response = request.await.map_err(|e| self.classify(e))?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url = %url, status = %status, kind = ?kind, "Fetch returned non-success status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        if body.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        tracing::trace!(url = %url, kind = ?kind, bytes = body.len(), "Fetched");
        Ok(body)
    }
}

impl HttpFetcher {
    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}
