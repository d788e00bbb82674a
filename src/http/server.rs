//! Development server for pseudo-SPA sites.
//!
//! # Responsibilities
//! - Serve a site root as static files
//! - Tag requests with an ID and classify the discriminator header
//! - Mark responses as varying on `X-Requested-With`
//! - Stop gracefully on shutdown

use std::path::{Path, PathBuf};

use axum::{
    http::{header::VARY, HeaderValue},
    middleware, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::request::{classify_request, UuidRequestId};

/// Static file server that understands the toolkit's request discriminator.
pub struct DevServer {
    root: PathBuf,
    router: Router,
}

impl DevServer {
    pub fn new(config: &ServerConfig) -> Self {
        let root = PathBuf::from(&config.root);
        let router = Self::build_router(&root);
        Self { root, router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(root: &Path) -> Router {
        let layers = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetResponseHeaderLayer::appending(
                VARY,
                HeaderValue::from_static("x-requested-with"),
            ))
            .layer(middleware::from_fn(classify_request));

        Router::new().fallback_service(ServeDir::new(root)).layer(layers)
    }

    /// Router with all layers, for embedding or testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, root = %self.root.display(), "Development server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("Development server stopped");
        Ok(())
    }
}
