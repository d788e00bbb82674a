//! Development HTTP server subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, graceful shutdown)
//!     → request.rs (request ID, X-Requested-With classification)
//!     → tower-http ServeDir (site root)
//!     → Vary: X-Requested-With on every response
//! ```

pub mod request;
pub mod server;

pub use request::{classify_request, request_kind, UuidRequestId, X_REQUEST_ID};
pub use server::DevServer;
