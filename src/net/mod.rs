//! Network subsystem.
//!
//! # Data Flow
//! ```text
//! router / layout / script host
//!     → fetch.rs (Fetcher::fetch with RequestKind discriminator)
//!     → reqwest (HttpFetcher) or an in-memory site (tests)
//!     → Ok(body) for 2xx + non-empty, FetchError otherwise
//! ```

pub mod fetch;

pub use fetch::{FetchError, Fetcher, HttpFetcher, RequestKind, X_REQUESTED_WITH};
