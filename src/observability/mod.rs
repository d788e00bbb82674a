//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (url, page, selector, error)
//!     → spans per navigation ("navigate", url, mode)
//!
//! Consumers:
//!     → logging.rs (fmt or JSON subscriber, EnvFilter)
//! ```

pub mod logging;
