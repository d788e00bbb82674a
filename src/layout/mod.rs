//! Layout subsystem.
//!
//! # Data Flow
//! ```text
//! LayoutConfig { header, footer }
//!     → partials.rs (fetch with RequestKind::Partial, concurrently)
//!     → Page::set_inner_html on the target element
//! ```
//!
//! # Design Decisions
//! - A missing fragment degrades the page, it never aborts startup

pub mod partials;

pub use partials::{inject_layout, inject_partial, PartialLoadError};
