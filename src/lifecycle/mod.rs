//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Inject layout → Highlight nav → Load page scripts → Start router
//!
//! After each navigation (startup.rs, SiteHooks):
//!     Highlight nav → Tear down previous page → Load page scripts
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     Ctrl-C / host teardown → Stop router loop → Tear down current page
//! ```
//!
//! # Design Decisions
//! - Ordered startup: layout before nav highlight, router last
//! - Shutdown unsubscribes every listener and disposes page resources

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{bootstrap, Site, SiteHooks};
