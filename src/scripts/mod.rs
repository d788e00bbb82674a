//! Page script subsystem.
//!
//! # Data Flow
//! ```text
//! load_for_page(page_id)
//!     → loader.rs: teardown previous page (init cleanup, declared teardown)
//!     → loader.rs: evict previous page-exclusive scripts
//!     → host.rs: inject shared + page scripts concurrently
//!     → registry.rs: resolve and run the page's init, keep its cleanup
//!     → record page_id as current
//! ```
//!
//! # Design Decisions
//! - State lives in a manager instance, not in globals
//! - Callbacks are typed functions registered by name, not reflection
//! - Load failures propagate; teardown and init failures are only logged

pub mod host;
pub mod loader;
pub mod registry;

pub use host::{FetchScriptHost, ScriptHost, ScriptTag};
pub use loader::{InitError, PageLoadError, ScriptLifecycleManager, ScriptLoadError, TeardownError, TeardownHook};
pub use registry::{cleanup, CallbackError, CallbackRegistry, Cleanup, InitFn, TeardownFn};
