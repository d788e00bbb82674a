//! Pseudo-SPA toolkit for static multi-page sites.
//!
//! Injects shared layout fragments, highlights the active navigation link,
//! loads per-page scripts declared in configuration and swaps the content
//! region on same-origin link clicks while keeping history in step.

pub mod config;
pub mod dom;
pub mod http;
pub mod layout;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod scripts;

pub use config::schema::SiteConfig;
pub use http::DevServer;
pub use lifecycle::{bootstrap, Shutdown, Site};
pub use routing::NavigationRouter;
pub use scripts::ScriptLifecycleManager;
