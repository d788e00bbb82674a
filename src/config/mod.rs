//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML/JSON)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SiteConfig (validated, immutable)
//!     → shared via Arc with the router, hooks and script manager
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the core only reads it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError, ConfigFormat};
pub use schema::SiteConfig;
pub use schema::{LayoutConfig, PageEntry, PartialConfig, RouterConfig, TransitionConfig};
pub use schema::{FetchConfig, ObservabilityConfig, ServerConfig};
