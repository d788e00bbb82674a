//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a site.
//! All types derive Serde traits for deserialization from config files.
//! Field aliases accept the camelCase spelling used by browser-side
//! `PageConfig` objects so an existing JSON config loads unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for a pseudo-SPA site.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Shared layout fragments and navigation highlighting.
    pub layout: LayoutConfig,

    /// Scripts loaded on every page, never evicted.
    #[serde(alias = "sharedScripts")]
    pub shared_scripts: Vec<String>,

    /// Per-page script registry keyed by page identifier.
    pub pages: BTreeMap<String, PageEntry>,

    /// Navigation router settings.
    pub router: RouterConfig,

    /// Network fetch settings.
    pub fetch: FetchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Development server settings.
    pub server: ServerConfig,
}

impl SiteConfig {
    /// Look up the registry entry for a page.
    pub fn page(&self, page_id: &str) -> Option<&PageEntry> {
        self.pages.get(page_id)
    }
}

/// Layout configuration (header/footer partials and nav menu).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Header partial, if any.
    pub header: Option<PartialConfig>,

    /// Footer partial, if any.
    pub footer: Option<PartialConfig>,

    /// Selector enumerating the navigation anchors to highlight.
    #[serde(alias = "navSelector")]
    pub nav_selector: String,

    /// Class toggled on the active navigation anchor.
    #[serde(alias = "activeClass")]
    pub active_class: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header: None,
            footer: None,
            nav_selector: "#menu a[href]".to_string(),
            active_class: "accent".to_string(),
        }
    }
}

/// A remote HTML fragment injected into the element matching `selector`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PartialConfig {
    /// Target element selector (e.g., "#app-header").
    pub selector: String,

    /// Fragment URL (e.g., "/partials/header.html").
    pub url: String,
}

/// Scripts and callbacks bound to a single page identifier.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PageEntry {
    /// Page-exclusive script URLs, in declaration order.
    pub scripts: Vec<String>,

    /// Qualified name of the init callback (e.g., "SystemsPage.init").
    pub init: Option<String>,

    /// Qualified name of the teardown callback.
    pub teardown: Option<String>,
}

/// Navigation router configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Selector of the content region swapped on navigation.
    #[serde(alias = "contentSelector")]
    pub content_selector: String,

    /// Selector of anchors eligible for interception. Hosts resolve a click
    /// target with `closest(link_selector)` to fill `ClickEvent::anchor`;
    /// see `NavigationRouter::link_selector`.
    #[serde(alias = "linkSelector")]
    pub link_selector: String,

    /// Attribute on the content region naming the page.
    #[serde(alias = "pageAttribute")]
    pub page_attribute: String,

    /// Visual transition bracketing the swap.
    pub transition: TransitionConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            content_selector: "main".to_string(),
            link_selector: "a[href]".to_string(),
            page_attribute: "data-page".to_string(),
            transition: TransitionConfig::default(),
        }
    }
}

/// CSS-class-driven transition settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TransitionConfig {
    /// Enable leave/enter transitions.
    pub enabled: bool,

    /// Nominal transition duration in milliseconds.
    #[serde(alias = "duration", alias = "durationMs")]
    pub duration_ms: u64,

    #[serde(alias = "leaveClass")]
    pub leave_class: String,

    #[serde(alias = "leaveActiveClass")]
    pub leave_active_class: String,

    #[serde(alias = "enterClass")]
    pub enter_class: String,

    #[serde(alias = "enterActiveClass")]
    pub enter_active_class: String,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 180,
            leave_class: "spa-leave".to_string(),
            leave_active_class: "spa-leave-active".to_string(),
            enter_class: "spa-enter".to_string(),
            enter_active_class: "spa-enter-active".to_string(),
        }
    }
}

impl TransitionConfig {
    /// Grace added to the nominal duration before forcing progress.
    pub const FALLBACK_GRACE_MS: u64 = 80;

    /// Transitions disabled; swaps happen immediately.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Deadline after which a transition-end wait gives up.
    pub fn fallback_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.duration_ms.saturating_add(Self::FALLBACK_GRACE_MS))
    }
}

/// Fetch configuration for documents, partials and page scripts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Total request timeout in milliseconds.
    pub timeout_ms: u64,

    /// Origin used to resolve relative URLs outside a browser.
    pub base_url: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            base_url: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON lines instead of the human-readable format.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

/// Development server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Directory served as the site root.
    pub root: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            root: ".".to_string(),
        }
    }
}
