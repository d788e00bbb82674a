//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check selectors and script URLs are non-empty
//! - Check callback names are well-formed qualified names
//! - Detect scripts declared both shared and page-exclusive
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;

use crate::config::schema::SiteConfig;
use crate::scripts::registry::is_qualified_name;

/// Upper bound for a transition; longer values almost always mean seconds were
/// written where milliseconds were expected.
const MAX_TRANSITION_MS: u64 = 10_000;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "pages.blog.init").
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (name, partial) in [("header", &config.layout.header), ("footer", &config.layout.footer)] {
        if let Some(partial) = partial {
            if partial.selector.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("layout.{name}.selector"),
                    "selector must not be empty",
                ));
            }
            if partial.url.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("layout.{name}.url"),
                    "url must not be empty",
                ));
            }
        }
    }

    if config.layout.nav_selector.trim().is_empty() {
        errors.push(ValidationError::new("layout.nav_selector", "selector must not be empty"));
    }
    if config.router.content_selector.trim().is_empty() {
        errors.push(ValidationError::new("router.content_selector", "selector must not be empty"));
    }
    if config.router.link_selector.trim().is_empty() {
        errors.push(ValidationError::new("router.link_selector", "selector must not be empty"));
    }
    if config.router.page_attribute.trim().is_empty() {
        errors.push(ValidationError::new("router.page_attribute", "attribute must not be empty"));
    }

    let transition = &config.router.transition;
    if transition.enabled && transition.duration_ms > MAX_TRANSITION_MS {
        errors.push(ValidationError::new(
            "router.transition.duration_ms",
            format!("{} exceeds maximum of {MAX_TRANSITION_MS}", transition.duration_ms),
        ));
    }

    if config.fetch.timeout_ms == 0 {
        errors.push(ValidationError::new("fetch.timeout_ms", "timeout must be greater than zero"));
    }

    let mut shared = HashSet::new();
    for (i, url) in config.shared_scripts.iter().enumerate() {
        if url.trim().is_empty() {
            errors.push(ValidationError::new(format!("shared_scripts[{i}]"), "url must not be empty"));
        } else if !shared.insert(url.as_str()) {
            errors.push(ValidationError::new(
                format!("shared_scripts[{i}]"),
                format!("duplicate script {url}"),
            ));
        }
    }

    for (page_id, entry) in &config.pages {
        for (i, url) in entry.scripts.iter().enumerate() {
            let field = format!("pages.{page_id}.scripts[{i}]");
            if url.trim().is_empty() {
                errors.push(ValidationError::new(field, "url must not be empty"));
            } else if shared.contains(url.as_str()) {
                // A shared script listed per page would be evicted on leave.
                errors.push(ValidationError::new(field, format!("{url} is already a shared script")));
            }
        }

        for (hook, name) in [("init", &entry.init), ("teardown", &entry.teardown)] {
            if let Some(name) = name {
                if !is_qualified_name(name) {
                    errors.push(ValidationError::new(
                        format!("pages.{page_id}.{hook}"),
                        format!("{name:?} is not a qualified function name"),
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
