//! Per-page script lifecycle.
//!
//! # Responsibilities
//! - Inject each required script once (completed loads are remembered)
//! - Tear down the previous page: init cleanup, declared teardown, and its
//!   page-exclusive scripts
//! - Load shared and page scripts concurrently, then run the page's init
//!
//! # Design Decisions
//! - In-flight loads of the same URL are not deduplicated; only completed
//!   loads are
//! - One failing script never cancels its siblings; the page load fails
//!   after every attempt settled
//! - Teardown failures are logged per hook and never fail the page load
//! - Evicted scripts leave the loaded set so a revisit reloads them

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::join_all;
use thiserror::Error;

use crate::config::SiteConfig;
use crate::scripts::host::{ScriptHost, ScriptTag};
use crate::scripts::registry::{CallbackError, CallbackRegistry, Cleanup};

/// A script failed to load.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to load script {url}: {reason}")]
pub struct ScriptLoadError {
    pub url: String,
    pub reason: String,
}

impl ScriptLoadError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// One or more scripts required by a page failed to load.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("page {page_id}: {} script(s) failed to load", failures.len())]
pub struct PageLoadError {
    pub page_id: String,
    pub failures: Vec<ScriptLoadError>,
}

/// Which teardown hook failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownHook {
    /// Cleanup returned by the page's init.
    InitCleanup,
    /// The page's declared teardown.
    Declared,
}

/// A teardown hook of the previous page failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("teardown ({hook:?}) of page {page_id} failed: {source}")]
pub struct TeardownError {
    pub page_id: String,
    pub hook: TeardownHook,
    pub source: CallbackError,
}

/// A page's init callback failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("init of page {page_id} failed: {source}")]
pub struct InitError {
    pub page_id: String,
    pub source: CallbackError,
}

#[derive(Default)]
struct ScriptLoadState {
    loaded: HashSet<String>,
    current_page_scripts: HashSet<String>,
    current_page_id: Option<String>,
    current_init_cleanup: Option<Cleanup>,
}

/// Loads and disposes page scripts across navigations.
pub struct ScriptLifecycleManager<S> {
    host: S,
    config: Arc<SiteConfig>,
    registry: CallbackRegistry,
    state: Mutex<ScriptLoadState>,
}

impl<S: ScriptHost> ScriptLifecycleManager<S> {
    pub fn new(host: S, config: Arc<SiteConfig>, registry: CallbackRegistry) -> Self {
        Self {
            host,
            config,
            registry,
            state: Mutex::new(ScriptLoadState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, ScriptLoadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn host(&self) -> &S {
        &self.host
    }

    /// Page whose scripts are currently loaded.
    pub fn current_page_id(&self) -> Option<String> {
        self.state().current_page_id.clone()
    }

    /// True once `url` finished loading and has not been evicted.
    pub fn is_loaded(&self, url: &str) -> bool {
        self.state().loaded.contains(url)
    }

    /// Load `url` unless a previous load of it completed.
    pub async fn load_script(&self, url: &str, page_exclusive: bool) -> Result<(), ScriptLoadError> {
        if url.is_empty() || self.is_loaded(url) {
            return Ok(());
        }

        let tag = ScriptTag {
            src: url.to_string(),
            page_exclusive,
        };

        match self.host.inject(&tag).await {
            Ok(()) => {
                self.state().loaded.insert(tag.src);
                tracing::debug!(url, page_exclusive, "Script loaded");
                Ok(())
            }
            Err(err) => {
                tracing::error!(url, error = %err, "Script failed to load");
                Err(err)
            }
        }
    }

    /// Tear down the current page and load `page_id`'s scripts and init.
    pub async fn load_for_page(&self, page_id: &str) -> Result<(), PageLoadError> {
        self.run_teardown();
        self.cleanup_page_scripts();

        let entry = self.config.page(page_id);
        if entry.is_none() {
            tracing::debug!(page = page_id, "Page has no registry entry; loading shared scripts only");
        }
        let page_scripts = entry.map(|e| e.scripts.as_slice()).unwrap_or_default();

        self.state()
            .current_page_scripts
            .extend(page_scripts.iter().cloned());

        let shared = self.config.shared_scripts.iter().map(|url| self.load_script(url, false));
        let exclusive = page_scripts.iter().map(|url| self.load_script(url, true));
        let failures: Vec<ScriptLoadError> = join_all(shared.chain(exclusive))
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();

        if !failures.is_empty() {
            // Recorded so the next transition tears down this page, not the last one.
            self.state().current_page_id = Some(page_id.to_string());
            return Err(PageLoadError {
                page_id: page_id.to_string(),
                failures,
            });
        }

        if let Some(name) = entry.and_then(|e| e.init.as_deref()) {
            self.run_init(page_id, name).await;
        }

        self.state().current_page_id = Some(page_id.to_string());
        tracing::info!(
            page = page_id,
            shared = self.config.shared_scripts.len(),
            exclusive = page_scripts.len(),
            "Page scripts ready"
        );
        Ok(())
    }

    /// Tear down the current page without loading another one.
    pub fn teardown_current(&self) -> Vec<TeardownError> {
        let errors = self.run_teardown();
        self.cleanup_page_scripts();
        self.state().current_page_id = None;
        errors
    }

    async fn run_init(&self, page_id: &str, name: &str) {
        let Some(init) = self.registry.resolve_init(name) else {
            tracing::warn!(page = page_id, init = name, "Init callback is not registered");
            return;
        };

        match init().await {
            Ok(Some(cleanup)) => self.state().current_init_cleanup = Some(cleanup),
            Ok(None) => {}
            Err(source) => {
                let err = InitError {
                    page_id: page_id.to_string(),
                    source,
                };
                tracing::error!(error = %err, "Page init failed");
            }
        }
    }

    /// Run the init cleanup and the declared teardown of the current page,
    /// each isolated from the other.
    fn run_teardown(&self) -> Vec<TeardownError> {
        let (cleanup, previous) = {
            let mut state = self.state();
            (state.current_init_cleanup.take(), state.current_page_id.clone())
        };
        let page_id = previous.clone().unwrap_or_default();
        let mut errors = Vec::new();

        if let Some(cleanup) = cleanup {
            if let Err(source) = cleanup() {
                errors.push(TeardownError {
                    page_id: page_id.clone(),
                    hook: TeardownHook::InitCleanup,
                    source,
                });
            }
        }

        let declared = previous
            .as_deref()
            .and_then(|id| self.config.page(id))
            .and_then(|entry| entry.teardown.as_deref());
        if let Some(name) = declared {
            match self.registry.resolve_teardown(name) {
                Some(teardown) => {
                    if let Err(source) = teardown() {
                        errors.push(TeardownError {
                            page_id: page_id.clone(),
                            hook: TeardownHook::Declared,
                            source,
                        });
                    }
                }
                None => tracing::warn!(page = %page_id, teardown = name, "Teardown callback is not registered"),
            }
        }

        for err in &errors {
            tracing::error!(error = %err, "Page teardown failed");
        }
        errors
    }

    /// Remove the previous page's exclusive scripts and forget them.
    fn cleanup_page_scripts(&self) {
        let urls = std::mem::take(&mut self.state().current_page_scripts);
        if urls.is_empty() {
            return;
        }

        let removed = self.host.remove_page_scripts(&urls);
        self.state().loaded.retain(|url| !urls.contains(url));
        tracing::debug!(evicted = urls.len(), removed, "Page scripts evicted");
    }
}
