//! Script injection seam.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use url::Url;

use crate::net::{Fetcher, RequestKind};
use crate::scripts::loader::ScriptLoadError;

/// A `<script>` element to inject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTag {
    /// Script URL as written in configuration.
    pub src: String,
    /// Tagged for removal when the page is left.
    pub page_exclusive: bool,
}

/// Owner of the script nodes in the document head.
pub trait ScriptHost {
    /// Append `tag` to the document and resolve once it loaded or failed.
    fn inject(&self, tag: &ScriptTag) -> impl Future<Output = Result<(), ScriptLoadError>>;

    /// Remove page-exclusive nodes whose `src` is in `urls`. Returns how many
    /// nodes were removed.
    fn remove_page_scripts(&self, urls: &HashSet<String>) -> usize;
}

/// `ScriptHost` that "loads" a script by fetching it.
///
/// Used outside a browser to check that every script a page declares is
/// reachable, with the same eviction bookkeeping a browser host would see.
#[derive(Debug)]
pub struct FetchScriptHost<F> {
    fetcher: F,
    base: Url,
    injected: Mutex<Vec<ScriptTag>>,
}

impl<F> FetchScriptHost<F> {
    pub fn new(fetcher: F, base: Url) -> Self {
        Self {
            fetcher,
            base,
            injected: Mutex::new(Vec::new()),
        }
    }

    /// Tags currently "in the document".
    pub fn injected(&self) -> Vec<ScriptTag> {
        self.injected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<F: Fetcher> ScriptHost for FetchScriptHost<F> {
    async fn inject(&self, tag: &ScriptTag) -> Result<(), ScriptLoadError> {
        let url = self
            .base
            .join(&tag.src)
            .map_err(|e| ScriptLoadError::new(&tag.src, e.to_string()))?;

        self.fetcher
            .fetch(&url, RequestKind::PageModule)
            .await
            .map_err(|e| ScriptLoadError::new(&tag.src, e.to_string()))?;

        self.injected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tag.clone());
        Ok(())
    }

    fn remove_page_scripts(&self, urls: &HashSet<String>) -> usize {
        let mut injected = self.injected.lock().unwrap_or_else(PoisonError::into_inner);
        let before = injected.len();
        injected.retain(|tag| !(tag.page_exclusive && urls.contains(&tag.src)));
        before - injected.len()
    }
}
