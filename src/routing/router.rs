//! Pseudo-SPA navigation.
//!
//! # Responsibilities
//! - Turn eligible clicks and history traversal into navigations
//! - Fetch the destination document and swap the content region
//! - Keep title, history, scroll position and current URL in step
//! - Fall back to a full browser navigation whenever a valid new view
//!   cannot be established
//!
//! # States
//! ```text
//! Idle → Navigating: click/popstate to a URL other than the current one
//! Navigating → Idle: always, once the attempt settles (swap or fallback)
//! ```
//!
//! # Design Decisions
//! - The busy flag is taken synchronously when `navigate` is called, so a
//!   second request while busy is dropped, never queued
//! - The flag is released by a guard on every exit path, cancellation included
//! - The flag is released once the after hook settles; the enter transition
//!   finishes afterwards without blocking new navigations
//! - Same-URL comparison ignores the fragment
//! - No task spawning: navigations run on the caller's task

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::stream::{FuturesUnordered, StreamExt};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::Instrument;
use url::Url;

use crate::config::RouterConfig;
use crate::dom::{BrowserEvent, ClickEvent, ElementId, Page, ParsedDocument};
use crate::net::{FetchError, Fetcher, RequestKind};
use crate::routing::intercept::{same_document, should_handle_link};
use crate::routing::transition;

/// Error returned by an after-navigate hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Whether a navigation adds a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// Link click: push a new entry.
    Push,
    /// Back/forward: the browser already moved through history.
    Traverse,
}

/// Which document lacked the content region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSide {
    Current,
    Destination,
}

/// Why a navigation fell back to a full page load.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("document fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("destination document could not be parsed")]
    Unparseable,

    #[error("content region {selector:?} missing from {side:?} document")]
    MissingRegion { selector: String, side: DocumentSide },

    #[error("after-navigate hook failed: {0}")]
    Hook(HookError),
}

/// Result of a navigation request.
#[derive(Debug)]
pub enum NavigationOutcome {
    /// Dropped: already navigating, or the URL is the current one.
    Ignored,
    /// Content region swapped in place.
    Swapped,
    /// Fell back to a full browser navigation.
    FullReload(NavigationError),
}

impl NavigationOutcome {
    pub fn is_swapped(&self) -> bool {
        matches!(self, NavigationOutcome::Swapped)
    }
}

/// Snapshot of the router state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub current_url: Url,
    pub is_navigating: bool,
}

/// Host callbacks bracketing each navigation.
pub trait NavigationHooks<D> {
    /// Called once the navigation is accepted, before any waiting.
    fn before_navigate(&self, _url: &Url) {}

    /// Called after the swap with the new URL and the parsed document. An
    /// error turns the navigation into a full page load.
    fn after_navigate(&self, url: &Url, document: &D) -> impl Future<Output = Result<(), HookError>>;
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl<D> NavigationHooks<D> for NoopHooks {
    fn after_navigate(&self, _url: &Url, _document: &D) -> impl Future<Output = Result<(), HookError>> {
        std::future::ready(Ok(()))
    }
}

/// Clears the busy flag when dropped.
struct NavigationGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for NavigationGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Client-side router swapping the content region between documents.
pub struct NavigationRouter<P, F, H> {
    page: Arc<P>,
    fetcher: F,
    hooks: H,
    config: RouterConfig,
    current_url: Mutex<Url>,
    navigating: AtomicBool,
}

impl<P, F, H> NavigationRouter<P, F, H>
where
    P: Page,
    F: Fetcher,
    H: NavigationHooks<P::Document>,
{
    pub fn new(page: Arc<P>, fetcher: F, hooks: H, config: RouterConfig) -> Self {
        let current_url = page.location();
        Self {
            page,
            fetcher,
            hooks,
            config,
            current_url: Mutex::new(current_url),
            navigating: AtomicBool::new(false),
        }
    }

    fn current(&self) -> MutexGuard<'_, Url> {
        self.current_url.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current_url(&self) -> Url {
        self.current().clone()
    }

    pub fn is_navigating(&self) -> bool {
        self.navigating.load(Ordering::Acquire)
    }

    pub fn state(&self) -> NavigationState {
        NavigationState {
            current_url: self.current_url(),
            is_navigating: self.is_navigating(),
        }
    }

    /// Selector the host passes to `closest()` when turning a click target
    /// into the `Anchor` of a `ClickEvent`.
    pub fn link_selector(&self) -> &str {
        &self.config.link_selector
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    fn try_begin(&self, url: &Url) -> Option<NavigationGuard<'_>> {
        if same_document(url, &self.current()) {
            tracing::trace!(url = %url, "Already at destination");
            return None;
        }

        if self
            .navigating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(url = %url, "Navigation in progress; request dropped");
            return None;
        }

        Some(NavigationGuard {
            flag: &self.navigating,
        })
    }

    /// Navigate to `url`.
    ///
    /// Eligibility is decided when this is called, not when the future is
    /// first polled.
    pub fn navigate(&self, url: Url, mode: HistoryMode) -> impl Future<Output = NavigationOutcome> + '_ {
        let guard = self.try_begin(&url);
        let span = tracing::info_span!("navigate", url = %url, mode = ?mode);

        async move {
            let Some(guard) = guard else {
                return NavigationOutcome::Ignored;
            };

            self.hooks.before_navigate(&url);

            let transition = &self.config.transition;
            if transition.enabled {
                if let Some(region) = self.page.query(&self.config.content_selector) {
                    transition::leave(&*self.page, region, transition).await;
                }
            }

            let (document, region) = match self.fetch_and_swap(&url, mode).await {
                Ok(swapped) => swapped,
                Err(err) => return self.fall_back(&url, err),
            };

            // The navigation settles with the after hook; the enter
            // transition only cleans up classes and must not hold the flag.
            let settle = async {
                let hook = self.hooks.after_navigate(&url, &document).await;
                drop(guard);
                match hook {
                    Ok(()) => {
                        tracing::info!("Content swapped");
                        NavigationOutcome::Swapped
                    }
                    Err(err) => self.fall_back(&url, NavigationError::Hook(err)),
                }
            };
            let enter = async {
                if transition.enabled {
                    transition::enter(&*self.page, region, transition).await;
                }
            };

            let (outcome, ()) = tokio::join!(settle, enter);
            outcome
        }
        .instrument(span)
    }

    /// Synchronous click decision. When this returns a future the click's
    /// default action has been prevented and the caller must drive it.
    pub fn handle_click(&self, click: &ClickEvent) -> Option<impl Future<Output = NavigationOutcome> + '_> {
        let url = self.intercept(click)?;
        Some(self.navigate(url, HistoryMode::Push))
    }

    /// History traversal to whatever the location now is.
    pub fn handle_popstate(&self) -> impl Future<Output = NavigationOutcome> + '_ {
        self.navigate(self.page.location(), HistoryMode::Traverse)
    }

    fn intercept(&self, click: &ClickEvent) -> Option<Url> {
        let url = should_handle_link(click, &self.page.location())?;
        click.prevent_default();
        Some(url)
    }

    /// Listen for clicks and history traversal until `shutdown` fires or the
    /// page's event hub goes away.
    ///
    /// Navigations are driven concurrently with event intake so requests
    /// arriving while busy are dropped rather than queued behind the
    /// current one. Browser hosts that must call `preventDefault` inside
    /// their listener use [`handle_click`](Self::handle_click) instead.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        let mut events = self.page.events().subscribe();
        let mut in_flight = FuturesUnordered::new();

        tracing::info!(
            content = %self.config.content_selector,
            links = %self.config.link_selector,
            "Router listening"
        );

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(BrowserEvent::Click(click)) => {
                        if let Some(url) = self.intercept(&click) {
                            in_flight.push(self.navigate(url, HistoryMode::Push));
                        }
                    }
                    Some(BrowserEvent::PopState) => {
                        in_flight.push(self.navigate(self.page.location(), HistoryMode::Traverse));
                    }
                    Some(BrowserEvent::TransitionEnd { .. }) => {}
                    None => break,
                },
                Some(outcome) = in_flight.next(), if !in_flight.is_empty() => {
                    tracing::trace!(?outcome, "Navigation settled");
                }
                _ = shutdown.recv() => {
                    tracing::info!("Router received shutdown signal");
                    break;
                }
            }
        }
    }

    fn fall_back(&self, url: &Url, err: NavigationError) -> NavigationOutcome {
        tracing::warn!(error = %err, "Falling back to full navigation");
        self.page.assign_location(url);
        NavigationOutcome::FullReload(err)
    }

    async fn fetch_and_swap(&self, url: &Url, mode: HistoryMode) -> Result<(P::Document, ElementId), NavigationError> {
        let html = self.fetcher.fetch(url, RequestKind::Document).await?;
        let document = self
            .page
            .parse_document(&html)
            .ok_or(NavigationError::Unparseable)?;

        let region = self.swap_content(&document, url, mode)?;
        Ok((document, region))
    }

    fn swap_content(&self, document: &P::Document, url: &Url, mode: HistoryMode) -> Result<ElementId, NavigationError> {
        let selector = &self.config.content_selector;
        let missing = |side| NavigationError::MissingRegion {
            selector: selector.clone(),
            side,
        };

        let fresh = document.select(selector).ok_or_else(|| missing(DocumentSide::Destination))?;
        let current = self.page.query(selector).ok_or_else(|| missing(DocumentSide::Current))?;

        let region = self.page.replace_with(current, &fresh);

        if let Some(title) = document.title().filter(|t| !t.is_empty()) {
            self.page.set_title(&title);
        }
        if mode == HistoryMode::Push {
            self.page.push_state(url);
        }
        *self.current() = url.clone();
        self.page.scroll_to_origin();

        Ok(region)
    }
}
