//! Startup orchestration.
//!
//! # Responsibilities
//! - Inject layout partials (header and footer concurrently)
//! - Highlight the active navigation link
//! - Load the current page's scripts and run its init
//! - Build the router wired to hooks that repeat the last two steps
//!   after every navigation
//!
//! # Design Decisions
//! - Degrade, don't fail: partial and initial script failures are logged
//! - Ordered startup: layout first, then nav, then scripts, router last

use std::sync::Arc;

use url::Url;

use crate::config::SiteConfig;
use crate::dom::Page;
use crate::layout::inject_layout;
use crate::lifecycle::shutdown::Shutdown;
use crate::net::Fetcher;
use crate::routing::{mark_active_nav_link, HookError, NavigationHooks, NavigationRouter};
use crate::scripts::{CallbackRegistry, PageLoadError, ScriptHost, ScriptLifecycleManager};

/// After-navigate behaviour of a configured site.
pub struct SiteHooks<P, S> {
    page: Arc<P>,
    scripts: Arc<ScriptLifecycleManager<S>>,
    config: Arc<SiteConfig>,
}

impl<P: Page, S: ScriptHost> SiteHooks<P, S> {
    pub fn new(page: Arc<P>, scripts: Arc<ScriptLifecycleManager<S>>, config: Arc<SiteConfig>) -> Self {
        Self { page, scripts, config }
    }

    /// Page id declared on the content region, if any.
    pub fn current_page_id(&self) -> Option<String> {
        let region = self.page.query(&self.config.router.content_selector)?;
        self.page
            .attribute(region, &self.config.router.page_attribute)
            .filter(|id| !id.is_empty())
    }

    /// Re-highlight navigation and load the current page's scripts.
    pub async fn refresh(&self) -> Result<(), PageLoadError> {
        let layout = &self.config.layout;
        mark_active_nav_link(&*self.page, &layout.nav_selector, &layout.active_class);

        match self.current_page_id() {
            Some(page_id) => self.scripts.load_for_page(&page_id).await,
            None => {
                tracing::debug!("Content region declares no page; scripts unchanged");
                Ok(())
            }
        }
    }
}

impl<P: Page, S: ScriptHost> NavigationHooks<P::Document> for SiteHooks<P, S> {
    fn before_navigate(&self, url: &Url) {
        tracing::debug!(url = %url, "Leaving page");
    }

    async fn after_navigate(&self, _url: &Url, _document: &P::Document) -> Result<(), HookError> {
        self.refresh().await.map_err(HookError::from)
    }
}

/// A running pseudo-SPA site.
pub struct Site<P, F, S> {
    pub router: NavigationRouter<P, F, SiteHooks<P, S>>,
    pub scripts: Arc<ScriptLifecycleManager<S>>,
}

impl<P, F, S> Site<P, F, S>
where
    P: Page,
    F: Fetcher,
    S: ScriptHost,
{
    /// Route until `shutdown` triggers, then tear down the current page.
    pub async fn run(&self, shutdown: &Shutdown) {
        self.router.run(shutdown.subscribe()).await;

        let errors = self.scripts.teardown_current();
        tracing::info!(teardown_errors = errors.len(), "Site stopped");
    }
}

/// Bring a page to life: layout, navigation highlight, page scripts, router.
pub async fn bootstrap<P, F, S>(
    page: Arc<P>,
    fetcher: F,
    script_host: S,
    registry: CallbackRegistry,
    config: Arc<SiteConfig>,
) -> Site<P, F, S>
where
    P: Page,
    F: Fetcher,
    S: ScriptHost,
{
    let (header, footer) = inject_layout(&*page, &fetcher, &config.layout).await;
    tracing::debug!(header = header.is_some(), footer = footer.is_some(), "Layout injected");

    let scripts = Arc::new(ScriptLifecycleManager::new(script_host, config.clone(), registry));
    let hooks = SiteHooks::new(page.clone(), scripts.clone(), config.clone());

    if let Err(err) = hooks.refresh().await {
        tracing::error!(error = %err, "Initial page scripts failed to load");
    }

    let router = NavigationRouter::new(page, fetcher, hooks, config.router.clone());
    tracing::info!(url = %router.current_url(), "pseudo-SPA ready");

    Site { router, scripts }
}
