//! End-to-end startup and navigation of a configured site.

use std::sync::Arc;
use std::time::Duration;

use pseudo_spa::config::{parse_config, ConfigFormat, SiteConfig};
use pseudo_spa::dom::Page;
use pseudo_spa::lifecycle::{bootstrap, Shutdown};
use pseudo_spa::net::RequestKind;
use pseudo_spa::routing::{HistoryMode, NavigationError, NavigationOutcome};
use pseudo_spa::scripts::{CallbackError, CallbackRegistry, Cleanup};

mod common;
use common::{url, FakeFetcher, FakePage, FakeScriptHost, Journal};

const SITE: &str = r##"
shared_scripts = ["/js/site.js"]

[layout]
header = { selector = "#site-header", url = "/partials/header.html" }
footer = { selector = "#site-footer", url = "/partials/footer.html" }

[pages.home]
scripts = ["/js/home.js"]
init = "HomePage.init"

[pages.about]
scripts = ["/js/about.js"]
init = "AboutPage.init"

[router.transition]
enabled = false
"##;

fn site_config() -> Arc<SiteConfig> {
    Arc::new(parse_config(SITE, ConfigFormat::Toml).unwrap())
}

fn registry(journal: &Journal) -> CallbackRegistry {
    let mut registry = CallbackRegistry::new();
    for (name, page) in [("HomePage.init", "home"), ("AboutPage.init", "about")] {
        let j = journal.clone();
        registry.register_init(name, move || {
            let j = j.clone();
            async move {
                j.record(format!("init:{page}"));
                Ok::<Option<Cleanup>, CallbackError>(None)
            }
        });
    }
    registry
}

struct Fixture {
    page: Arc<FakePage>,
    fetcher: FakeFetcher,
    journal: Journal,
    header: pseudo_spa::dom::ElementId,
    footer: pseudo_spa::dom::ElementId,
    nav: Vec<pseudo_spa::dom::ElementId>,
}

fn fixture() -> Fixture {
    let page = Arc::new(FakePage::new("/"));
    let header = page.add_element(&["#site-header"], &[]);
    let nav = vec![
        page.add_nav_link("/"),
        page.add_nav_link("/about"),
        page.add_nav_link("https://elsewhere.example/"),
    ];
    page.add_element(&["main"], &[("data-page", "home")]);
    let footer = page.add_element(&["#site-footer"], &[]);

    let fetcher = FakeFetcher::new();
    fetcher
        .serve("/partials/header.html", "<nav id=\"menu\">…</nav>")
        .serve("/partials/footer.html", "<p>© site</p>")
        .serve_page("/", "Home", "home")
        .serve_page("/about", "About", "about");

    Fixture {
        page,
        fetcher,
        journal: Journal::default(),
        header,
        footer,
        nav,
    }
}

#[tokio::test]
async fn test_bootstrap_injects_layout_highlights_and_inits() {
    let f = fixture();
    let site = bootstrap(
        f.page.clone(),
        f.fetcher.clone(),
        FakeScriptHost::new(f.journal.clone()),
        registry(&f.journal),
        site_config(),
    )
    .await;

    assert_eq!(f.page.inner_html(f.header), "<nav id=\"menu\">…</nav>");
    assert_eq!(f.page.inner_html(f.footer), "<p>© site</p>");
    assert_eq!(f.fetcher.request_count(RequestKind::Partial), 2);

    assert_eq!(f.page.classes(f.nav[0]), vec!["accent"]);
    assert!(f.page.classes(f.nav[1]).is_empty());
    assert!(f.page.classes(f.nav[2]).is_empty());

    assert_eq!(
        f.journal.entries(),
        vec!["inject:/js/site.js", "inject:/js/home.js", "init:home"]
    );
    assert_eq!(site.scripts.current_page_id().as_deref(), Some("home"));
    assert_eq!(site.router.current_url(), url("/"));
}

#[tokio::test]
async fn test_navigation_rehighlights_and_swaps_page_scripts() {
    let f = fixture();
    let site = bootstrap(
        f.page.clone(),
        f.fetcher.clone(),
        FakeScriptHost::new(f.journal.clone()),
        registry(&f.journal),
        site_config(),
    )
    .await;
    f.journal.clear();

    let outcome = site.router.navigate(url("/about"), HistoryMode::Push).await;

    assert!(outcome.is_swapped());
    assert!(f.page.classes(f.nav[0]).is_empty());
    assert_eq!(f.page.classes(f.nav[1]), vec!["accent"]);
    assert_eq!(
        f.journal.entries(),
        vec!["remove:/js/home.js", "inject:/js/about.js", "init:about"]
    );
    assert_eq!(site.scripts.current_page_id().as_deref(), Some("about"));
}

#[tokio::test]
async fn test_missing_partial_does_not_abort_startup() {
    let f = fixture();
    f.fetcher.fail("/partials/footer.html", 500);

    let site = bootstrap(
        f.page.clone(),
        f.fetcher.clone(),
        FakeScriptHost::new(f.journal.clone()),
        registry(&f.journal),
        site_config(),
    )
    .await;

    assert_eq!(f.page.inner_html(f.header), "<nav id=\"menu\">…</nav>");
    assert_eq!(f.page.inner_html(f.footer), "");
    assert_eq!(site.scripts.current_page_id().as_deref(), Some("home"));
}

#[tokio::test]
async fn test_page_script_failure_forces_full_navigation() {
    let f = fixture();
    let host = FakeScriptHost::new(f.journal.clone());
    host.fail("/js/about.js");

    let site = bootstrap(f.page.clone(), f.fetcher.clone(), host, registry(&f.journal), site_config()).await;

    let outcome = site.router.navigate(url("/about"), HistoryMode::Push).await;

    assert!(matches!(outcome, NavigationOutcome::FullReload(NavigationError::Hook(_))));
    assert_eq!(f.page.assigned(), vec![url("/about")]);
    assert!(!f.journal.entries().contains(&"init:about".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_router_and_tears_down() {
    let f = fixture();
    let site = bootstrap(
        f.page.clone(),
        f.fetcher.clone(),
        FakeScriptHost::new(f.journal.clone()),
        registry(&f.journal),
        site_config(),
    )
    .await;
    let shutdown = Shutdown::new();

    let stop = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(f.page.events().listener_count(), 1);
        shutdown.trigger();
    };
    tokio::join!(site.run(&shutdown), stop);

    assert_eq!(site.scripts.current_page_id(), None);
    assert!(f.journal.entries().contains(&"remove:/js/home.js".to_string()));
    assert_eq!(f.page.events().listener_count(), 0);
}
