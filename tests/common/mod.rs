//! Shared fakes for integration testing: an in-memory page, a site served
//! from a map, and a script host that records what it was asked to do.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use url::Url;

use pseudo_spa::dom::{ElementId, EventHub, Page, ParsedDocument};
use pseudo_spa::net::{FetchError, Fetcher, RequestKind};
use pseudo_spa::scripts::{ScriptHost, ScriptLoadError, ScriptTag};

pub const ORIGIN: &str = "https://example.com";

pub fn url(path: &str) -> Url {
    Url::parse(ORIGIN).unwrap().join(path).unwrap()
}

/// Ordered record of side effects shared between fakes and callbacks.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// A full HTML document as the fake parser understands it.
pub fn page_html(title: &str, page_id: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><title>{title}</title></head>\
         <body><main data-page=\"{page_id}\">{body}</main></body></html>"
    )
}

// ---------------------------------------------------------------------------
// Parsed documents
// ---------------------------------------------------------------------------

/// Element lifted out of a fetched document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeFragment {
    pub selector: String,
    pub attributes: HashMap<String, String>,
    pub inner_html: String,
}

#[derive(Debug, Clone)]
pub struct FakeDocument {
    title: Option<String>,
    main: Option<FakeFragment>,
}

impl ParsedDocument for FakeDocument {
    type Fragment = FakeFragment;

    fn select(&self, selector: &str) -> Option<FakeFragment> {
        self.main.clone().filter(|m| m.selector == selector)
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }
}

fn between<'a>(haystack: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = haystack.find(open)? + open.len();
    let end = haystack[start..].find(close)? + start;
    Some(&haystack[start..end])
}

/// Understands `<title>` and a single `<main data-page="…">` element.
pub fn parse(html: &str) -> Option<FakeDocument> {
    if !html.contains("<html") {
        return None;
    }

    let title = between(html, "<title>", "</title>").map(str::to_string);
    let main = html.find("<main").map(|start| {
        let rest = &html[start..];
        let open_end = rest.find('>').unwrap_or(rest.len());
        let open_tag = &rest[..open_end];
        let mut attributes = HashMap::new();
        if let Some(page) = between(open_tag, "data-page=\"", "\"") {
            attributes.insert("data-page".to_string(), page.to_string());
        }
        FakeFragment {
            selector: "main".to_string(),
            attributes,
            inner_html: between(rest, ">", "</main>").unwrap_or_default().to_string(),
        }
    });

    Some(FakeDocument { title, main })
}

// ---------------------------------------------------------------------------
// Live page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct FakeElement {
    id: ElementId,
    selectors: Vec<String>,
    attributes: HashMap<String, String>,
    classes: Vec<String>,
    inner_html: String,
}

/// What the browser window did, for assertions.
#[derive(Debug, Default)]
struct WindowState {
    location: Option<Url>,
    title: String,
    pushed: Vec<Url>,
    assigned: Vec<Url>,
    scrolls: usize,
}

/// In-memory document. Selectors are matched by exact string equality
/// against the selectors an element was created with.
#[derive(Debug)]
pub struct FakePage {
    elements: Mutex<Vec<FakeElement>>,
    window: Mutex<WindowState>,
    next_id: AtomicU64,
    events: EventHub,
    journal: Journal,
}

impl FakePage {
    pub fn new(location: &str) -> Self {
        Self {
            elements: Mutex::new(Vec::new()),
            window: Mutex::new(WindowState {
                location: Some(url(location)),
                ..WindowState::default()
            }),
            next_id: AtomicU64::new(1),
            events: EventHub::new(),
            journal: Journal::default(),
        }
    }

    /// A page at `location` with a content region for `page_id`.
    pub fn with_content(location: &str, page_id: &str) -> Self {
        let page = Self::new(location);
        page.add_element(&["main"], &[("data-page", page_id)]);
        page
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn add_element(&self, selectors: &[&str], attributes: &[(&str, &str)]) -> ElementId {
        let id = ElementId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.elements.lock().unwrap().push(FakeElement {
            id,
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            classes: Vec::new(),
            inner_html: String::new(),
        });
        id
    }

    /// Add a navigation anchor matched by the default nav selector.
    pub fn add_nav_link(&self, href: &str) -> ElementId {
        self.add_element(&["#menu a[href]", "a[href]"], &[("href", href)])
    }

    pub fn classes(&self, element: ElementId) -> Vec<String> {
        self.find(element).map(|e| e.classes).unwrap_or_default()
    }

    pub fn inner_html(&self, element: ElementId) -> String {
        self.find(element).map(|e| e.inner_html).unwrap_or_default()
    }

    pub fn set_location(&self, path: &str) {
        self.window.lock().unwrap().location = Some(url(path));
    }

    pub fn title(&self) -> String {
        self.window.lock().unwrap().title.clone()
    }

    pub fn pushed(&self) -> Vec<Url> {
        self.window.lock().unwrap().pushed.clone()
    }

    pub fn assigned(&self) -> Vec<Url> {
        self.window.lock().unwrap().assigned.clone()
    }

    pub fn scrolls(&self) -> usize {
        self.window.lock().unwrap().scrolls
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    fn find(&self, element: ElementId) -> Option<FakeElement> {
        self.elements
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == element)
            .cloned()
    }

    fn with_element(&self, element: ElementId, f: impl FnOnce(&mut FakeElement)) {
        if let Some(e) = self.elements.lock().unwrap().iter_mut().find(|e| e.id == element) {
            f(e);
        }
    }
}

impl Page for FakePage {
    type Document = FakeDocument;

    fn location(&self) -> Url {
        self.window.lock().unwrap().location.clone().unwrap()
    }

    fn query(&self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        self.elements
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.selectors.iter().any(|s| s == selector))
            .map(|e| e.id)
            .collect()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.find(element).and_then(|e| e.attributes.get(name).cloned())
    }

    fn add_class(&self, element: ElementId, class: &str) {
        self.journal.record(format!("add-class:{class}"));
        self.with_element(element, |e| {
            if !e.classes.iter().any(|c| c == class) {
                e.classes.push(class.to_string());
            }
        });
    }

    fn remove_class(&self, element: ElementId, class: &str) {
        self.with_element(element, |e| e.classes.retain(|c| c != class));
    }

    fn set_inner_html(&self, element: ElementId, html: &str) {
        self.with_element(element, |e| e.inner_html = html.to_string());
    }

    fn parse_document(&self, html: &str) -> Option<FakeDocument> {
        parse(html)
    }

    fn replace_with(&self, element: ElementId, fragment: &FakeFragment) -> ElementId {
        let id = ElementId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.journal.record("swap");
        let mut elements = self.elements.lock().unwrap();
        if let Some(slot) = elements.iter_mut().find(|e| e.id == element) {
            *slot = FakeElement {
                id,
                selectors: vec![fragment.selector.clone()],
                attributes: fragment.attributes.clone(),
                classes: Vec::new(),
                inner_html: fragment.inner_html.clone(),
            };
        }
        id
    }

    fn set_title(&self, title: &str) {
        self.window.lock().unwrap().title = title.to_string();
    }

    fn push_state(&self, url: &Url) {
        let mut window = self.window.lock().unwrap();
        window.pushed.push(url.clone());
        window.location = Some(url.clone());
    }

    fn scroll_to_origin(&self) {
        self.window.lock().unwrap().scrolls += 1;
    }

    fn assign_location(&self, url: &Url) {
        self.journal.record(format!("assign:{}", url.path()));
        self.window.lock().unwrap().assigned.push(url.clone());
    }

    fn events(&self) -> &EventHub {
        &self.events
    }
}

// ---------------------------------------------------------------------------
// Site
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct SiteState {
    documents: Mutex<HashMap<String, Result<String, u16>>>,
    requests: Mutex<Vec<(String, RequestKind)>>,
    delay: Mutex<Option<Duration>>,
}

/// A site served from memory, keyed by URL path. Unknown paths are 404.
#[derive(Debug, Clone, Default)]
pub struct FakeFetcher {
    state: Arc<SiteState>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, path: &str, body: impl Into<String>) -> &Self {
        self.state
            .documents
            .lock()
            .unwrap()
            .insert(path.to_string(), Ok(body.into()));
        self
    }

    pub fn serve_page(&self, path: &str, title: &str, page_id: &str) -> &Self {
        self.serve(path, page_html(title, page_id, &format!("content of {path}")))
    }

    pub fn fail(&self, path: &str, status: u16) -> &Self {
        self.state
            .documents
            .lock()
            .unwrap()
            .insert(path.to_string(), Err(status));
        self
    }

    /// Delay every response, for overlapping-request tests.
    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = Some(delay);
    }

    pub fn requests(&self) -> Vec<(String, RequestKind)> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, kind: RequestKind) -> usize {
        self.requests().iter().filter(|(_, k)| *k == kind).count()
    }
}

impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &Url, kind: RequestKind) -> Result<String, FetchError> {
        self.state
            .requests
            .lock()
            .unwrap()
            .push((url.path().to_string(), kind));

        let delay = *self.state.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.state.documents.lock().unwrap().get(url.path()).cloned();
        match response {
            Some(Ok(body)) if body.is_empty() => Err(FetchError::EmptyBody),
            Some(Ok(body)) => Ok(body),
            Some(Err(status)) => Err(FetchError::Status(status)),
            None => Err(FetchError::Status(404)),
        }
    }
}

// ---------------------------------------------------------------------------
// Script host
// ---------------------------------------------------------------------------

/// Records injections and removals in a journal; configured URLs fail.
///
/// Injected tags stay "in the head" even when they fail to load, as a
/// browser leaves an errored `<script>` node in place.
#[derive(Debug, Default)]
pub struct FakeScriptHost {
    journal: Journal,
    tags: Mutex<Vec<ScriptTag>>,
    failing: Mutex<HashSet<String>>,
    injections: AtomicUsize,
    delay: Option<Duration>,
}

impl FakeScriptHost {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fail(&self, src: &str) {
        self.failing.lock().unwrap().insert(src.to_string());
    }

    pub fn injections(&self) -> usize {
        self.injections.load(Ordering::SeqCst)
    }

    /// Sources of the tags still in the head, in injection order.
    pub fn in_head(&self) -> Vec<String> {
        self.tags.lock().unwrap().iter().map(|tag| tag.src.clone()).collect()
    }
}

impl ScriptHost for FakeScriptHost {
    async fn inject(&self, tag: &ScriptTag) -> Result<(), ScriptLoadError> {
        self.injections.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.tags.lock().unwrap().push(tag.clone());
        if self.failing.lock().unwrap().contains(&tag.src) {
            self.journal.record(format!("error:{}", tag.src));
            return Err(ScriptLoadError::new(&tag.src, "onerror"));
        }
        self.journal.record(format!("inject:{}", tag.src));
        Ok(())
    }

    fn remove_page_scripts(&self, urls: &HashSet<String>) -> usize {
        let mut tags = self.tags.lock().unwrap();
        let (mut removed, kept): (Vec<_>, Vec<_>) = tags
            .drain(..)
            .partition(|tag| tag.page_exclusive && urls.contains(&tag.src));
        *tags = kept;

        removed.sort_by(|a, b| a.src.cmp(&b.src));
        for tag in &removed {
            self.journal.record(format!("remove:{}", tag.src));
        }
        removed.len()
    }
}
