//! The live page (document + window) as seen by the engine.

use url::Url;

use crate::dom::document::ParsedDocument;
use crate::dom::events::EventHub;

/// Opaque handle to an element of the live document.
///
/// Handles are issued by the host; a replaced element gets a new handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// Fragment type produced by a page's document parser.
pub type FragmentOf<P> = <<P as Page>::Document as ParsedDocument>::Fragment;

/// Host page abstraction.
///
/// Every method is synchronous, mirroring the DOM. The only asynchronous
/// signals (clicks, history traversal, transition end) arrive through
/// [`Page::events`].
pub trait Page {
    /// Document produced by parsing a fetched HTML string.
    type Document: ParsedDocument;

    /// Current `window.location.href`.
    fn location(&self) -> Url;

    /// First element matching `selector`.
    fn query(&self, selector: &str) -> Option<ElementId>;

    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// Attribute value of an element.
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn add_class(&self, element: ElementId, class: &str);

    fn remove_class(&self, element: ElementId, class: &str);

    /// Force style recalculation so a class added next starts a transition.
    fn force_reflow(&self, _element: ElementId) {}

    /// Replace the children of `element` with parsed `html`.
    fn set_inner_html(&self, element: ElementId, html: &str);

    /// Parse an HTML string into a detached document.
    fn parse_document(&self, html: &str) -> Option<Self::Document>;

    /// Import `fragment` into the live document in place of `element`.
    /// Returns the handle of the inserted element.
    fn replace_with(&self, element: ElementId, fragment: &FragmentOf<Self>) -> ElementId;

    fn set_title(&self, title: &str);

    /// Append a history entry for `url` (`history.pushState`).
    fn push_state(&self, url: &Url);

    /// Scroll the viewport to the top-left origin.
    fn scroll_to_origin(&self);

    /// Full browser navigation (`location.href = url`).
    fn assign_location(&self, url: &Url);

    /// Event source for clicks, popstate and transition end.
    fn events(&self) -> &EventHub;
}
