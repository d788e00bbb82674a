//! Detached documents parsed from fetched HTML.

/// A parsed destination document.
pub trait ParsedDocument {
    /// A subtree that can be imported into the live page.
    type Fragment;

    /// First subtree matching `selector`.
    fn select(&self, selector: &str) -> Option<Self::Fragment>;

    /// Text of the `<title>` element, if present.
    fn title(&self) -> Option<String>;
}
