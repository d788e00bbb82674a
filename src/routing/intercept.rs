//! Link interception policy.
//!
//! A click is handled client-side only when every condition holds:
//! - no modifier key is held
//! - the anchor has no `target`, or `target="_self"`
//! - the `href` is present and is not a fragment, `mailto:` or `tel:` link
//! - the resolved URL has the same origin as the page
//! - the resolved URL differs from the current one, ignoring the fragment
//!
//! Anything else is left to the browser.

use url::Url;

use crate::dom::ClickEvent;

/// URL with its fragment removed.
pub fn without_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

/// True if two URLs address the same document.
pub fn same_document(a: &Url, b: &Url) -> bool {
    without_fragment(a) == without_fragment(b)
}

/// Decide whether `click` should become a client-side navigation.
///
/// Returns the resolved destination when it should.
pub fn should_handle_link(click: &ClickEvent, location: &Url) -> Option<Url> {
    let anchor = click.anchor.as_ref()?;
    let href = anchor.href.as_deref().filter(|h| !h.is_empty())?;

    if click.modifiers.any() {
        return None;
    }

    if anchor
        .target
        .as_deref()
        .is_some_and(|t| !t.is_empty() && t != "_self")
    {
        return None;
    }

    if href.starts_with('#') || href.starts_with("mailto:") || href.starts_with("tel:") {
        return None;
    }

    let url = location.join(href).ok()?;
    if url.origin() != location.origin() {
        return None;
    }

    if same_document(&url, location) {
        return None;
    }

    Some(url)
}
