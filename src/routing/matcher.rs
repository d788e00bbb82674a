//! Active navigation link matching.
//!
//! # Responsibilities
//! - Normalize paths (query, fragment, `index.html`, trailing slash)
//! - Score a link path against the current path
//! - Highlight the single best navigation anchor
//!
//! # Design Decisions
//! - Pure functions; the only side effect is in `mark_active_nav_link`
//! - Prefix matches must end on a segment boundary (`/blog` ≠ `/blogger`)
//! - Longer matches win; ties go to the first link in document order
//! - Root link only matches the root path

use url::Url;

use crate::dom::Page;

const INDEX_SUFFIXES: [&str; 2] = ["/index.html", "/index.htm"];

fn strip_suffix_ignore_case<'a>(path: &'a str, suffix: &str) -> Option<&'a str> {
    let split = path.len().checked_sub(suffix.len())?;
    if path.as_bytes()[split..].eq_ignore_ascii_case(suffix.as_bytes()) {
        // The suffix is ASCII, so `split` is a char boundary.
        Some(&path[..split])
    } else {
        None
    }
}

/// Normalize a path for comparison.
///
/// Idempotent: `normalize_path(&normalize_path(p)) == normalize_path(p)`.
pub fn normalize_path(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let mut path = &path[..end];

    loop {
        let before = path.len();
        path = path.trim_end_matches('/');
        if let Some(stripped) = INDEX_SUFFIXES
            .iter()
            .find_map(|suffix| strip_suffix_ignore_case(path, suffix))
        {
            path = stripped;
        }
        if path.len() == before {
            break;
        }
    }

    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// Score `link_path` against `current_path`. Both must be normalized.
///
/// Returns `None` for no match, otherwise a score where higher is more
/// specific.
pub fn match_score(link_path: &str, current_path: &str) -> Option<usize> {
    if link_path == "/" {
        return (current_path == "/").then_some(0);
    }

    if current_path == link_path {
        return Some(link_path.len());
    }

    let rest = current_path.strip_prefix(link_path)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(link_path.len())
    } else {
        None
    }
}

/// Index of the best matching link path, first link winning ties.
pub fn best_match<'a, I>(link_paths: I, current_path: &str) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    best_candidate(link_paths.into_iter().map(Some), current_path)
}

// Candidates without a usable path keep their index but never match.
fn best_candidate<'a, I>(candidates: I, current_path: &str) -> Option<usize>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut best: Option<(usize, usize)> = None;

    for (index, link_path) in candidates.into_iter().enumerate() {
        let Some(score) = link_path.and_then(|p| match_score(p, current_path)) else {
            continue;
        };
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    best.map(|(index, _)| index)
}

/// Normalized path of an `href` resolved against the origin of `location`.
pub fn link_path(href: &str, location: &Url) -> Option<String> {
    let mut origin = location.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    origin.join(href).ok().map(|url| normalize_path(url.path()))
}

/// Mark the anchor under `selector` that best matches the page location with
/// `active_class`, clearing it from every other anchor.
///
/// Returns the index of the active anchor among the selected ones.
pub fn mark_active_nav_link<P: Page>(page: &P, selector: &str, active_class: &str) -> Option<usize> {
    let location = page.location();
    let current_path = normalize_path(location.path());
    let links = page.query_all(selector);

    let paths: Vec<Option<String>> = links
        .iter()
        .map(|&link| {
            page.attribute(link, "href")
                .filter(|href| !href.is_empty())
                .and_then(|href| link_path(&href, &location))
        })
        .collect();

    let active = best_candidate(paths.iter().map(Option::as_deref), &current_path);

    for (index, &link) in links.iter().enumerate() {
        if Some(index) == active {
            page.add_class(link, active_class);
        } else {
            page.remove_class(link, active_class);
        }
    }

    tracing::trace!(
        path = %current_path,
        candidates = links.len(),
        active = ?active,
        "Navigation highlight updated"
    );

    active
}
