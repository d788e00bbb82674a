//! Shared layout fragments (header, footer).

use thiserror::Error;

use crate::config::{LayoutConfig, PartialConfig};
use crate::dom::{ElementId, Page};
use crate::net::{FetchError, Fetcher, RequestKind};

/// A layout fragment could not be injected.
#[derive(Debug, Error)]
pub enum PartialLoadError {
    #[error("partial url {url:?} is invalid: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("partial {url} could not be loaded: {source}")]
    Fetch { url: String, source: FetchError },
}

/// Fetch `url` and write it into the element matching `selector`.
///
/// Returns the element, or `None` when it is absent or the fetch failed.
/// Failures are logged; the page continues without the fragment.
pub async fn inject_partial<P, F>(page: &P, fetcher: &F, selector: &str, url: &str) -> Option<ElementId>
where
    P: Page,
    F: Fetcher,
{
    let Some(element) = page.query(selector) else {
        tracing::debug!(selector, "Partial target not in page");
        return None;
    };

    match fetch_partial(page, fetcher, url).await {
        Ok(html) => {
            page.set_inner_html(element, &html);
            tracing::debug!(selector, url, "Partial injected");
            Some(element)
        }
        Err(err) => {
            tracing::error!(selector, error = %err, "Partial injection skipped");
            None
        }
    }
}

async fn fetch_partial<P: Page, F: Fetcher>(page: &P, fetcher: &F, url: &str) -> Result<String, PartialLoadError> {
    let resolved = page
        .location()
        .join(url)
        .map_err(|source| PartialLoadError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

    fetcher
        .fetch(&resolved, RequestKind::Partial)
        .await
        .map_err(|source| PartialLoadError::Fetch {
            url: resolved.to_string(),
            source,
        })
}

async fn inject_optional<P: Page, F: Fetcher>(page: &P, fetcher: &F, partial: Option<&PartialConfig>) -> Option<ElementId> {
    let partial = partial?;
    inject_partial(page, fetcher, &partial.selector, &partial.url).await
}

/// Inject the configured header and footer concurrently.
pub async fn inject_layout<P, F>(page: &P, fetcher: &F, layout: &LayoutConfig) -> (Option<ElementId>, Option<ElementId>)
where
    P: Page,
    F: Fetcher,
{
    tokio::join!(
        inject_optional(page, fetcher, layout.header.as_ref()),
        inject_optional(page, fetcher, layout.footer.as_ref()),
    )
}
