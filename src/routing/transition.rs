//! CSS-class-driven transitions around the content swap.
//!
//! Each wait races the region's `transitionend` against a fallback timer of
//! `duration + 80ms`. The race is a single `select!`, so exactly one branch
//! completes, and the listener is dropped with the subscription.

use std::time::Duration;

use crate::config::TransitionConfig;
use crate::dom::{ElementId, Page, Subscription};

/// How a transition wait finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The element reported `transitionend`.
    Ended,
    /// The fallback timer fired first.
    TimedOut,
}

/// Wait for `element`'s `transitionend` or `timeout`, whichever comes first.
pub async fn wait_for_transition(
    subscription: &mut Subscription,
    element: ElementId,
    timeout: Duration,
) -> TransitionOutcome {
    tokio::select! {
        _ = subscription.transition_end(element) => TransitionOutcome::Ended,
        _ = tokio::time::sleep(timeout) => TransitionOutcome::TimedOut,
    }
}

/// Apply the leaving state to `region` and wait for it to settle.
pub async fn leave<P: Page>(page: &P, region: ElementId, config: &TransitionConfig) -> TransitionOutcome {
    // Subscribe first so an immediate transitionend is not missed.
    let mut subscription = page.events().subscribe();

    page.add_class(region, &config.leave_class);
    page.force_reflow(region);
    page.add_class(region, &config.leave_active_class);

    let outcome = wait_for_transition(&mut subscription, region, config.fallback_timeout()).await;
    tracing::trace!(?outcome, "Leave transition settled");
    outcome
}

/// Apply the entering state to a freshly swapped `region`, then clear it.
pub async fn enter<P: Page>(page: &P, region: ElementId, config: &TransitionConfig) -> TransitionOutcome {
    let mut subscription = page.events().subscribe();

    page.add_class(region, &config.enter_class);
    page.force_reflow(region);
    page.add_class(region, &config.enter_active_class);

    let outcome = wait_for_transition(&mut subscription, region, config.fallback_timeout()).await;
    page.remove_class(region, &config.enter_class);
    page.remove_class(region, &config.enter_active_class);
    tracing::trace!(?outcome, "Enter transition settled");
    outcome
}
