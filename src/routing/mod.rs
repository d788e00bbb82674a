//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Click / popstate (dom::EventHub or host listener)
//!     → intercept.rs (eligibility: modifiers, target, scheme, origin)
//!     → router.rs (busy check, before hook)
//!     → transition.rs (leave: transitionend or duration + 80ms)
//!     → net::Fetcher (destination document)
//!     → router.rs (swap region, title, history, scroll)
//!     → transition.rs (enter) ‖ after hook
//!     → hook: matcher.rs (re-highlight nav) + scripts (page load)
//! ```
//!
//! # Design Decisions
//! - One navigation at a time; extra requests are dropped
//! - Any failure to build a valid new view becomes a full page load
//! - Matching is pure and deterministic: same input, same active link

pub mod intercept;
pub mod matcher;
pub mod router;
pub mod transition;

pub use intercept::should_handle_link;
pub use matcher::{best_match, mark_active_nav_link, match_score, normalize_path};
pub use router::{
    HistoryMode, HookError, NavigationError, NavigationHooks, NavigationOutcome, NavigationRouter, NavigationState,
    NoopHooks,
};
pub use transition::TransitionOutcome;
