//! Browser event delivery with explicit subscription handles.
//!
//! # Responsibilities
//! - Fan out click, popstate and transition-end events to listeners
//! - Hand each listener a [`Subscription`] that unsubscribes on drop
//!
//! # Design Decisions
//! - Each emitted event reaches each live subscriber exactly once
//! - Unsubscribing is deterministic: dropping the handle removes the
//!   listener before the next `emit`
//! - Unbounded channels: emitters are DOM callbacks and must never block

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc;

use crate::dom::page::ElementId;

/// Keyboard modifiers held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// True if any modifier is held.
    pub fn any(&self) -> bool {
        self.meta || self.ctrl || self.shift || self.alt
    }
}

/// The anchor closest to a click target, as the host found it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    /// Raw `href` attribute.
    pub href: Option<String>,
    /// Raw `target` attribute.
    pub target: Option<String>,
}

impl Anchor {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            target: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// A click on the document.
#[derive(Debug, Clone, Default)]
pub struct ClickEvent {
    /// Closest anchor matching `RouterConfig::link_selector`, if any.
    pub anchor: Option<Anchor>,
    pub modifiers: Modifiers,
    default_prevented: Arc<AtomicBool>,
}

impl ClickEvent {
    /// A plain click on `anchor`.
    pub fn on(anchor: Anchor) -> Self {
        Self {
            anchor: Some(anchor),
            ..Self::default()
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Suppress the browser's default navigation for this click.
    pub fn prevent_default(&self) {
        self.default_prevented.store(true, Ordering::SeqCst);
    }

    /// Shared across clones, so the emitter can observe the router's decision.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::SeqCst)
    }
}

/// Events the router and transitions listen to.
#[derive(Debug, Clone)]
pub enum BrowserEvent {
    Click(ClickEvent),
    PopState,
    TransitionEnd { target: ElementId },
}

type Listeners = HashMap<u64, mpsc::UnboundedSender<BrowserEvent>>;

#[derive(Debug, Default)]
struct HubInner {
    next_id: u64,
    listeners: Listeners,
}

fn lock(inner: &Mutex<HubInner>) -> MutexGuard<'_, HubInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Event source owned by the host page.
#[derive(Debug, Default)]
pub struct EventHub {
    inner: Arc<Mutex<HubInner>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, tx);

        Subscription {
            id,
            hub: Arc::downgrade(&self.inner),
            rx,
        }
    }

    /// Deliver `event` to every live subscriber. Returns the number reached.
    pub fn emit(&self, event: BrowserEvent) -> usize {
        let mut inner = lock(&self.inner);
        inner.listeners.retain(|_, tx| !tx.is_closed());
        inner
            .listeners
            .values()
            .filter(|tx| tx.send(event.clone()).is_ok())
            .count()
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }
}

/// A registered listener. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    hub: Weak<Mutex<HubInner>>,
    rx: mpsc::UnboundedReceiver<BrowserEvent>,
}

impl Subscription {
    /// Next event, or `None` once the hub is gone.
    pub async fn recv(&mut self) -> Option<BrowserEvent> {
        self.rx.recv().await
    }

    /// Wait for a `transitionend` whose target is `element`, ignoring
    /// bubbled events from descendants.
    pub async fn transition_end(&mut self, element: ElementId) {
        loop {
            match self.rx.recv().await {
                Some(BrowserEvent::TransitionEnd { target }) if target == element => return,
                Some(_) => continue,
                // Hub dropped: no event can ever arrive, let the timer win.
                None => std::future::pending::<()>().await,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            lock(&hub).listeners.remove(&self.id);
        }
    }
}
