//! Host abstraction subsystem.
//!
//! # Data Flow
//! ```text
//! Browser (or test double)
//!     → page.rs (Page: live document, location, history, scrolling)
//!     → document.rs (ParsedDocument: fetched HTML parsed by the host)
//!     → events.rs (EventHub: click / popstate / transitionend fan-out)
//!     → consumed by routing, layout and lifecycle
//! ```
//!
//! # Design Decisions
//! - The engine never touches a DOM directly; a wasm host implements these
//!   traits with `web-sys`, tests implement them in memory
//! - Element identity is an opaque `ElementId` issued by the host
//! - Event listeners are subscription handles, removed on drop

pub mod document;
pub mod events;
pub mod page;

pub use document::ParsedDocument;
pub use events::{Anchor, BrowserEvent, ClickEvent, EventHub, Modifiers, Subscription};
pub use page::{ElementId, FragmentOf, Page};
