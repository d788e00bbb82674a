//! Typed page callbacks looked up by qualified name.
//!
//! Configuration names callbacks with dot-separated strings such as
//! `"SystemsPage.init"`. The host registers a typed function under that
//! name at startup; resolution is a table lookup that yields `None` for a
//! malformed or unregistered name and never fails.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use thiserror::Error;

/// Failure reported by a page callback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct CallbackError(pub String);

impl CallbackError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Disposer returned by an init callback, run when the page is left.
pub type Cleanup = Box<dyn FnOnce() -> Result<(), CallbackError> + Send>;

/// Future produced by an init callback.
pub type InitFuture = BoxFuture<'static, Result<Option<Cleanup>, CallbackError>>;

/// Page init callback.
pub type InitFn = Arc<dyn Fn() -> InitFuture + Send + Sync>;

/// Page teardown callback.
pub type TeardownFn = Arc<dyn Fn() -> Result<(), CallbackError> + Send + Sync>;

/// Box a closure as a [`Cleanup`].
pub fn cleanup<F>(f: F) -> Cleanup
where
    F: FnOnce() -> Result<(), CallbackError> + Send + 'static,
{
    Box::new(f)
}

/// True for a non-empty, dot-separated sequence of identifier segments.
pub fn is_qualified_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            !segment.is_empty()
                && !segment.starts_with(|c: char| c.is_ascii_digit())
                && segment.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
}

/// Lookup table from qualified names to page callbacks.
#[derive(Clone, Default)]
pub struct CallbackRegistry {
    inits: HashMap<String, InitFn>,
    teardowns: HashMap<String, TeardownFn>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an init callback. Its output may carry a cleanup for the
    /// next transition.
    pub fn register_init<F, Fut>(&mut self, name: impl Into<String>, init: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Cleanup>, CallbackError>> + Send + 'static,
    {
        let init: InitFn = Arc::new(move || -> InitFuture { Box::pin(init()) });
        self.inits.insert(name.into(), init);
        self
    }

    pub fn register_teardown<F>(&mut self, name: impl Into<String>, teardown: F) -> &mut Self
    where
        F: Fn() -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.teardowns.insert(name.into(), Arc::new(teardown));
        self
    }

    pub fn resolve_init(&self, name: &str) -> Option<InitFn> {
        if !is_qualified_name(name) {
            return None;
        }
        self.inits.get(name).cloned()
    }

    pub fn resolve_teardown(&self, name: &str) -> Option<TeardownFn> {
        if !is_qualified_name(name) {
            return None;
        }
        self.teardowns.get(name).cloned()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut inits: Vec<_> = self.inits.keys().collect();
        let mut teardowns: Vec<_> = self.teardowns.keys().collect();
        inits.sort();
        teardowns.sort();
        f.debug_struct("CallbackRegistry")
            .field("inits", &inits)
            .field("teardowns", &teardowns)
            .finish()
    }
}
