//! Action registry and the handler trait.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::context::ActionExecutionContext;
use crate::result::ActionResult;

/// One named action's effect.
///
/// Handlers are independent, side-effecting units. Each validates its own
/// argument shape and returns a failure envelope — never a Rust error — on
/// missing/invalid arguments or an absent host capability.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Perform the effect described by `args` against the host context.
    async fn execute(&self, args: &Map<String, Value>, ctx: &ActionExecutionContext)
    -> ActionResult;
}

/// Open string-keyed table mapping action names to handlers.
///
/// Host-extensible by design: a closed enumeration is not possible because
/// hosts register their own verbs. Unknown names surface as a
/// `HandlerNotFound` failure envelope at dispatch, not an error.
///
/// Two builtin families exist with identical shape: [`ActionRegistry::page`]
/// (state, navigation, storage, toast, network, visibility, auth) and
/// [`ActionRegistry::form`] (form-lifecycle verbs bound to the form host).
#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the builtin page-level handlers.
    pub fn page() -> Self {
        let mut registry = Self::new();
        crate::handlers::register_page_builtins(&mut registry);
        registry
    }

    /// Registry pre-populated with the builtin form-lifecycle handlers.
    pub fn form() -> Self {
        let mut registry = Self::new();
        crate::handlers::register_form_builtins(&mut registry);
        registry
    }

    /// Register a handler. Overwrites any existing handler with the same name.
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn ActionHandler>) {
        self.handlers.insert(name.into(), handler);
    }

    /// Look up a handler by action name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ActionHandler>> {
        self.handlers.get(name)
    }

    /// Check whether an action name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Remove a handler by name. Returns the removed handler, if any.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.remove(name)
    }

    /// Iterate over all registered `(name, handler)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn ActionHandler>)> {
        self.handlers.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("count", &self.handlers.len())
            .field("names", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
