//! Execution context and host capability port traits.
//!
//! The engine owns no persistent resources. State stores, navigation,
//! network, storage, toasts, and form lifecycle are all borrowed from the
//! host through the traits here, bundled into an
//! [`ActionExecutionContext`] that is threaded through every dispatch.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ActionError;
use crate::result::ActionResult;

/// Visual tone of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastTone {
    /// Neutral informational message.
    #[default]
    Info,
    /// Positive confirmation.
    Success,
    /// Failure feedback.
    Error,
}

/// A network request delegated to the host.
///
/// The engine defines no transport of its own; this is the structural
/// contract handed to [`GlobalHost::make_api_call`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    /// Target URL, with `:param` slugs already resolved.
    pub url: String,
    /// HTTP method name (`GET`, `POST`, ...).
    pub method: String,
    /// Optional request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Component-scoped API delegate, used to override the global network
/// function for a single component (e.g. a table with its own data source).
#[async_trait]
pub trait ApiDelegate: Send + Sync {
    /// Perform the request and return the response payload.
    async fn call(&self, request: ApiRequest) -> Result<Value, ActionError>;
}

/// Persistent key/value storage capability (e.g. browser local storage).
pub trait StorageHost: Send + Sync {
    /// Read a stored value.
    fn get_item(&self, key: &str) -> Option<Value>;
    /// Write a value.
    fn set_item(&self, key: &str, value: Value);
    /// Remove a value, returning the previous one if present.
    fn remove_item(&self, key: &str) -> Option<Value>;
}

/// Toast notification capability.
pub trait ToastHost: Send + Sync {
    /// Display a toast to the user.
    fn show(&self, message: &str, tone: ToastTone);
}

/// Authentication capability: session establishment and teardown.
#[async_trait]
pub trait AuthHost: Send + Sync {
    /// Attempt a login with handler-supplied credentials; the returned
    /// payload (token, user record) feeds downstream chains.
    async fn login(&self, credentials: Value) -> Result<Value, ActionError>;
    /// Tear down the current session.
    async fn logout(&self) -> Result<(), ActionError>;
}

/// Process-wide host capabilities.
///
/// `get_state`/`set_state`/`remove_state`/`get_all_state`, `navigate`, and
/// `make_api_call` are unconditional; storage, toast, and auth are optional
/// and surfaced as `Option`-returning accessors. Handlers that need an
/// absent optional capability fail with a descriptive
/// [`ActionError::CapabilityMissing`] rather than silently degrading.
#[async_trait]
pub trait GlobalHost: Send + Sync {
    /// Read a global state value.
    fn get_state(&self, key: &str) -> Option<Value>;
    /// Write a global state value.
    fn set_state(&self, key: &str, value: Value);
    /// Remove a global state value, returning the previous one.
    fn remove_state(&self, key: &str) -> Option<Value>;
    /// Snapshot of the entire global state.
    fn get_all_state(&self) -> Map<String, Value>;

    /// Navigate the UI to a route.
    fn navigate(&self, target: &str);

    /// Perform a network call on behalf of an action.
    async fn make_api_call(&self, request: ApiRequest) -> Result<Value, ActionError>;

    /// Persistent storage, when the host provides it.
    fn storage(&self) -> Option<&dyn StorageHost> {
        None
    }

    /// Toast notifications, when the host provides them.
    fn toaster(&self) -> Option<&dyn ToastHost> {
        None
    }

    /// Authentication, when the host provides it.
    fn auth(&self) -> Option<&dyn AuthHost> {
        None
    }
}

/// Content-area host capabilities.
///
/// The only unconditional obligation is the per-component state store
/// factory; content-level state accessors and the component API override
/// are optional.
pub trait ContentHost: Send + Sync {
    /// Fetch (or lazily create) the state store for a component id.
    fn component_store(&self, component_id: &str) -> Arc<ComponentStateStore>;

    /// Read a content-level state value.
    fn get_state(&self, _key: &str) -> Option<Value> {
        None
    }
    /// Write a content-level state value.
    fn set_state(&self, _key: &str, _value: Value) {}
    /// Remove a content-level state value.
    fn remove_state(&self, _key: &str) -> Option<Value> {
        None
    }
    /// Snapshot of the content-level state.
    fn get_all_state(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Component-scoped API delegate, when one is configured.
    fn api_override(&self, _component_id: &str) -> Option<Arc<dyn ApiDelegate>> {
        None
    }
}

/// A validation error for a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The field the error belongs to.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

/// Form-lifecycle host capabilities.
///
/// Present only when an action executes inside a form; its absence makes
/// every form-family handler fail with
/// [`ActionError::FormContextMissing`].
#[async_trait]
pub trait FormHost: Send + Sync {
    /// Snapshot of the current form data.
    fn form_data(&self) -> Map<String, Value>;
    /// Replace (merge) the form data wholesale.
    fn set_form_data(&self, data: Map<String, Value>);
    /// Read a single field.
    fn get_field(&self, field: &str) -> Option<Value>;
    /// Write a single field.
    fn set_field(&self, field: &str, value: Value);
    /// Run validation; `true` when the form is valid.
    fn validate(&self) -> bool;
    /// Collected validation errors from the last [`validate`](Self::validate).
    fn errors(&self) -> Vec<FieldError>;
    /// Reset the form to its initial data and clear errors.
    fn reset(&self);
    /// Submit the form; the payload feeds downstream chains.
    async fn submit(&self) -> Result<Value, ActionError>;
}

/// Per-component state store, one instance per live component identifier.
///
/// Created lazily by the content host; its lifetime (and destruction on
/// unmount) is owned by the host, not the engine.
pub struct ComponentStateStore {
    component_id: String,
    state: RwLock<Map<String, Value>>,
}

impl ComponentStateStore {
    /// Empty store for a component id.
    pub fn new(component_id: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
            state: RwLock::new(Map::new()),
        }
    }

    /// The owning component's identifier.
    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    /// Read a value.
    pub fn get_state(&self, key: &str) -> Option<Value> {
        self.state.read().get(key).cloned()
    }

    /// Write a value, overwriting any existing entry.
    pub fn set_state(&self, key: &str, value: Value) {
        self.state.write().insert(key.to_owned(), value);
    }

    /// Remove a value, returning the previous one.
    pub fn remove_state(&self, key: &str) -> Option<Value> {
        self.state.write().remove(key)
    }

    /// Snapshot of the full component state.
    pub fn get_all_state(&self) -> Map<String, Value> {
        self.state.read().clone()
    }
}

impl fmt::Debug for ComponentStateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentStateStore")
            .field("component_id", &self.component_id)
            .field("keys", &self.state.read().keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The bundle of host capabilities threaded through every dispatch.
///
/// Constructed per invocation site (typically once per rendering root).
/// Cloning is cheap and shares the chain-context cell, so nested
/// dispatches observe results published by their ancestors.
#[derive(Clone)]
pub struct ActionExecutionContext {
    /// Process-wide capabilities.
    pub global: Arc<dyn GlobalHost>,
    /// Content-area capabilities.
    pub content: Arc<dyn ContentHost>,
    /// Form-lifecycle capabilities, when dispatching inside a form.
    pub form: Option<Arc<dyn FormHost>>,
    /// The component that triggered the dispatch, if any.
    pub component_id: Option<String>,
    /// Most recently completed action in the current chain evaluation.
    chain_context: Arc<RwLock<Option<ActionResult>>>,
}

impl ActionExecutionContext {
    /// Context over global and content hosts, with no form and no
    /// component binding.
    pub fn new(global: Arc<dyn GlobalHost>, content: Arc<dyn ContentHost>) -> Self {
        Self {
            global,
            content,
            form: None,
            component_id: None,
            chain_context: Arc::new(RwLock::new(None)),
        }
    }

    /// Attach a form host.
    pub fn with_form(mut self, form: Arc<dyn FormHost>) -> Self {
        self.form = Some(form);
        self
    }

    /// Bind the dispatch to a component id.
    pub fn with_component(mut self, component_id: impl Into<String>) -> Self {
        self.component_id = Some(component_id.into());
        self
    }

    /// Snapshot of the most recently completed action's envelope.
    pub fn chain_context(&self) -> Option<ActionResult> {
        self.chain_context.read().clone()
    }

    /// Publish a just-completed action's envelope for nested evaluations.
    pub fn publish_chain_context(&self, result: &ActionResult) {
        *self.chain_context.write() = Some(result.clone());
    }
}

impl fmt::Debug for ActionExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionExecutionContext")
            .field("component_id", &self.component_id)
            .field("has_form", &self.form.is_some())
            .field("has_chain_context", &self.chain_context.read().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryContentHost, MemoryGlobalHost};
    use serde_json::json;

    fn test_context() -> ActionExecutionContext {
        ActionExecutionContext::new(
            Arc::new(MemoryGlobalHost::new()),
            Arc::new(MemoryContentHost::new()),
        )
    }

    #[test]
    fn component_store_get_set_remove() {
        let store = ComponentStateStore::new("widget-1");
        assert_eq!(store.component_id(), "widget-1");
        assert!(store.get_state("count").is_none());

        store.set_state("count", json!(1));
        assert_eq!(store.get_state("count"), Some(json!(1)));

        assert_eq!(store.remove_state("count"), Some(json!(1)));
        assert!(store.get_state("count").is_none());
    }

    #[test]
    fn component_store_snapshot() {
        let store = ComponentStateStore::new("w");
        store.set_state("a", json!(1));
        store.set_state("b", json!(2));
        let all = store.get_all_state();
        assert_eq!(all.len(), 2);
        assert_eq!(all.get("a"), Some(&json!(1)));
    }

    #[test]
    fn chain_context_starts_empty() {
        let ctx = test_context();
        assert!(ctx.chain_context().is_none());
    }

    #[test]
    fn published_chain_context_is_shared_across_clones() {
        let ctx = test_context();
        let clone = ctx.clone();
        ctx.publish_chain_context(&ActionResult::success(json!({"id": 7})));

        let seen = clone.chain_context().unwrap();
        assert_eq!(seen.result, Some(json!({"id": 7})));
    }

    #[test]
    fn with_component_binds_id() {
        let ctx = test_context().with_component("grid");
        assert_eq!(ctx.component_id.as_deref(), Some("grid"));
    }

    #[test]
    fn debug_format() {
        let ctx = test_context();
        let debug = format!("{ctx:?}");
        assert!(debug.contains("ActionExecutionContext"));
        assert!(debug.contains("has_form: false"));
    }
}
