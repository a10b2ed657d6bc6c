//! In-memory reference hosts.
//!
//! Fully functional, process-local implementations of the host port
//! traits. The engine's integration tests run against these, and they
//! double as a reference for host authors wiring real stores, routers, and
//! transports into the port traits.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};

use crate::context::{
    ApiDelegate, ApiRequest, AuthHost, ComponentStateStore, ContentHost, FieldError, FormHost,
    GlobalHost, StorageHost, ToastHost, ToastTone,
};
use crate::error::ActionError;

/// In-memory global host with all optional capabilities present.
///
/// Network calls are answered from a configurable canned response and
/// recorded for assertion; navigation targets and toasts are recorded the
/// same way.
pub struct MemoryGlobalHost {
    state: RwLock<Map<String, Value>>,
    storage: MemoryStorage,
    toasts: MemoryToaster,
    auth: MemoryAuth,
    navigations: Mutex<Vec<String>>,
    api_calls: Mutex<Vec<ApiRequest>>,
    api_response: RwLock<Result<Value, String>>,
    with_capabilities: bool,
}

impl MemoryGlobalHost {
    /// Host with storage, toast, and auth capabilities attached.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Map::new()),
            storage: MemoryStorage::default(),
            toasts: MemoryToaster::default(),
            auth: MemoryAuth::default(),
            navigations: Mutex::new(Vec::new()),
            api_calls: Mutex::new(Vec::new()),
            api_response: RwLock::new(Ok(Value::Null)),
            with_capabilities: true,
        }
    }

    /// Host exposing only the unconditional capabilities — storage, toast,
    /// and auth report as absent. Used to exercise capability failures.
    pub fn bare() -> Self {
        Self {
            with_capabilities: false,
            ..Self::new()
        }
    }

    /// Set the payload returned by subsequent API calls.
    pub fn respond_with(&self, payload: Value) {
        *self.api_response.write() = Ok(payload);
    }

    /// Make subsequent API calls fail with the given message.
    pub fn fail_api_with(&self, message: impl Into<String>) {
        *self.api_response.write() = Err(message.into());
    }

    /// Make subsequent logins fail with the given message.
    pub fn deny_logins(&self, reason: impl Into<String>) {
        *self.auth.deny.write() = Some(reason.into());
    }

    /// Navigation targets observed so far.
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().clone()
    }

    /// API requests observed so far.
    pub fn api_calls(&self) -> Vec<ApiRequest> {
        self.api_calls.lock().clone()
    }

    /// Toasts observed so far.
    pub fn toasts(&self) -> Vec<(String, ToastTone)> {
        self.toasts.shown.lock().clone()
    }

    /// Direct access to the storage backing, for assertions.
    pub fn storage_items(&self) -> HashMap<String, Value> {
        self.storage.items.read().clone()
    }
}

impl Default for MemoryGlobalHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GlobalHost for MemoryGlobalHost {
    fn get_state(&self, key: &str) -> Option<Value> {
        self.state.read().get(key).cloned()
    }

    fn set_state(&self, key: &str, value: Value) {
        self.state.write().insert(key.to_owned(), value);
    }

    fn remove_state(&self, key: &str) -> Option<Value> {
        self.state.write().remove(key)
    }

    fn get_all_state(&self) -> Map<String, Value> {
        self.state.read().clone()
    }

    fn navigate(&self, target: &str) {
        self.navigations.lock().push(target.to_owned());
    }

    async fn make_api_call(&self, request: ApiRequest) -> Result<Value, ActionError> {
        self.api_calls.lock().push(request);
        self.api_response
            .read()
            .clone()
            .map_err(ActionError::host)
    }

    fn storage(&self) -> Option<&dyn StorageHost> {
        if self.with_capabilities {
            Some(&self.storage)
        } else {
            None
        }
    }

    fn toaster(&self) -> Option<&dyn ToastHost> {
        if self.with_capabilities {
            Some(&self.toasts)
        } else {
            None
        }
    }

    fn auth(&self) -> Option<&dyn AuthHost> {
        if self.with_capabilities {
            Some(&self.auth)
        } else {
            None
        }
    }
}

/// In-memory persistent storage.
#[derive(Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, Value>>,
}

impl StorageHost for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<Value> {
        self.items.read().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: Value) {
        self.items.write().insert(key.to_owned(), value);
    }

    fn remove_item(&self, key: &str) -> Option<Value> {
        self.items.write().remove(key)
    }
}

/// Toast recorder.
#[derive(Default)]
pub struct MemoryToaster {
    shown: Mutex<Vec<(String, ToastTone)>>,
}

impl ToastHost for MemoryToaster {
    fn show(&self, message: &str, tone: ToastTone) {
        self.shown.lock().push((message.to_owned(), tone));
    }
}

/// Auth stub: any credentials succeed unless `deny` is set; the login
/// payload echoes the credentials under `user` plus a fixed token.
#[derive(Default)]
pub struct MemoryAuth {
    /// When set, logins fail with this message.
    pub deny: RwLock<Option<String>>,
}

#[async_trait]
impl AuthHost for MemoryAuth {
    async fn login(&self, credentials: Value) -> Result<Value, ActionError> {
        if let Some(reason) = self.deny.read().clone() {
            return Err(ActionError::host(reason));
        }
        Ok(serde_json::json!({"token": "test-token", "user": credentials}))
    }

    async fn logout(&self) -> Result<(), ActionError> {
        Ok(())
    }
}

/// In-memory content host with lazily created component stores.
pub struct MemoryContentHost {
    state: RwLock<Map<String, Value>>,
    stores: RwLock<HashMap<String, Arc<ComponentStateStore>>>,
    overrides: RwLock<HashMap<String, Arc<dyn ApiDelegate>>>,
}

impl MemoryContentHost {
    /// Empty content host.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Map::new()),
            stores: RwLock::new(HashMap::new()),
            overrides: RwLock::new(HashMap::new()),
        }
    }

    /// Install a component-scoped API delegate.
    pub fn set_api_override(&self, component_id: impl Into<String>, delegate: Arc<dyn ApiDelegate>) {
        self.overrides.write().insert(component_id.into(), delegate);
    }
}

impl Default for MemoryContentHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentHost for MemoryContentHost {
    fn component_store(&self, component_id: &str) -> Arc<ComponentStateStore> {
        if let Some(store) = self.stores.read().get(component_id) {
            return store.clone();
        }
        self.stores
            .write()
            .entry(component_id.to_owned())
            .or_insert_with(|| Arc::new(ComponentStateStore::new(component_id)))
            .clone()
    }

    fn get_state(&self, key: &str) -> Option<Value> {
        self.state.read().get(key).cloned()
    }

    fn set_state(&self, key: &str, value: Value) {
        self.state.write().insert(key.to_owned(), value);
    }

    fn remove_state(&self, key: &str) -> Option<Value> {
        self.state.write().remove(key)
    }

    fn get_all_state(&self) -> Map<String, Value> {
        self.state.read().clone()
    }

    fn api_override(&self, component_id: &str) -> Option<Arc<dyn ApiDelegate>> {
        self.overrides.read().get(component_id).cloned()
    }
}

/// In-memory form host with a trivial required-fields validator.
pub struct MemoryFormHost {
    data: RwLock<Map<String, Value>>,
    initial: Map<String, Value>,
    required: Vec<String>,
    errors: RwLock<Vec<FieldError>>,
    submissions: Mutex<Vec<Map<String, Value>>>,
}

impl MemoryFormHost {
    /// Form host seeded with initial data.
    pub fn new(initial: Map<String, Value>) -> Self {
        Self {
            data: RwLock::new(initial.clone()),
            initial,
            required: Vec::new(),
            errors: RwLock::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Declare fields that must be present and non-null for validation.
    pub fn with_required(mut self, fields: impl IntoIterator<Item = &'static str>) -> Self {
        self.required = fields.into_iter().map(str::to_owned).collect();
        self
    }

    /// Form payloads submitted so far.
    pub fn submissions(&self) -> Vec<Map<String, Value>> {
        self.submissions.lock().clone()
    }
}

#[async_trait]
impl FormHost for MemoryFormHost {
    fn form_data(&self) -> Map<String, Value> {
        self.data.read().clone()
    }

    fn set_form_data(&self, data: Map<String, Value>) {
        self.data.write().extend(data);
    }

    fn get_field(&self, field: &str) -> Option<Value> {
        self.data.read().get(field).cloned()
    }

    fn set_field(&self, field: &str, value: Value) {
        self.data.write().insert(field.to_owned(), value);
    }

    fn validate(&self) -> bool {
        let data = self.data.read();
        let mut errors = Vec::new();
        for field in &self.required {
            let missing = matches!(data.get(field), None | Some(Value::Null));
            if missing {
                errors.push(FieldError {
                    field: field.clone(),
                    message: format!("{field} is required"),
                });
            }
        }
        let ok = errors.is_empty();
        *self.errors.write() = errors;
        ok
    }

    fn errors(&self) -> Vec<FieldError> {
        self.errors.read().clone()
    }

    fn reset(&self) {
        *self.data.write() = self.initial.clone();
        self.errors.write().clear();
    }

    async fn submit(&self) -> Result<Value, ActionError> {
        let data = self.data.read().clone();
        self.submissions.lock().push(data.clone());
        Ok(Value::Object(data))
    }
}
