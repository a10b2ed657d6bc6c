//! State scope resolution.
//!
//! The same action vocabulary (`setState`/`getState`/`toggleState`/
//! `clearState`) serves widget-local counters, page-section filters, and
//! app-wide flags. The scope prefix on the key is the engine's only
//! namespacing mechanism, and every handler that touches state routes
//! through this module so the prefix convention is applied consistently.

use serde_json::{Map, Value};

use crate::context::ActionExecutionContext;

/// Reserved prefix selecting the global state tier.
pub const GLOBAL_PREFIX: &str = "GLOBAL.";
/// Reserved prefix selecting the content-level state tier.
pub const CONTENT_PREFIX: &str = "CONTENT.";

/// The tier a state read/write targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateScope {
    /// Process-wide state on the global host.
    Global,
    /// Content-area state on the content host.
    Content,
    /// A single component's store.
    Component(String),
}

/// Decide which tier a key targets and strip its scope prefix.
///
/// Policy, in priority order:
/// 1. `GLOBAL.` prefix → global tier, prefix stripped.
/// 2. `CONTENT.` prefix → content tier, prefix stripped.
/// 3. A supplied component id → that component's store.
/// 4. Otherwise → global tier.
pub fn resolve_scope<'k>(key: &'k str, component_id: Option<&str>) -> (StateScope, &'k str) {
    if let Some(stripped) = key.strip_prefix(GLOBAL_PREFIX) {
        (StateScope::Global, stripped)
    } else if let Some(stripped) = key.strip_prefix(CONTENT_PREFIX) {
        (StateScope::Content, stripped)
    } else if let Some(id) = component_id {
        (StateScope::Component(id.to_owned()), key)
    } else {
        (StateScope::Global, key)
    }
}

/// Read a value from the tier the key resolves to.
pub fn get(ctx: &ActionExecutionContext, key: &str, component_id: Option<&str>) -> Option<Value> {
    match resolve_scope(key, component_id) {
        (StateScope::Global, k) => ctx.global.get_state(k),
        (StateScope::Content, k) => ctx.content.get_state(k),
        (StateScope::Component(id), k) => ctx.content.component_store(&id).get_state(k),
    }
}

/// Write a value to the tier the key resolves to.
pub fn set(ctx: &ActionExecutionContext, key: &str, value: Value, component_id: Option<&str>) {
    match resolve_scope(key, component_id) {
        (StateScope::Global, k) => ctx.global.set_state(k, value),
        (StateScope::Content, k) => ctx.content.set_state(k, value),
        (StateScope::Component(id), k) => ctx.content.component_store(&id).set_state(k, value),
    }
}

/// Remove a value from the tier the key resolves to.
pub fn remove(
    ctx: &ActionExecutionContext,
    key: &str,
    component_id: Option<&str>,
) -> Option<Value> {
    match resolve_scope(key, component_id) {
        (StateScope::Global, k) => ctx.global.remove_state(k),
        (StateScope::Content, k) => ctx.content.remove_state(k),
        (StateScope::Component(id), k) => ctx.content.component_store(&id).remove_state(k),
    }
}

/// Flip a boolean value in place; anything that is not `true` (including a
/// missing key) toggles to `true`. Returns the new value.
pub fn toggle(ctx: &ActionExecutionContext, key: &str, component_id: Option<&str>) -> bool {
    let current = get(ctx, key, component_id)
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let next = !current;
    set(ctx, key, Value::Bool(next), component_id);
    next
}

/// Merged snapshot of global ∪ content state, content taking precedence.
///
/// Used as the ambient fallback when resolving URL slugs and visibility
/// contexts.
pub fn combined_state(ctx: &ActionExecutionContext) -> Map<String, Value> {
    let mut merged = ctx.global.get_all_state();
    for (k, v) in ctx.content.get_all_state() {
        merged.insert(k, v);
    }
    merged
}
