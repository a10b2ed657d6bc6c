//! Symbolic reference resolution.
//!
//! References are plain strings with a reserved-prefix grammar, which is
//! what lets a later action's arguments use an earlier action's output
//! ("the token from the login result") or read ambient application state
//! without any closure crossing the serialization boundary.
//!
//! Prefixes, checked in order:
//!
//! | prefix | source |
//! |---|---|
//! | `GLOBAL.` | path into global state |
//! | `COMPONENT.` | path into the current component's store |
//! | `__result.` (and legacy `result.`) | path into the prior action's result |
//! | none | prior result when a chain context exists, else global state |

use serde_json::Value;

use crate::context::ActionExecutionContext;
use crate::scope::GLOBAL_PREFIX;
use trellis_expression::resolve_path;

/// Reserved prefix addressing the current component's state.
pub const COMPONENT_PREFIX: &str = "COMPONENT.";
/// Reserved prefix addressing the prior action's result payload.
pub const RESULT_PREFIX: &str = "__result.";
/// Legacy spelling of [`RESULT_PREFIX`], identical semantics. Retained:
/// existing serialized action trees still use it.
pub const LEGACY_RESULT_PREFIX: &str = "result.";
/// The bare prior-result marker, addressing the whole payload.
pub const RESULT_MARKER: &str = "__result";

/// Whether a string value carries an explicit reference marker and should
/// be resolved before use (e.g. by `setState` on string-valued args).
pub fn is_reference(value: &str) -> bool {
    value == RESULT_MARKER
        || value.starts_with(GLOBAL_PREFIX)
        || value.starts_with(COMPONENT_PREFIX)
        || value.starts_with(RESULT_PREFIX)
        || value.starts_with(LEGACY_RESULT_PREFIX)
}

/// Resolve a symbolic reference against the execution context.
///
/// Every miss — absent chain context, unknown path, missing component
/// binding — is `None`, never an error.
pub fn resolve(path: &str, ctx: &ActionExecutionContext) -> Option<Value> {
    if let Some(rest) = path.strip_prefix(GLOBAL_PREFIX) {
        return resolve_in_state(&ctx.global.get_all_state(), rest);
    }
    if let Some(rest) = path.strip_prefix(COMPONENT_PREFIX) {
        let id = ctx.component_id.as_deref()?;
        let store = ctx.content.component_store(id);
        return resolve_in_state(&store.get_all_state(), rest);
    }
    if path == RESULT_MARKER {
        return ctx.chain_context()?.result;
    }
    if let Some(rest) = path
        .strip_prefix(RESULT_PREFIX)
        .or_else(|| path.strip_prefix(LEGACY_RESULT_PREFIX))
    {
        let result = ctx.chain_context()?.result?;
        return resolve_path(&result, rest).cloned();
    }

    // No marker: prefer the prior result when one exists, else global state.
    if let Some(chain) = ctx.chain_context() {
        if let Some(result) = chain.result {
            if let Some(found) = resolve_path(&result, path) {
                return Some(found.clone());
            }
        }
    }
    resolve_in_state(&ctx.global.get_all_state(), path)
}

fn resolve_in_state(state: &serde_json::Map<String, Value>, path: &str) -> Option<Value> {
    resolve_path(&Value::Object(state.clone()), path).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryContentHost, MemoryGlobalHost};
    use crate::result::ActionResult;
    use serde_json::json;
    use std::sync::Arc;

    fn test_context() -> ActionExecutionContext {
        ActionExecutionContext::new(
            Arc::new(MemoryGlobalHost::new()),
            Arc::new(MemoryContentHost::new()),
        )
    }

    #[test]
    fn reference_detection() {
        assert!(is_reference("GLOBAL.user.name"));
        assert!(is_reference("COMPONENT.page"));
        assert!(is_reference("__result.token"));
        assert!(is_reference("__result"));
        assert!(is_reference("result.token"));
        assert!(!is_reference("plain value"));
        assert!(!is_reference("resulting"));
    }

    #[test]
    fn global_marker_reads_global_state() {
        let ctx = test_context();
        ctx.global.set_state("user", json!({"name": "alice"}));
        assert_eq!(resolve("GLOBAL.user.name", &ctx), Some(json!("alice")));
    }

    #[test]
    fn component_marker_reads_component_store() {
        let ctx = test_context().with_component("grid");
        ctx.content.component_store("grid").set_state("page", json!(3));
        assert_eq!(resolve("COMPONENT.page", &ctx), Some(json!(3)));
    }

    #[test]
    fn component_marker_without_binding_is_none() {
        let ctx = test_context();
        assert_eq!(resolve("COMPONENT.page", &ctx), None);
    }

    #[test]
    fn result_marker_reads_prior_result() {
        let ctx = test_context();
        ctx.publish_chain_context(&ActionResult::success(json!({"token": "abc"})));
        assert_eq!(resolve("__result.token", &ctx), Some(json!("abc")));
    }

    #[test]
    fn legacy_result_marker_is_equivalent() {
        let ctx = test_context();
        ctx.publish_chain_context(&ActionResult::success(json!({"token": "abc"})));
        assert_eq!(resolve("result.token", &ctx), resolve("__result.token", &ctx));
    }

    #[test]
    fn bare_result_marker_returns_whole_payload() {
        let ctx = test_context();
        let payload = json!({"items": [1, 2]});
        ctx.publish_chain_context(&ActionResult::success(payload.clone()));
        assert_eq!(resolve("__result", &ctx), Some(payload));
    }

    #[test]
    fn result_round_trip_through_serialization() {
        // Encoding an envelope to plain JSON and back recovers the
        // identical payload through the prior-result marker.
        let original = ActionResult::success(json!({"user": {"id": 42}}));
        let encoded = serde_json::to_value(&original).unwrap();
        let decoded: ActionResult = serde_json::from_value(encoded).unwrap();

        let ctx = test_context();
        ctx.publish_chain_context(&decoded);
        assert_eq!(resolve("__result.user.id", &ctx), Some(json!(42)));
        assert_eq!(resolve("__result", &ctx), original.result);
    }

    #[test]
    fn unmarked_path_prefers_chain_result() {
        let ctx = test_context();
        ctx.global.set_state("status", json!("from-global"));
        ctx.publish_chain_context(&ActionResult::success(json!({"status": "from-result"})));
        assert_eq!(resolve("status", &ctx), Some(json!("from-result")));
    }

    #[test]
    fn unmarked_path_falls_back_to_global() {
        let ctx = test_context();
        ctx.global.set_state("status", json!("from-global"));
        // Chain context exists but does not contain the path.
        ctx.publish_chain_context(&ActionResult::success(json!({"other": 1})));
        assert_eq!(resolve("status", &ctx), Some(json!("from-global")));
    }

    #[test]
    fn unmarked_path_without_chain_reads_global() {
        let ctx = test_context();
        ctx.global.set_state("theme", json!("dark"));
        assert_eq!(resolve("theme", &ctx), Some(json!("dark")));
    }

    #[test]
    fn miss_is_none() {
        let ctx = test_context();
        assert_eq!(resolve("GLOBAL.absent.deeply", &ctx), None);
        assert_eq!(resolve("__result.anything", &ctx), None);
    }
}
