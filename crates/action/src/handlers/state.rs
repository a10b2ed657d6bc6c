//! The state family: `setState`, `getState`, `toggleState`, `clearState`.
//!
//! All four route their key through the scope resolver, so `GLOBAL.` /
//! `CONTENT.` prefixes and the component default behave identically across
//! the family.

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use super::{component_id, require_str};
use crate::context::ActionExecutionContext;
use crate::reference;
use crate::registry::ActionHandler;
use crate::result::ActionResult;
use crate::scope;

/// Write a value into scoped state.
///
/// String values carrying an explicit reference marker (`GLOBAL.`,
/// `COMPONENT.`, `__result.`, legacy `result.`) are resolved through the
/// context value resolver before storing, so a chain can persist a field
/// of the previous action's result.
pub struct SetStateHandler;

#[async_trait]
impl ActionHandler for SetStateHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let key = match require_str(args, "key", "setState") {
            Ok(k) => k,
            Err(e) => return ActionResult::failure(e),
        };
        let raw = args.get("value").cloned().unwrap_or(Value::Null);
        let value = match &raw {
            Value::String(s) if reference::is_reference(s) => {
                reference::resolve(s, ctx).unwrap_or(Value::Null)
            }
            _ => raw,
        };

        scope::set(ctx, key, value.clone(), component_id(args, ctx));
        ActionResult::success(value)
    }
}

/// Read a value from scoped state; a missing key reads as `null`.
pub struct GetStateHandler;

#[async_trait]
impl ActionHandler for GetStateHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let key = match require_str(args, "key", "getState") {
            Ok(k) => k,
            Err(e) => return ActionResult::failure(e),
        };
        let value = scope::get(ctx, key, component_id(args, ctx)).unwrap_or(Value::Null);
        ActionResult::success(value)
    }
}

/// Flip a boolean in scoped state; missing or non-boolean values toggle to
/// `true`. The result payload is the new value.
pub struct ToggleStateHandler;

#[async_trait]
impl ActionHandler for ToggleStateHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let key = match require_str(args, "key", "toggleState") {
            Ok(k) => k,
            Err(e) => return ActionResult::failure(e),
        };
        let next = scope::toggle(ctx, key, component_id(args, ctx));
        ActionResult::success(json!(next))
    }
}

/// Remove a key from scoped state; the result payload is the removed value.
pub struct ClearStateHandler;

#[async_trait]
impl ActionHandler for ClearStateHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let key = match require_str(args, "key", "clearState") {
            Ok(k) => k,
            Err(e) => return ActionResult::failure(e),
        };
        let removed = scope::remove(ctx, key, component_id(args, ctx)).unwrap_or(Value::Null);
        ActionResult::success(removed)
    }
}
