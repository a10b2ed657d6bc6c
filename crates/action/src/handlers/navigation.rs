//! Navigation, storage, and toast handlers.
//!
//! Thin delegations to the global host. The storage and toast handlers
//! check capability presence first and fail explicitly when the host did
//! not supply the capability — never a silent no-op.

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use super::{optional_str, require_str};
use crate::context::{ActionExecutionContext, ToastTone};
use crate::error::ActionError;
use crate::registry::ActionHandler;
use crate::result::ActionResult;

/// Navigate the UI to a route. Accepts the target under `to` or `path`.
pub struct NavigateHandler;

#[async_trait]
impl ActionHandler for NavigateHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let target = match optional_str(args, "to", "navigate") {
            Ok(Some(t)) => t,
            Ok(None) => match require_str(args, "path", "navigate") {
                Ok(t) => t,
                Err(_) => {
                    return ActionResult::failure(ActionError::missing_argument("navigate", "to"));
                }
            },
            Err(e) => return ActionResult::failure(e),
        };
        ctx.global.navigate(target);
        ActionResult::success(json!({"navigatedTo": target}))
    }
}

/// Show a toast notification; requires the toast capability.
pub struct ShowToastHandler;

#[async_trait]
impl ActionHandler for ShowToastHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let message = match require_str(args, "message", "showToast") {
            Ok(m) => m,
            Err(e) => return ActionResult::failure(e),
        };
        let tone = args
            .get("tone")
            .cloned()
            .map_or(Ok(ToastTone::Info), serde_json::from_value);
        let tone = match tone {
            Ok(t) => t,
            Err(e) => {
                return ActionResult::failure(ActionError::invalid_argument(
                    "showToast",
                    "tone",
                    e.to_string(),
                ));
            }
        };
        let Some(toaster) = ctx.global.toaster() else {
            return ActionResult::failure(ActionError::capability_missing("toast"));
        };
        toaster.show(message, tone);
        ActionResult::empty()
    }
}

/// Persist a value in host storage; requires the storage capability.
pub struct SetStorageItemHandler;

#[async_trait]
impl ActionHandler for SetStorageItemHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let key = match require_str(args, "key", "setStorageItem") {
            Ok(k) => k,
            Err(e) => return ActionResult::failure(e),
        };
        let Some(storage) = ctx.global.storage() else {
            return ActionResult::failure(ActionError::capability_missing("storage"));
        };
        let value = args.get("value").cloned().unwrap_or(Value::Null);
        storage.set_item(key, value.clone());
        ActionResult::success(value)
    }
}

/// Read a value from host storage; requires the storage capability.
pub struct GetStorageItemHandler;

#[async_trait]
impl ActionHandler for GetStorageItemHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let key = match require_str(args, "key", "getStorageItem") {
            Ok(k) => k,
            Err(e) => return ActionResult::failure(e),
        };
        let Some(storage) = ctx.global.storage() else {
            return ActionResult::failure(ActionError::capability_missing("storage"));
        };
        ActionResult::success(storage.get_item(key).unwrap_or(Value::Null))
    }
}

/// Remove a value from host storage; requires the storage capability.
pub struct RemoveStorageItemHandler;

#[async_trait]
impl ActionHandler for RemoveStorageItemHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let key = match require_str(args, "key", "removeStorageItem") {
            Ok(k) => k,
            Err(e) => return ActionResult::failure(e),
        };
        let Some(storage) = ctx.global.storage() else {
            return ActionResult::failure(ActionError::capability_missing("storage"));
        };
        ActionResult::success(storage.remove_item(key).unwrap_or(Value::Null))
    }
}
