//! Builtin page-level and form-level handler families.
//!
//! Each handler is a thin adapter over a host capability plus the scope and
//! reference resolvers. Handlers validate their own argument shape and
//! convert every failure — bad arguments, absent capabilities, host
//! exceptions — into a failure envelope. Nothing here raises a Rust error
//! across the dispatch boundary.

use serde_json::{Map, Value};

use crate::error::ActionError;
use crate::registry::ActionRegistry;

mod auth;
mod form;
mod navigation;
mod network;
mod state;
mod visibility;

pub use auth::{LoginHandler, LogoutHandler};
pub use form::{
    GetFormDataHandler, GetFormFieldHandler, OnLoadHandler, ResetFormHandler,
    SetFormDataHandler, SetFormFieldHandler, SubmitFormHandler, ValidateFormHandler,
};
pub use navigation::{
    GetStorageItemHandler, NavigateHandler, RemoveStorageItemHandler, SetStorageItemHandler,
    ShowToastHandler,
};
pub use network::MakeApiCallHandler;
pub use state::{ClearStateHandler, GetStateHandler, SetStateHandler, ToggleStateHandler};
pub use visibility::{EvaluateFieldConditionHandler, ShowHideHandler};

/// Register the builtin page-level family into a registry.
pub fn register_page_builtins(registry: &mut ActionRegistry) {
    use std::sync::Arc;

    registry.register("setState", Arc::new(SetStateHandler));
    registry.register("getState", Arc::new(GetStateHandler));
    registry.register("toggleState", Arc::new(ToggleStateHandler));
    registry.register("clearState", Arc::new(ClearStateHandler));

    registry.register("navigate", Arc::new(NavigateHandler));
    registry.register("showToast", Arc::new(ShowToastHandler));
    registry.register("setStorageItem", Arc::new(SetStorageItemHandler));
    registry.register("getStorageItem", Arc::new(GetStorageItemHandler));
    registry.register("removeStorageItem", Arc::new(RemoveStorageItemHandler));

    registry.register("makeApiCall", Arc::new(MakeApiCallHandler));

    registry.register("showHide", Arc::new(ShowHideHandler));
    registry.register("evaluateFieldCondition", Arc::new(EvaluateFieldConditionHandler));

    // Both spellings of the auth verbs dispatch to the same handlers.
    registry.register("login", Arc::new(LoginHandler));
    registry.register("loginUser", Arc::new(LoginHandler));
    registry.register("logout", Arc::new(LogoutHandler));
    registry.register("logoutUser", Arc::new(LogoutHandler));
}

/// Register the builtin form-lifecycle family into a registry.
pub fn register_form_builtins(registry: &mut ActionRegistry) {
    use std::sync::Arc;

    registry.register("setFormData", Arc::new(SetFormDataHandler));
    registry.register("getFormData", Arc::new(GetFormDataHandler));
    registry.register("setFormField", Arc::new(SetFormFieldHandler));
    registry.register("getFormField", Arc::new(GetFormFieldHandler));
    registry.register("validateForm", Arc::new(ValidateFormHandler));
    registry.register("resetForm", Arc::new(ResetFormHandler));
    registry.register("submitForm", Arc::new(SubmitFormHandler));
    registry.register("onLoad", Arc::new(OnLoadHandler));
}

/// Fetch a required string argument.
fn require_str<'a>(
    args: &'a Map<String, Value>,
    name: &str,
    action: &str,
) -> Result<&'a str, ActionError> {
    match args.get(name) {
        None => Err(ActionError::missing_argument(action, name)),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(ActionError::invalid_argument(
            action,
            name,
            format!("expected a string, got {other}"),
        )),
    }
}

/// Fetch an optional string argument, rejecting non-string shapes.
fn optional_str<'a>(
    args: &'a Map<String, Value>,
    name: &str,
    action: &str,
) -> Result<Option<&'a str>, ActionError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(ActionError::invalid_argument(
            action,
            name,
            format!("expected a string, got {other}"),
        )),
    }
}

/// The component id governing scope resolution for this invocation: an
/// explicit `componentId` argument wins over the context binding.
fn component_id<'a>(
    args: &'a Map<String, Value>,
    ctx: &'a crate::context::ActionExecutionContext,
) -> Option<&'a str> {
    args.get("componentId")
        .and_then(Value::as_str)
        .or(ctx.component_id.as_deref())
}
