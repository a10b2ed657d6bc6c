//! Form-lifecycle handlers, bound to the form host.
//!
//! Every verb here requires a [`FormHost`](crate::context::FormHost) on the
//! execution context and fails with `FormContextMissing` when none is
//! attached. `onLoad` is deliberately a no-op placeholder: it exists only
//! as a dispatch entry point, and its semantics live entirely in the
//! action's `then` continuation list.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use super::require_str;
use crate::context::{ActionExecutionContext, FormHost};
use crate::error::ActionError;
use crate::registry::ActionHandler;
use crate::result::ActionResult;

fn form_host(
    ctx: &ActionExecutionContext,
    action: &str,
) -> Result<Arc<dyn FormHost>, ActionError> {
    ctx.form.clone().ok_or_else(|| ActionError::FormContextMissing {
        action: action.to_owned(),
    })
}

/// Merge an object of values into the form data.
pub struct SetFormDataHandler;

#[async_trait]
impl ActionHandler for SetFormDataHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let form = match form_host(ctx, "setFormData") {
            Ok(f) => f,
            Err(e) => return ActionResult::failure(e),
        };
        let data = match args.get("data") {
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                return ActionResult::failure(ActionError::invalid_argument(
                    "setFormData",
                    "data",
                    format!("expected an object, got {other}"),
                ));
            }
            None => return ActionResult::failure(ActionError::missing_argument(
                "setFormData",
                "data",
            )),
        };
        form.set_form_data(data);
        ActionResult::success(Value::Object(form.form_data()))
    }
}

/// Read the whole form data object.
pub struct GetFormDataHandler;

#[async_trait]
impl ActionHandler for GetFormDataHandler {
    async fn execute(
        &self,
        _args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        match form_host(ctx, "getFormData") {
            Ok(form) => ActionResult::success(Value::Object(form.form_data())),
            Err(e) => ActionResult::failure(e),
        }
    }
}

/// Write a single form field.
pub struct SetFormFieldHandler;

#[async_trait]
impl ActionHandler for SetFormFieldHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let form = match form_host(ctx, "setFormField") {
            Ok(f) => f,
            Err(e) => return ActionResult::failure(e),
        };
        let field = match require_str(args, "field", "setFormField") {
            Ok(f) => f,
            Err(e) => return ActionResult::failure(e),
        };
        let value = args.get("value").cloned().unwrap_or(Value::Null);
        form.set_field(field, value.clone());
        ActionResult::success(value)
    }
}

/// Read a single form field; a missing field reads as `null`.
pub struct GetFormFieldHandler;

#[async_trait]
impl ActionHandler for GetFormFieldHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let form = match form_host(ctx, "getFormField") {
            Ok(f) => f,
            Err(e) => return ActionResult::failure(e),
        };
        let field = match require_str(args, "field", "getFormField") {
            Ok(f) => f,
            Err(e) => return ActionResult::failure(e),
        };
        ActionResult::success(form.get_field(field).unwrap_or(Value::Null))
    }
}

/// Run validation. The payload reports validity and the collected field
/// errors so chains can branch on either.
pub struct ValidateFormHandler;

#[async_trait]
impl ActionHandler for ValidateFormHandler {
    async fn execute(
        &self,
        _args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let form = match form_host(ctx, "validateForm") {
            Ok(f) => f,
            Err(e) => return ActionResult::failure(e),
        };
        let valid = form.validate();
        let errors = serde_json::to_value(form.errors()).unwrap_or(Value::Null);
        ActionResult::success(json!({"valid": valid, "errors": errors}))
    }
}

/// Reset the form to its initial data and clear errors.
pub struct ResetFormHandler;

#[async_trait]
impl ActionHandler for ResetFormHandler {
    async fn execute(
        &self,
        _args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        match form_host(ctx, "resetForm") {
            Ok(form) => {
                form.reset();
                ActionResult::empty()
            }
            Err(e) => ActionResult::failure(e),
        }
    }
}

/// Submit the form. Host failures become failure envelopes.
pub struct SubmitFormHandler;

#[async_trait]
impl ActionHandler for SubmitFormHandler {
    async fn execute(
        &self,
        _args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let form = match form_host(ctx, "submitForm") {
            Ok(f) => f,
            Err(e) => return ActionResult::failure(e),
        };
        form.submit().await.into()
    }
}

/// No-op placeholder for form load. Exists only so `onLoad` actions have a
/// registry entry; the interesting work is the `then` continuation list.
pub struct OnLoadHandler;

#[async_trait]
impl ActionHandler for OnLoadHandler {
    async fn execute(
        &self,
        _args: &Map<String, Value>,
        _ctx: &ActionExecutionContext,
    ) -> ActionResult {
        ActionResult::empty()
    }
}
