//! Conditional visibility handlers: `showHide` and `evaluateFieldCondition`.
//!
//! Both assemble an evaluation context — form data when a form is attached,
//! else an explicit `data` argument, else global state — and delegate to
//! the condition evaluator. Their fail-safe defaults are deliberately
//! asymmetric: a malformed condition hides for `showHide` and shows for
//! `evaluateFieldCondition`, biasing each call site toward safety.

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::context::ActionExecutionContext;
use crate::error::ActionError;
use crate::registry::ActionHandler;
use crate::result::ActionResult;
use trellis_expression::{Condition, evaluate};

/// Evaluate a visibility condition; fail-safe default is **hidden**.
pub struct ShowHideHandler;

#[async_trait]
impl ActionHandler for ShowHideHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        evaluate_visibility(args, ctx, "showHide", false)
    }
}

/// Evaluate a field condition; fail-safe default is **visible**.
pub struct EvaluateFieldConditionHandler;

#[async_trait]
impl ActionHandler for EvaluateFieldConditionHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        evaluate_visibility(args, ctx, "evaluateFieldCondition", true)
    }
}

fn evaluate_visibility(
    args: &Map<String, Value>,
    ctx: &ActionExecutionContext,
    action: &str,
    fail_safe_visible: bool,
) -> ActionResult {
    let Some(raw_condition) = args.get("condition") else {
        return ActionResult::failure(ActionError::missing_argument(action, "condition"));
    };

    let condition: Condition = match serde_json::from_value(raw_condition.clone()) {
        Ok(c) => c,
        Err(e) => {
            // Asymmetric fail-safe: report the default visibility as a
            // successful envelope rather than failing the dispatch.
            tracing::warn!(action, error = %e, "malformed visibility condition");
            return ActionResult::success(json!({"visible": fail_safe_visible}));
        }
    };

    let context = evaluation_context(args, ctx);
    let visible = evaluate(&condition, &context);
    ActionResult::success(json!({"visible": visible}))
}

/// Precedence: form data, then the explicit `data` argument, then global
/// state.
fn evaluation_context(args: &Map<String, Value>, ctx: &ActionExecutionContext) -> Value {
    if let Some(form) = &ctx.form {
        return Value::Object(form.form_data());
    }
    if let Some(data) = args.get("data") {
        return data.clone();
    }
    Value::Object(ctx.global.get_all_state())
}
