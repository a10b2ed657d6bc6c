//! Dispatch, chain evaluation, and continuation sequencing.

use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use trellis_action::{
    ActionError, ActionExecutionContext, ActionRegistry, ActionResult, SerializableAction,
};
use trellis_expression::evaluate;

/// Executes action trees against a pair of registries.
///
/// The orchestrator is explicitly constructed and injected — there is no
/// process-wide singleton. Both registries share one shape; the form
/// registry merely binds the form-lifecycle verbs. A node dispatches
/// through the form registry only when the context carries a form host
/// *and* the form registry owns the verb; everything else goes to the page
/// registry.
pub struct Orchestrator {
    page: Arc<ActionRegistry>,
    form: Arc<ActionRegistry>,
}

impl Orchestrator {
    /// Orchestrator over explicit page and form registries.
    pub fn new(page: Arc<ActionRegistry>, form: Arc<ActionRegistry>) -> Self {
        Self { page, form }
    }

    /// Orchestrator over the builtin handler families.
    pub fn with_builtins() -> Self {
        Self::new(
            Arc::new(ActionRegistry::page()),
            Arc::new(ActionRegistry::form()),
        )
    }

    /// The page-level registry.
    pub fn page_registry(&self) -> &Arc<ActionRegistry> {
        &self.page
    }

    /// The form-lifecycle registry.
    pub fn form_registry(&self) -> &Arc<ActionRegistry> {
        &self.form
    }

    /// Execute one action node, its chains, and its continuations.
    ///
    /// Returns the envelope of the node itself — continuations do not
    /// override it.
    pub async fn run(
        &self,
        action: &SerializableAction,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        self.run_node(action, ctx, None).await
    }

    /// Like [`run`](Self::run), with the triggering UI event's value.
    ///
    /// When the action sets `valueFromEvent`, the event payload is merged
    /// into the args under `value` before dispatch.
    pub async fn run_with_event(
        &self,
        action: &SerializableAction,
        ctx: &ActionExecutionContext,
        event: &Value,
    ) -> ActionResult {
        self.run_node(action, ctx, Some(event)).await
    }

    /// Execute a sequence of actions strictly in order, returning each
    /// envelope.
    pub async fn run_all(
        &self,
        actions: &[SerializableAction],
        ctx: &ActionExecutionContext,
    ) -> Vec<ActionResult> {
        let mut results = Vec::with_capacity(actions.len());
        for action in actions {
            results.push(self.run_node(action, ctx, None).await);
        }
        results
    }

    /// The recursive walk. Boxed because chains and continuations recurse
    /// through async.
    fn run_node<'a>(
        &'a self,
        action: &'a SerializableAction,
        ctx: &'a ActionExecutionContext,
        event: Option<&'a Value>,
    ) -> BoxFuture<'a, ActionResult> {
        Box::pin(async move {
            let name = action.name();

            // 1-2. Normalize and dispatch.
            let result = self.dispatch(action, ctx, event).await;
            if !result.is_success() {
                tracing::debug!(action = name, error = ?result.error, "action failed");
            }

            // 3. Publish for nested evaluations (prior-result marker).
            ctx.publish_chain_context(&result);

            // 4. Chains: every chain whose condition holds fires, in order.
            //    A failed action's chains still run; conditions branch on
            //    the reserved success/error fields.
            //
            //    Each direct child resolves its references against the
            //    owning action's result, so the cell is re-published before
            //    every child; the child's own dispatch then publishes its
            //    envelope for its descendants.
            let chain_ctx = chain_evaluation_context(ctx, &result);
            for chain in action.chains() {
                if !evaluate(&chain.condition, &chain_ctx) {
                    continue;
                }
                for nested in &chain.action {
                    ctx.publish_chain_context(&result);
                    self.run_node(nested, ctx, None).await;
                }
            }

            // 5. Continuations: unconditional, after all chains.
            for nested in action.continuations() {
                ctx.publish_chain_context(&result);
                self.run_node(nested, ctx, None).await;
            }

            // 6. The node's own envelope is the return value.
            result
        })
    }

    async fn dispatch(
        &self,
        action: &SerializableAction,
        ctx: &ActionExecutionContext,
        event: Option<&Value>,
    ) -> ActionResult {
        let name = action.name();
        let registry = if ctx.form.is_some() && self.form.contains(name) {
            &self.form
        } else {
            &self.page
        };

        let Some(handler) = registry.get(name) else {
            return ActionResult::failure(ActionError::HandlerNotFound {
                action: name.to_owned(),
            });
        };

        let mut args = action.args().cloned().unwrap_or_default();
        if action.takes_event_value() {
            if let Some(value) = event {
                args.insert("value".to_owned(), value.clone());
            }
        }

        tracing::debug!(action = name, "dispatching");
        handler.execute(&args, ctx).await
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("page_actions", &self.page.len())
            .field("form_actions", &self.form.len())
            .finish()
    }
}

/// Build the context a chain condition is evaluated against: form data
/// (when a form is attached) ∪ the result payload's own object fields ∪
/// the reserved `success`/`error`/`result` keys.
fn chain_evaluation_context(ctx: &ActionExecutionContext, result: &ActionResult) -> Value {
    let mut merged = ctx
        .form
        .as_ref()
        .map(|form| form.form_data())
        .unwrap_or_default();

    if let Some(Value::Object(fields)) = &result.result {
        for (k, v) in fields {
            merged.insert(k.clone(), v.clone());
        }
    }

    merged.insert(
        "result".to_owned(),
        result.result.clone().unwrap_or(Value::Null),
    );
    merged.insert("success".to_owned(), Value::Bool(result.success));
    merged.insert(
        "error".to_owned(),
        result
            .error
            .as_ref()
            .and_then(|e| serde_json::to_value(e).ok())
            .unwrap_or(Value::Null),
    );

    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trellis_action::memory::{MemoryContentHost, MemoryGlobalHost};

    fn test_context() -> ActionExecutionContext {
        ActionExecutionContext::new(
            Arc::new(MemoryGlobalHost::new()),
            Arc::new(MemoryContentHost::new()),
        )
    }

    fn action(v: Value) -> SerializableAction {
        serde_json::from_value(v).unwrap()
    }

    #[tokio::test]
    async fn unknown_action_is_a_failure_envelope() {
        let orchestrator = Orchestrator::with_builtins();
        let ctx = test_context();
        let result = orchestrator.run(&action(json!("definitelyNotRegistered")), &ctx).await;
        assert!(!result.is_success());
        assert_eq!(
            result.error,
            Some(ActionError::HandlerNotFound {
                action: "definitelyNotRegistered".into()
            })
        );
    }

    #[tokio::test]
    async fn chain_context_reflects_success_and_error() {
        let result = ActionResult::failure(ActionError::host("boom"));
        let ctx = test_context();
        let evaluated = chain_evaluation_context(&ctx, &result);
        assert_eq!(evaluated["success"], json!(false));
        assert_eq!(evaluated["error"]["kind"], json!("host"));
        assert_eq!(evaluated["result"], Value::Null);
    }

    #[tokio::test]
    async fn result_object_fields_are_merged_into_chain_context() {
        let result = ActionResult::success(json!({"token": "abc"}));
        let ctx = test_context();
        let evaluated = chain_evaluation_context(&ctx, &result);
        assert_eq!(evaluated["token"], json!("abc"));
        assert_eq!(evaluated["result"], json!({"token": "abc"}));
        assert_eq!(evaluated["success"], json!(true));
    }

    #[tokio::test]
    async fn value_from_event_merges_event_payload() {
        let orchestrator = Orchestrator::with_builtins();
        let global = Arc::new(MemoryGlobalHost::new());
        let ctx = ActionExecutionContext::new(global.clone(), Arc::new(MemoryContentHost::new()));

        let a = action(json!({
            "action": "setState",
            "args": {"key": "selection"},
            "valueFromEvent": true
        }));
        orchestrator.run_with_event(&a, &ctx, &json!("row-3")).await;

        use trellis_action::GlobalHost;
        assert_eq!(global.get_state("selection"), Some(json!("row-3")));
    }
}
