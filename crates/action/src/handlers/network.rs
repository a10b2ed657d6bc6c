//! The network handler: `makeApiCall`.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{component_id, require_str};
use crate::context::{ActionExecutionContext, ApiRequest};
use crate::registry::ActionHandler;
use crate::result::ActionResult;
use crate::scope;

/// Perform a host-delegated network call.
///
/// `:param` segments in the URL are resolved against the call-time body
/// first and, failing that, against the combined global+content state. When
/// the invocation is bound to a component and the content host configures a
/// component-scoped [`ApiDelegate`](crate::context::ApiDelegate), that
/// delegate handles the request instead of the global host.
///
/// Host failures become failure envelopes; downstream chains branch on
/// `success`/`error`.
pub struct MakeApiCallHandler;

#[async_trait]
impl ActionHandler for MakeApiCallHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let url = match require_str(args, "url", "makeApiCall") {
            Ok(u) => u,
            Err(e) => return ActionResult::failure(e),
        };
        let method = args
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or("GET")
            .to_uppercase();
        let body = args.get("body").cloned();

        let resolved_url = resolve_slugs(url, body.as_ref(), &scope::combined_state(ctx));
        let request = ApiRequest {
            url: resolved_url,
            method,
            body,
        };

        tracing::debug!(url = %request.url, method = %request.method, "dispatching api call");

        let response = match component_id(args, ctx)
            .and_then(|id| ctx.content.api_override(id))
        {
            Some(delegate) => delegate.call(request).await,
            None => ctx.global.make_api_call(request).await,
        };

        match response {
            Ok(payload) => ActionResult::success(payload),
            Err(e) => {
                tracing::warn!(error = %e, "api call failed");
                ActionResult::failure(e)
            }
        }
    }
}

/// Replace `:param` path segments with values from the body and, failing
/// that, from ambient state. Unresolvable slugs are left in place so the
/// host sees exactly what could not be bound.
fn resolve_slugs(url: &str, body: Option<&Value>, state: &Map<String, Value>) -> String {
    url.split('/')
        .map(|segment| {
            let Some(name) = segment.strip_prefix(':') else {
                return segment.to_owned();
            };
            body.and_then(|b| b.get(name))
                .or_else(|| state.get(name))
                .map_or_else(|| segment.to_owned(), render_slug)
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn render_slug(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ApiDelegate;
    use crate::error::ActionError;
    use crate::memory::{MemoryContentHost, MemoryGlobalHost};
    use serde_json::json;
    use std::sync::Arc;

    fn args(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn slug_resolution_prefers_body() {
        let state = args(json!({"id": 1}));
        let body = json!({"id": 7});
        assert_eq!(
            resolve_slugs("/users/:id", Some(&body), &state),
            "/users/7"
        );
    }

    #[test]
    fn slug_resolution_falls_back_to_state() {
        let state = args(json!({"orgId": "acme"}));
        assert_eq!(
            resolve_slugs("/orgs/:orgId/users", None, &state),
            "/orgs/acme/users"
        );
    }

    #[test]
    fn unresolvable_slug_is_left_in_place() {
        assert_eq!(resolve_slugs("/users/:id", None, &Map::new()), "/users/:id");
    }

    #[tokio::test]
    async fn delegates_to_global_host() {
        let global = Arc::new(MemoryGlobalHost::new());
        global.respond_with(json!({"rows": []}));
        let ctx =
            ActionExecutionContext::new(global.clone(), Arc::new(MemoryContentHost::new()));

        let result = MakeApiCallHandler
            .execute(&args(json!({"url": "/data", "method": "post", "body": {"q": 1}})), &ctx)
            .await;

        assert!(result.is_success());
        assert_eq!(result.result, Some(json!({"rows": []})));
        let call = &global.api_calls()[0];
        assert_eq!(call.method, "POST");
        assert_eq!(call.body, Some(json!({"q": 1})));
    }

    #[tokio::test]
    async fn host_failure_becomes_failure_envelope() {
        let global = Arc::new(MemoryGlobalHost::new());
        global.fail_api_with("503 upstream");
        let ctx =
            ActionExecutionContext::new(global, Arc::new(MemoryContentHost::new()));

        let result = MakeApiCallHandler
            .execute(&args(json!({"url": "/data"})), &ctx)
            .await;
        assert!(!result.is_success());
        assert_eq!(result.error, Some(ActionError::host("503 upstream")));
    }

    struct FixedDelegate(Value);

    #[async_trait]
    impl ApiDelegate for FixedDelegate {
        async fn call(&self, _request: ApiRequest) -> Result<Value, ActionError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn component_override_takes_precedence() {
        let global = Arc::new(MemoryGlobalHost::new());
        let content = Arc::new(MemoryContentHost::new());
        content.set_api_override("grid", Arc::new(FixedDelegate(json!("scoped"))));

        let ctx = ActionExecutionContext::new(global.clone(), content).with_component("grid");
        let result = MakeApiCallHandler
            .execute(&args(json!({"url": "/rows"})), &ctx)
            .await;

        assert_eq!(result.result, Some(json!("scoped")));
        assert!(global.api_calls().is_empty());
    }

    #[tokio::test]
    async fn missing_url_fails() {
        let ctx = ActionExecutionContext::new(
            Arc::new(MemoryGlobalHost::new()),
            Arc::new(MemoryContentHost::new()),
        );
        let result = MakeApiCallHandler.execute(&Map::new(), &ctx).await;
        assert!(matches!(
            result.error,
            Some(ActionError::MissingArgument { .. })
        ));
    }
}
