//! Auth/session handlers: `login`/`loginUser` and `logout`/`logoutUser`.
//!
//! These compose several capabilities into one flow: the auth capability
//! performs the exchange, storage persists the token, state records the
//! session, and toast gives distinct success/failure feedback. Storage and
//! toast participate only when the host supplies them — auth itself is the
//! one hard requirement.

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::context::{ActionExecutionContext, ToastTone};
use crate::error::ActionError;
use crate::registry::ActionHandler;
use crate::result::ActionResult;

/// State key recording the logged-in session payload.
const SESSION_STATE_KEY: &str = "currentUser";
/// Storage key persisting the session token.
const TOKEN_STORAGE_KEY: &str = "authToken";

/// Establish a session. Credentials come from the `credentials` argument
/// when present, else the whole args object is forwarded.
pub struct LoginHandler;

#[async_trait]
impl ActionHandler for LoginHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let Some(auth) = ctx.global.auth() else {
            return ActionResult::failure(ActionError::capability_missing("auth.login"));
        };
        let credentials = args
            .get("credentials")
            .cloned()
            .unwrap_or_else(|| Value::Object(args.clone()));

        match auth.login(credentials).await {
            Ok(payload) => {
                ctx.global.set_state(SESSION_STATE_KEY, payload.clone());
                if let Some(storage) = ctx.global.storage() {
                    if let Some(token) = payload.get("token") {
                        storage.set_item(TOKEN_STORAGE_KEY, token.clone());
                    }
                }
                if let Some(toaster) = ctx.global.toaster() {
                    toaster.show("Logged in", ToastTone::Success);
                }
                ActionResult::success(payload)
            }
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                if let Some(toaster) = ctx.global.toaster() {
                    toaster.show("Login failed", ToastTone::Error);
                }
                ActionResult::failure(e)
            }
        }
    }
}

/// Tear down the session: host logout, then clear the recorded session
/// state and persisted token.
pub struct LogoutHandler;

#[async_trait]
impl ActionHandler for LogoutHandler {
    async fn execute(
        &self,
        _args: &Map<String, Value>,
        ctx: &ActionExecutionContext,
    ) -> ActionResult {
        let Some(auth) = ctx.global.auth() else {
            return ActionResult::failure(ActionError::capability_missing("auth.logout"));
        };

        match auth.logout().await {
            Ok(()) => {
                ctx.global.remove_state(SESSION_STATE_KEY);
                if let Some(storage) = ctx.global.storage() {
                    storage.remove_item(TOKEN_STORAGE_KEY);
                }
                if let Some(toaster) = ctx.global.toaster() {
                    toaster.show("Logged out", ToastTone::Info);
                }
                ActionResult::success(json!({"loggedOut": true}))
            }
            Err(e) => {
                if let Some(toaster) = ctx.global.toaster() {
                    toaster.show("Logout failed", ToastTone::Error);
                }
                ActionResult::failure(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GlobalHost;
    use crate::memory::{MemoryContentHost, MemoryGlobalHost};
    use std::sync::Arc;

    fn context_with(global: MemoryGlobalHost) -> (Arc<MemoryGlobalHost>, ActionExecutionContext) {
        let global = Arc::new(global);
        let ctx = ActionExecutionContext::new(global.clone(), Arc::new(MemoryContentHost::new()));
        (global, ctx)
    }

    fn args(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn login_records_session_token_and_toast() {
        let (global, ctx) = context_with(MemoryGlobalHost::new());

        let result = LoginHandler
            .execute(&args(json!({"credentials": {"user": "alice"}})), &ctx)
            .await;

        assert!(result.is_success());
        let payload = result.result.unwrap();
        assert_eq!(payload["token"], json!("test-token"));

        assert_eq!(global.get_state(SESSION_STATE_KEY), Some(payload));
        assert_eq!(
            global.storage_items().get(TOKEN_STORAGE_KEY),
            Some(&json!("test-token"))
        );
        assert_eq!(
            global.toasts(),
            vec![("Logged in".to_owned(), ToastTone::Success)]
        );
    }

    #[tokio::test]
    async fn failed_login_gives_error_feedback() {
        let (global, ctx) = context_with(MemoryGlobalHost::new());
        global.deny_logins("bad credentials");

        let result = LoginHandler.execute(&Map::new(), &ctx).await;
        assert!(!result.is_success());
        assert_eq!(result.error, Some(ActionError::host("bad credentials")));
        assert!(global.get_state(SESSION_STATE_KEY).is_none());
        assert_eq!(
            global.toasts(),
            vec![("Login failed".to_owned(), ToastTone::Error)]
        );
    }

    #[tokio::test]
    async fn login_without_auth_capability_fails() {
        let (_, ctx) = context_with(MemoryGlobalHost::bare());
        let result = LoginHandler.execute(&Map::new(), &ctx).await;
        assert_eq!(
            result.error,
            Some(ActionError::capability_missing("auth.login"))
        );
    }

    #[tokio::test]
    async fn logout_clears_session_and_storage() {
        let (global, ctx) = context_with(MemoryGlobalHost::new());
        LoginHandler.execute(&Map::new(), &ctx).await;

        let result = LogoutHandler.execute(&Map::new(), &ctx).await;
        assert!(result.is_success());
        assert!(global.get_state(SESSION_STATE_KEY).is_none());
        assert!(!global.storage_items().contains_key(TOKEN_STORAGE_KEY));
    }
}
