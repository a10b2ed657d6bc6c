//! The uniform result envelope returned by every handler.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ActionError;

/// Outcome of one action dispatch.
///
/// Every handler — builtin or host-registered — returns this envelope, on
/// success and on failure alike. `result` carries the handler-specific
/// payload that downstream chains read through the prior-result marker;
/// `error` carries the structured failure, if any.
///
/// A failed envelope does not stop orchestration: the failed action's
/// chains and `then` continuations still run, and it is the chain
/// conditions (testing the reserved `success`/`error` fields) that decide
/// whether to branch on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    /// Whether the handler's effect completed.
    pub success: bool,
    /// Handler-specific payload, consumed by downstream chains.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Structured failure when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ActionError>,
}

impl ActionResult {
    /// Successful envelope carrying a payload.
    pub fn success(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    /// Successful envelope with no payload.
    pub fn empty() -> Self {
        Self {
            success: true,
            result: None,
            error: None,
        }
    }

    /// Failure envelope carrying a structured error.
    pub fn failure(error: ActionError) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error),
        }
    }

    /// Whether the envelope reports success.
    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl From<Result<Value, ActionError>> for ActionResult {
    fn from(value: Result<Value, ActionError>) -> Self {
        match value {
            Ok(v) => Self::success(v),
            Err(e) => Self::failure(e),
        }
    }
}
