//! Structured error kinds for failure envelopes.

use serde::{Deserialize, Serialize};

/// Error carried inside a failed [`ActionResult`](crate::ActionResult).
///
/// Handlers never raise errors at the Rust level — every failure is
/// converted into an envelope with one of these kinds, so downstream chains
/// can branch on failure the same way they branch on success. The kinds are
/// serializable (tagged by `kind`) so envelopes survive the serialization
/// boundary intact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[non_exhaustive]
pub enum ActionError {
    /// A required argument was absent from the invocation's `args`.
    #[error("action `{action}` is missing required argument `{argument}`")]
    MissingArgument {
        /// The registry key of the failing action.
        action: String,
        /// The argument that was expected.
        argument: String,
    },

    /// An argument was present but had the wrong shape.
    #[error("action `{action}` received invalid argument `{argument}`: {message}")]
    InvalidArgument {
        /// The registry key of the failing action.
        action: String,
        /// The offending argument.
        argument: String,
        /// What was wrong with it.
        message: String,
    },

    /// The host did not supply an optional capability the action needs.
    #[error("host capability `{capability}` is not available")]
    CapabilityMissing {
        /// The absent capability (e.g. `storage`, `toast`, `auth.login`).
        capability: String,
    },

    /// No handler is registered under the requested action name.
    #[error("no handler registered for action `{action}`")]
    HandlerNotFound {
        /// The unknown registry key.
        action: String,
    },

    /// A form-family action ran without a form context attached.
    #[error("FormActionContext is not set for action `{action}`")]
    FormContextMissing {
        /// The form action that was attempted.
        action: String,
    },

    /// A delegated host call (network, storage, auth) failed.
    #[error("host call failed: {message}")]
    Host {
        /// Free-text description from the host.
        message: String,
    },
}

impl ActionError {
    /// Missing-argument error for `action`/`argument`.
    pub fn missing_argument(action: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            action: action.into(),
            argument: argument.into(),
        }
    }

    /// Invalid-argument error with a description of the mismatch.
    pub fn invalid_argument(
        action: impl Into<String>,
        argument: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            action: action.into(),
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Capability-missing error.
    pub fn capability_missing(capability: impl Into<String>) -> Self {
        Self::CapabilityMissing {
            capability: capability.into(),
        }
    }

    /// Host-call failure with a free-text message.
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
        }
    }

    /// Returns `true` for errors caused by the invocation itself
    /// (missing/invalid arguments, unknown action) rather than the host.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument { .. }
                | Self::InvalidArgument { .. }
                | Self::HandlerNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_formatting() {
        let err = ActionError::missing_argument("setState", "key");
        assert_eq!(
            err.to_string(),
            "action `setState` is missing required argument `key`"
        );

        let err = ActionError::capability_missing("toast");
        assert_eq!(err.to_string(), "host capability `toast` is not available");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let err = ActionError::HandlerNotFound {
            action: "bogus".into(),
        };
        let encoded = serde_json::to_value(&err).unwrap();
        assert_eq!(
            encoded,
            json!({"kind": "handlerNotFound", "action": "bogus"})
        );
    }

    #[test]
    fn round_trips() {
        let err = ActionError::invalid_argument("makeApiCall", "url", "expected a string");
        let encoded = serde_json::to_value(&err).unwrap();
        let decoded: ActionError = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, err);
    }

    #[test]
    fn caller_error_classification() {
        assert!(ActionError::missing_argument("a", "b").is_caller_error());
        assert!(!ActionError::host("network down").is_caller_error());
        assert!(!ActionError::capability_missing("storage").is_caller_error());
    }
}
