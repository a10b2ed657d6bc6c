//! The serializable action tree.
//!
//! Action trees are immutable data constructed ahead of time (by the UI
//! metadata layer) and never mutated by the engine. Recursion is ordinary
//! owned nesting: `chains` and `then` contain further
//! [`SerializableAction`]s, and no cycles are possible.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use trellis_expression::Condition;

/// A full action invocation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionInvocation {
    /// Registry key of the handler to dispatch.
    pub action: String,
    /// Handler-specific arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Map<String, Value>>,
    /// When set, the dispatcher substitutes the triggering UI event's value
    /// into `args` at dispatch time.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub value_from_event: bool,
    /// Conditional continuations, evaluated against this action's result.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chains: Vec<ConditionalChain>,
    /// Unconditional continuations, run after the action and its chains
    /// regardless of chain outcome.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub then: Vec<SerializableAction>,
}

/// A conditional continuation: fires when `condition` holds against the
/// evaluation context built from the owning action's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalChain {
    /// Condition evaluated against form data ∪ the just-produced result.
    pub condition: Condition,
    /// Actions run, in order, when the condition holds.
    pub action: Vec<SerializableAction>,
}

/// The unit the orchestrator executes: either a bare action-name string
/// (shorthand, no arguments) or a full [`ActionInvocation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializableAction {
    /// Shorthand: just the registry key.
    Name(String),
    /// Full invocation with args, chains, and continuations.
    Invoke(ActionInvocation),
}

impl SerializableAction {
    /// Shorthand constructor from an action name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// The registry key this action dispatches to.
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Invoke(inv) => &inv.action,
        }
    }

    /// The invocation arguments, if any. Shorthand actions have none.
    pub fn args(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Name(_) => None,
            Self::Invoke(inv) => inv.args.as_ref(),
        }
    }

    /// Whether the dispatcher should substitute the UI event's value.
    pub fn takes_event_value(&self) -> bool {
        match self {
            Self::Name(_) => false,
            Self::Invoke(inv) => inv.value_from_event,
        }
    }

    /// Conditional continuations attached to this action.
    pub fn chains(&self) -> &[ConditionalChain] {
        match self {
            Self::Name(_) => &[],
            Self::Invoke(inv) => &inv.chains,
        }
    }

    /// Unconditional continuations attached to this action.
    pub fn continuations(&self) -> &[SerializableAction] {
        match self {
            Self::Name(_) => &[],
            Self::Invoke(inv) => &inv.then,
        }
    }
}

impl From<&str> for SerializableAction {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl ActionInvocation {
    /// Invocation with no args, chains, or continuations.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            args: None,
            value_from_event: false,
            chains: Vec::new(),
            then: Vec::new(),
        }
    }

    /// Attach arguments.
    pub fn with_args(mut self, args: Map<String, Value>) -> Self {
        self.args = Some(args);
        self
    }

    /// Append an unconditional continuation.
    pub fn then(mut self, action: SerializableAction) -> Self {
        self.then.push(action);
        self
    }

    /// Append a conditional chain.
    pub fn chain(mut self, chain: ConditionalChain) -> Self {
        self.chains.push(chain);
        self
    }
}

impl From<ActionInvocation> for SerializableAction {
    fn from(inv: ActionInvocation) -> Self {
        Self::Invoke(inv)
    }
}
