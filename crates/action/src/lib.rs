//! # Trellis Action System
//!
//! The data model and dispatch surface of the Trellis serializable action
//! engine. This crate defines **what** actions are and **how they reach the
//! host** — the orchestration of chains and continuations lives in
//! `trellis-engine`.
//!
//! It follows a Ports & Drivers architecture: the engine owns no state
//! stores, no network client, and no storage. Everything effectful is
//! borrowed from the host through the port traits in [`context`], and every
//! handler converts failure into a uniform [`ActionResult`] envelope rather
//! than an error return — errors are data the action tree branches on, not
//! control flow.
//!
//! ## Core types
//!
//! - [`SerializableAction`] — the unit the orchestrator executes: a bare
//!   action name or a full invocation with args, conditional `chains`, and
//!   unconditional `then` continuations
//! - [`ActionResult`] — uniform `{success, result, error}` envelope
//! - [`ActionError`] — structured error kinds, serializable across the wire
//! - [`ActionExecutionContext`] — host-supplied global/content/form
//!   capabilities threaded through every dispatch
//! - [`ActionRegistry`] — open string-keyed table of [`ActionHandler`]s,
//!   with builtin page-level and form-level families
//! - [`scope`] — the three-tier state scope policy (component → content →
//!   global, selectable by `GLOBAL.` / `CONTENT.` prefix)
//! - [`reference`] — symbolic reference resolution, including the
//!   prior-result marker that lets a later action read an earlier action's
//!   output through a plain string

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Execution context and host capability port traits.
pub mod context;
/// The serializable action tree: invocations, chains, continuations.
pub mod descriptor;
/// Structured error kinds for failure envelopes.
pub mod error;
/// Builtin page-level and form-level handler families.
pub mod handlers;
/// In-memory reference hosts for tests and demos.
pub mod memory;
/// Symbolic reference strings (scope and prior-result markers).
pub mod reference;
/// Action registry and the handler trait.
pub mod registry;
/// The uniform result envelope.
pub mod result;
/// State scope resolution (component / content / global tiers).
pub mod scope;

pub use context::{
    ActionExecutionContext, ApiDelegate, ApiRequest, AuthHost, ComponentStateStore, ContentHost,
    FieldError, FormHost, GlobalHost, StorageHost, ToastHost, ToastTone,
};
pub use descriptor::{ActionInvocation, ConditionalChain, SerializableAction};
pub use error::ActionError;
pub use registry::{ActionHandler, ActionRegistry};
pub use result::ActionResult;
pub use scope::StateScope;
