//! # Trellis Engine
//!
//! The orchestrator for serializable action trees: given one
//! [`SerializableAction`](trellis_action::SerializableAction) and an
//! execution context, it dispatches to the action registry, publishes the
//! result for nested evaluations, fires the matching conditional chains,
//! and runs the unconditional `then` continuations — recursively, strictly
//! in order.
//!
//! Failures never interrupt the walk: a failed handler yields
//! `success: false` and execution proceeds into chains and continuations
//! exactly as on success. Branching on failure is the action tree's job,
//! via chain conditions over the reserved `success`/`error` fields.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Dispatch, chain evaluation, and continuation sequencing.
pub mod orchestrator;

pub use orchestrator::Orchestrator;
