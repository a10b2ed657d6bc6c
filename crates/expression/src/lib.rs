//! # Trellis Expression
//!
//! The pure evaluation layer of the Trellis action engine: a lenient path
//! resolver over JSON values and a recursive evaluator for serializable
//! conditional expressions.
//!
//! Both halves are deliberately exception-free. Action trees routinely
//! reference optional or absent fields, and a single missing value must not
//! fail an entire dispatch — every miss resolves to "no value" and every
//! malformed comparison evaluates to `false`.
//!
//! ## Core items
//!
//! - [`resolve_path`] — dotted/bracketed accessor walk over a [`serde_json::Value`]
//! - [`Condition`] — the serializable condition tree (leaf comparisons,
//!   AND/OR groups)
//! - [`evaluate`] — pure recursive evaluation of a [`Condition`] against a
//!   context value

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Conditional-expression data model and evaluator.
pub mod condition;
/// Lenient accessor-path resolution over JSON values.
pub mod path;

pub use condition::{Comparison, Condition, ConditionGroup, Operator, evaluate};
pub use path::resolve_path;
