//! Conditional-expression data model and evaluator.
//!
//! A [`Condition`] is a serializable tree of leaf comparisons combined with
//! AND/OR groups. The same evaluator serves two call sites: UI field
//! visibility, and selecting which continuation chain fires after an action
//! completes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::resolve_path;

/// Comparison operator for a leaf condition.
///
/// Numeric operators (`Gt`/`Gte`/`Lt`/`Lte`) are only meaningful when both
/// operands are numeric; a type mismatch evaluates to `false`, never an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Strict equality, any types.
    Eq,
    /// Strict inequality, any types.
    Ne,
    /// Case-sensitive substring containment; both operands must be strings.
    Like,
    /// Case-insensitive substring containment; both operands must be strings.
    Ilike,
    /// Membership: the condition value must be an array containing the field value.
    In,
    /// Negated membership.
    Nin,
    /// Numeric greater-than.
    Gt,
    /// Numeric greater-than-or-equal.
    Gte,
    /// Numeric less-than.
    Lt,
    /// Numeric less-than-or-equal.
    Lte,
}

/// Leaf comparison: resolve `field` against the context, apply `operator`
/// with `value` as the right-hand side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Accessor path into the evaluation context (see [`resolve_path`]).
    pub field: String,
    /// The comparison to apply.
    pub operator: Operator,
    /// Right-hand operand.
    pub value: Value,
}

/// Combinator node: `and` requires all sub-conditions true, `or` requires
/// at least one. When both are present, both clauses must hold.
///
/// An empty or absent `and` is vacuously true; an empty or absent `or` is
/// vacuously false when it is the only clause present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionGroup {
    /// Conjunction clause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and: Option<Vec<Condition>>,
    /// Disjunction clause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or: Option<Vec<Condition>>,
}

/// A serializable condition tree: either a leaf [`Comparison`] or a
/// [`ConditionGroup`] of nested conditions.
///
/// The untagged representation matches the wire format: a leaf is an object
/// with `field`/`operator`/`value`, a group is an object with `and`/`or`.
/// Leaf is tried first so that group's all-optional shape cannot swallow
/// leaf objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    /// Leaf comparison.
    Compare(Comparison),
    /// AND/OR combinator.
    Group(ConditionGroup),
}

/// Evaluate a condition tree against a context value.
///
/// Pure: no side effects, identical inputs yield identical output. A field
/// that does not resolve in the context participates in comparisons as
/// `null` (`serde_json` has no `undefined`), which the string and numeric
/// operators reject.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use trellis_expression::{Condition, evaluate};
///
/// let cond: Condition = serde_json::from_value(json!({
///     "field": "user.age", "operator": "gte", "value": 30
/// })).unwrap();
/// assert!(evaluate(&cond, &json!({"user": {"age": 30}})));
/// assert!(!evaluate(&cond, &json!({"user": {"age": 29}})));
/// ```
pub fn evaluate(condition: &Condition, context: &Value) -> bool {
    match condition {
        Condition::Group(group) => evaluate_group(group, context),
        Condition::Compare(cmp) => evaluate_comparison(cmp, context),
    }
}

fn evaluate_group(group: &ConditionGroup, context: &Value) -> bool {
    // Vacuous truth of the empty AND, vacuous falsity of the empty OR:
    // the identities of the two folds, and pinned by tests.
    let and_holds = group
        .and
        .as_ref()
        .is_none_or(|cs| cs.iter().all(|c| evaluate(c, context)));
    match &group.or {
        Some(ors) => and_holds && ors.iter().any(|c| evaluate(c, context)),
        None => match &group.and {
            Some(_) => and_holds,
            // A group with neither key: nothing to satisfy.
            None => false,
        },
    }
}

fn evaluate_comparison(cmp: &Comparison, context: &Value) -> bool {
    let resolved = resolve_path(context, &cmp.field).unwrap_or(&Value::Null);
    match cmp.operator {
        Operator::Eq => resolved == &cmp.value,
        Operator::Ne => resolved != &cmp.value,
        Operator::Like => string_contains(resolved, &cmp.value, false),
        Operator::Ilike => string_contains(resolved, &cmp.value, true),
        Operator::In => cmp
            .value
            .as_array()
            .is_some_and(|items| items.contains(resolved)),
        Operator::Nin => cmp
            .value
            .as_array()
            .is_some_and(|items| !items.contains(resolved)),
        Operator::Gt => numeric(resolved, &cmp.value).is_some_and(|(a, b)| a > b),
        Operator::Gte => numeric(resolved, &cmp.value).is_some_and(|(a, b)| a >= b),
        Operator::Lt => numeric(resolved, &cmp.value).is_some_and(|(a, b)| a < b),
        Operator::Lte => numeric(resolved, &cmp.value).is_some_and(|(a, b)| a <= b),
    }
}

/// Substring containment; `false` unless both operands are strings.
fn string_contains(haystack: &Value, needle: &Value, case_insensitive: bool) -> bool {
    match (haystack.as_str(), needle.as_str()) {
        (Some(h), Some(n)) if case_insensitive => {
            h.to_lowercase().contains(&n.to_lowercase())
        }
        (Some(h), Some(n)) => h.contains(n),
        _ => false,
    }
}

/// Both operands as f64, or `None` on any type mismatch. No coercion.
fn numeric(a: &Value, b: &Value) -> Option<(f64, f64)> {
    Some((a.as_f64()?, b.as_f64()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn cond(v: Value) -> Condition {
        serde_json::from_value(v).unwrap()
    }

    // -- serde shape --

    #[test]
    fn leaf_deserializes_as_compare() {
        let c = cond(json!({"field": "a", "operator": "eq", "value": 1}));
        assert!(matches!(c, Condition::Compare(_)));
    }

    #[test]
    fn group_deserializes_as_group() {
        let c = cond(json!({"and": [{"field": "a", "operator": "eq", "value": 1}]}));
        assert!(matches!(c, Condition::Group(_)));
    }

    #[test]
    fn operator_wire_names() {
        for (name, op) in [
            ("eq", Operator::Eq),
            ("ne", Operator::Ne),
            ("like", Operator::Like),
            ("ilike", Operator::Ilike),
            ("in", Operator::In),
            ("nin", Operator::Nin),
            ("gt", Operator::Gt),
            ("gte", Operator::Gte),
            ("lt", Operator::Lt),
            ("lte", Operator::Lte),
        ] {
            let parsed: Operator = serde_json::from_value(json!(name)).unwrap();
            assert_eq!(parsed, op);
            assert_eq!(serde_json::to_value(op).unwrap(), json!(name));
        }
    }

    #[test]
    fn condition_round_trips() {
        let original = cond(json!({
            "or": [
                {"field": "a", "operator": "in", "value": [1, 2]},
                {"and": [{"field": "b", "operator": "ne", "value": null}]}
            ]
        }));
        let encoded = serde_json::to_value(&original).unwrap();
        assert_eq!(cond(encoded), original);
    }

    // -- leaf operators --

    #[test]
    fn eq_and_ne() {
        let ctx = json!({"status": "active", "count": 3});
        assert!(evaluate(
            &cond(json!({"field": "status", "operator": "eq", "value": "active"})),
            &ctx
        ));
        assert!(evaluate(
            &cond(json!({"field": "count", "operator": "ne", "value": 4})),
            &ctx
        ));
        assert!(!evaluate(
            &cond(json!({"field": "count", "operator": "eq", "value": "3"})),
            &ctx
        ));
    }

    #[test]
    fn nested_field_gte() {
        let c = cond(json!({"field": "user.age", "operator": "gte", "value": 30}));
        assert!(evaluate(&c, &json!({"user": {"age": 30}})));
        let c31 = cond(json!({"field": "user.age", "operator": "gte", "value": 31}));
        assert!(!evaluate(&c31, &json!({"user": {"age": 30}})));
    }

    #[test]
    fn numeric_type_mismatch_is_false() {
        let ctx = json!({"age": "30"});
        for op in ["gt", "gte", "lt", "lte"] {
            assert!(!evaluate(
                &cond(json!({"field": "age", "operator": op, "value": 18})),
                &ctx
            ));
        }
    }

    #[test]
    fn like_and_ilike() {
        let ctx = json!({"name": "Alice Smith"});
        assert!(evaluate(
            &cond(json!({"field": "name", "operator": "like", "value": "Smith"})),
            &ctx
        ));
        assert!(!evaluate(
            &cond(json!({"field": "name", "operator": "like", "value": "smith"})),
            &ctx
        ));
        assert!(evaluate(
            &cond(json!({"field": "name", "operator": "ilike", "value": "smith"})),
            &ctx
        ));
    }

    #[test]
    fn like_on_non_string_is_false() {
        let ctx = json!({"n": 5});
        assert!(!evaluate(
            &cond(json!({"field": "n", "operator": "like", "value": "5"})),
            &ctx
        ));
    }

    #[test]
    fn in_and_nin() {
        let ctx = json!({"role": "editor"});
        assert!(evaluate(
            &cond(json!({"field": "role", "operator": "in", "value": ["admin", "editor"]})),
            &ctx
        ));
        assert!(evaluate(
            &cond(json!({"field": "role", "operator": "nin", "value": ["admin"]})),
            &ctx
        ));
    }

    #[test]
    fn in_with_non_array_value_is_false() {
        let ctx = json!({"role": "editor"});
        assert!(!evaluate(
            &cond(json!({"field": "role", "operator": "in", "value": "editor"})),
            &ctx
        ));
    }

    // -- groups --

    #[test]
    fn empty_and_is_true() {
        assert!(evaluate(&cond(json!({"and": []})), &json!({})));
    }

    #[test]
    fn empty_or_is_false() {
        assert!(!evaluate(&cond(json!({"or": []})), &json!({})));
    }

    #[test]
    fn empty_group_is_false() {
        assert!(!evaluate(&Condition::Group(ConditionGroup::default()), &json!({})));
    }

    #[test]
    fn and_requires_all() {
        let c = cond(json!({"and": [
            {"field": "a", "operator": "eq", "value": 1},
            {"field": "b", "operator": "eq", "value": 2}
        ]}));
        assert!(evaluate(&c, &json!({"a": 1, "b": 2})));
        assert!(!evaluate(&c, &json!({"a": 1, "b": 9})));
    }

    #[test]
    fn or_requires_any() {
        let c = cond(json!({"or": [
            {"field": "a", "operator": "eq", "value": 1},
            {"field": "b", "operator": "eq", "value": 2}
        ]}));
        assert!(evaluate(&c, &json!({"a": 1, "b": 9})));
        assert!(!evaluate(&c, &json!({"a": 0, "b": 9})));
    }

    #[test]
    fn nested_groups() {
        let c = cond(json!({"and": [
            {"field": "kind", "operator": "eq", "value": "user"},
            {"or": [
                {"field": "age", "operator": "lt", "value": 13},
                {"field": "age", "operator": "gt", "value": 65}
            ]}
        ]}));
        assert!(evaluate(&c, &json!({"kind": "user", "age": 70})));
        assert!(!evaluate(&c, &json!({"kind": "user", "age": 30})));
        assert!(!evaluate(&c, &json!({"kind": "bot", "age": 70})));
    }

    #[test]
    fn missing_field_compares_as_null() {
        let ctx = json!({"present": 1});
        assert!(evaluate(
            &cond(json!({"field": "absent", "operator": "eq", "value": null})),
            &ctx
        ));
        assert!(!evaluate(
            &cond(json!({"field": "absent", "operator": "gte", "value": 0})),
            &ctx
        ));
    }

    #[test]
    fn evaluation_is_pure() {
        let c = cond(json!({"field": "x", "operator": "eq", "value": 1}));
        let ctx = json!({"x": 1});
        assert_eq!(evaluate(&c, &ctx), evaluate(&c, &ctx));
    }
}
