//! Lenient accessor-path resolution over JSON values.
//!
//! Paths use dotted and bracketed segments interchangeably:
//! `"a.b"`, `"a[0].b"`, and `"a.0.b"` all address the same value when `a`
//! is an array of objects.

use serde_json::Value;

/// Walk an accessor path over a JSON value.
///
/// The path is split on `.`, `[`, and `]` into non-empty segments. For each
/// segment:
///
/// - an array requires the segment to parse as a `usize` index;
/// - an object reads the segment as a field name;
/// - any other shape (string, number, bool, null) ends the walk.
///
/// Every miss returns `None`. This never panics and never errors — action
/// arguments routinely reference optional fields, and the engine must not
/// fail-closed on a single absent value.
///
/// An empty path (no segments) returns `None`.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use trellis_expression::resolve_path;
///
/// let root = json!({"a": [{"b": 2}]});
/// assert_eq!(resolve_path(&root, "a[0].b"), Some(&json!(2)));
/// assert_eq!(resolve_path(&root, "a[1].b"), None);
/// ```
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut segments = path
        .split(['.', '[', ']'])
        .filter(|s| !s.is_empty())
        .peekable();
    segments.peek()?;

    let mut current = root;
    for segment in segments {
        current = match current {
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            Value::Object(map) => map.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}
