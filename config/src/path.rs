//! # Dotted Paths
//!
//! `"editor.font.size"`-style addressing on top of [`ConfigNode`].
//!
//! Reads through [`ConfigNode::resolve_path`] never mutate the tree. Writes
//! through [`ConfigNode::set_path`] walk the same auto-creation and schema
//! rules as single-key access, so strictness does not depend on how a key is
//! addressed. A failed write can leave intermediate nodes created before the
//! failing segment in place.

use errors::{SchemaError, SchemaResult};

use crate::node::{ConfigNode, rule_for};
use crate::value::Value;

/// Split a dotted path into its segments. Empty segments are rejected.
pub fn split_path(raw: &str) -> SchemaResult<Vec<&str>> {
    let segments: Vec<&str> = raw.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(SchemaError::invalid_path(raw));
    }
    Ok(segments)
}

impl ConfigNode {
    /// Look up a dotted path without creating anything.
    ///
    /// Returns `Ok(None)` when a segment is missing or an intermediate value
    /// is not a node.
    pub fn resolve_path(&self, dotted: &str) -> SchemaResult<Option<&Value>> {
        let segments = split_path(dotted)?;
        let Some((last, parents)) = segments.split_last() else {
            return Err(SchemaError::invalid_path(dotted));
        };

        let mut node = self;
        for segment in parents {
            match node.peek(segment) {
                Some(Value::Node(child)) => node = child,
                _ => return Ok(None),
            }
        }
        Ok(node.peek(last))
    }

    /// [`ConfigNode::resolve_path`] with a fallback value.
    pub fn resolve_path_or<'a>(&'a self, dotted: &str, default: &'a Value) -> SchemaResult<&'a Value> {
        Ok(self.resolve_path(dotted)?.unwrap_or(default))
    }

    /// Write `value` at a dotted path, auto-creating intermediate nodes.
    ///
    /// # M-CANONICAL-DOCS
    ///
    /// ## Purpose
    /// Deep assignment without manual traversal. Every intermediate segment
    /// must be a container: in strict mode a segment whose rule is a list or
    /// primitive fails with `CannotAutoCreate`, and in any mode an existing
    /// non-node value fails with `TypeMismatch` rather than being overwritten.
    ///
    /// ## Usage
    /// ```rust
    /// use loadstructure::{ConfigNode, Value};
    ///
    /// let mut cfg = ConfigNode::new();
    /// cfg.set_path("editor.font.size", 14).unwrap();
    /// assert_eq!(cfg.resolve_path("editor.font.size").unwrap(), Some(&Value::Int(14)));
    /// ```
    ///
    /// ## Error Handling
    /// Errors carry the full dotted path up to the failing segment.
    pub fn set_path(&mut self, dotted: &str, value: impl Into<Value>) -> SchemaResult<()> {
        let segments = split_path(dotted)?;
        let Some((last, parents)) = segments.split_last() else {
            return Err(SchemaError::invalid_path(dotted));
        };

        let mut node = self;
        for (depth, segment) in parents.iter().enumerate() {
            node = node
                .descend(segment)
                .map_err(|e| e.within(&segments[..depth].join(".")))?;
        }
        node.set_child(*last, value)
            .map_err(|e| e.within(&parents.join(".")))
    }

    fn descend(&mut self, segment: &str) -> SchemaResult<&mut ConfigNode> {
        if let Some(rule) = rule_for(self.schema(), segment)? {
            if !rule.is_container() {
                return Err(SchemaError::cannot_auto_create(segment, rule.expected()));
            }
        }
        self.child_node(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PrimitiveType, Rule, Schema};
    use serde_json::json;

    fn editor_schema() -> Schema {
        Schema::new()
            .field(
                "editor",
                Schema::new().field(
                    "font",
                    Schema::new()
                        .field("size", PrimitiveType::Int)
                        .field("family", PrimitiveType::String),
                ),
            )
            .field("tags", Rule::AnyList)
            .field("extra", Rule::AnyDict)
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("a.b.c").unwrap(), ["a", "b", "c"]);
        assert_eq!(split_path("single").unwrap(), ["single"]);
    }

    #[test]
    fn test_split_path_rejects_empty_segments() {
        for raw in ["", ".", "a..b", ".a", "a."] {
            assert_eq!(split_path(raw).unwrap_err(), SchemaError::invalid_path(raw));
        }
    }

    #[test]
    fn test_set_then_resolve() {
        let mut cfg = ConfigNode::new();
        cfg.set_path("x.y.z", 5).unwrap();
        assert_eq!(cfg.resolve_path("x.y.z").unwrap(), Some(&Value::Int(5)));
        assert_eq!(cfg.to_plain(), json!({"x": {"y": {"z": 5}}}));
    }

    #[test]
    fn test_resolve_missing_returns_default_without_mutation() {
        let mut cfg = ConfigNode::new();
        cfg.set_path("x.y.z", 5).unwrap();
        let before = cfg.clone();

        let fallback = Value::from("fallback");
        assert_eq!(cfg.resolve_path_or("x.y.missing", &fallback).unwrap(), &fallback);
        assert_eq!(cfg.resolve_path("nope.deeper").unwrap(), None);
        assert_eq!(cfg, before);
    }

    #[test]
    fn test_resolve_through_primitive_is_none() {
        let mut cfg = ConfigNode::new();
        cfg.set_child("name", "Anmol").unwrap();
        assert_eq!(cfg.resolve_path("name.first").unwrap(), None);
    }

    #[test]
    fn test_resolve_invalid_path() {
        let cfg = ConfigNode::new();
        assert!(matches!(
            cfg.resolve_path("a..b"),
            Err(SchemaError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_set_path_strict() {
        let mut cfg = ConfigNode::with_schema(editor_schema());
        cfg.set_path("editor.font.size", 14).unwrap();
        cfg.set_path("editor.font.family", "Consolas").unwrap();
        cfg.set_path("extra.anything.goes", true).unwrap();
        assert_eq!(
            cfg.to_plain(),
            json!({
                "editor": {"font": {"size": 14, "family": "Consolas"}},
                "extra": {"anything": {"goes": true}}
            })
        );
    }

    #[test]
    fn test_set_path_errors_carry_full_path() {
        let mut cfg = ConfigNode::with_schema(editor_schema());

        assert_eq!(
            cfg.set_path("editor.font.size", "big").unwrap_err(),
            SchemaError::type_mismatch("editor.font.size", "int", "string")
        );
        assert_eq!(
            cfg.set_path("editor.colour.name", "red").unwrap_err(),
            SchemaError::unknown_key("editor.colour")
        );
        assert_eq!(
            cfg.set_path("editor.font.size.px", 3).unwrap_err(),
            SchemaError::cannot_auto_create("editor.font.size", "int")
        );
        assert_eq!(
            cfg.set_path("tags.first", "x").unwrap_err(),
            SchemaError::cannot_auto_create("tags", "list")
        );
    }

    #[test]
    fn test_failed_set_path_keeps_created_intermediates() {
        let mut cfg = ConfigNode::with_schema(editor_schema());
        assert!(cfg.set_path("editor.font.size", "big").is_err());
        assert_eq!(cfg.to_plain(), json!({"editor": {"font": {}}}));
    }

    #[test]
    fn test_set_path_does_not_overwrite_primitive_intermediate() {
        let mut cfg = ConfigNode::new();
        cfg.set_child("editor", "vim").unwrap();
        assert_eq!(
            cfg.set_path("editor.font", "mono").unwrap_err(),
            SchemaError::type_mismatch("editor", "object", "string")
        );
        assert_eq!(cfg.peek("editor"), Some(&Value::from("vim")));
    }

    #[test]
    fn test_single_segment_matches_set_child() {
        let mut by_path = ConfigNode::with_schema(editor_schema());
        let mut by_key = ConfigNode::with_schema(editor_schema());
        assert_eq!(
            by_path.set_path("nope", 1).unwrap_err(),
            by_key.set_child("nope", 1).unwrap_err()
        );
        by_path.set_path("tags", vec!["a"]).unwrap();
        by_key.set_child("tags", vec!["a"]).unwrap();
        assert_eq!(by_path, by_key);
    }
}
