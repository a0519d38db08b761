//! # Value Validation
//!
//! Checks a candidate value against the rule declared for its key. Only the
//! shape of the value itself is checked here; the contents of a nested
//! mapping are validated when the node re-homes it under the nested schema.

use errors::{SchemaError, SchemaResult};
use tracing::debug;

use crate::schema::Rule;
use crate::value::Value;

/// Validate `value` against `rule`. No rule (free mode) always passes.
pub fn validate(key: &str, rule: Option<&Rule>, value: &Value) -> SchemaResult<()> {
    let Some(rule) = rule else {
        return Ok(());
    };

    let accepted = match rule {
        Rule::AnyDict | Rule::Nested(_) => matches!(value, Value::Node(_)),
        Rule::AnyList => matches!(value, Value::List(_)),
        Rule::Type(t) => t.matches(value),
    };

    if accepted {
        Ok(())
    } else {
        debug!("Rejected value for '{}': expected {}, got {}", key, rule.expected(), value.kind());
        Err(SchemaError::type_mismatch(key, rule.expected(), value.kind().name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ConfigNode;
    use crate::schema::Schema;

    #[test]
    fn test_no_rule_accepts_anything() {
        assert!(validate("x", None, &Value::Null).is_ok());
        assert!(validate("x", None, &Value::Int(1)).is_ok());
    }

    #[test]
    fn test_dict_rules_require_node() {
        let node = Value::Node(ConfigNode::new());
        assert!(validate("meta", Some(&Rule::AnyDict), &node).is_ok());
        assert!(validate("user", Some(&Rule::Nested(Schema::new())), &node).is_ok());

        let err = validate("meta", Some(&Rule::AnyDict), &Value::from("x")).unwrap_err();
        assert_eq!(err, SchemaError::type_mismatch("meta", "object", "string"));
    }

    #[test]
    fn test_list_rule_requires_list() {
        assert!(validate("skills", Some(&Rule::AnyList), &Value::from(vec![1, 2])).is_ok());

        let err = validate("skills", Some(&Rule::AnyList), &Value::from("x")).unwrap_err();
        assert_eq!(err, SchemaError::type_mismatch("skills", "list", "string"));
    }

    #[test]
    fn test_type_rule_has_no_numeric_coercion() {
        assert!(validate("ratio", Some(&Rule::FLOAT), &Value::Float(0.5)).is_ok());

        let err = validate("ratio", Some(&Rule::FLOAT), &Value::Int(1)).unwrap_err();
        assert_eq!(err, SchemaError::type_mismatch("ratio", "float", "int"));

        let err = validate("age", Some(&Rule::INT), &Value::Float(21.0)).unwrap_err();
        assert_eq!(err, SchemaError::type_mismatch("age", "int", "float"));
    }

    #[test]
    fn test_type_rule_rejects_null() {
        let err = validate("name", Some(&Rule::STRING), &Value::Null).unwrap_err();
        assert_eq!(err, SchemaError::type_mismatch("name", "string", "null"));
    }
}
