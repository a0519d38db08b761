//! # Schema Rules
//!
//! A [`Schema`] maps each allowed key to a [`Rule`] describing what its value
//! may be: an exact primitive type, any mapping, a nested schema, or any list.
//!
//! Schemas can be built in code or parsed from a schema description document
//! such as:
//!
//! ```json
//! {
//!   "user": { "name": "string", "age": "int" },
//!   "skills": "list",
//!   "meta": "dict"
//! }
//! ```

use std::fmt;

use errors::{ROOT_PATH, SchemaError, SchemaResult};
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

use crate::value::{Value, ValueKind};

/// Primitive types a [`Rule::Type`] can demand. Matching is exact: an int is
/// not a float and a bool is not an int.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Bool,
    Int,
    Float,
    String,
}

impl PrimitiveType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
        }
    }

    pub fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value.kind()),
            (Self::Bool, ValueKind::Bool)
                | (Self::Int, ValueKind::Int)
                | (Self::Float, ValueKind::Float)
                | (Self::String, ValueKind::String)
        )
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Constraint on the value stored under one schema key.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Type(PrimitiveType),
    /// Any mapping; children are created without a schema.
    AnyDict,
    /// A mapping whose own keys are constrained by the nested schema.
    Nested(Schema),
    AnyList,
}

impl Rule {
    pub const BOOL: Rule = Rule::Type(PrimitiveType::Bool);
    pub const INT: Rule = Rule::Type(PrimitiveType::Int);
    pub const FLOAT: Rule = Rule::Type(PrimitiveType::Float);
    pub const STRING: Rule = Rule::Type(PrimitiveType::String);

    /// Name of the value kind this rule expects, as used in errors.
    pub fn expected(&self) -> &'static str {
        match self {
            Self::Type(t) => t.name(),
            Self::AnyDict | Self::Nested(_) => ValueKind::Object.name(),
            Self::AnyList => ValueKind::List.name(),
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::AnyDict | Self::Nested(_))
    }

    pub fn nested_schema(&self) -> Option<&Schema> {
        match self {
            Self::Nested(schema) => Some(schema),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let rule = match name.to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Self::BOOL,
            "int" | "integer" => Self::INT,
            "float" | "number" => Self::FLOAT,
            "str" | "string" => Self::STRING,
            "dict" | "object" | "map" => Self::AnyDict,
            "list" | "array" => Self::AnyList,
            _ => return None,
        };
        Some(rule)
    }

    fn to_plain(&self) -> JsonValue {
        match self {
            Self::Type(t) => JsonValue::from(t.name()),
            Self::AnyDict => JsonValue::from("dict"),
            Self::Nested(schema) => schema.to_plain(),
            Self::AnyList => JsonValue::from("list"),
        }
    }
}

impl From<PrimitiveType> for Rule {
    fn from(t: PrimitiveType) -> Self {
        Self::Type(t)
    }
}

impl From<Schema> for Rule {
    fn from(schema: Schema) -> Self {
        Self::Nested(schema)
    }
}

/// Allowed keys of a strict-mode node and the rule for each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    rules: IndexMap<String, Rule>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Schema::insert`].
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.insert(key, rule);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, rule: impl Into<Rule>) -> Option<Rule> {
        self.rules.insert(key.into(), rule.into())
    }

    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.rules.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Parse a schema description document.
    ///
    /// # M-CANONICAL-DOCS
    ///
    /// ## Purpose
    /// Lets a schema live next to the configuration it constrains, in any
    /// format the file loader understands.
    ///
    /// ## Rule names
    /// - `bool`/`boolean`, `int`/`integer`, `float`/`number`, `str`/`string`
    /// - `dict`/`object`/`map`: any mapping
    /// - `list`/`array`: any list
    /// - a nested mapping: nested schema
    ///
    /// ## Error Handling
    /// Returns `SchemaError::InvalidRule` naming the dotted key of the first
    /// unrecognised rule, and `SchemaError::TypeMismatch` when the document
    /// itself is not a mapping.
    pub fn from_plain(plain: &JsonValue) -> SchemaResult<Self> {
        let JsonValue::Object(map) = plain else {
            return Err(SchemaError::type_mismatch(
                ROOT_PATH,
                ValueKind::Object.name(),
                ValueKind::of_plain(plain).name(),
            ));
        };

        let mut schema = Self::new();
        for (key, description) in map {
            let rule = match description {
                JsonValue::String(name) => {
                    Rule::from_name(name).ok_or_else(|| SchemaError::InvalidRule {
                        path: key.clone(),
                        rule: name.clone(),
                    })?
                }
                JsonValue::Object(_) => {
                    Rule::Nested(Self::from_plain(description).map_err(|e| e.within(key))?)
                }
                other => {
                    return Err(SchemaError::InvalidRule {
                        path: key.clone(),
                        rule: other.to_string(),
                    });
                }
            };
            schema.insert(key.clone(), rule);
        }
        Ok(schema)
    }

    /// Inverse of [`Schema::from_plain`], using canonical rule names.
    pub fn to_plain(&self) -> JsonValue {
        let map: Map<String, JsonValue> = self
            .rules
            .iter()
            .map(|(key, rule)| (key.clone(), rule.to_plain()))
            .collect();
        JsonValue::Object(map)
    }
}

impl<K: Into<String>, R: Into<Rule>> FromIterator<(K, R)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        Self {
            rules: iter
                .into_iter()
                .map(|(key, rule)| (key.into(), rule.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_schema() -> Schema {
        Schema::new()
            .field(
                "user",
                Schema::new()
                    .field("name", PrimitiveType::String)
                    .field("age", PrimitiveType::Int),
            )
            .field("skills", Rule::AnyList)
            .field("meta", Rule::AnyDict)
    }

    #[test]
    fn test_primitive_matching_is_exact() {
        assert!(PrimitiveType::Int.matches(&Value::Int(1)));
        assert!(!PrimitiveType::Float.matches(&Value::Int(1)));
        assert!(!PrimitiveType::Int.matches(&Value::Float(1.0)));
        assert!(!PrimitiveType::Int.matches(&Value::Bool(true)));
        assert!(!PrimitiveType::String.matches(&Value::Null));
        assert!(PrimitiveType::Int.matches(&Value::UInt(u64::MAX)));
    }

    #[test]
    fn test_rule_expected_names() {
        assert_eq!(Rule::INT.expected(), "int");
        assert_eq!(Rule::AnyDict.expected(), "object");
        assert_eq!(Rule::Nested(Schema::new()).expected(), "object");
        assert_eq!(Rule::AnyList.expected(), "list");
    }

    #[test]
    fn test_from_plain_parses_nested_document() {
        let plain = json!({
            "user": {"name": "str", "age": "integer"},
            "skills": "array",
            "meta": "dict"
        });
        assert_eq!(Schema::from_plain(&plain).unwrap(), user_schema());
    }

    #[test]
    fn test_from_plain_rejects_unknown_rule() {
        let plain = json!({"user": {"age": "decimal"}});
        let err = Schema::from_plain(&plain).unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidRule {
                path: "user.age".to_string(),
                rule: "decimal".to_string()
            }
        );
    }

    #[test]
    fn test_from_plain_rejects_non_string_rule() {
        let err = Schema::from_plain(&json!({"port": 8080})).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidRule { .. }));
    }

    #[test]
    fn test_from_plain_requires_mapping() {
        let err = Schema::from_plain(&json!(["int"])).unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { .. }));
    }

    #[test]
    fn test_to_plain_uses_canonical_names() {
        let plain = user_schema().to_plain();
        assert_eq!(
            plain,
            json!({
                "user": {"name": "string", "age": "int"},
                "skills": "list",
                "meta": "dict"
            })
        );
        assert_eq!(Schema::from_plain(&plain).unwrap(), user_schema());
    }

    #[test]
    fn test_from_iterator() {
        let schema: Schema = [("a", Rule::INT), ("b", Rule::AnyList)].into_iter().collect();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.get("b"), Some(&Rule::AnyList));
        assert!(!schema.contains_key("c"));
    }
}
