//! # Configuration Nodes
//!
//! [`ConfigNode`] is the recursive tree behind a loaded configuration. Each
//! node owns its entries exclusively and optionally carries a [`Schema`]:
//!
//! - **Free mode** (no schema): any key is accepted, reading a missing key
//!   creates an empty child node, mappings are wrapped into free nodes.
//! - **Strict mode** (schema present): only declared keys are accepted and
//!   every write is validated against the key's [`Rule`]. Children created
//!   under a nested-schema rule carry that schema; children created under
//!   an any-dict rule are free.
//!
//! Reading comes in two flavours. [`ConfigNode::peek`] never mutates, while
//! [`ConfigNode::get_child`] auto-creates missing container keys. Neither
//! hands out a mutable value: entries only change through validated writes.
//!
//! A node has no internal locking. Sharing one tree between threads requires
//! the caller to guard it (for example with a `Mutex`).

use std::fmt;

use errors::{ROOT_PATH, SchemaError, SchemaResult};
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::schema::{Rule, Schema};
use crate::validator::validate;
use crate::value::{Value, ValueKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigNode {
    entries: IndexMap<String, Value>,
    schema: Option<Schema>,
}

impl ConfigNode {
    /// Create an empty free-mode node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty strict-mode node bound to `schema`.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            entries: IndexMap::new(),
            schema: Some(schema),
        }
    }

    /// Build a node from a plain document.
    ///
    /// # M-CANONICAL-DOCS
    ///
    /// ## Purpose
    /// Turns the plain structure produced by a format adapter into a tree,
    /// applying the same wrapping and validation as [`ConfigNode::replace`].
    ///
    /// ## Usage
    /// ```rust
    /// use loadstructure::{ConfigNode, Rule, Schema};
    /// use serde_json::json;
    ///
    /// let schema = Schema::new().field("port", Rule::INT);
    /// let node = ConfigNode::from_plain(json!({"port": 8080}), Some(schema)).unwrap();
    /// assert_eq!(node.to_plain(), json!({"port": 8080}));
    /// ```
    ///
    /// ## Error Handling
    /// Returns `SchemaError::TypeMismatch` when `plain` is not a mapping and
    /// any schema error raised while validating its entries.
    pub fn from_plain(plain: JsonValue, schema: Option<Schema>) -> SchemaResult<Self> {
        match plain {
            JsonValue::Object(map) => {
                let mut node = Self {
                    entries: IndexMap::new(),
                    schema,
                };
                node.replace(map)?;
                Ok(node)
            }
            other => Err(SchemaError::type_mismatch(
                ROOT_PATH,
                ValueKind::Object.name(),
                ValueKind::of_plain(&other).name(),
            )),
        }
    }

    pub(crate) fn from_free_map(map: Map<String, JsonValue>) -> Self {
        Self {
            entries: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            schema: None,
        }
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn is_strict(&self) -> bool {
        self.schema.is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Read a key without creating it.
    pub fn peek(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Read a key, auto-creating it when missing.
    ///
    /// A missing key becomes an empty node in free mode, or in strict mode
    /// when its rule is a mapping rule. A missing key whose rule demands a
    /// list or a primitive fails with `CannotAutoCreate`; a key absent from
    /// the schema fails with `UnknownKey`.
    ///
    /// The returned value is read-only. Entries change only through
    /// [`ConfigNode::set_child`] and the other validated writes:
    ///
    /// ```rust,compile_fail
    /// use loadstructure::{ConfigNode, Schema, Value};
    ///
    /// let mut cfg = ConfigNode::with_schema(Schema::new().field("user", Schema::new()));
    /// *cfg.get_child("user").unwrap() = Value::from("not an object");
    /// ```
    pub fn get_child(&mut self, key: &str) -> SchemaResult<&Value> {
        self.vivified(key).map(|value| &*value)
    }

    fn vivified(&mut self, key: &str) -> SchemaResult<&mut Value> {
        let rule = rule_for(self.schema.as_ref(), key)?;
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(slot) => Ok(slot.into_mut()),
            Entry::Vacant(slot) => {
                let child = vivify(key, rule)?;
                debug!("Auto-created config node '{}'", key);
                Ok(slot.insert(Value::Node(child)))
            }
        }
    }

    /// Like [`ConfigNode::get_child`] but also requires the value to be a
    /// node. This is the chaining form: `cfg.child_node("user")?.set_child(..)`.
    /// The child keeps its own schema, so writes through it are validated.
    pub fn child_node(&mut self, key: &str) -> SchemaResult<&mut ConfigNode> {
        match self.vivified(key)? {
            Value::Node(node) => Ok(node),
            other => Err(SchemaError::type_mismatch(
                key,
                ValueKind::Object.name(),
                other.kind().name(),
            )),
        }
    }

    /// Write a value under `key`.
    ///
    /// In strict mode the key must be declared and the value must satisfy its
    /// rule; on failure the existing entry is left untouched. Mappings stored
    /// under a nested-schema rule are re-validated against that schema.
    pub fn set_child(&mut self, key: impl Into<String>, value: impl Into<Value>) -> SchemaResult<()> {
        let key = key.into();
        let rule = rule_for(self.schema.as_ref(), &key)?;
        let wrapped = wrap(&key, rule, value.into())?;
        self.entries.insert(key, wrapped);
        Ok(())
    }

    /// Apply [`ConfigNode::set_child`] for each entry in order.
    ///
    /// Not atomic: when a later entry fails, earlier entries stay written.
    /// Use [`ConfigNode::replace`] for all-or-nothing writes.
    pub fn update<I, K, V>(&mut self, entries: I) -> SchemaResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in entries {
            self.set_child(key, value)?;
        }
        Ok(())
    }

    /// Replace every entry of this node.
    ///
    /// All entries are validated and wrapped before anything is touched, so
    /// either the node holds exactly the new entries or it is unchanged.
    pub fn replace<I, K, V>(&mut self, entries: I) -> SchemaResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut staged = IndexMap::new();
        for (key, value) in entries {
            let key = key.into();
            let rule = rule_for(self.schema.as_ref(), &key)?;
            let wrapped = wrap(&key, rule, value.into())?;
            staged.insert(key, wrapped);
        }
        self.entries = staged;
        Ok(())
    }

    /// Unwrap the tree into plain mappings, lists and primitives.
    pub fn to_plain(&self) -> JsonValue {
        JsonValue::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.clone(), value.to_plain()))
                .collect(),
        )
    }

    /// Move this node under `schema`, re-validating entries if the schema
    /// differs from the one it already carries.
    fn rebind(self, schema: Option<Schema>) -> SchemaResult<Self> {
        match schema {
            None => Ok(Self {
                entries: self.entries,
                schema: None,
            }),
            Some(schema) if self.schema.as_ref() == Some(&schema) => Ok(self),
            Some(schema) => {
                let mut node = Self::with_schema(schema);
                node.replace(self.entries)?;
                Ok(node)
            }
        }
    }
}

/// Rule governing `key`: `None` in free mode, `UnknownKey` if strict and
/// undeclared.
pub(crate) fn rule_for<'s>(schema: Option<&'s Schema>, key: &str) -> SchemaResult<Option<&'s Rule>> {
    match schema {
        None => Ok(None),
        Some(schema) => schema
            .get(key)
            .map(Some)
            .ok_or_else(|| SchemaError::unknown_key(key)),
    }
}

fn vivify(key: &str, rule: Option<&Rule>) -> SchemaResult<ConfigNode> {
    match rule {
        None | Some(Rule::AnyDict) => Ok(ConfigNode::new()),
        Some(Rule::Nested(schema)) => Ok(ConfigNode::with_schema(schema.clone())),
        Some(rule @ (Rule::AnyList | Rule::Type(_))) => {
            Err(SchemaError::cannot_auto_create(key, rule.expected()))
        }
    }
}

fn wrap(key: &str, rule: Option<&Rule>, value: Value) -> SchemaResult<Value> {
    validate(key, rule, &value)?;
    match (rule, value) {
        (Some(Rule::Nested(schema)), Value::Node(node)) => node
            .rebind(Some(schema.clone()))
            .map(Value::Node)
            .map_err(|e| e.within(key)),
        (Some(Rule::AnyDict), Value::Node(node)) => node.rebind(None).map(Value::Node),
        (_, value) => Ok(value),
    }
}

impl fmt::Display for ConfigNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_plain())
    }
}

impl Serialize for ConfigNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a ConfigNode {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
