//! Attribute values.
//!
//! A value is either flat data (scalars, sequences, inline composites and
//! references) or, once its owning node is resolved, a live handle to another
//! node.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value as JsonValue};
use tracing::warn;

use crate::model::{Identifier, NodeRef};

/// Keyword for node identifiers.
pub const ID_KEYWORD: &str = "@id";

/// Keyword for node types.
pub const TYPE_KEYWORD: &str = "@type";

/// Keyword for an inline context declaration.
pub const CONTEXT_KEYWORD: &str = "@context";

/// Insertion-ordered property map of a node or inline composite.
pub type Attributes = IndexMap<String, Value>;

/// A property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Ordered sequence of values.
    Sequence(Vec<Value>),
    /// Inline object. Reference-shaped when its only key is the identifier key.
    Composite(Attributes),
    /// Handle to another node, produced by resolution.
    Node(NodeRef),
}

/// Shape of a value, as seen by the resolution walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    /// Pointer to the node with this identifier.
    Reference(Identifier),
    InlineComposite,
    Sequence,
    /// Already a node handle.
    Handle,
}

/// Returns true if `key` denotes the identifier, either as the keyword or
/// its context alias.
pub fn is_id_key(key: &str, id_alias: &str) -> bool {
    key == ID_KEYWORD || key == id_alias
}

impl Value {
    /// Builds a reference value `{ <id_key>: identifier }`.
    pub fn reference(id_key: &str, identifier: impl Into<Identifier>) -> Value {
        let mut map = Attributes::with_capacity(1);
        map.insert(id_key.to_string(), Value::String(identifier.into()));
        Value::Composite(map)
    }

    /// Classifies this value for resolution.
    ///
    /// `id_key` is the context's alias for `@id`; both spellings mark a
    /// reference.
    pub fn classify(&self, id_key: &str) -> Shape {
        match self {
            Value::Sequence(_) => Shape::Sequence,
            Value::Node(_) => Shape::Handle,
            Value::Composite(map) => match map.first() {
                Some((key, Value::String(id))) if map.len() == 1 && is_id_key(key, id_key) => {
                    Shape::Reference(id.clone())
                }
                _ => Shape::InlineComposite,
            },
            _ => Shape::Scalar,
        }
    }

    /// Returns true for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for a sequence with no elements.
    pub fn is_empty_sequence(&self) -> bool {
        matches!(self, Value::Sequence(items) if items.is_empty())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            Value::Node(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&Attributes> {
        match self {
            Value::Composite(map) => Some(map),
            _ => None,
        }
    }

    /// Converts flat JSON into a value.
    pub fn from_json(json: JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => Value::Number(n),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from_json).collect())
            }
            JsonValue::Object(map) => Value::Composite(attributes_from_json(map)),
        }
    }

    /// Converts this value to flat JSON.
    ///
    /// Node handles at any depth become references keyed by `id_key`. A
    /// handle to an unidentified node has nothing to refer by: it flattens
    /// to `null`, which normalization then drops, and a warning is logged.
    pub fn to_json(&self, id_key: &str) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(n) => JsonValue::Number(n.clone()),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Sequence(items) => {
                JsonValue::Array(items.iter().map(|v| v.to_json(id_key)).collect())
            }
            Value::Composite(map) => JsonValue::Object(attributes_to_json(map, id_key)),
            Value::Node(handle) => match handle.id() {
                Some(id) => {
                    let mut map = Map::new();
                    map.insert(id_key.to_string(), JsonValue::String(id.clone()));
                    JsonValue::Object(map)
                }
                None => {
                    warn!("dropping link to a node without an identifier");
                    JsonValue::Null
                }
            },
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<NodeRef> for Value {
    fn from(handle: NodeRef) -> Self {
        Value::Node(handle)
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        Value::from_json(json)
    }
}

/// Converts a flat JSON object into attributes, keeping key order.
pub fn attributes_from_json(map: Map<String, JsonValue>) -> Attributes {
    map.into_iter().map(|(k, v)| (k, Value::from_json(v))).collect()
}

/// Converts attributes into a flat JSON object.
pub fn attributes_to_json(attributes: &Attributes, id_key: &str) -> Map<String, JsonValue> {
    attributes
        .iter()
        .map(|(k, v)| (k.clone(), v.to_json(id_key)))
        .collect()
}
