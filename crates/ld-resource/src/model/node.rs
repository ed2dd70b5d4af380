//! Graph nodes and node handles.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde_json::Value as JsonValue;

use crate::context::{ContextHandle, ContextRegistry};
use crate::error::{ResourceError, Result};
use crate::model::id::is_anonymous;
use crate::model::value::{attributes_from_json, attributes_to_json};
use crate::model::{Attributes, Identifier, NodeOptions, Value};

/// A graph vertex: identifier, attributes, context and lifecycle flags.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: Option<Identifier>,
    pub(crate) attributes: Attributes,
    pub(crate) context: ContextHandle,
    pub(crate) clean: bool,
    pub(crate) new: bool,
    pub(crate) reconciled: bool,
    pub(crate) resolved: bool,
    pub(crate) stub: bool,
    pub(crate) anonymous: bool,
}

impl Node {
    /// Creates a node from a raw flat map, resolving its context through
    /// `registry`.
    pub fn new(raw: Attributes, options: &NodeOptions, registry: &ContextRegistry) -> Result<Self> {
        let context = registry.get_or_create(&options.context)?;
        Self::with_context(raw, options, context)
    }

    /// Creates a node from a flat JSON object.
    pub fn from_json(json: JsonValue, options: &NodeOptions, registry: &ContextRegistry) -> Result<Self> {
        match json {
            JsonValue::Object(map) => Self::new(attributes_from_json(map), options, registry),
            other => Err(ResourceError::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }

    /// Creates a node with an already resolved context. `options.context`
    /// is ignored.
    pub fn with_context(raw: Attributes, options: &NodeOptions, context: ContextHandle) -> Result<Self> {
        let attributes = if options.compact {
            let expanded = JsonValue::Object(attributes_to_json(&raw, context.id_key()));
            attributes_from_json(context.compact(&expanded)?)
        } else {
            raw
        };

        let id = attributes
            .iter()
            .find(|(key, _)| context.is_id_key(key))
            .and_then(|(_, value)| value.as_str())
            .map(str::to_string);
        let anonymous = is_anonymous(id.as_deref());

        Ok(Self {
            id,
            attributes,
            context,
            clean: options.clean,
            new: options.new,
            reconciled: options.is_reconciled(),
            resolved: false,
            stub: options.stub,
            anonymous,
        })
    }

    /// Creates a stub standing in for the node named `id`.
    ///
    /// The stub holds only its identifier and is dirty, new and unreconciled.
    pub fn stub(id: impl Into<Identifier>, context: ContextHandle) -> Self {
        let id = id.into();
        let mut attributes = Attributes::with_capacity(1);
        attributes.insert(context.id_key().to_string(), Value::String(id.clone()));
        let anonymous = is_anonymous(Some(&id));

        Self {
            id: Some(id),
            attributes,
            context,
            clean: false,
            new: true,
            reconciled: false,
            resolved: false,
            stub: true,
            anonymous,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn context(&self) -> &ContextHandle {
        &self.context
    }

    /// Returns the value of a property, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Sets a property, returning the previous value. Does not change
    /// lifecycle flags.
    ///
    /// The identifier is fixed at construction; setting the identifier key
    /// (either spelling) fails with [`ResourceError::IdentifierKey`].
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<Option<Value>> {
        let name = name.into();
        if self.context.is_id_key(&name) {
            return Err(ResourceError::IdentifierKey { key: name });
        }
        Ok(self.attributes.insert(name, value.into()))
    }

    /// The node matches its stored copy.
    pub fn is_clean(&self) -> bool {
        self.clean
    }

    pub fn is_dirty(&self) -> bool {
        !self.clean
    }

    /// The identifier has been matched against the store.
    pub fn is_reconciled(&self) -> bool {
        self.reconciled
    }

    /// All references have been replaced with node handles.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// The node has no identifier or a blank-node identifier.
    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// The node is a placeholder that has not been loaded.
    pub fn is_stub(&self) -> bool {
        self.stub
    }

    /// The node has not been saved yet.
    pub fn is_new(&self) -> bool {
        self.new
    }

    /// Marks the node as saved and in sync with the store.
    pub fn mark_clean(&mut self) -> &mut Self {
        self.clean = true;
        self.new = false;
        self
    }

    pub fn mark_reconciled(&mut self) -> &mut Self {
        self.reconciled = true;
        self
    }

    /// Wraps this node in a shared handle.
    pub fn into_ref(self) -> NodeRef {
        NodeRef::new(self)
    }
}

/// Shared handle to a node.
///
/// The target identifier is kept outside the lock so handles can be
/// flattened to references without locking the target.
#[derive(Clone)]
pub struct NodeRef {
    id: Option<Identifier>,
    inner: Arc<RwLock<Node>>,
}

impl NodeRef {
    pub fn new(node: Node) -> Self {
        Self {
            id: node.id.clone(),
            inner: Arc::new(RwLock::new(node)),
        }
    }

    pub fn id(&self) -> Option<&Identifier> {
        self.id.as_ref()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Node> {
        self.inner.read()
    }

    /// Exclusive access, required for `resolve` and `merge`.
    pub fn write(&self) -> RwLockWriteGuard<'_, Node> {
        self.inner.write()
    }

    /// Returns true if both handles point at the same node.
    pub fn ptr_eq(&self, other: &NodeRef) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "NodeRef({id})"),
            None => f.write_str("NodeRef(_)"),
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::{people, registry};

    #[test]
    fn test_construct_from_json() {
        let registry = registry();
        let node = Node::from_json(
            json!({"id": "https://example.org/x", "name": "X"}),
            &people(),
            &registry,
        )
        .unwrap();

        assert_eq!(node.id(), Some("https://example.org/x"));
        assert_eq!(node.get("name"), Some(&Value::from("X")));
        assert_eq!(node.get("missing"), None);
        assert!(!node.is_anonymous());
        assert!(!node.is_resolved());
        assert!(node.is_dirty());
        assert!(node.is_new());
        assert!(!node.is_reconciled());
        assert!(!node.is_stub());
        assert_eq!(node.context().name(), "people");
    }

    #[test]
    fn test_anonymous_nodes() {
        let registry = registry();
        let blank = Node::from_json(json!({"id": "_:b0"}), &people(), &registry).unwrap();
        assert!(blank.is_anonymous());

        let missing = Node::from_json(json!({"name": "nobody"}), &people(), &registry).unwrap();
        assert!(missing.is_anonymous());
        assert_eq!(missing.id(), None);
    }

    #[test]
    fn test_keyword_identifier_is_recognized() {
        let registry = registry();
        let node = Node::from_json(json!({"@id": "urn:a"}), &people(), &registry).unwrap();
        assert_eq!(node.id(), Some("urn:a"));
    }

    #[test]
    fn test_flags_from_options() {
        let registry = registry();
        let options = people().clean(true).new_node(false);
        let node = Node::from_json(json!({"id": "urn:a"}), &options, &registry).unwrap();
        assert!(node.is_clean());
        assert!(!node.is_new());
        assert!(node.is_reconciled());
        assert!(!node.is_resolved());
    }

    #[test]
    fn test_compact_from_expanded_form() {
        let registry = registry();
        let expanded = json!({
            "@id": "urn:a",
            "http://schema.org/name": "Alice",
            "http://xmlns.com/foaf/0.1/knows": {"@id": "urn:b"}
        });
        let node = Node::from_json(expanded, &people().compact(true), &registry).unwrap();

        assert_eq!(node.id(), Some("urn:a"));
        assert_eq!(node.get("name"), Some(&Value::from("Alice")));
        assert_eq!(node.get("knows"), Some(&Value::reference("id", "urn:b")));
    }

    #[test]
    fn test_unknown_context_fails_construction() {
        let registry = registry();
        let err = Node::from_json(json!({}), &NodeOptions::new("nope"), &registry).unwrap_err();
        assert!(matches!(err, ResourceError::ContextResolution { .. }));
    }

    #[test]
    fn test_non_object_rejected() {
        let registry = registry();
        let err = Node::from_json(json!(["urn:a"]), &people(), &registry).unwrap_err();
        assert_eq!(err, ResourceError::NotAnObject { found: "array" });
    }

    #[test]
    fn test_set_property() {
        let registry = registry();
        let mut node = Node::from_json(json!({"id": "urn:a", "name": "A"}), &people(), &registry).unwrap();

        assert_eq!(node.set("name", "B"), Ok(Some(Value::from("A"))));
        assert_eq!(node.set("city", "Paris"), Ok(None));
        assert_eq!(node.get("name"), Some(&Value::from("B")));
        assert!(node.is_dirty());
    }

    #[test]
    fn test_set_refuses_identifier() {
        let registry = registry();
        let handle = Node::from_json(json!({"id": "urn:b"}), &people(), &registry)
            .unwrap()
            .into_ref();

        for key in ["id", "@id"] {
            let err = handle.write().set(key, "_:b9").unwrap_err();
            assert_eq!(err, ResourceError::IdentifierKey { key: key.to_string() });
        }

        let node = handle.read();
        assert_eq!(node.id(), Some("urn:b"));
        assert_eq!(node.get("id"), Some(&Value::from("urn:b")));
        assert_eq!(node.get("@id"), None);
        assert!(!node.is_anonymous());
        assert_eq!(handle.id().map(String::as_str), Some("urn:b"));
    }

    #[test]
    fn test_stub() {
        let registry = registry();
        let ctx = registry.get_or_create("people").unwrap();
        let stub = Node::stub("urn:b", ctx);
        assert!(stub.is_stub());
        assert!(!stub.is_clean());
        assert!(stub.is_new());
        assert_eq!(stub.id(), Some("urn:b"));
        assert_eq!(stub.attributes().len(), 1);
    }

    #[test]
    fn test_node_ref_identity() {
        let registry = registry();
        let ctx = registry.get_or_create("people").unwrap();
        let a = Node::stub("urn:b", Arc::clone(&ctx)).into_ref();
        let b = a.clone();
        let c = Node::stub("urn:b", ctx).into_ref();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(format!("{a:?}"), "NodeRef(urn:b)");

        a.write().mark_clean();
        assert!(b.read().is_clean());
    }
}
