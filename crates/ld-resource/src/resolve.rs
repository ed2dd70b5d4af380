//! Reference resolution.
//!
//! Resolution walks a node's attribute tree and replaces reference values
//! with [`NodeRef`] handles. Identifiers not yet in the [`ReferenceMap`]
//! get a stub node, which is added to the map so later references to the
//! same identifier share the handle.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::context::ContextHandle;
use crate::model::{Identifier, Node, NodeRef, Shape, Value};

/// Identifier → handle map threaded through a resolution pass.
///
/// Holds at most one handle per identifier. Mutation requires `&mut`, so a
/// pass has a single writer; wrap the map in a lock to share it between
/// threads.
#[derive(Debug, Clone, Default)]
pub struct ReferenceMap {
    handles: FxHashMap<Identifier, NodeRef>,
}

impl ReferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&NodeRef> {
        self.handles.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handles.contains_key(id)
    }

    /// Registers a handle, replacing any previous one for the identifier.
    pub fn insert(&mut self, id: impl Into<Identifier>, handle: NodeRef) -> Option<NodeRef> {
        self.handles.insert(id.into(), handle)
    }

    /// Registers a loaded node under its identifier. Anonymous nodes without
    /// an identifier are wrapped but not registered.
    pub fn insert_node(&mut self, node: Node) -> NodeRef {
        let handle = node.into_ref();
        if let Some(id) = handle.id() {
            self.handles.insert(id.clone(), handle.clone());
        }
        handle
    }

    /// Returns the handle for `id`, creating it with `make` if absent.
    pub fn get_or_insert_with(&mut self, id: &str, make: impl FnOnce() -> Node) -> NodeRef {
        if let Some(handle) = self.handles.get(id) {
            return handle.clone();
        }
        let handle = make().into_ref();
        self.handles.insert(id.to_string(), handle.clone());
        handle
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &NodeRef)> {
        self.handles.iter()
    }
}

impl Node {
    /// Replaces references in this node's attributes with node handles.
    ///
    /// Identifier and type properties are skipped. Does nothing if the node
    /// is already resolved.
    pub fn resolve(&mut self, refs: &mut ReferenceMap) -> &mut Self {
        if self.resolved {
            return self;
        }

        debug!(id = ?self.id, attributes = self.attributes.len(), "resolving node");
        let known = refs.len();
        for (key, value) in self.attributes.iter_mut() {
            if self.context.is_id_key(key) || self.context.is_type_key(key) {
                continue;
            }
            resolve_value(value, &self.context, refs);
        }
        self.resolved = true;
        debug!(id = ?self.id, stubs = refs.len() - known, "resolved node");

        self
    }
}

fn resolve_value(value: &mut Value, context: &ContextHandle, refs: &mut ReferenceMap) {
    match value.classify(context.id_key()) {
        Shape::Reference(id) => {
            let handle = refs.get_or_insert_with(&id, || {
                debug!(id = %id, "creating stub");
                Node::stub(id.as_str(), context.clone())
            });
            *value = Value::Node(handle);
        }
        Shape::Sequence => {
            if let Value::Sequence(items) = value {
                for item in items.iter_mut() {
                    resolve_value(item, context, refs);
                }
            }
        }
        Shape::InlineComposite => {
            if let Value::Composite(map) = value {
                for child in map.values_mut() {
                    resolve_value(child, context, refs);
                }
            }
        }
        Shape::Scalar | Shape::Handle => {}
    }
}
