//! Linked-data resource graph with reference resolution.
//!
//! This crate keeps an in-memory graph of linked-data nodes that refer to
//! each other by identifier, and converts between two representations:
//!
//! - **Flat form**: references are plain `{ "id": ... }` objects, suitable
//!   for storage and transfer.
//! - **Resolved form**: references are replaced by shared [`NodeRef`]
//!   handles, suitable for traversal.
//!
//! # Quick Start
//!
//! ```rust
//! use ld_resource::{ContextRegistry, Node, NodeOptions, ReferenceMap, TermNormalizer, Value};
//! use serde_json::json;
//!
//! // Contexts are parsed once per name and shared between nodes
//! let normalizer = TermNormalizer::new().with_document(
//!     "people",
//!     json!({"id": "@id", "knows": "http://xmlns.com/foaf/0.1/knows"}),
//! );
//! let registry = ContextRegistry::new(normalizer);
//!
//! let mut alice = Node::from_json(
//!     json!({"id": "urn:a", "knows": {"id": "urn:b"}}),
//!     &NodeOptions::new("people"),
//!     &registry,
//! )
//! .unwrap();
//!
//! // Resolve references; unknown targets become stubs
//! let mut refs = ReferenceMap::new();
//! alice.resolve(&mut refs);
//! let bob = alice.get("knows").and_then(Value::as_node).unwrap();
//! assert!(bob.read().is_stub());
//!
//! // Deresolve back to the normalized flat form
//! let flat = alice.deresolve().unwrap();
//! assert_eq!(serde_json::Value::Object(flat), json!({"id": "urn:a", "knows": {"id": "urn:b"}}));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Nodes, node handles, values and identifiers
//! - [`context`]: Parsed contexts and the context registry
//! - [`normalize`]: Expand/compact collaborator and the term normalizer
//! - [`resolve`]: Reference resolution and the reference map
//! - [`deresolve`]: Flat form, serialization and content hashes
//! - [`merge`]: Merging incoming nodes
//! - [`persist`]: Storage extension point
//! - [`error`]: Error types
//!
//! # Concurrency
//!
//! The registry is internally synchronized. `resolve` and `merge` take
//! `&mut Node`, so a node behind a [`NodeRef`] must be write-locked first.
//! `deresolve` never locks other nodes.

pub mod context;
pub mod deresolve;
pub mod error;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod persist;
pub mod resolve;

#[cfg(test)]
mod testing;

// Re-export commonly used types at crate root
pub use context::{Context, ContextHandle, ContextRegistry};
pub use deresolve::ContentHash;
pub use error::{NormalizeError, ResourceError, Result};
pub use merge::MergeAmbiguity;
pub use model::{
    is_anonymous, is_blank, Attributes, Identifier, Node, NodeOptions, NodeRef, Shape, Value, BLANK_PREFIX,
};
pub use normalize::{Normalizer, TermContext, TermNormalizer};
pub use persist::Store;
pub use resolve::ReferenceMap;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
