//! Parsed contexts shared between nodes.
//!
//! A [`Context`] pairs a parsed [`TermContext`] with the [`Normalizer`] that
//! produced it, so a node can expand and compact itself without access to
//! the registry.

pub mod registry;

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use crate::error::NormalizeError;
use crate::model::value::{ID_KEYWORD, TYPE_KEYWORD};
use crate::normalize::{Normalizer, TermContext};

pub use registry::ContextRegistry;

/// Shared handle to a parsed context.
pub type ContextHandle = Arc<Context>;

/// A named, parsed context.
pub struct Context {
    name: String,
    terms: TermContext,
    normalizer: Arc<dyn Normalizer>,
}

impl Context {
    pub fn new(name: impl Into<String>, terms: TermContext, normalizer: Arc<dyn Normalizer>) -> Self {
        Self {
            name: name.into(),
            terms,
            normalizer,
        }
    }

    /// The name this context was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn terms(&self) -> &TermContext {
        &self.terms
    }

    /// Key used for `@id` in compacted maps.
    pub fn id_key(&self) -> &str {
        &self.terms.id_key
    }

    /// Key used for `@type` in compacted maps.
    pub fn type_key(&self) -> &str {
        &self.terms.type_key
    }

    /// Returns true if `key` is `@id` or its alias.
    pub fn is_id_key(&self, key: &str) -> bool {
        key == ID_KEYWORD || key == self.terms.id_key
    }

    /// Returns true if `key` is `@type` or its alias.
    pub fn is_type_key(&self, key: &str) -> bool {
        key == TYPE_KEYWORD || key == self.terms.type_key
    }

    pub fn expand(&self, node: &Map<String, JsonValue>) -> Result<JsonValue, NormalizeError> {
        self.normalizer.expand(node, &self.terms)
    }

    pub fn compact(&self, expanded: &JsonValue) -> Result<Map<String, JsonValue>, NormalizeError> {
        self.normalizer.compact(expanded, &self.terms)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("name", &self.name)
            .field("id_key", &self.terms.id_key)
            .field("type_key", &self.terms.type_key)
            .finish_non_exhaustive()
    }
}
