//! Normalization of node maps against a context.
//!
//! The resource core treats normalization as an external collaborator
//! behind the [`Normalizer`] trait: contexts are parsed once by name, and
//! node maps are expanded to absolute IRIs and compacted back to terms.
//!
//! [`TermNormalizer`] is a small term/prefix normalizer used by default. It
//! covers `@vocab`, prefixes, term definitions and `@id`/`@type` aliases;
//! it is not a conformant JSON-LD processor.

pub mod compact;
pub mod context;
pub mod expand;

use std::fmt;

use rustc_hash::FxHashMap;
use serde_json::{Map, Value as JsonValue};

use crate::error::NormalizeError;

pub use compact::TermCompactor;
pub use context::TermContext;

/// Expand/compact collaborator.
///
/// Implementations must be deterministic: the same input map and context
/// always yield the same output.
pub trait Normalizer: Send + Sync + fmt::Debug {
    /// Parses the context known by `name`.
    fn parse_context(&self, name: &str) -> Result<TermContext, NormalizeError>;

    /// Expands a flat node map against `context`.
    fn expand(
        &self,
        node: &Map<String, JsonValue>,
        context: &TermContext,
    ) -> Result<JsonValue, NormalizeError>;

    /// Compacts an expanded node against `context`.
    fn compact(
        &self,
        expanded: &JsonValue,
        context: &TermContext,
    ) -> Result<Map<String, JsonValue>, NormalizeError>;
}

/// Term/prefix normalizer over registered context documents.
///
/// A context name is looked up among the registered documents. Names that
/// are themselves JSON (starting with `{` or `[`) are parsed inline.
#[derive(Debug, Clone, Default)]
pub struct TermNormalizer {
    documents: FxHashMap<String, JsonValue>,
}

impl TermNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a context document under `name`.
    pub fn register(&mut self, name: impl Into<String>, document: JsonValue) {
        self.documents.insert(name.into(), document);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_document(mut self, name: impl Into<String>, document: JsonValue) -> Self {
        self.register(name, document);
        self
    }
}

impl Normalizer for TermNormalizer {
    fn parse_context(&self, name: &str) -> Result<TermContext, NormalizeError> {
        if let Some(document) = self.documents.get(name) {
            return TermContext::parse(document);
        }

        let trimmed = name.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            let document: JsonValue =
                serde_json::from_str(name).map_err(|e| NormalizeError::InvalidContext {
                    message: e.to_string(),
                })?;
            return TermContext::parse(&document);
        }

        Err(NormalizeError::UnknownContext {
            name: name.to_string(),
        })
    }

    fn expand(
        &self,
        node: &Map<String, JsonValue>,
        context: &TermContext,
    ) -> Result<JsonValue, NormalizeError> {
        expand::node(node, context)
    }

    fn compact(
        &self,
        expanded: &JsonValue,
        context: &TermContext,
    ) -> Result<Map<String, JsonValue>, NormalizeError> {
        compact::document(expanded, context)
    }
}
