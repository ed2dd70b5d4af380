//! Compaction of expanded node maps back to context terms.

use rustc_hash::FxHashMap;
use serde_json::{Map, Value as JsonValue};

use crate::error::NormalizeError;
use crate::model::value::{ID_KEYWORD, TYPE_KEYWORD};
use crate::normalize::TermContext;

/// A precomputed reverse lookup table for IRI compaction.
///
/// Namespace entries are sorted longest-first so the most specific prefix
/// wins. Build once per compaction, then call [`compact_vocab`] or
/// [`compact_id`] per IRI.
///
/// [`compact_vocab`]: TermCompactor::compact_vocab
/// [`compact_id`]: TermCompactor::compact_id
#[derive(Debug, Clone)]
pub struct TermCompactor<'a> {
    context: &'a TermContext,
    /// Full IRI → term.
    exact: FxHashMap<&'a str, &'a str>,
    /// Namespace IRI (ending in `/` or `#`) → prefix, longest first.
    prefixes: Vec<(&'a str, &'a str)>,
}

impl<'a> TermCompactor<'a> {
    pub fn new(context: &'a TermContext) -> Self {
        let mut exact: FxHashMap<&str, &str> = FxHashMap::default();
        for (term, iri) in &context.terms {
            if iri.starts_with('@') {
                continue;
            }
            // Shortest term wins; ties break lexicographically so the
            // output does not depend on hash order.
            let replace = match exact.get(iri.as_str()) {
                Some(current) => (term.len(), term.as_str()) < (current.len(), *current),
                None => true,
            };
            if replace {
                exact.insert(iri.as_str(), term.as_str());
            }
        }

        let mut prefixes: Vec<(&str, &str)> = exact
            .iter()
            .filter(|(iri, term)| (iri.ends_with('/') || iri.ends_with('#')) && !term.contains(':'))
            .map(|(iri, term)| (*iri, *term))
            .collect();
        prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.1.cmp(b.1)));

        Self {
            context,
            exact,
            prefixes,
        }
    }

    /// Compacts an IRI in vocabulary position (property names, types).
    ///
    /// Tries an exact term, then the longest prefix, then `@vocab`. A
    /// prefixed or vocabulary-relative form is only used when it does not
    /// spell a term defined for another IRI; otherwise the IRI stays
    /// absolute, so distinct IRIs never compact to the same key.
    pub fn compact_vocab(&self, iri: &str) -> String {
        match iri {
            ID_KEYWORD => return self.context.id_key.clone(),
            TYPE_KEYWORD => return self.context.type_key.clone(),
            _ if iri.starts_with('@') => return iri.to_string(),
            _ => {}
        }
        if let Some(term) = self.exact.get(iri) {
            return term.to_string();
        }
        if let Some(compact) = self.compact_prefix(iri).filter(|c| self.expands_to(c, iri)) {
            return compact;
        }
        if let Some(ref vocab) = self.context.vocab {
            if let Some(suffix) = iri.strip_prefix(vocab.as_str()) {
                if !suffix.is_empty() && !suffix.contains(':') && self.expands_to(suffix, iri) {
                    return suffix.to_string();
                }
            }
        }
        iri.to_string()
    }

    /// Returns false if `compact` is a term bound to something other than `iri`.
    fn expands_to(&self, compact: &str, iri: &str) -> bool {
        self.context.get(compact).is_none_or(|defined| defined == iri)
    }

    /// Compacts an IRI in identifier position. Only prefixes apply.
    pub fn compact_id(&self, iri: &str) -> String {
        self.compact_prefix(iri).unwrap_or_else(|| iri.to_string())
    }

    fn compact_prefix(&self, iri: &str) -> Option<String> {
        self.prefixes.iter().find_map(|(ns, prefix)| {
            iri.strip_prefix(*ns)
                .filter(|suffix| !suffix.is_empty())
                .map(|suffix| format!("{prefix}:{suffix}"))
        })
    }

    /// Compacts an expanded node.
    pub fn node(&self, map: &Map<String, JsonValue>) -> Map<String, JsonValue> {
        map.iter()
            .map(|(key, value)| {
                let compacted = match key.as_str() {
                    ID_KEYWORD => match value {
                        JsonValue::String(id) => JsonValue::String(self.compact_id(id)),
                        other => other.clone(),
                    },
                    TYPE_KEYWORD => self.type_value(value),
                    _ => self.value(value),
                };
                (self.compact_vocab(key), compacted)
            })
            .collect()
    }

    fn value(&self, value: &JsonValue) -> JsonValue {
        match value {
            JsonValue::Array(items) => JsonValue::Array(items.iter().map(|v| self.value(v)).collect()),
            JsonValue::Object(map) => JsonValue::Object(self.node(map)),
            scalar => scalar.clone(),
        }
    }

    fn type_value(&self, value: &JsonValue) -> JsonValue {
        match value {
            JsonValue::String(t) => JsonValue::String(self.compact_vocab(t)),
            JsonValue::Array(items) => JsonValue::Array(items.iter().map(|v| self.type_value(v)).collect()),
            other => other.clone(),
        }
    }
}

/// Compacts an expanded document. A top-level array must hold exactly one
/// node, as produced by expanding a single node map.
pub fn document(expanded: &JsonValue, context: &TermContext) -> Result<Map<String, JsonValue>, NormalizeError> {
    let compactor = TermCompactor::new(context);
    match expanded {
        JsonValue::Object(map) => Ok(compactor.node(map)),
        JsonValue::Array(items) => match items.as_slice() {
            [] => Ok(Map::new()),
            [JsonValue::Object(map)] => Ok(compactor.node(map)),
            _ => Err(NormalizeError::InvalidDocument {
                message: format!("expected a single node, got {} entries", items.len()),
            }),
        },
        other => Err(NormalizeError::InvalidDocument {
            message: format!("expected an expanded node, got {other}"),
        }),
    }
}
