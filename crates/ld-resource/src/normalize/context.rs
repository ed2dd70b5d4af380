//! Parsed context documents.

use rustc_hash::FxHashMap;
use serde_json::{Map, Value as JsonValue};

use crate::error::NormalizeError;
use crate::model::id::split_prefix;
use crate::model::value::{ID_KEYWORD, TYPE_KEYWORD};

/// A parsed context: term definitions, keyword aliases and default vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct TermContext {
    /// Key used for `@id` (the keyword unless aliased).
    pub id_key: String,
    /// Key used for `@type` (the keyword unless aliased).
    pub type_key: String,
    /// Default vocabulary (`@vocab`).
    pub vocab: Option<String>,
    /// Term → absolute IRI or keyword.
    pub terms: FxHashMap<String, String>,
}

impl Default for TermContext {
    fn default() -> Self {
        Self {
            id_key: ID_KEYWORD.to_string(),
            type_key: TYPE_KEYWORD.to_string(),
            vocab: None,
            terms: FxHashMap::default(),
        }
    }
}

impl TermContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a context document (object, array of contexts, vocabulary
    /// string or null).
    pub fn parse(document: &JsonValue) -> Result<Self, NormalizeError> {
        let mut active = Self::new();
        active.apply(document)?;
        Ok(active)
    }

    /// Looks up a term definition.
    pub fn get(&self, term: &str) -> Option<&str> {
        self.terms.get(term).map(String::as_str)
    }

    /// Expands a term, compact IRI or relative value to an absolute IRI.
    ///
    /// With `vocab` set, exact term matches and `@vocab` apply (property
    /// names, type values). Without it only prefixes apply (identifiers).
    pub fn expand_iri(&self, value: &str, vocab: bool) -> String {
        if value.starts_with('@') {
            return value.to_string();
        }
        if vocab {
            if let Some(iri) = self.get(value) {
                return iri.to_string();
            }
        }
        if let Some((prefix, suffix)) = split_prefix(value) {
            return match self.get(prefix) {
                Some(ns) if !ns.starts_with('@') => format!("{ns}{suffix}"),
                _ => value.to_string(),
            };
        }
        if vocab && !value.contains(':') {
            if let Some(ref base) = self.vocab {
                return format!("{base}{value}");
            }
        }
        value.to_string()
    }

    /// Applies a context document on top of this one.
    fn apply(&mut self, document: &JsonValue) -> Result<(), NormalizeError> {
        match document {
            JsonValue::Null => {
                *self = Self::new();
                Ok(())
            }
            JsonValue::String(vocab) => {
                self.vocab = Some(with_trailing_separator(vocab));
                Ok(())
            }
            JsonValue::Array(items) => {
                for item in items {
                    self.apply(item)?;
                }
                Ok(())
            }
            JsonValue::Object(map) => match map.get("@context") {
                Some(inner) => self.apply(inner),
                None => self.apply_map(map),
            },
            other => Err(NormalizeError::InvalidContext {
                message: format!("context must be an object, array, string or null, got {other}"),
            }),
        }
    }

    fn apply_map(&mut self, map: &Map<String, JsonValue>) -> Result<(), NormalizeError> {
        match map.get("@vocab") {
            Some(JsonValue::String(vocab)) => {
                self.vocab = Some(with_trailing_separator(vocab));
            }
            Some(JsonValue::Null) => self.vocab = None,
            Some(other) => {
                return Err(NormalizeError::InvalidContext {
                    message: format!("@vocab must be a string, got {other}"),
                });
            }
            None => {}
        }

        for (term, definition) in map.iter().filter(|(k, _)| !k.starts_with('@')) {
            let raw = match definition {
                JsonValue::String(iri) => iri.as_str(),
                JsonValue::Object(def) => match def.get("@id") {
                    Some(JsonValue::String(iri)) => iri.as_str(),
                    _ => term.as_str(),
                },
                JsonValue::Null => {
                    self.terms.remove(term);
                    continue;
                }
                other => {
                    return Err(NormalizeError::InvalidContext {
                        message: format!("definition of {term:?} must be a string or object, got {other}"),
                    });
                }
            };

            let iri = self.resolve_definition(raw, map);
            match iri.as_str() {
                ID_KEYWORD => self.id_key = term.clone(),
                TYPE_KEYWORD => self.type_key = term.clone(),
                _ => {}
            }
            self.terms.insert(term.clone(), iri);
        }
        Ok(())
    }

    /// Resolves a term definition, expanding prefixes defined either in the
    /// same document or earlier.
    fn resolve_definition(&self, raw: &str, document: &Map<String, JsonValue>) -> String {
        if raw.starts_with('@') {
            return raw.to_string();
        }
        if let Some((prefix, suffix)) = split_prefix(raw) {
            let ns = match document.get(prefix) {
                Some(JsonValue::String(ns)) => Some(ns.as_str()),
                Some(JsonValue::Object(def)) => def.get("@id").and_then(JsonValue::as_str),
                _ => self.get(prefix),
            };
            return match ns {
                Some(ns) if !ns.starts_with('@') => format!("{ns}{suffix}"),
                _ => raw.to_string(),
            };
        }
        if !raw.contains(':') {
            if let Some(ref vocab) = self.vocab {
                return format!("{vocab}{raw}");
            }
        }
        raw.to_string()
    }
}

fn with_trailing_separator(iri: &str) -> String {
    if iri.ends_with('/') || iri.ends_with('#') {
        iri.to_string()
    } else {
        format!("{iri}/")
    }
}
