//! Expansion of flat node maps to absolute-IRI form.

use serde_json::{Map, Value as JsonValue};

use crate::error::NormalizeError;
use crate::model::value::{CONTEXT_KEYWORD, ID_KEYWORD, TYPE_KEYWORD};
use crate::normalize::TermContext;

/// Expands a node map: property names become absolute IRIs, aliases become
/// keywords, identifiers and types are expanded, and `null` properties are
/// dropped. An inline `@context` is ignored; `context` is authoritative.
pub fn node(map: &Map<String, JsonValue>, context: &TermContext) -> Result<JsonValue, NormalizeError> {
    let mut out = Map::new();

    for (key, value) in map {
        let expanded_key = context.expand_iri(key, true);
        let expanded = match expanded_key.as_str() {
            CONTEXT_KEYWORD => continue,
            ID_KEYWORD => match value {
                JsonValue::String(id) => JsonValue::String(context.expand_iri(id, false)),
                other => {
                    return Err(NormalizeError::InvalidDocument {
                        message: format!("{key} must be a string, got {other}"),
                    });
                }
            },
            TYPE_KEYWORD => type_value(key, value, context)?,
            _ if value.is_null() => continue,
            _ => self::value(value, context)?,
        };

        // Two spellings of one property collapse into a single array
        match out.remove(&expanded_key) {
            Some(existing) => {
                out.insert(expanded_key, concat(existing, expanded));
            }
            None => {
                out.insert(expanded_key, expanded);
            }
        }
    }

    Ok(JsonValue::Object(out))
}

/// Expands a property value.
pub fn value(value: &JsonValue, context: &TermContext) -> Result<JsonValue, NormalizeError> {
    match value {
        JsonValue::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| self::value(item, context))
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        JsonValue::Object(map) => node(map, context),
        scalar => Ok(scalar.clone()),
    }
}

fn type_value(key: &str, value: &JsonValue, context: &TermContext) -> Result<JsonValue, NormalizeError> {
    match value {
        JsonValue::String(t) => Ok(JsonValue::String(context.expand_iri(t, true))),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| match item {
                JsonValue::String(t) => Ok(JsonValue::String(context.expand_iri(t, true))),
                other => Err(NormalizeError::InvalidDocument {
                    message: format!("{key} entries must be strings, got {other}"),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        other => Err(NormalizeError::InvalidDocument {
            message: format!("{key} must be a string or array, got {other}"),
        }),
    }
}

fn concat(existing: JsonValue, next: JsonValue) -> JsonValue {
    let mut items = match existing {
        JsonValue::Array(items) => items,
        single => vec![single],
    };
    match next {
        JsonValue::Array(more) => items.extend(more),
        single => items.push(single),
    }
    JsonValue::Array(items)
}
