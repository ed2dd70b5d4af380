//! Shared fixtures for unit tests.

use serde_json::json;

use crate::context::ContextRegistry;
use crate::model::NodeOptions;
use crate::normalize::TermNormalizer;

/// Context used by most tests: aliased keywords plus schema.org and FOAF
/// terms.
pub fn people_context() -> serde_json::Value {
    json!({
        "id": "@id",
        "type": "@type",
        "schema": "http://schema.org/",
        "foaf": "http://xmlns.com/foaf/0.1/",
        "name": "schema:name",
        "Person": "schema:Person",
        "knows": "foaf:knows",
        "friends": "foaf:friend",
        "address": "schema:address",
        "city": "schema:addressLocality"
    })
}

pub fn registry() -> ContextRegistry {
    ContextRegistry::new(TermNormalizer::new().with_document("people", people_context()))
}

pub fn people() -> NodeOptions {
    NodeOptions::new("people")
}
