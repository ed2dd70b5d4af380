//! Deresolution: node handles back to references, then normalization.
//!
//! The deresolved form is the canonical flat representation of a node. It
//! is what gets serialized, and it is what content hashes are computed over,
//! so two nodes with the same content hash equal whatever their resolution
//! history.

use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::model::Node;
use crate::model::value::{CONTEXT_KEYWORD, attributes_to_json};

/// A SHA-256 digest of a node's deresolved form.
pub type ContentHash = [u8; 32];

impl Node {
    /// Returns the attributes as flat JSON, before normalization.
    ///
    /// Node handles become `{ <id-key>: identifier }`. An unresolved node
    /// holds no handles, so for it this is a plain conversion.
    pub fn flatten(&self) -> Map<String, JsonValue> {
        attributes_to_json(&self.attributes, self.context.id_key())
    }

    /// Returns the normalized flat form of this node.
    ///
    /// The flattened attributes are expanded and compacted against the
    /// node's context, and any `@context` key is removed. The node itself
    /// is not modified. Links to nodes without an identifier cannot be
    /// expressed as references and are left out.
    pub fn deresolve(&self) -> Result<Map<String, JsonValue>> {
        let expanded = self.context.expand(&self.flatten())?;
        let mut compacted = self.context.compact(&expanded)?;
        compacted.remove(CONTEXT_KEYWORD);
        Ok(compacted)
    }

    /// Serializes the deresolved form to JSON text.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.deresolve()?)?)
    }

    /// SHA-256 of the canonical JSON text of the deresolved form.
    pub fn content_hash(&self) -> Result<ContentHash> {
        let canonical = serde_json::to_vec(&self.deresolve()?)?;
        let digest = Sha256::digest(&canonical);

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&digest);
        Ok(hash)
    }

    /// Content hash as lowercase hex, suitable for an ETag.
    pub fn etag(&self) -> Result<String> {
        let hash = self.content_hash()?;
        let mut s = String::with_capacity(hash.len() * 2);
        for byte in hash {
            s.push_str(&format!("{:02x}", byte));
        }
        Ok(s)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.deresolve()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::resolve::ReferenceMap;
    use crate::testing::{people, registry};
    use crate::Value;

    #[test]
    fn test_end_to_end() {
        let registry = registry();
        let mut a = Node::from_json(json!({"id": "urn:a", "knows": {"id": "urn:b"}}), &people(), &registry)
            .unwrap();

        a.resolve(&mut ReferenceMap::new());
        let knows = a.get("knows").and_then(Value::as_node).unwrap();
        assert_eq!(knows.id().map(String::as_str), Some("urn:b"));
        assert!(knows.read().is_stub());

        let flat = a.deresolve().unwrap();
        assert_eq!(JsonValue::Object(flat), json!({"id": "urn:a", "knows": {"id": "urn:b"}}));
    }

    #[test]
    fn test_unresolved_matches_expand_compact() {
        let registry = registry();
        let node = Node::from_json(
            json!({
                "id": "urn:a",
                "schema:name": "Alice",
                "foaf:knows": [{"id": "urn:b"}],
                "@context": {"ignored": true}
            }),
            &people(),
            &registry,
        )
        .unwrap();

        let ctx = node.context();
        let attributes = JsonValue::Object(node.flatten());
        let mut expected = ctx.compact(&ctx.expand(attributes.as_object().unwrap()).unwrap()).unwrap();
        expected.remove("@context");

        let deresolved = node.deresolve().unwrap();
        assert_eq!(deresolved, expected);
        assert_eq!(
            JsonValue::Object(deresolved),
            json!({"id": "urn:a", "name": "Alice", "knows": [{"id": "urn:b"}]})
        );
    }

    #[test]
    fn test_sequences_keep_non_node_elements() {
        let registry = registry();
        let mut a = Node::from_json(
            json!({"id": "urn:a", "friends": [{"id": "urn:b"}, "urn:literal", 3]}),
            &people(),
            &registry,
        )
        .unwrap();
        a.resolve(&mut ReferenceMap::new());

        let flat = a.deresolve().unwrap();
        assert_eq!(flat["friends"], json!([{"id": "urn:b"}, "urn:literal", 3]));
    }

    #[test]
    fn test_deresolve_does_not_mutate() {
        let registry = registry();
        let mut a = Node::from_json(json!({"id": "urn:a", "knows": {"id": "urn:b"}}), &people(), &registry)
            .unwrap();
        a.resolve(&mut ReferenceMap::new());
        let before = a.attributes().clone();

        a.deresolve().unwrap();

        assert_eq!(a.attributes(), &before);
        assert!(a.is_resolved());
    }

    #[test]
    fn test_hash_ignores_resolution_history() {
        let registry = registry();
        let raw = json!({"id": "urn:a", "name": "Alice", "knows": {"id": "urn:b"}});
        let plain = Node::from_json(raw.clone(), &people(), &registry).unwrap();
        let mut resolved = Node::from_json(raw, &people(), &registry).unwrap();
        resolved.resolve(&mut ReferenceMap::new());

        assert_eq!(plain.content_hash().unwrap(), resolved.content_hash().unwrap());
        assert_eq!(plain.etag().unwrap().len(), 64);
    }

    #[test]
    fn test_hash_ignores_spelling_and_order() {
        let registry = registry();
        let a = Node::from_json(json!({"id": "urn:a", "name": "Alice"}), &people(), &registry).unwrap();
        let b = Node::from_json(json!({"schema:name": "Alice", "@id": "urn:a"}), &people(), &registry).unwrap();
        assert_eq!(a.etag().unwrap(), b.etag().unwrap());

        let c = Node::from_json(json!({"id": "urn:a", "name": "Alicia"}), &people(), &registry).unwrap();
        assert_ne!(a.etag().unwrap(), c.etag().unwrap());
    }

    #[test]
    fn test_vocab_property_survives_term_clash() {
        let normalizer = crate::TermNormalizer::new().with_document(
            "vocab",
            json!({
                "id": "@id",
                "@vocab": "http://ex.org/",
                "schema": "http://schema.org/",
                "name": "schema:name"
            }),
        );
        let registry = crate::ContextRegistry::new(normalizer);
        let options = crate::NodeOptions::new("vocab");

        let a = Node::from_json(
            json!({"id": "urn:a", "name": "Alice", "http://ex.org/name": "Other"}),
            &options,
            &registry,
        )
        .unwrap();
        assert_eq!(
            JsonValue::Object(a.deresolve().unwrap()),
            json!({"id": "urn:a", "name": "Alice", "http://ex.org/name": "Other"})
        );

        let b = Node::from_json(
            json!({"id": "urn:a", "name": "Alice", "http://ex.org/name": "Different"}),
            &options,
            &registry,
        )
        .unwrap();
        assert_ne!(a.etag().unwrap(), b.etag().unwrap());
    }

    #[test]
    fn test_serialize() {
        let registry = registry();
        let mut a = Node::from_json(json!({"id": "urn:a", "knows": {"id": "urn:b"}}), &people(), &registry)
            .unwrap();
        a.resolve(&mut ReferenceMap::new());

        let text = a.to_json_string().unwrap();
        assert_eq!(text, r#"{"id":"urn:a","knows":{"id":"urn:b"}}"#);
        assert_eq!(serde_json::to_value(&a).unwrap(), json!({"id": "urn:a", "knows": {"id": "urn:b"}}));
    }
}
