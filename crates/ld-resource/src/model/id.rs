//! Node identifiers.
//!
//! Identifiers are IRIs or blank-node labels. Blank-node labels use the
//! `_:` prefix and never name a node outside the document they came from.

/// A node identifier (absolute IRI, compact IRI or blank-node label).
pub type Identifier = String;

/// Prefix marking a blank-node label.
pub const BLANK_PREFIX: &str = "_:";

/// Returns true if `id` is a blank-node label.
pub fn is_blank(id: &str) -> bool {
    id.starts_with(BLANK_PREFIX)
}

/// Returns true if a node with this identifier is anonymous.
///
/// A node is anonymous when it has no identifier or a blank-node label.
pub fn is_anonymous(id: Option<&str>) -> bool {
    id.is_none_or(is_blank)
}

/// Splits a compact IRI into `(prefix, suffix)`.
///
/// Returns `None` for terms without a colon, blank-node labels and
/// hierarchical IRIs (`scheme://...`), which can never be compact.
pub fn split_prefix(value: &str) -> Option<(&str, &str)> {
    if is_blank(value) {
        return None;
    }
    let (prefix, suffix) = value.split_once(':')?;
    if prefix.is_empty() || suffix.starts_with("//") {
        return None;
    }
    Some((prefix, suffix))
}
