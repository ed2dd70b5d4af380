//! Registry of parsed contexts.
//!
//! Each context name is parsed at most once per registry. The registry is an
//! ordinary value: create it at startup and pass it to node constructors.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::context::{Context, ContextHandle};
use crate::error::ResourceError;
use crate::normalize::Normalizer;

/// Cache of context name → parsed context.
///
/// Lookups take a read lock; a miss takes the write lock, re-checks, and
/// parses while holding it, so concurrent callers asking for the same name
/// always receive the same handle.
#[derive(Debug)]
pub struct ContextRegistry {
    normalizer: Arc<dyn Normalizer>,
    contexts: RwLock<FxHashMap<String, ContextHandle>>,
}

impl ContextRegistry {
    /// Creates an empty registry backed by `normalizer`.
    pub fn new(normalizer: impl Normalizer + 'static) -> Self {
        Self::with_normalizer(Arc::new(normalizer))
    }

    /// Creates an empty registry sharing an existing normalizer.
    pub fn with_normalizer(normalizer: Arc<dyn Normalizer>) -> Self {
        Self {
            normalizer,
            contexts: RwLock::new(FxHashMap::default()),
        }
    }

    /// Returns the context registered as `name`, parsing it on first use.
    pub fn get_or_create(&self, name: &str) -> Result<ContextHandle, ResourceError> {
        if let Some(handle) = self.contexts.read().get(name) {
            trace!(context = name, "context cache hit");
            return Ok(Arc::clone(handle));
        }

        let mut contexts = self.contexts.write();
        if let Some(handle) = contexts.get(name) {
            return Ok(Arc::clone(handle));
        }

        let terms = self
            .normalizer
            .parse_context(name)
            .map_err(|source| ResourceError::ContextResolution {
                name: name.to_string(),
                source,
            })?;
        let handle = Arc::new(Context::new(name, terms, Arc::clone(&self.normalizer)));
        contexts.insert(name.to_string(), Arc::clone(&handle));
        debug!(context = name, cached = contexts.len(), "parsed context");

        Ok(handle)
    }

    /// Returns the context registered as `name` without parsing.
    pub fn get(&self, name: &str) -> Option<ContextHandle> {
        self.contexts.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.contexts.read().contains_key(name)
    }

    /// Number of parsed contexts.
    pub fn len(&self) -> usize {
        self.contexts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.read().is_empty()
    }

    pub fn normalizer(&self) -> &Arc<dyn Normalizer> {
        &self.normalizer
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use serde_json::{json, Map, Value as JsonValue};

    use super::*;
    use crate::error::NormalizeError;
    use crate::normalize::{TermContext, TermNormalizer};

    /// Counts context parses, delegating everything else.
    #[derive(Debug, Default)]
    struct CountingNormalizer {
        inner: TermNormalizer,
        parses: Arc<AtomicUsize>,
    }

    impl Normalizer for CountingNormalizer {
        fn parse_context(&self, name: &str) -> Result<TermContext, NormalizeError> {
            self.parses.fetch_add(1, Ordering::SeqCst);
            self.inner.parse_context(name)
        }

        fn expand(&self, node: &Map<String, JsonValue>, ctx: &TermContext) -> Result<JsonValue, NormalizeError> {
            self.inner.expand(node, ctx)
        }

        fn compact(&self, expanded: &JsonValue, ctx: &TermContext) -> Result<Map<String, JsonValue>, NormalizeError> {
            self.inner.compact(expanded, ctx)
        }
    }

    fn counting() -> (CountingNormalizer, Arc<AtomicUsize>) {
        let parses = Arc::new(AtomicUsize::new(0));
        let normalizer = CountingNormalizer {
            inner: TermNormalizer::new().with_document("people", json!({"id": "@id"})),
            parses: Arc::clone(&parses),
        };
        (normalizer, parses)
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let (normalizer, parses) = counting();
        let registry = ContextRegistry::new(normalizer);

        let first = registry.get_or_create("people").unwrap();
        let second = registry.get_or_create("people").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(parses.load(Ordering::SeqCst), 1);
        assert_eq!(first.name(), "people");
        assert_eq!(first.id_key(), "id");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_context_fails() {
        let registry = ContextRegistry::new(TermNormalizer::new());
        let err = registry.get_or_create("missing").unwrap_err();
        assert!(matches!(
            err,
            ResourceError::ContextResolution { ref name, source: NormalizeError::UnknownContext { .. } }
                if name == "missing"
        ));
        // Failures are not cached
        assert!(registry.is_empty());
        assert!(!registry.contains("missing"));
    }

    #[test]
    fn test_concurrent_lookups_share_one_parse() {
        let (normalizer, parses) = counting();
        let registry = Arc::new(ContextRegistry::new(normalizer));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.get_or_create("people").unwrap())
            })
            .collect();
        let contexts: Vec<ContextHandle> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(parses.load(Ordering::SeqCst), 1);
        assert!(contexts.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
