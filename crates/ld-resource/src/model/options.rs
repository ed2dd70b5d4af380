//! Node construction options.

use serde::{Deserialize, Serialize};

/// Options for constructing a [`Node`](crate::Node).
///
/// # Example
///
/// ```rust
/// use ld_resource::NodeOptions;
///
/// let options = NodeOptions::new("people").clean(true).new_node(false);
/// assert!(options.is_reconciled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeOptions {
    /// Name of the context to resolve through the registry.
    pub context: String,
    /// The node matches its stored copy.
    pub clean: bool,
    /// The node has not been saved yet.
    pub new: bool,
    /// The identifier has been matched against the store. Defaults to `!new`.
    pub reconciled: Option<bool>,
    /// The node stands in for one that has not been loaded.
    pub stub: bool,
    /// The raw map is in expanded form and must be compacted first.
    pub compact: bool,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            context: String::new(),
            clean: false,
            new: true,
            reconciled: None,
            stub: false,
            compact: false,
        }
    }
}

impl NodeOptions {
    /// Creates default options for the named context.
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            ..Self::default()
        }
    }

    pub fn clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    pub fn new_node(mut self, new: bool) -> Self {
        self.new = new;
        self
    }

    pub fn reconciled(mut self, reconciled: bool) -> Self {
        self.reconciled = Some(reconciled);
        self
    }

    pub fn stub(mut self, stub: bool) -> Self {
        self.stub = stub;
        self
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Effective reconciled flag.
    pub fn is_reconciled(&self) -> bool {
        self.reconciled.unwrap_or(!self.new)
    }
}
