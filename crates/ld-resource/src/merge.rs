//! Merging an incoming node onto an existing one.

use tracing::{debug, warn};

use crate::model::Node;

/// A state mismatch between merge target and incoming node that makes
/// attribute comparison unreliable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAmbiguity {
    /// One side is reconciled against the store and the other is not, so
    /// identifiers may use different schemes for the same node.
    ReconciliationMismatch,
    /// One side holds node handles and the other raw references. Merging
    /// compares flattened attributes, which removes this difference.
    ResolutionMismatch,
}

impl Node {
    /// Reports whether comparing this node with `incoming` may give a
    /// spurious "changed" result.
    pub fn merge_ambiguity(&self, incoming: &Node) -> Option<MergeAmbiguity> {
        if self.reconciled != incoming.reconciled {
            Some(MergeAmbiguity::ReconciliationMismatch)
        } else if self.resolved != incoming.resolved {
            Some(MergeAmbiguity::ResolutionMismatch)
        } else {
            None
        }
    }

    /// Applies the properties of `incoming` onto this node.
    ///
    /// Nothing happens if both nodes have the same flattened attributes.
    /// Otherwise each incoming property except the identifier overwrites
    /// the current one; `null` and empty sequences delete it. Any change
    /// clears the clean and resolved flags.
    pub fn merge(&mut self, incoming: &Node) -> &mut Self {
        match self.merge_ambiguity(incoming) {
            Some(MergeAmbiguity::ReconciliationMismatch) => {
                warn!(id = ?self.id, incoming = ?incoming.id, "merging nodes with different reconciliation state");
            }
            Some(MergeAmbiguity::ResolutionMismatch) => {
                debug!(id = ?self.id, "merging resolved against unresolved node");
            }
            None => {}
        }

        if self.flatten() == incoming.flatten() {
            return self;
        }

        for (key, value) in incoming.attributes() {
            if self.context.is_id_key(key) || incoming.context.is_id_key(key) {
                continue;
            }
            if value.is_null() || value.is_empty_sequence() {
                self.attributes.shift_remove(key);
            } else {
                self.attributes.insert(key.clone(), value.clone());
            }
        }
        self.resolved = false;
        self.clean = false;
        debug!(id = ?self.id, "merged node");

        self
    }
}
