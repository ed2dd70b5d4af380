//! Persistence extension point.
//!
//! Storage itself lives outside this crate. A [`Store`] implementation
//! decides how nodes are written; the provided methods cover reconciling a
//! freshly loaded node against an in-memory one.

use crate::error::{ResourceError, Result};
use crate::model::Node;

/// Storage backend for nodes.
pub trait Store {
    /// Saves `node`, returning whether it was written.
    ///
    /// The default implementation fails with
    /// [`ResourceError::Unimplemented`]; backends must override it.
    fn save(&self, _node: &Node) -> Result<bool> {
        Err(ResourceError::Unimplemented { operation: "save" })
    }

    /// Merges `incoming` into `existing` and marks `existing` reconciled.
    fn reconcile<'a>(&self, existing: &'a mut Node, incoming: &Node) -> &'a mut Node {
        existing.merge(incoming).mark_reconciled()
    }
}
