//! Errors reported by document mutations.

use thiserror::Error;

use crate::node::{NodeId, NodeKind};
use crate::tree::TreeError;

/// A rejected document mutation.
///
/// These are recoverable construction failures: the document is left
/// unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity)
    ///
    /// "If ... throw a "HierarchyRequestError" DOMException."
    #[error("a {child_kind} node ({child:?}) is not allowed as a child of a {parent_kind} node ({parent:?})")]
    HierarchyRequest {
        /// The node that refused the child.
        parent: NodeId,
        /// Kind of the refusing node.
        parent_kind: NodeKind,
        /// The rejected node.
        child: NodeId,
        /// Kind of the rejected node.
        child_kind: NodeKind,
    },

    /// The underlying tree refused the operation.
    #[error(transparent)]
    Tree(#[from] TreeError),
}
