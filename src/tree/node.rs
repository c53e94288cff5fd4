//! Nodes of the hierarchical clustering tree.

use crate::descriptor::Descriptor768;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Arena index of a node. Doubles as the node's identity.
pub type NodeId = u32;

/// Child list of an internal node. Clustering trees are built with a small
/// branching factor, so children normally live inline.
pub type Children = SmallVec<[NodeId; 8]>;

/// A node of the clustering tree.
///
/// `center` is the representative descriptor the search compares queries
/// against. Only a synthetic root may omit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Internal node: at least one child.
    Internal {
        center: Option<Descriptor768>,
        children: Children,
    },
    /// Leaf node: reference-store indices of the features in this cluster.
    Leaf {
        center: Option<Descriptor768>,
        reverse_index: Vec<u32>,
    },
}

impl Node {
    /// Representative descriptor, if any.
    pub fn center(&self) -> Option<&Descriptor768> {
        match self {
            Node::Internal { center, .. } | Node::Leaf { center, .. } => center.as_ref(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Child ids; empty for a leaf.
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Internal { children, .. } => children.as_slice(),
            Node::Leaf { .. } => &[],
        }
    }

    /// Reference indices clustered at this node; empty for an internal node.
    pub fn reverse_index(&self) -> &[u32] {
        match self {
            Node::Leaf { reverse_index, .. } => reverse_index.as_slice(),
            Node::Internal { .. } => &[],
        }
    }
}
