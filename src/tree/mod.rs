//! Immutable binary hierarchical clustering tree.
//!
//! The tree is a flat arena of [`Node`]s addressed by [`NodeId`]. Building
//! (clustering) the tree happens elsewhere; this module only assembles a
//! provider's nodes and checks that they form a proper tree:
//!
//! - the root id is in range and is nobody's child
//! - internal nodes have at least one child
//! - every child id is in range and every child has a center
//! - every non-root node has exactly one parent and is reachable from the root
//!
//! Once built the tree is never mutated, so a `&HierarchicalTree` can be
//! shared by any number of [`Selector`](crate::selector::Selector)s on
//! different threads.

mod node;

pub use node::{Children, Node, NodeId};

use crate::descriptor::Descriptor768;
use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};

/// Validated clustering tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TreeParts")]
pub struct HierarchicalTree {
    root: NodeId,
    nodes: Vec<Node>,
}

/// Unvalidated wire shape of a tree.
#[derive(Deserialize)]
struct TreeParts {
    root: NodeId,
    nodes: Vec<Node>,
}

impl TryFrom<TreeParts> for HierarchicalTree {
    type Error = MatchError;

    fn try_from(parts: TreeParts) -> Result<Self> {
        Self::from_parts(parts.nodes, parts.root)
    }
}

impl HierarchicalTree {
    /// Assemble a tree from an arena of nodes.
    pub fn from_parts(nodes: Vec<Node>, root: NodeId) -> Result<Self> {
        validate(&nodes, root)?;
        Ok(Self { root, nodes })
    }

    /// Degenerate tree whose root is a single leaf holding `reverse_index`.
    pub fn single_leaf(reverse_index: Vec<u32>) -> Self {
        Self {
            root: 0,
            nodes: vec![Node::Leaf {
                center: None,
                reverse_index,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a node of this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Hamming distance from `query` to the center of node `id`.
    ///
    /// Nodes without a center (only the root may lack one) are infinitely far.
    #[inline]
    pub(crate) fn center_distance(&self, id: NodeId, query: &Descriptor768) -> u32 {
        self.node(id)
            .center()
            .map_or(u32::MAX, |c| c.hamming_distance(query))
    }
}

fn validate(nodes: &[Node], root: NodeId) -> Result<()> {
    let n = nodes.len();
    if root as usize >= n {
        return Err(MatchError::MalformedTree(format!(
            "root {root} out of range for {n} nodes"
        )));
    }

    let mut has_parent = vec![false; n];
    for (id, node) in nodes.iter().enumerate() {
        let Node::Internal { children, .. } = node else {
            continue;
        };
        if children.is_empty() {
            return Err(MatchError::MalformedTree(format!(
                "internal node {id} has no children"
            )));
        }
        for &child in children.iter() {
            let Some(c) = nodes.get(child as usize) else {
                return Err(MatchError::MalformedTree(format!(
                    "node {id} references missing child {child}"
                )));
            };
            if child == root {
                return Err(MatchError::MalformedTree(format!(
                    "root {root} is listed as a child of node {id}"
                )));
            }
            if c.center().is_none() {
                return Err(MatchError::MalformedTree(format!(
                    "child {child} of node {id} has no center"
                )));
            }
            if std::mem::replace(&mut has_parent[child as usize], true) {
                return Err(MatchError::MalformedTree(format!(
                    "node {child} has more than one parent"
                )));
            }
        }
    }

    // Single parents plus a parentless root leave orphaned cycles as the only
    // remaining defect; a reachability walk catches those.
    let mut seen = vec![false; n];
    let mut stack = vec![root];
    let mut reached = 0usize;
    while let Some(id) = stack.pop() {
        if std::mem::replace(&mut seen[id as usize], true) {
            continue;
        }
        reached += 1;
        stack.extend_from_slice(nodes[id as usize].children());
    }
    if reached != n {
        return Err(MatchError::MalformedTree(format!(
            "{} of {n} nodes are unreachable from root {root}",
            n - reached
        )));
    }
    Ok(())
}

/// Incremental, bottom-up assembly of a [`HierarchicalTree`].
///
/// Children must be added before their parent; ids are handed out in
/// insertion order.
///
/// ```
/// use freakmatch::{Descriptor768, TreeBuilder};
///
/// let mut b = TreeBuilder::new();
/// let left = b.add_leaf(Some(Descriptor768::zeros()), vec![0, 1]);
/// let right = b.add_leaf(Some(Descriptor768::zeros().with_bit_flipped(3)), vec![2]);
/// let root = b.add_internal(None, &[left, right]);
/// let tree = b.build(root).unwrap();
/// assert_eq!(tree.leaf_count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leaf holding `reverse_index`.
    pub fn add_leaf(
        &mut self,
        center: Option<Descriptor768>,
        reverse_index: impl Into<Vec<u32>>,
    ) -> NodeId {
        self.push(Node::Leaf {
            center,
            reverse_index: reverse_index.into(),
        })
    }

    /// Add an internal node over already added `children`, kept in order.
    pub fn add_internal(&mut self, center: Option<Descriptor768>, children: &[NodeId]) -> NodeId {
        self.push(Node::Internal {
            center,
            children: Children::from_slice(children),
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Validate and freeze the tree rooted at `root`.
    pub fn build(self, root: NodeId) -> Result<HierarchicalTree> {
        HierarchicalTree::from_parts(self.nodes, root)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }
}
