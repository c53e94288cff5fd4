//! Bounded best-first search over a [`HierarchicalTree`].
//!
//! # Algorithm
//!
//! Starting at the root, every internal node scores all of its children
//! against the query descriptor:
//!
//! - children tied at the minimum distance are descended into immediately,
//!   depth first (ties are all explored, never broken arbitrarily)
//! - every other child is deferred to a [`BoundedPriorityList`] that lives for
//!   the whole query
//!
//! After its tied-minimal children, each internal node pops exactly one
//! deferred node (the globally closest one so far) and visits it. Leaves
//! append their reverse index to the result buffer.
//!
//! The amount of work is bounded by the list capacity (`max_nodes_to_pop`),
//! the scratch stack capacity and the result capacity (`max_results`). All
//! three are allocated when the selector is created; a query never allocates.
//!
//! # Degradation
//!
//! Running out of scratch slots stops the scoring of the current node, which
//! then contributes no minimal children (it still resumes one deferred node).
//! A full result buffer silently drops further entries. Both are reported in
//! [`QueryStats`], neither is an error.
//!
//! # Concurrency
//!
//! A selector is private scratch state: use one per thread. The tree it
//! searches is shared read-only.

mod queue;
mod stack;

pub use queue::BoundedPriorityList;
pub use stack::ScratchStack;

use crate::config::SelectorParams;
use crate::descriptor::Descriptor768;
use crate::tree::{HierarchicalTree, Node, NodeId};
use tracing::trace;

/// A tree node paired with its distance to the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Candidate {
    pub node: NodeId,
    pub distance: u32,
}

impl Candidate {
    pub fn new(node: NodeId, distance: u32) -> Self {
        Self { node, distance }
    }
}

/// Counters describing the most recent query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Nodes visited (leaves appended plus internal nodes scored).
    pub nodes_visited: usize,
    /// Deferred nodes taken back from the priority list.
    pub deferred_pops: usize,
    /// Some node could not score its children for lack of scratch slots.
    pub scratch_exhausted: bool,
    /// Some reverse-index entries were dropped for lack of result capacity.
    pub results_truncated: bool,
}

/// Approximate nearest-neighbor search engine for one thread.
#[derive(Debug, Clone)]
pub struct Selector {
    results: Box<[u32]>,
    num_results: usize,
    queue: BoundedPriorityList,
    stack: ScratchStack,
    stats: QueryStats,
}

impl Selector {
    /// Create a selector with the default scratch capacity.
    pub fn new(max_nodes_to_pop: usize, max_results: usize) -> Self {
        Self::with_params(&SelectorParams {
            max_nodes_to_pop,
            max_results,
            ..SelectorParams::default()
        })
    }

    pub fn with_params(params: &SelectorParams) -> Self {
        Self {
            results: vec![0; params.max_results].into_boxed_slice(),
            num_results: 0,
            queue: BoundedPriorityList::new(params.max_nodes_to_pop),
            stack: ScratchStack::new(params.scratch_capacity),
            stats: QueryStats::default(),
        }
    }

    /// Search `tree` from its root. Returns the number of collected
    /// reverse-index entries, readable through [`results`](Self::results).
    pub fn query(&mut self, tree: &HierarchicalTree, feature: &Descriptor768) -> usize {
        self.query_from(tree, tree.root(), feature)
    }

    /// Search the subtree rooted at `start`.
    ///
    /// # Panics
    ///
    /// Panics if `start` is not a node of `tree`.
    pub fn query_from(
        &mut self,
        tree: &HierarchicalTree,
        start: NodeId,
        feature: &Descriptor768,
    ) -> usize {
        self.num_results = 0;
        self.queue.clear();
        self.stack.clear();
        self.stats = QueryStats::default();

        self.visit(tree, start, feature);

        trace!(
            candidates = self.num_results,
            nodes_visited = self.stats.nodes_visited,
            deferred_pops = self.stats.deferred_pops,
            scratch_exhausted = self.stats.scratch_exhausted,
            results_truncated = self.stats.results_truncated,
            "selector query finished"
        );
        self.num_results
    }

    /// Reverse-index entries collected by the last query.
    pub fn results(&self) -> &[u32] {
        &self.results[..self.num_results]
    }

    pub fn last_stats(&self) -> QueryStats {
        self.stats
    }

    pub fn max_results(&self) -> usize {
        self.results.len()
    }

    pub fn max_nodes_to_pop(&self) -> usize {
        self.queue.capacity()
    }

    pub fn scratch_capacity(&self) -> usize {
        self.stack.capacity()
    }

    fn visit(&mut self, tree: &HierarchicalTree, id: NodeId, feature: &Descriptor768) {
        self.stats.nodes_visited += 1;
        match tree.node(id) {
            Node::Leaf { reverse_index, .. } => self.append(reverse_index),
            Node::Internal { children, .. } => self.descend(tree, children, feature),
        }
    }

    fn descend(&mut self, tree: &HierarchicalTree, children: &[NodeId], feature: &Descriptor768) {
        let sp = self.stack.len();
        let num_min = self.nearest(tree, children, feature);

        // Slots below the current top are never overwritten by deeper calls.
        for i in sp..sp + num_min {
            let child = self.stack.get(i).node;
            self.visit(tree, child, feature);
        }

        if let Some(next) = self.queue.pop_smallest() {
            self.stats.deferred_pops += 1;
            self.visit(tree, next.node, feature);
        }
    }

    /// Score `children` into a fresh stack window, move the tied-minimal ones
    /// to its front and defer the rest. Returns the number of tied-minimal
    /// children, or 0 if the stack ran out of slots.
    fn nearest(
        &mut self,
        tree: &HierarchicalTree,
        children: &[NodeId],
        feature: &Descriptor768,
    ) -> usize {
        let sp = self.stack.len();
        let mut min = u32::MAX;
        for &child in children {
            let distance = tree.center_distance(child, feature);
            let Some(slot) = self.stack.pre_push() else {
                self.stats.scratch_exhausted = true;
                return 0;
            };
            *slot = Candidate::new(child, distance);
            min = min.min(distance);
        }

        let mut num_min = 0;
        for i in sp..sp + children.len() {
            let item = self.stack.get(i);
            if item.distance == min {
                self.stack.swap(sp + num_min, i);
                num_min += 1;
            } else {
                self.queue.push(item);
            }
        }
        num_min
    }

    fn append(&mut self, reverse_index: &[u32]) {
        let free = self.results.len() - self.num_results;
        let n = reverse_index.len().min(free);
        if n < reverse_index.len() {
            self.stats.results_truncated = true;
        }
        self.results[self.num_results..self.num_results + n].copy_from_slice(&reverse_index[..n]);
        self.num_results += n;
    }
}
