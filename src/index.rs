//! Shortlist providers for index-accelerated matching.

use crate::config::SelectorParams;
use crate::descriptor::Descriptor768;
use crate::selector::{QueryStats, Selector};
use crate::tree::HierarchicalTree;

/// Source of candidate reference indices for a query descriptor.
///
/// Implementations may be approximate: a shortlist can miss the true nearest
/// neighbor. The returned slice is only valid until the next call.
pub trait CandidateIndex {
    /// Indices into the reference store worth comparing against `query`.
    fn candidates(&mut self, query: &Descriptor768) -> &[u32];
}

/// A [`Selector`] bound to the tree it searches.
///
/// The tree is borrowed, so one tree can back many `TreeIndex`es, one per
/// thread.
#[derive(Debug)]
pub struct TreeIndex<'t> {
    tree: &'t HierarchicalTree,
    selector: Selector,
}

impl<'t> TreeIndex<'t> {
    pub fn new(tree: &'t HierarchicalTree, selector: Selector) -> Self {
        Self { tree, selector }
    }

    pub fn with_params(tree: &'t HierarchicalTree, params: &SelectorParams) -> Self {
        Self::new(tree, Selector::with_params(params))
    }

    pub fn tree(&self) -> &'t HierarchicalTree {
        self.tree
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Counters of the most recent lookup.
    pub fn last_stats(&self) -> QueryStats {
        self.selector.last_stats()
    }
}

impl CandidateIndex for TreeIndex<'_> {
    fn candidates(&mut self, query: &Descriptor768) -> &[u32] {
        self.selector.query(self.tree, query);
        self.selector.results()
    }
}

/// Every reference index, in order. Turns indexed matching into brute force.
#[derive(Debug, Clone, Default)]
pub struct ExhaustiveIndex {
    all: Vec<u32>,
}

impl ExhaustiveIndex {
    pub fn new(len: usize) -> Self {
        Self {
            all: (0..len as u32).collect(),
        }
    }
}

impl CandidateIndex for ExhaustiveIndex {
    fn candidates(&mut self, _query: &Descriptor768) -> &[u32] {
        &self.all
    }
}
