//! freakmatch: binary-descriptor search and matching for natural-feature
//! tracking.
//!
//! Keypoints detected in a camera frame are described by 768-bit binary
//! descriptors and compared to the keypoints of a reference image under the
//! Hamming distance. The crate is organized as:
//!
//! - `descriptor`: [`Descriptor768`] and its Hamming distance
//! - `tree`: the read-only [`HierarchicalTree`] over reference descriptors
//! - `selector`: bounded best-first search of that tree ([`Selector`])
//! - `index`: the [`CandidateIndex`] seam between search and matching
//! - `store`: per-image features ([`FeatureStore`])
//! - `matcher`: ratio-test matching ([`BinaryFeatureMatcher`])
//! - `homography`: projective transforms used to gate matching by position
//!
//! # Critical Nuances
//!
//! ## Search is approximate
//!
//! The selector visits the tied-nearest children of every node it reaches,
//! then revisits at most `max_nodes_to_pop` deferred nodes. Raising the
//! budget usually improves recall, but the deferred queue keeps only the
//! best candidates seen so far, so a larger budget is not a strict superset
//! of a smaller one.
//!
//! ## Ties are ambiguous
//!
//! The ratio test compares the best distance to the second best. A second
//! candidate at the *same* distance as the best gives a ratio of 1 and the
//! query is rejected, which drops repetitive texture.
//!
//! ## Extremum sign
//!
//! Scale-space maxima and minima are never compared with each other, in
//! every matching mode.
//!
//! # Example
//!
//! ```
//! use freakmatch::{BinaryFeatureMatcher, Descriptor768, FeaturePoint, FeatureStore};
//!
//! let near = Descriptor768::zeros().with_bit_flipped(3);
//! let far = (0..40).fold(Descriptor768::zeros(), |d, i| d.with_bit_flipped(i));
//!
//! let mut reference = FeatureStore::new();
//! reference.push(far, FeaturePoint::new(0.0, 0.0, true));
//! reference.push(near, FeaturePoint::new(8.0, 8.0, true));
//!
//! let mut query = FeatureStore::new();
//! query.push(Descriptor768::zeros(), FeaturePoint::new(8.0, 8.0, true));
//!
//! let mut matcher = BinaryFeatureMatcher::new();
//! assert_eq!(matcher.match_brute_force(&query, &reference), 1);
//! assert_eq!(matcher.matches()[0].reference_index, 1);
//! ```

pub mod config;
pub mod descriptor;
pub mod error;
pub mod homography;
pub mod index;
pub mod matcher;
pub mod selector;
pub mod store;
pub mod tree;

// Re-exports
pub use config::{MatchConfig, MatcherParams, SelectorParams};
pub use descriptor::Descriptor768;
pub use error::{MatchError, Result};
pub use homography::Homography;
pub use index::{CandidateIndex, ExhaustiveIndex, TreeIndex};
pub use matcher::{BinaryFeatureMatcher, Match};
pub use selector::{QueryStats, Selector};
pub use store::{FeaturePoint, FeatureStore};
pub use tree::{HierarchicalTree, Node, NodeId, TreeBuilder};
