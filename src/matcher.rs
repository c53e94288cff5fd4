//! Binary feature matching with a first/second-best ratio test.
//!
//! Three ways to choose the reference candidates of each query feature:
//!
//! - [`match_brute_force`](BinaryFeatureMatcher::match_brute_force): every
//!   reference feature
//! - [`match_indexed`](BinaryFeatureMatcher::match_indexed): the shortlist of
//!   a [`CandidateIndex`], typically a [`TreeIndex`](crate::index::TreeIndex)
//! - [`match_with_homography`](BinaryFeatureMatcher::match_with_homography):
//!   reference features near the query's position mapped into the reference
//!   frame
//!
//! In all three, candidates whose extremum sign differs from the query's are
//! never compared. The closest candidate is accepted when it is the only one,
//! or when `best / second_best` is strictly below the threshold. A candidate
//! at the same distance as the best counts as the second best, so ambiguous
//! ties are rejected.

use crate::config::{MatcherParams, DEFAULT_RATIO_THRESHOLD};
use crate::homography::Homography;
use crate::index::CandidateIndex;
use crate::store::FeatureStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A query feature paired with the reference feature it matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    pub query_index: u32,
    pub reference_index: u32,
}

/// Running best and second-best distance of one query feature.
#[derive(Debug, Default)]
struct BestTwo {
    /// (distance, reference index)
    best: Option<(u32, u32)>,
    second: Option<u32>,
}

impl BestTwo {
    #[inline]
    fn offer(&mut self, distance: u32, index: u32) {
        match self.best {
            Some((best, _)) if distance >= best => {
                if self.second.map_or(true, |s| distance < s) {
                    self.second = Some(distance);
                }
            }
            // first candidate, or strictly better than the best so far
            _ => {
                self.second = self.best.map(|(d, _)| d);
                self.best = Some((distance, index));
            }
        }
    }

    fn accept(&self, threshold: f64) -> Option<u32> {
        let (best, index) = self.best?;
        match self.second {
            None => Some(index),
            Some(second) => (f64::from(best) / f64::from(second) < threshold).then_some(index),
        }
    }
}

/// Matcher for stores of 768-bit descriptors.
///
/// Results of the latest call are kept in [`matches`](Self::matches) and
/// replaced by the next call. The buffer is reused, so a matcher should live
/// as long as the tracking loop (one per thread).
#[derive(Debug, Clone)]
pub struct BinaryFeatureMatcher {
    threshold: f64,
    matches: Vec<Match>,
}

impl Default for BinaryFeatureMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryFeatureMatcher {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_RATIO_THRESHOLD)
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            matches: Vec::new(),
        }
    }

    pub fn with_params(params: &MatcherParams) -> Self {
        Self::with_threshold(params.ratio_threshold)
    }

    /// Set the best/second-best ratio threshold.
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Matches found by the most recent call, ordered by query index.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Match every query feature against every reference feature.
    ///
    /// Returns the number of matches.
    pub fn match_brute_force(&mut self, query: &FeatureStore, reference: &FeatureStore) -> usize {
        self.matches.clear();
        if query.is_empty() || reference.is_empty() {
            return 0;
        }

        for (i, (qd, qp)) in query.descriptors().iter().zip(query.points()).enumerate() {
            let mut best = BestTwo::default();
            for (j, (rd, rp)) in reference
                .descriptors()
                .iter()
                .zip(reference.points())
                .enumerate()
            {
                if qp.maxima != rp.maxima {
                    continue;
                }
                best.offer(qd.hamming_distance(rd), j as u32);
            }
            self.emit(i, &best);
        }

        self.log_finished("brute_force", query, reference);
        self.matches.len()
    }

    /// Match each query feature against the shortlist `index` returns for it.
    ///
    /// Shortlist entries that are not valid reference indices are ignored.
    /// Returns the number of matches.
    pub fn match_indexed<I>(
        &mut self,
        query: &FeatureStore,
        reference: &FeatureStore,
        index: &mut I,
    ) -> usize
    where
        I: CandidateIndex + ?Sized,
    {
        self.matches.clear();
        if query.is_empty() || reference.is_empty() {
            return 0;
        }

        for (i, (qd, qp)) in query.descriptors().iter().zip(query.points()).enumerate() {
            let mut best = BestTwo::default();
            for &j in index.candidates(qd) {
                let Some(rp) = reference.points().get(j as usize) else {
                    continue;
                };
                if qp.maxima != rp.maxima {
                    continue;
                }
                best.offer(qd.hamming_distance(reference.descriptor(j as usize)), j);
            }
            self.emit(i, &best);
        }

        self.log_finished("indexed", query, reference);
        self.matches.len()
    }

    /// Match only against reference features within `radius` pixels of the
    /// query position mapped through the inverse of `h`.
    ///
    /// A singular `h` yields no matches. Returns the number of matches.
    pub fn match_with_homography(
        &mut self,
        query: &FeatureStore,
        reference: &FeatureStore,
        h: &Homography,
        radius: f64,
    ) -> usize {
        self.matches.clear();
        if query.is_empty() || reference.is_empty() {
            return 0;
        }

        let Some(h_inv) = h.invert() else {
            debug!(
                determinant = h.determinant(),
                "singular homography, skipping geometric matching"
            );
            return 0;
        };
        let radius_sq = radius * radius;

        for (i, (qd, qp)) in query.descriptors().iter().zip(query.points()).enumerate() {
            let (x, y) = h_inv.transform(f64::from(qp.x), f64::from(qp.y));

            let mut best = BestTwo::default();
            for (j, (rd, rp)) in reference
                .descriptors()
                .iter()
                .zip(reference.points())
                .enumerate()
            {
                if qp.maxima != rp.maxima {
                    continue;
                }
                let dx = x - f64::from(rp.x);
                let dy = y - f64::from(rp.y);
                if dx * dx + dy * dy > radius_sq {
                    continue;
                }
                best.offer(qd.hamming_distance(rd), j as u32);
            }
            self.emit(i, &best);
        }

        self.log_finished("homography", query, reference);
        self.matches.len()
    }

    #[inline]
    fn emit(&mut self, query_index: usize, best: &BestTwo) {
        if let Some(reference_index) = best.accept(self.threshold) {
            self.matches.push(Match {
                query_index: query_index as u32,
                reference_index,
            });
        }
    }

    fn log_finished(&self, variant: &str, query: &FeatureStore, reference: &FeatureStore) {
        debug!(
            variant,
            query = query.len(),
            reference = reference.len(),
            matches = self.matches.len(),
            threshold = self.threshold,
            "feature matching finished"
        );
    }
}
