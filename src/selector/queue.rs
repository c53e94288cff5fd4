//! Bounded best-first queue of deferred tree nodes.

use super::Candidate;

/// Fixed-capacity priority list that keeps the `K` smallest distances seen.
///
/// Entries are held sorted by descending distance, so the smallest entry sits
/// at the end and [`pop_smallest`](Self::pop_smallest) is O(1). Pushing onto a
/// full list evicts the current worst entry when the new one is strictly
/// better; otherwise the new entry is dropped. Entries of equal distance pop
/// in insertion order.
#[derive(Debug, Clone)]
pub struct BoundedPriorityList {
    items: Box<[Candidate]>,
    len: usize,
}

impl BoundedPriorityList {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: vec![Candidate::default(); capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Offer a candidate. Returns `false` if it was dropped.
    pub fn push(&mut self, item: Candidate) -> bool {
        if self.len == self.items.len() {
            match self.items.first() {
                Some(worst) if item.distance < worst.distance => {
                    self.items.copy_within(1..self.len, 0);
                    self.len -= 1;
                }
                // full (or zero capacity) and not better than the worst
                _ => return false,
            }
        }

        // Insert ahead of equal distances so older entries stay nearer the tail.
        let pos = self.items[..self.len].partition_point(|c| c.distance > item.distance);
        self.items.copy_within(pos..self.len, pos + 1);
        self.items[pos] = item;
        self.len += 1;
        true
    }

    /// Remove and return the smallest-distance entry.
    #[inline]
    pub fn pop_smallest(&mut self) -> Option<Candidate> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.items[self.len])
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(q: &mut BoundedPriorityList) -> Vec<(u32, u32)> {
        std::iter::from_fn(|| q.pop_smallest())
            .map(|c| (c.node, c.distance))
            .collect()
    }

    #[test]
    fn pops_in_ascending_distance() {
        let mut q = BoundedPriorityList::new(8);
        for (node, d) in [(1, 50), (2, 10), (3, 30), (4, 20)] {
            assert!(q.push(Candidate::new(node, d)));
        }
        assert_eq!(drain(&mut q), vec![(2, 10), (4, 20), (3, 30), (1, 50)]);
        assert!(q.pop_smallest().is_none());
    }

    #[test]
    fn equal_distances_pop_first_in_first_out() {
        let mut q = BoundedPriorityList::new(4);
        q.push(Candidate::new(1, 7));
        q.push(Candidate::new(2, 7));
        q.push(Candidate::new(3, 3));
        q.push(Candidate::new(4, 7));
        assert_eq!(drain(&mut q), vec![(3, 3), (1, 7), (2, 7), (4, 7)]);
    }

    #[test]
    fn full_list_evicts_current_worst() {
        let mut q = BoundedPriorityList::new(2);
        q.push(Candidate::new(1, 40));
        q.push(Candidate::new(2, 20));
        // better than the worst (40): evicts node 1
        assert!(q.push(Candidate::new(3, 30)));
        assert_eq!(q.len(), 2);
        assert_eq!(drain(&mut q), vec![(2, 20), (3, 30)]);
    }

    #[test]
    fn full_list_drops_worse_or_equal() {
        let mut q = BoundedPriorityList::new(2);
        q.push(Candidate::new(1, 10));
        q.push(Candidate::new(2, 20));
        assert!(!q.push(Candidate::new(3, 25)));
        assert!(!q.push(Candidate::new(4, 20)));
        assert_eq!(drain(&mut q), vec![(1, 10), (2, 20)]);
    }

    #[test]
    fn keeps_k_smallest_of_a_stream() {
        let mut q = BoundedPriorityList::new(3);
        for (node, d) in [9, 4, 7, 1, 8, 2, 6].into_iter().enumerate() {
            q.push(Candidate::new(node as u32, d));
        }
        let kept: Vec<u32> = drain(&mut q).into_iter().map(|(_, d)| d).collect();
        assert_eq!(kept, vec![1, 2, 4]);
    }

    #[test]
    fn zero_capacity_drops_everything() {
        let mut q = BoundedPriorityList::new(0);
        assert!(!q.push(Candidate::new(1, 0)));
        assert!(q.pop_smallest().is_none());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut q = BoundedPriorityList::new(2);
        q.push(Candidate::new(1, 1));
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.capacity(), 2);
    }
}
