//! Fixed-capacity traversal scratch space.

use super::Candidate;

/// Append-only buffer of `(node, distance)` slots.
///
/// Each visited internal node writes its children into the next free window
/// of slots and reorders them in place. Nothing is ever popped during a
/// query, so the capacity bounds the total number of children a single query
/// can score. The backing storage is allocated once and never grows.
#[derive(Debug, Clone)]
pub struct ScratchStack {
    items: Box<[Candidate]>,
    len: usize,
}

impl ScratchStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: vec![Candidate::default(); capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Claim the next free slot, or `None` when the stack is full.
    #[inline]
    pub fn pre_push(&mut self) -> Option<&mut Candidate> {
        let slot = self.items.get_mut(self.len)?;
        self.len += 1;
        Some(slot)
    }

    /// Slot `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[inline]
    pub fn get(&self, i: usize) -> Candidate {
        self.items[..self.len][i]
    }

    /// Exchange slots `i` and `j`.
    #[inline]
    pub fn swap(&mut self, i: usize, j: usize) {
        self.items[..self.len].swap(i, j);
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

    #[test]
    fn signals_full_instead_of_growing() {
        let mut s = ScratchStack::new(2);
        *s.pre_push().unwrap() = Candidate::new(1, 10);
        *s.pre_push().unwrap() = Candidate::new(2, 20);
        assert!(s.pre_push().is_none());
        assert_eq!(s.len(), 2);
        assert_eq!(s.capacity(), 2);
    }

    #[test]
    fn swap_and_clear() {
        let mut s = ScratchStack::new(4);
        *s.pre_push().unwrap() = Candidate::new(1, 10);
        *s.pre_push().unwrap() = Candidate::new(2, 20);
        s.swap(0, 1);
        assert_eq!(s.get(0), Candidate::new(2, 20));
        assert_eq!(s.get(1), Candidate::new(1, 10));

        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.capacity(), 4);
        assert!(s.pre_push().is_some());
    }

    #[test]
    fn zero_capacity_is_always_full() {
        let mut s = ScratchStack::new(0);
        assert!(s.pre_push().is_none());
    }

    #[test]
    #[should_panic]
    fn reading_past_len_panics() {
        let s = ScratchStack::new(4);
        let _ = s.get(0);
    }
}
