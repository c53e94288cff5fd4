//! 768-bit binary descriptors compared by Hamming distance.
//!
//! FREAK-style descriptors are 96 bytes. They are stored as twelve `u64`
//! words so a distance is twelve XOR + popcount operations with no per-byte
//! lookup table.

use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};

/// Number of bytes in a packed descriptor.
pub const DESCRIPTOR_BYTES: usize = 96;

/// Number of bits in a descriptor.
pub const DESCRIPTOR_BITS: usize = DESCRIPTOR_BYTES * 8;

const WORDS: usize = DESCRIPTOR_BYTES / 8;

/// A fixed-size 768-bit binary descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Descriptor768([u64; WORDS]);

impl Descriptor768 {
    /// All-zero descriptor.
    pub const fn zeros() -> Self {
        Self([0; WORDS])
    }

    /// Build from little-endian packed words.
    pub const fn from_words(words: [u64; WORDS]) -> Self {
        Self(words)
    }

    /// Build from a packed 96-byte row.
    ///
    /// Bytes are packed little-endian into words, so bit `i` of the
    /// descriptor is bit `i % 8` of byte `i / 8`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != DESCRIPTOR_BYTES {
            return Err(MatchError::DescriptorLength {
                expected: DESCRIPTOR_BYTES,
                actual: bytes.len(),
            });
        }
        let mut words = [0u64; WORDS];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            *word = u64::from_le_bytes(buf);
        }
        Ok(Self(words))
    }

    /// Packed 96-byte representation, inverse of [`Descriptor768::from_bytes`].
    pub fn to_bytes(&self) -> [u8; DESCRIPTOR_BYTES] {
        let mut out = [0u8; DESCRIPTOR_BYTES];
        for (chunk, word) in out.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }

    /// Raw words.
    pub fn words(&self) -> &[u64; WORDS] {
        &self.0
    }

    /// Value of bit `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= DESCRIPTOR_BITS`.
    pub fn bit(&self, i: usize) -> bool {
        assert!(i < DESCRIPTOR_BITS, "bit index {i} out of range");
        (self.0[i / 64] >> (i % 64)) & 1 == 1
    }

    /// Copy of this descriptor with bit `i` inverted.
    ///
    /// # Panics
    ///
    /// Panics if `i >= DESCRIPTOR_BITS`.
    #[must_use]
    pub fn with_bit_flipped(mut self, i: usize) -> Self {
        assert!(i < DESCRIPTOR_BITS, "bit index {i} out of range");
        self.0[i / 64] ^= 1u64 << (i % 64);
        self
    }

    /// Hamming distance to another descriptor (number of differing bits).
    #[inline]
    #[must_use]
    pub fn hamming_distance(&self, other: &Self) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }
}

impl Default for Descriptor768 {
    fn default() -> Self {
        Self::zeros()
    }
}
