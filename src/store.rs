//! Per-frame feature storage: descriptors plus parallel point records.

use crate::descriptor::{Descriptor768, DESCRIPTOR_BYTES};
use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};

/// Location and attributes of a detected feature point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeaturePoint {
    pub x: f32,
    pub y: f32,
    /// Orientation in radians.
    pub angle: f32,
    pub scale: f32,
    /// Whether the point is a scale-space maximum (as opposed to a minimum).
    /// Only points with the same extremum sign are ever compared.
    pub maxima: bool,
}

impl FeaturePoint {
    pub fn new(x: f32, y: f32, maxima: bool) -> Self {
        Self {
            x,
            y,
            angle: 0.0,
            scale: 1.0,
            maxima,
        }
    }
}

/// Descriptors and point records of one image, index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureStore {
    descriptors: Vec<Descriptor768>,
    points: Vec<FeaturePoint>,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            descriptors: Vec::with_capacity(capacity),
            points: Vec::with_capacity(capacity),
        }
    }

    /// Build from parallel arrays of equal length.
    pub fn from_parts(descriptors: Vec<Descriptor768>, points: Vec<FeaturePoint>) -> Result<Self> {
        if descriptors.len() != points.len() {
            return Err(MatchError::StoreMismatch {
                descriptors: descriptors.len(),
                points: points.len(),
            });
        }
        Ok(Self {
            descriptors,
            points,
        })
    }

    /// Build from descriptors packed back to back, 96 bytes each.
    pub fn from_packed(bytes: &[u8], points: Vec<FeaturePoint>) -> Result<Self> {
        if bytes.len() % DESCRIPTOR_BYTES != 0 {
            return Err(MatchError::DescriptorLength {
                expected: DESCRIPTOR_BYTES,
                actual: bytes.len() % DESCRIPTOR_BYTES,
            });
        }
        let descriptors = bytes
            .chunks_exact(DESCRIPTOR_BYTES)
            .map(Descriptor768::from_bytes)
            .collect::<Result<Vec<_>>>()?;
        Self::from_parts(descriptors, points)
    }

    pub fn push(&mut self, descriptor: Descriptor768, point: FeaturePoint) {
        self.descriptors.push(descriptor);
        self.points.push(point);
    }

    /// Drop all features, keeping the allocations for the next frame.
    pub fn clear(&mut self) {
        self.descriptors.clear();
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    #[inline]
    pub fn descriptor(&self, i: usize) -> &Descriptor768 {
        &self.descriptors[i]
    }

    #[inline]
    pub fn point(&self, i: usize) -> &FeaturePoint {
        &self.points[i]
    }

    pub fn descriptors(&self) -> &[Descriptor768] {
        &self.descriptors
    }

    pub fn points(&self) -> &[FeaturePoint] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_arrays_aligned() {
        let mut s = FeatureStore::with_capacity(2);
        s.push(Descriptor768::zeros(), FeaturePoint::new(1.0, 2.0, true));
        s.push(
            Descriptor768::zeros().with_bit_flipped(1),
            FeaturePoint::new(3.0, 4.0, false),
        );
        assert_eq!(s.len(), 2);
        assert_eq!(s.point(1).x, 3.0);
        assert!(s.descriptor(1).bit(1));

        s.clear();
        assert!(s.is_empty());
    }

    #[test]
    fn from_parts_rejects_length_mismatch() {
        let err = FeatureStore::from_parts(vec![Descriptor768::zeros()], Vec::new()).unwrap_err();
        assert_eq!(
            err,
            MatchError::StoreMismatch {
                descriptors: 1,
                points: 0
            }
        );
    }

    #[test]
    fn from_packed_splits_rows() {
        let mut bytes = vec![0u8; 2 * DESCRIPTOR_BYTES];
        bytes[DESCRIPTOR_BYTES] = 1;
        let points = vec![FeaturePoint::new(0.0, 0.0, true); 2];
        let s = FeatureStore::from_packed(&bytes, points).unwrap();
        assert_eq!(s.len(), 2);
        assert!(!s.descriptor(0).bit(0));
        assert!(s.descriptor(1).bit(0));
    }

    #[test]
    fn from_packed_rejects_partial_row() {
        let bytes = vec![0u8; DESCRIPTOR_BYTES + 5];
        let err = FeatureStore::from_packed(&bytes, Vec::new()).unwrap_err();
        assert!(matches!(err, MatchError::DescriptorLength { .. }));
    }
}
