//! Planar homographies used to gate matching by position.

use nalgebra::{Matrix3, Vector2, Vector3};

/// A 3×3 projective transform between two image planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography(Matrix3<f64>);

impl Homography {
    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    /// Build from nine row-major coefficients.
    pub fn from_row_slice(h: &[f64; 9]) -> Self {
        Self(Matrix3::from_row_slice(h))
    }

    pub fn from_matrix(m: Matrix3<f64>) -> Self {
        Self(m)
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }

    pub fn determinant(&self) -> f64 {
        self.0.determinant()
    }

    /// Inverse transform, or `None` if the matrix is singular.
    pub fn invert(&self) -> Option<Self> {
        self.invert_with_threshold(0.0)
    }

    /// Inverse transform, or `None` if `|det| <= threshold` or the
    /// determinant is not finite.
    pub fn invert_with_threshold(&self, threshold: f64) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() <= threshold {
            return None;
        }
        self.0.try_inverse().map(Self)
    }

    /// Map an inhomogeneous point.
    #[inline]
    pub fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        let p = self.0 * Vector3::new(x, y, 1.0);
        (p.x / p.z, p.y / p.z)
    }

    /// Geometric sanity check for a homography that maps a
    /// `ref_width` × `ref_height` reference image into a frame.
    ///
    /// The mapped corners must form a convex quadrilateral and none of the
    /// four corner triangles may be thinner than 1/10000 of the reference
    /// area.
    pub fn is_plausible(&self, ref_width: f64, ref_height: f64) -> bool {
        let corners = [
            (0.0, 0.0),
            (ref_width, 0.0),
            (ref_width, ref_height),
            (0.0, ref_height),
        ]
        .map(|(x, y)| {
            let (u, v) = self.transform(x, y);
            Vector2::new(u, v)
        });
        if corners.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return false;
        }
        let [x1, x2, x3, x4] = corners;

        let min_area = ref_width * ref_height * 0.0001;
        let smallest = [
            triangle_area(&x1, &x2, &x3),
            triangle_area(&x1, &x3, &x4),
            triangle_area(&x1, &x2, &x4),
            triangle_area(&x2, &x3, &x4),
        ]
        .into_iter()
        .fold(f64::INFINITY, f64::min);
        if smallest < min_area {
            return false;
        }

        let turn = |a: &Vector2<f64>, b: &Vector2<f64>, c: &Vector2<f64>| -> i32 {
            if cross(&(b - a), &(c - a)) > 0.0 {
                1
            } else {
                -1
            }
        };
        let s = turn(&x1, &x2, &x3) + turn(&x2, &x3, &x4) + turn(&x3, &x4, &x1) + turn(&x4, &x1, &x2);
        s.abs() == 4
    }
}

impl Default for Homography {
    fn default() -> Self {
        Self::identity()
    }
}

fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

fn triangle_area(a: &Vector2<f64>, b: &Vector2<f64>, c: &Vector2<f64>) -> f64 {
    0.5 * cross(&(b - a), &(c - a)).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_round_trips_points() {
        let h = Homography::from_row_slice(&[1.2, 0.1, 5.0, -0.05, 0.9, -3.0, 1e-4, 2e-4, 1.0]);
        let inv = h.invert().unwrap();
        let (u, v) = h.transform(40.0, 25.0);
        let (x, y) = inv.transform(u, v);
        assert!((x - 40.0).abs() < 1e-9);
        assert!((y - 25.0).abs() < 1e-9);
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let h = Homography::from_row_slice(&[1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 0.0, 1.0]);
        assert_eq!(h.determinant(), 0.0);
        assert!(h.invert().is_none());
    }

    #[test]
    fn threshold_rejects_near_singular() {
        let h = Homography::from_row_slice(&[1e-3, 0.0, 0.0, 0.0, 1e-3, 0.0, 0.0, 0.0, 1.0]);
        assert!(h.invert().is_some());
        assert!(h.invert_with_threshold(1e-5).is_none());
    }

    #[test]
    fn non_finite_matrix_has_no_inverse() {
        let h = Homography::from_row_slice(&[f64::NAN, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        assert!(h.invert().is_none());
    }

    #[test]
    fn identity_is_plausible() {
        assert!(Homography::identity().is_plausible(640.0, 480.0));
    }

    #[test]
    fn collapsed_projection_is_implausible() {
        let h = Homography::from_row_slice(&[1e-3, 0.0, 0.0, 0.0, 1e-3, 0.0, 0.0, 0.0, 1.0]);
        assert!(!h.is_plausible(640.0, 480.0));
    }

    #[test]
    fn folded_projection_is_implausible() {
        // the horizon crosses the reference image, folding the far corners back
        let w = 640.0;
        let h = Homography::from_row_slice(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, -2.0 / w, 0.0, 1.0]);
        assert!(!h.is_plausible(w, 480.0));
    }
}
