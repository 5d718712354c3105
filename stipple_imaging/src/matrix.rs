// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row-major 3×3 transform matrix.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Affine;

/// A 3×3 projective transform.
///
/// The nine coefficients are stored row-major as
/// `[scale_x, skew_x, trans_x, skew_y, scale_y, trans_y, persp_0, persp_1, persp_2]`,
/// which is also the layout exchanged at the call boundary.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix(pub [f32; 9]);

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// Build a matrix from an optional nine-element slice.
    ///
    /// A missing slice means identity. A slice of any other length is
    /// rejected.
    pub fn from_slice(values: Option<&[f32]>) -> Option<Self> {
        match values {
            None => Some(Self::IDENTITY),
            Some(v) => <[f32; 9]>::try_from(v).ok().map(Self),
        }
    }

    /// A translation.
    pub const fn translate(dx: f32, dy: f32) -> Self {
        Self([1.0, 0.0, dx, 0.0, 1.0, dy, 0.0, 0.0, 1.0])
    }

    /// A scale about the origin.
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self([sx, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 1.0])
    }

    /// A skew about the origin.
    pub const fn skew(kx: f32, ky: f32) -> Self {
        Self([1.0, kx, 0.0, ky, 1.0, 0.0, 0.0, 0.0, 1.0])
    }

    /// A clockwise rotation (in a y-down space) about the origin.
    ///
    /// Multiples of 90° produce exact coefficients.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "sine and cosine are within [-1, 1]"
    )]
    pub fn rotate_degrees(degrees: f32) -> Self {
        let (s, c) = f64::from(degrees).to_radians().sin_cos();
        let snap = |v: f64| if v.abs() < 1e-7 { 0.0 } else { v as f32 };
        let (s, c) = (snap(s), snap(c));
        Self([c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0])
    }

    /// Whether this is exactly the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Whether the bottom row is not `[0, 0, 1]`.
    pub fn has_perspective(&self) -> bool {
        let m = &self.0;
        m[6] != 0.0 || m[7] != 0.0 || m[8] != 1.0
    }

    /// The product `self × other`, i.e. `other` is applied to points first.
    pub fn concat(&self, other: &Self) -> Self {
        let a = &self.0;
        let b = &other.0;
        let mut out = [0.0_f32; 9];
        for row in 0..3 {
            for col in 0..3 {
                out[row * 3 + col] = a[row * 3] * b[col]
                    + a[row * 3 + 1] * b[3 + col]
                    + a[row * 3 + 2] * b[6 + col];
            }
        }
        Self(out)
    }

    /// Map a point, dividing by the projective weight.
    ///
    /// Points that map to infinity (zero weight) are returned unchanged.
    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        let m = &self.0;
        let px = m[0] * x + m[1] * y + m[2];
        let py = m[3] * x + m[4] * y + m[5];
        if !self.has_perspective() {
            return (px, py);
        }
        let w = m[6] * x + m[7] * y + m[8];
        if w == 0.0 {
            return (x, y);
        }
        (px / w, py / w)
    }

    /// The inverse transform, if the matrix is invertible.
    pub fn invert(&self) -> Option<Self> {
        let m = self.0.map(f64::from);
        let c00 = m[4] * m[8] - m[5] * m[7];
        let c01 = m[5] * m[6] - m[3] * m[8];
        let c02 = m[3] * m[7] - m[4] * m[6];
        let det = m[0] * c00 + m[1] * c01 + m[2] * c02;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        let out = [
            c00 * inv,
            (m[2] * m[7] - m[1] * m[8]) * inv,
            (m[1] * m[5] - m[2] * m[4]) * inv,
            c01 * inv,
            (m[0] * m[8] - m[2] * m[6]) * inv,
            (m[2] * m[3] - m[0] * m[5]) * inv,
            c02 * inv,
            (m[1] * m[6] - m[0] * m[7]) * inv,
            (m[0] * m[4] - m[1] * m[3]) * inv,
        ];
        #[allow(
            clippy::cast_possible_truncation,
            reason = "coefficients are stored as f32 at the boundary"
        )]
        let out = out.map(|v| v as f32);
        Some(Self(out))
    }

    /// The affine part as a kurbo transform, or `None` with perspective.
    pub fn to_affine(&self) -> Option<Affine> {
        if self.has_perspective() {
            return None;
        }
        let m = self.0.map(f64::from);
        Some(Affine::new([m[0], m[3], m[1], m[4], m[2], m[5]]))
    }

    /// The affine part as a kurbo transform, ignoring the perspective row.
    pub fn to_affine_lossy(&self) -> Affine {
        let m = self.0.map(f64::from);
        Affine::new([m[0], m[3], m[1], m[4], m[2], m[5]])
    }

    /// Build from a kurbo affine transform.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "coefficients are stored as f32 at the boundary"
    )]
    pub fn from_affine(affine: Affine) -> Self {
        let [a, b, c, d, e, f] = affine.as_coeffs().map(|v| v as f32);
        Self([a, c, e, b, d, f, 0.0, 0.0, 1.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_slice_is_identity() {
        assert_eq!(Matrix::from_slice(None), Some(Matrix::IDENTITY));
        assert_eq!(Matrix::from_slice(Some(&[1.0; 4])), None);
    }

    #[test]
    fn concat_applies_right_operand_first() {
        let t = Matrix::translate(10.0, 0.0);
        let s = Matrix::scale(2.0, 2.0);
        // Scale, then translate.
        assert_eq!(t.concat(&s).map_point(1.0, 1.0), (12.0, 2.0));
        // Translate, then scale.
        assert_eq!(s.concat(&t).map_point(1.0, 1.0), (22.0, 2.0));
    }

    #[test]
    fn quarter_turn_is_exact() {
        let r = Matrix::rotate_degrees(90.0);
        assert_eq!(r.map_point(1.0, 0.0), (0.0, 1.0));
    }

    #[test]
    fn invert_round_trips() {
        let m = Matrix::translate(5.0, -3.0).concat(&Matrix::scale(2.0, 4.0));
        let inv = m.invert().expect("matrix is invertible");
        let (x, y) = m.map_point(3.0, 7.0);
        let (bx, by) = inv.map_point(x, y);
        assert!((bx - 3.0).abs() < 1e-5, "x should map back, got {bx}");
        assert!((by - 7.0).abs() < 1e-5, "y should map back, got {by}");
        assert_eq!(Matrix::scale(0.0, 1.0).invert(), None);
    }

    #[test]
    fn perspective_divides_by_weight() {
        let m = Matrix([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0]);
        assert!(m.has_perspective());
        assert_eq!(m.to_affine(), None);
        assert_eq!(m.map_point(4.0, 8.0), (2.0, 4.0));
    }

    #[test]
    fn affine_conversion_preserves_layout() {
        let m = Matrix([2.0, 3.0, 5.0, 7.0, 11.0, 13.0, 0.0, 0.0, 1.0]);
        let a = m.to_affine().expect("no perspective");
        assert_eq!(a.as_coeffs(), [2.0, 7.0, 3.0, 11.0, 5.0, 13.0]);
        assert_eq!(Matrix::from_affine(a), m);
    }
}
