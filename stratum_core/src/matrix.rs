// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal 2D affine transform.
//!
//! This type covers the subset of 2-D affine math the scene graph needs
//! (identity, multiply, translate/scale/rotate, rect bounding boxes) and maps
//! directly onto the four linear coefficients plus translation that the
//! rendering backend consumes.

use core::ops::Mul;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Rect};

/// A 2-D affine transform.
///
/// Points map as:
///
/// ```text
/// x' = ta * x + tb * y + tx
/// y' = tc * x + td * y + ty
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    /// X scale / rotation cosine term.
    pub ta: f64,
    /// Contribution of input `y` to output `x`.
    pub tb: f64,
    /// Contribution of input `x` to output `y`.
    pub tc: f64,
    /// Y scale / rotation cosine term.
    pub td: f64,
    /// X translation.
    pub tx: f64,
    /// Y translation.
    pub ty: f64,
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        ta: 1.0,
        tb: 0.0,
        tc: 0.0,
        td: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Creates a transform from its six coefficients.
    #[inline]
    #[must_use]
    pub const fn new(ta: f64, tb: f64, tc: f64, td: f64, tx: f64, ty: f64) -> Self {
        Self {
            ta,
            tb,
            tc,
            td,
            tx,
            ty,
        }
    }

    /// Creates a pure translation.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    /// Creates a non-uniform scale.
    #[inline]
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Creates a rotation (radians, clockwise in y-down screen space).
    #[inline]
    #[must_use]
    pub fn from_rotation(radians: f64) -> Self {
        if radians == 0.0 {
            return Self::IDENTITY;
        }
        let (s, c) = (radians.sin(), radians.cos());
        Self::new(c, -s, s, c, 0.0, 0.0)
    }

    /// Returns the 2×2 linear part as `[ta, tb, tc, td]`.
    #[inline]
    #[must_use]
    pub const fn linear(&self) -> [f64; 4] {
        [self.ta, self.tb, self.tc, self.td]
    }

    /// Whether the linear part has non-zero off-diagonal terms.
    ///
    /// Rotated transforms cannot produce an axis-aligned clip rect.
    #[inline]
    #[must_use]
    pub fn is_rotated(&self) -> bool {
        self.tb != 0.0 || self.tc != 0.0
    }

    /// Maps a point through this transform.
    #[inline]
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.ta * p.x + self.tb * p.y + self.tx,
            self.tc * p.x + self.td * p.y + self.ty,
        )
    }

    /// Returns the axis-aligned bounding box of `rect` after transformation.
    #[must_use]
    pub fn transform_rect_bbox(&self, rect: Rect) -> Rect {
        let p0 = self.apply(Point::new(rect.x0, rect.y0));
        let p1 = self.apply(Point::new(rect.x1, rect.y0));
        let p2 = self.apply(Point::new(rect.x0, rect.y1));
        let p3 = self.apply(Point::new(rect.x1, rect.y1));
        Rect::new(
            p0.x.min(p1.x).min(p2.x).min(p3.x),
            p0.y.min(p1.y).min(p2.y).min(p3.y),
            p0.x.max(p1.x).max(p2.x).max(p3.x),
            p0.y.max(p1.y).max(p2.y).max(p3.y),
        )
    }

    /// Is this transform [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.ta.is_finite()
            && self.tb.is_finite()
            && self.tc.is_finite()
            && self.td.is_finite()
            && self.tx.is_finite()
            && self.ty.is_finite()
    }

    /// Is this transform [NaN]?
    ///
    /// [NaN]: f64::is_nan
    #[inline]
    #[must_use]
    pub const fn is_nan(&self) -> bool {
        self.ta.is_nan()
            || self.tb.is_nan()
            || self.tc.is_nan()
            || self.td.is_nan()
            || self.tx.is_nan()
            || self.ty.is_nan()
    }
}

impl Default for Matrix {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix {
    type Output = Self;

    /// Composes two transforms; `rhs` is applied first.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            ta: self.ta * rhs.ta + self.tb * rhs.tc,
            tb: self.ta * rhs.tb + self.tb * rhs.td,
            tc: self.tc * rhs.ta + self.td * rhs.tc,
            td: self.tc * rhs.tb + self.td * rhs.td,
            tx: self.ta * rhs.tx + self.tb * rhs.ty + self.tx,
            ty: self.tc * rhs.tx + self.td * rhs.ty + self.ty,
        }
    }
}

impl From<Matrix> for Affine {
    #[inline]
    fn from(m: Matrix) -> Self {
        Self::new([m.ta, m.tc, m.tb, m.td, m.tx, m.ty])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn default_is_identity() {
        assert_eq!(Matrix::default(), Matrix::IDENTITY);
    }

    #[test]
    fn identity_multiply() {
        let t = Matrix::from_translation(1.0, 2.0);
        assert_eq!(Matrix::IDENTITY * t, t);
        assert_eq!(t * Matrix::IDENTITY, t);
    }

    #[test]
    fn translation_composition() {
        let c = Matrix::from_translation(1.0, 0.0) * Matrix::from_translation(0.0, 2.0);
        assert_eq!((c.tx, c.ty), (1.0, 2.0));
    }

    #[test]
    fn scale_then_translate() {
        let combined = Matrix::from_translation(3.0, 4.0) * Matrix::from_scale(2.0, 2.0);
        assert_eq!(combined.linear(), [2.0, 0.0, 0.0, 2.0]);
        assert_eq!((combined.tx, combined.ty), (3.0, 4.0));
        let p = combined.apply(Point::new(1.0, 1.0));
        assert_eq!(p, Point::new(5.0, 6.0));
    }

    #[test]
    fn rotation_ninety_degrees() {
        let r = Matrix::from_rotation(core::f64::consts::FRAC_PI_2);
        assert!(r.is_rotated());
        let p = r.apply(Point::new(1.0, 0.0));
        assert!((p.x - 0.0).abs() < EPS);
        assert!((p.y - 1.0).abs() < EPS);
    }

    #[test]
    fn zero_rotation_is_not_rotated() {
        assert!(!Matrix::from_rotation(0.0).is_rotated());
        assert!(!Matrix::from_scale(-1.0, 3.0).is_rotated());
    }

    #[test]
    fn rect_bbox_of_scaled_rect() {
        let m = Matrix::from_translation(10.0, 0.0) * Matrix::from_scale(-1.0, 2.0);
        let bbox = m.transform_rect_bbox(Rect::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(bbox, Rect::new(5.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn matches_kurbo_affine() {
        let m = Matrix::from_translation(7.0, -3.0)
            * Matrix::from_rotation(0.3)
            * Matrix::from_scale(2.0, 0.5);
        let a = Affine::from(m);
        let p = Point::new(4.0, 9.0);
        let ours = m.apply(p);
        let theirs = a * p;
        assert!((ours.x - theirs.x).abs() < EPS);
        assert!((ours.y - theirs.y).abs() < EPS);
    }

    #[test]
    fn nan_detected() {
        let mut t = Matrix::IDENTITY;
        t.tc = f64::NAN;
        assert!(!t.is_finite());
        assert!(t.is_nan());
    }

    #[test]
    fn infinity_detected() {
        let mut t = Matrix::IDENTITY;
        t.tx = f64::INFINITY;
        assert!(!t.is_finite());
        assert!(!t.is_nan());
    }
}
