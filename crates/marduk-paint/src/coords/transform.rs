/// 2D affine transform.
///
/// Maps `(x, y)` to `(m00·x + m01·y + m02, m10·x + m11·y + m12)`.
///
/// Coefficients are `f64`: gradient geometry is folded through the transform
/// before being rounded for keys, and `f32` would add error at that step.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m11: f64,
    pub m02: f64,
    pub m12: f64,
}

/// Tolerance used when classifying the linear part.
const CLASSIFY_EPSILON: f64 = 1e-12;

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Self { m00: 1.0, m10: 0.0, m01: 0.0, m11: 1.0, m02: 0.0, m12: 0.0 }
    }

    #[inline]
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self { m00: 1.0, m10: 0.0, m01: 0.0, m11: 1.0, m02: tx, m12: ty }
    }

    #[inline]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self { m00: sx, m10: 0.0, m01: 0.0, m11: sy, m02: 0.0, m12: 0.0 }
    }

    /// Counter-clockwise rotation by `theta` radians (clockwise on screen, +Y down).
    pub fn rotation(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self { m00: cos, m10: sin, m01: -sin, m11: cos, m02: 0.0, m12: 0.0 }
    }

    /// Builds a transform from `[m00, m10, m01, m11, m02, m12]`.
    #[inline]
    pub const fn from_matrix([m00, m10, m01, m11, m02, m12]: [f64; 6]) -> Self {
        Self { m00, m10, m01, m11, m02, m12 }
    }

    /// Returns `[m00, m10, m01, m11, m02, m12]`.
    #[inline]
    pub const fn matrix(&self) -> [f64; 6] {
        [self.m00, self.m10, self.m01, self.m11, self.m02, self.m12]
    }

    /// Returns the transform that applies `self` first, then `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            m00: next.m00 * self.m00 + next.m01 * self.m10,
            m10: next.m10 * self.m00 + next.m11 * self.m10,
            m01: next.m00 * self.m01 + next.m01 * self.m11,
            m11: next.m10 * self.m01 + next.m11 * self.m11,
            m02: next.m00 * self.m02 + next.m01 * self.m12 + next.m02,
            m12: next.m10 * self.m02 + next.m11 * self.m12 + next.m12,
        }
    }

    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.m00 * x + self.m01 * y + self.m02,
            self.m10 * x + self.m11 * y + self.m12,
        )
    }

    /// Applies the linear part only (no translation).
    #[inline]
    pub fn apply_vector(&self, x: f64, y: f64) -> (f64, f64) {
        (self.m00 * x + self.m01 * y, self.m10 * x + self.m11 * y)
    }

    /// The linear part with the translation dropped.
    #[inline]
    pub fn linear(&self) -> Transform {
        Transform { m02: 0.0, m12: 0.0, ..*self }
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.m00 * self.m11 - self.m01 * self.m10
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// True when the linear part is exactly the identity.
    #[inline]
    pub fn is_translation(&self) -> bool {
        self.m00 == 1.0 && self.m10 == 0.0 && self.m01 == 0.0 && self.m11 == 1.0
    }

    /// True when the linear part is a uniform scale combined with a rotation
    /// and optionally a reflection, i.e. circles map to circles.
    pub fn is_similarity(&self) -> bool {
        let det = self.determinant();
        if !det.is_finite() || det.abs() <= CLASSIFY_EPSILON {
            return false;
        }
        let tol = CLASSIFY_EPSILON * det.abs().sqrt().max(1.0);
        let rotation = (self.m00 - self.m11).abs() <= tol && (self.m01 + self.m10).abs() <= tol;
        let reflection = (self.m00 + self.m11).abs() <= tol && (self.m01 - self.m10).abs() <= tol;
        rotation || reflection
    }

    /// Inverse transform, or `None` when the linear part is singular.
    pub fn inverse(&self) -> Option<Transform> {
        let det = self.determinant();
        if !det.is_finite() || det == 0.0 {
            return None;
        }
        let m00 = self.m11 / det;
        let m01 = -self.m01 / det;
        let m10 = -self.m10 / det;
        let m11 = self.m00 / det;
        Some(Transform {
            m00,
            m10,
            m01,
            m11,
            m02: -(m00 * self.m02 + m01 * self.m12),
            m12: -(m10 * self.m02 + m11 * self.m12),
        })
    }

    pub fn is_finite(&self) -> bool {
        self.matrix().iter().all(|v| v.is_finite())
    }
}
