use core::cmp::Ordering;

/// 2D point in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Lexicographic order: `y` first, then `x`.
    ///
    /// Unordered components (NaN) compare as equal, so callers sorting with
    /// this keep their input order for such points.
    #[inline]
    pub fn cmp_yx(self, other: Vec2) -> Ordering {
        match self.y.partial_cmp(&other.y) {
            Some(Ordering::Equal) | None => {
                self.x.partial_cmp(&other.x).unwrap_or(Ordering::Equal)
            }
            Some(o) => o,
        }
    }

    #[inline]
    pub fn to_f64(self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }
}
