use super::Vec2;

/// Axis-aligned rectangle in logical pixels.
///
/// Texture paints use it as the anchor of one tile: the image is stretched
/// into the rectangle and repeated from there in both directions. A negative
/// width or height describes the same tile from the opposite corner.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { origin: Vec2::new(x, y), size: Vec2::new(w, h) }
    }

    /// `[x, y, w, h]`, the order anchors are keyed and serialized in.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.origin.x, self.origin.y, self.size.x, self.size.y]
    }

    #[inline]
    pub fn from_array([x, y, w, h]: [f32; 4]) -> Self {
        Self::new(x, y, w, h)
    }

    /// True when the tile has no area (after normalization).
    #[inline]
    pub fn is_empty(self) -> bool {
        !(self.size.x.abs() > 0.0 && self.size.y.abs() > 0.0)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Same tile with its origin moved to the top-left corner and a
    /// non-negative size.
    pub fn normalized(self) -> Self {
        let axis = |origin: f32, extent: f32| {
            if extent < 0.0 { (origin + extent, -extent) } else { (origin, extent) }
        };
        let (x, w) = axis(self.origin.x, self.size.x);
        let (y, h) = axis(self.origin.y, self.size.y);
        Self::new(x, y, w, h)
    }
}
