//! Coordinate and geometry types shared by paints and paint keys.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Points and rectangles are `f32`; affine transforms are `f64` so that
//! folding a transform into points does not lose precision before rounding.

mod rect;
mod transform;
mod vec2;

pub use rect::Rect;
pub use transform::Transform;
pub use vec2::Vec2;
