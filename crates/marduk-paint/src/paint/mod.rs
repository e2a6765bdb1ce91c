//! Paint model shared between UI, renderers and paint keys.
//!
//! Scope:
//! - color representation (straight-alpha sRGB bytes)
//! - paint sources (solid, gradients, textures, application paints)
//! - texture storage collaborators
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod custom;
pub mod gradient;
pub mod texture;

use std::sync::Arc;

pub use color::Color;
pub use custom::CustomPaint;
pub use gradient::{
    ColorSpace, ColorStop, LinearGradient, RadialGradient, SpreadMode, TwoPointGradient,
};
pub use texture::{
    Digest, ManagedTexture, MemoryTextureStore, Pixmap, TexturePaint, TextureStore,
};

/// Paint source for filling geometry.
///
/// The enum is kept stable for renderer dispatch; paints it does not model
/// travel as `Custom`.
#[derive(Debug, Clone)]
pub enum Paint {
    Solid(Color),
    Gradient(TwoPointGradient),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
    Texture(TexturePaint),
    ManagedTexture(ManagedTexture),
    Custom(Arc<dyn CustomPaint>),
}

impl Paint {
    #[inline]
    pub fn solid(color: Color) -> Self {
        Paint::Solid(color)
    }

    pub fn custom(paint: impl CustomPaint) -> Self {
        Paint::Custom(Arc::new(paint))
    }

    pub fn is_opaque(&self) -> bool {
        match self {
            Paint::Solid(c) => c.is_opaque(),
            Paint::Gradient(g) => g.color1.is_opaque() && g.color2.is_opaque(),
            Paint::LinearGradient(g) => g.stops.iter().all(|s| s.color.is_opaque()),
            Paint::RadialGradient(g) => g.stops.iter().all(|s| s.color.is_opaque()),
            Paint::Texture(t) => t.image.pixels().iter().all(|c| c.is_opaque()),
            Paint::ManagedTexture(t) => t.image.pixels().iter().all(|c| c.is_opaque()),
            // Conservative: application paints may be translucent.
            Paint::Custom(_) => false,
        }
    }
}

impl PartialEq for Paint {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Paint::Solid(a), Paint::Solid(b)) => a == b,
            (Paint::Gradient(a), Paint::Gradient(b)) => a == b,
            (Paint::LinearGradient(a), Paint::LinearGradient(b)) => a == b,
            (Paint::RadialGradient(a), Paint::RadialGradient(b)) => a == b,
            (Paint::Texture(a), Paint::Texture(b)) => a == b,
            (Paint::ManagedTexture(a), Paint::ManagedTexture(b)) => a == b,
            (Paint::Custom(a), Paint::Custom(b)) => a.paint_eq(b.as_ref()),
            _ => false,
        }
    }
}
