use bytemuck::{Pod, Zeroable};

/// Straight-alpha sRGB color with 8-bit channels.
///
/// Invariant:
/// - field order is `r, g, b, a` and the struct is `repr(C)`, so a `&[Color]`
///   pixel buffer can be viewed as RGBA bytes (see `Pixmap::as_bytes`).
///
/// Keys and records carry colors in the packed `0xAARRGGBB` form returned by
/// [`argb`](Self::argb).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    #[inline]
    pub const fn black() -> Self {
        Self { r: 0, g: 0, b: 0, a: 255 }
    }

    #[inline]
    pub const fn white() -> Self {
        Self { r: 255, g: 255, b: 255, a: 255 }
    }

    /// Creates a color from straight sRGB bytes (`0`–`255`).
    ///
    /// This is the preferred constructor for colors coming from hex literals,
    /// which produce `[u8; 4]` straight-alpha RGBA.
    #[inline]
    pub const fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from straight sRGB `f32` components in `[0, 1]`.
    ///
    /// Components are clamped, then rounded to the nearest byte.
    #[inline]
    pub fn from_srgb(r: f32, g: f32, b: f32, a: f32) -> Self {
        fn byte(v: f32) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self { r: byte(r), g: byte(g), b: byte(b), a: byte(a) }
    }

    /// Unpacks `0xAARRGGBB`.
    #[inline]
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Packs into `0xAARRGGBB`.
    #[inline]
    pub const fn argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }
}
