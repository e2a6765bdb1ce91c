//! Paint keys.
//!
//! A [`PaintKey`] is the canonical, immutable description of one paint. Keys
//! built from paints that render identically (within the rounding tolerance
//! of [`crate::numeric`]) compare equal, hash equal and produce the same
//! [`id`](PaintKey::id).
//!
//! Each variant module owns three things for its paint family:
//! canonicalization (construction from a native paint), the content hash,
//! and the record body layout.

mod color;
mod gradient;
mod linear;
mod multi_stop;
mod radial;
mod texture;
mod unknown;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use marduk_paint::coords::Vec2;
use marduk_paint::paint::{Paint, TextureStore};

pub use color::ColorKey;
pub use gradient::{ACYCLIC_FLAG, CYCLIC_FLAG, GradientKey};
pub use linear::LinearGradientKey;
pub use multi_stop::{CycleMethod, MultiStop};
pub use radial::RadialGradientKey;
pub use texture::{ManagedTextureKey, TextureKey};
pub use unknown::{OpaquePaintCodec, UnknownKey};

#[cfg(test)]
pub(crate) use unknown::tests::{Stripes, StripesCodec};

use crate::error::{DecodeError, EncodeError, KeyError};
use crate::numeric::{self, f32_from_bits, rounded_bits};
use crate::wire::{KeyReader, KeyWriter};

/// Variant tag of a [`PaintKey`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum KeyKind {
    Color,
    Gradient,
    LinearGradient,
    RadialGradient,
    Texture,
    ManagedTexture,
    Unknown,
}

impl KeyKind {
    pub const ALL: [KeyKind; 7] = [
        KeyKind::Color,
        KeyKind::Gradient,
        KeyKind::LinearGradient,
        KeyKind::RadialGradient,
        KeyKind::Texture,
        KeyKind::ManagedTexture,
        KeyKind::Unknown,
    ];

    /// Stable tag used as the first segment of `id()` and, hashed, as the
    /// record type tag.
    pub const fn id_base(self) -> &'static str {
        match self {
            KeyKind::Color => "ColorPaint",
            KeyKind::Gradient => "GradientPaint",
            KeyKind::LinearGradient => "LinearGradientPaint",
            KeyKind::RadialGradient => "RadialGradientPaint",
            KeyKind::Texture => "TexturePaint",
            KeyKind::ManagedTexture => "ManagedTexturePaint",
            KeyKind::Unknown => "UnknownPaint",
        }
    }

    pub fn tag_hash(self) -> i32 {
        numeric::tag_hash(self.id_base())
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id_base())
    }
}

/// Canonical key for one paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintKey {
    Color(ColorKey),
    Gradient(GradientKey),
    LinearGradient(LinearGradientKey),
    RadialGradient(RadialGradientKey),
    Texture(TextureKey),
    ManagedTexture(ManagedTextureKey),
    Unknown(UnknownKey),
}

impl PaintKey {
    /// Builds the key for `paint`, canonicalizing it.
    ///
    /// `Paint::Custom` always yields an [`UnknownKey`].
    pub fn from_paint(paint: &Paint) -> Result<PaintKey, KeyError> {
        Ok(match paint {
            Paint::Solid(color) => ColorKey::new(*color).into(),
            Paint::Gradient(g) => GradientKey::new(g)?.into(),
            Paint::LinearGradient(g) => LinearGradientKey::new(g)?.into(),
            Paint::RadialGradient(g) => RadialGradientKey::new(g)?.into(),
            Paint::Texture(t) => TextureKey::new(t)?.into(),
            Paint::ManagedTexture(t) => ManagedTextureKey::new(t)?.into(),
            Paint::Custom(p) => UnknownKey::new(p.clone()).into(),
        })
    }

    /// Rebuilds a native paint from the canonical fields.
    ///
    /// Texture variants fetch their pixels from `textures`.
    pub fn to_paint(&self, textures: &dyn TextureStore) -> Result<Paint, KeyError> {
        Ok(match self {
            PaintKey::Color(k) => Paint::Solid(k.color()),
            PaintKey::Gradient(k) => Paint::Gradient(k.to_gradient()),
            PaintKey::LinearGradient(k) => Paint::LinearGradient(k.to_gradient()),
            PaintKey::RadialGradient(k) => Paint::RadialGradient(k.to_gradient()),
            PaintKey::Texture(k) => Paint::Texture(k.to_texture(textures)?),
            PaintKey::ManagedTexture(k) => Paint::ManagedTexture(k.to_texture(textures)?),
            PaintKey::Unknown(k) => Paint::Custom(k.paint().clone()),
        })
    }

    pub fn kind(&self) -> KeyKind {
        match self {
            PaintKey::Color(_) => KeyKind::Color,
            PaintKey::Gradient(_) => KeyKind::Gradient,
            PaintKey::LinearGradient(_) => KeyKind::LinearGradient,
            PaintKey::RadialGradient(_) => KeyKind::RadialGradient,
            PaintKey::Texture(_) => KeyKind::Texture,
            PaintKey::ManagedTexture(_) => KeyKind::ManagedTexture,
            PaintKey::Unknown(_) => KeyKind::Unknown,
        }
    }

    /// Human-readable path `"<idBase>/<fields>"`, usable as an external cache key.
    pub fn id(&self) -> String {
        match self {
            PaintKey::Color(k) => k.id(),
            PaintKey::Gradient(k) => k.id(),
            PaintKey::LinearGradient(k) => k.id(),
            PaintKey::RadialGradient(k) => k.id(),
            PaintKey::Texture(k) => k.id(),
            PaintKey::ManagedTexture(k) => k.id(),
            PaintKey::Unknown(k) => k.id(),
        }
    }

    /// Content hash recorded in, and verified against, every record.
    pub fn content_hash(&self) -> i32 {
        match self {
            PaintKey::Color(k) => k.content_hash(),
            PaintKey::Gradient(k) => k.content_hash(),
            PaintKey::LinearGradient(k) => k.content_hash(),
            PaintKey::RadialGradient(k) => k.content_hash(),
            PaintKey::Texture(k) => k.content_hash(),
            PaintKey::ManagedTexture(k) => k.content_hash(),
            PaintKey::Unknown(k) => k.content_hash(),
        }
    }

    pub(crate) fn write_body(
        &self,
        w: &mut dyn KeyWriter,
        opaque: Option<&dyn OpaquePaintCodec>,
    ) -> Result<(), EncodeError> {
        match self {
            PaintKey::Color(k) => k.write_body(w),
            PaintKey::Gradient(k) => k.write_body(w),
            PaintKey::LinearGradient(k) => k.write_body(w),
            PaintKey::RadialGradient(k) => k.write_body(w),
            PaintKey::Texture(k) => k.write_body(w),
            PaintKey::ManagedTexture(k) => k.write_body(w),
            PaintKey::Unknown(k) => return k.write_body(w, opaque),
        }
        Ok(())
    }

    pub(crate) fn read_body(
        kind: KeyKind,
        r: &mut dyn KeyReader,
        opaque: Option<&dyn OpaquePaintCodec>,
    ) -> Result<PaintKey, DecodeError> {
        Ok(match kind {
            KeyKind::Color => ColorKey::read_body(r)?.into(),
            KeyKind::Gradient => GradientKey::read_body(r)?.into(),
            KeyKind::LinearGradient => LinearGradientKey::read_body(r)?.into(),
            KeyKind::RadialGradient => RadialGradientKey::read_body(r)?.into(),
            KeyKind::Texture => TextureKey::read_body(r)?.into(),
            KeyKind::ManagedTexture => ManagedTextureKey::read_body(r)?.into(),
            KeyKind::Unknown => UnknownKey::read_body(r, opaque)?.into(),
        })
    }
}

impl Hash for PaintKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        state.write_i32(self.content_hash());
    }
}

impl fmt::Display for PaintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for PaintKey {
                fn from(key: $ty) -> Self {
                    PaintKey::$variant(key)
                }
            }
        )*
    };
}

impl_from_variant!(
    Color(ColorKey),
    Gradient(GradientKey),
    LinearGradient(LinearGradientKey),
    RadialGradient(RadialGradientKey),
    Texture(TextureKey),
    ManagedTexture(ManagedTextureKey),
    Unknown(UnknownKey),
);

/// Lazily computed content hash.
///
/// Always equal to any other `MemoHash`, so variants can derive `PartialEq`
/// over their canonical fields with this cell alongside.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoHash(OnceLock<i32>);

impl MemoHash {
    #[inline]
    pub(crate) fn get_or_compute(&self, compute: impl FnOnce() -> i32) -> i32 {
        *self.0.get_or_init(compute)
    }
}

impl PartialEq for MemoHash {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl Eq for MemoHash {}

/// Rounded bit patterns of a point.
#[inline]
pub(crate) fn point_bits(x: f64, y: f64) -> [u32; 2] {
    [rounded_bits(x), rounded_bits(y)]
}

#[inline]
pub(crate) fn bits_point([x, y]: [u32; 2]) -> Vec2 {
    Vec2::new(f32_from_bits(x), f32_from_bits(y))
}

/// Formats a bit-pattern coordinate for `id()` strings.
#[inline]
pub(crate) fn fmt_bits(bits: u32) -> String {
    f32_from_bits(bits).to_string()
}

/// Bit patterns travel as signed ints on the wire.
#[inline]
pub(crate) fn to_wire(values: &[u32]) -> Vec<i32> {
    values.iter().map(|&v| v as i32).collect()
}

#[inline]
pub(crate) fn from_wire(values: &[i32]) -> Vec<u32> {
    values.iter().map(|&v| v as u32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use marduk_paint::paint::Color;
    use std::collections::HashSet;

    #[test]
    fn tag_hashes_are_distinct() {
        let hashes: HashSet<i32> = KeyKind::ALL.iter().map(|k| k.tag_hash()).collect();
        assert_eq!(hashes.len(), KeyKind::ALL.len());
    }

    #[test]
    fn memo_hash_is_computed_once() {
        let memo = MemoHash::default();
        assert_eq!(memo.get_or_compute(|| 5), 5);
        assert_eq!(memo.get_or_compute(|| 6), 5);
    }

    #[test]
    fn memo_hash_does_not_affect_equality() {
        let a = ColorKey::new(Color::white());
        let b = ColorKey::new(Color::white());
        a.content_hash();
        assert_eq!(a, b);
    }

    #[test]
    fn paint_keys_work_in_hash_sets() {
        let mut set = HashSet::new();
        set.insert(PaintKey::from(ColorKey::new(Color::black())));
        set.insert(PaintKey::from(ColorKey::new(Color::black())));
        set.insert(PaintKey::from(ColorKey::new(Color::white())));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_is_id() {
        let key = PaintKey::from(ColorKey::new(Color::from_argb(0x80ff0000)));
        assert_eq!(key.to_string(), key.id());
        assert_eq!(key.kind().to_string(), "ColorPaint");
    }
}
