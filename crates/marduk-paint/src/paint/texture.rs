use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest as _, Sha256};

use crate::coords::Rect;

use super::Color;

/// SHA-256 digest of texture content.
pub type Digest = [u8; 32];

/// Owned RGBA pixel buffer.
///
/// Invariant: `pixels.len() == width * height` (row-major, top row first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Pixmap {
    /// Returns `None` when `pixels` does not hold exactly `width * height` entries.
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Option<Self> {
        let expected = (width as usize).checked_mul(height as usize)?;
        (pixels.len() == expected).then_some(Self { width, height, pixels })
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let len = width as usize * height as usize;
        Self { width, height, pixels: vec![color; len] }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Pixel data as RGBA bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Digest of the pixel bytes alone. Dimensions are not part of it.
    pub fn digest(&self) -> Digest {
        Sha256::digest(self.as_bytes()).into()
    }

    /// Digest of `width_be32 || height_be32 || pixel bytes`.
    ///
    /// Identifies content and dimensions together; managed textures are
    /// addressed by this value alone.
    pub fn managed_digest(&self) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_be_bytes());
        hasher.update(self.height.to_be_bytes());
        hasher.update(self.as_bytes());
        hasher.finalize().into()
    }
}

/// Pixel-tiled paint: `image` is stretched into `anchor` and repeated.
#[derive(Debug, Clone, PartialEq)]
pub struct TexturePaint {
    pub image: Arc<Pixmap>,
    pub anchor: Rect,
}

impl TexturePaint {
    pub fn new(image: Arc<Pixmap>, anchor: Rect) -> Self {
        Self { image, anchor }
    }
}

/// Texture paint whose pixels live in a [`TextureStore`] and are addressed by
/// [`Pixmap::managed_digest`].
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedTexture {
    pub image: Arc<Pixmap>,
    pub anchor: Rect,
}

impl ManagedTexture {
    pub fn new(image: Arc<Pixmap>, anchor: Rect) -> Self {
        Self { image, anchor }
    }
}

/// Lookup of pixel content by digest.
///
/// Implemented by whatever owns texture storage (GPU cache, asset database);
/// paint keys only hold digests.
pub trait TextureStore {
    fn texture(&self, digest: &[u8]) -> Option<Arc<Pixmap>>;
}

/// In-memory [`TextureStore`].
///
/// Every inserted pixmap is reachable under both its raw and its managed digest.
#[derive(Debug, Default, Clone)]
pub struct MemoryTextureStore {
    by_digest: HashMap<Digest, Arc<Pixmap>>,
}

impl MemoryTextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `image` and returns its managed digest.
    pub fn insert(&mut self, image: Arc<Pixmap>) -> Digest {
        let raw = image.digest();
        let managed = image.managed_digest();
        log::trace!("texture store: {}x{} pixmap inserted", image.width(), image.height());
        self.by_digest.insert(raw, Arc::clone(&image));
        self.by_digest.insert(managed, image);
        managed
    }

    /// Number of distinct digests held (two per inserted pixmap).
    pub fn len(&self) -> usize {
        self.by_digest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_digest.is_empty()
    }
}

impl TextureStore for MemoryTextureStore {
    fn texture(&self, digest: &[u8]) -> Option<Arc<Pixmap>> {
        let digest = Digest::try_from(digest).ok()?;
        self.by_digest.get(&digest).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Pixmap {
        let a = Color::black();
        let b = Color::white();
        Pixmap::new(2, 2, vec![a, b, b, a]).unwrap()
    }

    #[test]
    fn new_checks_pixel_count() {
        assert!(Pixmap::new(2, 2, vec![Color::black(); 3]).is_none());
        assert!(Pixmap::new(0, 5, Vec::new()).is_some());
    }

    #[test]
    fn raw_digest_ignores_dimensions() {
        let wide = Pixmap::filled(4, 1, Color::white());
        let tall = Pixmap::filled(1, 4, Color::white());
        assert_eq!(wide.digest(), tall.digest());
        assert_ne!(wide.managed_digest(), tall.managed_digest());
    }

    #[test]
    fn store_finds_both_digests() {
        let image = Arc::new(checker());
        let mut store = MemoryTextureStore::new();
        let managed = store.insert(Arc::clone(&image));

        assert_eq!(managed, image.managed_digest());
        assert_eq!(store.len(), 2);
        assert_eq!(store.texture(&managed).as_deref(), Some(&*image));
        assert_eq!(store.texture(&image.digest()).as_deref(), Some(&*image));
    }

    #[test]
    fn store_rejects_malformed_digest() {
        let mut store = MemoryTextureStore::new();
        store.insert(Arc::new(checker()));
        assert!(store.texture(&[0u8; 7]).is_none());
    }
}
