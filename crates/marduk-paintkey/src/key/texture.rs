use std::sync::Arc;

use marduk_paint::coords::Rect;
use marduk_paint::paint::{ManagedTexture, Pixmap, TexturePaint, TextureStore};

use crate::error::{DecodeError, KeyError};
use crate::numeric::{f32_from_bits, hash_step, rounded_bits};
use crate::wire::{KeyReader, KeyWriter};

use super::{KeyKind, MemoHash, fmt_bits, to_wire};

/// Anchor and digest, the canonical content of both texture keys.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TextureFields {
    anchor: [u32; 4],
    digest: Vec<u8>,
}

impl TextureFields {
    fn new(kind: KeyKind, anchor: Rect, digest: &[u8]) -> Result<Self, KeyError> {
        if !anchor.is_finite() {
            return Err(KeyError::invalid(kind, "anchor rectangle must be finite"));
        }
        let anchor = anchor.normalized();
        if anchor.is_empty() {
            return Err(KeyError::invalid(kind, "anchor rectangle is empty"));
        }
        Ok(Self {
            anchor: anchor.to_array().map(|v| rounded_bits(v as f64)),
            digest: digest.to_vec(),
        })
    }

    fn anchor(&self) -> Rect {
        Rect::from_array(self.anchor.map(f32_from_bits))
    }

    fn image(&self, textures: &dyn TextureStore) -> Result<Arc<Pixmap>, KeyError> {
        textures
            .texture(&self.digest)
            .ok_or_else(|| KeyError::MissingTexture { digest: hex::encode(&self.digest) })
    }

    fn hash(&self, seed: i32) -> i32 {
        let h = self.anchor.iter().fold(seed, |h, &v| hash_step(h, v as i32));
        self.digest.iter().fold(h, |h, &b| hash_step(h, b as i8 as i32))
    }

    fn id(&self, kind: KeyKind) -> String {
        let [x, y, w, h] = self.anchor.map(fmt_bits);
        format!("{kind}/{x},{y},{w},{h}/{}", hex::encode(&self.digest))
    }

    fn write_body(&self, w: &mut dyn KeyWriter) {
        for v in to_wire(&self.anchor) {
            w.write_int(v);
        }
        w.write_byte_array(&self.digest);
    }

    fn read_body(r: &mut dyn KeyReader) -> Result<Self, DecodeError> {
        let mut anchor = [0u32; 4];
        for slot in &mut anchor {
            *slot = r.read_int()? as u32;
        }
        Ok(Self { anchor, digest: r.read_byte_array()? })
    }
}

/// Key of a raw texture paint.
///
/// The digest covers the pixel bytes only; the pixels themselves stay with
/// the [`TextureStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureKey {
    fields: TextureFields,
    hash: MemoHash,
}

impl TextureKey {
    const HASH_SEED: i32 = 0x54;

    pub fn new(paint: &TexturePaint) -> Result<Self, KeyError> {
        let fields = TextureFields::new(KeyKind::Texture, paint.anchor, &paint.image.digest())?;
        Ok(Self { fields, hash: MemoHash::default() })
    }

    pub fn anchor(&self) -> Rect {
        self.fields.anchor()
    }

    pub fn digest(&self) -> &[u8] {
        &self.fields.digest
    }

    pub fn to_texture(&self, textures: &dyn TextureStore) -> Result<TexturePaint, KeyError> {
        Ok(TexturePaint::new(self.fields.image(textures)?, self.anchor()))
    }

    pub fn id(&self) -> String {
        self.fields.id(KeyKind::Texture)
    }

    pub fn content_hash(&self) -> i32 {
        self.hash.get_or_compute(|| self.fields.hash(Self::HASH_SEED))
    }

    pub(crate) fn write_body(&self, w: &mut dyn KeyWriter) {
        self.fields.write_body(w);
    }

    pub(crate) fn read_body(r: &mut dyn KeyReader) -> Result<Self, DecodeError> {
        Ok(Self { fields: TextureFields::read_body(r)?, hash: MemoHash::default() })
    }
}

/// Key of a managed texture, addressed by a digest over dimensions and pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedTextureKey {
    fields: TextureFields,
    hash: MemoHash,
}

impl ManagedTextureKey {
    const HASH_SEED: i32 = 0x4D;

    pub fn new(paint: &ManagedTexture) -> Result<Self, KeyError> {
        let fields = TextureFields::new(
            KeyKind::ManagedTexture,
            paint.anchor,
            &paint.image.managed_digest(),
        )?;
        Ok(Self { fields, hash: MemoHash::default() })
    }

    pub fn anchor(&self) -> Rect {
        self.fields.anchor()
    }

    pub fn digest(&self) -> &[u8] {
        &self.fields.digest
    }

    pub fn to_texture(&self, textures: &dyn TextureStore) -> Result<ManagedTexture, KeyError> {
        Ok(ManagedTexture::new(self.fields.image(textures)?, self.anchor()))
    }

    pub fn id(&self) -> String {
        self.fields.id(KeyKind::ManagedTexture)
    }

    pub fn content_hash(&self) -> i32 {
        self.hash.get_or_compute(|| self.fields.hash(Self::HASH_SEED))
    }

    pub(crate) fn write_body(&self, w: &mut dyn KeyWriter) {
        self.fields.write_body(w);
    }

    pub(crate) fn read_body(r: &mut dyn KeyReader) -> Result<Self, DecodeError> {
        Ok(Self { fields: TextureFields::read_body(r)?, hash: MemoHash::default() })
    }
}
