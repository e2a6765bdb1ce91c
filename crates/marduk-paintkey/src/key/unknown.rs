use std::sync::Arc;

use marduk_paint::paint::CustomPaint;

use crate::error::{BoxError, DecodeError, EncodeError};
use crate::wire::{KeyReader, KeyWriter};

/// Application adapter that turns custom paints into opaque byte blobs and
/// back.
///
/// Records of [`UnknownKey`]s can only be written and read when the codec
/// has one installed.
pub trait OpaquePaintCodec {
    fn to_blob(&self, paint: &dyn CustomPaint) -> Result<Vec<u8>, BoxError>;

    fn from_blob(&self, blob: &[u8]) -> Result<Arc<dyn CustomPaint>, BoxError>;
}

/// Fallback key wrapping a paint the key set does not model.
///
/// Equality and hashing are delegated to the wrapped [`CustomPaint`]. The id
/// carries only the paint hash, so two unequal custom paints with the same
/// hash share an id.
#[derive(Debug, Clone)]
pub struct UnknownKey {
    paint: Arc<dyn CustomPaint>,
}

impl UnknownKey {
    pub fn new(paint: Arc<dyn CustomPaint>) -> Self {
        Self { paint }
    }

    pub fn paint(&self) -> &Arc<dyn CustomPaint> {
        &self.paint
    }

    pub fn id(&self) -> String {
        format!("UnknownPaint/{:08x}", self.paint.paint_hash() as u32)
    }

    #[inline]
    pub fn content_hash(&self) -> i32 {
        self.paint.paint_hash()
    }

    pub(crate) fn write_body(
        &self,
        w: &mut dyn KeyWriter,
        opaque: Option<&dyn OpaquePaintCodec>,
    ) -> Result<(), EncodeError> {
        let codec = opaque.ok_or(EncodeError::MissingOpaqueCodec)?;
        let blob = codec
            .to_blob(self.paint.as_ref())
            .map_err(|e| EncodeError::Opaque(e.to_string()))?;
        w.write_byte_array(&blob);
        Ok(())
    }

    pub(crate) fn read_body(
        r: &mut dyn KeyReader,
        opaque: Option<&dyn OpaquePaintCodec>,
    ) -> Result<Self, DecodeError> {
        let blob = r.read_byte_array()?;
        let codec = opaque.ok_or(DecodeError::MissingOpaqueCodec)?;
        let paint = codec
            .from_blob(&blob)
            .map_err(|e| DecodeError::Opaque(e.to_string()))?;
        Ok(Self { paint })
    }
}

impl PartialEq for UnknownKey {
    fn eq(&self, other: &Self) -> bool {
        self.paint.paint_eq(other.paint.as_ref())
    }
}

impl Eq for UnknownKey {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::any::Any;

    /// Custom paint used across the crate's tests.
    #[derive(Debug, PartialEq)]
    pub(crate) struct Stripes {
        pub(crate) width: u32,
    }

    impl CustomPaint for Stripes {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn paint_eq(&self, other: &dyn CustomPaint) -> bool {
            other.as_any().downcast_ref::<Stripes>() == Some(self)
        }

        fn paint_hash(&self) -> i32 {
            0x5757_0000 | self.width as i32
        }
    }

    pub(crate) struct StripesCodec;

    impl OpaquePaintCodec for StripesCodec {
        fn to_blob(&self, paint: &dyn CustomPaint) -> Result<Vec<u8>, BoxError> {
            let stripes = paint
                .as_any()
                .downcast_ref::<Stripes>()
                .ok_or("not a stripes paint")?;
            Ok(stripes.width.to_be_bytes().to_vec())
        }

        fn from_blob(&self, blob: &[u8]) -> Result<Arc<dyn CustomPaint>, BoxError> {
            let bytes: [u8; 4] = blob.try_into()?;
            Ok(Arc::new(Stripes { width: u32::from_be_bytes(bytes) }))
        }
    }

    fn key(width: u32) -> UnknownKey {
        UnknownKey::new(Arc::new(Stripes { width }))
    }

    #[test]
    fn equality_delegates_to_paint() {
        assert_eq!(key(3), key(3));
        assert_ne!(key(3), key(4));
    }

    #[test]
    fn hash_and_id_come_from_paint_hash() {
        assert_eq!(key(3).content_hash(), 0x5757_0003);
        assert_eq!(key(3).id(), "UnknownPaint/57570003");
    }
}
