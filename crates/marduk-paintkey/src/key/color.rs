use marduk_paint::paint::Color;

use crate::error::DecodeError;
use crate::wire::{KeyReader, KeyWriter};

/// Solid color key: the packed `0xAARRGGBB` value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ColorKey {
    argb: u32,
}

impl ColorKey {
    pub fn new(color: Color) -> Self {
        Self { argb: color.argb() }
    }

    #[inline]
    pub fn argb(&self) -> u32 {
        self.argb
    }

    pub fn color(&self) -> Color {
        Color::from_argb(self.argb)
    }

    pub fn id(&self) -> String {
        format!("ColorPaint/{:08x}", self.argb)
    }

    #[inline]
    pub fn content_hash(&self) -> i32 {
        self.argb as i32
    }

    pub(crate) fn write_body(&self, w: &mut dyn KeyWriter) {
        w.write_int(self.argb as i32);
    }

    pub(crate) fn read_body(r: &mut dyn KeyReader) -> Result<Self, DecodeError> {
        Ok(Self { argb: r.read_int()? as u32 })
    }
}
