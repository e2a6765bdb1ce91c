use std::cmp::Ordering;

use marduk_paint::coords::Vec2;
use marduk_paint::paint::{Color, TwoPointGradient};

use crate::error::{DecodeError, KeyError};
use crate::numeric::rounded_bits;
use crate::wire::{KeyReader, KeyWriter};

use super::{KeyKind, MemoHash, bits_point, fmt_bits};

/// Flag byte of a cyclic two-point gradient.
pub const CYCLIC_FLAG: u8 = b'T';
/// Flag byte of an acyclic two-point gradient.
pub const ACYCLIC_FLAG: u8 = b'F';

/// Weights of `x1, y1, x2, y2, color1, color2` in the content hash.
const HASH_MULTIPLIERS: [i32; 6] = [31, 37, 41, 43, 47, 53];

/// Two-point gradient key.
///
/// Endpoints are stored in `(y, x)` order, so a gradient and the same
/// gradient with both ends (and their colors) swapped share one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientKey {
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
    color1: u32,
    color2: u32,
    cyclic: bool,
    hash: MemoHash,
}

impl GradientKey {
    pub fn new(gradient: &TwoPointGradient) -> Result<Self, KeyError> {
        if !gradient.is_valid() {
            return Err(KeyError::invalid(KeyKind::Gradient, "endpoints must be finite"));
        }
        let (p1, p2) = (gradient.p1, gradient.p2);
        let mut a = ([rounded_bits(p1.x as f64), rounded_bits(p1.y as f64)], gradient.color1);
        let mut b = ([rounded_bits(p2.x as f64), rounded_bits(p2.y as f64)], gradient.color2);
        if bits_point(a.0).cmp_yx(bits_point(b.0)) == Ordering::Greater {
            std::mem::swap(&mut a, &mut b);
        }
        Ok(Self {
            x1: a.0[0],
            y1: a.0[1],
            x2: b.0[0],
            y2: b.0[1],
            color1: a.1.argb(),
            color2: b.1.argb(),
            cyclic: gradient.cyclic,
            hash: MemoHash::default(),
        })
    }

    pub fn p1(&self) -> Vec2 {
        bits_point([self.x1, self.y1])
    }

    pub fn p2(&self) -> Vec2 {
        bits_point([self.x2, self.y2])
    }

    pub fn color1(&self) -> Color {
        Color::from_argb(self.color1)
    }

    pub fn color2(&self) -> Color {
        Color::from_argb(self.color2)
    }

    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    pub fn to_gradient(&self) -> TwoPointGradient {
        TwoPointGradient::new(self.p1(), self.color1(), self.p2(), self.color2())
            .cyclic(self.cyclic)
    }

    pub fn id(&self) -> String {
        format!(
            "GradientPaint/{},{}/{},{}/{:08x}/{:08x}/{}",
            fmt_bits(self.x1),
            fmt_bits(self.y1),
            fmt_bits(self.x2),
            fmt_bits(self.y2),
            self.color1,
            self.color2,
            if self.cyclic { "cyclic" } else { "acyclic" }
        )
    }

    pub fn content_hash(&self) -> i32 {
        self.hash.get_or_compute(|| {
            let fields = [self.x1, self.y1, self.x2, self.y2, self.color1, self.color2];
            let h = fields
                .iter()
                .zip(HASH_MULTIPLIERS)
                .fold(0i32, |h, (&v, m)| h.wrapping_add(m.wrapping_mul(v as i32)));
            if self.cyclic { h.wrapping_mul(2) } else { h }
        })
    }

    pub(crate) fn write_body(&self, w: &mut dyn KeyWriter) {
        for v in [self.x1, self.y1, self.x2, self.y2, self.color1, self.color2] {
            w.write_int(v as i32);
        }
        w.write_byte(if self.cyclic { CYCLIC_FLAG } else { ACYCLIC_FLAG });
    }

    pub(crate) fn read_body(r: &mut dyn KeyReader) -> Result<Self, DecodeError> {
        let mut fields = [0u32; 6];
        for slot in &mut fields {
            *slot = r.read_int()? as u32;
        }
        let cyclic = match r.read_byte()? {
            CYCLIC_FLAG => true,
            ACYCLIC_FLAG => false,
            value => return Err(DecodeError::InvalidFlag { value }),
        };
        let [x1, y1, x2, y2, color1, color2] = fields;
        Ok(Self { x1, y1, x2, y2, color1, color2, cyclic, hash: MemoHash::default() })
    }
}
