use marduk_paint::coords::{Transform, Vec2};
use marduk_paint::paint::RadialGradient;

use crate::error::{DecodeError, KeyError};
use crate::numeric::{f32_from_bits, hash_step, rounded_bits};
use crate::wire::{KeyReader, KeyWriter};

use super::{KeyKind, MemoHash, MultiStop, bits_point, fmt_bits, point_bits};

const HASH_SEED: i32 = 0x52;

/// Multi-stop radial gradient key.
///
/// Similarity transforms fold completely (circles stay circles). Any other
/// invertible transform contributes only its translation; the linear part is
/// kept as the residual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadialGradientKey {
    center: [u32; 2],
    focus: [u32; 2],
    radius: u32,
    base: MultiStop,
    hash: MemoHash,
}

type Point = (f64, f64);

struct Folded {
    center: Point,
    focus: Point,
    radius: f64,
    residual: Transform,
}

fn fold_radial(center: Point, focus: Point, radius: f64, m: &Transform) -> Folded {
    if m.is_similarity() {
        return Folded {
            center: m.apply(center.0, center.1),
            focus: m.apply(focus.0, focus.1),
            radius: radius * m.determinant().abs().sqrt(),
            residual: Transform::identity(),
        };
    }
    let linear = m.linear();
    let Some(inv) = linear.inverse() else {
        return Folded { center, focus, radius, residual: *m };
    };
    // M·p = L·(p + L⁻¹·t)
    let (ux, uy) = inv.apply_vector(m.m02, m.m12);
    Folded {
        center: (center.0 + ux, center.1 + uy),
        focus: (focus.0 + ux, focus.1 + uy),
        radius,
        residual: linear,
    }
}

impl RadialGradientKey {
    pub fn new(gradient: &RadialGradient) -> Result<Self, KeyError> {
        let kind = KeyKind::RadialGradient;
        if !gradient.center.is_finite() || !gradient.focus.is_finite() {
            return Err(KeyError::invalid(kind, "center and focus must be finite"));
        }
        if !(gradient.radius.is_finite() && gradient.radius > 0.0) {
            return Err(KeyError::invalid(
                kind,
                format!("radius must be positive, got {}", gradient.radius),
            ));
        }
        if !gradient.transform.is_finite() {
            return Err(KeyError::invalid(kind, "transform must be finite"));
        }

        let folded = fold_radial(
            gradient.center.to_f64(),
            gradient.focus.to_f64(),
            gradient.radius as f64,
            &gradient.transform,
        );
        let base = MultiStop::new(
            kind,
            &gradient.stops,
            gradient.spread,
            gradient.color_space,
            &folded.residual,
        )?;
        let radius = rounded_bits(folded.radius);
        let rounded = f32_from_bits(radius);
        if !(rounded.is_finite() && rounded > 0.0) {
            return Err(KeyError::invalid(
                kind,
                format!("radius must be positive, got {rounded} after rounding"),
            ));
        }
        Ok(Self {
            center: point_bits(folded.center.0, folded.center.1),
            focus: point_bits(folded.focus.0, folded.focus.1),
            radius,
            base,
            hash: MemoHash::default(),
        })
    }

    pub fn center(&self) -> Vec2 {
        bits_point(self.center)
    }

    pub fn focus(&self) -> Vec2 {
        bits_point(self.focus)
    }

    pub fn radius(&self) -> f32 {
        f32_from_bits(self.radius)
    }

    pub fn stops(&self) -> &MultiStop {
        &self.base
    }

    pub fn to_gradient(&self) -> RadialGradient {
        RadialGradient::new(self.center(), self.radius(), self.base.stops(), self.base.spread())
            .with_focus(self.focus())
            .with_color_space(self.base.color_space())
            .with_transform(self.base.transform())
    }

    fn geometry(&self) -> [u32; 5] {
        [self.center[0], self.center[1], self.focus[0], self.focus[1], self.radius]
    }

    pub fn id(&self) -> String {
        format!(
            "RadialGradientPaint/{},{}/{},{}/{}/{}",
            fmt_bits(self.center[0]),
            fmt_bits(self.center[1]),
            fmt_bits(self.focus[0]),
            fmt_bits(self.focus[1]),
            fmt_bits(self.radius),
            self.base.id_suffix()
        )
    }

    pub fn content_hash(&self) -> i32 {
        self.hash.get_or_compute(|| {
            let h = self.geometry().iter().fold(HASH_SEED, |h, &v| hash_step(h, v as i32));
            self.base.hash_into(h)
        })
    }

    pub(crate) fn write_body(&self, w: &mut dyn KeyWriter) {
        for v in self.geometry() {
            w.write_int(v as i32);
        }
        self.base.write_body(w);
    }

    pub(crate) fn read_body(r: &mut dyn KeyReader) -> Result<Self, DecodeError> {
        let mut geometry = [0u32; 5];
        for slot in &mut geometry {
            *slot = r.read_int()? as u32;
        }
        let base = MultiStop::read_body(r)?;
        let [cx, cy, fx, fy, radius] = geometry;
        Ok(Self {
            center: [cx, cy],
            focus: [fx, fy],
            radius,
            base,
            hash: MemoHash::default(),
        })
    }
}
