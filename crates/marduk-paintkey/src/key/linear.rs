use marduk_paint::coords::{Transform, Vec2};
use marduk_paint::paint::LinearGradient;

use crate::error::{DecodeError, KeyError};
use crate::numeric::hash_step;
use crate::wire::{KeyReader, KeyWriter};

use super::{KeyKind, MemoHash, MultiStop, bits_point, fmt_bits, point_bits};

const HASH_SEED: i32 = 0x4C;

/// Multi-stop linear gradient key.
///
/// The paint transform is folded into the axis endpoints whenever its linear
/// part is invertible, so the residual transform is the identity in all but
/// the singular case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearGradientKey {
    start: [u32; 2],
    end: [u32; 2],
    base: MultiStop,
    hash: MemoHash,
}

type Point = (f64, f64);

/// Maps the axis through `m`, returning device-space endpoints and the
/// transform still to be applied on top of them.
fn fold_linear(start: Point, end: Point, m: &Transform) -> (Point, Point, Transform) {
    if m.is_translation() {
        return (m.apply(start.0, start.1), m.apply(end.0, end.1), Transform::identity());
    }
    let d = (end.0 - start.0, end.1 - start.1);
    let d_len2 = d.0 * d.0 + d.1 * d.1;
    let Some(inv) = m.linear().inverse() else {
        return (start, end, *m);
    };
    if d_len2 == 0.0 {
        return (start, end, *m);
    }

    // Gradient vector in device space: L⁻ᵀ·d / |d|².
    let g = (
        (inv.m00 * d.0 + inv.m10 * d.1) / d_len2,
        (inv.m01 * d.0 + inv.m11 * d.1) / d_len2,
    );
    let g_len2 = g.0 * g.0 + g.1 * g.1;
    let s = m.apply(start.0, start.1);
    let e = (s.0 + g.0 / g_len2, s.1 + g.1 / g_len2);
    (s, e, Transform::identity())
}

impl LinearGradientKey {
    pub fn new(gradient: &LinearGradient) -> Result<Self, KeyError> {
        let kind = KeyKind::LinearGradient;
        if !gradient.start.is_finite() || !gradient.end.is_finite() {
            return Err(KeyError::invalid(kind, "axis endpoints must be finite"));
        }
        if !gradient.transform.is_finite() {
            return Err(KeyError::invalid(kind, "transform must be finite"));
        }

        let (s, e, residual) =
            fold_linear(gradient.start.to_f64(), gradient.end.to_f64(), &gradient.transform);
        let (start, end) = (point_bits(s.0, s.1), point_bits(e.0, e.1));
        // Checked after rounding: the stored axis must rebuild a valid paint.
        if start == end {
            return Err(KeyError::invalid(kind, "axis endpoints coincide"));
        }
        let base = MultiStop::new(
            kind,
            &gradient.stops,
            gradient.spread,
            gradient.color_space,
            &residual,
        )?;
        Ok(Self { start, end, base, hash: MemoHash::default() })
    }

    pub fn start(&self) -> Vec2 {
        bits_point(self.start)
    }

    pub fn end(&self) -> Vec2 {
        bits_point(self.end)
    }

    pub fn stops(&self) -> &MultiStop {
        &self.base
    }

    pub fn to_gradient(&self) -> LinearGradient {
        LinearGradient::new(self.start(), self.end(), self.base.stops(), self.base.spread())
            .with_color_space(self.base.color_space())
            .with_transform(self.base.transform())
    }

    pub fn id(&self) -> String {
        format!(
            "LinearGradientPaint/{},{}/{},{}/{}",
            fmt_bits(self.start[0]),
            fmt_bits(self.start[1]),
            fmt_bits(self.end[0]),
            fmt_bits(self.end[1]),
            self.base.id_suffix()
        )
    }

    pub fn content_hash(&self) -> i32 {
        self.hash.get_or_compute(|| {
            let h = [self.start[0], self.start[1], self.end[0], self.end[1]]
                .iter()
                .fold(HASH_SEED, |h, &v| hash_step(h, v as i32));
            self.base.hash_into(h)
        })
    }

    pub(crate) fn write_body(&self, w: &mut dyn KeyWriter) {
        for v in [self.start[0], self.start[1], self.end[0], self.end[1]] {
            w.write_int(v as i32);
        }
        self.base.write_body(w);
    }

    pub(crate) fn read_body(r: &mut dyn KeyReader) -> Result<Self, DecodeError> {
        let mut geometry = [0u32; 4];
        for slot in &mut geometry {
            *slot = r.read_int()? as u32;
        }
        let base = MultiStop::read_body(r)?;
        let [sx, sy, ex, ey] = geometry;
        Ok(Self { start: [sx, sy], end: [ex, ey], base, hash: MemoHash::default() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marduk_paint::paint::{Color, ColorStop, SpreadMode};

    fn stops() -> Vec<ColorStop> {
        vec![
            ColorStop::new(0.0, Color::from_argb(0xffff_0000)),
            ColorStop::new(1.0, Color::from_argb(0xff00_00ff)),
        ]
    }

    fn gradient(sx: f32, sy: f32, ex: f32, ey: f32) -> LinearGradient {
        LinearGradient::new(Vec2::new(sx, sy), Vec2::new(ex, ey), stops(), SpreadMode::Pad)
    }

    fn key(g: &LinearGradient) -> LinearGradientKey {
        LinearGradientKey::new(g).unwrap()
    }

    // ── transform folding ─────────────────────────────────────────────────

    #[test]
    fn translation_folds_into_points() {
        let plain = key(&gradient(0.0, 0.0, 42.0, 47.3));
        let moved = key(
            &gradient(-42.0, -47.3, 0.0, 0.0).with_transform(Transform::translation(42.0, 47.3)),
        );
        assert_eq!(plain, moved);
        assert_eq!(plain.content_hash(), moved.content_hash());
        assert_eq!(plain.id(), moved.id());
    }

    #[test]
    fn uniform_scale_folds_into_points() {
        let scaled = key(&gradient(0.0, 0.0, 10.0, 0.0).with_transform(Transform::scale(2.0, 2.0)));
        assert_eq!(scaled, key(&gradient(0.0, 0.0, 20.0, 0.0)));
        assert!(scaled.stops().transform().is_identity());
    }

    #[test]
    fn rotation_folds_into_points() {
        let rotated = key(
            &gradient(0.0, 0.0, 10.0, 0.0)
                .with_transform(Transform::rotation(std::f64::consts::FRAC_PI_2)),
        );
        assert_eq!(rotated, key(&gradient(0.0, 0.0, 0.0, 10.0)));
    }

    #[test]
    fn shear_keeps_isolines() {
        // x' = x + y: isolines x = c become x' - y' = c, so the gradient
        // runs along (1, -1) in device space.
        let shear = Transform::from_matrix([1.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        let k = key(&gradient(0.0, 0.0, 10.0, 0.0).with_transform(shear));
        assert_eq!(k.start(), Vec2::new(0.0, 0.0));
        assert_eq!(k.end(), Vec2::new(5.0, -5.0));
        assert!(k.stops().transform().is_identity());
    }

    #[test]
    fn singular_transform_is_kept_as_residual() {
        let flatten = Transform::scale(0.0, 1.0);
        let k = key(&gradient(1.0, 2.0, 3.0, 4.0).with_transform(flatten));
        assert_eq!(k.start(), Vec2::new(1.0, 2.0));
        assert_eq!(k.end(), Vec2::new(3.0, 4.0));
        assert_eq!(k.stops().transform(), flatten);
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn degenerate_axis_is_rejected() {
        assert!(LinearGradientKey::new(&gradient(1.0, 1.0, 1.0, 1.0)).is_err());
        assert!(LinearGradientKey::new(&gradient(f32::INFINITY, 0.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn axis_collapsing_under_rounding_is_rejected() {
        let short = LinearGradientKey::new(&gradient(0.0, 0.0, 0.000_001, 0.0));
        assert!(matches!(short, Err(KeyError::InvalidPaint { .. })));

        let shrunk = gradient(0.0, 0.0, 1.0, 0.0).with_transform(Transform::scale(1e-6, 1e-6));
        assert!(matches!(LinearGradientKey::new(&shrunk), Err(KeyError::InvalidPaint { .. })));
    }

    #[test]
    fn shortest_surviving_axis_rebuilds() {
        let k = key(&gradient(0.0, 0.0, 0.000_01, 0.0));
        assert_ne!(k.start(), k.end());
        assert_eq!(key(&k.to_gradient()), k);
    }

    #[test]
    fn spread_and_color_space_distinguish_keys() {
        let pad = key(&gradient(0.0, 0.0, 1.0, 0.0));
        let mut repeat = gradient(0.0, 0.0, 1.0, 0.0);
        repeat.spread = SpreadMode::Repeat;
        let linear_rgb = gradient(0.0, 0.0, 1.0, 0.0)
            .with_color_space(marduk_paint::paint::ColorSpace::LinearRgb);
        assert_ne!(pad, key(&repeat));
        assert_ne!(pad, key(&linear_rgb));
    }

    #[test]
    fn id_format() {
        let k = key(&gradient(0.0, 0.0, 2.5, 0.0));
        assert_eq!(
            k.id(),
            "LinearGradientPaint/0,0/2.5,0/0@ffff0000;1@ff0000ff/no_cycle/srgb/1,0,0,1,0,0"
        );
    }

    #[test]
    fn to_gradient_rebuilds_an_equal_key() {
        let k = key(&gradient(3.0, 1.0, 7.0, 9.0).with_transform(Transform::scale(2.0, 3.0)));
        assert_eq!(key(&k.to_gradient()), k);
    }
}
