use std::fmt::Write as _;

use marduk_paint::coords::Transform;
use marduk_paint::paint::{Color, ColorSpace, ColorStop, SpreadMode};

use crate::error::{DecodeError, KeyError};
use crate::numeric::{
    f32_from_bits, f64_bits, f64_from_bits, fold_long, hash_step, round_off_f64, rounded_bits,
};
use crate::wire::{KeyReader, KeyWriter};

use super::{KeyKind, from_wire, to_wire};

/// Out-of-range behavior as recorded in keys.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CycleMethod {
    NoCycle,
    Reflect,
    Repeat,
}

impl CycleMethod {
    fn from_spread(spread: SpreadMode) -> Self {
        match spread {
            SpreadMode::Pad => CycleMethod::NoCycle,
            SpreadMode::Reflect => CycleMethod::Reflect,
            SpreadMode::Repeat => CycleMethod::Repeat,
        }
    }

    fn spread(self) -> SpreadMode {
        match self {
            CycleMethod::NoCycle => SpreadMode::Pad,
            CycleMethod::Reflect => SpreadMode::Reflect,
            CycleMethod::Repeat => SpreadMode::Repeat,
        }
    }

    fn ordinal(self) -> u8 {
        match self {
            CycleMethod::NoCycle => 0,
            CycleMethod::Reflect => 1,
            CycleMethod::Repeat => 2,
        }
    }

    fn from_ordinal(value: u8) -> Option<Self> {
        match value {
            0 => Some(CycleMethod::NoCycle),
            1 => Some(CycleMethod::Reflect),
            2 => Some(CycleMethod::Repeat),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            CycleMethod::NoCycle => "no_cycle",
            CycleMethod::Reflect => "reflect",
            CycleMethod::Repeat => "repeat",
        }
    }
}

fn color_space_ordinal(space: ColorSpace) -> u8 {
    match space {
        ColorSpace::Srgb => 0,
        ColorSpace::LinearRgb => 1,
    }
}

fn color_space_from_ordinal(value: u8) -> Option<ColorSpace> {
    match value {
        0 => Some(ColorSpace::Srgb),
        1 => Some(ColorSpace::LinearRgb),
        _ => None,
    }
}

fn color_space_name(space: ColorSpace) -> &'static str {
    match space {
        ColorSpace::Srgb => "srgb",
        ColorSpace::LinearRgb => "linear_rgb",
    }
}

/// Stops, spread, color space and residual transform shared by the linear
/// and radial gradient keys.
///
/// Invariants (established at construction):
/// - `fractions` and `colors` have the same length, at least 2;
/// - the first fraction is 0 and the last is 1;
/// - `transform` holds six rounded `f64` bit patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiStop {
    fractions: Vec<u32>,
    colors: Vec<u32>,
    cycle: CycleMethod,
    color_space: ColorSpace,
    transform: [u64; 6],
}

impl MultiStop {
    pub(crate) fn new(
        kind: KeyKind,
        stops: &[ColorStop],
        spread: SpreadMode,
        color_space: ColorSpace,
        residual: &Transform,
    ) -> Result<Self, KeyError> {
        if stops.len() < 2 {
            return Err(KeyError::invalid(
                kind,
                format!("at least 2 stops required, got {}", stops.len()),
            ));
        }
        if let Some(s) = stops.iter().find(|s| !(s.t.is_finite() && (0.0..=1.0).contains(&s.t))) {
            return Err(KeyError::invalid(kind, format!("stop fraction {} outside [0, 1]", s.t)));
        }
        if let Some(w) = stops.windows(2).find(|w| w[0].t > w[1].t) {
            return Err(KeyError::invalid(
                kind,
                format!("stop fractions decrease from {} to {}", w[0].t, w[1].t),
            ));
        }

        let mut fractions: Vec<u32> = Vec::with_capacity(stops.len() + 2);
        let mut colors: Vec<u32> = Vec::with_capacity(stops.len() + 2);
        for stop in stops {
            fractions.push(rounded_bits(stop.t as f64));
            colors.push(stop.color.argb());
        }
        if f32_from_bits(fractions[0]) > 0.0 {
            fractions.insert(0, 0.0f32.to_bits());
            colors.insert(0, colors[0]);
        }
        let last = fractions.len() - 1;
        if f32_from_bits(fractions[last]) < 1.0 {
            fractions.push(1.0f32.to_bits());
            colors.push(colors[last]);
        }

        if !residual.is_finite() {
            return Err(KeyError::invalid(kind, "transform must be finite"));
        }
        let transform = residual.matrix().map(|v| f64_bits(round_off_f64(v)));

        Ok(Self {
            fractions,
            colors,
            cycle: CycleMethod::from_spread(spread),
            color_space,
            transform,
        })
    }

    pub fn stops(&self) -> Vec<ColorStop> {
        self.fractions
            .iter()
            .zip(&self.colors)
            .map(|(&t, &c)| ColorStop::new(f32_from_bits(t), Color::from_argb(c)))
            .collect()
    }

    pub fn cycle(&self) -> CycleMethod {
        self.cycle
    }

    pub fn spread(&self) -> SpreadMode {
        self.cycle.spread()
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// Transform left over after folding, applied on top of the key's points.
    pub fn transform(&self) -> Transform {
        Transform::from_matrix(self.transform.map(f64_from_bits))
    }

    /// Continues a content hash that has already absorbed the geometry.
    pub(crate) fn hash_into(&self, mut h: i32) -> i32 {
        for &f in &self.fractions {
            h = hash_step(h, f as i32);
        }
        for &c in &self.colors {
            h = hash_step(h, c as i32);
        }
        h = hash_step(h, self.cycle.ordinal() as i32);
        h = hash_step(h, color_space_ordinal(self.color_space) as i32);
        for &m in &self.transform {
            h = hash_step(h, fold_long(m));
        }
        h
    }

    /// `id()` segments after the geometry.
    pub(crate) fn id_suffix(&self) -> String {
        let mut out = String::new();
        for (i, (&t, &c)) in self.fractions.iter().zip(&self.colors).enumerate() {
            if i > 0 {
                out.push(';');
            }
            let _ = write!(out, "{}@{c:08x}", f32_from_bits(t));
        }
        let _ = write!(
            out,
            "/{}/{}/",
            self.cycle.name(),
            color_space_name(self.color_space)
        );
        let coefficients: Vec<String> =
            self.transform.iter().map(|&m| f64_from_bits(m).to_string()).collect();
        out.push_str(&coefficients.join(","));
        out
    }

    pub(crate) fn write_body(&self, w: &mut dyn KeyWriter) {
        w.write_int_array(&to_wire(&self.fractions));
        w.write_int_array(&to_wire(&self.colors));
        w.write_byte(self.cycle.ordinal());
        w.write_byte(color_space_ordinal(self.color_space));
        let coefficients: Vec<i64> = self.transform.iter().map(|&m| m as i64).collect();
        w.write_long_array(&coefficients);
    }

    pub(crate) fn read_body(r: &mut dyn KeyReader) -> Result<Self, DecodeError> {
        let fractions = from_wire(&r.read_int_array()?);
        let colors = from_wire(&r.read_int_array()?);
        if fractions.len() != colors.len() {
            return Err(DecodeError::StopCountMismatch {
                fractions: fractions.len(),
                colors: colors.len(),
            });
        }

        let value = r.read_byte()?;
        let cycle = CycleMethod::from_ordinal(value)
            .ok_or(DecodeError::InvalidEnum { field: "cycle method", value })?;
        let value = r.read_byte()?;
        let color_space = color_space_from_ordinal(value)
            .ok_or(DecodeError::InvalidEnum { field: "color space", value })?;

        let coefficients = r.read_long_array()?;
        let transform: [u64; 6] = coefficients
            .iter()
            .map(|&m| m as u64)
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| DecodeError::BadTransform { coefficients: coefficients.len() })?;

        Ok(Self { fractions, colors, cycle, color_space, transform })
    }
}
