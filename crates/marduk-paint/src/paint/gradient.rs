use crate::coords::{Transform, Vec2};

use super::Color;

/// Gradient spread behavior outside [0, 1] range.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SpreadMode {
    /// Clamp to edge stops.
    Pad,
    /// Repeat the gradient pattern.
    Repeat,
    /// Mirror-repeat the gradient pattern.
    Reflect,
}

/// Color space in which stop colors are interpolated.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ColorSpace {
    #[default]
    Srgb,
    LinearRgb,
}

/// A single gradient stop.
///
/// `t` is expected in [0, 1] and stops are expected in non-decreasing `t`
/// order; [`LinearGradient::is_valid`] and [`RadialGradient::is_valid`]
/// check both.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

fn stops_valid(stops: &[ColorStop]) -> bool {
    stops.len() >= 2
        && stops.iter().all(|s| s.t.is_finite() && (0.0..=1.0).contains(&s.t))
        && stops.windows(2).all(|w| w[0].t <= w[1].t)
}

/// Two-color gradient between two points.
///
/// Outside the segment the end colors are extended, or the pattern repeats
/// back and forth when `cyclic` is set.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TwoPointGradient {
    pub p1: Vec2,
    pub color1: Color,
    pub p2: Vec2,
    pub color2: Color,
    pub cyclic: bool,
}

impl TwoPointGradient {
    pub fn new(p1: Vec2, color1: Color, p2: Vec2, color2: Color) -> Self {
        Self { p1, color1, p2, color2, cyclic: false }
    }

    pub fn cyclic(mut self, cyclic: bool) -> Self {
        self.cyclic = cyclic;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.p1.is_finite() && self.p2.is_finite()
    }
}

/// Linear gradient definition in logical pixel space.
///
/// Semantics:
/// - `start` and `end` are positions in gradient space; `transform` maps
///   gradient space to the geometry's coordinate space.
/// - Stops define straight-alpha colors interpolated in `color_space`.
/// - `spread` defines out-of-range behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<ColorStop>,
    pub spread: SpreadMode,
    pub color_space: ColorSpace,
    pub transform: Transform,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2, stops: Vec<ColorStop>, spread: SpreadMode) -> Self {
        Self {
            start,
            end,
            stops,
            spread,
            color_space: ColorSpace::Srgb,
            transform: Transform::identity(),
        }
    }

    pub fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = color_space;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Returns true when the gradient definition is structurally usable.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && self.transform.is_finite()
            && stops_valid(&self.stops)
            && (self.end.x != self.start.x || self.end.y != self.start.y)
    }
}

/// Radial gradient: colors radiate from `focus` out to the circle at
/// `center` with `radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub radius: f32,
    pub focus: Vec2,
    pub stops: Vec<ColorStop>,
    pub spread: SpreadMode,
    pub color_space: ColorSpace,
    pub transform: Transform,
}

impl RadialGradient {
    /// Creates a gradient whose focus is the center.
    pub fn new(center: Vec2, radius: f32, stops: Vec<ColorStop>, spread: SpreadMode) -> Self {
        Self {
            center,
            radius,
            focus: center,
            stops,
            spread,
            color_space: ColorSpace::Srgb,
            transform: Transform::identity(),
        }
    }

    pub fn with_focus(mut self, focus: Vec2) -> Self {
        self.focus = focus;
        self
    }

    pub fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = color_space;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.focus.is_finite()
            && self.radius.is_finite()
            && self.radius > 0.0
            && self.transform.is_finite()
            && stops_valid(&self.stops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops() -> Vec<ColorStop> {
        vec![ColorStop::new(0.0, Color::black()), ColorStop::new(1.0, Color::white())]
    }

    #[test]
    fn linear_validity() {
        let g = LinearGradient::new(Vec2::zero(), Vec2::new(10.0, 0.0), stops(), SpreadMode::Pad);
        assert!(g.is_valid());

        let degenerate = LinearGradient::new(Vec2::zero(), Vec2::zero(), stops(), SpreadMode::Pad);
        assert!(!degenerate.is_valid());

        let single = LinearGradient::new(
            Vec2::zero(),
            Vec2::new(1.0, 1.0),
            vec![ColorStop::new(0.0, Color::black())],
            SpreadMode::Pad,
        );
        assert!(!single.is_valid());
    }

    #[test]
    fn decreasing_stops_are_invalid() {
        let mut s = stops();
        s.reverse();
        let g = RadialGradient::new(Vec2::zero(), 5.0, s, SpreadMode::Reflect);
        assert!(!g.is_valid());
    }

    #[test]
    fn radial_needs_positive_radius() {
        let g = RadialGradient::new(Vec2::zero(), 0.0, stops(), SpreadMode::Pad);
        assert!(!g.is_valid());
        assert!(g.with_focus(Vec2::new(1.0, 1.0)).radius == 0.0);
    }

    #[test]
    fn radial_focus_defaults_to_center() {
        let g = RadialGradient::new(Vec2::new(3.0, 4.0), 5.0, stops(), SpreadMode::Pad);
        assert_eq!(g.focus, g.center);
    }
}
