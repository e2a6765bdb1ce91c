//! Command-line surface of `marduk-keytool`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use marduk_paint::coords::Vec2;
use marduk_paint::paint::{
    Color, ColorStop, LinearGradient, Paint, RadialGradient, SpreadMode, TwoPointGradient,
};
use marduk_paintkey::RecordFormat;

/// marduk-keytool - build, inspect and transcode paint key records
#[derive(Parser, Debug)]
#[command(name = "marduk-keytool")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log codec activity at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a paint from arguments and print or write its key record
    Encode {
        #[command(subcommand)]
        paint: PaintArgs,

        /// Emit a text record instead of a binary one
        #[arg(long, global = true)]
        text: bool,

        /// Write the record to a file (binary records print as hex otherwise)
        #[arg(short, long, global = true)]
        output: Option<PathBuf>,
    },

    /// Decode a record file (either format) and describe the key
    Inspect {
        file: PathBuf,
    },

    /// Re-encode a record file in the other format
    Convert {
        input: PathBuf,
        output: PathBuf,

        /// Target format
        #[arg(long, value_enum)]
        to: FormatArg,
    },

    /// List registered key tags and their hashes
    Tags,
}

#[derive(Subcommand, Debug)]
pub enum PaintArgs {
    /// Solid color
    Color {
        /// Color as AARRGGBB or RRGGBB hex (optional '#' or '0x' prefix)
        #[arg(value_parser = parse_argb)]
        argb: u32,
    },

    /// Two-point gradient
    #[command(allow_negative_numbers = true)]
    Gradient {
        x1: f32,
        y1: f32,
        #[arg(value_parser = parse_argb)]
        argb1: u32,
        x2: f32,
        y2: f32,
        #[arg(value_parser = parse_argb)]
        argb2: u32,

        /// Repeat back and forth beyond the endpoints
        #[arg(long)]
        cyclic: bool,
    },

    /// Multi-stop linear gradient
    #[command(allow_negative_numbers = true)]
    Linear {
        sx: f32,
        sy: f32,
        ex: f32,
        ey: f32,

        /// Stops as t:argb, comma separated
        #[arg(long, required = true, value_delimiter = ',', value_parser = parse_stop)]
        stops: Vec<ColorStop>,

        #[arg(long, value_enum, default_value_t = SpreadArg::Pad)]
        spread: SpreadArg,
    },

    /// Multi-stop radial gradient
    #[command(allow_negative_numbers = true)]
    Radial {
        cx: f32,
        cy: f32,
        radius: f32,

        /// Stops as t:argb, comma separated
        #[arg(long, required = true, value_delimiter = ',', value_parser = parse_stop)]
        stops: Vec<ColorStop>,

        /// Focus point as fx,fy (defaults to the center)
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        focus: Option<Vec2>,

        #[arg(long, value_enum, default_value_t = SpreadArg::Pad)]
        spread: SpreadArg,
    },
}

impl PaintArgs {
    pub fn to_paint(&self) -> Paint {
        match self {
            PaintArgs::Color { argb } => Paint::solid(Color::from_argb(*argb)),
            PaintArgs::Gradient { x1, y1, argb1, x2, y2, argb2, cyclic } => Paint::Gradient(
                TwoPointGradient::new(
                    Vec2::new(*x1, *y1),
                    Color::from_argb(*argb1),
                    Vec2::new(*x2, *y2),
                    Color::from_argb(*argb2),
                )
                .cyclic(*cyclic),
            ),
            PaintArgs::Linear { sx, sy, ex, ey, stops, spread } => {
                Paint::LinearGradient(LinearGradient::new(
                    Vec2::new(*sx, *sy),
                    Vec2::new(*ex, *ey),
                    stops.clone(),
                    (*spread).into(),
                ))
            }
            PaintArgs::Radial { cx, cy, radius, stops, focus, spread } => {
                let center = Vec2::new(*cx, *cy);
                Paint::RadialGradient(
                    RadialGradient::new(center, *radius, stops.clone(), (*spread).into())
                        .with_focus(focus.unwrap_or(center)),
                )
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum SpreadArg {
    Pad,
    Reflect,
    Repeat,
}

impl From<SpreadArg> for SpreadMode {
    fn from(arg: SpreadArg) -> Self {
        match arg {
            SpreadArg::Pad => SpreadMode::Pad,
            SpreadArg::Reflect => SpreadMode::Reflect,
            SpreadArg::Repeat => SpreadMode::Repeat,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Binary,
}

impl From<FormatArg> for RecordFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => RecordFormat::Text,
            FormatArg::Binary => RecordFormat::Binary,
        }
    }
}

/// Parses `AARRGGBB` or `RRGGBB` hex; six digits mean opaque.
pub fn parse_argb(s: &str) -> Result<u32, String> {
    let digits = s.trim_start_matches('#').trim_start_matches("0x");
    let value = u32::from_str_radix(digits, 16).map_err(|e| format!("invalid color {s:?}: {e}"))?;
    match digits.len() {
        6 => Ok(0xff00_0000 | value),
        8 => Ok(value),
        _ => Err(format!("invalid color {s:?}: expected 6 or 8 hex digits")),
    }
}

/// Parses a `t:argb` stop.
pub fn parse_stop(s: &str) -> Result<ColorStop, String> {
    let (t, argb) = s
        .split_once(':')
        .ok_or_else(|| format!("invalid stop {s:?}: expected t:argb"))?;
    let t: f32 = t.parse().map_err(|e| format!("invalid stop fraction {t:?}: {e}"))?;
    Ok(ColorStop::new(t, Color::from_argb(parse_argb(argb)?)))
}

/// Parses an `x,y` point.
pub fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("invalid point {s:?}: expected x,y"))?;
    let coord = |v: &str| v.trim().parse::<f32>().map_err(|e| format!("invalid coordinate {v:?}: {e}"));
    Ok(Vec2::new(coord(x)?, coord(y)?))
}
