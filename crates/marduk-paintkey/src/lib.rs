//! Canonical, content-hashed keys for Marduk paints.
//!
//! A [`PaintKey`] collapses paint descriptions a renderer would draw
//! identically into one value, usable as a cache key and persistable as a
//! compact binary record or a line of text.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`numeric`] | rounding, bit patterns, tag and content hash primitives |
//! | [`key`] | `PaintKey` and its seven variants |
//! | [`wire`] | `KeyWriter` / `KeyReader`, binary and text records |
//! | [`registry`] | `KeyRegistry`: tag hash to key kind |
//! | [`codec`] | `KeyCodec`: record header, dispatch, hash verification |
//! | [`error`] | `DecodeError`, `EncodeError`, `KeyError`, `RegistryError` |
//! | [`config`] | `CodecConfig` |
//! | [`logging`] | `env_logger` setup for binaries |
//!
//! # Quick start
//!
//! ```rust
//! use marduk_paint::coords::Vec2;
//! use marduk_paint::paint::{Color, Paint, TwoPointGradient};
//! use marduk_paintkey::{KeyCodec, KeyRegistry, PaintKey};
//!
//! let a = Vec2::new(0.0, 0.0);
//! let b = Vec2::new(10.0, 5.0);
//! let forward = Paint::Gradient(TwoPointGradient::new(a, Color::white(), b, Color::black()));
//! let backward = Paint::Gradient(TwoPointGradient::new(b, Color::black(), a, Color::white()));
//!
//! let key = PaintKey::from_paint(&forward).unwrap();
//! assert_eq!(key, PaintKey::from_paint(&backward).unwrap());
//!
//! let registry = KeyRegistry::builtin();
//! let codec = KeyCodec::new(&registry);
//! let record = codec.encode_text(&key).unwrap();
//! assert_eq!(codec.decode_text(&record).unwrap(), key);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod key;
pub mod logging;
pub mod numeric;
pub mod registry;
pub mod wire;

pub use codec::KeyCodec;
pub use config::CodecConfig;
pub use error::{DecodeError, EncodeError, KeyError, RegistryError};
pub use key::{KeyKind, OpaquePaintCodec, PaintKey};
pub use registry::KeyRegistry;
pub use wire::RecordFormat;
