//! Marduk paint model.
//!
//! Native paint values (solid colors, gradients, textures) and the geometry
//! types they are expressed in. Renderers consume these directly; the
//! `marduk-paintkey` crate turns them into hashable, serializable keys and
//! back.

pub mod coords;
pub mod paint;
