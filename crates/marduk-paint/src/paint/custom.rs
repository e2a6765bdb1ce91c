use std::any::Any;
use std::fmt;

/// Application-defined paint the built-in paint types do not model
/// (procedural patterns, shader paints, ...).
///
/// Implementations must keep `paint_eq` and `paint_hash` consistent: equal
/// paints return equal hashes. `paint_hash` must also be stable across
/// processes, because paint keys persist it.
pub trait CustomPaint: fmt::Debug + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;

    fn paint_eq(&self, other: &dyn CustomPaint) -> bool;

    fn paint_hash(&self) -> i32;
}
