//! Math types for the path tracer.
//!
//! Vectors are glam's `DVec3` (re-exported as [`Vector3`]); everything that
//! glam does not already provide lives in [`VectorExt`].

// Re-export glam for convenience
pub use glam::DVec3;

mod aabb;
mod interval;
mod ray;
mod vector;

pub use aabb::{Axis, BoundingBox};
pub use interval::Interval;
pub use ray::Ray;
pub use vector::{Vector3, VectorExt};

use thiserror::Error;

/// Errors raised by the math primitives.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("vector component index {0} out of range (expected 0, 1 or 2)")]
    ComponentOutOfRange(usize),
}

/// Result type for math operations.
pub type MathResult<T> = Result<T, MathError>;

/// Draw a uniform `f64` in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn rand::RngCore) -> f64 {
    use rand::Rng;
    rng.gen::<f64>()
}
