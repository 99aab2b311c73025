//! Vector helpers on top of glam's `DVec3`.
//!
//! glam already gives us the immutable value semantics we want: every
//! operator returns a fresh vector and nothing is shared mutably.

use glam::DVec3;
use rand::RngCore;

use crate::{gen_f64, MathError, MathResult};

/// Three `f64` components. Arithmetic, `dot`, `cross`, `length`, `abs` come from glam.
pub type Vector3 = DVec3;

/// Operations the renderer needs that glam does not provide directly.
pub trait VectorExt: Sized {
    /// `v / |v|`. A zero-length vector yields inf/NaN components instead of an error.
    fn unit(self) -> Self;

    /// Indexed component access. Only 0, 1 and 2 are valid.
    fn component(self, index: usize) -> MathResult<f64>;

    /// Component-wise square root.
    fn component_sqrt(self) -> Self;

    /// Uniform vector with every component in [0, 1).
    fn random(rng: &mut dyn RngCore) -> Self;

    /// Uniform point inside the unit ball (rejection sampled).
    fn random_in_unit_ball(rng: &mut dyn RngCore) -> Self;

    /// Uniform point inside the unit disk on the z = 0 plane (rejection sampled).
    fn random_in_unit_disk(rng: &mut dyn RngCore) -> Self;
}

impl VectorExt for DVec3 {
    #[inline]
    fn unit(self) -> Self {
        self / self.length()
    }

    #[inline]
    fn component(self, index: usize) -> MathResult<f64> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            2 => Ok(self.z),
            _ => Err(MathError::ComponentOutOfRange(index)),
        }
    }

    #[inline]
    fn component_sqrt(self) -> Self {
        DVec3::new(self.x.sqrt(), self.y.sqrt(), self.z.sqrt())
    }

    fn random(rng: &mut dyn RngCore) -> Self {
        DVec3::new(gen_f64(rng), gen_f64(rng), gen_f64(rng))
    }

    fn random_in_unit_ball(rng: &mut dyn RngCore) -> Self {
        // Roughly 48% of draws from the enclosing cube are rejected.
        loop {
            let p = DVec3::random(rng) * 2.0 - 1.0;
            if p.length_squared() <= 1.0 {
                return p;
            }
        }
    }

    fn random_in_unit_disk(rng: &mut dyn RngCore) -> Self {
        loop {
            let p = DVec3::new(gen_f64(rng) * 2.0 - 1.0, gen_f64(rng) * 2.0 - 1.0, 0.0);
            if p.length_squared() <= 1.0 {
                return p;
            }
        }
    }
}
