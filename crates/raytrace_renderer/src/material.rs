//! Surface scattering.
//!
//! Materials form a closed set, so they are an enum rather than a trait
//! object. Spheres share them through `Arc<Material>`.

use crate::Color;
use raytrace_math::{gen_f64, Vector3, VectorExt};
use rand::RngCore;

/// How a surface scatters incoming light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Lambertian diffuse surface.
    Matte { albedo: Color },
    /// Mirror reflection. `fuzz` only perturbs the reflection when
    /// `fuzz_enabled` is set; see [`Material::fuzzy_metal`].
    Metal {
        albedo: Color,
        fuzz: f64,
        fuzz_enabled: bool,
    },
    /// Dielectric with Fresnel (Schlick) reflect/refract choice.
    Glass {
        albedo: Color,
        blur: f64,
        refractive_index: f64,
    },
}

impl Material {
    pub fn matte(albedo: Color) -> Self {
        Material::Matte { albedo }
    }

    /// A metal whose fuzz is stored but not applied: a perfect mirror.
    pub fn metal(albedo: Color, fuzz: f64) -> Self {
        Material::Metal {
            albedo,
            fuzz,
            fuzz_enabled: false,
        }
    }

    /// A metal that adds `fuzz * random_in_unit_ball` to every reflection.
    pub fn fuzzy_metal(albedo: Color, fuzz: f64) -> Self {
        Material::Metal {
            albedo,
            fuzz,
            fuzz_enabled: true,
        }
    }

    /// - `refractive_index`: 1.5 for glass, 2.4 for diamond. Must be > 1.
    pub fn glass(albedo: Color, blur: f64, refractive_index: f64) -> Self {
        Material::Glass {
            albedo,
            blur,
            refractive_index,
        }
    }

    /// Attenuation multiplied into the path color at every bounce.
    pub fn albedo(&self) -> Color {
        match self {
            Material::Matte { albedo }
            | Material::Metal { albedo, .. }
            | Material::Glass { albedo, .. } => *albedo,
        }
    }

    /// Map an incoming direction and a surface normal to the outgoing direction.
    ///
    /// Neither argument needs to be normalized.
    pub fn scatter(&self, incoming: Vector3, normal: Vector3, rng: &mut dyn RngCore) -> Vector3 {
        let incoming = incoming.unit();
        let normal = normal.unit();

        match *self {
            Material::Matte { .. } => normal + Vector3::random_in_unit_ball(rng),

            Material::Metal {
                fuzz, fuzz_enabled, ..
            } => {
                let reflected = reflect(incoming, normal);
                if fuzz_enabled {
                    reflected + fuzz * Vector3::random_in_unit_ball(rng)
                } else {
                    reflected
                }
            }

            Material::Glass {
                blur,
                refractive_index,
                ..
            } => {
                let cosine = incoming.dot(normal);
                // Outward normals: a negative cosine means we are entering.
                let ratio = if cosine < 0.0 {
                    1.0 / refractive_index
                } else {
                    refractive_index
                };

                let k = 1.0 - ratio * ratio * (1.0 - cosine * cosine);
                let can_refract = cosine <= 0.0 || k >= 0.0;

                let direction = if can_refract && gen_f64(rng) > schlick(cosine.abs(), ratio) {
                    refract(incoming, normal, cosine, ratio, k)
                } else {
                    reflect(incoming, normal)
                };

                direction + blur * Vector3::random_in_unit_ball(rng)
            }
        }
    }
}

/// Schlick's approximation of the reflection probability.
#[inline]
fn schlick(cosine: f64, ratio: f64) -> f64 {
    let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vector3, n: Vector3) -> Vector3 {
    v - 2.0 * v.dot(n) * n
}

/// Snell's law in vector form. `uv` and `n` are unit vectors, `cosine = uv . n`
/// and `k = 1 - ratio^2 (1 - cosine^2)`.
///
/// The tangential part is scaled by `ratio`; the normal part keeps the side
/// of the surface the ray was travelling towards.
#[inline]
fn refract(uv: Vector3, n: Vector3, cosine: f64, ratio: f64, k: f64) -> Vector3 {
    let tangential = ratio * (uv - cosine * n);
    // Grazing exits can leave k marginally negative.
    let normal_part = k.max(0.0).sqrt() * n;
    if cosine < 0.0 {
        tangential - normal_part
    } else {
        tangential + normal_part
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_albedo() {
        let c = Color::new(0.1, 0.2, 0.3);
        assert_eq!(Material::matte(c).albedo(), c);
        assert_eq!(Material::metal(c, 0.3).albedo(), c);
        assert_eq!(Material::glass(c, 0.0, 1.5).albedo(), c);
    }

    #[test]
    fn test_matte_scatters_around_normal() {
        let mut rng = StdRng::seed_from_u64(11);
        let material = Material::matte(Color::splat(0.5));
        let normal = Vector3::new(0.0, 3.0, 0.0);

        for _ in 0..500 {
            let out = material.scatter(Vector3::new(1.0, -1.0, 0.0), normal, &mut rng);
            // unit normal + point in the unit ball stays within distance 1 of the normal tip
            assert!((out - Vector3::Y).length() <= 1.0 + EPS);
        }
    }

    #[test]
    fn test_metal_reflects_without_fuzz() {
        let mut rng = StdRng::seed_from_u64(12);
        let material = Material::metal(Color::ONE, 0.9);

        let out = material.scatter(Vector3::new(1.0, -1.0, 0.0), Vector3::Y, &mut rng);
        let expected = Vector3::new(1.0, 1.0, 0.0).unit();
        assert!((out - expected).length() < EPS);
    }

    #[test]
    fn test_fuzzy_metal_perturbs() {
        let mut rng = StdRng::seed_from_u64(13);
        let material = Material::fuzzy_metal(Color::ONE, 0.5);
        let expected = Vector3::new(1.0, 1.0, 0.0).unit();

        let mut any_different = false;
        for _ in 0..20 {
            let out = material.scatter(Vector3::new(1.0, -1.0, 0.0), Vector3::Y, &mut rng);
            assert!((out - expected).length() <= 0.5 + EPS);
            any_different |= (out - expected).length() > EPS;
        }
        assert!(any_different);
    }

    #[test]
    fn test_glass_head_on_refracts_straight_through() {
        // At normal incidence Schlick gives 0.04 for n = 1.5, so most rays pass.
        let mut rng = StdRng::seed_from_u64(14);
        let material = Material::glass(Color::ONE, 0.0, 1.5);
        let incoming = Vector3::new(0.0, -1.0, 0.0);

        let mut refracted = 0;
        for _ in 0..1000 {
            let out = material.scatter(incoming, Vector3::Y, &mut rng);
            if (out - incoming).length() < EPS {
                refracted += 1;
            } else {
                assert!((out - Vector3::Y).length() < EPS, "otherwise reflected");
            }
        }
        assert!(refracted > 900, "refracted {refracted} of 1000");
    }

    #[test]
    fn test_glass_refraction_bends_toward_normal() {
        let mut rng = StdRng::seed_from_u64(15);
        let material = Material::glass(Color::ONE, 0.0, 1.5);
        let incoming = Vector3::new(1.0, -1.0, 0.0).unit();
        let sin_in = incoming.x;

        for _ in 0..200 {
            let out = material.scatter(incoming, Vector3::Y, &mut rng);
            if out.y < 0.0 {
                // Snell: sin_out = sin_in / n
                assert!((out.length() - 1.0).abs() < 1e-9);
                assert!((out.x - sin_in / 1.5).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_glass_total_internal_reflection() {
        // Leaving glass at a grazing angle: must always reflect.
        let mut rng = StdRng::seed_from_u64(16);
        let material = Material::glass(Color::ONE, 0.0, 1.5);
        let incoming = Vector3::new(1.0, 0.2, 0.0).unit();

        for _ in 0..200 {
            let out = material.scatter(incoming, Vector3::Y, &mut rng);
            let expected = Vector3::new(incoming.x, -incoming.y, 0.0);
            assert!((out - expected).length() < EPS);
        }
    }

    #[test]
    fn test_glass_never_produces_nan() {
        let mut rng = StdRng::seed_from_u64(17);
        let material = Material::glass(Color::ONE, 0.1, 1.7);
        for _ in 0..2000 {
            let incoming = Vector3::random_in_unit_ball(&mut rng);
            let normal = Vector3::random_in_unit_ball(&mut rng);
            if incoming.length_squared() < 1e-6 || normal.length_squared() < 1e-6 {
                continue;
            }
            assert!(!material.scatter(incoming, normal, &mut rng).is_nan());
        }
        // Exactly grazing
        assert!(!material
            .scatter(Vector3::X, Vector3::Y, &mut rng)
            .is_nan());
    }

    #[test]
    fn test_schlick_bounds() {
        assert!((schlick(1.0, 1.0 / 1.5) - 0.04).abs() < 1e-12);
        assert!((schlick(0.0, 1.0 / 1.5) - 1.0).abs() < 1e-12);
        // Same reflectance from either side of the interface
        assert!((schlick(0.3, 1.5) - schlick(0.3, 1.0 / 1.5)).abs() < 1e-12);
    }
}
