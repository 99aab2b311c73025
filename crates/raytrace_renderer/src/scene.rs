//! Scene and per-pixel color integration.

use crate::{Camera, Color, Hittable};
use raytrace_math::{gen_f64, Ray, VectorExt};
use rand::RngCore;

/// Camera plus the root of the hittable graph.
///
/// The scene owns the whole primitive/BVH graph and is only read while
/// rendering, so one instance can be shared across worker threads.
pub struct Scene {
    camera: Camera,
    world: Box<dyn Hittable>,
}

impl Scene {
    /// `camera` must already be initialized.
    pub fn new(camera: Camera, world: Box<dyn Hittable>) -> Self {
        Self { camera, world }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn world(&self) -> &dyn Hittable {
        self.world.as_ref()
    }

    /// Follow one path for at most `depth` bounces.
    ///
    /// Escaping rays pick up the sky color; paths that run out of bounces
    /// are absorbed and contribute black.
    pub fn color_trace(&self, ray: Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        let mut attenuation = Color::ONE;
        let mut ray = ray;

        for _ in 0..depth {
            let rec = self.world.hit(&ray);
            if !rec.is_hit() {
                return attenuation * sky_gradient(&ray);
            }

            attenuation *= rec.material.albedo();
            let scattered = rec.material.scatter(ray.direction(), rec.normal, rng);
            ray = Ray::new(rec.point, scattered);
        }

        Color::ZERO
    }

    /// Average `samples` jittered paths through pixel `(x, y)`.
    ///
    /// `y = 0` is the bottom row. Channels are clamped to [0, 1] before being
    /// scaled by 255.999 and truncated.
    #[allow(clippy::too_many_arguments)]
    pub fn color(
        &self,
        x: u32,
        y: u32,
        samples: u32,
        max_depth: u32,
        width: u32,
        height: u32,
        rng: &mut dyn RngCore,
    ) -> [u8; 3] {
        let mut pixel_color = Color::ZERO;

        for _ in 0..samples {
            let s = (x as f64 + gen_f64(rng)) / width as f64;
            let t = (y as f64 + gen_f64(rng)) / height as f64;
            let ray = self.camera.get_ray(s, t, rng);
            pixel_color += self.color_trace(ray, max_depth, rng);
        }

        color_to_rgb(pixel_color / samples as f64)
    }
}

/// White-to-blue blend on the normalized vertical direction.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().unit();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Clamp a value to [0, 1] range. NaN maps to 0.
#[inline]
pub fn clamp_01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Convert an averaged linear color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let scale = |c: f64| (255.999 * clamp_01(c)) as u8;
    [scale(color.x), scale(color.y), scale(color.z)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HittableList, Material, Sphere};
    use raytrace_math::Vector3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn camera() -> Camera {
        let mut camera = Camera::new()
            .with_position(Vector3::new(0.0, 0.0, 5.0), Vector3::ZERO, Vector3::Y)
            .with_lens(40.0, 0.0)
            .with_aspect_ratio(1.0);
        camera.initialize();
        camera
    }

    fn empty_scene() -> Scene {
        Scene::new(camera(), Box::new(HittableList::new()))
    }

    #[test]
    fn test_sky_gradient() {
        let up = sky_gradient(&Ray::new(Vector3::ZERO, Vector3::new(0.0, 1.0, 0.0)));
        let down = sky_gradient(&Ray::new(Vector3::ZERO, Vector3::new(0.0, -7.0, 0.0)));

        assert!((up - Color::new(0.5, 0.7, 1.0)).length() < 1e-12);
        assert!((down - Color::ONE).length() < 1e-12);
    }

    #[test]
    fn test_color_trace_miss_returns_sky() {
        let scene = empty_scene();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vector3::ZERO, Vector3::new(0.0, 1.0, 0.0));

        assert_eq!(scene.color_trace(ray, 10, &mut rng), sky_gradient(&ray));
    }

    #[test]
    fn test_color_trace_zero_depth_is_black() {
        let scene = empty_scene();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vector3::ZERO, Vector3::Y);

        assert_eq!(scene.color_trace(ray, 0, &mut rng), Color::ZERO);
    }

    fn mirror_floor(albedo: Color) -> Scene {
        let floor = Sphere::new(
            Vector3::new(0.0, -1000.0, 0.0),
            999.0,
            Arc::new(Material::metal(albedo, 0.0)),
        );
        Scene::new(camera(), Box::new(floor))
    }

    #[test]
    fn test_color_trace_single_mirror_bounce() {
        // Straight down onto a mirror: one bounce, then sky straight up.
        let albedo = Color::new(0.8, 0.6, 0.4);
        let scene = mirror_floor(albedo);
        let mut rng = StdRng::seed_from_u64(2);

        let ray = Ray::new(Vector3::new(0.0, 5.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
        let color = scene.color_trace(ray, 5, &mut rng);

        assert!((color - albedo * Color::new(0.5, 0.7, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_color_trace_exhausted_budget_is_black() {
        // The only bounce allowed is spent on the mirror.
        let scene = mirror_floor(Color::ONE);
        let mut rng = StdRng::seed_from_u64(3);

        let ray = Ray::new(Vector3::new(0.0, 5.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(scene.color_trace(ray, 1, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_color_of_empty_scene_is_sky() {
        let scene = empty_scene();
        let mut rng = StdRng::seed_from_u64(4);

        let top = scene.color(5, 9, 8, 5, 10, 10, &mut rng);
        let bottom = scene.color(5, 0, 8, 5, 10, 10, &mut rng);

        // Looking up is bluer than looking down
        assert!(top[0] < bottom[0]);
        assert_eq!(top[2], 255);
        assert_eq!(bottom[2], 255);
    }

    #[test]
    fn test_color_to_rgb_clamps() {
        assert_eq!(color_to_rgb(Color::new(0.0, 0.5, 1.0)), [0, 127, 255]);
        assert_eq!(color_to_rgb(Color::new(-1.0, 2.0, f64::NAN)), [0, 255, 0]);
    }
}
