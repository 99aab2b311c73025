//! Camera for ray generation.

use raytrace_math::{Ray, Vector3, VectorExt};
use rand::RngCore;

/// Thin-lens camera focused on its look-at point.
///
/// The image plane passes through `look_at`; screen coordinates `(0, 0)` are
/// its lower-left corner and `(1, 1)` its upper-right corner.
#[derive(Debug, Clone)]
pub struct Camera {
    // Camera positioning
    look_from: Vector3,
    look_at: Vector3,
    vup: Vector3,

    // Lens settings
    vfov: f64,     // Vertical field of view in degrees
    aperture: f64, // Lens radius, 0 = pinhole
    aspect_ratio: f64,

    // Cached computed values (set by initialize())
    lower_left_corner: Vector3,
    horizontal: Vector3,
    vertical: Vector3,
    lens_u: Vector3,
    lens_v: Vector3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            look_from: Vector3::new(13.0, 2.0, 3.0),
            look_at: Vector3::ZERO,
            vup: Vector3::Y,
            vfov: 30.0,
            aperture: 0.0,
            aspect_ratio: 16.0 / 9.0,
            // Cached values (initialized to defaults)
            lower_left_corner: Vector3::ZERO,
            horizontal: Vector3::X,
            vertical: Vector3::Y,
            lens_u: Vector3::X,
            lens_v: Vector3::Y,
        }
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vector3, look_at: Vector3, vup: Vector3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, aperture: f64) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self
    }

    /// Set the image width / height ratio.
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        let vision = self.look_at - self.look_from;

        // Half the field of view, in radians
        let theta = self.vfov.to_radians() / 2.0;
        let half_height = theta.tan() * vision.length();
        let half_width = half_height * self.aspect_ratio;

        // View-up made orthogonal to the line of sight
        let forward = vision.unit();
        let up = (self.vup - forward * self.vup.dot(forward)).unit();
        let right = vision.cross(up).unit();

        let up = up * half_height;
        let right = right * half_width;

        self.lower_left_corner = self.look_at - up - right;
        self.horizontal = right * 2.0;
        self.vertical = up * 2.0;
        self.lens_u = self.horizontal.unit();
        self.lens_v = self.vertical.unit();
    }

    /// Generate a ray through screen coordinates `(s, t)` in [0, 1]^2.
    ///
    /// The origin is jittered over the lens disk when the aperture is non-zero.
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let origin = if self.aperture <= 0.0 {
            self.look_from
        } else {
            self.lens_sample(rng)
        };

        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(origin, target - origin)
    }

    /// Sample a point on the lens disk.
    fn lens_sample(&self, rng: &mut dyn RngCore) -> Vector3 {
        let p = Vector3::random_in_unit_disk(rng) * self.aperture;
        self.look_from + p.x * self.lens_u + p.y * self.lens_v
    }

    pub fn eye(&self) -> Vector3 {
        self.look_from
    }

    pub fn lower_left_corner(&self) -> Vector3 {
        self.lower_left_corner
    }

    pub fn horizontal(&self) -> Vector3 {
        self.horizontal
    }

    pub fn vertical(&self) -> Vector3 {
        self.vertical
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
