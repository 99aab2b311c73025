//! Raytrace Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over spheres with matte, metal and glass
//! materials, accelerated by a bounding volume hierarchy.
//!
//! Pixels are rendered independently and in parallel; every random draw goes
//! through an explicitly passed generator so a seeded render is reproducible.

mod bvh;
mod camera;
mod error;
mod hittable;
mod material;
mod reference;
mod renderer;
mod scene;
mod sphere;

pub use bvh::Bvh;
pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::Material;
pub use reference::build_scene;
pub use renderer::{render, render_pixel, CancelToken, ImageBuffer, RenderConfig};
pub use scene::{clamp_01, color_to_rgb, sky_gradient, Scene};
pub use sphere::Sphere;

/// Re-export the math types the public API is written in
pub use raytrace_math::{BoundingBox, Interval, Ray, Vector3, VectorExt};

/// Linear RGB color, one channel per component.
pub type Color = Vector3;
