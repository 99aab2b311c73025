//! Sphere primitive for ray tracing.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use raytrace_math::{BoundingBox, Ray, Vector3};

/// A sphere primitive. Leaf of the hittable hierarchy.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vector3,
    radius: f64,
    material: Arc<Material>,
    bbox: BoundingBox,
}

impl Sphere {
    /// Create a new sphere. `radius` must be positive.
    pub fn new(center: Vector3, radius: f64, material: Arc<Material>) -> Self {
        let rvec = Vector3::splat(radius);
        let bbox = BoundingBox::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    /// Outward normal at `point`, scaled by the radius.
    #[inline]
    fn normal(&self, point: Vector3) -> Vector3 {
        point - self.center
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray) -> HitRecord<'_> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let b = oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = b * b - a * c;
        if discriminant < 0.0 {
            return HitRecord::miss();
        }

        let sqrtd = discriminant.sqrt();

        // Prefer the nearer root; the far one only counts from inside the sphere.
        let near = (-b - sqrtd) / a;
        let far = (-b + sqrtd) / a;
        let t = if near > 0.0 {
            near
        } else if far > 0.0 {
            far
        } else {
            return HitRecord::miss();
        };

        let point = ray.at(t);
        HitRecord::new(t, point, self.normal(point), &self.material)
    }

    fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }
}
