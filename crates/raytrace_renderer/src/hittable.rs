//! Hittable trait and HitRecord for ray-object intersection.

use crate::{Color, Material};
use raytrace_math::{BoundingBox, Ray, Vector3};

/// Material referenced by miss records. Never scattered.
static MISS_MATERIAL: Material = Material::Matte {
    albedo: Color::ZERO,
};

/// Record of a ray-object intersection.
///
/// Produced per query and consumed immediately; `t == +inf` means no hit.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Ray parameter of the intersection
    pub t: f64,
    /// Point of intersection
    pub point: Vector3,
    /// Outward surface normal, not normalized
    pub normal: Vector3,
    /// Material at the intersection point
    pub material: &'a Material,
}

impl<'a> HitRecord<'a> {
    pub fn new(t: f64, point: Vector3, normal: Vector3, material: &'a Material) -> Self {
        Self {
            t,
            point,
            normal,
            material,
        }
    }

    /// The "nothing was hit" record.
    pub fn miss() -> Self {
        Self {
            t: f64::INFINITY,
            point: Vector3::ZERO,
            normal: Vector3::ZERO,
            material: &MISS_MATERIAL,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.t.is_finite()
    }

    /// The nearer of two records. Ties keep `self`.
    #[inline]
    pub fn closer(self, other: HitRecord<'a>) -> HitRecord<'a> {
        if other.t < self.t {
            other
        } else {
            self
        }
    }
}

impl Default for HitRecord<'_> {
    fn default() -> Self {
        Self::miss()
    }
}

/// Trait for objects that can be hit by rays.
///
/// Scenes are shared read-only across render threads, hence `Send + Sync`.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `t > 0`, or [`HitRecord::miss`].
    fn hit(&self, ray: &Ray) -> HitRecord<'_>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> BoundingBox;
}

/// A flat list of hittable objects, scanned linearly.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
    bbox: BoundingBox,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: BoundingBox::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.bbox = BoundingBox::wraps(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Hand the objects over, e.g. to [`crate::Bvh::build`].
    pub fn into_objects(self) -> Vec<Box<dyn Hittable>> {
        self.objects
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Box<dyn Hittable>>> for HittableList {
    fn from(objects: Vec<Box<dyn Hittable>>) -> Self {
        let mut list = Self::new();
        for object in objects {
            list.add(object);
        }
        list
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray) -> HitRecord<'_> {
        // Strict `<` inside `closer`: the first of equally near hits wins.
        self.objects
            .iter()
            .fold(HitRecord::miss(), |closest, object| closest.closer(object.hit(ray)))
    }

    fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }
}
