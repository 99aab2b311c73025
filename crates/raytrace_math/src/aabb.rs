use crate::{Interval, Ray, Vector3};

/// One of the three coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Pick this axis' component out of a vector.
    #[inline]
    pub fn of(self, v: Vector3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

/// Axis-Aligned Bounding Box for the BVH.
///
/// Three ordered intervals, one per axis. Boxes are derived from geometry and
/// never mutated after construction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl BoundingBox {
    /// Create a box from one `(lo, hi)` pair per axis. Pairs may be given in any order.
    pub fn new(x: (f64, f64), y: (f64, f64), z: (f64, f64)) -> Self {
        Self {
            x: Interval::ordered(x.0, x.1),
            y: Interval::ordered(y.0, y.1),
            z: Interval::ordered(z.0, z.1),
        }
    }

    /// Create a box from two opposite corner points.
    pub fn from_points(a: Vector3, b: Vector3) -> Self {
        Self::new((a.x, b.x), (a.y, b.y), (a.z, b.z))
    }

    /// The smallest box containing both `a` and `b`.
    pub fn wraps(a: &BoundingBox, b: &BoundingBox) -> Self {
        Self {
            x: Interval::surrounding(&a.x, &b.x),
            y: Interval::surrounding(&a.y, &b.y),
            z: Interval::surrounding(&a.z, &b.z),
        }
    }

    /// Get the interval for a specific axis.
    pub fn axis(&self, axis: Axis) -> Interval {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Lower corner.
    pub fn min(&self) -> Vector3 {
        Vector3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Upper corner.
    pub fn max(&self) -> Vector3 {
        Vector3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Returns the center point of the bounding box.
    pub fn center(&self) -> Vector3 {
        Vector3::new(self.x.center(), self.y.center(), self.z.center())
    }

    /// True if `other` lies entirely inside this box.
    pub fn encloses(&self, other: &BoundingBox) -> bool {
        Axis::ALL
            .iter()
            .all(|&axis| self.axis(axis).encloses(&other.axis(axis)))
    }

    /// Test if the line through `ray` crosses this box (slab method).
    ///
    /// The whole line is considered, not just `t >= 0`. Zero direction
    /// components rely on IEEE-754: `1 / 0` is `±inf` and the min/max fold
    /// still gives the right answer.
    pub fn through(&self, ray: &Ray) -> bool {
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in Axis::ALL {
            let interval = self.axis(axis);
            let origin = axis.of(ray.origin);
            let inv_d = 1.0 / axis.of(ray.direction);

            let mut t0 = (interval.min - origin) * inv_d;
            let mut t1 = (interval.max - origin) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_min = t0.max(t_min);
            t_max = t1.min(t_max);
        }

        t_min < t_max
    }

    /// Identity for [`BoundingBox::wraps`]; contains nothing.
    pub const EMPTY: BoundingBox = BoundingBox {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_box() -> BoundingBox {
        BoundingBox::from_points(Vector3::splat(-1.0), Vector3::splat(1.0))
    }

    fn any_box() -> impl Strategy<Value = BoundingBox> {
        prop::array::uniform6(-100.0..100.0f64)
            .prop_map(|c| BoundingBox::new((c[0], c[1]), (c[2], c[3]), (c[4], c[5])))
    }

    #[test]
    fn test_new_reorders_pairs() {
        let b = BoundingBox::new((10.0, 0.0), (0.0, 10.0), (5.0, -5.0));

        assert_eq!(b.x, Interval::new(0.0, 10.0));
        assert_eq!(b.y, Interval::new(0.0, 10.0));
        assert_eq!(b.z, Interval::new(-5.0, 5.0));
    }

    #[test]
    fn test_wraps() {
        let box1 = BoundingBox::from_points(Vector3::ZERO, Vector3::splat(5.0));
        let box2 = BoundingBox::from_points(Vector3::splat(3.0), Vector3::new(10.0, 4.0, 10.0));
        let wrapped = BoundingBox::wraps(&box1, &box2);

        assert_eq!(wrapped.min(), Vector3::ZERO);
        assert_eq!(wrapped.max(), Vector3::new(10.0, 5.0, 10.0));
    }

    #[test]
    fn test_wraps_with_empty() {
        let b = unit_box();
        assert_eq!(BoundingBox::wraps(&BoundingBox::EMPTY, &b), b);
    }

    #[test]
    fn test_center() {
        let b = BoundingBox::from_points(Vector3::ZERO, Vector3::new(10.0, 4.0, -2.0));
        assert_eq!(b.center(), Vector3::new(5.0, 2.0, -1.0));
    }

    #[test]
    fn test_through_hit_and_miss() {
        let b = unit_box();

        // Ray pointing at center
        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(b.through(&ray));

        // Ray missing the box sideways
        let ray = Ray::new(Vector3::new(10.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(!b.through(&ray));

        // Diagonal miss
        let ray = Ray::new(Vector3::new(3.0, 3.0, 0.0), Vector3::new(1.0, -1.0, 0.0));
        assert!(!b.through(&ray));
    }

    #[test]
    fn test_through_negative_direction() {
        let b = unit_box();
        let ray = Ray::new(Vector3::new(5.0, 0.5, 0.5), Vector3::new(-1.0, 0.0, 0.0));
        assert!(b.through(&ray));
    }

    #[test]
    fn test_through_zero_direction_components() {
        let b = unit_box();

        // Parallel to the x slabs, inside them
        let inside = Ray::new(Vector3::new(0.5, 0.5, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(b.through(&inside));

        // Parallel to the x slabs, outside them
        let outside = Ray::new(Vector3::new(2.0, 0.5, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(!b.through(&outside));
    }

    proptest! {
        #[test]
        fn wraps_is_tightest_enclosing_box(a in any_box(), b in any_box()) {
            let w = BoundingBox::wraps(&a, &b);
            prop_assert!(w.encloses(&a));
            prop_assert!(w.encloses(&b));
            for axis in Axis::ALL {
                let (wi, ai, bi) = (w.axis(axis), a.axis(axis), b.axis(axis));
                prop_assert_eq!(wi.min, ai.min.min(bi.min));
                prop_assert_eq!(wi.max, ai.max.max(bi.max));
            }
        }

        #[test]
        fn ray_from_inside_always_hits(
            origin in prop::array::uniform3(-0.99..0.99f64),
            direction in prop::array::uniform3(-1.0..1.0f64),
        ) {
            let direction = Vector3::from_array(direction);
            prop_assume!(direction.length_squared() > 1e-12);
            let ray = Ray::new(Vector3::from_array(origin), direction);
            prop_assert!(unit_box().through(&ray));
        }

        #[test]
        fn ray_outside_one_slab_never_hits(
            offset in 1.01..50.0f64,
            y in -10.0..10.0f64,
            dy in -1.0..1.0f64,
            dz in -1.0..1.0f64,
        ) {
            // Direction has no x component, origin is beyond the x slab.
            let ray = Ray::new(Vector3::new(offset, y, 0.0), Vector3::new(0.0, dy, dz));
            prop_assert!(!unit_box().through(&ray));
        }
    }
}
