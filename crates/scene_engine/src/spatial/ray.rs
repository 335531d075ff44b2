//! Rays and ray/OBB intersection

use crate::foundation::math::Vec3;
use crate::scene::OrientedBoundingBox;

/// Directions with a smaller component along a box axis are treated as parallel to it
pub const PARALLEL_EPSILON: f32 = 0.001;

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray, normalizing `direction`
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Slab test against an oriented box
    ///
    /// Returns the entry distance when the origin is outside the box, the
    /// exit distance when it is inside, and `None` when the box is missed or
    /// lies entirely behind the origin.
    pub fn intersect_obb(&self, obb: &OrientedBoundingBox) -> Option<f32> {
        let to_center = obb.center - self.origin;
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for i in 0..3 {
            let axis = obb.axis(i);
            let extent = obb.extents[i];
            let e = axis.dot(&to_center);
            let f = axis.dot(&self.direction);

            if f.abs() > PARALLEL_EPSILON {
                let mut t1 = (e + extent) / f;
                let mut t2 = (e - extent) / f;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                t_min = t_min.max(t1);
                t_max = t_max.min(t2);
                if t_min > t_max || t_max < 0.0 {
                    return None;
                }
            } else if e.abs() > extent {
                return None;
            }
        }

        Some(if t_min > 0.0 { t_min } else { t_max })
    }
}
