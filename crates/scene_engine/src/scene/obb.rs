//! Oriented bounding boxes

use crate::foundation::math::{Mat3, Mat4, Mat4Ext, Point3, Vec3};

/// World-space box with arbitrary orientation
///
/// `axes` holds the box's local X/Y/Z directions as unit columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBoundingBox {
    /// Box center in world space
    pub center: Vec3,
    /// Half-widths along each axis
    pub extents: Vec3,
    /// Unit axes as columns
    pub axes: Mat3,
}

impl Default for OrientedBoundingBox {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            extents: Vec3::new(1.0, 1.0, 1.0),
            axes: Mat3::identity(),
        }
    }
}

impl OrientedBoundingBox {
    /// Axis-aligned box spanning `min..max`
    pub fn from_bounds(min: Vec3, max: Vec3) -> Self {
        let center = (min + max) * 0.5;
        Self {
            center,
            extents: max - center,
            axes: Mat3::identity(),
        }
    }

    /// Place local bounds into world space
    ///
    /// Non-uniform scale lands in `extents`; `axes` keeps only the direction
    /// of each world column.
    pub fn update_from_world(&mut self, local_min: Vec3, local_max: Vec3, world: &Mat4) {
        let local_center = (local_min + local_max) * 0.5;
        let local_extents = local_max - local_center;

        self.center = world.transform_point(&Point3::from(local_center)).coords;

        let linear = world.linear_part();
        let mut axes = Mat3::identity();
        let mut extents = Vec3::zeros();
        for axis in 0..3 {
            let column = linear.column(axis).into_owned();
            let length = column.magnitude();
            extents[axis] = local_extents[axis] * length;
            if length > crate::foundation::math::constants::LENGTH_EPSILON {
                axes.set_column(axis, &(column / length));
            }
        }
        self.axes = axes;
        self.extents = extents;
    }

    /// Unit axis `index` (0 = X, 1 = Y, 2 = Z)
    pub fn axis(&self, index: usize) -> Vec3 {
        self.axes.column(index).into_owned()
    }

    /// The eight world-space corners
    pub fn corners(&self) -> [Vec3; 8] {
        let x = self.axis(0) * self.extents.x;
        let y = self.axis(1) * self.extents.y;
        let z = self.axis(2) * self.extents.z;
        let c = self.center;
        [
            c - x - y - z,
            c + x - y - z,
            c - x + y - z,
            c + x + y - z,
            c - x - y + z,
            c + x - y + z,
            c - x + y + z,
            c + x + y + z,
        ]
    }
}
