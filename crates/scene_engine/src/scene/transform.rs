//! Local transform of a scene object
//!
//! Rotation is stored as Euler angles in degrees and applied X, then Y, then
//! Z. The model matrix is always `T · Rx · Ry · Rz · S`.

use crate::foundation::math::{self, Mat4, Vec3};

/// Position, rotation and scale relative to the parent, plus a dirty flag
///
/// The flag is raised by every mutator and lowered only by the bounds
/// refresh pass once the object's OBB has been recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    dirty: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    /// Identity transform (starts dirty so the first refresh builds its OBB)
    pub fn new() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            dirty: true,
        }
    }

    /// Build from explicit components
    pub fn from_parts(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self { position, rotation, scale, dirty: true }
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Local rotation in Euler degrees
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Local scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Set the local position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    /// Set the local rotation (Euler degrees)
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.dirty = true;
    }

    /// Set the local scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty = true;
    }

    /// Offset the local position
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.dirty = true;
    }

    /// Local model matrix, `T · Rx · Ry · Rz · S`
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * math::rotation_from_euler_degrees(&self.rotation)
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Overwrite all components from a matrix
    ///
    /// Shear cannot be represented and is dropped. A mirrored matrix comes
    /// back with a negative X scale.
    pub fn set_from_model_matrix(&mut self, matrix: &Mat4) {
        let parts = math::decompose(matrix);
        self.position = parts.translation;
        self.rotation = math::euler_xyz_degrees(&parts.rotation);
        self.scale = parts.scale;
        self.dirty = true;
    }

    /// Whether the OBB needs recomputing
    pub fn needs_update(&self) -> bool {
        self.dirty
    }

    /// Force the OBB to be recomputed on the next refresh
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Called by the refresh pass after the OBB has been recomputed
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mutators_raise_the_dirty_flag() {
        let mut transform = Transform::new();
        assert!(transform.needs_update());
        transform.mark_clean();
        assert!(!transform.needs_update());

        transform.set_position(Vec3::new(1.0, 0.0, 0.0));
        assert!(transform.needs_update());
        transform.mark_clean();

        transform.set_rotation(Vec3::new(0.0, 45.0, 0.0));
        assert!(transform.needs_update());
        transform.mark_clean();

        transform.set_scale(Vec3::new(2.0, 2.0, 2.0));
        assert!(transform.needs_update());
        transform.mark_clean();

        transform.translate(Vec3::new(0.0, 1.0, 0.0));
        assert!(transform.needs_update());
    }

    #[test]
    fn model_matrix_applies_scale_before_rotation() {
        let transform = Transform::from_parts(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 90.0),
            Vec3::new(2.0, 1.0, 1.0),
        );
        let point = transform.model_matrix().transform_point(&crate::foundation::math::Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(point.coords, Vec3::new(10.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn set_from_model_matrix_round_trips() {
        let source = Transform::from_parts(
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(10.0, 20.0, 30.0),
            Vec3::new(1.5, 2.0, 0.5),
        );
        let mut target = Transform::new();
        target.mark_clean();
        target.set_from_model_matrix(&source.model_matrix());

        assert!(target.needs_update());
        assert_relative_eq!(target.position(), source.position(), epsilon = 1e-4);
        assert_relative_eq!(target.rotation(), source.rotation(), epsilon = 1e-3);
        assert_relative_eq!(target.scale(), source.scale(), epsilon = 1e-4);
    }
}
