//! # 3D Camera System
//!
//! Fly-through perspective camera driven by yaw and pitch angles.
//!
//! ## Coordinate System
//! Right-handed, Y-up. A yaw of -90° with zero pitch looks down -Z; the view
//! matrix is a standard look-at and the projection follows OpenGL clip-space
//! conventions (NDC z in [-1, 1]).

use crate::core::config::CameraConfig;
use crate::foundation::math::{self, utils, Mat4, Mat4Ext, Vec3};

/// Pitch is kept strictly inside ±90° so the basis never degenerates
pub const PITCH_LIMIT: f32 = 89.0;

/// Perspective camera with Euler-angle orientation
///
/// Angles are in degrees. `front`, `right` and `up` are derived from yaw and
/// pitch by [`Camera::update_camera_vectors`]; roll is stored but does not
/// affect the basis.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Viewing direction
    pub front: Vec3,
    /// Camera right vector
    pub right: Vec3,
    /// Camera up vector
    pub up: Vec3,
    /// World up reference
    pub world_up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
    /// Rotation about world Y in degrees
    pub yaw: f32,
    /// Elevation in degrees
    pub pitch: f32,
    /// Rotation about the view axis in degrees
    pub roll: f32,
}

impl Camera {
    /// Create a perspective camera looking down -Z
    pub fn new(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::new(0.0, 0.0, -1.0),
            right: Vec3::x(),
            up: Vec3::y(),
            world_up: Vec3::y(),
            fov: fov_degrees,
            aspect,
            near,
            far,
            yaw: -90.0,
            pitch: 0.0,
            roll: 0.0,
        };
        camera.update_camera_vectors();
        camera
    }

    /// Camera from configuration
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let [x, y, z] = config.position;
        let mut camera = Self::new(Vec3::new(x, y, z), config.fov, aspect, config.near, config.far);
        camera.yaw = config.yaw;
        camera.pitch = utils::clamp(config.pitch, -PITCH_LIMIT, PITCH_LIMIT);
        camera.update_camera_vectors();
        camera
    }

    /// Camera placed at an object's world pose
    ///
    /// Projection settings come from `template`. Position is the world
    /// translation; the world rotation's Euler angles map to yaw = -90° + y,
    /// pitch = x (clamped to ±89°) and roll = z.
    pub fn from_world_matrix(world: &Mat4, template: &Self) -> Self {
        let parts = math::decompose(world);
        let rotation = math::euler_xyz_degrees(&parts.rotation);

        let mut camera = template.clone();
        camera.position = parts.translation;
        camera.yaw = -90.0 + rotation.y;
        camera.pitch = utils::clamp(rotation.x, -PITCH_LIMIT, PITCH_LIMIT);
        camera.roll = rotation.z;
        camera.update_camera_vectors();
        camera
    }

    /// Re-derive `front`, `right` and `up` from yaw and pitch
    pub fn update_camera_vectors(&mut self) {
        let yaw = utils::deg_to_rad(self.yaw);
        let pitch = utils::deg_to_rad(self.pitch);
        let front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());

        self.front = front.normalize();
        self.right = self.front.cross(&self.world_up).normalize();
        self.up = self.right.cross(&self.front).normalize();
    }

    /// View matrix (`look_at(position, position + front, up)`)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.position + self.front, self.up)
    }

    /// Projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(utils::deg_to_rad(self.fov), self.aspect, self.near, self.far)
    }

    /// Front vector flattened onto the XZ plane (`None` when looking straight up or down)
    pub fn planar_front(&self) -> Option<Vec3> {
        let flat = Vec3::new(self.front.x, 0.0, self.front.z);
        let length = flat.magnitude();
        (length > math::constants::LENGTH_EPSILON).then(|| flat / length)
    }

    /// Move along `direction` in the XZ plane only
    pub fn move_planar(&mut self, direction: Vec3, speed: f32) {
        self.position.x += direction.x * speed;
        self.position.z += direction.z * speed;
    }

    /// Move along `direction` on all axes
    pub fn move_vertical(&mut self, direction: Vec3, speed: f32) {
        self.position += direction * speed;
    }

    /// Apply a look offset in degrees
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset;
        self.pitch += y_offset;
        if constrain_pitch {
            self.pitch = utils::clamp(self.pitch, -PITCH_LIMIT, PITCH_LIMIT);
        }
        self.update_camera_vectors();
    }

    /// Change the field of view, staying within `min..=max`
    pub fn adjust_fov(&mut self, delta: f32, min: f32, max: f32) {
        self.fov = utils::clamp(self.fov + delta, min, max);
    }

    /// Update camera aspect ratio for viewport changes
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::debug!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 800.0 / 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Transform;
    use approx::assert_relative_eq;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = Camera::default();
        assert_relative_eq!(camera.position, Vec3::new(0.0, 0.0, 3.0));
        assert_relative_eq!(camera.front, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
        assert_relative_eq!(camera.right, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(camera.up, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(0.0, 500.0, true);
        assert_relative_eq!(camera.pitch, PITCH_LIMIT);
        assert!(camera.front.y > 0.99);
    }

    #[test]
    fn planar_movement_ignores_height() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(0.0, 45.0, true);
        let forward = camera.planar_front().unwrap();
        camera.move_planar(forward, 1.0);
        assert_relative_eq!(camera.position, Vec3::new(0.0, 0.0, 2.0), epsilon = 1e-5);

        camera.move_vertical(camera.world_up, 0.5);
        assert_relative_eq!(camera.position.y, 0.5);
    }

    #[test]
    fn fov_stays_in_range() {
        let mut camera = Camera::default();
        camera.adjust_fov(200.0, 20.0, 135.0);
        assert_relative_eq!(camera.fov, 135.0);
        camera.adjust_fov(-500.0, 20.0, 135.0);
        assert_relative_eq!(camera.fov, 20.0);
    }

    #[test]
    fn world_matrix_sets_pose() {
        let transform = Transform::from_parts(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(10.0, 30.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
        );
        let camera = Camera::from_world_matrix(&transform.model_matrix(), &Camera::default());
        assert_relative_eq!(camera.position, Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-5);
        assert_relative_eq!(camera.yaw, -60.0, epsilon = 1e-3);
        assert_relative_eq!(camera.pitch, 10.0, epsilon = 1e-3);
        assert_relative_eq!(camera.fov, 45.0);
    }

    #[test]
    fn view_matrix_moves_position_to_origin() {
        let camera = Camera::default();
        let eye = camera.view_matrix() * crate::foundation::math::Vec4::new(0.0, 0.0, 3.0, 1.0);
        assert_relative_eq!(eye.xyz(), Vec3::zeros(), epsilon = 1e-5);
    }
}
