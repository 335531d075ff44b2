//! Math utilities and types
//!
//! Provides the nalgebra aliases used throughout the editor plus the handful
//! of matrix helpers the scene graph needs: Euler rotations, an OpenGL-style
//! perspective projection, a right-handed look-at, and TRS decomposition.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;

    /// Lengths below this are treated as zero when normalizing
    pub const LENGTH_EPSILON: f32 = 1e-6;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Create a perspective projection matrix (OpenGL clip space, NDC z in [-1, 1])
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Upper-left 3x3 block
    fn linear_part(&self) -> Mat3;

    /// Translation column
    fn translation_part(&self) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        // P = [1/(a·tan(φ/2))  0            0                 0              ]
        //     [0               1/tan(φ/2)   0                 0              ]
        //     [0               0            -(f+n)/(f-n)      -2fn/(f-n)     ]
        //     [0               0            -1                0              ]
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = -(far + near) / (far - near);
        result[(2, 3)] = -(2.0 * far * near) / (far - near);
        result[(3, 2)] = -1.0;
        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new(
            1.0, 0.0, 0.0, -eye.x,
            0.0, 1.0, 0.0, -eye.y,
            0.0, 0.0, 1.0, -eye.z,
            0.0, 0.0, 0.0, 1.0,
        );

        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }

    fn linear_part(&self) -> Mat3 {
        self.fixed_view::<3, 3>(0, 0).into_owned()
    }

    fn translation_part(&self) -> Vec3 {
        Vec3::new(self[(0, 3)], self[(1, 3)], self[(2, 3)])
    }
}

/// Result of splitting an affine matrix into translation, rotation and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decomposed {
    /// Translation column
    pub translation: Vec3,
    /// Pure rotation (orthonormal, determinant +1)
    pub rotation: Mat3,
    /// Per-axis scale; a mirrored matrix yields a negative X scale
    pub scale: Vec3,
}

/// Decompose an affine matrix into translation, rotation and scale
///
/// Shear is not representable and is folded into the rotation. Columns with
/// zero length keep a zero scale and an identity axis so the rotation stays
/// well formed.
pub fn decompose(matrix: &Mat4) -> Decomposed {
    let translation = matrix.translation_part();
    let linear = matrix.linear_part();

    let mut scale = Vec3::zeros();
    let mut rotation = Mat3::identity();
    for axis in 0..3 {
        let column = linear.column(axis).into_owned();
        let length = column.magnitude();
        scale[axis] = length;
        if length > constants::LENGTH_EPSILON {
            rotation.set_column(axis, &(column / length));
        }
    }

    if rotation.determinant() < 0.0 {
        scale.x = -scale.x;
        let flipped = -rotation.column(0).into_owned();
        rotation.set_column(0, &flipped);
    }

    Decomposed { translation, rotation, scale }
}

/// Euler angles in degrees such that `Rx(x) · Ry(y) · Rz(z) == rotation`
///
/// Near gimbal lock (|y| = 90°) the Z angle is pinned to zero and the whole
/// remaining twist is attributed to X.
pub fn euler_xyz_degrees(rotation: &Mat3) -> Vec3 {
    let sin_y = utils::clamp(rotation[(0, 2)], -1.0, 1.0);
    let y = sin_y.asin();

    let (x, z) = if y.cos().abs() > 1e-5 {
        (
            (-rotation[(1, 2)]).atan2(rotation[(2, 2)]),
            (-rotation[(0, 1)]).atan2(rotation[(0, 0)]),
        )
    } else {
        (rotation[(2, 1)].atan2(rotation[(1, 1)]), 0.0)
    };

    Vec3::new(utils::rad_to_deg(x), utils::rad_to_deg(y), utils::rad_to_deg(z))
}

/// Rotation matrix for Euler degrees applied X, then Y, then Z
pub fn rotation_from_euler_degrees(degrees: &Vec3) -> Mat4 {
    Mat4::rotation_x(utils::deg_to_rad(degrees.x))
        * Mat4::rotation_y(utils::deg_to_rad(degrees.y))
        * Mat4::rotation_z(utils::deg_to_rad(degrees.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn euler_extraction_inverts_composition() {
        let angles = Vec3::new(30.0, -45.0, 60.0);
        let rotation = rotation_from_euler_degrees(&angles).linear_part();
        let recovered = euler_xyz_degrees(&rotation);
        assert_relative_eq!(recovered, angles, epsilon = 1e-3);
    }

    #[test]
    fn euler_extraction_survives_gimbal_lock() {
        let angles = Vec3::new(20.0, 90.0, 0.0);
        let rotation = rotation_from_euler_degrees(&angles).linear_part();
        let recovered = euler_xyz_degrees(&rotation);
        let rebuilt = rotation_from_euler_degrees(&recovered).linear_part();
        assert_relative_eq!(rebuilt, rotation, epsilon = 1e-4);
    }

    #[test]
    fn decompose_recovers_non_uniform_scale() {
        let matrix = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0))
            * rotation_from_euler_degrees(&Vec3::new(0.0, 90.0, 0.0))
            * Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 3.0, 4.0));
        let parts = decompose(&matrix);
        assert_relative_eq!(parts.translation, Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-5);
        assert_relative_eq!(parts.scale, Vec3::new(2.0, 3.0, 4.0), epsilon = 1e-5);
        assert_relative_eq!(parts.rotation.determinant(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn perspective_maps_near_plane_to_minus_one() {
        let projection = Mat4::perspective(utils::deg_to_rad(45.0), 1.0, 0.1, 100.0);
        let clip = projection * Vec4::new(0.0, 0.0, -0.1, 1.0);
        assert_relative_eq!(clip.z / clip.w, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn look_at_moves_eye_to_origin() {
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::zeros(), Vec3::y());
        let eye = view * Vec4::new(0.0, 0.0, 5.0, 1.0);
        assert_relative_eq!(eye.xyz(), Vec3::zeros(), epsilon = 1e-5);
    }
}
