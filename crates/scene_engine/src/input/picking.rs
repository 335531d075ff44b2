//! Mouse state for picking operations
//!
//! Converts window coordinates to Normalized Device Coordinates and unprojects
//! them into world-space rays.

use crate::foundation::math::{Mat4, Vec3, Vec4};
use crate::spatial::Ray;

/// Cursor position and viewport size
#[derive(Debug, Clone, PartialEq)]
pub struct MouseState {
    /// Current screen-space X position (pixels from the left)
    pub screen_x: f64,
    /// Current screen-space Y position (pixels from the top)
    pub screen_y: f64,
    /// Viewport width in pixels
    pub window_width: u32,
    /// Viewport height in pixels
    pub window_height: u32,
}

impl MouseState {
    /// Cursor at the top-left corner of a viewport
    pub fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            screen_x: 0.0,
            screen_y: 0.0,
            window_width,
            window_height,
        }
    }

    /// Convert the cursor to NDC
    ///
    /// X runs -1 (left) to +1 (right); Y is flipped so -1 is the bottom edge
    /// and +1 the top, matching OpenGL clip space. `None` for an empty viewport.
    #[allow(clippy::cast_possible_truncation)]
    pub fn screen_to_ndc(&self) -> Option<(f32, f32)> {
        if self.window_width == 0 || self.window_height == 0 {
            return None;
        }
        let ndc_x = 2.0 * self.screen_x / f64::from(self.window_width) - 1.0;
        let ndc_y = 1.0 - 2.0 * self.screen_y / f64::from(self.window_height);
        Some((ndc_x as f32, ndc_y as f32))
    }

    /// Update mouse position from window events
    pub fn update_position(&mut self, x: f64, y: f64) {
        self.screen_x = x;
        self.screen_y = y;
    }

    /// Update viewport size
    pub fn update_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }

    /// World-space ray through the cursor, starting at `origin`
    ///
    /// `None` when the viewport is empty or either matrix is singular.
    pub fn world_ray(&self, projection: &Mat4, view: &Mat4, origin: Vec3) -> Option<Ray> {
        let (ndc_x, ndc_y) = self.screen_to_ndc()?;
        ray_from_ndc(ndc_x, ndc_y, projection, view, origin)
    }
}

impl Default for MouseState {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Unproject an NDC point into a world-space direction
///
/// The clip-space point sits on the near plane (`z = -1, w = 1`); after the
/// inverse projection it is forced to a forward-pointing direction
/// (`z = -1, w = 0`) so the inverse view only rotates it.
pub fn ray_from_ndc(ndc_x: f32, ndc_y: f32, projection: &Mat4, view: &Mat4, origin: Vec3) -> Option<Ray> {
    let inverse_projection = projection.try_inverse()?;
    let inverse_view = view.try_inverse()?;

    let clip = Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
    let eye = inverse_projection * clip;
    let eye = Vec4::new(eye.x, eye.y, -1.0, 0.0);
    let world = inverse_view * eye;

    let direction = world.xyz();
    if direction.magnitude_squared() <= f32::EPSILON {
        return None;
    }
    Some(Ray::new(origin, direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{utils, Mat4Ext};
    use approx::assert_relative_eq;

    #[test]
    fn screen_to_ndc_center() {
        let mut mouse = MouseState::new(1920, 1080);
        mouse.update_position(960.0, 540.0);
        let (x, y) = mouse.screen_to_ndc().unwrap();
        assert_relative_eq!(x, 0.0);
        assert_relative_eq!(y, 0.0);
    }

    #[test]
    fn screen_to_ndc_flips_y() {
        let mouse = MouseState::new(800, 600);
        let (x, y) = mouse.screen_to_ndc().unwrap();
        assert_relative_eq!(x, -1.0);
        assert_relative_eq!(y, 1.0);
    }

    #[test]
    fn empty_viewport_has_no_ndc() {
        assert!(MouseState::new(0, 600).screen_to_ndc().is_none());
    }

    #[test]
    fn center_ray_follows_view_direction() {
        let projection = Mat4::perspective(utils::deg_to_rad(45.0), 4.0 / 3.0, 0.1, 100.0);
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let view = Mat4::look_at(eye, Vec3::zeros(), Vec3::y());
        let mut mouse = MouseState::new(800, 600);
        mouse.update_position(400.0, 300.0);

        let ray = mouse.world_ray(&projection, &view, eye).unwrap();
        assert_relative_eq!(ray.origin, eye);
        assert_relative_eq!(ray.direction, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
    }

    #[test]
    fn upper_half_of_screen_points_up() {
        let projection = Mat4::perspective(utils::deg_to_rad(45.0), 1.0, 0.1, 100.0);
        let view = Mat4::identity();
        let mut mouse = MouseState::new(600, 600);
        mouse.update_position(300.0, 100.0);

        let ray = mouse.world_ray(&projection, &view, Vec3::zeros()).unwrap();
        assert!(ray.direction.y > 0.0);
        assert!(ray.direction.z < 0.0);
    }

    #[test]
    fn singular_projection_yields_no_ray() {
        assert!(ray_from_ndc(0.0, 0.0, &Mat4::zeros(), &Mat4::identity(), Vec3::zeros()).is_none());
    }
}
