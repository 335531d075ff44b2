//! Mouse picking
//!
//! Orchestrates the picking pipeline: cursor → NDC → world ray → OBB slab
//! tests → nearest hit → selection.

use crate::foundation::math::{Mat4, Vec3};
use crate::input::picking::MouseState;
use crate::render::Camera;
use crate::scene::{ObjectId, Scene};

/// Everything needed to cast a ray through the cursor
#[derive(Debug, Clone, PartialEq)]
pub struct PickRequest {
    /// Cursor X in pixels from the left
    pub cursor_x: f64,
    /// Cursor Y in pixels from the top
    pub cursor_y: f64,
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
    /// Camera projection matrix
    pub projection: Mat4,
    /// Camera view matrix
    pub view: Mat4,
    /// Ray origin (camera position)
    pub origin: Vec3,
}

impl PickRequest {
    /// Request for a cursor position seen through `camera`
    pub fn new(cursor_x: f64, cursor_y: f64, viewport: (u32, u32), camera: &Camera) -> Self {
        Self {
            cursor_x,
            cursor_y,
            viewport_width: viewport.0,
            viewport_height: viewport.1,
            projection: camera.projection_matrix(),
            view: camera.view_matrix(),
            origin: camera.position,
        }
    }
}

/// Nearest object under the cursor
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    /// Object handle
    pub object: ObjectId,
    /// Object name
    pub name: String,
    /// Distance along the ray
    pub distance: f32,
}

/// Find the nearest object hit by the cursor ray
///
/// Only objects with a mesh take part. `None` when nothing is hit, the
/// viewport is empty, or a camera matrix cannot be inverted.
pub fn pick(scene: &Scene, request: &PickRequest) -> Option<PickHit> {
    let mut mouse = MouseState::new(request.viewport_width, request.viewport_height);
    mouse.update_position(request.cursor_x, request.cursor_y);

    let Some(ray) = mouse.world_ray(&request.projection, &request.view, request.origin) else {
        log::warn!(
            "Cannot build a pick ray (viewport {}x{}, or singular camera matrices)",
            request.viewport_width,
            request.viewport_height
        );
        return None;
    };

    let mut nearest: Option<(ObjectId, f32)> = None;
    for (id, object) in scene.objects() {
        if object.mesh().is_none() {
            continue;
        }
        if let Some(t) = ray.intersect_obb(object.obb()) {
            if nearest.map_or(true, |(_, best)| t < best) {
                nearest = Some((id, t));
            }
        }
    }

    nearest.and_then(|(id, distance)| {
        scene.object(id).map(|object| PickHit {
            object: id,
            name: object.name().to_string(),
            distance,
        })
    })
}

/// Replace the selection with the nearest hit, or clear it on a miss
pub fn pick_and_select(scene: &mut Scene, request: &PickRequest) -> Option<PickHit> {
    scene.clear_selection();
    let hit = pick(scene, request)?;
    scene.select(hit.object);
    log::debug!("Picked '{}' at distance {:.3}", hit.name, hit.distance);
    Some(hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ResourceLibrary;
    use crate::systems::refresh_bounds;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn camera_at(z: f32) -> Camera {
        let mut camera = Camera::default();
        camera.position = Vec3::new(0.0, 0.0, z);
        camera.set_aspect_ratio(1.0);
        camera
    }

    fn center_request(camera: &Camera) -> PickRequest {
        PickRequest::new(300.0, 300.0, (600, 600), camera)
    }

    #[test]
    fn nearest_hit_wins() {
        let mut scene = Scene::new(Arc::new(ResourceLibrary::with_builtin_primitives()));
        let far = scene.spawn_object("far", "cube", "", "");
        let near = scene.spawn_object("near", "cube", "", "");
        scene.object_mut(far).unwrap().transform.set_position(Vec3::new(0.0, 0.0, -10.0));
        scene.object_mut(near).unwrap().transform.set_position(Vec3::new(0.0, 0.0, -2.0));
        refresh_bounds(&mut scene);

        let hit = pick_and_select(&mut scene, &center_request(&camera_at(5.0))).unwrap();
        assert_eq!(hit.object, near);
        assert_eq!(hit.name, "near");
        assert_relative_eq!(hit.distance, 6.0, epsilon = 1e-4);
        assert_eq!(scene.selected(), Some(near));
    }

    #[test]
    fn unit_cube_hit_at_distance_four() {
        let mut scene = Scene::new(Arc::new(ResourceLibrary::with_builtin_primitives()));
        scene.spawn_object("cube", "cube", "", "");
        refresh_bounds(&mut scene);

        let hit = pick(&scene, &center_request(&camera_at(5.0))).unwrap();
        assert_relative_eq!(hit.distance, 4.0, epsilon = 1e-4);
    }

    #[test]
    fn miss_clears_selection() {
        let mut scene = Scene::new(Arc::new(ResourceLibrary::with_builtin_primitives()));
        let cube = scene.spawn_object("cube", "cube", "", "");
        refresh_bounds(&mut scene);
        scene.select(cube);

        let request = PickRequest::new(5.0, 5.0, (600, 600), &camera_at(5.0));
        assert!(pick_and_select(&mut scene, &request).is_none());
        assert_eq!(scene.selected(), None);
    }

    #[test]
    fn objects_behind_the_camera_are_ignored() {
        let mut scene = Scene::new(Arc::new(ResourceLibrary::with_builtin_primitives()));
        let cube = scene.spawn_object("behind", "cube", "", "");
        scene.object_mut(cube).unwrap().transform.set_position(Vec3::new(0.0, 0.0, 10.0));
        refresh_bounds(&mut scene);

        assert!(pick(&scene, &center_request(&camera_at(5.0))).is_none());
    }

    #[test]
    fn empty_scene_and_degenerate_viewport_pick_nothing() {
        let mut scene = Scene::new(Arc::new(ResourceLibrary::with_builtin_primitives()));
        assert!(pick(&scene, &center_request(&camera_at(5.0))).is_none());

        scene.spawn_object("cube", "cube", "", "");
        refresh_bounds(&mut scene);
        let request = PickRequest::new(0.0, 0.0, (0, 0), &camera_at(5.0));
        assert!(pick(&scene, &request).is_none());
    }

    #[test]
    fn meshless_objects_do_not_participate() {
        let mut scene = Scene::new(Arc::new(ResourceLibrary::with_builtin_primitives()));
        scene.spawn_object("ghost", "missing", "", "");
        refresh_bounds(&mut scene);
        assert!(pick(&scene, &center_request(&camera_at(5.0))).is_none());
    }
}
