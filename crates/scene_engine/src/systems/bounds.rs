//! OBB refresh pass
//!
//! Runs once per frame, after input and before picking or drawing. It is the
//! only place that lowers a transform's dirty flag, and it does so after the
//! box has been recomputed.

use crate::foundation::math::Mat4;
use crate::scene::{ObjectId, Scene};

/// Recompute OBBs for every object whose world pose may have changed
///
/// An object is refreshed when its own transform is dirty or when any
/// ancestor's was, since its world matrix moves with them. Objects without a
/// mesh are marked clean and keep their OBB. Returns the number of objects
/// refreshed.
pub fn refresh_bounds(scene: &mut Scene) -> usize {
    let mut refreshed = 0;
    let mut stack: Vec<(ObjectId, Mat4, bool)> =
        scene.roots().iter().rev().map(|&id| (id, Mat4::identity(), false)).collect();

    while let Some((id, parent_world, ancestor_changed)) = stack.pop() {
        let Some(object) = scene.object_mut(id) else { continue };
        let world = parent_world * object.transform.model_matrix();
        let changed = ancestor_changed || object.transform.needs_update();

        if changed {
            object.update_obb(&world);
            object.transform.mark_clean();
            refreshed += 1;
        }

        stack.extend(object.children().iter().rev().map(|&child| (child, world, changed)));
    }

    if refreshed > 0 {
        log::trace!("Refreshed {} bounding boxes", refreshed);
    }
    refreshed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ResourceLibrary;
    use crate::foundation::math::{Mat3, Vec3};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn scene() -> Scene {
        Scene::new(Arc::new(ResourceLibrary::with_builtin_primitives()))
    }

    #[test]
    fn refresh_cleans_and_is_idempotent() {
        let mut scene = scene();
        let cube = scene.spawn_object("cube", "cube", "", "");
        scene.object_mut(cube).unwrap().transform.set_scale(Vec3::new(2.0, 1.0, 1.0));

        assert_eq!(refresh_bounds(&mut scene), 1);
        let object = scene.object(cube).unwrap();
        assert!(!object.transform.needs_update());
        assert_relative_eq!(object.obb().extents, Vec3::new(2.0, 1.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(object.obb().axes, Mat3::identity(), epsilon = 1e-6);

        let before = *object.obb();
        assert_eq!(refresh_bounds(&mut scene), 0);
        assert_eq!(*scene.object(cube).unwrap().obb(), before);
    }

    #[test]
    fn moving_a_parent_refreshes_children() {
        let mut scene = scene();
        let parent = scene.spawn_object("parent", "cube", "", "");
        let child = scene.spawn_object("child", "cube", "", "");
        scene.object_mut(child).unwrap().transform.set_position(Vec3::new(3.0, 0.0, 0.0));
        scene.set_parent(child, Some(parent)).unwrap();
        refresh_bounds(&mut scene);

        scene.object_mut(parent).unwrap().transform.set_position(Vec3::new(0.0, 10.0, 0.0));
        assert!(!scene.object(child).unwrap().transform.needs_update());
        assert_eq!(refresh_bounds(&mut scene), 2);
        assert_relative_eq!(scene.object(child).unwrap().obb().center, Vec3::new(3.0, 10.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn meshless_objects_are_cleaned_without_touching_obb() {
        let mut scene = scene();
        let empty = scene.spawn_object("empty", "missing", "", "");
        scene.object_mut(empty).unwrap().transform.set_position(Vec3::new(7.0, 0.0, 0.0));
        let before = *scene.object(empty).unwrap().obb();

        refresh_bounds(&mut scene);
        let object = scene.object(empty).unwrap();
        assert!(!object.transform.needs_update());
        assert_eq!(*object.obb(), before);
    }
}
