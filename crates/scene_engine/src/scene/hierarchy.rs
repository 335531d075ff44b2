//! Hierarchy operations on [`Scene`]
//!
//! World matrices are composed on demand from the local transforms and are
//! never cached; re-parenting rewrites the local transform so the object's
//! world pose stays where it was.

use super::object::ObjectId;
use super::scene_graph::Scene;
use crate::foundation::math::Mat4;
use slotmap::SlotMap;
use std::collections::HashMap;
use thiserror::Error;

/// Hierarchy errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// The new parent is the object itself or one of its descendants
    #[error("Cannot parent '{child}' under '{parent}': it would create a cycle")]
    Cycle {
        /// Object being moved
        child: String,
        /// Rejected parent
        parent: String,
    },

    /// A handle no longer refers to a live object
    #[error("Object not found")]
    NotFound,

    /// The new parent's world matrix cannot be inverted
    #[error("World matrix of '{0}' is singular")]
    Singular(String),
}

impl Scene {
    /// World matrix: parent world · local model, up to the root
    pub fn world_matrix(&self, id: ObjectId) -> Option<Mat4> {
        let object = self.objects.get(id)?;
        let mut world = object.transform.model_matrix();
        let mut parent = object.parent;
        while let Some(p) = parent {
            let ancestor = self.objects.get(p)?;
            world = ancestor.transform.model_matrix() * world;
            parent = ancestor.parent;
        }
        Some(world)
    }

    /// Move `id` under `new_parent` (or to the roots) keeping its world pose
    ///
    /// The object is appended to the new parent's children and its local
    /// transform is rewritten as `inverse(parent world) · old world`.
    pub fn set_parent(&mut self, id: ObjectId, new_parent: Option<ObjectId>) -> Result<(), HierarchyError> {
        let old_world = self.world_matrix(id).ok_or(HierarchyError::NotFound)?;

        let new_local = match new_parent {
            Some(parent) => {
                if !self.objects.contains_key(parent) {
                    return Err(HierarchyError::NotFound);
                }
                if parent == id || self.is_descendant(id, parent) {
                    return Err(HierarchyError::Cycle {
                        child: self.objects[id].name.clone(),
                        parent: self.objects[parent].name.clone(),
                    });
                }
                let parent_world = self.world_matrix(parent).ok_or(HierarchyError::NotFound)?;
                let inverse = parent_world
                    .try_inverse()
                    .ok_or_else(|| HierarchyError::Singular(self.objects[parent].name.clone()))?;
                inverse * old_world
            }
            None => old_world,
        };

        self.detach(id);
        self.attach(id, new_parent);
        if let Some(object) = self.objects.get_mut(id) {
            object.transform.set_from_model_matrix(&new_local);
        }
        log::trace!(
            "Re-parented '{}' under {}",
            self.objects[id].name,
            new_parent.and_then(|p| self.objects.get(p)).map_or("<root>", |p| p.name.as_str())
        );
        Ok(())
    }

    /// Whether `target` is somewhere below `object`
    pub fn is_descendant(&self, object: ObjectId, target: ObjectId) -> bool {
        let Some(root) = self.objects.get(object) else { return false };
        let mut stack: Vec<ObjectId> = root.children.clone();
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if let Some(child) = self.objects.get(id) {
                stack.extend(child.children.iter().copied());
            }
        }
        false
    }

    /// Objects `id` may be parented under: everything but itself and its subtree
    pub fn valid_parent_candidates(&self, id: ObjectId) -> Vec<ObjectId> {
        self.ids()
            .into_iter()
            .filter(|&candidate| candidate != id && !self.is_descendant(id, candidate))
            .collect()
    }

    /// Independent copy with fresh handles
    ///
    /// Objects are copied first and their links are rewired through an
    /// old → new handle map afterwards. Resources stay shared.
    pub fn deep_clone(&self) -> Self {
        let mut clone = Self::new(self.resources().clone());
        let mut objects = SlotMap::with_key();
        let mut remap: HashMap<ObjectId, ObjectId> = HashMap::with_capacity(self.objects.len());

        for (old_id, object) in &self.objects {
            let new_id = objects.insert(object.detached_copy());
            remap.insert(old_id, new_id);
        }

        for (old_id, object) in &self.objects {
            let Some(&new_id) = remap.get(&old_id) else { continue };
            let copy: &mut super::SceneObject = &mut objects[new_id];
            copy.parent = object.parent.and_then(|p| remap.get(&p).copied());
            copy.children = object.children.iter().filter_map(|c| remap.get(c).copied()).collect();
        }

        clone.names = self
            .names
            .iter()
            .filter_map(|(name, id)| remap.get(id).map(|&new_id| (name.clone(), new_id)))
            .collect();
        clone.roots = self.roots.iter().filter_map(|r| remap.get(r).copied()).collect();
        clone.selected = self.selected.and_then(|s| remap.get(&s).copied());
        clone.objects = objects;
        clone
    }
}
