//! Scene container
//!
//! Objects live in a generation-checked arena; the hierarchy is expressed
//! with handles into that arena and a name index keeps names unique.

use super::object::{ObjectId, SceneObject};
use super::serialization::NO_PARENT;
use crate::assets::ResourceLibrary;
use slotmap::SlotMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Prefix used for objects created from the "New Object" command
pub const NEW_OBJECT_PREFIX: &str = "NewObj";

/// Name as it survives a save/load cycle of the scene text format
fn normalize_name(name: &str) -> String {
    let cleaned: String = name.chars().map(|c| if c.is_control() { ' ' } else { c }).collect();
    match cleaned.trim() {
        "" => NEW_OBJECT_PREFIX.to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// A named, hierarchical collection of objects plus the current selection
///
/// # Invariants
/// - Names are unique; the name index maps each name to exactly one live
///   object.
/// - `parent`/`children` links are symmetric and acyclic, and every handle
///   reachable from a child list or the root list is live.
/// - `selected` is either `None` or a live handle.
pub struct Scene {
    pub(super) objects: SlotMap<ObjectId, SceneObject>,
    pub(super) names: HashMap<String, ObjectId>,
    pub(super) roots: Vec<ObjectId>,
    pub(super) selected: Option<ObjectId>,
    resources: Arc<ResourceLibrary>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("objects", &self.objects.len())
            .field("roots", &self.roots.len())
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Empty scene resolving resource names against `resources`
    pub fn new(resources: Arc<ResourceLibrary>) -> Self {
        Self {
            objects: SlotMap::with_key(),
            names: HashMap::new(),
            roots: Vec::new(),
            selected: None,
            resources,
        }
    }

    /// Shared resource library
    pub fn resources(&self) -> &Arc<ResourceLibrary> {
        &self.resources
    }

    /// `base` if free, otherwise `base_1`, `base_2`, …
    ///
    /// `base` is normalized first: control characters become spaces, outer
    /// whitespace is trimmed and an empty result falls back to
    /// [`NEW_OBJECT_PREFIX`]. The scene file's no-parent marker is never
    /// handed out as-is.
    pub fn unique_name(&self, base: &str) -> String {
        let base = normalize_name(base);
        let taken = |candidate: &str| candidate == NO_PARENT || self.names.contains_key(candidate);
        if !taken(&base) {
            return base;
        }
        (1..)
            .map(|suffix| format!("{base}_{suffix}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or(base)
    }

    /// Insert `object` as a root, renaming it on collision
    ///
    /// Any hierarchy links the object carries are discarded.
    pub fn add_object(&mut self, name: &str, mut object: SceneObject) -> ObjectId {
        let name = self.unique_name(name);
        if name != object.name {
            log::trace!("Adding object '{}' (requested '{}')", name, object.name);
        }
        object.name.clone_from(&name);
        object.parent = None;
        object.children.clear();

        let id = self.objects.insert(object);
        self.names.insert(name, id);
        self.roots.push(id);
        id
    }

    /// Create an object from resource names and add it
    ///
    /// Names missing from the library leave the corresponding slot empty.
    pub fn spawn_object(&mut self, name: &str, mesh: &str, texture: &str, shader: &str) -> ObjectId {
        let object = SceneObject::new(name)
            .with_mesh(self.resources.mesh(mesh))
            .with_texture(self.resources.texture(texture))
            .with_shader(self.resources.shader(shader));
        if object.mesh.is_none() {
            log::warn!("Mesh '{}' not found for object '{}'", mesh, name);
        }
        self.add_object(name, object)
    }

    /// Object by handle
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Mutable object by handle
    ///
    /// Renaming and re-parenting go through the scene so the name index and
    /// the hierarchy stay consistent.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id)
    }

    /// Whether the handle refers to a live object
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Handle by name
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.names.get(name).copied()
    }

    /// All handles, parents before children, roots in insertion order
    pub fn ids(&self) -> Vec<ObjectId> {
        let mut ordered = Vec::with_capacity(self.objects.len());
        let mut stack: Vec<ObjectId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(object) = self.objects.get(id) {
                ordered.push(id);
                stack.extend(object.children.iter().rev().copied());
            }
        }
        ordered
    }

    /// All objects, parents before children
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.ids().into_iter().filter_map(move |id| self.objects.get(id).map(|object| (id, object)))
    }

    /// Object names in sorted order
    pub fn object_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene has no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Parentless objects in insertion order
    pub fn roots(&self) -> &[ObjectId] {
        &self.roots
    }

    /// Remove an object
    ///
    /// Its children move to its parent (or become roots) and keep their world
    /// pose. A selection pointing at the object is cleared.
    pub fn delete_object(&mut self, id: ObjectId) -> Option<SceneObject> {
        let (parent, children) = {
            let object = self.objects.get(id)?;
            (object.parent, object.children.clone())
        };

        for child in children {
            if let Err(e) = self.set_parent(child, parent) {
                log::warn!("Re-parenting child of deleted object failed ({}), promoting to root", e);
                if let Err(e) = self.set_parent(child, None) {
                    log::warn!("Promoting child to root failed: {}", e);
                }
            }
        }

        self.detach(id);
        if self.selected == Some(id) {
            self.selected = None;
        }

        let object = self.objects.remove(id)?;
        self.names.remove(&object.name);
        log::trace!("Deleted object '{}'", object.name);
        Some(object)
    }

    /// Rename an object, suffixing on collision; returns the final name
    pub fn rename_object(&mut self, id: ObjectId, new_name: &str) -> Option<String> {
        let old_name = self.objects.get(id)?.name.clone();
        if old_name == normalize_name(new_name) {
            return Some(old_name);
        }

        self.names.remove(&old_name);
        let final_name = self.unique_name(new_name);
        self.names.insert(final_name.clone(), id);
        if let Some(object) = self.objects.get_mut(id) {
            object.name.clone_from(&final_name);
        }
        log::trace!("Renamed '{}' to '{}'", old_name, final_name);
        Some(final_name)
    }

    /// Copy an object (without its children) next to the original
    ///
    /// The copy is named `<name>_copy`, then `<name>_copy1`, `<name>_copy2`, …
    /// and shares the original's parent and local transform.
    pub fn duplicate_object(&mut self, id: ObjectId) -> Option<ObjectId> {
        let source = self.objects.get(id)?;
        let parent = source.parent;
        let base = format!("{}_copy", source.name);
        let name = if self.names.contains_key(&base) {
            (1..)
                .map(|suffix| format!("{base}{suffix}"))
                .find(|candidate| !self.names.contains_key(candidate))
                .unwrap_or_else(|| base.clone())
        } else {
            base
        };

        let mut copy = source.detached_copy();
        copy.name.clone_from(&name);
        copy.transform.mark_dirty();

        let copy_id = self.objects.insert(copy);
        self.names.insert(name, copy_id);
        self.attach(copy_id, parent);
        Some(copy_id)
    }

    /// Select an object; returns false for stale handles
    pub fn select(&mut self, id: ObjectId) -> bool {
        if self.objects.contains_key(id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    /// Select by name; unknown names clear the selection
    pub fn select_by_name(&mut self, name: &str) -> Option<ObjectId> {
        self.selected = self.find(name);
        self.selected
    }

    /// Currently selected handle
    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Currently selected object
    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.selected.and_then(|id| self.objects.get(id))
    }

    /// Deselect
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Remove every object
    pub fn clear(&mut self) {
        self.objects.clear();
        self.names.clear();
        self.roots.clear();
        self.selected = None;
    }

    /// Make `id` the only player object
    pub fn set_player(&mut self, id: ObjectId) -> bool {
        if !self.objects.contains_key(id) {
            return false;
        }
        for (other, object) in &mut self.objects {
            object.is_player = other == id;
        }
        true
    }

    /// Remove the player flag from every object
    pub fn clear_player(&mut self) {
        for object in self.objects.values_mut() {
            object.is_player = false;
        }
    }

    /// First player object in hierarchy order
    pub fn player(&self) -> Option<ObjectId> {
        self.objects().find(|(_, object)| object.is_player).map(|(id, _)| id)
    }

    /// Swap an object's mesh by name and reset its OBB
    ///
    /// An unknown name leaves the object without a mesh.
    pub fn set_mesh(&mut self, id: ObjectId, mesh: &str) -> bool {
        let mesh = self.resources.mesh(mesh);
        let Some(object) = self.objects.get_mut(id) else { return false };
        object.replace_mesh(mesh);
        true
    }

    /// Swap an object's shader program by name
    pub fn set_shader(&mut self, id: ObjectId, shader: &str) -> bool {
        let shader = self.resources.shader(shader);
        let Some(object) = self.objects.get_mut(id) else { return false };
        object.shader = shader;
        true
    }

    /// Swap an object's texture by name
    pub fn set_texture(&mut self, id: ObjectId, texture: &str) -> bool {
        let texture = self.resources.texture(texture);
        let Some(object) = self.objects.get_mut(id) else { return false };
        object.texture = texture;
        true
    }

    /// Name for the next "New Object": `NewObj<count>`
    pub fn new_object_name(&self) -> String {
        format!("{NEW_OBJECT_PREFIX}{}", self.objects.len())
    }

    /// Append `child` to `parent`'s children, or to the roots
    pub(super) fn attach(&mut self, child: ObjectId, parent: Option<ObjectId>) {
        let parent = parent.filter(|p| self.objects.contains_key(*p));
        if let Some(object) = self.objects.get_mut(child) {
            object.parent = parent;
        }
        match parent {
            Some(p) => {
                if let Some(parent_object) = self.objects.get_mut(p) {
                    parent_object.children.push(child);
                }
            }
            None => self.roots.push(child),
        }
    }

    /// Unlink `child` from its parent's children (or the roots)
    pub(super) fn detach(&mut self, child: ObjectId) {
        let parent = self.objects.get_mut(child).and_then(|object| object.parent.take());
        match parent {
            Some(p) => {
                if let Some(parent_object) = self.objects.get_mut(p) {
                    parent_object.children.retain(|&c| c != child);
                }
            }
            None => self.roots.retain(|&r| r != child),
        }
    }
}
