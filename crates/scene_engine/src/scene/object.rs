//! Scene objects

use super::obb::OrientedBoundingBox;
use super::transform::Transform;
use crate::assets::{Mesh, ShaderProgram, Texture};
use crate::foundation::math::{Mat4, Vec2};
use std::sync::Arc;

slotmap::new_key_type! {
    /// Generation-checked handle to an object in a [`Scene`](super::Scene)
    pub struct ObjectId;
}

/// A placed, named node of the scene graph
///
/// Resources are shared handles into the scene's resource library; any of
/// them may be absent, in which case the object is not drawn (no mesh) or is
/// drawn with the backend's fallback.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub(crate) name: String,
    /// Local transform
    pub transform: Transform,
    pub(crate) obb: OrientedBoundingBox,
    pub(crate) mesh: Option<Arc<Mesh>>,
    /// Shader program used to draw this object
    pub shader: Option<Arc<ShaderProgram>>,
    /// Diffuse texture
    pub texture: Option<Arc<Texture>>,
    /// UV multiplier
    pub texture_scale: Vec2,
    pub(crate) is_player: bool,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) children: Vec<ObjectId>,
}

impl SceneObject {
    /// Detached object with an identity transform and no resources
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::new(),
            obb: OrientedBoundingBox::default(),
            mesh: None,
            shader: None,
            texture: None,
            texture_scale: Vec2::new(1.0, 1.0),
            is_player: false,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Attach a mesh and size the OBB to it
    pub fn with_mesh(mut self, mesh: Option<Arc<Mesh>>) -> Self {
        self.replace_mesh(mesh);
        self
    }

    /// Attach a shader program
    pub fn with_shader(mut self, shader: Option<Arc<ShaderProgram>>) -> Self {
        self.shader = shader;
        self
    }

    /// Attach a texture
    pub fn with_texture(mut self, texture: Option<Arc<Texture>>) -> Self {
        self.texture = texture;
        self
    }

    /// Replace the local transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Unique name within the owning scene
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current world-space bounding box
    pub fn obb(&self) -> &OrientedBoundingBox {
        &self.obb
    }

    /// Attached mesh, if any
    pub fn mesh(&self) -> Option<&Arc<Mesh>> {
        self.mesh.as_ref()
    }

    /// Whether playtest mode spawns the camera here
    pub fn is_player(&self) -> bool {
        self.is_player
    }

    /// Parent handle (`None` for roots)
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Child handles in insertion order
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    /// Copy of every value field with no hierarchy links
    pub fn detached_copy(&self) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            ..self.clone()
        }
    }

    /// Swap the mesh and reset the OBB to the new mesh's local bounds
    pub(crate) fn replace_mesh(&mut self, mesh: Option<Arc<Mesh>>) {
        if let Some(mesh) = &mesh {
            self.initialize_obb(mesh.as_ref());
        }
        self.mesh = mesh;
        self.transform.mark_dirty();
    }

    /// Reset the OBB from mesh bounds (axis-aligned, untransformed)
    pub fn initialize_obb(&mut self, mesh: &Mesh) {
        self.obb = OrientedBoundingBox::from_bounds(mesh.min_bounds, mesh.max_bounds);
    }

    /// Place the mesh bounds with `world`; no-op without a mesh
    pub fn update_obb(&mut self, world: &Mat4) {
        if let Some(mesh) = &self.mesh {
            self.obb.update_from_world(mesh.min_bounds, mesh.max_bounds, world);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn mesh_sizes_obb() {
        let object = SceneObject::new("cube").with_mesh(Some(Arc::new(Mesh::cube("cube"))));
        assert_relative_eq!(object.obb().extents, Vec3::new(1.0, 1.0, 1.0));
        assert!(object.transform.needs_update());
    }

    #[test]
    fn replacing_mesh_resets_obb_to_new_bounds() {
        let mut object = SceneObject::new("cube").with_mesh(Some(Arc::new(Mesh::cube("cube"))));
        object.transform.mark_clean();
        object.replace_mesh(Some(Arc::new(Mesh::plane("plane"))));
        assert_eq!(object.mesh().map(|mesh| mesh.name.as_str()), Some("plane"));
        assert_relative_eq!(object.obb().extents, Vec3::new(1.0, 0.0, 1.0));
        assert!(object.transform.needs_update());
    }

    #[test]
    fn update_obb_without_mesh_is_noop() {
        let mut object = SceneObject::new("empty");
        let before = *object.obb();
        object.update_obb(&Mat4::new_scaling(5.0));
        assert_eq!(*object.obb(), before);
    }

    #[test]
    fn detached_copy_drops_links() {
        let mut object = SceneObject::new("child");
        object.parent = Some(ObjectId::default());
        object.children.push(ObjectId::default());
        let copy = object.detached_copy();
        assert_eq!(copy.name(), "child");
        assert!(copy.parent().is_none());
        assert!(copy.children().is_empty());
    }
}
