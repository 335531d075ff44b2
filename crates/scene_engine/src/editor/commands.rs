//! Scene edits issued by the GUI overlay
//!
//! The overlay itself is outside this crate; it sends [`EditorCommand`]s
//! through the frame loop and they are applied to the editor scene between
//! input handling and the OBB refresh.

use crate::assets::DEFAULT_RESOURCE;
use crate::foundation::math::{Vec2, Vec3};
use crate::scene::{HierarchyError, ObjectId, Scene};
use thiserror::Error;

/// Mesh given to objects created with [`EditorCommand::NewObject`]
pub const NEW_OBJECT_MESH: &str = "cube";

/// Errors from applying an editor command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// The command acts on the selection but nothing is selected
    #[error("No object selected")]
    NoSelection,

    /// A command named an object that does not exist
    #[error("Unknown object '{0}'")]
    UnknownObject(String),

    /// Re-parenting was rejected
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

/// A single scene edit
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// Create a cube named `NewObj<count>` and select it
    NewObject,
    /// Delete the selected object
    DeleteSelected,
    /// Copy the selected object and select the copy
    DuplicateSelected,
    /// Rename the selected object (suffixed on collision)
    RenameSelected(String),
    /// Discard every object
    NewScene,
    /// Select an object by name
    SelectByName(String),
    /// Re-parent an object, keeping its world pose
    SetParent {
        /// Object to move
        child: String,
        /// New parent, or `None` for the root
        parent: Option<String>,
    },
    /// Swap the selected object's mesh
    SetMesh(String),
    /// Swap the selected object's shader program
    SetShader(String),
    /// Swap the selected object's texture
    SetTexture(String),
    /// Change the selected object's UV multiplier
    SetTextureScale(Vec2),
    /// Overwrite the selected object's local transform
    SetTransform {
        /// Local position
        position: Vec3,
        /// Euler XYZ rotation in degrees
        rotation: Vec3,
        /// Per-axis scale
        scale: Vec3,
    },
    /// Mark or unmark the selected object as the player
    SetPlayer(bool),
}

impl EditorCommand {
    /// Apply the command to `scene`
    ///
    /// Returns the object the command created or acted on, when there is one.
    pub fn apply(&self, scene: &mut Scene) -> Result<Option<ObjectId>, EditorError> {
        match self {
            Self::NewObject => {
                let name = scene.new_object_name();
                let id = scene.spawn_object(&name, NEW_OBJECT_MESH, DEFAULT_RESOURCE, DEFAULT_RESOURCE);
                scene.select(id);
                Ok(Some(id))
            }
            Self::DeleteSelected => {
                let id = selection(scene)?;
                scene.delete_object(id);
                Ok(None)
            }
            Self::DuplicateSelected => {
                let id = selection(scene)?;
                let copy = scene.duplicate_object(id).ok_or(EditorError::NoSelection)?;
                scene.select(copy);
                Ok(Some(copy))
            }
            Self::RenameSelected(name) => {
                let id = selection(scene)?;
                scene.rename_object(id, name);
                Ok(Some(id))
            }
            Self::NewScene => {
                scene.clear();
                Ok(None)
            }
            Self::SelectByName(name) => scene
                .select_by_name(name)
                .map(Some)
                .ok_or_else(|| EditorError::UnknownObject(name.clone())),
            Self::SetParent { child, parent } => {
                let id = lookup(scene, child)?;
                let parent = parent.as_deref().map(|name| lookup(scene, name)).transpose()?;
                scene.set_parent(id, parent)?;
                Ok(Some(id))
            }
            Self::SetMesh(mesh) => {
                let id = selection(scene)?;
                scene.set_mesh(id, mesh);
                Ok(Some(id))
            }
            Self::SetShader(shader) => {
                let id = selection(scene)?;
                scene.set_shader(id, shader);
                Ok(Some(id))
            }
            Self::SetTexture(texture) => {
                let id = selection(scene)?;
                scene.set_texture(id, texture);
                Ok(Some(id))
            }
            Self::SetTextureScale(scale) => {
                let id = selection(scene)?;
                if let Some(object) = scene.object_mut(id) {
                    object.texture_scale = *scale;
                }
                Ok(Some(id))
            }
            Self::SetTransform { position, rotation, scale } => {
                let id = selection(scene)?;
                if let Some(object) = scene.object_mut(id) {
                    object.transform.set_position(*position);
                    object.transform.set_rotation(*rotation);
                    object.transform.set_scale(*scale);
                }
                Ok(Some(id))
            }
            Self::SetPlayer(is_player) => {
                let id = selection(scene)?;
                if *is_player {
                    scene.set_player(id);
                } else if scene.object(id).is_some_and(|object| object.is_player()) {
                    scene.clear_player();
                }
                Ok(Some(id))
            }
        }
    }
}

fn selection(scene: &Scene) -> Result<ObjectId, EditorError> {
    scene.selected().ok_or(EditorError::NoSelection)
}

fn lookup(scene: &Scene, name: &str) -> Result<ObjectId, EditorError> {
    scene.find(name).ok_or_else(|| EditorError::UnknownObject(name.to_string()))
}
