//! Draw list construction
//!
//! The scene is walked depth-first from the roots and every object with a
//! mesh becomes one [`DrawCommand`] carrying its world matrix.

use crate::assets::{Mesh, ShaderProgram, Texture};
use crate::foundation::math::{Mat4, Vec2};
use crate::scene::{ObjectId, Scene};
use std::sync::Arc;

/// Everything a backend needs to draw one object
#[derive(Debug, Clone)]
pub struct DrawCommand {
    /// Source object
    pub object: ObjectId,
    /// Source object name
    pub name: String,
    /// World matrix
    pub model: Mat4,
    /// Geometry
    pub mesh: Arc<Mesh>,
    /// Shader program, if resolved
    pub shader: Option<Arc<ShaderProgram>>,
    /// Texture, if resolved
    pub texture: Option<Arc<Texture>>,
    /// UV multiplier
    pub texture_scale: Vec2,
}

/// Collect draw commands, parents before children
///
/// Objects without a mesh are skipped, but their children are still visited
/// with the composed world matrix.
pub fn collect_draw_commands(scene: &Scene) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(scene.object_count());
    let mut stack: Vec<(ObjectId, Mat4)> = scene.roots().iter().rev().map(|&id| (id, Mat4::identity())).collect();

    while let Some((id, parent_world)) = stack.pop() {
        let Some(object) = scene.object(id) else { continue };
        let world = parent_world * object.transform.model_matrix();

        if let Some(mesh) = object.mesh() {
            commands.push(DrawCommand {
                object: id,
                name: object.name().to_string(),
                model: world,
                mesh: Arc::clone(mesh),
                shader: object.shader.clone(),
                texture: object.texture.clone(),
                texture_scale: object.texture_scale,
            });
        }

        stack.extend(object.children().iter().rev().map(|&child| (child, world)));
    }

    commands
}
