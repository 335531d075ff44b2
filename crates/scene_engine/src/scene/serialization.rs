//! Scene text format
//!
//! ```text
//! object <name>
//! mesh <name>
//! shader <name>
//! texture <name>
//! texturescale <x> <y>
//! position <x> <y> <z>
//! rotation <x> <y> <z>
//! scale <x> <y> <z>
//! isPlayer <0|1>
//! parent <name|None>
//! endobject
//! ```
//!
//! Transforms are stored local to the parent. Parent names may refer
//! forward, so loading materializes every object before wiring links.
//! Unknown or malformed lines are skipped; an unresolved parent leaves the
//! object at the root.

use super::object::{ObjectId, SceneObject};
use super::scene_graph::Scene;
use super::transform::Transform;
use crate::assets::ResourceLibrary;
use crate::foundation::math::{Vec2, Vec3};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Keyword marking a root in `parent` lines
pub const NO_PARENT: &str = "None";

/// Scene file errors
#[derive(Error, Debug)]
pub enum SceneFileError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The block structure is broken
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
}

/// One `object` block
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDescription {
    /// Object name as written
    pub name: String,
    /// Mesh name
    pub mesh: Option<String>,
    /// Shader program name
    pub shader: Option<String>,
    /// Texture name
    pub texture: Option<String>,
    /// UV multiplier
    pub texture_scale: Vec2,
    /// Local position
    pub position: Vec3,
    /// Local rotation, Euler degrees
    pub rotation: Vec3,
    /// Local scale
    pub scale: Vec3,
    /// Player flag
    pub is_player: bool,
    /// Parent name, `None` for roots
    pub parent: Option<String>,
}

impl ObjectDescription {
    /// Block with default values
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mesh: None,
            shader: None,
            texture: None,
            texture_scale: Vec2::new(1.0, 1.0),
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            is_player: false,
            parent: None,
        }
    }
}

/// Parsed scene file, independent of any resource library
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDescription {
    /// Blocks in file order
    pub objects: Vec<ObjectDescription>,
}

impl SceneDescription {
    /// Build a scene, resolving resource names against `resources`
    pub fn instantiate(&self, resources: Arc<ResourceLibrary>) -> Scene {
        let mut scene = Scene::new(resources);
        let mut by_file_name: HashMap<&str, ObjectId> = HashMap::with_capacity(self.objects.len());
        let mut created = Vec::with_capacity(self.objects.len());

        for description in &self.objects {
            let resources = scene.resources();
            let mesh = description.mesh.as_deref().and_then(|name| resources.mesh(name));
            if let (Some(name), None) = (&description.mesh, &mesh) {
                log::warn!("Object '{}' references unknown mesh '{}'", description.name, name);
            }
            let mut object = SceneObject::new(description.name.as_str())
                .with_mesh(mesh)
                .with_shader(description.shader.as_deref().and_then(|name| resources.shader(name)))
                .with_texture(description.texture.as_deref().and_then(|name| resources.texture(name)))
                .with_transform(Transform::from_parts(description.position, description.rotation, description.scale));
            object.texture_scale = description.texture_scale;
            object.is_player = description.is_player;

            let id = scene.add_object(&description.name, object);
            by_file_name.entry(description.name.as_str()).or_insert(id);
            created.push(id);
        }

        for (description, &id) in self.objects.iter().zip(&created) {
            let Some(parent_name) = description.parent.as_deref() else { continue };
            match by_file_name.get(parent_name) {
                Some(&parent) if parent != id && !scene.is_descendant(id, parent) => {
                    scene.detach(id);
                    scene.attach(id, Some(parent));
                }
                Some(_) => log::warn!("Ignoring cyclic parent '{}' of '{}'", parent_name, description.name),
                None => log::debug!("Parent '{}' of '{}' not in file, keeping it at the root", parent_name, description.name),
            }
        }

        scene
    }

    /// Snapshot a scene, parents before children
    pub fn from_scene(scene: &Scene) -> Self {
        let objects = scene
            .objects()
            .map(|(_, object)| ObjectDescription {
                name: object.name().to_string(),
                mesh: object.mesh().map(|mesh| mesh.name.clone()),
                shader: object.shader.as_ref().map(|shader| shader.name.clone()),
                texture: object.texture.as_ref().map(|texture| texture.name.clone()),
                texture_scale: object.texture_scale,
                position: object.transform.position(),
                rotation: object.transform.rotation(),
                scale: object.transform.scale(),
                is_player: object.is_player(),
                parent: object
                    .parent()
                    .and_then(|parent| scene.object(parent))
                    .map(|parent| parent.name().to_string()),
            })
            .collect();
        Self { objects }
    }
}

/// Parse scene text
///
/// Fails only when the block structure is broken: an `object` line inside
/// an open block, or a block left open at end of input.
pub fn parse_scene_text(text: &str) -> Result<SceneDescription, SceneFileError> {
    let mut description = SceneDescription::default();
    let mut current: Option<(usize, ObjectDescription)> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let (keyword, rest) = line.split_once(char::is_whitespace).map_or((line, ""), |(k, r)| (k, r.trim()));

        match keyword {
            "object" => {
                if let Some((opened, _)) = &current {
                    return Err(SceneFileError::Parse {
                        line: line_number,
                        message: format!("'object' before 'endobject' of block opened on line {opened}"),
                    });
                }
                current = Some((line_number, ObjectDescription::new(rest)));
            }
            "endobject" => match current.take() {
                Some((_, object)) => description.objects.push(object),
                None => log::debug!("Line {}: stray 'endobject'", line_number),
            },
            _ => match current.as_mut() {
                Some((_, object)) => apply_key(object, keyword, rest, line_number),
                None => log::debug!("Line {}: '{}' outside an object block", line_number, keyword),
            },
        }
    }

    if let Some((opened, object)) = current {
        return Err(SceneFileError::Parse {
            line: opened,
            message: format!("object '{}' is missing 'endobject'", object.name),
        });
    }
    Ok(description)
}

fn apply_key(object: &mut ObjectDescription, keyword: &str, rest: &str, line_number: usize) {
    let applied = match keyword {
        "mesh" => set_name(&mut object.mesh, rest),
        "shader" => set_name(&mut object.shader, rest),
        "texture" => set_name(&mut object.texture, rest),
        "texturescale" => set_value(&mut object.texture_scale, parse_floats::<2>(rest).map(|[x, y]| Vec2::new(x, y))),
        "position" => set_value(&mut object.position, parse_vec3(rest)),
        "rotation" => set_value(&mut object.rotation, parse_vec3(rest)),
        "scale" => set_value(&mut object.scale, parse_vec3(rest)),
        "isPlayer" => set_value(&mut object.is_player, rest.parse::<i32>().ok().map(|flag| flag != 0)),
        "parent" => {
            object.parent = (rest != NO_PARENT && !rest.is_empty()).then(|| rest.to_string());
            true
        }
        _ => false,
    };
    if !applied {
        log::debug!("Line {}: skipping '{} {}'", line_number, keyword, rest);
    }
}

fn set_value<T>(slot: &mut T, value: Option<T>) -> bool {
    let Some(value) = value else { return false };
    *slot = value;
    true
}

fn set_name(slot: &mut Option<String>, value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    *slot = Some(value.to_string());
    true
}

fn parse_vec3(rest: &str) -> Option<Vec3> {
    parse_floats::<3>(rest).map(|[x, y, z]| Vec3::new(x, y, z))
}

fn parse_floats<const N: usize>(rest: &str) -> Option<[f32; N]> {
    let mut values = [0.0; N];
    let mut tokens = rest.split_whitespace();
    for value in &mut values {
        *value = tokens.next()?.parse().ok()?;
    }
    Some(values)
}

/// Render a scene as text, parents before children
pub fn write_scene_text(scene: &Scene) -> String {
    let mut out = String::new();
    for object in SceneDescription::from_scene(scene).objects {
        // Writing into a String cannot fail.
        let _ = write_object(&mut out, &object);
    }
    out
}

fn write_object(out: &mut String, object: &ObjectDescription) -> std::fmt::Result {
    writeln!(out, "object {}", object.name)?;
    if let Some(mesh) = &object.mesh {
        writeln!(out, "mesh {mesh}")?;
    }
    if let Some(shader) = &object.shader {
        writeln!(out, "shader {shader}")?;
    }
    if let Some(texture) = &object.texture {
        writeln!(out, "texture {texture}")?;
    }
    writeln!(out, "texturescale {} {}", object.texture_scale.x, object.texture_scale.y)?;
    writeln!(out, "position {} {} {}", object.position.x, object.position.y, object.position.z)?;
    writeln!(out, "rotation {} {} {}", object.rotation.x, object.rotation.y, object.rotation.z)?;
    writeln!(out, "scale {} {} {}", object.scale.x, object.scale.y, object.scale.z)?;
    writeln!(out, "isPlayer {}", u8::from(object.is_player))?;
    writeln!(out, "parent {}", object.parent.as_deref().unwrap_or(NO_PARENT))?;
    writeln!(out, "endobject")
}

/// Load a scene file
pub fn load_scene(path: impl AsRef<Path>, resources: Arc<ResourceLibrary>) -> Result<Scene, SceneFileError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let scene = parse_scene_text(&text)?.instantiate(resources);
    log::info!("Loaded scene {} ({} objects)", path.display(), scene.object_count());
    Ok(scene)
}

/// Save a scene file
pub fn save_scene(scene: &Scene, path: impl AsRef<Path>) -> Result<(), SceneFileError> {
    let path = path.as_ref();
    std::fs::write(path, write_scene_text(scene))?;
    log::info!("Saved scene {} ({} objects)", path.display(), scene.object_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn resources() -> Arc<ResourceLibrary> {
        Arc::new(ResourceLibrary::with_builtin_primitives())
    }

    #[test]
    fn forward_parent_references_resolve() {
        let text = "\
object child
mesh cube
position 1 2 3
parent root
endobject
object root
mesh plane
scale 2 2 2
parent None
endobject
";
        let scene = parse_scene_text(text).unwrap().instantiate(resources());
        let child = scene.find("child").unwrap();
        let root = scene.find("root").unwrap();

        assert_eq!(scene.object(child).unwrap().parent(), Some(root));
        assert_eq!(scene.roots(), &[root]);
        assert_relative_eq!(scene.object(child).unwrap().transform.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(
            crate::foundation::math::Mat4Ext::translation_part(&scene.world_matrix(child).unwrap()),
            Vec3::new(2.0, 4.0, 6.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn unknown_lines_and_parents_are_tolerated() {
        let text = "\
# comment
object lonely
colour red
position 1 two 3
isPlayer 1
parent ghost
endobject
";
        let description = parse_scene_text(text).unwrap();
        assert_eq!(description.objects.len(), 1);
        let object = &description.objects[0];
        assert!(object.is_player);
        assert_eq!(object.position, Vec3::zeros());

        let scene = description.instantiate(resources());
        let id = scene.find("lonely").unwrap();
        assert_eq!(scene.object(id).unwrap().parent(), None);
        assert_eq!(scene.player(), Some(id));
    }

    #[test]
    fn unterminated_block_is_an_error() {
        let result = parse_scene_text("object a\nmesh cube\n");
        assert!(matches!(result, Err(SceneFileError::Parse { line: 1, .. })));

        let result = parse_scene_text("object a\nobject b\nendobject\n");
        assert!(matches!(result, Err(SceneFileError::Parse { line: 2, .. })));
    }

    #[test]
    fn written_text_parses_back() {
        let mut scene = Scene::new(resources());
        let parent = scene.spawn_object("parent", "cube", "", "");
        let child = scene.spawn_object("child", "plane", "", "");
        {
            let object = scene.object_mut(parent).unwrap();
            object.transform.set_position(Vec3::new(0.1, -2.5, 1e-3));
            object.transform.set_rotation(Vec3::new(12.5, 33.333, -7.0));
            object.texture_scale = Vec2::new(4.0, 0.25);
        }
        scene.set_parent(child, Some(parent)).unwrap();
        scene.set_player(child);

        let text = write_scene_text(&scene);
        assert!(text.starts_with("object parent\n"));
        let description = parse_scene_text(&text).unwrap();
        assert_eq!(description, SceneDescription::from_scene(&scene));
    }

    #[test]
    fn awkward_names_survive_a_round_trip() {
        let mut scene = Scene::new(resources());
        let child = scene.spawn_object("child", "cube", "", "");
        for requested in ["None", "", " padded "] {
            let parent = scene.spawn_object("parent", "cube", "", "");
            let name = scene.rename_object(parent, requested).unwrap();
            scene.set_parent(child, Some(parent)).unwrap();

            let reloaded = parse_scene_text(&write_scene_text(&scene)).unwrap().instantiate(resources());
            assert_eq!(reloaded.object_names(), scene.object_names());
            let reloaded_child = reloaded.find("child").unwrap();
            assert_eq!(reloaded.object(reloaded_child).unwrap().parent(), reloaded.find(&name));
            assert!(reloaded.find(&name).is_some());

            scene.set_parent(child, None).unwrap();
            scene.delete_object(parent);
        }
    }
}
