//! Resource discovery and lookup
//!
//! The library is built once at startup and shared (`Arc`) between the
//! editor scene and any playtest clone, so lookups never copy mesh data.

use super::mesh::Mesh;
use super::vert_loader::VertLoader;
use crate::core::config::AssetConfig;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the mesh, shader and texture the editor falls back to
pub const DEFAULT_RESOURCE: &str = "default";

/// Shader program source locations
///
/// Compilation belongs to the render backend; the editor only tracks names
/// and paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderProgram {
    /// Lookup name (directory name)
    pub name: String,
    /// Vertex stage source
    pub vertex_path: PathBuf,
    /// Fragment stage source
    pub fragment_path: PathBuf,
}

/// Texture image location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Lookup name (file stem)
    pub name: String,
    /// Image file
    pub path: PathBuf,
}

/// Named meshes, shaders and textures
#[derive(Debug, Default)]
pub struct ResourceLibrary {
    meshes: BTreeMap<String, Arc<Mesh>>,
    shaders: BTreeMap<String, Arc<ShaderProgram>>,
    textures: BTreeMap<String, Arc<Texture>>,
}

impl ResourceLibrary {
    /// Empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding only the built-in `cube` and `plane` meshes
    pub fn with_builtin_primitives() -> Self {
        let mut library = Self::new();
        library.add_builtin_primitives();
        library
    }

    /// Scan the configured asset directories
    ///
    /// A missing directory is logged and contributes nothing. Files found on
    /// disk replace built-in meshes with the same name.
    pub fn discover(config: &AssetConfig) -> Self {
        let mut library = Self::new();
        if config.builtin_primitives {
            library.add_builtin_primitives();
        }

        library.discover_meshes(&config.models_dir);
        library.discover_shaders(&config.shaders_dir);
        library.discover_textures(&config.textures_dir);

        log::info!(
            "Discovered {} meshes, {} shaders, {} textures",
            library.meshes.len(),
            library.shaders.len(),
            library.textures.len()
        );
        library
    }

    fn add_builtin_primitives(&mut self) {
        self.add_mesh(Mesh::cube("cube"));
        self.add_mesh(Mesh::plane("plane"));
    }

    fn discover_meshes(&mut self, dir: &Path) {
        for path in read_dir_entries(dir) {
            if path.extension().and_then(|ext| ext.to_str()) != Some("vert") {
                continue;
            }
            let Some(stem) = file_stem(&path) else { continue };
            match VertLoader::load(&path, &stem) {
                Ok(mut mesh) => {
                    mesh.name.clone_from(&stem);
                    self.add_mesh(mesh);
                }
                Err(e) => log::warn!("Skipping mesh {}: {}", path.display(), e),
            }
        }
    }

    fn discover_shaders(&mut self, dir: &Path) {
        for path in read_dir_entries(dir) {
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else { continue };
            let vertex_path = path.join("vertex.glsl");
            let fragment_path = path.join("fragment.glsl");
            if !vertex_path.is_file() || !fragment_path.is_file() {
                log::warn!("Shader directory {} lacks vertex.glsl or fragment.glsl", path.display());
                continue;
            }
            self.add_shader(ShaderProgram { name, vertex_path, fragment_path });
        }
    }

    fn discover_textures(&mut self, dir: &Path) {
        for path in read_dir_entries(dir) {
            if !path.is_file() {
                continue;
            }
            let Some(name) = file_stem(&path) else { continue };
            self.add_texture(Texture { name, path });
        }
    }

    /// Register a mesh under its own name
    pub fn add_mesh(&mut self, mesh: Mesh) -> Arc<Mesh> {
        let mesh = Arc::new(mesh);
        self.meshes.insert(mesh.name.clone(), Arc::clone(&mesh));
        mesh
    }

    /// Register a shader program under its own name
    pub fn add_shader(&mut self, shader: ShaderProgram) -> Arc<ShaderProgram> {
        let shader = Arc::new(shader);
        self.shaders.insert(shader.name.clone(), Arc::clone(&shader));
        shader
    }

    /// Register a texture under its own name
    pub fn add_texture(&mut self, texture: Texture) -> Arc<Texture> {
        let texture = Arc::new(texture);
        self.textures.insert(texture.name.clone(), Arc::clone(&texture));
        texture
    }

    /// Mesh by name
    pub fn mesh(&self, name: &str) -> Option<Arc<Mesh>> {
        self.meshes.get(name).cloned()
    }

    /// Shader program by name
    pub fn shader(&self, name: &str) -> Option<Arc<ShaderProgram>> {
        self.shaders.get(name).cloned()
    }

    /// Texture by name
    pub fn texture(&self, name: &str) -> Option<Arc<Texture>> {
        self.textures.get(name).cloned()
    }

    /// Sorted mesh names
    pub fn mesh_names(&self) -> Vec<&str> {
        self.meshes.keys().map(String::as_str).collect()
    }

    /// Sorted shader names
    pub fn shader_names(&self) -> Vec<&str> {
        self.shaders.keys().map(String::as_str).collect()
    }

    /// Sorted texture names
    pub fn texture_names(&self) -> Vec<&str> {
        self.textures.keys().map(String::as_str).collect()
    }
}

fn read_dir_entries(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            let mut paths: Vec<PathBuf> = entries.filter_map(Result::ok).map(|entry| entry.path()).collect();
            paths.sort();
            paths
        }
        Err(e) => {
            log::warn!("Asset directory {} unavailable: {}", dir.display(), e);
            Vec::new()
        }
    }
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().and_then(|stem| stem.to_str()).map(str::to_string)
}
