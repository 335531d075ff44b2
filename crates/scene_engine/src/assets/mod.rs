//! Asset management system
//!
//! Meshes are parsed on the CPU; shaders and textures are tracked by name and
//! path so a render backend can pick them up.

pub mod mesh;
pub mod vert_loader;
pub mod library;

pub use mesh::{Mesh, Vertex};
pub use vert_loader::VertLoader;
pub use library::{ResourceLibrary, ShaderProgram, Texture, DEFAULT_RESOURCE};

use thiserror::Error;

/// Asset errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// A file could not be read
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Offending file
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}
