//! Scene graph
//!
//! ## Architecture
//!
//! ```text
//! Transform (local TRS + dirty flag)
//!      ↓
//! SceneObject (name, resources, OBB, parent/children handles)
//!      ↓
//! Scene (arena + name index + selection)
//! ```
//!
//! Hierarchy operations and the text format are implemented as separate
//! modules on top of [`Scene`].

mod hierarchy;
mod obb;
mod object;
mod scene_graph;
mod serialization;
mod transform;

pub use hierarchy::HierarchyError;
pub use obb::OrientedBoundingBox;
pub use object::{ObjectId, SceneObject};
pub use scene_graph::{Scene, NEW_OBJECT_PREFIX};
pub use serialization::{
    load_scene, parse_scene_text, save_scene, write_scene_text, ObjectDescription, SceneDescription,
    SceneFileError, NO_PARENT,
};
pub use transform::Transform;
