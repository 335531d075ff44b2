//! # Scene Engine
//!
//! Core of an interactive 3D scene editor: a hierarchical scene of named
//! objects, ray-cast picking against oriented bounding boxes, an
//! editor ↔ playtest mode switch and a plain-text scene format.
//!
//! ## Features
//!
//! - **Scene graph**: generation-checked handles, unique names, world-pose
//!   preserving re-parenting and cycle rejection
//! - **Picking**: cursor → NDC → world ray → slab test against each OBB
//! - **Playtest**: deep copy of the scene viewed from the player object
//! - **Scene files**: line-oriented text format, tolerant of unknown keys
//! - **Headless rendering front end**: draw lists handed to a pluggable
//!   [`RenderBackend`](render::RenderBackend)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let config = EditorConfig::default();
//! let resources = Arc::new(ResourceLibrary::with_builtin_primitives());
//! let mut scene = Scene::new(resources);
//! scene.spawn_object("cube", "cube", "", "");
//!
//! let mut frames = FrameLoop::new(&config, scene, NullBackend::new());
//! frames.push_event(AppEvent::RequestMode(EditorMode::Playtest));
//! while frames.is_running() {
//!     let report = frames.run_frame(Duration::from_millis(16))?;
//!     if report.mode == EditorMode::Playtest {
//!         frames.push_event(AppEvent::WindowCloseRequested);
//!     }
//! }
//! # Ok::<(), scene_engine::AppError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;

pub mod foundation;
pub mod assets;
pub mod scene;
pub mod spatial;
pub mod input;
pub mod render;
pub mod systems;
pub mod editor;

mod application;

pub use application::{AppError, AppEvent};

/// Common imports for editor hosts
pub mod prelude {
    pub use crate::{
        AppError, AppEvent,
        assets::{Mesh, ResourceLibrary, VertLoader},
        core::config::{Config, EditorConfig},
        editor::{EditorCommand, EditorController, EditorMode, FrameLoop, FrameReport, ModeController},
        foundation::{
            math::{Mat4, Vec2, Vec3},
            time::{FixedTimestep, Timer},
        },
        input::{InputState, KeyCode, Modifiers, MouseButton},
        render::{Camera, NullBackend, RenderBackend},
        scene::{load_scene, save_scene, HierarchyError, ObjectId, Scene, SceneObject, Transform},
        systems::{pick, pick_and_select, refresh_bounds, PickRequest},
    };
}
