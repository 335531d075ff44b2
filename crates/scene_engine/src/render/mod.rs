//! Rendering front end
//!
//! Camera math and the CPU-side draw list. Actual drawing is delegated to a
//! [`RenderBackend`] implementation supplied by the host application.

pub mod backend;
pub mod camera;
pub mod draw;

pub use backend::{BackendResult, NullBackend, RenderBackend, RenderError};
pub use camera::{Camera, PITCH_LIMIT};
pub use draw::{collect_draw_commands, DrawCommand};
