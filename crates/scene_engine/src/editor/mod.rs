//! Editor runtime
//!
//! Mode switching between editing and playtesting, the commands the GUI
//! overlay issues, camera controls and the per-frame loop tying them to the
//! scene systems.

pub mod commands;
pub mod controller;
pub mod frame;
pub mod mode;

pub use commands::{EditorCommand, EditorError, NEW_OBJECT_MESH};
pub use controller::EditorController;
pub use frame::{FrameLoop, FrameReport};
pub use mode::{ActiveView, EditorMode, ModeController, PlaytestSession, Transition};
