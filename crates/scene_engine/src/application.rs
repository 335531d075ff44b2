//! Application events and top-level errors
//!
//! A windowing layer translates its native callbacks into [`AppEvent`]s and
//! queues them on the frame loop; nothing in this crate talks to a window
//! system directly.

use crate::config::ConfigError;
use crate::editor::{EditorCommand, EditorError, EditorMode};
use crate::input::{KeyCode, Modifiers, MouseButton};
use crate::render::RenderError;
use crate::scene::SceneFileError;
use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded or failed validation
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Scene file could not be read or written
    #[error("Scene file error: {0}")]
    SceneFile(#[from] SceneFileError),

    /// An editor command failed
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    /// The render backend failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}

/// Application events
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Window was resized
    WindowResized {
        /// New window width
        width: u32,
        /// New window height
        height: u32,
    },

    /// Window close requested
    WindowCloseRequested,

    /// Key was pressed
    KeyPressed(KeyCode),

    /// Key was released
    KeyReleased(KeyCode),

    /// Modifier key state changed
    ModifiersChanged(Modifiers),

    /// Mouse button event
    MouseButton {
        /// The mouse button that was pressed/released
        button: MouseButton,
        /// Whether the button was pressed (true) or released (false)
        pressed: bool,
    },

    /// Mouse movement
    MouseMoved {
        /// New X coordinate
        x: f64,
        /// New Y coordinate
        y: f64,
    },

    /// The GUI overlay started or stopped wanting input
    GuiCapture {
        /// Overlay wants the mouse
        mouse: bool,
        /// Overlay wants the keyboard
        keyboard: bool,
    },

    /// An edit issued by the GUI overlay
    Command(EditorCommand),

    /// Switch between editing and playtesting
    RequestMode(EditorMode),
}
