//! Backend abstraction for the draw pass
//!
//! GPU upload, shader compilation and presentation live behind
//! [`RenderBackend`]. The editor hands it a camera once per frame and then
//! one [`DrawCommand`] per visible object.

use super::camera::Camera;
use super::draw::DrawCommand;
use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// The backend could not start or finish a frame
    #[error("Frame error: {0}")]
    Frame(String),

    /// A draw call was rejected
    #[error("Draw error for '{object}': {message}")]
    Draw {
        /// Object being drawn
        object: String,
        /// Backend message
        message: String,
    },
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Main rendering backend trait
pub trait RenderBackend {
    /// Start a frame viewed through `camera`
    fn begin_frame(&mut self, camera: &Camera) -> BackendResult<()>;

    /// Draw one object
    fn submit(&mut self, command: &DrawCommand, camera: &Camera) -> BackendResult<()>;

    /// Finish and present the frame
    fn end_frame(&mut self) -> BackendResult<()>;
}

/// Backend that draws nothing and counts what it was given
#[derive(Debug, Default, Clone)]
pub struct NullBackend {
    /// Frames completed
    pub frames: u64,
    /// Draw commands received over all frames
    pub submitted: u64,
    /// Object names submitted during the last frame
    pub last_frame: Vec<String>,
    in_frame: bool,
}

impl NullBackend {
    /// Create a counting backend
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for NullBackend {
    fn begin_frame(&mut self, _camera: &Camera) -> BackendResult<()> {
        if self.in_frame {
            return Err(RenderError::Frame("begin_frame called twice".to_string()));
        }
        self.in_frame = true;
        self.last_frame.clear();
        Ok(())
    }

    fn submit(&mut self, command: &DrawCommand, _camera: &Camera) -> BackendResult<()> {
        if !self.in_frame {
            return Err(RenderError::Draw {
                object: command.name.clone(),
                message: "submitted outside a frame".to_string(),
            });
        }
        self.submitted += 1;
        self.last_frame.push(command.name.clone());
        Ok(())
    }

    fn end_frame(&mut self) -> BackendResult<()> {
        if !self.in_frame {
            return Err(RenderError::Frame("end_frame without begin_frame".to_string()));
        }
        self.in_frame = false;
        self.frames += 1;
        Ok(())
    }
}
