//! # Editor Configuration
//!
//! All tunables of the editor in one serializable tree. Defaults reproduce
//! the stock editor: an 800×600 window, a 45° camera three units back from
//! the origin, 60 Hz movement ticks and assets under `assets/`.
//!
//! ## Configuration Categories
//!
//! - **Window**: initial viewport size and title
//! - **Camera**: projection and starting pose of the editor camera
//! - **Controls**: movement speed, mouse-look sensitivity, FOV step
//! - **Assets**: where meshes, shaders and textures are discovered
//! - **Timing**: fixed tick length and stall clamp

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use crate::config::{Config, ConfigError};

/// Initial window/viewport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
    /// Window title
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Scene Editor".to_string(),
        }
    }
}

impl WindowConfig {
    /// Width divided by height
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Editor camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
    /// Starting position
    pub position: [f32; 3],
    /// Starting yaw in degrees (-90 looks down -Z)
    pub yaw: f32,
    /// Starting pitch in degrees
    pub pitch: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            position: [0.0, 0.0, 3.0],
            yaw: -90.0,
            pitch: 0.0,
        }
    }
}

/// Keyboard and mouse tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Distance moved per tick
    pub movement_speed: f32,
    /// Multiplier while the boost key is held
    pub boost_multiplier: f32,
    /// Degrees of rotation per pixel of mouse motion
    pub look_sensitivity: f32,
    /// Degrees of FOV change per tick while a zoom key is held
    pub fov_step: f32,
    /// Narrowest allowed FOV
    pub min_fov: f32,
    /// Widest allowed FOV
    pub max_fov: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            movement_speed: 0.1,
            boost_multiplier: 2.0,
            look_sensitivity: 0.1,
            fov_step: 0.1,
            min_fov: 20.0,
            max_fov: 135.0,
        }
    }
}

/// Asset directory settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// `.vert` meshes
    pub models_dir: PathBuf,
    /// One sub-directory per shader program
    pub shaders_dir: PathBuf,
    /// Texture images
    pub textures_dir: PathBuf,
    /// Register the built-in `cube` and `plane` meshes before scanning
    pub builtin_primitives: bool,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("assets/models"),
            shaders_dir: PathBuf::from("assets/shaders"),
            textures_dir: PathBuf::from("assets/textures"),
            builtin_primitives: true,
        }
    }
}

impl AssetConfig {
    /// Resolve all three directories under a common root
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        self.models_dir = root.join("models");
        self.shaders_dir = root.join("shaders");
        self.textures_dir = root.join("textures");
        self
    }
}

/// Frame timing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Logical tick length in seconds
    pub fixed_step: f64,
    /// Longest frame time fed to the accumulator
    pub max_frame_time: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fixed_step: crate::foundation::time::DEFAULT_TICK,
            max_frame_time: 0.25,
        }
    }
}

/// Top-level editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Camera settings
    pub camera: CameraConfig,
    /// Control settings
    pub controls: ControlsConfig,
    /// Asset settings
    pub assets: AssetConfig,
    /// Timing settings
    pub timing: TimingConfig,
    /// Default log filter (`RUST_LOG` overrides it)
    pub log_level: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
            assets: AssetConfig::default(),
            timing: TimingConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config for EditorConfig {}

impl EditorConfig {
    /// Set the viewport size
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    /// Set the asset directories
    pub fn with_assets(mut self, assets: AssetConfig) -> Self {
        self.assets = assets;
        self
    }

    /// Set the default log filter
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), String> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err("Window dimensions must be non-zero".to_string());
        }
        let camera = &self.camera;
        if camera.near <= 0.0 || camera.far <= camera.near {
            return Err(format!("Invalid clip range: near {} far {}", camera.near, camera.far));
        }
        let controls = &self.controls;
        if controls.min_fov <= 0.0 || controls.max_fov >= 180.0 || controls.min_fov >= controls.max_fov {
            return Err(format!("Invalid FOV range: {}..{}", controls.min_fov, controls.max_fov));
        }
        if camera.fov < controls.min_fov || camera.fov > controls.max_fov {
            return Err(format!("Camera FOV {} outside {}..{}", camera.fov, controls.min_fov, controls.max_fov));
        }
        if controls.movement_speed < 0.0 || controls.look_sensitivity < 0.0 {
            return Err("Movement speed and look sensitivity must not be negative".to_string());
        }
        if self.timing.fixed_step <= 0.0 {
            return Err("Fixed step must be positive".to_string());
        }
        if self.timing.max_frame_time < self.timing.fixed_step {
            return Err("Max frame time must cover at least one tick".to_string());
        }
        Ok(())
    }

    /// Load from file and validate
    pub fn load_validated(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(path)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}
