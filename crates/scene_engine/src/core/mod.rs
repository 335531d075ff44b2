//! # Core Editor Module
//!
//! Shared configuration types used by every subsystem.

pub mod config;

pub use config::{
    AssetConfig,
    CameraConfig,
    Config,
    ConfigError,
    ControlsConfig,
    EditorConfig,
    TimingConfig,
    WindowConfig,
};
