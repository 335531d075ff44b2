//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the editor:
//! - Math types and operations
//! - Time management (frame timer and fixed timestep)
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
