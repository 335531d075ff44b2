//! Spatial queries
//!
//! Ray casting against the oriented bounding boxes maintained by the scene.

mod ray;

pub use ray::{Ray, PARALLEL_EPSILON};
