//! Per-frame systems operating on a [`Scene`](crate::scene::Scene)

pub mod bounds;
pub mod picking;

pub use bounds::refresh_bounds;
pub use picking::{pick, pick_and_select, PickHit, PickRequest};
