//! Math utilities module
//!
//! Provides convenient re-exports from glam, the node pose and the small
//! vector helpers the solver needs.

mod geometry;
mod pose;

pub use geometry::{from_to_rotation, project_on_plane, rotate_towards, EPSILON};
pub use pose::Pose;

// Re-export commonly used glam types
pub use glam::{Quat, Vec3};
