//! Scene-graph collaborator
//!
//! The solver talks to the host hierarchy through [`SceneGraph`]; [`Scene`] is
//! a self-contained arena implementation used by the demo and the tests.

mod arena;
mod graph;

pub use arena::Scene;
pub use graph::{NodeId, SceneGraph};
