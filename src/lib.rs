//! # ik-rig
//!
//! Constrained FABRIK inverse kinematics for single-path chains living in a
//! scene-graph hierarchy.
//!
//! ## Features
//! - FABRIK (Forward And Backward Reaching Inverse Kinematics) solver with
//!   separate reachable and unreachable branches
//! - Per-joint cone constraints with a chain-wide fallback bend limit
//! - Pole target bias for plausible bends
//! - Scene access through the [`SceneGraph`] trait, with an arena
//!   implementation in [`Scene`]
//!
//! ## Example
//! ```rust
//! use ik_rig::{Chain, JointConstraint, Scene, SceneGraph};
//! use glam::Vec3;
//!
//! let mut scene = Scene::new();
//! let bones = scene
//!     .add_path("arm", &[Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0)], None)
//!     .unwrap();
//! scene
//!     .attach_constraint(bones[1], JointConstraint::new(Vec3::X, 90.0))
//!     .unwrap();
//!
//! let mut chain = Chain::builder(bones[0])
//!     .end_effector(bones[2])
//!     .target(Vec3::new(1.0, 1.0, 0.0))
//!     .tolerance(0.001)
//!     .max_iterations(10)
//!     .build()
//!     .unwrap();
//! chain.activate(&scene).unwrap();
//!
//! let result = chain.solve(&mut scene).unwrap();
//! println!("Converged: {}, iterations: {}", result.converged, result.iterations);
//! println!("Effector at {}", scene.world_position(bones[2]));
//! ```

pub mod error;
pub mod ik;
pub mod math;
pub mod scene;

pub use error::{ChainError, ConfigError, InvalidReason, SceneError};
pub use ik::{
    Anchor, Chain, ChainBuilder, ChainSettings, ChainState, ChainStatus, FabrikSolver,
    JointConstraint, SolveBranch, SolveResult, TickPhase,
};
pub use math::Pose;
pub use scene::{NodeId, Scene, SceneGraph};
