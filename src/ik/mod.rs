//! Inverse Kinematics module
//!
//! This module contains the chain lifecycle, joint cone constraints and the
//! constrained FABRIK solver.

pub mod chain;
pub mod constraint;
pub mod joint;
pub mod settings;
pub mod solver;
pub mod validate;

pub use chain::{Anchor, Chain, ChainBuilder, ChainStatus};
pub use constraint::{clamp_direction, JointConstraint};
pub use joint::{ChainState, JointRecord};
pub use settings::{ChainSettings, TickPhase};
pub use solver::{FabrikSolver, SolveBranch, SolveResult, Traversal};
pub use validate::{validate, Validation};
