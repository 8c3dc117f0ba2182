//! Error types for ik-rig.

use thiserror::Error;

use crate::scene::NodeId;

/// Top-level error type for chain lifecycle operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainError {
    #[error("invalid kinematic chain: {}", format_reasons(.0))]
    Invalid(Vec<InvalidReason>),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Structural reason a chain failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum InvalidReason {
    #[error("missing root")]
    MissingRoot,

    #[error("missing end effector")]
    MissingEndEffector,

    #[error("end effector is not a descendant of the root")]
    EndEffectorNotDescendant,
}

/// Rejected chain settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid tolerance: {0} (must be finite and >= 0)")]
    InvalidTolerance(f32),

    #[error("max_iterations must be > 0")]
    ZeroIterations,

    #[error("invalid bend angle: {0} degrees (must be within [0, 180])")]
    InvalidBendAngle(f32),
}

/// Scene arena errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("reparenting {node} under {parent} would create a cycle")]
    Cycle { node: NodeId, parent: NodeId },
}

fn format_reasons(reasons: &[InvalidReason]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
