use std::fmt;

use crate::ik::JointConstraint;
use glam::{Quat, Vec3};

/// Stable handle of a node in a scene arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Host scene-graph as seen by the solver.
///
/// Accessors other than [`SceneGraph::contains`] may assume the id is known;
/// the chain lifecycle only hands out ids it has validated.
pub trait SceneGraph {
    fn contains(&self, node: NodeId) -> bool;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn children(&self, node: NodeId) -> &[NodeId];

    fn world_position(&self, node: NodeId) -> Vec3;

    fn set_world_position(&mut self, node: NodeId, position: Vec3);

    fn world_rotation(&self, node: NodeId) -> Quat;

    fn set_world_rotation(&mut self, node: NodeId, rotation: Quat);

    /// Constraint attached to `node`, if any.
    fn constraint(&self, node: NodeId) -> Option<&JointConstraint>;

    /// True if `ancestor` appears strictly above `node` in the hierarchy.
    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }
}
