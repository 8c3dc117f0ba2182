use super::graph::{NodeId, SceneGraph};
use crate::error::SceneError;
use crate::ik::JointConstraint;
use crate::math::Pose;
use glam::{Quat, Vec3};

#[derive(Debug, Clone)]
struct Node {
    name: String,
    pose: Pose,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    constraint: Option<JointConstraint>,
}

/// Flat arena of nodes addressed by [`NodeId`].
///
/// Poses are stored in world space and are not propagated from parents to
/// children. Nodes are never removed, so ids stay valid for the arena's
/// lifetime.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<Node>,
}

impl Scene {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node under `parent` (or as a new root).
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        pose: Pose,
        parent: Option<NodeId>,
    ) -> Result<NodeId, SceneError> {
        if let Some(p) = parent {
            self.check(p)?;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.into(),
            pose,
            parent,
            children: Vec::new(),
            constraint: None,
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        Ok(id)
    }

    /// Appends a straight run of nodes, each parented to the previous one.
    /// Returns the ids in creation order.
    pub fn add_path(
        &mut self,
        prefix: &str,
        positions: &[Vec3],
        parent: Option<NodeId>,
    ) -> Result<Vec<NodeId>, SceneError> {
        let mut ids = Vec::with_capacity(positions.len());
        let mut parent = parent;
        for (i, &position) in positions.iter().enumerate() {
            let id = self.add_node(
                format!("{prefix}{i}"),
                Pose::from_position(position),
                parent,
            )?;
            ids.push(id);
            parent = Some(id);
        }
        Ok(ids)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|n| n.name.as_str())
    }

    pub fn pose(&self, node: NodeId) -> Option<&Pose> {
        self.nodes.get(node.0).map(|n| &n.pose)
    }

    /// Moves `node` under `new_parent`, or detaches it when `None`.
    pub fn reparent(&mut self, node: NodeId, new_parent: Option<NodeId>) -> Result<(), SceneError> {
        self.check(node)?;
        if let Some(p) = new_parent {
            self.check(p)?;
            if p == node || self.is_descendant(p, node) {
                return Err(SceneError::Cycle { node, parent: p });
            }
        }

        if let Some(old) = self.nodes[node.0].parent {
            self.nodes[old.0].children.retain(|&c| c != node);
        }
        self.nodes[node.0].parent = new_parent;
        if let Some(p) = new_parent {
            self.nodes[p.0].children.push(node);
        }
        Ok(())
    }

    /// Attaches `constraint` to `node`, replacing any previous one.
    pub fn attach_constraint(
        &mut self,
        node: NodeId,
        constraint: JointConstraint,
    ) -> Result<Option<JointConstraint>, SceneError> {
        self.check(node)?;
        Ok(self.nodes[node.0].constraint.replace(constraint))
    }

    pub fn remove_constraint(&mut self, node: NodeId) -> Result<Option<JointConstraint>, SceneError> {
        self.check(node)?;
        Ok(self.nodes[node.0].constraint.take())
    }

    pub fn constraint_mut(&mut self, node: NodeId) -> Option<&mut JointConstraint> {
        self.nodes.get_mut(node.0).and_then(|n| n.constraint.as_mut())
    }

    fn check(&self, node: NodeId) -> Result<(), SceneError> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(SceneError::UnknownNode(node))
        }
    }
}

impl SceneGraph for Scene {
    fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    fn world_position(&self, node: NodeId) -> Vec3 {
        self.nodes[node.0].pose.position
    }

    fn set_world_position(&mut self, node: NodeId, position: Vec3) {
        self.nodes[node.0].pose.position = position;
    }

    fn world_rotation(&self, node: NodeId) -> Quat {
        self.nodes[node.0].pose.rotation
    }

    fn set_world_rotation(&mut self, node: NodeId, rotation: Quat) {
        self.nodes[node.0].pose.rotation = rotation;
    }

    fn constraint(&self, node: NodeId) -> Option<&JointConstraint> {
        self.nodes.get(node.0).and_then(|n| n.constraint.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(scene: &mut Scene, n: usize) -> Vec<NodeId> {
        let positions: Vec<Vec3> = (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        scene.add_path("bone", &positions, None).unwrap()
    }

    #[test]
    fn add_path_links_parents_and_children() {
        let mut scene = Scene::new();
        let ids = line(&mut scene, 3);

        assert_eq!(scene.len(), 3);
        assert_eq!(scene.parent(ids[0]), None);
        assert_eq!(scene.parent(ids[2]), Some(ids[1]));
        assert_eq!(scene.children(ids[0]), &[ids[1]]);
        assert_eq!(scene.find("bone2"), Some(ids[2]));
        assert_eq!(scene.name(ids[1]), Some("bone1"));
    }

    #[test]
    fn descendant_query_walks_parents() {
        let mut scene = Scene::new();
        let ids = line(&mut scene, 4);

        assert!(scene.is_descendant(ids[3], ids[0]));
        assert!(!scene.is_descendant(ids[0], ids[3]));
        assert!(!scene.is_descendant(ids[1], ids[1]));
    }

    #[test]
    fn reparent_rejects_cycles() {
        let mut scene = Scene::new();
        let ids = line(&mut scene, 3);

        assert_eq!(
            scene.reparent(ids[0], Some(ids[2])),
            Err(SceneError::Cycle { node: ids[0], parent: ids[2] })
        );
        assert!(scene.reparent(ids[1], Some(ids[1])).is_err());
        assert_eq!(
            scene.reparent(ids[0], Some(NodeId(99))),
            Err(SceneError::UnknownNode(NodeId(99)))
        );
    }

    #[test]
    fn reparent_updates_child_lists() {
        let mut scene = Scene::new();
        let ids = line(&mut scene, 3);

        scene.reparent(ids[2], Some(ids[0])).unwrap();
        assert_eq!(scene.children(ids[1]), &[] as &[NodeId]);
        assert_eq!(scene.children(ids[0]), &[ids[1], ids[2]]);

        scene.reparent(ids[2], None).unwrap();
        assert_eq!(scene.parent(ids[2]), None);
        assert_eq!(scene.children(ids[0]), &[ids[1]]);
    }

    #[test]
    fn constraints_attach_and_detach() {
        let mut scene = Scene::new();
        let ids = line(&mut scene, 2);
        let cone = JointConstraint::new(Vec3::Y, 30.0);

        assert_eq!(scene.attach_constraint(ids[1], cone).unwrap(), None);
        assert_eq!(scene.constraint(ids[1]), Some(&cone));

        scene.constraint_mut(ids[1]).unwrap().set_enabled(false);
        assert!(!scene.constraint(ids[1]).unwrap().is_enabled());

        assert!(scene.remove_constraint(ids[1]).unwrap().is_some());
        assert_eq!(scene.constraint(ids[1]), None);
    }

    #[test]
    fn stored_pose_backs_world_queries() {
        let mut scene = Scene::new();
        let rot = Quat::from_rotation_y(0.5);
        let id = scene
            .add_node("wrist", Pose::new(Vec3::new(1.0, 2.0, 3.0), rot), None)
            .unwrap();

        assert_eq!(scene.world_position(id), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.world_rotation(id), rot);

        scene.set_world_position(id, Vec3::Z);
        scene.set_world_rotation(id, Quat::IDENTITY);
        assert_eq!(scene.pose(id), Some(&Pose::from_position(Vec3::Z)));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut scene = Scene::new();
        let err = scene
            .add_node("orphan", Pose::IDENTITY, Some(NodeId(7)))
            .unwrap_err();
        assert_eq!(err, SceneError::UnknownNode(NodeId(7)));
        assert!(scene.is_empty());
    }
}
