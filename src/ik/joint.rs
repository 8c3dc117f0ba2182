use super::chain::Chain;
use super::constraint::JointConstraint;
use super::validate::validate;
use crate::scene::{NodeId, SceneGraph};
use glam::{Quat, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub struct JointRecord {
    pub node: NodeId,
    /// Unit direction toward the next joint (toward the target for the effector).
    pub initial_direction: Vec3,
    pub initial_rotation: Quat,
    pub constraint: Option<JointConstraint>,
}

impl JointRecord {
    pub fn active_constraint(&self) -> Option<&JointConstraint> {
        self.constraint.as_ref().filter(|c| c.enabled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainState {
    joints: Vec<JointRecord>,
}

impl ChainState {
    /// An invalid chain yields an empty state.
    pub fn build<S: SceneGraph + ?Sized>(chain: &Chain, scene: &S) -> Self {
        if !validate(chain, scene).is_valid() {
            return Self::default();
        }
        let Some(effector) = chain.end_effector() else {
            return Self::default();
        };
        let root = chain.root();

        let mut nodes = vec![effector];
        let mut current = effector;
        while current != root {
            match scene.parent(current) {
                Some(parent) => {
                    nodes.push(parent);
                    current = parent;
                }
                None => return Self::default(),
            }
        }
        nodes.reverse();

        let positions: Vec<Vec3> = nodes.iter().map(|&n| scene.world_position(n)).collect();
        let last = nodes.len() - 1;
        let last_segment = (positions[last] - positions[last - 1]).normalize_or_zero();

        let joints = nodes
            .iter()
            .enumerate()
            .map(|(i, &node)| {
                let initial_direction = if i < last {
                    (positions[i + 1] - positions[i]).normalize_or_zero()
                } else {
                    chain
                        .target()
                        .and_then(|t| t.resolve(scene))
                        .map(|t| (t - positions[i]).normalize_or_zero())
                        .filter(|d| *d != Vec3::ZERO)
                        .unwrap_or(last_segment)
                };

                JointRecord {
                    node,
                    initial_direction,
                    initial_rotation: scene.world_rotation(node),
                    constraint: scene.constraint(node).copied(),
                }
            })
            .collect::<Vec<_>>();

        log::debug!(
            "built chain state: {} joints from {} to {}",
            joints.len(),
            root,
            effector
        );

        Self { joints }
    }

    pub fn joints(&self) -> &[JointRecord] {
        &self.joints
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.joints.iter().map(|j| j.node)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.joints.first().map(|j| j.node)
    }

    pub fn end_effector(&self) -> Option<NodeId> {
        self.joints.last().map(|j| j.node)
    }

    pub(crate) fn refresh_constraints<S: SceneGraph + ?Sized>(&mut self, scene: &S) {
        for joint in &mut self.joints {
            joint.constraint = scene.constraint(joint.node).copied();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ik::chain::Anchor;
    use crate::math::Pose;
    use crate::scene::Scene;

    fn arm() -> (Scene, Vec<NodeId>) {
        let mut scene = Scene::new();
        let ids = scene
            .add_path(
                "arm",
                &[Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0)],
                None,
            )
            .unwrap();
        (scene, ids)
    }

    #[test]
    fn build_orders_root_first() {
        let (scene, ids) = arm();
        let chain = Chain::builder(ids[0]).end_effector(ids[3]).build().unwrap();
        let state = ChainState::build(&chain, &scene);

        assert_eq!(state.nodes().collect::<Vec<_>>(), ids);
        assert_eq!(state.root(), Some(ids[0]));
        assert_eq!(state.end_effector(), Some(ids[3]));
        for joint in &state.joints()[..3] {
            assert!(joint.initial_direction.abs_diff_eq(Vec3::X, 1e-6));
        }
    }

    #[test]
    fn build_stops_at_chain_root() {
        let (scene, ids) = arm();
        let chain = Chain::builder(ids[1]).end_effector(ids[3]).build().unwrap();
        let state = ChainState::build(&chain, &scene);

        assert_eq!(state.len(), 3);
        assert_eq!(state.root(), Some(ids[1]));
    }

    #[test]
    fn effector_direction_points_at_target() {
        let (scene, ids) = arm();
        let chain = Chain::builder(ids[0])
            .end_effector(ids[3])
            .target(Anchor::Point(Vec3::new(3.0, 5.0, 0.0)))
            .build()
            .unwrap();
        let state = ChainState::build(&chain, &scene);

        assert!(state.joints()[3].initial_direction.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn effector_direction_without_target_follows_last_bone() {
        let (scene, ids) = arm();
        let chain = Chain::builder(ids[0]).end_effector(ids[3]).build().unwrap();
        let state = ChainState::build(&chain, &scene);

        assert!(state.joints()[3].initial_direction.abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn captures_rotation_and_constraint() {
        let (mut scene, ids) = arm();
        let cone = JointConstraint::new(Vec3::X, 40.0);
        scene.attach_constraint(ids[1], cone).unwrap();
        let rot = Quat::from_rotation_z(0.3);
        scene.set_world_rotation(ids[2], rot);

        let chain = Chain::builder(ids[0]).end_effector(ids[3]).build().unwrap();
        let state = ChainState::build(&chain, &scene);

        assert_eq!(state.joints()[1].constraint, Some(cone));
        assert_eq!(state.joints()[2].initial_rotation, rot);
        assert_eq!(state.joints()[0].constraint, None);
    }

    #[test]
    fn invalid_chain_builds_empty_state() {
        let (mut scene, ids) = arm();
        let stray = scene
            .add_node("stray", Pose::from_position(Vec3::Y), None)
            .unwrap();
        let chain = Chain::builder(ids[0]).end_effector(stray).build().unwrap();

        assert!(ChainState::build(&chain, &scene).is_empty());
    }

    #[test]
    fn disabled_constraint_is_not_active() {
        let record = JointRecord {
            node: NodeId(0),
            initial_direction: Vec3::X,
            initial_rotation: Quat::IDENTITY,
            constraint: Some(JointConstraint::new(Vec3::X, 10.0).with_enabled(false)),
        };
        assert!(record.active_constraint().is_none());
    }
}
