use super::chain::Chain;
use crate::error::{ChainError, InvalidReason};
use crate::scene::SceneGraph;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    reasons: Vec<InvalidReason>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.reasons.is_empty()
    }

    pub fn reasons(&self) -> &[InvalidReason] {
        &self.reasons
    }

    pub fn into_result(self) -> Result<(), ChainError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ChainError::Invalid(self.reasons))
        }
    }
}

/// Checks that the end effector is a proper descendant of the chain's root.
pub fn validate<S: SceneGraph + ?Sized>(chain: &Chain, scene: &S) -> Validation {
    let mut reasons = Vec::new();

    let root = chain.root();
    let root_known = scene.contains(root);
    if !root_known {
        reasons.push(InvalidReason::MissingRoot);
    }

    match chain.end_effector() {
        Some(effector) if scene.contains(effector) => {
            if root_known && !scene.is_descendant(effector, root) {
                reasons.push(InvalidReason::EndEffectorNotDescendant);
            }
        }
        _ => reasons.push(InvalidReason::MissingEndEffector),
    }

    Validation { reasons }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{NodeId, Scene};
    use glam::Vec3;

    fn scene_with_branch() -> (Scene, Vec<NodeId>, NodeId) {
        let mut scene = Scene::new();
        let ids = scene
            .add_path("spine", &[Vec3::ZERO, Vec3::Y, Vec3::new(0.0, 2.0, 0.0)], None)
            .unwrap();
        let other = scene.add_path("other", &[Vec3::X], None).unwrap()[0];
        (scene, ids, other)
    }

    #[test]
    fn descendant_effector_is_valid() {
        let (scene, ids, _) = scene_with_branch();
        let chain = Chain::builder(ids[0]).end_effector(ids[2]).build().unwrap();
        let v = validate(&chain, &scene);
        assert!(v.is_valid());
        assert!(v.into_result().is_ok());
    }

    #[test]
    fn missing_effector_is_reported() {
        let (scene, ids, _) = scene_with_branch();
        let chain = Chain::builder(ids[0]).build().unwrap();
        assert_eq!(
            validate(&chain, &scene).reasons(),
            &[InvalidReason::MissingEndEffector]
        );

        let chain = Chain::builder(ids[0]).end_effector(NodeId(42)).build().unwrap();
        assert_eq!(
            validate(&chain, &scene).reasons(),
            &[InvalidReason::MissingEndEffector]
        );
    }

    #[test]
    fn unrelated_or_self_effector_is_not_descendant() {
        let (scene, ids, other) = scene_with_branch();
        for effector in [other, ids[0]] {
            let chain = Chain::builder(ids[0]).end_effector(effector).build().unwrap();
            assert_eq!(
                validate(&chain, &scene).reasons(),
                &[InvalidReason::EndEffectorNotDescendant]
            );
        }

        // ancestor of the root is not below it either
        let chain = Chain::builder(ids[1]).end_effector(ids[0]).build().unwrap();
        assert!(!validate(&chain, &scene).is_valid());
    }

    #[test]
    fn unknown_root_is_reported() {
        let (scene, ids, _) = scene_with_branch();
        let chain = Chain::builder(NodeId(99)).end_effector(ids[2]).build().unwrap();
        let err = validate(&chain, &scene).into_result().unwrap_err();
        assert_eq!(err, ChainError::Invalid(vec![InvalidReason::MissingRoot]));
    }

    #[test]
    fn reparenting_changes_the_verdict() {
        let (mut scene, ids, other) = scene_with_branch();
        let chain = Chain::builder(ids[0]).end_effector(other).build().unwrap();
        assert!(!validate(&chain, &scene).is_valid());

        scene.reparent(other, Some(ids[2])).unwrap();
        assert!(validate(&chain, &scene).is_valid());
    }
}
