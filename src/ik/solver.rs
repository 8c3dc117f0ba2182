use super::constraint::clamp_direction;
use super::joint::ChainState;
use super::settings::ChainSettings;
use crate::math::{from_to_rotation, project_on_plane, EPSILON};
use crate::scene::SceneGraph;
use glam::{Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveBranch {
    Reachable,
    Unreachable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveResult {
    pub branch: SolveBranch,
    pub converged: bool,
    pub iterations: u32,
    pub final_distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    FromRoot,
    FromEffector,
}

#[derive(Debug, Clone, Default)]
pub struct FabrikSolver {
    positions: Vec<Vec3>,
    bone_lengths: Vec<f32>,
}

impl FabrikSolver {
    pub fn with_capacity(joint_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(joint_count),
            bone_lengths: Vec::with_capacity(joint_count.saturating_sub(1)),
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn bone_lengths(&self) -> &[f32] {
        &self.bone_lengths
    }

    pub fn total_length(&self) -> f32 {
        self.bone_lengths.iter().sum()
    }

    /// Runs one tick and writes the resulting poses back to the scene.
    pub fn solve<S: SceneGraph + ?Sized>(
        &mut self,
        state: &mut ChainState,
        settings: &ChainSettings,
        target: Vec3,
        pole: Option<Vec3>,
        scene: &mut S,
    ) -> Option<SolveResult> {
        if state.len() < 2 {
            return None;
        }

        self.snapshot(state, scene);

        let root = self.positions[0];
        let total_length = self.total_length();
        let distance_to_target = root.distance(target);

        let result = if total_length < distance_to_target {
            self.stretch_towards_target(state, settings, target);
            SolveResult {
                branch: SolveBranch::Unreachable,
                converged: false,
                iterations: 1,
                final_distance: self.effector().distance(target),
            }
        } else {
            self.iterate(state, settings, root, target)
        };

        if let Some(pole) = pole {
            self.bend_towards_pole(pole);
        }

        if !self.positions.iter().all(|p| p.is_finite()) {
            log::warn!("discarding non-finite IK solve for {:?}", state.root());
            return None;
        }

        self.write_back(state, scene);

        log::trace!(
            "solved {:?}: {:?} after {} iteration(s), distance {:.4}",
            state.root(),
            result.branch,
            result.iterations,
            result.final_distance
        );

        Some(result)
    }

    fn snapshot<S: SceneGraph + ?Sized>(&mut self, state: &mut ChainState, scene: &S) {
        state.refresh_constraints(scene);

        self.positions.clear();
        self.positions
            .extend(state.joints().iter().map(|j| scene.world_position(j.node)));

        self.bone_lengths.clear();
        self.bone_lengths.extend(
            self.positions
                .windows(2)
                .map(|w| (w[1] - w[0]).length()),
        );
    }

    fn effector(&self) -> Vec3 {
        self.positions[self.positions.len() - 1]
    }

    fn iterate(
        &mut self,
        state: &ChainState,
        settings: &ChainSettings,
        root: Vec3,
        target: Vec3,
    ) -> SolveResult {
        let mut iterations = 0;

        while self.effector().distance(target) > settings.tolerance
            && iterations < settings.max_iterations
        {
            self.forward_pass(state, settings, target);
            self.backward_pass(state, settings, root);
            iterations += 1;
        }

        let final_distance = self.effector().distance(target);
        SolveResult {
            branch: SolveBranch::Reachable,
            converged: final_distance <= settings.tolerance,
            iterations,
            final_distance,
        }
    }

    fn forward_pass(&mut self, state: &ChainState, settings: &ChainSettings, target: Vec3) {
        let n = self.positions.len();

        self.positions[n - 1] = target;

        for i in (0..n - 1).rev() {
            let next_pos = self.positions[i + 1];
            let curr_pos = self.positions[i];

            let dir = curr_pos - next_pos;
            let candidate = if dir.length_squared() > EPSILON * EPSILON {
                dir
            } else {
                -state.joints()[i].initial_direction
            };

            let direction = self.constrain(state, settings, candidate, i + 1, Traversal::FromEffector);
            self.positions[i] = next_pos + direction * self.bone_lengths[i];
        }
    }

    fn backward_pass(&mut self, state: &ChainState, settings: &ChainSettings, base: Vec3) {
        let n = self.positions.len();

        self.positions[0] = base;

        for i in 0..n - 1 {
            let prev_pos = self.positions[i];
            let curr_pos = self.positions[i + 1];

            let dir = curr_pos - prev_pos;
            let candidate = if dir.length_squared() > EPSILON * EPSILON {
                dir
            } else {
                state.joints()[i].initial_direction
            };

            let direction = self.constrain(state, settings, candidate, i, Traversal::FromRoot);
            self.positions[i + 1] = prev_pos + direction * self.bone_lengths[i];
        }
    }

    fn stretch_towards_target(&mut self, state: &ChainState, settings: &ChainSettings, target: Vec3) {
        for i in 0..self.bone_lengths.len() {
            let current = self.positions[i];
            let to_target = target - current;
            let distance = to_target.length();

            if distance < EPSILON {
                continue;
            }

            let direction =
                self.constrain(state, settings, to_target / distance, i, Traversal::FromRoot);
            self.positions[i + 1] = current + direction * self.bone_lengths[i];
        }
    }

    /// Cone-constrains `candidate`, the outgoing direction at `index`.
    ///
    /// The cone's reference comes from the neighbour on the settled side of the
    /// traversal. With an enabled joint constraint the constraint axis is carried
    /// along by that neighbour's rotation since build; otherwise the neighbouring
    /// bone itself is the reference.
    pub fn constrain(
        &self,
        state: &ChainState,
        settings: &ChainSettings,
        candidate: Vec3,
        index: usize,
        traversal: Traversal,
    ) -> Vec3 {
        let joints = state.joints();
        let last = joints.len() - 1;
        let positions = &self.positions;
        let cone = joints[index].active_constraint();

        let reference = match (traversal, cone) {
            (Traversal::FromRoot, Some(c)) => {
                let rotation = if index > 0 {
                    from_to_rotation(
                        joints[index - 1].initial_direction,
                        positions[index] - positions[index - 1],
                    )
                } else {
                    Quat::IDENTITY
                };
                rotation * c.cone_axis
            }
            (Traversal::FromRoot, None) if index > 0 => {
                (positions[index] - positions[index - 1]).normalize_or_zero()
            }
            (Traversal::FromRoot, None) => joints[0].initial_direction,
            (Traversal::FromEffector, Some(c)) => {
                let rotation = if index < last {
                    from_to_rotation(
                        -joints[index].initial_direction,
                        positions[index] - positions[index + 1],
                    )
                } else {
                    Quat::IDENTITY
                };
                rotation * -c.cone_axis
            }
            (Traversal::FromEffector, None) if index < last => {
                (positions[index] - positions[index + 1]).normalize_or_zero()
            }
            (Traversal::FromEffector, None) => -joints[last].initial_direction,
        };

        let max_angle = cone
            .map(|c| c.max_angle)
            .unwrap_or_else(|| settings.fallback_max_bend_angle());

        clamp_direction(candidate, reference, max_angle)
    }

    /// Swings each interior joint around the axis of its neighbours so it leans
    /// toward `pole`. Bone lengths are not re-enforced here.
    fn bend_towards_pole(&mut self, pole: Vec3) {
        let n = self.positions.len();

        for i in 1..n.saturating_sub(1) {
            let prev = self.positions[i - 1];
            let current = self.positions[i];
            let next = self.positions[i + 1];

            let normal = (next - prev).normalize_or_zero();
            if normal == Vec3::ZERO {
                continue;
            }

            let projected_pole = current + project_on_plane(pole - current, normal);
            let circle_origin = current + project_on_plane(prev - current, normal);

            let radius = circle_origin.distance(current);
            let pole_distance = circle_origin.distance(projected_pole);
            if pole_distance < EPSILON {
                continue;
            }

            self.positions[i] =
                circle_origin + (projected_pole - circle_origin) * (radius / pole_distance);
        }
    }

    /// Rotates every joint by the swing from its rest direction, then moves it.
    fn write_back<S: SceneGraph + ?Sized>(&self, state: &ChainState, scene: &mut S) {
        let joints = state.joints();
        let n = joints.len();
        let mut last_rotation = Quat::IDENTITY;

        for i in 0..n - 1 {
            let joint = &joints[i];
            let new_direction = self.positions[i + 1] - self.positions[i];
            let swing = from_to_rotation(joint.initial_direction, new_direction);
            last_rotation = (swing * joint.initial_rotation).normalize();
            scene.set_world_rotation(joint.node, last_rotation);
        }
        // effector copies its predecessor
        scene.set_world_rotation(joints[n - 1].node, last_rotation);

        for (joint, &position) in joints.iter().zip(&self.positions) {
            scene.set_world_position(joint.node, position);
        }
    }
}
