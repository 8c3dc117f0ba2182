use super::joint::ChainState;
use super::settings::{ChainSettings, TickPhase};
use super::solver::{FabrikSolver, SolveResult};
use super::validate::validate;
use crate::error::{ChainError, ConfigError};
use crate::scene::{NodeId, SceneGraph};
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    Node(NodeId),
    Point(Vec3),
}

impl Anchor {
    pub fn resolve<S: SceneGraph + ?Sized>(&self, scene: &S) -> Option<Vec3> {
        match *self {
            Anchor::Node(id) if scene.contains(id) => Some(scene.world_position(id)),
            Anchor::Node(_) => None,
            Anchor::Point(p) => Some(p),
        }
    }
}

impl From<NodeId> for Anchor {
    fn from(id: NodeId) -> Self {
        Anchor::Node(id)
    }
}

impl From<Vec3> for Anchor {
    fn from(point: Vec3) -> Self {
        Anchor::Point(point)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChainStatus {
    #[default]
    Uninitialized,
    Ready,
    Invalid,
}

#[derive(Debug, Clone)]
pub struct Chain {
    root: NodeId,
    end_effector: Option<NodeId>,
    target: Option<Anchor>,
    pole: Option<Anchor>,
    settings: ChainSettings,
    status: ChainStatus,
    state: ChainState,
    solver: FabrikSolver,
}

impl Chain {
    pub fn builder(root: NodeId) -> ChainBuilder {
        ChainBuilder::new(root)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn end_effector(&self) -> Option<NodeId> {
        self.end_effector
    }

    pub fn target(&self) -> Option<Anchor> {
        self.target
    }

    pub fn pole(&self) -> Option<Anchor> {
        self.pole
    }

    pub fn settings(&self) -> &ChainSettings {
        &self.settings
    }

    pub fn status(&self) -> ChainStatus {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == ChainStatus::Ready
    }

    pub fn state(&self) -> &ChainState {
        &self.state
    }

    pub fn solver(&self) -> &FabrikSolver {
        &self.solver
    }

    pub fn set_target(&mut self, target: Option<Anchor>) {
        self.target = target;
    }

    pub fn set_pole(&mut self, pole: Option<Anchor>) {
        self.pole = pole;
    }

    /// Changing the effector does not rebuild the cached joints; call
    /// [`Chain::revalidate`] afterwards.
    pub fn set_end_effector(&mut self, end_effector: Option<NodeId>) {
        self.end_effector = end_effector;
    }

    pub fn set_settings(&mut self, settings: ChainSettings) -> Result<(), ConfigError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Validates and builds the chain on first use.
    pub fn activate<S: SceneGraph + ?Sized>(&mut self, scene: &S) -> Result<(), ChainError> {
        if self.is_ready() {
            return Ok(());
        }
        self.revalidate(scene)
    }

    pub fn revalidate<S: SceneGraph + ?Sized>(&mut self, scene: &S) -> Result<(), ChainError> {
        let validation = validate(self, scene);
        if !validation.is_valid() {
            log::warn!(
                "invalid kinematic chain rooted at {}: {:?}",
                self.root,
                validation.reasons()
            );
            self.status = ChainStatus::Invalid;
            self.state = ChainState::default();
            return validation.into_result();
        }

        self.state = ChainState::build(self, scene);
        self.solver = FabrikSolver::with_capacity(self.state.len());
        self.status = ChainStatus::Ready;
        Ok(())
    }

    pub fn tick<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        phase: TickPhase,
    ) -> Option<SolveResult> {
        if phase != self.settings.tick_phase {
            return None;
        }
        self.solve(scene)
    }

    /// Runs one solve. Skipped unless the chain is ready and has a target.
    pub fn solve<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) -> Option<SolveResult> {
        if !self.is_ready() {
            return None;
        }
        let target = self.target?.resolve(&*scene)?;
        let pole = self.pole.and_then(|p| p.resolve(&*scene));

        self.solver
            .solve(&mut self.state, &self.settings, target, pole, scene)
    }

    pub fn joint_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.state.nodes()
    }

    pub fn joint_positions<S: SceneGraph + ?Sized>(&self, scene: &S) -> Vec<Vec3> {
        self.state.nodes().map(|n| scene.world_position(n)).collect()
    }
}

pub struct ChainBuilder {
    root: NodeId,
    end_effector: Option<NodeId>,
    target: Option<Anchor>,
    pole: Option<Anchor>,
    settings: ChainSettings,
}

impl ChainBuilder {
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            end_effector: None,
            target: None,
            pole: None,
            settings: ChainSettings::default(),
        }
    }

    pub fn end_effector(mut self, end_effector: NodeId) -> Self {
        self.end_effector = Some(end_effector);
        self
    }

    pub fn target(mut self, target: impl Into<Anchor>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn pole(mut self, pole: impl Into<Anchor>) -> Self {
        self.pole = Some(pole.into());
        self
    }

    pub fn tolerance(mut self, tolerance: f32) -> Self {
        self.settings.tolerance = tolerance;
        self
    }

    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.settings.max_iterations = max_iterations;
        self
    }

    pub fn fallback_max_bend_angle(mut self, degrees: f32) -> Self {
        self.settings.fallback_max_bend_angle_degrees = degrees;
        self
    }

    pub fn tick_phase(mut self, phase: TickPhase) -> Self {
        self.settings.tick_phase = phase;
        self
    }

    pub fn settings(mut self, settings: ChainSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Result<Chain, ConfigError> {
        self.settings.validate()?;
        Ok(Chain {
            root: self.root,
            end_effector: self.end_effector,
            target: self.target,
            pole: self.pole,
            settings: self.settings,
            status: ChainStatus::Uninitialized,
            state: ChainState::default(),
            solver: FabrikSolver::default(),
        })
    }
}
