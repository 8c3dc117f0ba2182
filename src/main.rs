use glam::Vec3;
use ik_rig::{Chain, JointConstraint, NodeId, Pose, Scene, SceneGraph, TickPhase};

const TICKS: u32 = 120;
const DT: f32 = 1.0 / 60.0;

struct App {
    scene: Scene,
    chain: Chain,
    goal: NodeId,
    time: f32,
}

impl App {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let mut scene = Scene::new();
        let bones = scene.add_path(
            "arm",
            &[
                Vec3::ZERO,
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 2.0, 0.0),
                Vec3::new(0.0, 3.0, 0.0),
                Vec3::new(0.0, 4.0, 0.0),
            ],
            None,
        )?;
        for &bone in &bones[1..4] {
            scene.attach_constraint(bone, JointConstraint::new(Vec3::Y, 60.0))?;
        }

        let goal = scene.add_node("goal", Pose::from_position(Vec3::new(2.0, 2.0, 0.0)), None)?;
        let pole = scene.add_node("pole", Pose::from_position(Vec3::new(0.0, 2.0, 3.0)), None)?;

        let mut chain = Chain::builder(bones[0])
            .end_effector(bones[4])
            .target(goal)
            .pole(pole)
            .tolerance(0.001)
            .max_iterations(20)
            .tick_phase(TickPhase::PrePhysics)
            .build()?;
        chain.activate(&scene)?;

        Ok(Self {
            scene,
            chain,
            goal,
            time: 0.0,
        })
    }

    fn update(&mut self) {
        self.time += DT;
        let angle = self.time * std::f32::consts::TAU * 0.25;
        let goal = Vec3::new(2.5 * angle.cos(), 2.0 + angle.sin(), 1.5 * angle.sin());
        self.scene.set_world_position(self.goal, goal);

        for phase in [TickPhase::PrePhysics, TickPhase::PostPhysics] {
            if let Some(result) = self.chain.tick(&mut self.scene, phase) {
                log::debug!(
                    "t={:.2} {:?} converged={} iterations={} distance={:.4}",
                    self.time,
                    result.branch,
                    result.converged,
                    result.iterations,
                    result.final_distance
                );
            }
        }
    }

    fn report(&self) {
        for (node, position) in self
            .chain
            .joint_nodes()
            .zip(self.chain.joint_positions(&self.scene))
        {
            log::info!(
                "{:>6} at {:.3}",
                self.scene.name(node).unwrap_or("?"),
                position
            );
        }
    }
}

fn main() {
    env_logger::init();

    let mut app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            log::error!("failed to set up rig: {e}");
            std::process::exit(1);
        }
    };

    for _ in 0..TICKS {
        app.update();
    }
    app.report();
}
