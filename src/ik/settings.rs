use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickPhase {
    #[default]
    PrePhysics,
    PostPhysics,
}

/// Tunables of a chain that can be authored or loaded from a rig file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSettings {
    pub tolerance: f32,
    pub max_iterations: u32,
    /// Bend limit for joints without an enabled constraint.
    pub fallback_max_bend_angle_degrees: f32,
    pub tick_phase: TickPhase,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            max_iterations: 10,
            fallback_max_bend_angle_degrees: 180.0,
            tick_phase: TickPhase::PrePhysics,
        }
    }
}

impl ChainSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        let angle = self.fallback_max_bend_angle_degrees;
        if !(0.0..=180.0).contains(&angle) {
            return Err(ConfigError::InvalidBendAngle(angle));
        }
        Ok(())
    }

    pub fn fallback_max_bend_angle(&self) -> f32 {
        self.fallback_max_bend_angle_degrees.to_radians()
    }
}
