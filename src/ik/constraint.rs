use crate::math::{rotate_towards, EPSILON};
use glam::Vec3;

/// `cone_axis` is expressed in the pose the chain had when its state was built;
/// the solver carries it along with the neighbouring bone as the chain moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointConstraint {
    pub cone_axis: Vec3,
    pub max_angle: f32,
    pub enabled: bool,
}

impl JointConstraint {
    /// Angle is clamped to `[0, 180]` degrees; a NaN angle means unlimited.
    /// A zero or non-finite axis falls back to `+X`.
    pub fn new(cone_axis: Vec3, max_angle_degrees: f32) -> Self {
        let axis = cone_axis.normalize_or_zero();
        let degrees = if max_angle_degrees.is_nan() {
            180.0
        } else {
            max_angle_degrees.clamp(0.0, 180.0)
        };
        Self {
            cone_axis: if axis == Vec3::ZERO { Vec3::X } else { axis },
            max_angle: degrees.to_radians(),
            enabled: true,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn max_angle_degrees(&self) -> f32 {
        self.max_angle.to_degrees()
    }
}

/// Pulls `direction` back inside the cone of half-angle `max_angle` (radians)
/// around `reference`.
///
/// Directions already inside the cone come back normalized but otherwise
/// untouched; outside ones are rotated toward `reference` by exactly the
/// excess angle. A zero `direction` collapses onto the reference, and a
/// non-finite `max_angle` leaves the direction unconstrained.
pub fn clamp_direction(direction: Vec3, reference: Vec3, max_angle: f32) -> Vec3 {
    let dir = direction.normalize_or_zero();
    let ref_dir = reference.normalize_or_zero();

    if !max_angle.is_finite() || ref_dir.length_squared() < EPSILON {
        return dir;
    }
    if dir.length_squared() < EPSILON {
        return ref_dir;
    }

    let angle = dir.angle_between(ref_dir);

    if angle <= max_angle {
        dir
    } else {
        rotate_towards(dir, ref_dir, angle - max_angle)
    }
}
