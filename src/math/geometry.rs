use glam::{Quat, Vec3};

pub const EPSILON: f32 = 1e-5;

/// Both inputs are expected to be unit length. Antiparallel inputs rotate
/// about an arbitrary orthonormal axis of `from`.
pub fn rotate_towards(from: Vec3, to: Vec3, max_radians: f32) -> Vec3 {
    if !max_radians.is_finite() {
        return from;
    }

    let angle = from.angle_between(to);
    if angle <= max_radians {
        return to;
    }

    let axis = from.cross(to);
    let axis = if axis.length_squared() < EPSILON * EPSILON {
        from.any_orthonormal_vector()
    } else {
        axis.normalize()
    };

    (Quat::from_axis_angle(axis, max_radians) * from).normalize_or_zero()
}

pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}

/// Degenerate (zero-length) inputs yield the identity.
pub fn from_to_rotation(from: Vec3, to: Vec3) -> Quat {
    let from = from.normalize_or_zero();
    let to = to.normalize_or_zero();
    if from == Vec3::ZERO || to == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(from, to)
}
