//! Orientation helpers shared by the view control and the navigator
//!
//! Camera orientation is always expressed as yaw about world +Y composed
//! with pitch about the yawed +X axis. Angles are carried in double
//! precision because yaw accumulates without bound across drags.

use bevy_math::{DQuat, EulerRot, Mat3, Quat, Vec2, Vec3};

/// Symmetric pitch limit in radians (60 degrees)
pub const PITCH_LIMIT: f64 = std::f64::consts::FRAC_PI_3;

/// Squared distance below which two points are treated as coincident
const COINCIDENT_EPSILON_SQ: f32 = 1e-8;

/// Build the camera orientation for a yaw (`phi`) and pitch (`theta`) pair.
///
/// Yaw is the outer rotation so pitch is always relative to the yawed frame,
/// which keeps roll at zero.
pub fn orientation_from_angles(phi: f64, theta: f64) -> Quat {
    let yaw = DQuat::from_rotation_y(phi);
    let pitch = DQuat::from_rotation_x(theta);
    (yaw * pitch).normalize().as_quat()
}

/// Decompose an orientation into `(phi, theta)` using the same yaw-then-pitch
/// convention as [`orientation_from_angles`]. Any roll is discarded.
pub fn angles_from_orientation(orientation: Quat) -> (f64, f64) {
    let (yaw, pitch, _roll) = orientation.as_dquat().normalize().to_euler(EulerRot::YXZ);
    (yaw, pitch)
}

/// Clamp a pitch angle into `[-PITCH_LIMIT, PITCH_LIMIT]`
pub fn clamp_pitch(theta: f64) -> f64 {
    theta.clamp(-PITCH_LIMIT, PITCH_LIMIT)
}

/// Re-express an orientation as yaw and pitch with the pitch clamped to
/// `PITCH_LIMIT`, so [`CameraViewControl`](crate::CameraViewControl) can
/// seed from it and recompose it exactly. Roll is dropped. A non-finite
/// decomposition leaves the orientation unchanged.
pub fn clamp_orientation_pitch(orientation: Quat) -> Quat {
    let (phi, theta) = angles_from_orientation(orientation);
    if !(phi.is_finite() && theta.is_finite()) {
        return orientation;
    }
    orientation_from_angles(phi, clamp_pitch(theta))
}

/// Orientation whose forward axis (-Z) points from `eye` toward `target`.
///
/// Returns `None` when the two points coincide. If the view direction is
/// parallel to `up`, an arbitrary right vector orthogonal to `up` is chosen.
pub fn look_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Option<Quat> {
    let offset = target - eye;
    if offset.length_squared() < COINCIDENT_EPSILON_SQ {
        return None;
    }
    let back = -offset.normalize();
    let right = up
        .cross(back)
        .try_normalize()
        .unwrap_or_else(|| up.any_orthonormal_vector());
    let up = back.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, back)))
}

/// Horizontal (XZ-plane) distance between two points
pub fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x, a.z).distance(Vec2::new(b.x, b.z))
}
