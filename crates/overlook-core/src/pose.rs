//! Camera pose and viewport values exchanged with the host renderer

use bevy_math::{Quat, Vec3};

use crate::math::look_rotation;

/// Position and orientation of the camera.
///
/// The host copies its camera transform into a pose before running the
/// view control and navigator for a frame, then copies it back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl CameraPose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose at `position` facing `target`. Keeps the identity orientation
    /// when the two points coincide.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let mut pose = Self::new(position, Quat::IDENTITY);
        pose.look_at(target);
        pose
    }

    /// Re-aim the camera at `target`; no-op when `target` is the camera position
    pub fn look_at(&mut self, target: Vec3) {
        if let Some(orientation) = look_rotation(self.position, target, Vec3::Y) {
            self.orientation = orientation;
        }
    }

    /// Unit vector the camera is facing (-Z in camera space)
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }
}

/// Viewport dimensions in pixels, used to normalize pointer deltas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A viewport with no area cannot normalize a delta
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}
