//! First-person camera view control driven by pointer drags

use bevy_math::Quat;
use tracing::{debug, trace, warn};

use crate::math::{angles_from_orientation, clamp_pitch, orientation_from_angles};
use crate::pointer::{PointerDragTracker, PointerEvent};
use crate::pose::{CameraPose, Viewport};

/// Sensitivity of the view control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewControlSettings {
    /// Yaw radians per full viewport width dragged
    pub phi_speed: f64,
    /// Pitch radians per full viewport height dragged
    pub theta_speed: f64,
}

impl Default for ViewControlSettings {
    fn default() -> Self {
        Self {
            phi_speed: 3.0,
            theta_speed: 1.0,
        }
    }
}

/// Externally visible state of the control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Inactive,
    Idle,
    Dragging,
}

/// Converts pointer drags into camera yaw (`phi`) and pitch (`theta`).
///
/// `phi` accumulates without wrapping. `theta` is clamped to
/// `[-PITCH_LIMIT, PITCH_LIMIT]`. While inactive the control never writes the
/// camera, which lets the navigator own it during animations.
#[derive(Debug, Clone)]
pub struct CameraViewControl {
    settings: ViewControlSettings,
    active: bool,
    tracker: PointerDragTracker,
    phi: f64,
    theta: f64,
}

impl CameraViewControl {
    /// Create an inactive control with zero yaw and pitch
    pub fn new(settings: ViewControlSettings) -> Self {
        Self {
            settings,
            active: false,
            tracker: PointerDragTracker::new(),
            phi: 0.0,
            theta: 0.0,
        }
    }

    pub fn activate(&mut self) {
        if !self.active {
            debug!("View control activated");
        }
        self.active = true;
        self.tracker.on_activate();
    }

    /// Suspend manual control and drop any drag in progress
    pub fn deactivate(&mut self) {
        if self.active {
            debug!("View control deactivated");
        }
        self.active = false;
        self.tracker.on_deactivate();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> ControlState {
        if !self.active {
            ControlState::Inactive
        } else if self.tracker.is_dragging() {
            ControlState::Dragging
        } else {
            ControlState::Idle
        }
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn settings(&self) -> ViewControlSettings {
        self.settings
    }

    /// Feed a pointer event; returns whether it was consumed
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        self.tracker.handle(event)
    }

    /// Apply the drag delta since the last frame to the camera.
    ///
    /// No-op unless a drag is in progress. Returns `true` if the camera
    /// orientation was written.
    pub fn update(&mut self, viewport: Viewport, camera: &mut CameraPose) -> bool {
        if !self.active || viewport.is_degenerate() {
            return false;
        }
        let Some(delta) = self.tracker.take_delta() else {
            return false;
        };

        let xh = f64::from(delta.x) / f64::from(viewport.width);
        let yh = f64::from(delta.y) / f64::from(viewport.height);
        self.phi += xh * self.settings.phi_speed;
        self.theta = clamp_pitch(self.theta + yh * self.settings.theta_speed);
        trace!(phi = self.phi, theta = self.theta, "View angles updated");

        self.apply(camera);
        true
    }

    /// Orientation for the current angles
    pub fn orientation(&self) -> Quat {
        orientation_from_angles(self.phi, self.theta)
    }

    /// Write the orientation for the current angles to the camera
    pub fn apply(&self, camera: &mut CameraPose) {
        camera.orientation = self.orientation();
    }

    /// Re-derive `phi` and `theta` from an orientation set elsewhere, so the
    /// next drag continues from it instead of snapping back.
    pub fn seed_rotation(&mut self, orientation: Quat) {
        let (phi, theta) = angles_from_orientation(orientation);
        if !(phi.is_finite() && theta.is_finite()) {
            warn!(?orientation, "Ignoring non-finite orientation seed");
            return;
        }
        self.phi = phi;
        self.theta = clamp_pitch(theta);
        debug!(phi = self.phi, theta = self.theta, "View angles seeded");
    }

    /// Zero the yaw after the camera has been moved discontinuously
    pub fn reset_yaw(&mut self) {
        self.phi = 0.0;
    }
}

impl Default for CameraViewControl {
    fn default() -> Self {
        Self::new(ViewControlSettings::default())
    }
}
