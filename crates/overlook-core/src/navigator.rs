//! Animated "fly to place" navigation
//!
//! Selecting a place runs a two-stage sequence: the camera first turns to
//! face the place, then travels toward it while re-aiming at it every step,
//! stopping a fixed standoff distance short. Manual view control is
//! suspended for the whole sequence and handed back, seeded with the final
//! orientation, once the camera arrives.

use std::time::Duration;

use bevy_math::{Quat, Vec2, Vec3};
use tracing::{debug, info, warn};

use crate::math::{angles_from_orientation, clamp_orientation_pitch, clamp_pitch, look_rotation, orientation_from_angles};
use crate::pose::CameraPose;
use crate::tween::{Easing, Tween};
use crate::view_control::CameraViewControl;

/// Ground distance below which the camera is considered already at a place
const MIN_TRAVEL_DISTANCE: f32 = 1e-3;

/// Navigation tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigatorSettings {
    /// Height of the look-at point above a place
    pub eye_height: f32,
    /// Distance kept between the resting camera and the place
    pub standoff: f32,
    pub rotation_duration: Duration,
    pub translation_duration: Duration,
    pub rotation_easing: Easing,
    pub translation_easing: Easing,
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self {
            eye_height: 2.0,
            standoff: 10.0,
            rotation_duration: Duration::from_millis(1000),
            translation_duration: Duration::from_millis(3000),
            rotation_easing: Easing::SinusoidalInOut,
            translation_easing: Easing::QuadraticInOut,
        }
    }
}

/// Published once when a navigation sequence completes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationFinished {
    /// Catalog index of the place navigated to
    pub place: usize,
    /// Camera position at rest
    pub position: Vec3,
}

#[derive(Debug, Clone)]
enum Stage {
    Rotating(Tween<Quat>),
    Translating(Tween<Vec3>),
}

/// One in-flight navigation sequence
#[derive(Debug, Clone)]
struct Navigation {
    place: usize,
    /// Look-at point above the place
    target: Vec3,
    /// Resting position; `None` when the camera is already over the place
    destination: Option<Vec3>,
    stage: Stage,
}

impl Navigation {
    /// Advance the running stage, chaining into translation when rotation
    /// completes. Returns `true` once the whole sequence is done.
    fn advance(&mut self, mut dt: Duration, camera: &mut CameraPose, settings: &NavigatorSettings) -> bool {
        loop {
            match &mut self.stage {
                Stage::Rotating(tween) => {
                    let step = tween.advance(dt);
                    camera.orientation = step.value;
                    let Some(overflow) = step.overflow else {
                        return false;
                    };
                    let Some(destination) = self.destination else {
                        return true;
                    };
                    debug!(place = self.place, "Rotation finished, starting translation");
                    self.stage = Stage::Translating(Tween::new(
                        camera.position,
                        destination,
                        settings.translation_duration,
                        settings.translation_easing,
                    ));
                    dt = overflow;
                }
                Stage::Translating(tween) => {
                    let step = tween.advance(dt);
                    camera.position = step.value;
                    camera.look_at(self.target);
                    camera.orientation = clamp_orientation_pitch(camera.orientation);
                    return step.is_finished();
                }
            }
        }
    }
}

/// Drives the camera to places from a fixed catalog of ground locations.
///
/// Selecting a place while another navigation is running cancels the
/// running one and restarts from the camera's current pose.
#[derive(Debug, Clone)]
pub struct PlaceNavigator {
    locations: Vec<Vec2>,
    settings: NavigatorSettings,
    active: Option<Navigation>,
}

impl PlaceNavigator {
    pub fn new(locations: Vec<Vec2>, settings: NavigatorSettings) -> Self {
        Self {
            locations,
            settings,
            active: None,
        }
    }

    pub fn locations(&self) -> &[Vec2] {
        &self.locations
    }

    pub fn settings(&self) -> &NavigatorSettings {
        &self.settings
    }

    pub fn is_navigating(&self) -> bool {
        self.active.is_some()
    }

    /// Place currently being navigated to
    pub fn current_place(&self) -> Option<usize> {
        self.active.as_ref().map(|nav| nav.place)
    }

    /// Start navigating to the place at `index`.
    ///
    /// Unknown indices are ignored and return `false`.
    pub fn select_place(
        &mut self,
        index: usize,
        camera: &CameraPose,
        control: &mut CameraViewControl,
    ) -> bool {
        let Some(location) = self.locations.get(index).copied() else {
            warn!(index, places = self.locations.len(), "Ignoring selection of unknown place");
            return false;
        };

        if let Some(previous) = self.active.take() {
            info!(previous = previous.place, index, "Restarting navigation");
        }
        control.deactivate();

        let target = Vec3::new(location.x, self.settings.eye_height, location.y);
        let destination = final_camera_position(camera.position, target, self.settings.standoff);
        if destination.is_none() {
            debug!(index, "Camera already over place, translation skipped");
        }
        let facing = arrival_facing(camera, target, destination.is_some());

        info!(index, x = location.x, z = location.y, "Navigating to place");
        self.active = Some(Navigation {
            place: index,
            target,
            destination,
            stage: Stage::Rotating(Tween::new(
                camera.orientation,
                facing,
                self.settings.rotation_duration,
                self.settings.rotation_easing,
            )),
        });
        true
    }

    /// Abandon any running navigation and hand control back without
    /// publishing completion. Returns whether a navigation was running.
    pub fn cancel(&mut self, control: &mut CameraViewControl) -> bool {
        let Some(nav) = self.active.take() else {
            return false;
        };
        info!(place = nav.place, "Navigation cancelled");
        control.activate();
        true
    }

    /// Advance the running navigation by `dt`, writing the camera.
    ///
    /// Returns the completion notice on the frame the sequence finishes.
    pub fn update(
        &mut self,
        dt: Duration,
        camera: &mut CameraPose,
        control: &mut CameraViewControl,
    ) -> Option<NavigationFinished> {
        let nav = self.active.as_mut()?;
        if !nav.advance(dt, camera, &self.settings) {
            return None;
        }

        let nav = self.active.take()?;
        control.activate();
        control.seed_rotation(camera.orientation);
        info!(
            place = nav.place,
            x = camera.position.x,
            y = camera.position.y,
            z = camera.position.z,
            "Place reached"
        );
        Some(NavigationFinished {
            place: nav.place,
            position: camera.position,
        })
    }
}

/// Orientation the rotation stage ends on. Always within the pitch limit so
/// the view control can take over without a jump. When the camera is
/// already over the place the aim is straight down and its yaw is
/// arbitrary, so the current yaw is kept instead.
fn arrival_facing(camera: &CameraPose, target: Vec3, travels: bool) -> Quat {
    let Some(aim) = look_rotation(camera.position, target, Vec3::Y) else {
        return clamp_orientation_pitch(camera.orientation);
    };
    if travels {
        return clamp_orientation_pitch(aim);
    }
    let (phi, _) = angles_from_orientation(camera.orientation);
    let (_, theta) = angles_from_orientation(aim);
    if !(phi.is_finite() && theta.is_finite()) {
        return clamp_orientation_pitch(camera.orientation);
    }
    orientation_from_angles(phi, clamp_pitch(theta))
}

/// Resting position for a camera at `from` travelling toward `target`:
/// `standoff` short of the target along the ground-plane line between them,
/// at the camera's current height. `None` if the camera is already over the
/// target.
pub fn final_camera_position(from: Vec3, target: Vec3, standoff: f32) -> Option<Vec3> {
    let origin = Vec2::new(from.x, from.z);
    let goal = Vec2::new(target.x, target.z);
    let distance = origin.distance(goal);
    if distance < MIN_TRAVEL_DISTANCE {
        return None;
    }
    let direction = (goal - origin) / distance;
    let stop = origin + direction * (distance - standoff);
    Some(Vec3::new(stop.x, from.y, stop.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{ground_distance, PITCH_LIMIT};
    use crate::pointer::PointerEvent;
    use crate::pose::Viewport;
    use crate::view_control::ControlState;

    const FRAME: Duration = Duration::from_millis(16);

    fn setup(locations: Vec<Vec2>) -> (PlaceNavigator, CameraViewControl, CameraPose) {
        let navigator = PlaceNavigator::new(locations, NavigatorSettings::default());
        let mut control = CameraViewControl::default();
        control.activate();
        let camera = CameraPose::looking_at(Vec3::new(0.0, 10.0, 20.0), Vec3::ZERO);
        (navigator, control, camera)
    }

    fn faces(camera: &CameraPose, target: Vec3) -> bool {
        let expected = (target - camera.position).normalize();
        camera.forward().distance(expected) < 1e-3
    }

    #[test]
    fn test_final_position_keeps_standoff_and_height() {
        let from = Vec3::new(0.0, 10.0, 20.0);
        let target = Vec3::new(100.0, 2.0, 200.0);
        let stop = final_camera_position(from, target, 10.0).unwrap();

        assert_eq!(stop.y, 10.0);
        assert!((ground_distance(stop, target) - 10.0).abs() < 1e-3);
        // On the segment between start and target
        let travelled = ground_distance(from, stop);
        assert!((travelled + 10.0 - ground_distance(from, target)).abs() < 1e-3);
    }

    #[test]
    fn test_final_position_degenerate() {
        let from = Vec3::new(5.0, 10.0, 5.0);
        assert!(final_camera_position(from, Vec3::new(5.0, 2.0, 5.0), 10.0).is_none());
    }

    #[test]
    fn test_navigation_end_to_end() {
        let (mut navigator, mut control, mut camera) = setup(vec![Vec2::new(100.0, 200.0)]);
        let start_position = camera.position;
        let target = Vec3::new(100.0, 2.0, 200.0);

        assert!(navigator.select_place(0, &camera, &mut control));
        assert_eq!(control.state(), ControlState::Inactive);

        // Halfway through the rotation: turning, not moving
        assert!(navigator.update(Duration::from_millis(500), &mut camera, &mut control).is_none());
        assert_eq!(camera.position, start_position);
        assert!(!control.is_active());

        // Rotation complete: facing the place, still not moving
        assert!(navigator.update(Duration::from_millis(500), &mut camera, &mut control).is_none());
        assert!(faces(&camera, target));
        assert_eq!(camera.position, start_position);

        // Mid-translation: still facing the place, manual control still off
        assert!(navigator.update(Duration::from_millis(1500), &mut camera, &mut control).is_none());
        assert!(faces(&camera, target));
        assert_ne!(camera.position, start_position);
        assert_eq!(camera.position.y, 10.0);
        assert!(!control.is_active());

        let finished = navigator
            .update(Duration::from_millis(1500), &mut camera, &mut control)
            .expect("navigation should finish after 4s");
        assert_eq!(finished.place, 0);
        assert_eq!(finished.position, camera.position);
        assert!((finished.position.y - 10.0).abs() < 1e-4);
        assert!((ground_distance(finished.position, target) - 10.0).abs() < 1e-2);
        assert!(ground_distance(finished.position, start_position) < ground_distance(target, start_position));

        assert!(control.is_active());
        assert!(!navigator.is_navigating());
        // Completion fires once
        assert!(navigator.update(FRAME, &mut camera, &mut control).is_none());
    }

    #[test]
    fn test_drag_mid_navigation_has_no_effect() {
        let (mut navigator, mut control, mut camera) = setup(vec![Vec2::new(-60.0, 80.0)]);
        let viewport = Viewport::new(800.0, 600.0);
        navigator.select_place(0, &camera, &mut control);
        navigator.update(Duration::from_millis(1200), &mut camera, &mut control);

        let before = camera;
        assert!(!control.handle_pointer(PointerEvent::Down(Vec2::new(10.0, 10.0))));
        control.handle_pointer(PointerEvent::Move(Vec2::new(700.0, 500.0)));
        assert!(!control.update(viewport, &mut camera));
        assert_eq!(camera, before);
        assert_eq!(control.phi(), 0.0);
    }

    #[test]
    fn test_single_large_step_chains_both_stages() {
        let (mut navigator, mut control, mut camera) = setup(vec![Vec2::new(40.0, -30.0)]);
        navigator.select_place(0, &camera, &mut control);
        let finished = navigator.update(Duration::from_millis(4000), &mut camera, &mut control);
        assert!(finished.is_some());
        assert!(control.is_active());
    }

    #[test]
    fn test_not_finished_before_full_sequence() {
        let (mut navigator, mut control, mut camera) = setup(vec![Vec2::new(40.0, -30.0)]);
        navigator.select_place(0, &camera, &mut control);
        let mut elapsed = Duration::ZERO;
        while elapsed + FRAME < Duration::from_millis(4000) {
            assert!(navigator.update(FRAME, &mut camera, &mut control).is_none());
            assert!(!control.is_active());
            elapsed += FRAME;
        }
        assert!(navigator.update(FRAME, &mut camera, &mut control).is_some());
    }

    #[test]
    fn test_control_seeded_from_final_orientation() {
        let (mut navigator, mut control, mut camera) = setup(vec![Vec2::new(100.0, 200.0)]);
        navigator.select_place(0, &camera, &mut control);
        navigator.update(Duration::from_secs(5), &mut camera, &mut control);

        let (phi, theta) = angles_from_orientation(camera.orientation);
        assert!((control.phi() - phi).abs() < 1e-9);
        assert!((control.theta() - theta).abs() < 1e-9);

        // First drag sample reproduces the arrival orientation
        let arrived = camera.orientation;
        control.handle_pointer(PointerEvent::Down(Vec2::new(300.0, 300.0)));
        control.update(Viewport::new(800.0, 600.0), &mut camera);
        assert!(camera.orientation.dot(arrived).abs() > 1.0 - 1e-5);
    }

    fn assert_zero_drag_keeps_view(control: &mut CameraViewControl, camera: &mut CameraPose) {
        let arrived = *camera;
        control.handle_pointer(PointerEvent::Down(Vec2::new(250.0, 250.0)));
        assert!(control.update(Viewport::new(800.0, 600.0), camera));
        control.handle_pointer(PointerEvent::Up(Vec2::new(250.0, 250.0)));
        assert!(camera.orientation.dot(arrived.orientation).abs() > 1.0 - 1e-5);
        assert!(camera.forward().distance(arrived.forward()) < 1e-3);
    }

    #[test]
    fn test_degenerate_place_skips_translation() {
        let (mut navigator, mut control, _) = setup(vec![Vec2::new(30.0, 40.0)]);
        let mut camera = CameraPose::looking_at(Vec3::new(30.0, 10.0, 40.0), Vec3::new(0.0, 0.0, 0.0));
        let start_position = camera.position;
        let (start_phi, _) = angles_from_orientation(camera.orientation);

        navigator.select_place(0, &camera, &mut control);
        assert!(navigator.update(Duration::from_millis(999), &mut camera, &mut control).is_none());

        let finished = navigator
            .update(Duration::from_millis(1), &mut camera, &mut control)
            .expect("rotation-only navigation should finish");
        assert_eq!(finished.position, start_position);
        assert!(camera.orientation.is_finite());
        assert!(control.is_active());

        // Looks down as far as allowed, keeping the heading it had
        let (phi, theta) = angles_from_orientation(camera.orientation);
        assert!((phi - start_phi).abs() < 1e-5);
        assert!((theta + PITCH_LIMIT).abs() < 1e-5);
        assert!((control.theta() + PITCH_LIMIT).abs() < 1e-5);

        assert_zero_drag_keeps_view(&mut control, &mut camera);
    }

    #[test]
    fn test_steep_arrival_stays_within_pitch_limit() {
        let navigator_settings = NavigatorSettings::default();
        let mut navigator = PlaceNavigator::new(vec![Vec2::new(100.0, 0.0)], navigator_settings);
        let mut control = CameraViewControl::default();
        control.activate();
        let mut camera = CameraPose::looking_at(Vec3::new(0.0, 60.0, 0.0), Vec3::new(50.0, 0.0, 0.0));

        navigator.select_place(0, &camera, &mut control);
        let mut finished = None;
        for _ in 0..300 {
            finished = finished.or(navigator.update(FRAME, &mut camera, &mut control));
            let (_, theta) = angles_from_orientation(camera.orientation);
            assert!(theta >= -PITCH_LIMIT - 1e-5, "pitch {theta} beyond limit");
        }
        let finished = finished.expect("navigation should finish");
        assert!((ground_distance(finished.position, Vec3::new(100.0, 2.0, 0.0)) - 10.0).abs() < 1e-2);
        assert!((control.theta() + PITCH_LIMIT).abs() < 1e-5);

        assert_zero_drag_keeps_view(&mut control, &mut camera);
    }

    #[test]
    fn test_reselect_cancels_and_restarts() {
        let (mut navigator, mut control, mut camera) =
            setup(vec![Vec2::new(100.0, 0.0), Vec2::new(-50.0, -50.0)]);

        navigator.select_place(0, &camera, &mut control);
        navigator.update(Duration::from_millis(2000), &mut camera, &mut control);
        assert_eq!(navigator.current_place(), Some(0));

        assert!(navigator.select_place(1, &camera, &mut control));
        assert_eq!(navigator.current_place(), Some(1));
        assert!(!control.is_active());

        let mut finished = Vec::new();
        for _ in 0..400 {
            if let Some(done) = navigator.update(FRAME, &mut camera, &mut control) {
                finished.push(done);
            }
        }
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].place, 1);
        let target = Vec3::new(-50.0, 2.0, -50.0);
        assert!((ground_distance(finished[0].position, target) - 10.0).abs() < 1e-2);
    }

    #[test]
    fn test_unknown_place_is_ignored() {
        let (mut navigator, mut control, camera) = setup(vec![Vec2::ZERO]);
        assert!(!navigator.select_place(3, &camera, &mut control));
        assert!(!navigator.is_navigating());
        assert!(control.is_active());
    }

    #[test]
    fn test_cancel_returns_control() {
        let (mut navigator, mut control, mut camera) = setup(vec![Vec2::new(10.0, 90.0)]);
        navigator.select_place(0, &camera, &mut control);
        navigator.update(Duration::from_millis(300), &mut camera, &mut control);

        assert!(navigator.cancel(&mut control));
        assert!(control.is_active());
        assert!(navigator.update(Duration::from_secs(10), &mut camera, &mut control).is_none());
        assert!(!navigator.cancel(&mut control));
    }
}
