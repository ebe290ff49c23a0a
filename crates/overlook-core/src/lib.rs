//! Overlook Core - Camera control, place navigation, and scene data
//!
//! This crate provides the engine-agnostic parts of the Overlook viewer:
//! - Orientation math (yaw/pitch quaternions, look-at rotations)
//! - Pointer drag tracking and the first-person camera view control
//! - Timed tweens and the two-stage place navigator
//! - Procedural place catalog, terrain heightfield, and sun orbit
//! - Viewer configuration loading

pub mod config;
pub mod math;
pub mod navigator;
pub mod places;
pub mod pointer;
pub mod pose;
pub mod terrain;
pub mod tween;
pub mod view_control;

pub use config::{ConfigError, ViewerConfig};
pub use navigator::{NavigationFinished, NavigatorSettings, PlaceNavigator};
pub use places::{Landmark, LandmarkShape, PlaceCatalog};
pub use pointer::{PointerDragTracker, PointerEvent};
pub use pose::{CameraPose, Viewport};
pub use terrain::{GradientNoise, Heightfield, SunOrbit};
pub use tween::{Easing, Interpolate, Tween, TweenStep};
pub use view_control::{CameraViewControl, ControlState, ViewControlSettings};
