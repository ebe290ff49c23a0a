//! Overlook Scene - Bevy hosting for the Overlook viewer
//!
//! This crate wires the engine-agnostic `overlook-core` into a Bevy app:
//! the first-person camera and its per-frame control systems, the
//! procedural landscape with its orbiting sun, the landmark shapes with
//! their spot lights, and the global environment (clear colour, ambient
//! light, and the procedural sky that lights the scene).

pub mod camera;
pub mod environment;
pub mod landscape;
pub mod places;

use bevy::prelude::*;
use overlook_core::{CameraViewControl, PlaceCatalog, PlaceNavigator, ViewerConfig};

/// Configuration the scene was built from
#[derive(Debug, Clone, Resource)]
pub struct SceneSettings {
    pub config: ViewerConfig,
    /// Seed used for place and terrain generation
    pub seed: u64,
}

/// Plugin that sets up the full Overlook scene
pub struct OverlookScenePlugin {
    pub config: ViewerConfig,
    pub seed: u64,
}

impl Plugin for OverlookScenePlugin {
    fn build(&self, app: &mut App) {
        let catalog = PlaceCatalog::from_config(&self.config.places, self.seed);
        let navigator = PlaceNavigator::new(catalog.locations(), self.config.navigator_settings());
        let control = CameraViewControl::new(self.config.view_control_settings());

        app.insert_resource(SceneSettings {
            config: self.config.clone(),
            seed: self.seed,
        })
        .insert_resource(Places(catalog))
        .insert_resource(Navigator(navigator))
        .insert_resource(ViewControl(control))
        .add_plugins(environment::EnvironmentPlugin)
        .add_plugins(places::PlacesPlugin)
        .add_plugins(camera::CameraPlugin)
        .add_plugins(landscape::LandscapePlugin);
    }
}

// Re-export commonly used types
pub use camera::{MainCamera, NavigationFinished, Navigator, PlaceSelected, ReturnHome, ViewControl};
pub use places::Places;
