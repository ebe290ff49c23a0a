//! Viewer configuration loading and validation

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::navigator::NavigatorSettings;
use crate::tween::Easing;
use crate::view_control::ViewControlSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Seed for place and terrain generation; derived from the clock when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub terrain: TerrainConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Start and "home" position
    #[serde(default = "default_start_position")]
    pub start_position: [f32; 3],
    #[serde(default)]
    pub look_at: [f32; 3],
    /// Yaw radians per viewport width dragged
    #[serde(default = "default_phi_speed")]
    pub phi_speed: f64,
    /// Pitch radians per viewport height dragged
    #[serde(default = "default_theta_speed")]
    pub theta_speed: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            start_position: default_start_position(),
            look_at: [0.0; 3],
            phi_speed: default_phi_speed(),
            theta_speed: default_theta_speed(),
        }
    }
}

fn default_fov() -> f32 {
    75.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}

fn default_start_position() -> [f32; 3] {
    [0.0, 10.0, 20.0]
}

fn default_phi_speed() -> f64 {
    3.0
}

fn default_theta_speed() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Height of the look-at point above a place
    #[serde(default = "default_eye_height")]
    pub eye_height: f32,
    /// Distance the camera stops short of a place
    #[serde(default = "default_standoff")]
    pub standoff: f32,
    #[serde(default = "default_rotation_ms")]
    pub rotation_ms: u64,
    #[serde(default = "default_translation_ms")]
    pub translation_ms: u64,
    #[serde(default = "default_rotation_easing")]
    pub rotation_easing: Easing,
    #[serde(default = "default_translation_easing")]
    pub translation_easing: Easing,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            eye_height: default_eye_height(),
            standoff: default_standoff(),
            rotation_ms: default_rotation_ms(),
            translation_ms: default_translation_ms(),
            rotation_easing: default_rotation_easing(),
            translation_easing: default_translation_easing(),
        }
    }
}

fn default_eye_height() -> f32 {
    2.0
}

fn default_standoff() -> f32 {
    10.0
}

fn default_rotation_ms() -> u64 {
    1000
}

fn default_translation_ms() -> u64 {
    3000
}

fn default_rotation_easing() -> Easing {
    Easing::SinusoidalInOut
}

fn default_translation_easing() -> Easing {
    Easing::QuadraticInOut
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// Number of places, including the origin
    #[serde(default = "default_place_count")]
    pub count: usize,
    /// Side of the square the random places are scattered over
    #[serde(default = "default_extent")]
    pub extent: f32,
    /// Height the landmark markers are drawn at
    #[serde(default = "default_landmark_height")]
    pub landmark_height: f32,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            count: default_place_count(),
            extent: default_extent(),
            landmark_height: default_landmark_height(),
        }
    }
}

fn default_place_count() -> usize {
    10
}

fn default_extent() -> f32 {
    800.0
}

fn default_landmark_height() -> f32 {
    7.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    #[serde(default = "default_terrain_size")]
    pub size: f32,
    /// Quads per side
    #[serde(default = "default_segments")]
    pub segments: u32,
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
    #[serde(default = "default_frequency")]
    pub frequency: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: default_terrain_size(),
            segments: default_segments(),
            amplitude: default_amplitude(),
            frequency: default_frequency(),
        }
    }
}

fn default_terrain_size() -> f32 {
    1000.0
}

fn default_segments() -> u32 {
    120
}

fn default_amplitude() -> f32 {
    10.0
}

fn default_frequency() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Clear colour, 24-bit RGB
    #[serde(default = "default_background")]
    pub background: u32,
    #[serde(default = "default_fog_color")]
    pub fog_color: u32,
    #[serde(default = "default_fog_start")]
    pub fog_start: f32,
    #[serde(default = "default_fog_end")]
    pub fog_end: f32,
    #[serde(default = "default_ambient_brightness")]
    pub ambient_brightness: f32,
    #[serde(default)]
    pub sun: SunConfig,
    #[serde(default)]
    pub sky: SkyConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            fog_color: default_fog_color(),
            fog_start: default_fog_start(),
            fog_end: default_fog_end(),
            ambient_brightness: default_ambient_brightness(),
            sun: SunConfig::default(),
            sky: SkyConfig::default(),
        }
    }
}

fn default_background() -> u32 {
    0xf1f2f4
}

fn default_fog_color() -> u32 {
    0xffffff
}

fn default_fog_start() -> f32 {
    5.0
}

fn default_fog_end() -> f32 {
    500.0
}

fn default_ambient_brightness() -> f32 {
    300.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunConfig {
    #[serde(default = "default_sun_radius")]
    pub radius: f32,
    #[serde(default = "default_sun_height")]
    pub height: f32,
    /// Radians per second
    #[serde(default = "default_sun_speed")]
    pub angular_speed: f32,
    #[serde(default = "default_sun_illuminance")]
    pub illuminance: f32,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            radius: default_sun_radius(),
            height: default_sun_height(),
            angular_speed: default_sun_speed(),
            illuminance: default_sun_illuminance(),
        }
    }
}

fn default_sun_radius() -> f32 {
    4.0
}

fn default_sun_height() -> f32 {
    4.0
}

fn default_sun_speed() -> f32 {
    0.3
}

fn default_sun_illuminance() -> f32 {
    8000.0
}

/// Procedural sky used as the image-based lighting environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyConfig {
    #[serde(default = "default_sky_zenith")]
    pub zenith: u32,
    #[serde(default = "default_background")]
    pub horizon: u32,
    #[serde(default = "default_sky_ground")]
    pub ground: u32,
    /// Luminance scale of the environment light
    #[serde(default = "default_sky_intensity")]
    pub intensity: f32,
    /// Texels along each cube face edge
    #[serde(default = "default_sky_resolution")]
    pub resolution: u32,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            zenith: default_sky_zenith(),
            horizon: default_background(),
            ground: default_sky_ground(),
            intensity: default_sky_intensity(),
            resolution: default_sky_resolution(),
        }
    }
}

fn default_sky_zenith() -> u32 {
    0x8fb4d9
}

fn default_sky_ground() -> u32 {
    0x6b6f5e
}

fn default_sky_intensity() -> f32 {
    900.0
}

fn default_sky_resolution() -> u32 {
    32
}

impl ViewerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = toml::from_str(content)?;
        config.validate()?;
        info!(
            places = config.places.count,
            segments = config.terrain.segments,
            seed = ?config.seed,
            "Loaded viewer config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)))
            }
        }

        if self.places.count == 0 {
            return Err(ConfigError::Invalid("places.count must be at least 1".into()));
        }
        if self.terrain.segments == 0 {
            return Err(ConfigError::Invalid("terrain.segments must be at least 1".into()));
        }
        positive("places.extent", f64::from(self.places.extent))?;
        positive("terrain.size", f64::from(self.terrain.size))?;
        positive("navigation.standoff", f64::from(self.navigation.standoff))?;
        positive("camera.phi_speed", self.camera.phi_speed)?;
        positive("camera.theta_speed", self.camera.theta_speed)?;
        positive("camera.fov_degrees", f64::from(self.camera.fov_degrees))?;
        positive("environment.sky.intensity", f64::from(self.environment.sky.intensity))?;
        if self.environment.sky.resolution == 0 {
            return Err(ConfigError::Invalid("environment.sky.resolution must be at least 1".into()));
        }
        if self.environment.fog_end <= self.environment.fog_start {
            return Err(ConfigError::Invalid("environment.fog_end must exceed fog_start".into()));
        }
        if self.camera.near <= 0.0 || self.camera.far <= self.camera.near {
            return Err(ConfigError::Invalid(format!(
                "camera clip planes must satisfy 0 < near < far, got {}..{}",
                self.camera.near, self.camera.far
            )));
        }
        Ok(())
    }

    pub fn view_control_settings(&self) -> ViewControlSettings {
        ViewControlSettings {
            phi_speed: self.camera.phi_speed,
            theta_speed: self.camera.theta_speed,
        }
    }

    pub fn navigator_settings(&self) -> NavigatorSettings {
        let nav = &self.navigation;
        NavigatorSettings {
            eye_height: nav.eye_height,
            standoff: nav.standoff,
            rotation_duration: Duration::from_millis(nav.rotation_ms),
            translation_duration: Duration::from_millis(nav.translation_ms),
            rotation_easing: nav.rotation_easing,
            translation_easing: nav.translation_easing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ViewerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.places.count, 10);
        assert_eq!(config.camera.start_position, [0.0, 10.0, 20.0]);
        assert_eq!(config.navigator_settings(), NavigatorSettings::default());
        assert_eq!(config.view_control_settings(), ViewControlSettings::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = ViewerConfig::from_toml_str(
            r#"
            seed = 77

            [navigation]
            standoff = 25.0
            translation_easing = "linear"

            [environment.sun]
            radius = 6.0
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(77));
        assert_eq!(config.navigation.standoff, 25.0);
        assert_eq!(config.navigation.rotation_ms, 1000);
        assert_eq!(config.navigation.translation_easing, Easing::Linear);
        assert_eq!(config.environment.sun.radius, 6.0);
        assert_eq!(config.environment.sun.height, 4.0);
        assert_eq!(config.environment.fog_end, 500.0);
        assert_eq!(config.environment.sky, SkyConfig::default());
    }

    #[test]
    fn test_sky_horizon_defaults_to_background() {
        let config = ViewerConfig::from_toml_str("[environment.sky]\nzenith = 0x336699").unwrap();
        assert_eq!(config.environment.sky.zenith, 0x336699);
        assert_eq!(config.environment.sky.horizon, config.environment.background);
        assert_eq!(config.environment.sky.resolution, 32);
    }

    #[test]
    fn test_rejects_invalid_values() {
        for doc in [
            "[places]\ncount = 0",
            "[terrain]\nsegments = 0",
            "[navigation]\nstandoff = 0.0",
            "[camera]\nphi_speed = -1.0",
            "[camera]\nnear = 10.0\nfar = 5.0",
            "[environment.sky]\nresolution = 0",
            "[environment.sky]\nintensity = -3.0",
        ] {
            let err = ViewerConfig::from_toml_str(doc).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{doc}: {err}");
        }
    }

    #[test]
    fn test_parse_error() {
        let err = ViewerConfig::from_toml_str("[places\ncount = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_durations_from_millis() {
        let config = ViewerConfig::from_toml_str("[navigation]\nrotation_ms = 250\ntranslation_ms = 0").unwrap();
        let settings = config.navigator_settings();
        assert_eq!(settings.rotation_duration, Duration::from_millis(250));
        assert_eq!(settings.translation_duration, Duration::ZERO);
    }
}
