//! Place catalog - navigable ground locations and their landmarks
//!
//! The catalog is generated once at scene setup and is read-only afterwards.
//! All but the last place are scattered randomly over a square area; the
//! last one always sits at the world origin.

use bevy_math::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::config::PlacesConfig;

/// Height of the spot light hanging over each landmark
pub const SPOTLIGHT_HEIGHT: f32 = 15.0;

/// Shape of the marker placed at a location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkShape {
    /// 1 x 3 x 1 box
    Block,
    /// Cone of radius 2, height 3
    Cone { segments: u32 },
    /// Conical frustum tapering from radius 2 to 0.25, height 3
    Spire { segments: u32 },
}

/// A navigable place and the marker drawn there
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    /// Ground-plane coordinate (x, z)
    pub location: Vec2,
    pub shape: LandmarkShape,
    /// 24-bit RGB colour
    pub color: u32,
}

/// Ordered, fixed list of places
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCatalog {
    landmarks: Vec<Landmark>,
    landmark_height: f32,
}

impl PlaceCatalog {
    /// Generate `count` places over a square of side `extent` centred on the
    /// origin. The final place is always the origin itself.
    pub fn generate<R: Rng + ?Sized>(count: usize, extent: f32, landmark_height: f32, rng: &mut R) -> Self {
        let mut landmarks = Vec::with_capacity(count);
        for _ in 0..count.saturating_sub(1) {
            let location = Vec2::new(random_coordinate(rng, extent), random_coordinate(rng, extent));
            landmarks.push(random_landmark(rng, location));
        }
        if count > 0 {
            landmarks.push(random_landmark(rng, Vec2::ZERO));
        }
        Self {
            landmarks,
            landmark_height,
        }
    }

    /// Deterministic catalog for a configuration and seed
    pub fn from_config(config: &PlacesConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let catalog = Self::generate(config.count, config.extent, config.landmark_height, &mut rng);
        info!(seed, places = catalog.len(), "Generated place catalog");
        catalog
    }

    /// Catalog with plain block landmarks at fixed locations
    pub fn from_locations(locations: impl IntoIterator<Item = Vec2>, landmark_height: f32) -> Self {
        Self {
            landmarks: locations
                .into_iter()
                .map(|location| Landmark {
                    location,
                    shape: LandmarkShape::Block,
                    color: 0x808080,
                })
                .collect(),
            landmark_height,
        }
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Ground coordinates in catalog order
    pub fn locations(&self) -> Vec<Vec2> {
        self.landmarks.iter().map(|l| l.location).collect()
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn landmark_height(&self) -> f32 {
        self.landmark_height
    }

    /// Display label for a place
    pub fn label(index: usize) -> String {
        format!("Place {}", index)
    }

    /// World position of the landmark marker at `index`
    pub fn landmark_position(&self, index: usize) -> Option<Vec3> {
        self.get(index)
            .map(|l| Vec3::new(l.location.x, self.landmark_height, l.location.y))
    }

    /// World position of the spot light over the landmark at `index`
    pub fn spotlight_position(&self, index: usize) -> Option<Vec3> {
        self.get(index)
            .map(|l| Vec3::new(l.location.x - 1.0, SPOTLIGHT_HEIGHT, l.location.y))
    }
}

fn random_coordinate<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> f32 {
    (rng.random::<f32>() * extent - extent / 2.0).floor()
}

fn random_landmark<R: Rng + ?Sized>(rng: &mut R, location: Vec2) -> Landmark {
    let shape = match rng.random_range(0..3u8) {
        0 => LandmarkShape::Block,
        1 => LandmarkShape::Cone {
            segments: rng.random_range(5..=23),
        },
        _ => LandmarkShape::Spire {
            segments: rng.random_range(5..=23),
        },
    };
    Landmark {
        location,
        shape,
        color: rng.random_range(0..=0xff_ffff),
    }
}
