//! Procedural landscape: gradient noise, terrain heightfield, sun orbit

use std::time::Duration;

use bevy_math::Vec3;
use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::config::{SunConfig, TerrainConfig};

/// Seeded 2D Perlin gradient noise.
///
/// Output lies roughly in `[-1, 1]` and is exactly zero on integer lattice
/// points. Scaling is left to the caller, the field is sampled at unit
/// frequency.
pub struct GradientNoise {
    seed: u64,
    noise: FastNoiseLite,
}

impl GradientNoise {
    pub fn new(seed: u64) -> Self {
        // Fold the high half in so seeds differing only above bit 31 still differ
        let mut noise = FastNoiseLite::with_seed((seed ^ (seed >> 32)) as i32);
        noise.set_noise_type(Some(NoiseType::Perlin));
        noise.set_frequency(Some(1.0));
        Self { seed, noise }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sample the noise field at `(x, y)`
    pub fn get(&self, x: f32, y: f32) -> f32 {
        self.noise.get_noise_2d(x, y)
    }
}

impl std::fmt::Debug for GradientNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradientNoise").field("seed", &self.seed).finish_non_exhaustive()
    }
}

/// Square height grid centred on the origin, heights along +Y
#[derive(Debug, Clone, PartialEq)]
pub struct Heightfield {
    size: f32,
    segments: u32,
    /// `(segments + 1)^2` heights, row-major with rows along +Z
    heights: Vec<f32>,
}

impl Heightfield {
    pub fn generate(config: &TerrainConfig, noise: &GradientNoise) -> Self {
        let segments = config.segments.max(1);
        let step = config.size / segments as f32;
        let half = config.size / 2.0;
        let side = segments as usize + 1;

        let mut heights = Vec::with_capacity(side * side);
        for row in 0..side {
            let z = -half + row as f32 * step;
            for col in 0..side {
                let x = -half + col as f32 * step;
                heights.push(noise.get(x * config.frequency, z * config.frequency) * config.amplitude);
            }
        }

        Self {
            size: config.size,
            segments,
            heights,
        }
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// World position of grid vertex `(col, row)`
    pub fn vertex(&self, col: u32, row: u32) -> Option<Vec3> {
        if col > self.segments || row > self.segments {
            return None;
        }
        let step = self.size / self.segments as f32;
        let half = self.size / 2.0;
        let side = self.segments as usize + 1;
        let height = self.heights[row as usize * side + col as usize];
        Some(Vec3::new(-half + col as f32 * step, height, -half + row as f32 * step))
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Non-indexed triangle list, two upward-facing triangles per cell.
    /// Every triangle owns its vertices so flat normals stay per face.
    pub fn triangle_positions(&self) -> Vec<[f32; 3]> {
        let mut positions = Vec::with_capacity(self.segments as usize * self.segments as usize * 6);
        for row in 0..self.segments {
            for col in 0..self.segments {
                let corners = [
                    self.vertex(col, row),
                    self.vertex(col, row + 1),
                    self.vertex(col + 1, row),
                    self.vertex(col + 1, row + 1),
                ];
                let [Some(p00), Some(p01), Some(p10), Some(p11)] = corners else {
                    continue;
                };
                for p in [p00, p01, p10, p10, p01, p11] {
                    positions.push(p.to_array());
                }
            }
        }
        positions
    }
}

/// Directional light circling the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunOrbit {
    radius: f32,
    height: f32,
    /// Radians per second
    angular_speed: f32,
    angle: f32,
}

impl SunOrbit {
    pub fn new(config: &SunConfig) -> Self {
        Self {
            radius: config.radius,
            height: config.height,
            angular_speed: config.angular_speed,
            angle: 0.0,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.angle.sin() * self.radius, self.height, self.angle.cos() * self.radius)
    }

    /// Step the orbit and return the new light position
    pub fn advance(&mut self, dt: Duration) -> Vec3 {
        self.angle = (self.angle + self.angular_speed * dt.as_secs_f32()) % std::f32::consts::TAU;
        self.position()
    }
}
