//! Global scene environment: background, ambient light, and sky lighting

use bevy::asset::RenderAssetUsages;
use bevy::color::Mix;
use bevy::light::EnvironmentMapLight;
use bevy::prelude::*;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureFormat, TextureViewDescriptor, TextureViewDimension,
};
use overlook_core::config::SkyConfig;
use tracing::info;

use crate::SceneSettings;

/// Cube map layers, in +X, -X, +Y, -Y, +Z, -Z order
const CUBE_FACES: u32 = 6;

pub struct EnvironmentPlugin;

impl Plugin for EnvironmentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, setup_environment);
    }
}

/// Procedural sky cube map shared by the cameras as their environment light
#[derive(Debug, Clone, Resource)]
pub struct SkyEnvironment {
    pub cubemap: Handle<Image>,
    pub intensity: f32,
}

impl SkyEnvironment {
    pub fn light(&self) -> EnvironmentMapLight {
        EnvironmentMapLight {
            diffuse_map: self.cubemap.clone(),
            specular_map: self.cubemap.clone(),
            intensity: self.intensity,
            ..default()
        }
    }
}

fn setup_environment(mut commands: Commands, settings: Res<SceneSettings>, mut images: ResMut<Assets<Image>>) {
    let env = &settings.config.environment;
    commands.insert_resource(ClearColor(hex_color(env.background)));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: env.ambient_brightness,
        ..default()
    });

    commands.insert_resource(SkyEnvironment {
        cubemap: images.add(sky_cubemap(&env.sky)),
        intensity: env.sky.intensity,
    });
    info!(resolution = env.sky.resolution, "Generated sky environment map");
}

/// Convert a 24-bit `0xRRGGBB` value to an sRGB colour
pub fn hex_color(rgb: u32) -> Color {
    Color::srgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// Unit direction through `(u, v)` in `[-1, 1]` on a cube face
fn cube_direction(face: u32, u: f32, v: f32) -> Vec3 {
    match face {
        0 => Vec3::new(1.0, -v, -u),
        1 => Vec3::new(-1.0, -v, u),
        2 => Vec3::new(u, 1.0, v),
        3 => Vec3::new(u, -1.0, -v),
        4 => Vec3::new(u, -v, 1.0),
        _ => Vec3::new(-u, -v, -1.0),
    }
    .normalize()
}

/// Horizon blends up into the zenith and quickly down into the ground
fn sky_color(sky: &SkyConfig, direction: Vec3) -> Srgba {
    let horizon = hex_color(sky.horizon).to_srgba();
    if direction.y >= 0.0 {
        horizon.mix(&hex_color(sky.zenith).to_srgba(), direction.y.sqrt())
    } else {
        horizon.mix(&hex_color(sky.ground).to_srgba(), (-direction.y * 4.0).min(1.0))
    }
}

/// RGBA8 texels of all six faces, face after face, rows top to bottom
fn sky_cubemap_data(sky: &SkyConfig) -> Vec<u8> {
    let size = sky.resolution.max(1);
    let mut data = Vec::with_capacity((size * size * CUBE_FACES * 4) as usize);
    for face in 0..CUBE_FACES {
        for row in 0..size {
            let v = (row as f32 + 0.5) / size as f32 * 2.0 - 1.0;
            for col in 0..size {
                let u = (col as f32 + 0.5) / size as f32 * 2.0 - 1.0;
                data.extend_from_slice(&sky_color(sky, cube_direction(face, u, v)).to_u8_array());
            }
        }
    }
    data
}

fn sky_cubemap(sky: &SkyConfig) -> Image {
    let size = sky.resolution.max(1);
    let mut image = Image::new(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: CUBE_FACES,
        },
        TextureDimension::D2,
        sky_cubemap_data(sky),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });
    image
}
