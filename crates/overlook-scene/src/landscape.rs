//! Terrain mesh and the orbiting sun

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use overlook_core::{GradientNoise, Heightfield, SunOrbit};
use tracing::info;

use crate::SceneSettings;

const TERRAIN_COLOR: u32 = 0xe3e5e3;

/// Directional light moving along a [`SunOrbit`]
#[derive(Component, Deref, DerefMut)]
pub struct Sun(pub SunOrbit);

#[derive(Component)]
pub struct Terrain;

pub struct LandscapePlugin;

impl Plugin for LandscapePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_landscape)
            .add_systems(Update, orbit_sun);
    }
}

fn terrain_mesh(field: &Heightfield) -> Mesh {
    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, field.triangle_positions())
        .with_computed_flat_normals()
}

fn setup_landscape(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<SceneSettings>,
) {
    let noise = GradientNoise::new(settings.seed);
    let field = Heightfield::generate(&settings.config.terrain, &noise);
    info!(segments = field.segments(), size = field.size(), "Generated terrain");

    commands.spawn((
        Mesh3d(meshes.add(terrain_mesh(&field))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: crate::environment::hex_color(TERRAIN_COLOR),
            perceptual_roughness: 0.8,
            metallic: 0.5,
            double_sided: true,
            cull_mode: None,
            ..default()
        })),
        Transform::default(),
        Terrain,
    ));

    let sun_config = &settings.config.environment.sun;
    let orbit = SunOrbit::new(sun_config);
    commands.spawn((
        DirectionalLight {
            illuminance: sun_config.illuminance,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(orbit.position()).looking_at(Vec3::ZERO, Vec3::Y),
        Sun(orbit),
    ));
}

fn orbit_sun(time: Res<Time>, mut suns: Query<(&mut Sun, &mut Transform)>) {
    for (mut sun, mut transform) in &mut suns {
        let position = sun.advance(time.delta());
        *transform = Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y);
    }
}
