//! Landmark markers and the spot lights hanging over them

use bevy::prelude::*;
use overlook_core::{LandmarkShape, PlaceCatalog};
use tracing::info;

use crate::environment::hex_color;

/// Spot light intensity in lumens
const SPOTLIGHT_INTENSITY: f32 = 400_000.0;
const SPOTLIGHT_RANGE: f32 = 25.0;

/// The generated place catalog, shared with the navigator and the UI
#[derive(Debug, Clone, Resource, Deref)]
pub struct Places(pub PlaceCatalog);

/// Marker for a landmark mesh, carrying its catalog index
#[derive(Component)]
pub struct LandmarkMarker {
    pub index: usize,
}

pub struct PlacesPlugin;

impl Plugin for PlacesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_landmarks);
    }
}

fn landmark_mesh(shape: LandmarkShape) -> Mesh {
    match shape {
        LandmarkShape::Block => Cuboid::new(1.0, 3.0, 1.0).into(),
        LandmarkShape::Cone { segments } => Cone {
            radius: 2.0,
            height: 3.0,
        }
        .mesh()
        .resolution(segments)
        .into(),
        LandmarkShape::Spire { segments } => ConicalFrustum {
            radius_top: 0.25,
            radius_bottom: 2.0,
            height: 3.0,
        }
        .mesh()
        .resolution(segments)
        .into(),
    }
}

/// Shadow-casting light over a landmark
fn landmark_spotlight() -> SpotLight {
    SpotLight {
        intensity: SPOTLIGHT_INTENSITY,
        range: SPOTLIGHT_RANGE,
        shadows_enabled: true,
        ..default()
    }
}

fn spawn_landmarks(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    places: Res<Places>,
) {
    for (index, landmark) in places.landmarks().iter().enumerate() {
        let (Some(position), Some(light_position)) =
            (places.landmark_position(index), places.spotlight_position(index))
        else {
            continue;
        };

        commands.spawn((
            Mesh3d(meshes.add(landmark_mesh(landmark.shape).with_duplicated_vertices().with_computed_flat_normals())),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: hex_color(landmark.color),
                ..default()
            })),
            Transform::from_translation(position),
            LandmarkMarker { index },
            Name::new(PlaceCatalog::label(index)),
        ));

        commands.spawn((
            landmark_spotlight(),
            Transform::from_translation(light_position).looking_at(position, Vec3::Y),
        ));
    }
    info!(count = places.len(), "Spawned landmarks");
}
