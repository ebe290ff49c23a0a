//! First-person camera, pointer forwarding, and place navigation systems
//!
//! The camera `Transform` is copied into a [`CameraPose`] by each system
//! that drives it and written back afterwards. The systems are chained, so
//! exactly one of them touches the transform at a time.

use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};
use bevy_egui::EguiContexts;
use overlook_core::navigator;
use overlook_core::{CameraPose, CameraViewControl, PlaceNavigator, PointerEvent, Viewport};
use tracing::{info, warn};

use crate::environment::{hex_color, SkyEnvironment};
use crate::SceneSettings;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Drag-to-look control for the main camera
#[derive(Debug, Clone, Resource, Deref, DerefMut)]
pub struct ViewControl(pub CameraViewControl);

/// Fly-to-place animation driver
#[derive(Debug, Clone, Resource, Deref, DerefMut)]
pub struct Navigator(pub PlaceNavigator);

/// Request to fly to the place with this catalog index
#[derive(Message, Debug, Clone, Copy)]
pub struct PlaceSelected {
    pub index: usize,
}

/// Request to teleport back to the start position
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ReturnHome;

/// Published once per completed navigation
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct NavigationFinished {
    pub place: usize,
    pub position: Vec3,
}

impl From<navigator::NavigationFinished> for NavigationFinished {
    fn from(finished: navigator::NavigationFinished) -> Self {
        Self {
            place: finished.place,
            position: finished.position,
        }
    }
}

/// Plugin for the camera and its control systems
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PlaceSelected>()
            .add_message::<ReturnHome>()
            .add_message::<NavigationFinished>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (
                    forward_pointer_input,
                    handle_navigation_requests,
                    update_view_control,
                    update_navigator,
                )
                    .chain(),
            );
    }
}

fn pose_of(transform: &Transform) -> CameraPose {
    CameraPose::new(transform.translation, transform.rotation)
}

fn store_pose(transform: &mut Transform, pose: CameraPose) {
    transform.translation = pose.position;
    transform.rotation = pose.orientation;
}

fn home_pose(settings: &SceneSettings) -> CameraPose {
    let camera = &settings.config.camera;
    CameraPose::looking_at(Vec3::from(camera.start_position), Vec3::from(camera.look_at))
}

/// Teleport to the start pose and continue manual control from it
fn return_home(pose: &mut CameraPose, control: &mut CameraViewControl, settings: &SceneSettings) {
    *pose = home_pose(settings);
    control.seed_rotation(pose.orientation);
    control.apply(pose);
}

fn setup_camera(
    mut commands: Commands,
    settings: Res<SceneSettings>,
    sky: Res<SkyEnvironment>,
    mut control: ResMut<ViewControl>,
) {
    let camera = &settings.config.camera;
    let env = &settings.config.environment;
    let pose = home_pose(&settings);

    let mut transform = Transform::default();
    store_pose(&mut transform, pose);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: camera.fov_degrees.to_radians(),
            near: camera.near,
            far: camera.far,
            ..default()
        }),
        DistanceFog {
            color: hex_color(env.fog_color),
            falloff: FogFalloff::Linear {
                start: env.fog_start,
                end: env.fog_end,
            },
            ..default()
        },
        sky.light(),
        transform,
        MainCamera,
    ));

    // Continue from the start orientation instead of snapping to zero angles
    control.seed_rotation(pose.orientation);
    control.activate();
}

/// Translate mouse input into pointer events for the view control.
///
/// Presses are dropped while egui wants the pointer; moves and releases are
/// always forwarded so a drag that wanders over a panel still ends.
fn forward_pointer_input(
    mut control: ResMut<ViewControl>,
    mut cursor_moved: MessageReader<CursorMoved>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut contexts: EguiContexts,
) {
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);
    let cursor = windows.single().ok().and_then(Window::cursor_position);

    if mouse_button.just_pressed(MouseButton::Left) && !egui_wants_pointer {
        if let Some(position) = cursor {
            control.handle_pointer(PointerEvent::Down(position));
        }
    }

    for moved in cursor_moved.read() {
        control.handle_pointer(PointerEvent::Move(moved.position));
    }

    if mouse_button.just_released(MouseButton::Left) {
        control.handle_pointer(PointerEvent::Up(cursor.unwrap_or_default()));
    }
}

fn handle_navigation_requests(
    mut selections: MessageReader<PlaceSelected>,
    mut home_requests: MessageReader<ReturnHome>,
    mut navigator: ResMut<Navigator>,
    mut control: ResMut<ViewControl>,
    settings: Res<SceneSettings>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(mut transform) = camera_query.single_mut() else {
        return;
    };
    let mut pose = pose_of(&transform);

    if home_requests.read().count() > 0 {
        navigator.cancel(&mut control.0);
        return_home(&mut pose, &mut control.0, &settings);
        info!("Camera returned home");
    }

    for selection in selections.read() {
        if !navigator.select_place(selection.index, &pose, &mut control.0) {
            warn!(index = selection.index, "Place selection ignored");
        }
    }

    store_pose(&mut transform, pose);
}

fn update_view_control(
    mut control: ResMut<ViewControl>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok(mut transform) = camera_query.single_mut() else {
        return;
    };

    let mut pose = pose_of(&transform);
    if control.update(Viewport::new(window.width(), window.height()), &mut pose) {
        store_pose(&mut transform, pose);
    }
}

fn update_navigator(
    time: Res<Time>,
    mut navigator: ResMut<Navigator>,
    mut control: ResMut<ViewControl>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut finished: MessageWriter<NavigationFinished>,
) {
    if !navigator.is_navigating() {
        return;
    }
    let Ok(mut transform) = camera_query.single_mut() else {
        return;
    };

    let mut pose = pose_of(&transform);
    let done = navigator.update(time.delta(), &mut pose, &mut control.0);
    store_pose(&mut transform, pose);

    if let Some(done) = done {
        finished.write(done.into());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::time::TimeUpdateStrategy;
    use overlook_core::{NavigatorSettings, ViewerConfig};

    use super::*;

    const FRAME: Duration = Duration::from_millis(100);

    #[derive(Resource, Default)]
    struct Arrivals(Vec<NavigationFinished>);

    fn record_arrivals(mut finished: MessageReader<NavigationFinished>, mut arrivals: ResMut<Arrivals>) {
        arrivals.0.extend(finished.read().copied());
    }

    fn settings() -> SceneSettings {
        SceneSettings {
            config: ViewerConfig::default(),
            seed: 1,
        }
    }

    /// Headless app running the request, control and navigator systems
    fn test_app(locations: Vec<Vec2>) -> App {
        let settings = settings();
        let pose = home_pose(&settings);
        let mut control = CameraViewControl::new(settings.config.view_control_settings());
        control.seed_rotation(pose.orientation);
        control.activate();
        let mut transform = Transform::default();
        store_pose(&mut transform, pose);

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
            .insert_resource(Navigator(PlaceNavigator::new(locations, NavigatorSettings::default())))
            .insert_resource(ViewControl(control))
            .insert_resource(settings)
            .init_resource::<Arrivals>()
            .add_message::<PlaceSelected>()
            .add_message::<ReturnHome>()
            .add_message::<NavigationFinished>()
            .add_systems(
                Update,
                (
                    handle_navigation_requests,
                    update_view_control,
                    update_navigator,
                    record_arrivals,
                )
                    .chain(),
            );
        app.world_mut().spawn((transform, MainCamera));
        app
    }

    fn camera_transform(app: &mut App) -> Transform {
        let mut query = app.world_mut().query_filtered::<&Transform, With<MainCamera>>();
        *query.single(app.world()).unwrap()
    }

    fn run_frames(app: &mut App, frames: usize) {
        for _ in 0..frames {
            app.update();
        }
    }

    #[test]
    fn test_pose_round_trip() {
        let pose = CameraPose::looking_at(Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 0.0, 9.0));
        let mut transform = Transform::from_scale(Vec3::splat(2.0));
        store_pose(&mut transform, pose);
        assert_eq!(pose_of(&transform), pose);
        assert_eq!(transform.scale, Vec3::splat(2.0));
    }

    #[test]
    fn test_place_selected_publishes_one_arrival() {
        let mut app = test_app(vec![Vec2::new(100.0, 200.0)]);
        app.world_mut()
            .resource_mut::<Messages<PlaceSelected>>()
            .write(PlaceSelected { index: 0 });

        // Rotation and translation take four seconds; run well past that
        run_frames(&mut app, 60);

        let arrivals = &app.world().resource::<Arrivals>().0;
        assert_eq!(arrivals.len(), 1);
        let arrival = arrivals[0];
        assert_eq!(arrival.place, 0);
        let target = Vec3::new(100.0, 2.0, 200.0);
        let ground = Vec2::new(arrival.position.x - target.x, arrival.position.z - target.z).length();
        assert!((ground - 10.0).abs() < 1e-2);

        // The camera was left where the arrival says
        let transform = camera_transform(&mut app);
        assert_eq!(transform.translation, arrival.position);
        assert!(!app.world().resource::<Navigator>().is_navigating());
        assert!(app.world().resource::<ViewControl>().is_active());
    }

    #[test]
    fn test_unknown_place_publishes_nothing() {
        let mut app = test_app(vec![Vec2::new(100.0, 200.0)]);
        let start = camera_transform(&mut app);
        app.world_mut()
            .resource_mut::<Messages<PlaceSelected>>()
            .write(PlaceSelected { index: 7 });
        run_frames(&mut app, 10);

        assert!(app.world().resource::<Arrivals>().0.is_empty());
        assert_eq!(camera_transform(&mut app), start);
        assert!(app.world().resource::<ViewControl>().is_active());
    }

    #[test]
    fn test_return_home_restores_start_pose() {
        let mut app = test_app(vec![Vec2::new(100.0, 200.0)]);
        app.world_mut()
            .resource_mut::<Messages<PlaceSelected>>()
            .write(PlaceSelected { index: 0 });
        run_frames(&mut app, 20);
        assert!(app.world().resource::<Navigator>().is_navigating());

        app.world_mut().resource_mut::<Messages<ReturnHome>>().write(ReturnHome);
        run_frames(&mut app, 50);

        // Cancelled: no arrival, back at the start pose, manual control on
        assert!(app.world().resource::<Arrivals>().0.is_empty());
        let home = home_pose(&settings());
        let transform = camera_transform(&mut app);
        assert_eq!(transform.translation, home.position);
        assert!(transform.rotation.dot(home.orientation).abs() > 1.0 - 1e-5);

        // The control continues from the restored view without a jump
        let control = app.world().resource::<ViewControl>();
        assert!(control.is_active());
        assert!(control.orientation().dot(transform.rotation).abs() > 1.0 - 1e-5);
    }
}
