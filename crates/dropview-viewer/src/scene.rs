//! Camera, file drops, click selection and gizmo drawing

use bevy::prelude::*;
use bevy::window::{FileDragAndDrop, PrimaryWindow};
use bevy_egui::EguiContexts;
use dropview_core::config::CameraConfig;
use dropview_core::overlay::palette;
use dropview_core::{axis_segments, DropOutcome, ModelData, SceneAsset, TextureData};
use std::path::PathBuf;
use tracing::info;

use crate::backend::{ModelHandles, SceneAssets};

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Model and texture imported before the window opened
#[derive(Resource)]
pub struct StartupAssets {
    pub model: ModelData,
    pub texture: TextureData,
}

/// Scene options taken from the configuration file
#[derive(Debug, Clone, Resource)]
pub struct SceneSettings {
    pub axis_scale: f32,
    pub exit_on_escape: bool,
    pub camera: CameraConfig,
}

/// The scene currently shown; `None` before startup and after release
#[derive(Resource, Default)]
pub struct ActiveScene(pub Option<SceneAsset<ModelHandles, Handle<Image>>>);

impl ActiveScene {
    pub fn is_selected(&self) -> bool {
        self.0.as_ref().is_some_and(SceneAsset::is_selected)
    }
}

pub fn rgba8_color(c: [u8; 4]) -> Color {
    Color::srgba_u8(c[0], c[1], c[2], c[3])
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveScene>()
            .add_systems(Startup, (setup_camera, setup_scene))
            .add_systems(
                Update,
                (
                    exit_on_escape,
                    handle_file_drops,
                    handle_model_click,
                    (draw_axes, draw_selection_bounds),
                )
                    .chain(),
            )
            .add_systems(Last, release_scene_on_exit);
    }
}

fn setup_camera(mut commands: Commands, settings: Res<SceneSettings>) {
    let camera = &settings.camera;
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: camera.fovy_degrees.to_radians(),
            ..default()
        }),
        Transform::from_translation(Vec3::from_array(camera.position))
            .looking_at(Vec3::from_array(camera.target), Vec3::from_array(camera.up)),
        MainCamera,
    ));
}

/// Upload the startup assets and make them the active scene
fn setup_scene(
    mut backend: SceneAssets,
    startup: Option<Res<StartupAssets>>,
    mut active: ResMut<ActiveScene>,
) {
    let Some(startup) = startup else {
        return;
    };

    active.0 = Some(SceneAsset::new(&mut backend, &startup.model, &startup.texture));
    // CPU copies are no longer needed once uploaded
    backend.commands.remove_resource::<StartupAssets>();
}

fn exit_on_escape(
    settings: Res<SceneSettings>,
    keys: Res<ButtonInput<KeyCode>>,
    mut exit: MessageWriter<AppExit>,
) {
    if settings.exit_on_escape && keys.just_pressed(KeyCode::Escape) {
        info!("Escape pressed, exiting");
        exit.write(AppExit::Success);
    }
}

/// Gather this frame's dropped files and hand them to the scene as one drop
fn handle_file_drops(
    mut drops: MessageReader<FileDragAndDrop>,
    mut active: ResMut<ActiveScene>,
    mut backend: SceneAssets,
) {
    let paths: Vec<PathBuf> = drops
        .read()
        .filter_map(|event| match event {
            FileDragAndDrop::DroppedFile { path_buf, .. } => Some(path_buf.clone()),
            _ => None,
        })
        .collect();

    if paths.is_empty() {
        return;
    }
    let Some(scene) = active.0.as_mut() else {
        return;
    };

    match scene.handle_drop(&mut backend, &paths) {
        DropOutcome::ModelReplaced { path } => info!(path = %path.display(), "Loaded dropped model"),
        DropOutcome::TextureReplaced { path } => info!(path = %path.display(), "Loaded dropped texture"),
        // Already logged by the scene
        DropOutcome::Ignored(_) | DropOutcome::Failed(_) => {}
    }
}

fn handle_model_click(
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut active: ResMut<ActiveScene>,
    mut contexts: EguiContexts,
) {
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }

    // Check if egui wants the pointer
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);
    if egui_wants_pointer {
        return;
    }

    let Some(scene) = active.0.as_mut() else {
        return;
    };

    let ray = windows
        .single()
        .ok()
        .and_then(Window::cursor_position)
        .zip(camera_query.single().ok())
        .and_then(|(cursor, (camera, camera_transform))| {
            camera.viewport_to_world(camera_transform, cursor).ok()
        });

    scene.handle_click(ray);
}

fn draw_axes(mut gizmos: Gizmos, settings: Res<SceneSettings>) {
    for segment in axis_segments(settings.axis_scale) {
        let [start, end] = segment.vertices();
        gizmos.line(start, end, rgba8_color(segment.axis.color()));
    }
}

fn draw_selection_bounds(mut gizmos: Gizmos, active: Res<ActiveScene>) {
    let Some(scene) = active.0.as_ref() else {
        return;
    };
    if !scene.is_selected() {
        return;
    }

    let bounds = scene.bounds();
    gizmos.cuboid(
        Transform::from_translation(bounds.center()).with_scale(bounds.size()),
        rgba8_color(palette::GREEN),
    );
}

/// Release the scene's assets once, on the frame the app is told to exit
fn release_scene_on_exit(
    mut exit: MessageReader<AppExit>,
    mut active: ResMut<ActiveScene>,
    mut backend: SceneAssets,
) {
    if exit.is_empty() {
        return;
    }
    exit.clear();

    if let Some(scene) = active.0.take() {
        scene.release(&mut backend);
        info!("Scene released");
    }
}
