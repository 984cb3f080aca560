//! Bevy application setup

use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};
use bevy::winit::WinitSettings;
use bevy_egui::EguiPlugin;
use dropview_core::overlay::palette;
use dropview_core::Config;

use crate::overlay::OverlayPlugin;
use crate::scene::{rgba8_color, ScenePlugin, SceneSettings, StartupAssets};

/// Build the app around already imported startup assets and run it to completion
pub fn run(config: &Config, startup: StartupAssets) -> AppExit {
    App::new()
        .insert_resource(ClearColor(rgba8_color(palette::RAYWHITE)))
        // Continuous rendering so the FPS counter stays meaningful
        .insert_resource(WinitSettings::default())
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: config.window.title.clone(),
                        resolution: WindowResolution::new(config.window.width, config.window.height),
                        present_mode: PresentMode::AutoVsync,
                        ..default()
                    }),
                    ..default()
                })
                // Logging is set up in main with our own subscriber
                .disable::<bevy::log::LogPlugin>(),
        )
        .add_plugins(EguiPlugin::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .insert_resource(SceneSettings {
            axis_scale: config.scene.axis_scale,
            exit_on_escape: config.scene.exit_on_escape,
            camera: config.camera.clone(),
        })
        .insert_resource(startup)
        .add_plugins(ScenePlugin)
        .add_plugins(OverlayPlugin)
        .run()
}
