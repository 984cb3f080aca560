//! Screen-space text overlay using bevy_egui

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use dropview_core::overlay::{self, Corner, OverlayText, Rgba8, MARGIN};

use crate::scene::ActiveScene;

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(EguiPrimaryContextPass, overlay_system);
    }
}

fn color32(c: Rgba8) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

/// Anchor and inward offset for a screen corner
fn corner_anchor(corner: Corner) -> (egui::Align2, egui::Vec2) {
    match corner {
        Corner::TopLeft => (egui::Align2::LEFT_TOP, egui::vec2(MARGIN, MARGIN)),
        Corner::TopRight => (egui::Align2::RIGHT_TOP, egui::vec2(-MARGIN, MARGIN)),
        Corner::BottomLeft => (egui::Align2::LEFT_BOTTOM, egui::vec2(MARGIN, -MARGIN)),
        Corner::BottomRight => (egui::Align2::RIGHT_BOTTOM, egui::vec2(-MARGIN, -MARGIN)),
    }
}

fn draw_text(ctx: &egui::Context, id: &str, text: &str, corner: Corner, size: u16, color: Rgba8) {
    let (align, offset) = corner_anchor(corner);
    egui::Area::new(egui::Id::new(id))
        .anchor(align, offset)
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(text).size(f32::from(size)).color(color32(color)));
        });
}

fn overlay_system(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
    active: Res<ActiveScene>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    for OverlayText {
        text,
        corner,
        size,
        color,
    } in overlay::overlay_texts(active.is_selected())
    {
        draw_text(ctx, text, text, corner, size, color);
    }

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0)
        .round() as u32;
    draw_text(
        ctx,
        "fps",
        &overlay::fps_label(fps),
        overlay::FPS_CORNER,
        overlay::FPS_SIZE,
        overlay::fps_color(fps),
    );
}
