use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::editor::mode::ModeController;
use crate::editor::overlay::LabelOverlay;
use crate::editor::params::CameraParams;

use super::state::MeasureTool;

/// Distance label at the midpoint of every visible segment
pub fn measurement_labels_ui(
    mut contexts: EguiContexts,
    controller: Res<ModeController>,
    overlay: Res<LabelOverlay>,
    camera: CameraParams,
    tool: Res<MeasureTool>,
) -> Result {
    if !controller.is_measuring() {
        return Ok(());
    }

    let ctx = contexts.ctx_mut()?;
    for segment in tool.segments() {
        let Some(screen) = overlay.place(&camera, segment.label_anchor()) else {
            continue;
        };

        egui::Area::new(egui::Id::new(("measurement_label", segment.id)))
            .fixed_pos(egui::pos2(screen.x, screen.y))
            .pivot(egui::Align2::CENTER_BOTTOM)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .inner_margin(egui::Margin::symmetric(6, 2))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(segment.label())
                                .monospace()
                                .color(egui::Color32::from_rgb(0xe0, 0x14, 0x14)),
                        );
                    });
            });
    }

    Ok(())
}
