use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::editor::{
    AnnotationStore, InteractionMode, MeasureTool, ModeController, SetLightingEditRequest,
    SetModeRequest,
};

/// Top toolbar: mode tabs on the left, ruler and status on the right
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    controller: Res<ModeController>,
    store: Res<AnnotationStore>,
    tool: Res<MeasureTool>,
    mut mode_requests: MessageWriter<SetModeRequest>,
    mut lighting_requests: MessageWriter<SetLightingEditRequest>,
) -> Result {
    egui::TopBottomPanel::top("main_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                let viewing = controller.mode() == InteractionMode::None && !controller.lighting_edit();
                if tab_button(ui, "View", viewing, "Orbit only (Esc)").clicked() {
                    mode_requests.write(SetModeRequest {
                        mode: InteractionMode::None,
                    });
                    lighting_requests.write(SetLightingEditRequest { enabled: false });
                }

                if tab_button(
                    ui,
                    "Annotations",
                    controller.is_annotating(),
                    "Double-click the model to pin a note (A)",
                )
                .clicked()
                {
                    mode_requests.write(SetModeRequest {
                        mode: controller.toggled(InteractionMode::Annotating),
                    });
                }

                if tab_button(ui, "Lighting", controller.lighting_edit(), "Lighting edit").clicked() {
                    lighting_requests.write(SetLightingEditRequest {
                        enabled: !controller.lighting_edit(),
                    });
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    // The ruler is part of the viewing HUD, not the annotation workflow
                    if !controller.is_annotating() {
                        let ruler = egui::Button::new(egui::RichText::new("Ruler").size(14.0))
                            .min_size(egui::vec2(0.0, 28.0))
                            .selected(controller.is_measuring());
                        if ui
                            .add(ruler)
                            .on_hover_text("Click twice on the model to measure (M)")
                            .clicked()
                        {
                            mode_requests.write(SetModeRequest {
                                mode: controller.toggled(InteractionMode::Measuring),
                            });
                        }
                    }

                    ui.add_space(8.0);
                    match controller.mode() {
                        InteractionMode::Annotating => {
                            ui.label(format!("{}/{} annotations", store.len(), store.capacity()));
                        }
                        InteractionMode::Measuring => {
                            let status = match tool.drawing() {
                                Some(segment) => format!("Measuring: {}", segment.label()),
                                None => format!("{} measurements", tool.finished().len()),
                            };
                            ui.label(status);
                        }
                        InteractionMode::None => {}
                    }
                });
            });
        });
    Ok(())
}

fn tab_button(ui: &mut egui::Ui, label: &str, selected: bool, hint: &str) -> egui::Response {
    let button = egui::Button::new(egui::RichText::new(label).size(14.0).strong())
        .min_size(egui::vec2(0.0, 28.0))
        .selected(selected);
    ui.add(button).on_hover_text(hint)
}
