//! In-viewport text panel for the selected annotation and index badges.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::editor::gesture::InteractionSession;
use crate::editor::mode::ModeController;
use crate::editor::overlay::LabelOverlay;
use crate::editor::params::CameraParams;
use crate::scene::ModelBounds;

use super::store::AnnotationStore;

/// Badge with index + 1 next to every icon
pub fn annotation_badges_ui(
    mut contexts: EguiContexts,
    controller: Res<ModeController>,
    overlay: Res<LabelOverlay>,
    camera: CameraParams,
    store: Res<AnnotationStore>,
) -> Result {
    if !controller.is_annotating() || store.is_empty() {
        return Ok(());
    }

    let ctx = contexts.ctx_mut()?;
    for (index, annotation) in store.iter().enumerate() {
        let Some(screen) = overlay.place(&camera, annotation.position) else {
            continue;
        };
        egui::Area::new(egui::Id::new(("annotation_badge", index)))
            .fixed_pos(egui::pos2(screen.x, screen.y))
            .pivot(egui::Align2::CENTER_CENTER)
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new((index + 1).to_string())
                        .strong()
                        .color(egui::Color32::BLACK),
                );
            });
    }

    Ok(())
}

/// Editable title/info panel hanging below the selected icon.
///
/// Records whether the pointer is over it so camera and placement input can
/// stand down.
pub fn annotation_text_panel_ui(
    mut contexts: EguiContexts,
    controller: Res<ModeController>,
    overlay: Res<LabelOverlay>,
    camera: CameraParams,
    bounds: Res<ModelBounds>,
    mut session: ResMut<InteractionSession>,
    mut store: ResMut<AnnotationStore>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let mut hovered = false;

    if let Some(index) = store.selected()
        && store.is_panel_visible(index, session.drag_in_progress(), controller.is_annotating())
        && let Some(annotation) = store.get(index)
        && let Some(screen) = overlay.place(
            &camera,
            annotation.position - Vec3::Y * bounds.text_panel_drop(),
        )
    {
        let mut title = annotation.title.clone();
        let mut info = annotation.info.clone();
        let mut title_changed = false;
        let mut info_changed = false;

        let response = egui::Area::new(egui::Id::new("annotation_text_panel"))
            .fixed_pos(egui::pos2(screen.x, screen.y))
            .pivot(egui::Align2::CENTER_TOP)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(240.0);
                    ui.label(egui::RichText::new(format!("#{}", index + 1)).weak());
                    title_changed = ui
                        .add(
                            egui::TextEdit::singleline(&mut title)
                                .hint_text("Title")
                                .desired_width(220.0),
                        )
                        .changed();
                    info_changed = ui
                        .add(
                            egui::TextEdit::multiline(&mut info)
                                .hint_text("Details")
                                .desired_rows(3)
                                .desired_width(220.0),
                        )
                        .changed();
                });
            });

        hovered = ctx
            .pointer_hover_pos()
            .is_some_and(|pos| response.response.rect.contains(pos));

        if title_changed {
            store.set_title(index, title);
        }
        if info_changed {
            store.set_info(index, info);
        }
    }

    if session.text_hovered() != hovered {
        session.set_text_hovered(hovered);
    }

    Ok(())
}
