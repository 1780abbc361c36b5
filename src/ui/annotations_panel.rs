//! Side panel listing annotations while annotation mode is active.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::editor::{AnnotationStore, ModeController};

/// Edits requested from the list this frame
#[derive(Debug, Default)]
struct PanelEdits {
    select: Option<usize>,
    delete: Option<usize>,
    title: Option<(usize, String)>,
    info: Option<(usize, String)>,
}

pub fn annotations_panel_ui(
    mut contexts: EguiContexts,
    controller: Res<ModeController>,
    mut store: ResMut<AnnotationStore>,
) -> Result {
    if !controller.is_annotating() {
        return Ok(());
    }

    let mut edits = PanelEdits::default();

    egui::SidePanel::left("annotations_panel")
        .default_width(260.0)
        .resizable(true)
        .show(contexts.ctx_mut()?, |ui| {
            ui.heading(format!("Annotations ({}/{})", store.len(), store.capacity()));
            ui.separator();

            if store.is_empty() {
                ui.label(egui::RichText::new("Double-click the model to add one").weak());
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for (index, annotation) in store.iter().enumerate() {
                    let selected = store.selected() == Some(index);
                    let highlighted = store.is_highlighted_in_list(index);

                    let mut frame = egui::Frame::group(ui.style());
                    if highlighted {
                        frame = frame.fill(ui.visuals().faint_bg_color);
                    }

                    frame.show(ui, |ui| {
                        ui.horizontal(|ui| {
                            if ui
                                .selectable_label(selected, format!("{}", index + 1))
                                .clicked()
                            {
                                edits.select = Some(index);
                            }

                            let mut title = annotation.title.clone();
                            if ui
                                .add(
                                    egui::TextEdit::singleline(&mut title)
                                        .hint_text("Title")
                                        .desired_width(150.0),
                                )
                                .changed()
                            {
                                edits.title = Some((index, title));
                            }

                            if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                                edits.delete = Some(index);
                            }
                        });

                        if selected {
                            let mut info = annotation.info.clone();
                            if ui
                                .add(
                                    egui::TextEdit::multiline(&mut info)
                                        .hint_text("Details")
                                        .desired_rows(4)
                                        .desired_width(f32::INFINITY),
                                )
                                .changed()
                            {
                                edits.info = Some((index, info));
                            }
                        }
                    });
                }
            });
        });

    if let Some((index, title)) = edits.title {
        store.set_title(index, title);
    }
    if let Some((index, info)) = edits.info {
        store.set_info(index, info);
    }
    // Clicking the selected entry again closes its panel
    if let Some(index) = edits.select {
        if store.selected() == Some(index) {
            store.clear_selection();
        } else {
            store.select(index);
        }
    }
    if let Some(index) = edits.delete
        && store.delete(index).is_some()
    {
        info!("Deleted annotation {}", index + 1);
    }

    Ok(())
}
