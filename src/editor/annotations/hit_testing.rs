//! Screen-space hit testing for annotation icons.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::config::AppConfig;
use crate::editor::gesture::InteractionSession;
use crate::editor::mode::ModeController;
use crate::editor::params::{is_cursor_over_ui, CameraParams};
use crate::scene::ModelBounds;

use super::billboard::icon_scale;
use super::store::AnnotationStore;

/// An icon as seen on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenIcon {
    pub index: usize,
    pub center: Vec2,
    pub radius: f32,
}

/// Index of the icon under `cursor`. Overlapping icons resolve to the closest center.
pub fn icon_under_cursor(cursor: Vec2, icons: impl IntoIterator<Item = ScreenIcon>) -> Option<usize> {
    icons
        .into_iter()
        .filter_map(|icon| {
            let distance = icon.center.distance(cursor);
            (distance <= icon.radius).then_some((icon.index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

/// Project each annotation's icon disc to the screen
fn screen_icons(
    camera: &CameraParams,
    store: &AnnotationStore,
    base_scale: f32,
    hover_scale: f32,
) -> Vec<ScreenIcon> {
    let Ok((_, camera_transform)) = camera.camera.single() else {
        return Vec::new();
    };
    let right = camera_transform.right();

    store
        .iter()
        .enumerate()
        .filter_map(|(index, annotation)| {
            let world_radius = icon_scale(base_scale, store.hovered() == Some(index), hover_scale);
            let center = camera.project(annotation.position)?;
            let edge = camera.project(annotation.position + right * world_radius)?;
            Some(ScreenIcon {
                index,
                center,
                radius: center.distance(edge),
            })
        })
        .collect()
}

/// Track which icon the pointer is over while annotating
pub fn update_icon_hover(
    controller: Res<ModeController>,
    session: Res<InteractionSession>,
    config: Res<AppConfig>,
    bounds: Res<ModelBounds>,
    camera: CameraParams,
    mut store: ResMut<AnnotationStore>,
    mut contexts: EguiContexts,
) {
    if !controller.is_annotating() {
        return;
    }

    let blocked =
        is_cursor_over_ui(&mut contexts) || session.drag_in_progress() || session.text_hovered();

    let under_cursor = if blocked {
        None
    } else {
        camera.cursor_position().and_then(|cursor| {
            let icons = screen_icons(
                &camera,
                &store,
                bounds.icon_scale(),
                config.interaction().hover_scale,
            );
            icon_under_cursor(cursor, icons)
        })
    };

    let current = store.hovered();
    if under_cursor == current {
        return;
    }
    if let Some(previous) = current {
        store.hover_leave(previous);
    }
    if let Some(index) = under_cursor {
        store.hover_enter(index);
    }
}

/// A single click on a hovered icon selects its annotation
pub fn select_clicked_icon(
    controller: Res<ModeController>,
    session: Res<InteractionSession>,
    mut store: ResMut<AnnotationStore>,
) {
    if !controller.is_annotating() || !session.clicked() || !session.placement_allowed() {
        return;
    }

    if let Some(index) = store.hovered()
        && store.selected() != Some(index)
        && store.select(index)
    {
        debug!("Selected annotation {}", index + 1);
    }
}
