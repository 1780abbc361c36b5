use bevy::prelude::*;

use crate::config::AppConfig;
use crate::constants::CAPACITY_WARNING_ID;
use crate::editor::gesture::InteractionSession;
use crate::editor::mode::{InteractionMode, ModeChanged, ModeController, ModeTransition};
use crate::editor::raycast::SurfaceHit;
use crate::ui::notifications::Notifications;

use super::store::{AnnotationStore, PlaceOutcome};

/// Whether this frame's input should place an annotation
pub fn placement_requested(
    controller: &ModeController,
    session: &InteractionSession,
    store: &AnnotationStore,
    hit: &SurfaceHit,
) -> bool {
    controller.is_annotating()
        && session.double_clicked()
        && session.placement_allowed()
        && !session.text_hovered()
        && store.hovered().is_none()
        && hit.intersects
}

/// Double click on the surface places an annotation at the lifted hit point
pub fn handle_annotation_placement(
    controller: Res<ModeController>,
    session: Res<InteractionSession>,
    hit: Res<SurfaceHit>,
    config: Res<AppConfig>,
    mut store: ResMut<AnnotationStore>,
    mut notifications: ResMut<Notifications>,
) {
    if !placement_requested(&controller, &session, &store, &hit) {
        return;
    }

    place_or_warn(
        &mut store,
        &mut notifications,
        hit.anchor,
        config.interaction().warning_duration_secs,
    );
}

/// Place an annotation, or raise the capacity warning once while it is showing
pub fn place_or_warn(
    store: &mut AnnotationStore,
    notifications: &mut Notifications,
    anchor: Vec3,
    warning_secs: f32,
) -> PlaceOutcome {
    let outcome = store.place(anchor);
    match outcome {
        PlaceOutcome::Placed(index) => {
            info!("Placed annotation {} at {:?}", index + 1, anchor);
        }
        PlaceOutcome::AtCapacity => {
            let capacity = store.capacity();
            let message = format!("You can place at most {} annotations", capacity);
            if notifications.warn(CAPACITY_WARNING_ID, message, warning_secs) {
                warn!("Annotation capacity reached ({})", capacity);
            }
        }
    }
    outcome
}

/// Keep the store bound in step with the configured maximum
pub fn sync_annotation_capacity(config: Res<AppConfig>, mut store: ResMut<AnnotationStore>) {
    if !config.is_changed() {
        return;
    }
    let capacity = config.interaction().max_annotations;
    if store.capacity() != capacity {
        store.set_capacity(capacity);
    }
}

/// Drop transient hover state when annotation mode is left or measuring starts
pub fn handle_annotation_mode_changes(
    mut changes: MessageReader<ModeChanged>,
    mut store: ResMut<AnnotationStore>,
    mut session: ResMut<InteractionSession>,
) {
    for ModeChanged(transition) in changes.read() {
        apply_mode_transition(transition, &mut store, &mut session);
    }
}

pub fn apply_mode_transition(
    transition: &ModeTransition,
    store: &mut AnnotationStore,
    session: &mut InteractionSession,
) {
    if transition.left(InteractionMode::Annotating) || transition.entered(InteractionMode::Measuring) {
        store.clear_hover();
        session.set_text_hovered(false);
    }
}
