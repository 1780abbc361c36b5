//! Unit tests for the annotation store and placement gating.

use bevy::prelude::*;

use crate::editor::gesture::{CameraControlEvent, InteractionSession};
use crate::editor::mode::{InteractionMode, ModeController};
use crate::editor::raycast::SurfaceHit;

use crate::constants::CAPACITY_WARNING_ID;
use crate::ui::notifications::Notifications;

use super::{
    apply_mode_transition, place_or_warn, placement_requested, AnnotationStore, PlaceOutcome,
};

fn store_with(count: usize) -> AnnotationStore {
    let mut store = AnnotationStore::default();
    for i in 0..count {
        store.place(Vec3::new(i as f32, 0.0, 0.0));
    }
    store
}

/// Stationary press and release on the viewport
fn click(session: &mut InteractionSession, now: f64) {
    session.on_camera_control(CameraControlEvent::DragStart);
    session.on_camera_control(CameraControlEvent::DragEnd);
    session.register_click(now, 0.3);
}

fn double_clicked_session() -> InteractionSession {
    let mut session = InteractionSession::default();
    click(&mut session, 1.0);
    click(&mut session, 1.1);
    session
}

fn hit_at(point: Vec3) -> SurfaceHit {
    SurfaceHit {
        intersects: true,
        point,
        normal: Vec3::Y,
        anchor: point,
        distance: 1.0,
    }
}

fn annotating() -> ModeController {
    let mut controller = ModeController::default();
    controller.set_mode(InteractionMode::Annotating);
    controller
}

#[test]
fn test_place_selects_new_entry() {
    let mut store = AnnotationStore::default();
    assert_eq!(store.place(Vec3::ONE), PlaceOutcome::Placed(0));
    assert_eq!(store.selected(), Some(0));
    assert_eq!(store.place(Vec3::ZERO), PlaceOutcome::Placed(1));
    assert_eq!(store.selected(), Some(1));
}

#[test]
fn test_place_round_trips_position() {
    let mut store = AnnotationStore::default();
    let p = Vec3::new(0.125, -3.5, 7.25);
    store.place(p);
    let annotation = store.get(0).unwrap();
    assert_eq!(annotation.position, p);
    assert!(annotation.title.is_empty());
    assert!(annotation.info.is_empty());
}

#[test]
fn test_capacity_is_never_exceeded() {
    let mut store = store_with(10);
    assert!(store.is_full());
    assert_eq!(store.place(Vec3::ONE), PlaceOutcome::AtCapacity);
    assert_eq!(store.place(Vec3::ONE), PlaceOutcome::AtCapacity);
    assert_eq!(store.len(), 10);
    // Refused placement leaves the selection alone
    assert_eq!(store.selected(), Some(9));
}

#[test]
fn test_delete_keeps_relative_order() {
    let mut store = store_with(4);
    let removed = store.delete(1).unwrap();
    assert_eq!(removed.position, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(store.len(), 3);
    let xs: Vec<f32> = store.iter().map(|a| a.position.x).collect();
    assert_eq!(xs, vec![0.0, 2.0, 3.0]);
}

#[test]
fn test_delete_selected_clears_selection() {
    let mut store = store_with(3);
    store.select(1);
    store.delete(1);
    assert_eq!(store.selected(), None);
}

#[test]
fn test_delete_before_selection_shifts_it() {
    let mut store = store_with(3);
    store.select(2);
    store.delete(0);
    assert_eq!(store.selected(), Some(1));
    assert_eq!(store.get(1).unwrap().position.x, 2.0);
}

#[test]
fn test_delete_after_selection_keeps_it() {
    let mut store = store_with(3);
    store.select(0);
    store.delete(2);
    assert_eq!(store.selected(), Some(0));
}

#[test]
fn test_out_of_range_is_noop() {
    let mut store = store_with(2);
    assert!(store.delete(5).is_none());
    assert!(!store.select(2));
    assert!(!store.set_title(9, "x"));
    assert!(!store.set_info(9, "x"));
    store.hover_enter(7);
    assert_eq!(store.len(), 2);
    assert_eq!(store.selected(), Some(1));
    assert_eq!(store.hovered(), None);
}

#[test]
fn test_clear_resets_selection_and_hover() {
    let mut store = store_with(3);
    store.hover_enter(0);
    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.selected(), None);
    assert_eq!(store.hovered(), None);
    assert_eq!(store.place(Vec3::ONE), PlaceOutcome::Placed(0));
}

#[test]
fn test_set_title_and_info() {
    let mut store = store_with(2);
    assert!(store.set_title(0, "Crack"));
    assert!(store.set_info(0, "Hairline, 3cm"));
    let annotation = store.get(0).unwrap();
    assert_eq!(annotation.title, "Crack");
    assert_eq!(annotation.info, "Hairline, 3cm");
    assert!(store.get(1).unwrap().title.is_empty());
}

#[test]
fn test_only_selected_panel_is_visible() {
    let mut store = store_with(5);
    for k in 0..5 {
        store.select(k);
        let visible: Vec<usize> = (0..5)
            .filter(|&i| store.is_panel_visible(i, false, true))
            .collect();
        assert_eq!(visible, vec![k]);
    }
}

#[test]
fn test_panel_hidden_while_dragging_or_not_annotating() {
    let store = store_with(1);
    assert!(store.is_panel_visible(0, false, true));
    assert!(!store.is_panel_visible(0, true, true));
    assert!(!store.is_panel_visible(0, false, false));
}

#[test]
fn test_hover_leave_only_clears_matching_entry() {
    let mut store = store_with(3);
    store.hover_enter(1);
    store.hover_leave(0);
    assert_eq!(store.hovered(), Some(1));
    store.hover_leave(1);
    assert_eq!(store.hovered(), None);
}

#[test]
fn test_hovering_selected_keeps_selection() {
    let mut store = store_with(3);
    store.select(1);
    store.hover_enter(1);
    assert_eq!(store.selected(), Some(1));
    assert!(!store.is_highlighted_in_list(1));
    store.hover_enter(2);
    assert!(store.is_highlighted_in_list(2));
}

#[test]
fn test_lowered_capacity_keeps_existing() {
    let mut store = store_with(5);
    store.set_capacity(3);
    assert_eq!(store.len(), 5);
    assert_eq!(store.place(Vec3::ONE), PlaceOutcome::AtCapacity);
}

#[test]
fn test_placement_requires_double_click_and_hit() {
    let controller = annotating();
    let store = AnnotationStore::default();
    let session = double_clicked_session();
    assert!(placement_requested(&controller, &session, &store, &hit_at(Vec3::ONE)));
    assert!(!placement_requested(&controller, &session, &store, &SurfaceHit::miss()));

    let single = {
        let mut s = InteractionSession::default();
        click(&mut s, 1.0);
        s
    };
    assert!(!placement_requested(&controller, &single, &store, &hit_at(Vec3::ONE)));
}

#[test]
fn test_no_placement_after_camera_motion() {
    let controller = annotating();
    let store = AnnotationStore::default();
    let mut session = double_clicked_session();
    session.on_camera_control(CameraControlEvent::DragStart);
    session.on_camera_control(CameraControlEvent::Drag);
    session.on_camera_control(CameraControlEvent::DragEnd);
    assert!(!placement_requested(&controller, &session, &store, &hit_at(Vec3::ONE)));
}

#[test]
fn test_no_placement_over_text_panel_or_icon() {
    let controller = annotating();
    let mut session = double_clicked_session();
    let mut store = store_with(1);
    let hit = hit_at(Vec3::ONE);

    session.set_text_hovered(true);
    assert!(!placement_requested(&controller, &session, &store, &hit));

    session.set_text_hovered(false);
    store.hover_enter(0);
    assert!(!placement_requested(&controller, &session, &store, &hit));
}

#[test]
fn test_no_placement_outside_annotation_mode() {
    let mut controller = ModeController::default();
    let store = AnnotationStore::default();
    let session = double_clicked_session();
    let hit = hit_at(Vec3::ONE);
    assert!(!placement_requested(&controller, &session, &store, &hit));

    controller.set_mode(InteractionMode::Measuring);
    assert!(!placement_requested(&controller, &session, &store, &hit));
}

#[test]
fn test_over_capacity_warns_once_while_warning_is_shown() {
    let mut store = AnnotationStore::with_capacity(10);
    let mut notifications = Notifications::default();
    for i in 0..10 {
        let outcome = place_or_warn(&mut store, &mut notifications, Vec3::splat(i as f32), 5.0);
        assert_eq!(outcome, PlaceOutcome::Placed(i));
    }
    assert!(notifications.is_empty());

    for _ in 0..2 {
        let outcome = place_or_warn(&mut store, &mut notifications, Vec3::ONE, 5.0);
        assert_eq!(outcome, PlaceOutcome::AtCapacity);
    }
    assert_eq!(store.len(), 10);
    assert_eq!(notifications.iter().count(), 1);
    assert!(notifications.is_active(CAPACITY_WARNING_ID));

    // Once the warning expires the next attempt raises it again
    notifications.tick(5.5);
    assert!(notifications.is_empty());
    place_or_warn(&mut store, &mut notifications, Vec3::ONE, 5.0);
    assert_eq!(store.len(), 10);
    assert_eq!(notifications.iter().count(), 1);
}

#[test]
fn test_entering_measuring_clears_hover_and_text_hover() {
    let mut controller = annotating();
    let mut store = store_with(2);
    let mut session = InteractionSession::default();
    store.hover_enter(1);
    session.set_text_hovered(true);

    let transition = controller.set_mode(InteractionMode::Measuring).unwrap();
    apply_mode_transition(&transition, &mut store, &mut session);
    assert_eq!(store.hovered(), None);
    assert!(!session.text_hovered());
}

#[test]
fn test_unrelated_transition_keeps_hover() {
    let mut store = store_with(2);
    let mut session = InteractionSession::default();
    store.hover_enter(0);

    let enter = ModeController::default().set_mode(InteractionMode::Annotating).unwrap();
    apply_mode_transition(&enter, &mut store, &mut session);
    assert_eq!(store.hovered(), Some(0));
}
