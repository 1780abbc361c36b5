pub mod annotations;
pub mod camera;
pub mod conditions;
pub mod gesture;
pub mod measure;
pub mod mode;
pub mod overlay;
pub mod params;
pub mod raycast;

pub use annotations::{AnnotationStore, PlaceOutcome};
pub use camera::{EditorCamera, OrbitCamera};
pub use gesture::{CameraControlEvent, InteractionSession};
pub use measure::{MeasureTool, MeasurementSegment};
pub use mode::{InteractionMode, ModeChanged, ModeController, SetLightingEditRequest, SetModeRequest};
pub use raycast::SurfaceHit;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::{AppConfig, SetModelPathRequest};
use crate::constants::MODEL_REPLACED_NOTICE_ID;
use crate::ui::notifications::Notifications;

use conditions::{mode_is, placement_mode_active};

/// Annotations and measurements refer to the old surface once the model is replaced
fn reset_on_model_change(
    config: Res<AppConfig>,
    mut store: ResMut<annotations::AnnotationStore>,
    mut tool: ResMut<measure::MeasureTool>,
    mut session: ResMut<gesture::InteractionSession>,
    mut notifications: ResMut<Notifications>,
) {
    if !store.is_empty() || tool.segments().next().is_some() {
        let message = format!(
            "New model loaded: cleared {} annotations and {} measurements",
            store.len(),
            tool.finished().len()
        );
        info!("{}", message);
        notifications.dismiss(MODEL_REPLACED_NOTICE_ID);
        notifications.info(
            MODEL_REPLACED_NOTICE_ID,
            message,
            config.interaction().warning_duration_secs,
        );
    }
    store.clear();
    tool.reset();
    session.set_text_hovered(false);
}

/// Per-frame stages of pointer interaction, run in this order
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum InteractionSet {
    /// Camera input, gesture flags, clicks and mode requests
    Input,
    /// Surface raycast
    Raycast,
    /// Placement, measurement transitions and live updates
    Update,
    /// Icons, gizmos and cursor
    Render,
}

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<mode::ModeController>()
            .init_resource::<gesture::InteractionSession>()
            .init_resource::<raycast::SurfaceHit>()
            .init_resource::<annotations::AnnotationStore>()
            .init_resource::<measure::MeasureTool>()
            .init_resource::<overlay::LabelOverlay>()
            .init_resource::<camera::CameraDrag>()
            .add_message::<gesture::CameraControlEvent>()
            .add_message::<mode::SetModeRequest>()
            .add_message::<mode::SetLightingEditRequest>()
            .add_message::<mode::ModeChanged>()
            // Register measurement gizmo group so it can draw over the model
            .init_gizmo_group::<measure::MeasureGizmoGroup>()
            .configure_sets(
                Update,
                (
                    InteractionSet::Input,
                    InteractionSet::Raycast,
                    InteractionSet::Update,
                    InteractionSet::Render,
                )
                    .chain(),
            )
            .add_systems(
                Startup,
                (
                    camera::spawn_camera,
                    annotations::setup_icon_assets,
                    measure::configure_measure_gizmos,
                    overlay::init_label_overlay,
                ),
            )
            .add_systems(
                Update,
                (
                    (
                        camera::camera_orbit,
                        camera::camera_zoom,
                        mode::handle_mode_shortcuts,
                        overlay::track_viewport_resize,
                        annotations::sync_annotation_capacity,
                    ),
                    gesture::apply_camera_control_events,
                    gesture::track_pointer_clicks,
                    mode::apply_mode_requests,
                    reset_on_model_change.run_if(on_message::<SetModelPathRequest>),
                    (camera::fit_camera_to_model, camera::apply_orbit).chain(),
                )
                    .chain()
                    .in_set(InteractionSet::Input),
            )
            .add_systems(
                Update,
                (
                    raycast::update_surface_hit.run_if(placement_mode_active),
                    raycast::clear_surface_hit.run_if(not(placement_mode_active)),
                )
                    .in_set(InteractionSet::Raycast),
            )
            .add_systems(
                Update,
                (
                    (
                        annotations::handle_annotation_mode_changes,
                        measure::handle_measure_mode_changes,
                    )
                        .run_if(on_message::<mode::ModeChanged>),
                    (
                        annotations::update_icon_hover,
                        annotations::select_clicked_icon,
                        annotations::handle_annotation_placement,
                    )
                        .chain()
                        .run_if(mode_is(InteractionMode::Annotating)),
                    (
                        measure::handle_measure_clicks,
                        measure::track_measure_endpoint,
                    )
                        .chain()
                        .run_if(mode_is(InteractionMode::Measuring)),
                )
                    .chain()
                    .in_set(InteractionSet::Update),
            )
            .add_systems(
                Update,
                (
                    (
                        annotations::sync_annotation_icons,
                        annotations::orient_annotation_icons,
                    )
                        .chain(),
                    measure::draw_measurements.run_if(mode_is(InteractionMode::Measuring)),
                    mode::update_cursor_icon,
                    mode::update_frame_pacing,
                )
                    .in_set(InteractionSet::Render),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    annotations::annotation_badges_ui,
                    annotations::annotation_text_panel_ui,
                    measure::measurement_labels_ui,
                ),
            );
    }
}
