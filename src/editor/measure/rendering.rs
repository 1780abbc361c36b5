//! Gizmo rendering for measurement segments.

use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::prelude::*;

use crate::constants::MIN_DRAWN_SEGMENT_LENGTH;
use crate::editor::mode::ModeController;
use crate::scene::ModelBounds;

use super::state::MeasureTool;

const MEASURE_COLOR: Color = Color::srgb(0.878, 0.078, 0.078);

/// Custom gizmo group so measurements draw on top of the model
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct MeasureGizmoGroup;

pub fn configure_measure_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<MeasureGizmoGroup>();
    // Ignore depth so segments stay visible through the surface
    config.depth_bias = -1.0;
    config.line.width = 3.0;
}

/// Lines plus end-point boxes for every segment, while measuring
pub fn draw_measurements(
    mut gizmos: Gizmos<MeasureGizmoGroup>,
    controller: Res<ModeController>,
    tool: Res<MeasureTool>,
    bounds: Res<ModelBounds>,
) {
    if !controller.is_measuring() {
        return;
    }

    let marker = bounds.marker_size();

    for segment in tool.segments() {
        if segment.distance() > MIN_DRAWN_SEGMENT_LENGTH {
            gizmos.line(segment.start, segment.end, MEASURE_COLOR);
        }
        for point in [segment.start, segment.end] {
            gizmos.cube(
                Transform::from_translation(point).with_scale(marker),
                MEASURE_COLOR,
            );
        }
    }
}
