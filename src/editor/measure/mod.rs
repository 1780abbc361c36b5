//! Point-to-point measurement on the model surface.
//!
//! Click once to fix the start, the free end then follows the surface hit
//! every frame, click again to finish. Finished segments stay until measuring
//! is explicitly switched off.

mod labels;
mod rendering;
mod state;

pub use labels::measurement_labels_ui;
pub use rendering::{configure_measure_gizmos, draw_measurements, MeasureGizmoGroup};
pub use state::{MeasureOutcome, MeasurePhase, MeasureTool, MeasurementSegment};

use bevy::prelude::*;

use super::gesture::InteractionSession;
use super::mode::{InteractionMode, ModeChanged, ModeController, ModeTransition};
use super::raycast::SurfaceHit;

/// Surface point a click should be applied to, if this frame has an honored click
pub fn measure_click_point(
    controller: &ModeController,
    session: &InteractionSession,
    hit: &SurfaceHit,
) -> Option<Vec3> {
    if !controller.is_measuring() || !session.clicked() || !session.placement_allowed() {
        return None;
    }
    hit.point()
}

pub fn handle_measure_clicks(
    controller: Res<ModeController>,
    session: Res<InteractionSession>,
    hit: Res<SurfaceHit>,
    mut tool: ResMut<MeasureTool>,
) {
    let Some(point) = measure_click_point(&controller, &session, &hit) else {
        return;
    };

    match tool.click(point) {
        MeasureOutcome::Started(id) => debug!("Measurement {} started at {:?}", id, point),
        MeasureOutcome::Finished(id) => {
            if let Some(segment) = tool.finished().last() {
                info!("Measurement {} finished: {}", id, segment.label());
            }
        }
    }
}

/// Drag the free end along with the live surface hit
pub fn track_measure_endpoint(hit: Res<SurfaceHit>, mut tool: ResMut<MeasureTool>) {
    if !tool.is_drawing() {
        return;
    }
    tool.track(hit.point());
}

/// Turning measuring off is a hard reset; switching to another mode only drops the drawing segment
pub fn handle_measure_mode_changes(
    mut changes: MessageReader<ModeChanged>,
    mut tool: ResMut<MeasureTool>,
) {
    for ModeChanged(transition) in changes.read() {
        apply_mode_transition(&mut tool, transition);
    }
}

fn apply_mode_transition(tool: &mut MeasureTool, transition: &ModeTransition) {
    if transition.measuring_turned_off() {
        let count = tool.finished().len();
        tool.reset();
        if count > 0 {
            info!("Cleared {} measurements", count);
        }
    } else if (transition.left(InteractionMode::Measuring)
        || transition.entered(InteractionMode::Measuring))
        && tool.abandon_drawing().is_some()
    {
        debug!("Abandoned measurement in progress");
    }
}
