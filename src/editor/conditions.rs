//! Run conditions for controlling when editor systems execute.
//!
//! These conditions keep mode-specific systems from running when they have no
//! work to do.

use bevy::prelude::*;

use super::mode::{InteractionMode, ModeController};

/// Run condition: returns true when the active interaction mode matches.
///
/// Usage: `.run_if(mode_is(InteractionMode::Measuring))`
pub fn mode_is(mode: InteractionMode) -> impl FnMut(Res<ModeController>) -> bool + Clone {
    move |controller: Res<ModeController>| controller.mode() == mode
}

/// Run condition: annotating or measuring.
pub fn placement_mode_active(controller: Res<ModeController>) -> bool {
    controller.placement_mode_active()
}
