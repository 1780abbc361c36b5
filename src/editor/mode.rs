//! Interaction mode register.
//!
//! Exactly one of {none, annotating, measuring} is active. The lighting-edit
//! flag is independent but mutually exclusive with the two placement modes:
//! enabling it drops back to [`InteractionMode::None`], and entering a
//! placement mode clears it.

use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};
use bevy::winit::WinitSettings;
use bevy_egui::EguiContexts;

use super::gesture::InteractionSession;
use super::params::is_cursor_over_ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionMode {
    #[default]
    None,
    Annotating,
    Measuring,
}

impl InteractionMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            InteractionMode::None => "View",
            InteractionMode::Annotating => "Annotations",
            InteractionMode::Measuring => "Measure",
        }
    }

    /// Modes that consume raycasts and accept placement clicks
    pub fn is_placement(&self) -> bool {
        matches!(self, InteractionMode::Annotating | InteractionMode::Measuring)
    }
}

/// A change applied to the [`ModeController`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: InteractionMode,
    pub to: InteractionMode,
    /// Lighting edit is enabled after the transition
    pub lighting: bool,
}

impl ModeTransition {
    pub fn entered(&self, mode: InteractionMode) -> bool {
        self.from != mode && self.to == mode
    }

    pub fn left(&self, mode: InteractionMode) -> bool {
        self.from == mode && self.to != mode
    }

    /// Measuring was explicitly switched off (not merely replaced by another mode)
    pub fn measuring_turned_off(&self) -> bool {
        self.from == InteractionMode::Measuring
            && self.to == InteractionMode::None
            && !self.lighting
    }
}

/// Sole owner of the active interaction mode
#[derive(Resource, Debug, Default)]
pub struct ModeController {
    mode: InteractionMode,
    lighting_edit: bool,
}

impl ModeController {
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn lighting_edit(&self) -> bool {
        self.lighting_edit
    }

    pub fn is_annotating(&self) -> bool {
        self.mode == InteractionMode::Annotating
    }

    pub fn is_measuring(&self) -> bool {
        self.mode == InteractionMode::Measuring
    }

    pub fn placement_mode_active(&self) -> bool {
        self.mode.is_placement()
    }

    /// Target of a toggle button: `mode`, or back to none if already active
    pub fn toggled(&self, mode: InteractionMode) -> InteractionMode {
        if self.mode == mode {
            InteractionMode::None
        } else {
            mode
        }
    }

    /// Switch mode. Returns the transition, or `None` when nothing changed.
    pub fn set_mode(&mut self, mode: InteractionMode) -> Option<ModeTransition> {
        let lighting = if mode.is_placement() { false } else { self.lighting_edit };
        self.apply(mode, lighting)
    }

    /// Toggle lighting edit. Enabling it leaves any placement mode.
    pub fn set_lighting_edit(&mut self, enabled: bool) -> Option<ModeTransition> {
        let mode = if enabled { InteractionMode::None } else { self.mode };
        self.apply(mode, enabled)
    }

    fn apply(&mut self, mode: InteractionMode, lighting: bool) -> Option<ModeTransition> {
        if self.mode == mode && self.lighting_edit == lighting {
            return None;
        }
        let transition = ModeTransition {
            from: self.mode,
            to: mode,
            lighting,
        };
        self.mode = mode;
        self.lighting_edit = lighting;
        Some(transition)
    }
}

/// Request to switch the interaction mode (from the toolbar or shortcuts)
#[derive(Message, Debug, Clone, Copy)]
pub struct SetModeRequest {
    pub mode: InteractionMode,
}

/// Request to enable or disable lighting edit
#[derive(Message, Debug, Clone, Copy)]
pub struct SetLightingEditRequest {
    pub enabled: bool,
}

/// Published after every effective mode change
#[derive(Message, Debug, Clone, Copy)]
pub struct ModeChanged(pub ModeTransition);

/// Apply queued mode requests in arrival order
pub fn apply_mode_requests(
    mut mode_requests: MessageReader<SetModeRequest>,
    mut lighting_requests: MessageReader<SetLightingEditRequest>,
    mut controller: ResMut<ModeController>,
    mut session: ResMut<InteractionSession>,
    mut changed: MessageWriter<ModeChanged>,
) {
    let mut transitions = Vec::new();
    for request in mode_requests.read() {
        transitions.extend(controller.set_mode(request.mode));
    }
    for request in lighting_requests.read() {
        transitions.extend(controller.set_lighting_edit(request.enabled));
    }

    for transition in transitions {
        info!(
            "Interaction mode: {} -> {} (lighting edit: {})",
            transition.from.display_name(),
            transition.to.display_name(),
            transition.lighting
        );
        session.clear_pending_clicks();
        changed.write(ModeChanged(transition));
    }
}

/// Keyboard shortcuts for switching modes
pub fn handle_mode_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    controller: Res<ModeController>,
    mut requests: MessageWriter<SetModeRequest>,
    mut contexts: EguiContexts,
) {
    // Don't change modes if typing in a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let mode = if keyboard.just_pressed(KeyCode::KeyA) {
        Some(controller.toggled(InteractionMode::Annotating))
    } else if keyboard.just_pressed(KeyCode::KeyM) {
        Some(controller.toggled(InteractionMode::Measuring))
    } else if keyboard.just_pressed(KeyCode::Escape) {
        Some(InteractionMode::None)
    } else {
        None
    };

    if let Some(mode) = mode {
        requests.write(SetModeRequest { mode });
    }
}

/// Cursor shown over the viewport for the current mode
pub fn cursor_icon_for(
    mode: InteractionMode,
    camera_moved: bool,
    icon_hovered: bool,
) -> CursorIcon {
    match mode {
        InteractionMode::Measuring if !camera_moved => {
            CursorIcon::System(SystemCursorIcon::Crosshair)
        }
        InteractionMode::Annotating if icon_hovered => {
            CursorIcon::System(SystemCursorIcon::Pointer)
        }
        _ => CursorIcon::System(SystemCursorIcon::Default),
    }
}

pub fn update_cursor_icon(
    controller: Res<ModeController>,
    session: Res<InteractionSession>,
    annotations: Res<super::annotations::AnnotationStore>,
    window_query: Query<Entity, With<PrimaryWindow>>,
    mut commands: Commands,
    mut contexts: EguiContexts,
) {
    let Ok(entity) = window_query.single() else {
        return;
    };

    // Use default cursor over UI, mode cursor in the viewport
    if is_cursor_over_ui(&mut contexts) {
        commands
            .entity(entity)
            .insert(CursorIcon::System(SystemCursorIcon::Default));
        return;
    }

    commands.entity(entity).insert(cursor_icon_for(
        controller.mode(),
        session.moved(),
        annotations.hovered().is_some(),
    ));
}

/// Redraw continuously while a placement mode is active, on demand otherwise
pub fn update_frame_pacing(controller: Res<ModeController>, mut winit: ResMut<WinitSettings>) {
    if !controller.is_changed() {
        return;
    }

    *winit = if controller.placement_mode_active() {
        WinitSettings::game()
    } else {
        WinitSettings::desktop_app()
    };
}
