//! Gesture arbitration: decides whether a pointer release is a placement
//! click or the tail end of a camera manipulation.
//!
//! Camera-control lifecycle messages and raw wheel input only ever touch the
//! small flag set in [`InteractionSession`]. Clicks are recorded here and
//! consumed later in the frame by the annotation and measurement systems, so
//! placement runs once per frame in a deterministic order.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::config::AppConfig;

use super::params::is_cursor_over_ui;

/// Lifecycle of a camera-control gesture
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraControlEvent {
    /// Pointer went down on the viewport
    DragStart,
    /// The camera changed while the pointer is held
    Drag,
    /// Pointer released
    DragEnd,
}

/// Per-interaction flags shared by the camera, placement and rendering systems
#[derive(Resource, Debug, Default)]
pub struct InteractionSession {
    /// Camera changed since the last drag start (reset on drag end)
    moved: bool,
    /// Any camera motion since the last drag start (survives drag end)
    motion_latched: bool,
    /// Pointer is held down on the viewport
    pointer_down: bool,
    /// The current press began on the viewport (survives drag end)
    pressed_on_viewport: bool,
    /// Pointer is over an annotation text panel
    text_hovered: bool,
    clicked: bool,
    double_clicked: bool,
    last_click_at: Option<f64>,
}

impl InteractionSession {
    pub fn on_camera_control(&mut self, event: CameraControlEvent) {
        match event {
            CameraControlEvent::DragStart => {
                self.moved = false;
                self.motion_latched = false;
                self.pointer_down = true;
                self.pressed_on_viewport = true;
            }
            CameraControlEvent::Drag => {
                self.moved = true;
                self.motion_latched = true;
            }
            CameraControlEvent::DragEnd => {
                self.moved = false;
                self.pointer_down = false;
            }
        }
    }

    /// A new left press. It only belongs to the viewport once a drag starts.
    pub fn on_pointer_press(&mut self) {
        self.pressed_on_viewport = false;
    }

    /// Zooming counts as camera manipulation
    pub fn on_wheel(&mut self) {
        self.moved = true;
        self.motion_latched = true;
    }

    /// True when any camera motion belongs to the current interaction
    pub fn moved(&self) -> bool {
        self.moved || self.motion_latched
    }

    /// The pointer is held and the camera is actually moving
    pub fn drag_in_progress(&self) -> bool {
        self.pointer_down && self.moved
    }

    /// Clicks are only honored as placement when no camera motion occurred
    pub fn placement_allowed(&self) -> bool {
        !self.moved()
    }

    pub fn text_hovered(&self) -> bool {
        self.text_hovered
    }

    pub fn set_text_hovered(&mut self, hovered: bool) {
        self.text_hovered = hovered;
    }

    /// Record a pointer release on the viewport at `now` seconds.
    ///
    /// Only a release whose press also began on the viewport is a click.
    pub fn register_click(&mut self, now: f64, double_click_window: f64) {
        if !std::mem::take(&mut self.pressed_on_viewport) {
            self.last_click_at = None;
            return;
        }
        self.clicked = true;

        // A click that ended a camera drag cannot start a double click
        if self.moved() {
            self.last_click_at = None;
            return;
        }

        match self.last_click_at {
            Some(previous) if now - previous <= double_click_window => {
                self.double_clicked = true;
                self.last_click_at = None;
            }
            _ => self.last_click_at = Some(now),
        }
    }

    /// A single click happened this frame
    pub fn clicked(&self) -> bool {
        self.clicked
    }

    /// A double click completed this frame
    pub fn double_clicked(&self) -> bool {
        self.double_clicked
    }

    /// Forget clicks recorded in the previous frame
    pub fn clear_pending_clicks(&mut self) {
        self.clicked = false;
        self.double_clicked = false;
    }
}

/// Fold camera-control messages and wheel input into the session flags
pub fn apply_camera_control_events(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut controls: MessageReader<CameraControlEvent>,
    mut wheel: MessageReader<MouseWheel>,
    mut session: ResMut<InteractionSession>,
    mut contexts: EguiContexts,
) {
    // The press comes first so a drag start in the same frame claims it
    if mouse_button.just_pressed(MouseButton::Left) {
        session.on_pointer_press();
    }
    for event in controls.read() {
        session.on_camera_control(*event);
    }

    // Scrolling a panel is not camera motion
    if wheel.read().count() > 0 && !is_cursor_over_ui(&mut contexts) {
        session.on_wheel();
    }
}

/// Turn left-button releases over the viewport into pending clicks
pub fn track_pointer_clicks(
    mouse_button: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    config: Res<AppConfig>,
    mut session: ResMut<InteractionSession>,
    mut contexts: EguiContexts,
) {
    session.clear_pending_clicks();

    if !mouse_button.just_released(MouseButton::Left) {
        return;
    }

    if is_cursor_over_ui(&mut contexts) {
        return;
    }

    let window = f64::from(config.interaction().double_click_window_secs);
    session.register_click(time.elapsed_secs_f64(), window);
}
