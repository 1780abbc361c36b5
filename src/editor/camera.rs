use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::scene::ModelBounds;

use super::gesture::{CameraControlEvent, InteractionSession};
use super::params::is_cursor_over_ui;

const MIN_RADIUS: f32 = 0.05;
const MAX_RADIUS: f32 = 10_000.0;
const MAX_PITCH: f32 = 1.54;
const PAN_SPEED: f32 = 0.0015;

#[derive(Component)]
pub struct EditorCamera;

/// Orbit camera state: the camera circles `focus` at `radius`
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
    /// Radians per pixel of mouse motion
    pub sensitivity: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            radius: 10.0,
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: 0.005,
        }
    }
}

impl OrbitCamera {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn transform(&self) -> Transform {
        let position = self.focus + self.rotation() * Vec3::Z * self.radius;
        Transform::from_translation(position).looking_at(self.focus, Vec3::Y)
    }

    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw -= delta.x * self.sensitivity;
        self.pitch = (self.pitch - delta.y * self.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn pan(&mut self, delta: Vec2) {
        let rotation = self.rotation();
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;
        self.focus += (-right * delta.x + up * delta.y) * self.radius * PAN_SPEED;
    }

    /// Positive `amount` moves closer
    pub fn zoom(&mut self, amount: f32) {
        self.radius = (self.radius * (1.0 - amount)).clamp(MIN_RADIUS, MAX_RADIUS);
    }
}

pub fn spawn_camera(mut commands: Commands) {
    let orbit = OrbitCamera::default();
    commands.spawn((
        Camera3d::default(),
        EditorCamera,
        orbit,
        Projection::Perspective(PerspectiveProjection {
            fov: 45.0_f32.to_radians(),
            ..default()
        }),
        orbit.transform(),
    ));
}

/// Button currently driving the camera, if any
#[derive(Resource, Debug, Default)]
pub struct CameraDrag {
    button: Option<MouseButton>,
}

/// Left drag orbits, right drag pans. Publishes the gesture lifecycle.
pub fn camera_orbit(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    session: Res<InteractionSession>,
    mut drag: ResMut<CameraDrag>,
    mut camera_query: Query<&mut OrbitCamera, With<EditorCamera>>,
    mut controls: MessageWriter<CameraControlEvent>,
    mut contexts: EguiContexts,
) {
    if drag.button.is_none() {
        // Text panels and UI keep the camera still
        if is_cursor_over_ui(&mut contexts) || session.text_hovered() {
            mouse_motion.clear();
            return;
        }
        for button in [MouseButton::Left, MouseButton::Right] {
            if mouse_button.just_pressed(button) {
                drag.button = Some(button);
                controls.write(CameraControlEvent::DragStart);
                break;
            }
        }
    }

    let Some(button) = drag.button else {
        mouse_motion.clear();
        return;
    };

    let delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if delta != Vec2::ZERO
        && let Ok(mut orbit) = camera_query.single_mut()
    {
        match button {
            MouseButton::Right => orbit.pan(delta),
            _ => orbit.orbit(delta),
        }
        controls.write(CameraControlEvent::Drag);
    }

    if !mouse_button.pressed(button) {
        drag.button = None;
        controls.write(CameraControlEvent::DragEnd);
    }
}

pub fn camera_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    mut camera_query: Query<&mut OrbitCamera, With<EditorCamera>>,
    mut contexts: EguiContexts,
) {
    if is_cursor_over_ui(&mut contexts) {
        scroll_events.clear();
        return;
    }

    let Ok(mut orbit) = camera_query.single_mut() else {
        return;
    };

    for event in scroll_events.read() {
        let scroll_amount = match event.unit {
            MouseScrollUnit::Line => event.y * 0.1,
            MouseScrollUnit::Pixel => event.y * 0.001,
        };
        orbit.zoom(scroll_amount);
    }
}

pub fn apply_orbit(
    mut camera_query: Query<(&OrbitCamera, &mut Transform), (With<EditorCamera>, Changed<OrbitCamera>)>,
) {
    for (orbit, mut transform) in camera_query.iter_mut() {
        *transform = orbit.transform();
    }
}

/// Frame the model once its bounds are known, and again after it is replaced
pub fn fit_camera_to_model(
    bounds: Res<ModelBounds>,
    mut fitted: Local<bool>,
    mut camera_query: Query<&mut OrbitCamera, With<EditorCamera>>,
) {
    if bounds.is_empty() {
        *fitted = false;
        return;
    }
    if *fitted {
        return;
    }
    let Ok(mut orbit) = camera_query.single_mut() else {
        return;
    };

    orbit.focus = bounds.center();
    orbit.radius = (bounds.size().length() * 1.5).clamp(MIN_RADIUS, MAX_RADIUS);
    *fitted = true;
    debug!("Camera framed model: focus {:?}, radius {}", orbit.focus, orbit.radius);
}
