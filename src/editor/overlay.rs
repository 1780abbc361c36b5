//! Screen-space overlay for labels anchored to world positions.

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use super::params::CameraParams;

/// Logical size of the surface labels are drawn on
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct LabelOverlay {
    pub viewport: Vec2,
}

impl Default for LabelOverlay {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(
                crate::constants::DEFAULT_WINDOW_WIDTH,
                crate::constants::DEFAULT_WINDOW_HEIGHT,
            ),
        }
    }
}

impl LabelOverlay {
    pub fn contains(&self, screen: Vec2) -> bool {
        screen.x >= 0.0 && screen.y >= 0.0 && screen.x <= self.viewport.x && screen.y <= self.viewport.y
    }

    /// Screen position of a world anchor, or `None` if it is behind the camera or off screen
    pub fn place(&self, camera: &CameraParams, world: Vec3) -> Option<Vec2> {
        camera.project(world).filter(|screen| self.contains(*screen))
    }
}

pub fn init_label_overlay(
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut overlay: ResMut<LabelOverlay>,
) {
    if let Ok(window) = window_query.single() {
        overlay.viewport = window.size();
    }
}

/// Refit the overlay in the same frame the window is resized
pub fn track_viewport_resize(
    mut resized: MessageReader<WindowResized>,
    window_query: Query<Entity, With<PrimaryWindow>>,
    mut overlay: ResMut<LabelOverlay>,
) {
    let Ok(primary) = window_query.single() else {
        resized.clear();
        return;
    };

    if let Some(event) = resized.read().filter(|e| e.window == primary).last() {
        overlay.viewport = Vec2::new(event.width, event.height);
    }
}
