//! Common SystemParam bundles to reduce parameter counts in editor systems.
//!
//! ## Available Bundles
//!
//! - [`CameraParams`]: Camera and window access for ray construction and projection
//!
//! ## Helper Functions
//!
//! - [`is_cursor_over_ui`]: Check if cursor is over egui UI (for input gating)

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::config::RaycastOrigin;

use super::camera::EditorCamera;

/// Bundled camera and window queries for viewport/world conversions
#[derive(SystemParam)]
pub struct CameraParams<'w, 's> {
    pub window: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    pub camera: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<EditorCamera>>,
}

impl CameraParams<'_, '_> {
    /// Cursor position in viewport coordinates, if the cursor is inside the window
    pub fn cursor_position(&self) -> Option<Vec2> {
        self.window.single().ok()?.cursor_position()
    }

    /// Center of the viewport
    pub fn crosshair_position(&self) -> Option<Vec2> {
        let (camera, _) = self.camera.single().ok()?;
        camera.logical_viewport_size().map(|size| size * 0.5)
    }

    /// World-space ray through the configured screen point
    pub fn interaction_ray(&self, origin: RaycastOrigin) -> Option<Ray3d> {
        let screen = match origin {
            RaycastOrigin::Crosshair => self.crosshair_position()?,
            RaycastOrigin::Cursor => self.cursor_position()?,
        };
        let (camera, transform) = self.camera.single().ok()?;
        camera.viewport_to_world(transform, screen).ok()
    }

    /// Project a world position to viewport coordinates.
    ///
    /// Returns `None` for points behind the camera.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let (camera, transform) = self.camera.single().ok()?;
        camera.world_to_viewport(transform, world).ok()
    }

    pub fn camera_position(&self) -> Option<Vec3> {
        self.camera
            .single()
            .ok()
            .map(|(_, transform)| transform.translation())
    }
}

/// Check if the cursor is over egui UI
pub fn is_cursor_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false)
}
