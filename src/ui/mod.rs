mod annotations_panel;
mod dialogs;
pub mod notifications;
mod toolbar;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

pub use notifications::{NotificationLevel, Notifications};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Notifications>()
            .add_systems(Update, notifications::expire_notifications)
            // Side panels must render first so top panels fit between them
            .add_systems(
                EguiPrimaryContextPass,
                (annotations_panel::annotations_panel_ui, toolbar::toolbar_ui).chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    notifications::notifications_ui,
                    dialogs::config_reset_notification_ui,
                )
                    .after(toolbar::toolbar_ui),
            );
    }
}
