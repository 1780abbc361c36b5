//! Auto-dismissing toast notifications, deduplicated by a stable id.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub level: NotificationLevel,
    /// Seconds until auto-dismiss
    pub remaining: f32,
}

#[derive(Resource, Debug, Default)]
pub struct Notifications {
    entries: Vec<Notification>,
}

impl Notifications {
    /// Show a notification unless one with the same id is still active.
    ///
    /// Returns true if it was added.
    pub fn push(
        &mut self,
        id: impl Into<String>,
        message: impl Into<String>,
        level: NotificationLevel,
        duration_secs: f32,
    ) -> bool {
        let id = id.into();
        if self.is_active(&id) {
            return false;
        }
        self.entries.push(Notification {
            id,
            message: message.into(),
            level,
            remaining: duration_secs,
        });
        true
    }

    pub fn info(&mut self, id: impl Into<String>, message: impl Into<String>, duration_secs: f32) -> bool {
        self.push(id, message, NotificationLevel::Info, duration_secs)
    }

    pub fn warn(&mut self, id: impl Into<String>, message: impl Into<String>, duration_secs: f32) -> bool {
        self.push(id, message, NotificationLevel::Warning, duration_secs)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.entries.iter().any(|n| n.id == id)
    }

    pub fn dismiss(&mut self, id: &str) {
        self.entries.retain(|n| n.id != id);
    }

    /// Count down and drop expired entries
    pub fn tick(&mut self, delta_secs: f32) {
        for entry in &mut self.entries {
            entry.remaining -= delta_secs;
        }
        self.entries.retain(|n| n.remaining > 0.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn expire_notifications(time: Res<Time>, mut notifications: ResMut<Notifications>) {
    if notifications.is_empty() {
        return;
    }
    notifications.tick(time.delta_secs());
}

/// Toast stack in the bottom-right corner
pub fn notifications_ui(
    mut contexts: EguiContexts,
    mut notifications: ResMut<Notifications>,
) -> Result {
    if notifications.is_empty() {
        return Ok(());
    }

    let ctx = contexts.ctx_mut()?;
    let mut dismissed = Vec::new();

    egui::Area::new(egui::Id::new("notifications"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            for entry in notifications.iter() {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(320.0);
                    ui.horizontal(|ui| {
                        let color = match entry.level {
                            NotificationLevel::Info => ui.visuals().text_color(),
                            NotificationLevel::Warning => ui.visuals().warn_fg_color,
                        };
                        ui.colored_label(color, &entry.message);
                        if ui.small_button("x").clicked() {
                            dismissed.push(entry.id.clone());
                        }
                    });
                });
                ui.add_space(4.0);
            }
        });

    for id in dismissed {
        notifications.dismiss(&id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_deduplicates_by_id() {
        let mut notifications = Notifications::default();
        assert!(notifications.warn("full", "Collection is full", 5.0));
        assert!(!notifications.warn("full", "Collection is full", 5.0));
        assert_eq!(notifications.iter().count(), 1);

        assert!(notifications.warn("other", "Something else", 5.0));
        assert_eq!(notifications.iter().count(), 2);
    }

    #[test]
    fn test_tick_expires_entries() {
        let mut notifications = Notifications::default();
        notifications.warn("full", "Collection is full", 5.0);
        notifications.tick(4.0);
        assert!(notifications.is_active("full"));
        notifications.tick(1.5);
        assert!(!notifications.is_active("full"));
    }

    #[test]
    fn test_id_can_be_reused_after_dismiss() {
        let mut notifications = Notifications::default();
        notifications.warn("full", "Collection is full", 5.0);
        notifications.dismiss("full");
        assert!(notifications.is_empty());
        assert!(notifications.warn("full", "Collection is full", 5.0));
    }

    #[test]
    fn test_levels_are_kept() {
        let mut notifications = Notifications::default();
        notifications.info("loaded", "Model loaded", 5.0);
        notifications.warn("full", "Collection is full", 5.0);
        let levels: Vec<_> = notifications.iter().map(|n| n.level).collect();
        assert_eq!(levels, vec![NotificationLevel::Info, NotificationLevel::Warning]);
    }
}
