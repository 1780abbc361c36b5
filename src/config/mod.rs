use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{
    DOUBLE_CLICK_WINDOW_SECS, ICON_HOVER_SCALE, MAX_ANNOTATIONS, SURFACE_OFFSET_FACTOR,
    WARNING_DURATION_SECS,
};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Where the interaction ray is cast from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaycastOrigin {
    /// Fixed crosshair in the middle of the viewport
    #[default]
    Crosshair,
    /// Live mouse cursor position
    Cursor,
}

/// Tunables for the pointer-to-surface interaction engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub max_annotations: usize,
    pub surface_offset_factor: f32,
    pub hover_scale: f32,
    pub warning_duration_secs: f32,
    pub double_click_window_secs: f32,
    pub raycast_origin: RaycastOrigin,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            max_annotations: MAX_ANNOTATIONS,
            surface_offset_factor: SURFACE_OFFSET_FACTOR,
            hover_scale: ICON_HOVER_SCALE,
            warning_duration_secs: WARNING_DURATION_SECS,
            double_click_window_secs: DOUBLE_CLICK_WINDOW_SECS,
            raycast_origin: RaycastOrigin::default(),
        }
    }
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfigData {
    /// glTF file loaded as the model (built-in demo geometry when unset)
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    #[serde(default)]
    pub interaction: InteractionSettings,
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

impl AppConfig {
    pub fn interaction(&self) -> &InteractionSettings {
        &self.data.interaction
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to remember a new model path
#[derive(Message)]
pub struct SetModelPathRequest {
    pub path: PathBuf,
}

/// Parse config JSON, falling back to defaults with a human readable reason on failure
fn parse_config(json: &str) -> (AppConfigData, Option<String>) {
    match serde_json::from_str(json) {
        Ok(data) => (data, None),
        Err(e) => {
            warn!("Failed to parse config file: {}", e);
            (
                AppConfigData::default(),
                Some(format!("Configuration file was corrupted: {}", e)),
            )
        }
    }
}

/// Load configuration from disk
fn load_config(config_path: PathBuf) -> (AppConfig, Option<String>) {
    let (data, reset_reason) = if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(json) => {
                let parsed = parse_config(&json);
                if parsed.1.is_none() {
                    info!("Loaded config from {:?}", config_path);
                }
                parsed
            }
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                (
                    AppConfigData::default(),
                    Some(format!("Could not read configuration file: {}", e)),
                )
            }
        }
    } else {
        info!("No config file found, using defaults");
        (AppConfigData::default(), None)
    };

    (
        AppConfig {
            data,
            config_path,
            dirty: false,
        },
        reset_reason,
    )
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let (loaded, reset_reason) = load_config(config.config_path.clone());
    *config = loaded;

    if let Some(reason) = reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

/// System to update the remembered model path
fn set_model_path_system(
    mut events: MessageReader<SetModelPathRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        config.data.model_path = Some(event.path.clone());
        config.dirty = true;
        save_events.write(SaveConfigRequest);
        info!("Model path set to {:?}", event.path);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<SetModelPathRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                (
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                    set_model_path_system.run_if(on_message::<SetModelPathRequest>),
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert!(data.model_path.is_none());
        assert_eq!(data.interaction.max_annotations, 10);
        assert_eq!(data.interaction.raycast_origin, RaycastOrigin::Crosshair);
    }

    #[test]
    fn test_app_config_data_serialization() {
        let data = AppConfigData {
            model_path: Some(PathBuf::from("/models/arrow.glb")),
            interaction: InteractionSettings {
                max_annotations: 4,
                raycast_origin: RaycastOrigin::Cursor,
                ..default()
            },
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed: AppConfigData = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.model_path, data.model_path);
        assert_eq!(parsed.interaction, data.interaction);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let (data, reason) = parse_config(r#"{ "interaction": { "max_annotations": 3 } }"#);
        assert!(reason.is_none());
        assert_eq!(data.interaction.max_annotations, 3);
        assert_eq!(data.interaction.hover_scale, ICON_HOVER_SCALE);
        assert!(data.model_path.is_none());
    }

    #[test]
    fn test_corrupted_config_resets_with_reason() {
        let (data, reason) = parse_config("{ not json");
        assert_eq!(data.interaction, InteractionSettings::default());
        assert!(reason.unwrap().contains("corrupted"));
    }

    #[test]
    fn test_raycast_origin_serializes_lowercase() {
        let json = serde_json::to_string(&RaycastOrigin::Crosshair).unwrap();
        assert_eq!(json, "\"crosshair\"");
    }
}
