//! Where Surfacemark keeps its two files on disk: `config.json` (last model
//! path and interaction settings) and `logs/surfacemark.log`.
//!
//! A development build keeps both next to the working directory so a
//! `cargo run` session never touches an installed copy. Installed builds use
//! the platform directories from [`dirs`]; on Linux the config goes under
//! `~/.config` and the logs under `~/.local/share`.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "surfacemark";
const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "surfacemark.log";

/// `cargo run` or a debug build
pub fn is_dev_mode() -> bool {
    std::env::var("CARGO").is_ok() || cfg!(debug_assertions)
}

/// Resolved on-disk locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppPaths {
    /// Everything relative to `base` (development layout)
    pub fn local(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            config_dir: base.to_path_buf(),
            logs_dir: base.join("logs"),
        }
    }

    /// Platform directories, falling back to the development layout when the
    /// platform reports none
    pub fn installed() -> Self {
        let Some(data) = dirs::data_dir().map(|dir| dir.join(APP_DIR)) else {
            return Self::local(".");
        };
        let config = if cfg!(target_os = "linux") {
            dirs::config_dir().map(|dir| dir.join(APP_DIR))
        } else {
            None
        };

        Self {
            config_dir: config.unwrap_or_else(|| data.clone()),
            logs_dir: data.join("logs"),
        }
    }

    pub fn current() -> Self {
        if is_dev_mode() {
            Self::local(".")
        } else {
            Self::installed()
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs_dir.join(LOG_FILE)
    }

    /// Create the config and log directories
    pub fn ensure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.logs_dir)
    }
}

/// Config file for this run
pub fn config_file() -> PathBuf {
    AppPaths::current().config_file()
}

pub fn logs_dir() -> PathBuf {
    AppPaths::current().logs_dir
}

/// Log file name inside [`logs_dir`]
pub fn log_file_name() -> &'static str {
    LOG_FILE
}

pub fn ensure_directories() -> std::io::Result<()> {
    AppPaths::current().ensure()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_layout() {
        let paths = AppPaths::local("/tmp/scan");
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/scan/config.json"));
        assert_eq!(paths.log_file(), PathBuf::from("/tmp/scan/logs/surfacemark.log"));
    }

    #[test]
    fn test_debug_builds_use_working_directory() {
        assert!(is_dev_mode());
        assert_eq!(config_file(), PathBuf::from("./config.json"));
        assert_eq!(logs_dir(), PathBuf::from("./logs"));
    }

    #[test]
    fn test_installed_layout_is_app_scoped() {
        let paths = AppPaths::installed();
        assert!(paths.logs_dir.ends_with("logs"));
        assert!(paths.config_file().ends_with("config.json"));
    }
}
