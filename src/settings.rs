use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::project::{read_json, write_json, ProjectError};

const SETTINGS_VERSION: u32 = 1;

/// Default undo depth for a session.
pub const DEFAULT_MAX_UNDO_LEVELS: usize = 50;

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    7878
}

fn default_max_undo_levels() -> usize {
    DEFAULT_MAX_UNDO_LEVELS
}

/// Application settings stored in the config directory. Every field has a
/// default, so a partial or missing `settings.json` is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Address the HTTP API binds to.
    #[serde(default = "default_host")]
    #[ts(type = "string")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// `tracing` filter directive, e.g. `"cmdcraft=debug"`. `CMDCRAFT_LOG`
    /// takes precedence.
    #[serde(default)]
    pub log_filter: Option<String>,
    #[serde(default = "default_max_undo_levels")]
    pub max_undo_levels: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            host: default_host(),
            port: default_port(),
            log_filter: None,
            max_undo_levels: DEFAULT_MAX_UNDO_LEVELS,
        }
    }
}

impl AppSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Load settings from the app config directory. `Ok(None)` when there is no
/// settings file.
pub fn load_settings(app_config_dir: &Path) -> Result<Option<AppSettings>, ProjectError> {
    let path = crate::paths::settings_path(app_config_dir);
    if !path.exists() {
        return Ok(None);
    }
    read_json(&path).map(Some)
}

/// Load settings for a binary and install its `tracing` subscriber.
///
/// An unreadable settings file falls back to defaults. The warning about it is
/// logged once the subscriber is up, so it is not lost.
pub fn load_with_tracing(app_config_dir: &Path) -> AppSettings {
    let loaded = load_settings(app_config_dir);
    let settings = match &loaded {
        Ok(Some(settings)) => settings.clone(),
        Ok(None) | Err(_) => AppSettings::default(),
    };
    init_tracing(&settings);
    if let Err(e) = loaded {
        tracing::warn!(
            path = %crate::paths::settings_path(app_config_dir).display(),
            error = %e,
            "Ignoring unreadable settings file"
        );
    }
    settings
}

/// Save settings to the app config directory.
pub fn save_settings(app_config_dir: &Path, settings: &AppSettings) -> Result<(), ProjectError> {
    std::fs::create_dir_all(app_config_dir)?;
    write_json(&crate::paths::settings_path(app_config_dir), settings)
}

/// Install the global `tracing` subscriber for a binary.
///
/// Filter precedence: `CMDCRAFT_LOG`, then `log_filter` from settings, then `info`.
pub fn init_tracing(settings: &AppSettings) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(crate::paths::LOG_ENV)
        .ok()
        .or_else(|| {
            settings
                .log_filter
                .as_deref()
                .and_then(|f| EnvFilter::try_new(f).ok())
        })
        .unwrap_or_else(|| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip() {
        let dir = std::env::temp_dir().join("cmdcraft_test_settings");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let settings = AppSettings {
            port: 9000,
            log_filter: Some("cmdcraft=debug".into()),
            ..AppSettings::default()
        };
        save_settings(&dir, &settings).unwrap();

        let loaded = load_settings(&dir).unwrap().expect("should load");
        assert_eq!(loaded, settings);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = std::env::temp_dir().join("cmdcraft_test_partial_settings");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        std::fs::write(crate::paths::settings_path(&dir), r#"{ "port": 8123 }"#).unwrap();
        let loaded = load_settings(&dir).unwrap().expect("should load");
        assert_eq!(loaded.port, 8123);
        assert_eq!(loaded.host, default_host());
        assert_eq!(loaded.max_undo_levels, DEFAULT_MAX_UNDO_LEVELS);
        assert_eq!(loaded.version, SETTINGS_VERSION);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_missing_returns_none() {
        let dir = std::env::temp_dir().join("cmdcraft_test_no_settings");
        let _ = std::fs::remove_dir_all(&dir);
        assert!(load_settings(&dir).unwrap().is_none());
        assert_eq!(load_with_tracing(&dir), AppSettings::default());
    }

    #[test]
    fn test_unreadable_file_is_ignored() {
        let dir = std::env::temp_dir().join("cmdcraft_test_bad_settings");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(crate::paths::settings_path(&dir), "port = 1").unwrap();
        assert!(matches!(load_settings(&dir), Err(ProjectError::Json(_))));
        assert_eq!(load_with_tracing(&dir), AppSettings::default());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
