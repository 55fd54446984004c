pub mod schema;
pub mod watcher;

pub use schema::{
    AmbientConfig, ClockConfig, GlobalConfig, LauncherConfig, QuickspaceConfig, StringsConfig,
    WeatherConfig,
};
pub use watcher::FileWatcher;

use quickspace_core::{QuickspaceError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `QuickspaceConfig::default()`
/// if the file doesn't exist so the strip always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<QuickspaceConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(QuickspaceConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| QuickspaceError::Config(format!("cannot read '{}': {e}", path.display())))?;

    toml::from_str(&raw).map_err(|e| QuickspaceError::Config(format!("TOML parse error: {e}")))
}

/// Directory holding `quickspace.toml` and `settings.toml`, honouring `$XDG_CONFIG_HOME`.
pub fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("quickspace")
}

/// Return the default config path.
pub fn default_path() -> PathBuf {
    config_dir().join("quickspace.toml")
}

/// Resolved location of the shared settings file.
pub fn settings_path(config: &QuickspaceConfig) -> PathBuf {
    config
        .global
        .settings_path
        .clone()
        .unwrap_or_else(|| config_dir().join("settings.toml"))
}

/// Resolved location of the broadcast socket.
pub fn socket_path(config: &QuickspaceConfig) -> PathBuf {
    config.global.socket_path.clone().unwrap_or_else(|| {
        let runtime_dir =
            std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/run/user/1000".to_string());
        PathBuf::from(runtime_dir).join("quickspace.sock")
    })
}
