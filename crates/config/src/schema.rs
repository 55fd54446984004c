use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure parsed from `quickspace.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickspaceConfig {
    pub global: GlobalConfig,
    pub clock: ClockConfig,
    pub weather: WeatherConfig,
    pub ambient: AmbientConfig,
    /// User-visible strings of the quick events.
    pub strings: StringsConfig,
    pub launcher: LauncherConfig,
}

/// Global strip settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// How long a now-playing notice stays up (milliseconds).
    pub ambient_ttl_ms: u64,
    /// Fade-in duration when the content container first appears.
    pub fade_in_ms: u64,
    /// Integer settings file shared with the host (intro flag, unit flag).
    /// `None` = `$XDG_CONFIG_HOME/quickspace/settings.toml`.
    pub settings_path: Option<PathBuf>,
    /// Broadcast socket path.  `None` = `$XDG_RUNTIME_DIR/quickspace.sock`.
    pub socket_path: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            ambient_ttl_ms: 120_000,
            fade_in_ms: 200,
            settings_path: None,
            socket_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// `strftime` format for the single-line date, e.g. `"Fri, Oct 16"`.
    pub date_format: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            date_format: "%a, %b %-d".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Disable to hide weather entirely.
    pub enabled: bool,
    /// JSON snapshot written by the weather provider.
    pub snapshot_path: Option<PathBuf>,
    pub poll_interval_ms: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            snapshot_path: None,
            poll_interval_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    /// JSON song history written by the recogniser (most recent first).
    pub history_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StringsConfig {
    pub intro_welcome: String,
    pub intro_learn_more: String,
    pub now_playing: String,
    /// Subtitle / search query template with `{song}` and `{artist}` placeholders.
    pub song_artist: String,
}

impl Default for StringsConfig {
    fn default() -> Self {
        Self {
            intro_welcome:    "Welcome to your new device".to_string(),
            intro_learn_more: "Tap to learn more".to_string(),
            now_playing:      "Now playing".to_string(),
            song_artist:      "{song} — {artist}".to_string(),
        }
    }
}

impl StringsConfig {
    /// Fill the `song_artist` template.
    pub fn format_song(&self, song: &str, artist: &str) -> String {
        self.song_artist
            .replace("{song}", song)
            .replace("{artist}", artist)
    }
}

/// How intents are handed to the desktop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Program that opens URIs; empty = the system default opener.
    pub opener: String,
    /// URI of the device introduction flow; empty = not installed.
    pub device_intro_uri: String,
    /// Calendar URI; `{millis}` is replaced by the epoch milliseconds.
    pub calendar_uri: String,
    pub weather_uri: String,
    /// Base URL of the web search; the query is appended as `q=`.
    pub search_url: String,
    /// App details page; `{app}` is replaced by the app identifier.
    pub app_details_uri: String,
    /// Commands whose presence on `$PATH` marks the app as installed.
    pub calendar_command: String,
    pub assistant_command: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            opener:            "xdg-open".to_string(),
            device_intro_uri:  String::new(),
            calendar_uri:      "calendar:///time/{millis}".to_string(),
            weather_uri:       "https://www.google.com/search?q=weather".to_string(),
            search_url:        "https://www.google.com/search".to_string(),
            app_details_uri:   "appstream://{app}".to_string(),
            calendar_command:  "gnome-calendar".to_string(),
            assistant_command: String::new(),
        }
    }
}
