use quickspace_config::LauncherConfig;
use quickspace_core::{App, Intent, LaunchOutcome, Launcher};
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// Hands intents to the desktop by opening a URI with the configured opener
/// (`xdg-open` by default), or the system default when none is configured.
///
/// The opener runs detached, so the control thread never blocks and no child
/// is left for the daemon to reap.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    config: LauncherConfig,
}

impl CommandLauncher {
    pub fn new(config: LauncherConfig) -> Self {
        Self { config }
    }

    /// URI an intent resolves to, or `None` when no target is configured.
    pub fn uri_for(&self, intent: &Intent) -> Option<String> {
        let uri = match intent {
            Intent::DeviceIntroduction => self.config.device_intro_uri.clone(),
            Intent::WebSearch { query } => Url::parse_with_params(
                &self.config.search_url,
                &[("q", query.as_str())],
            )
            .map(String::from)
            .ok()?,
            Intent::Calendar { at } => self
                .config
                .calendar_uri
                .replace("{millis}", &at.timestamp_millis().to_string()),
            Intent::WeatherDetails => self.config.weather_uri.clone(),
        };
        (!uri.is_empty()).then_some(uri)
    }

    fn spawn_opener(&self, uri: &str) -> LaunchOutcome {
        let opener = self.config.opener.as_str();
        let result = if opener.is_empty() {
            open::that_detached(uri)
        } else {
            open::with_detached(uri, opener)
        };
        match result {
            Ok(()) => LaunchOutcome::Launched,
            Err(e) => {
                debug!("Cannot run opener '{opener}': {e}");
                LaunchOutcome::NotFound
            }
        }
    }

    fn command_for(&self, app: App) -> &str {
        match app {
            App::Calendar => &self.config.calendar_command,
            App::Assistant => &self.config.assistant_command,
        }
    }
}

impl Launcher for CommandLauncher {
    fn open_intent_safely(&self, intent: &Intent) -> LaunchOutcome {
        let Some(uri) = self.uri_for(intent) else {
            debug!("No target configured for {intent:?}");
            return LaunchOutcome::NotFound;
        };
        info!("Opening {uri}");
        self.spawn_opener(&uri)
    }

    fn show_app_details(&self, app: App) {
        let id = match app {
            App::Calendar => "calendar",
            App::Assistant => "assistant",
        };
        let uri = self.config.app_details_uri.replace("{app}", id);
        if !uri.is_empty() {
            let _ = self.spawn_opener(&uri);
        }
    }

    /// An app with no configured command counts as installed; otherwise the
    /// command must be found on `$PATH`.
    fn is_app_installed(&self, app: App) -> bool {
        let command = self.command_for(app);
        command.is_empty() || on_path(command)
    }
}

fn on_path(command: &str) -> bool {
    if command.contains('/') {
        return Path::new(command).exists();
    }
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(command).exists()))
        .unwrap_or(false)
}
