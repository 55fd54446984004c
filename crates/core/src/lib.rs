pub mod error;
pub mod event;
pub mod host;
pub mod state;

pub use error::{QuickspaceError, Result};
pub use event::{ClickTarget, Trigger};
pub use host::{
    AmbientHistory, App, Clock, Intent, LaunchOutcome, Launcher, SettingsStore, SystemClock,
    WeatherService,
};
pub use state::{SongEntry, TemperatureUnit, WeatherSnapshot, WeatherStatus};
