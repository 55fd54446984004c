//! Concrete collaborators backing the strip on a Linux desktop.

pub mod ambient;
pub mod launcher;
pub mod settings;
pub mod weather;

pub use ambient::FileAmbientHistory;
pub use launcher::CommandLauncher;
pub use settings::{FileSettingsStore, MemorySettings};
pub use weather::{spawn_weather_monitor, FileWeatherClient};
